use api::{AppState, router, serve};
use common::config::CONFIG;
use common::logging::setup_logging;
use common::persistence::init_pg_pool;
use tokio_util::sync::CancellationToken;
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
use tracing::info;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[tokio::main]
async fn main() {
    setup_logging("api");
    info!("starting app");
    let cancellation_token = CancellationToken::new();

    let state = AppState::from_config(init_pg_pool()).expect("failed to build app state");
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&CONFIG.api.bind)
        .await
        .expect("failed to bind");
    info!(bind = %CONFIG.api.bind, "listening");
    let app_done = serve(listener, app, cancellation_token.clone());

    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for ctrl c event");
    info!("exiting");
    cancellation_token.cancel();
    app_done.notified().await;
    info!("exited");
}
