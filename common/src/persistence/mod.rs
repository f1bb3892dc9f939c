use crate::config::CONFIG;
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::deadpool::Pool;
use std::sync::LazyLock;

pub mod models;
pub mod schema;

pub type PgPool = Pool<AsyncPgConnection>;

pub fn init_pg_pool() -> PgPool {
    build_pg_pool(CONFIG.postgres.url())
}

/// No connection is opened until the first checkout.
pub fn build_pg_pool(url: impl Into<String>) -> PgPool {
    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(url);
    Pool::builder(config).build().expect("build pool")
}

pub static PG_POOL: LazyLock<PgPool> = LazyLock::new(init_pg_pool);
