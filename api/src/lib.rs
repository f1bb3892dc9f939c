use axum::Router;
use axum::routing::{delete, get, post};
use common::bucket::S3AssetStore;
use common::config::CONFIG;
use common::error::GeneralError;
use common::persistence::PgPool;
use inventory::service::VehicleService;
use inventory::store::PgVehicleStore;
use reviews::{GooglePlacesProvider, PgReviewsCache, ReviewsGateway};
use routes::{media, reviews as reviews_routes, vehicle};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::info;
use utoipa::OpenApi;

pub mod domain;
pub mod error;
pub mod routes;

#[derive(OpenApi)]
#[openapi(paths(
    crate::routes::vehicle::all,
    crate::routes::vehicle::by_id,
    crate::routes::vehicle::create,
    crate::routes::vehicle::update,
    crate::routes::vehicle::delete,
    crate::routes::media::add_image,
    crate::routes::media::add_video,
    crate::routes::media::remove,
    crate::routes::reviews::by_place_id,
    crate::routes::reviews::default_place,
))]
pub struct Docs;

pub type Vehicles = VehicleService<PgVehicleStore, S3AssetStore>;
pub type Reviews = ReviewsGateway<PgReviewsCache, GooglePlacesProvider>;

#[derive(Clone)]
pub struct AppState {
    pub vehicles: Arc<Vehicles>,
    pub reviews: Arc<Reviews>,
    pub default_place_id: Option<Arc<str>>,
}

impl AppState {
    pub fn new(vehicles: Vehicles, reviews: Reviews, default_place_id: Option<String>) -> Self {
        Self {
            vehicles: Arc::new(vehicles),
            reviews: Arc::new(reviews),
            default_place_id: default_place_id
                .filter(|id| !id.trim().is_empty())
                .map(Arc::from),
        }
    }

    pub fn from_config(pool: PgPool) -> Result<Self, GeneralError> {
        Ok(Self::new(
            VehicleService::new(PgVehicleStore::new(pool.clone()), S3AssetStore::from_config()),
            ReviewsGateway::new(PgReviewsCache::new(pool), GooglePlacesProvider::from_config()?),
            CONFIG.reviews.place_id.clone(),
        ))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/vehicles", get(vehicle::all).post(vehicle::create))
        .route(
            "/vehicles/{id}",
            get(vehicle::by_id)
                .put(vehicle::update)
                .delete(vehicle::delete),
        )
        .route("/vehicles/{id}/images", post(media::add_image))
        .route("/vehicles/{id}/videos", post(media::add_video))
        // public ids are path-like, e.g. `vehicles/octavia-front`
        .route("/media/{*public_id}", delete(media::remove))
        .route("/reviews", get(reviews_routes::default_place))
        .route("/reviews/{place_id}", get(reviews_routes::by_place_id))
        .route("/openapi.json", get(openapi))
        .with_state(state)
}

async fn openapi() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(Docs::openapi())
}

pub fn serve(
    listener: tokio::net::TcpListener,
    app: Router,
    cancellation_token: CancellationToken,
) -> Arc<Notify> {
    let done = Arc::new(Notify::new());

    tokio::spawn({
        let done = done.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    cancellation_token.cancelled().await;
                    info!("gracefully shutting down app");
                    done.notify_waiters();
                })
                .await
                .expect("failed to serve");
        }
    });

    done
}
