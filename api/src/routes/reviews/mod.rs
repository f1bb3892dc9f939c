use crate::AppState;
use crate::domain::ReviewsResponse;
use crate::error::{ApiError, ApiJson, ApiPath, ErrorResponse};
use axum::extract::State;
use tracing::debug;

#[utoipa::path(
    get,
    path = "/reviews/{place_id}",
    tag = "reviews",
    params(
        ("place_id" = String, Path, description = "Provider place id of the dealership")
    ),
    responses(
        (status = 200, description = "Cached, live or fallback reviews, never an error", body = ReviewsResponse)
    )
)]
pub async fn by_place_id(
    State(state): State<AppState>,
    ApiPath(place_id): ApiPath<String>,
) -> ApiJson<ReviewsResponse> {
    let lookup = state.reviews.lookup(&place_id).await;
    debug!(outcome = ?lookup.outcome, "reviews resolved");
    ApiJson(lookup.payload.into())
}

#[utoipa::path(
    get,
    path = "/reviews",
    tag = "reviews",
    responses(
        (status = 200, description = "Reviews of the configured place", body = ReviewsResponse),
        (status = 404, description = "No default place id configured", body = ErrorResponse)
    )
)]
pub async fn default_place(
    State(state): State<AppState>,
) -> Result<ApiJson<ReviewsResponse>, ApiError> {
    let place_id = state
        .default_place_id
        .as_deref()
        .ok_or(ApiError::PlaceIdNotConfigured)?;
    let lookup = state.reviews.lookup(place_id).await;
    debug!(outcome = ?lookup.outcome, "reviews resolved");
    Ok(ApiJson(lookup.payload.into()))
}
