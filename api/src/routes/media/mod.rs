use crate::AppState;
use crate::domain::{MediaRecord, MediaRemovalReport};
use crate::error::{ApiError, ApiJson, ApiPath, ErrorResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inventory::media::MediaKind;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/vehicles/{id}/images",
    tag = "media",
    params(
        ("id" = Uuid, Path, description = "The id of the vehicle")
    ),
    request_body = MediaRecord,
    responses(
        (status = 201, description = "Image row registered", body = MediaRecord),
        (status = 404, description = "Vehicle does not exist", body = ErrorResponse),
        (status = 422, description = "Image has no url", body = ErrorResponse)
    )
)]
pub async fn add_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(record): ApiJson<MediaRecord>,
) -> Result<(StatusCode, ApiJson<MediaRecord>), ApiError> {
    add(state, id, MediaKind::Image, record).await
}

#[utoipa::path(
    post,
    path = "/vehicles/{id}/videos",
    tag = "media",
    params(
        ("id" = Uuid, Path, description = "The id of the vehicle")
    ),
    request_body = MediaRecord,
    responses(
        (status = 201, description = "Video row registered", body = MediaRecord),
        (status = 404, description = "Vehicle does not exist", body = ErrorResponse),
        (status = 422, description = "Video has no url", body = ErrorResponse)
    )
)]
pub async fn add_video(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(record): ApiJson<MediaRecord>,
) -> Result<(StatusCode, ApiJson<MediaRecord>), ApiError> {
    add(state, id, MediaKind::Video, record).await
}

async fn add(
    state: AppState,
    vehicle_id: Uuid,
    kind: MediaKind,
    record: MediaRecord,
) -> Result<(StatusCode, ApiJson<MediaRecord>), ApiError> {
    let stored = state.vehicles.add_media(vehicle_id, kind, record.0).await?;
    Ok((StatusCode::CREATED, ApiJson(MediaRecord(stored))))
}

#[utoipa::path(
    delete,
    path = "/media/{public_id}",
    tag = "media",
    params(
        ("public_id" = String, Path, description = "Public id of the asset, url encoded")
    ),
    responses(
        (status = 200, description = "Row and asset removed", body = MediaRemovalReport),
        (status = 207, description = "Only one half could be removed", body = MediaRemovalReport)
    )
)]
pub async fn remove(
    State(state): State<AppState>,
    ApiPath(public_id): ApiPath<String>,
) -> Response {
    let removal = state.vehicles.remove_media(&public_id).await;
    let status = if removal.outcome.is_complete() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    (status, ApiJson(MediaRemovalReport::from(removal))).into_response()
}
