use crate::AppState;
use crate::domain::{
    ListQuery, UpdateVehicleRequest, VehicleDeletionResponse, VehicleRecord,
    VehicleUpdateResponse,
};
use crate::error::{ApiError, ApiJson, ApiPath, ApiQuery, ErrorResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/vehicles",
    tag = "vehicles",
    params(ListQuery),
    responses(
        (status = 200, description = "Returns the newest vehicles with their media, at most 500", body = [VehicleRecord])
    )
)]
pub async fn all(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<ApiJson<Vec<VehicleRecord>>, ApiError> {
    let vehicles = state.vehicles.list(query.limit).await?;
    Ok(ApiJson(vehicles.into_iter().map(VehicleRecord).collect()))
}

#[utoipa::path(
    get,
    path = "/vehicles/{id}",
    tag = "vehicles",
    params(
        ("id" = Uuid, Path, description = "The id of the vehicle")
    ),
    responses(
        (status = 200, description = "Returns a vehicle with its media", body = VehicleRecord),
        (status = 404, description = "Vehicle does not exist", body = ErrorResponse)
    )
)]
pub async fn by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiJson<VehicleRecord>, ApiError> {
    Ok(ApiJson(VehicleRecord(state.vehicles.get(id).await?)))
}

#[utoipa::path(
    post,
    path = "/vehicles",
    tag = "vehicles",
    request_body = VehicleRecord,
    responses(
        (status = 201, description = "Vehicle created, unsupported fields dropped", body = VehicleRecord),
        (status = 409, description = "Store rejected the record", body = ErrorResponse),
        (status = 422, description = "Record does not fit the storage model", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(record): ApiJson<VehicleRecord>,
) -> Result<(StatusCode, ApiJson<VehicleRecord>), ApiError> {
    let created = state.vehicles.create(record.0).await?;
    Ok((StatusCode::CREATED, ApiJson(VehicleRecord(created))))
}

#[utoipa::path(
    put,
    path = "/vehicles/{id}",
    tag = "vehicles",
    params(
        ("id" = Uuid, Path, description = "The id of the vehicle")
    ),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle updated and listed media released", body = VehicleUpdateResponse),
        (status = 207, description = "Vehicle updated, some media could not be released", body = VehicleUpdateResponse),
        (status = 404, description = "Vehicle does not exist", body = ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateVehicleRequest>,
) -> Result<Response, ApiError> {
    let remove_media = request.media_to_remove();
    let update = state
        .vehicles
        .update(id, request.vehicle, &remove_media)
        .await?;
    let status = if update.removed_media.iter().all(|m| m.outcome.is_complete()) {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    Ok((status, ApiJson(VehicleUpdateResponse::from(update))).into_response())
}

#[utoipa::path(
    delete,
    path = "/vehicles/{id}",
    tag = "vehicles",
    params(
        ("id" = Uuid, Path, description = "The id of the vehicle")
    ),
    responses(
        (status = 200, description = "Vehicle and all its media removed", body = VehicleDeletionResponse),
        (status = 207, description = "Vehicle removed, some media could not be released", body = VehicleDeletionResponse),
        (status = 404, description = "Vehicle does not exist", body = ErrorResponse)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, ApiError> {
    let deletion = state.vehicles.delete(id).await?;
    let status = if deletion.is_complete() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    Ok((status, ApiJson(VehicleDeletionResponse::from(deletion))).into_response())
}
