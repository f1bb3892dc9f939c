use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inventory::InventoryError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error("malformed json body: `{0}`")]
    Json(#[from] JsonRejection),
    #[error("malformed path: `{0}`")]
    Path(#[from] PathRejection),
    #[error("malformed query: `{0}`")]
    Query(#[from] QueryRejection),
    #[error("no default place id configured for reviews")]
    PlaceIdNotConfigured,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, kind) = match self {
            Self::Inventory(InventoryError::VehicleNotFound(id)) => (
                StatusCode::NOT_FOUND,
                format!("vehicle not found: `{id}`"),
                None,
            ),
            Self::Inventory(InventoryError::InvalidRecord(reason)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, reason, None)
            }
            Self::Inventory(InventoryError::Database { kind, message }) => {
                error!(%kind, %message, "database rejected request");
                (database_status(&kind), message, Some(kind))
            }
            Self::Json(rejection) => (rejection.status(), rejection.body_text(), None),
            Self::Path(rejection) => (rejection.status(), rejection.body_text(), None),
            Self::Query(rejection) => (rejection.status(), rejection.body_text(), None),
            Self::PlaceIdNotConfigured => (
                StatusCode::NOT_FOUND,
                "no default place id configured".to_string(),
                None,
            ),
            e @ Self::Inventory(_) => {
                error!(api_error = %e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                    None,
                )
            }
        };

        (status, ApiJson(ErrorResponse { message, kind })).into_response()
    }
}

fn database_status(kind: &str) -> StatusCode {
    match kind {
        "UniqueViolation" | "ForeignKeyViolation" => StatusCode::CONFLICT,
        "NotNullViolation" | "CheckViolation" => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    message: String,
    /// Database error kind, present when the store rejected a write.
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
}

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl<T> IntoResponse for ApiJson<T>
where
    axum::Json<T>: IntoResponse,
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
