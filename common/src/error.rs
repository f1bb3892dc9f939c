use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of the outbound collaborators: database, media bucket and the
/// reviews provider. Payloads are kept as strings so the error stays
/// serializable and cloneable across crate boundaries.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
pub enum GeneralError {
    #[error("postgres pool error: `{0}`")]
    PgPool(String),
    #[error("diesel error: `{0}`")]
    Diesel(String),
    #[error("could not marshall/unmarshall given argument: {0}")]
    Json(String),
    #[error("s3 error: `{0}`")]
    S3(String),
    #[error("http error: `{0}`")]
    Http(String),
    #[error("http request timed out: `{0}`")]
    Timeout(String),
    #[error("reviews provider answered with status `{status}`: {message}")]
    ProviderStatus { status: String, message: String },
    #[error("reviews provider credentials are not configured")]
    MissingCredentials,
}

impl From<serde_json::Error> for GeneralError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value.to_string())
    }
}

#[cfg(feature = "persistence")]
impl From<diesel_async::pooled_connection::deadpool::PoolError> for GeneralError {
    fn from(value: diesel_async::pooled_connection::deadpool::PoolError) -> Self {
        Self::PgPool(value.to_string())
    }
}

#[cfg(feature = "persistence")]
impl From<diesel::result::Error> for GeneralError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value.to_string())
    }
}
