use common::error::GeneralError;
use diesel_async::pooled_connection::deadpool::PoolError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InventoryError {
    #[error("vehicle not found: `{0}`")]
    VehicleNotFound(Uuid),
    #[error("record does not fit the storage model: {0}")]
    InvalidRecord(String),
    /// Write or read rejected by the database, tagged with the driver's error kind.
    #[error("database error `{kind}`: {message}")]
    Database { kind: String, message: String },
    #[error("postgres pool error: `{0}`")]
    PgPool(String),
    #[error("asset store error: {0}")]
    Assets(String),
}

impl From<diesel::result::Error> for InventoryError {
    fn from(value: diesel::result::Error) -> Self {
        match value {
            diesel::result::Error::DatabaseError(kind, info) => Self::Database {
                kind: format!("{kind:?}"),
                message: info.message().to_owned(),
            },
            other => Self::Database {
                kind: "Diesel".to_owned(),
                message: other.to_string(),
            },
        }
    }
}

impl From<PoolError> for InventoryError {
    fn from(value: PoolError) -> Self {
        Self::PgPool(value.to_string())
    }
}

impl From<serde_json::Error> for InventoryError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidRecord(value.to_string())
    }
}

impl From<GeneralError> for InventoryError {
    fn from(value: GeneralError) -> Self {
        Self::Assets(value.to_string())
    }
}
