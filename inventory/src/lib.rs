pub mod error;
pub mod mapping;
pub mod media;
pub mod service;
pub mod store;

pub use error::InventoryError;
pub use mapping::{FieldMap, to_frontend_shape, to_storage_shape};
