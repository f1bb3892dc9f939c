use crate::error::InventoryError;
use crate::mapping::{FieldMap, as_bool, as_integer, is_blank};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Child row field → frontend field. Keys not listed pass through unchanged.
pub const MEDIA_FIELD_RENAMES: &[(&str, &str)] = &[
    ("public_id", "publicId"),
    ("sort_order", "displayOrder"),
    ("display_order", "displayOrder"),
    ("is_primary", "isPrimary"),
    ("created_at", "createdAt"),
    ("vehicle_id", "vehicleId"),
];

/// Frontend field → child row column, used when a media row is registered.
pub const MEDIA_FIELD_SYNONYMS: &[(&str, &str)] = &[
    ("publicId", "public_id"),
    ("displayOrder", "sort_order"),
    ("display_order", "sort_order"),
    ("isPrimary", "is_primary"),
];

pub const MEDIA_STORAGE_COLUMNS: &[&str] = &["url", "public_id", "is_primary", "sort_order"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// A media row about to be attached to a vehicle. At most one primary item
/// per vehicle is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewMedia {
    pub url: String,
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default)]
    pub is_primary: Option<bool>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

pub fn media_list_to_frontend_shape(items: Value) -> Value {
    match items {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(child) => Value::Object(media_to_frontend_shape(child)),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

pub fn media_to_frontend_shape(child: FieldMap) -> FieldMap {
    child
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let renamed = MEDIA_FIELD_RENAMES
                .iter()
                .find(|(column, _)| *column == key)
                .map(|(_, field)| (*field).to_owned())
                .unwrap_or(key);
            (renamed, value)
        })
        .collect()
}

pub fn media_to_storage_shape(mut child: FieldMap) -> FieldMap {
    for (alias, column) in MEDIA_FIELD_SYNONYMS {
        if let Some(value) = child.remove(*alias) {
            child.insert((*column).to_owned(), value);
        }
    }

    let mut storage = FieldMap::new();
    for (key, value) in child {
        if !MEDIA_STORAGE_COLUMNS.contains(&key.as_str()) {
            warn!(field = %key, value = %value, "dropping field outside the media allow-list");
            continue;
        }
        if is_blank(&value) {
            continue;
        }
        let normalized = match key.as_str() {
            "sort_order" => as_integer(&value).map(Value::from),
            "is_primary" => as_bool(&value).map(Value::Bool),
            _ => value.as_str().map(Value::from),
        };
        match normalized {
            Some(v) => {
                storage.insert(key, v);
            }
            None => warn!(field = %key, value = %value, "dropping value that does not fit its column"),
        }
    }
    storage
}

pub fn to_new_media(child: FieldMap) -> Result<NewMedia, InventoryError> {
    Ok(serde_json::from_value(Value::Object(media_to_storage_shape(child)))?)
}

/// Result of removing one media item, which lives both as a row and as an
/// asset in the external store. Each half is reported on its own so a caller
/// can retry just the part that failed.
#[derive(Debug, Clone, PartialEq)]
pub enum RemovalOutcome {
    Removed,
    RowOnly { asset_error: String },
    AssetOnly { row_error: String },
    Failed { row_error: String, asset_error: String },
}

impl RemovalOutcome {
    pub fn from_halves(row: Result<(), String>, asset: Result<(), String>) -> Self {
        match (row, asset) {
            (Ok(()), Ok(())) => Self::Removed,
            (Ok(()), Err(asset_error)) => Self::RowOnly { asset_error },
            (Err(row_error), Ok(())) => Self::AssetOnly { row_error },
            (Err(row_error), Err(asset_error)) => Self::Failed {
                row_error,
                asset_error,
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Removed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaRemoval {
    pub public_id: String,
    pub outcome: RemovalOutcome,
}
