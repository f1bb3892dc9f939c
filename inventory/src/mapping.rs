//! Field mapping between the frontend vehicle shape (camelCase, with display
//! aliases and a tri-state status) and the `vehicles` storage shape
//! (snake_case columns restricted to [`STORAGE_COLUMNS`]).
//!
//! Every read and write path goes through [`to_storage_shape`] and
//! [`to_frontend_shape`]; the tables below are the only place field names are
//! declared.

use crate::error::InventoryError;
use crate::media;
use common::persistence::models::inventory::VehicleChanges;
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

pub type FieldMap = Map<String, Value>;

/// Accepted frontend spelling → canonical column. Applied in declaration
/// order, so when several aliases of one column are present the later entry
/// wins.
pub const FIELD_SYNONYMS: &[(&str, &str)] = &[
    ("body_type", "body_style"),
    ("bodyType", "body_style"),
    ("bodyStyle", "body_style"),
    ("fuelType", "fuel_type"),
    ("color", "exterior_color"),
    ("exteriorColor", "exterior_color"),
    ("interiorColor", "interior_color"),
    ("isAvailable", "is_available"),
    ("isFeatured", "is_featured"),
    ("dealerId", "dealer_id"),
];

/// Canonical column → every frontend key it populates on read. Several keys
/// per column are kept for screens still reading the older names.
pub const FRONTEND_ALIASES: &[(&str, &[&str])] = &[
    ("body_style", &["bodyType", "bodyStyle"]),
    ("exterior_color", &["exteriorColor", "color"]),
    ("fuel_type", &["fuelType"]),
    ("interior_color", &["interiorColor"]),
    ("is_featured", &["isFeatured"]),
    ("dealer_id", &["dealerId"]),
    ("created_at", &["createdAt"]),
    ("updated_at", &["updatedAt"]),
];

/// Columns a vehicle write may touch. Anything else is dropped before the
/// write reaches the database.
pub const STORAGE_COLUMNS: &[&str] = &[
    "make",
    "model",
    "year",
    "price",
    "mileage",
    "transmission",
    "engine",
    "vin",
    "description",
    "dealer_id",
    "body_style",
    "fuel_type",
    "exterior_color",
    "interior_color",
    "is_available",
    "is_featured",
    "features",
];

/// Handled by the media pipeline, never by the record transform.
const TRANSPORT_ONLY_FIELDS: &[&str] = &["images", "videos", "imageFiles", "videoFiles"];

const INTEGER_COLUMNS: &[&str] = &["year", "mileage"];
const BOOLEAN_COLUMNS: &[&str] = &["is_available", "is_featured"];

const STATUS: &str = "status";
const IS_AVAILABLE: &str = "is_available";
const IS_AVAILABLE_ALIAS: &str = "isAvailable";
const IS_FEATURED: &str = "is_featured";
const FEATURES: &str = "features";
const VEHICLE_IMAGES: &str = "vehicle_images";
const VEHICLE_VIDEOS: &str = "vehicle_videos";

/// Display status of a vehicle. Storage only knows `is_available`, so
/// `Pending` and `Draft` cannot be written back distinctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleStatus {
    Available,
    Sold,
    Pending,
    Draft,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Sold => "Sold",
            Self::Pending => "Pending",
            Self::Draft => "Draft",
        }
    }

    pub fn from_availability(is_available: Option<bool>) -> Self {
        match is_available {
            Some(true) => Self::Available,
            Some(false) => Self::Sold,
            None => Self::Draft,
        }
    }
}

/// Maps a frontend record onto the `vehicles` allow-list.
///
/// Unknown keys are logged and dropped rather than rejected, empty values are
/// dropped so column defaults apply, and `is_available`/`is_featured` are
/// always present in the result. Applying it to its own output is a no-op.
pub fn to_storage_shape(record: FieldMap) -> FieldMap {
    let mut storage = to_storage_patch(record);
    storage.entry(IS_AVAILABLE).or_insert(Value::Bool(true));
    storage.entry(IS_FEATURED).or_insert(Value::Bool(false));
    storage
}

/// [`to_storage_shape`] without the flag defaults: only the columns the
/// record actually carries, for partial updates.
pub fn to_storage_patch(mut record: FieldMap) -> FieldMap {
    collapse_synonyms(&mut record);
    apply_status(&mut record);
    for field in TRANSPORT_ONLY_FIELDS {
        record.remove(*field);
    }

    let mut storage = FieldMap::new();
    for (key, value) in record {
        if !STORAGE_COLUMNS.contains(&key.as_str()) {
            warn!(field = %key, value = %value, "dropping field outside the vehicles allow-list");
            continue;
        }
        if is_blank(&value) {
            continue;
        }
        match normalize_column(&key, &value) {
            Some(normalized) => {
                storage.insert(key, normalized);
            }
            None => {
                warn!(field = %key, value = %value, "dropping value that does not fit its column")
            }
        }
    }
    storage
}

/// [`to_storage_shape`] followed by conversion into the typed write model.
pub fn to_vehicle_changes(record: FieldMap) -> Result<VehicleChanges, InventoryError> {
    Ok(serde_json::from_value(Value::Object(to_storage_shape(record)))?)
}

/// [`to_storage_patch`] as a write model; `None` columns are left untouched.
pub fn to_vehicle_patch(record: FieldMap) -> Result<VehicleChanges, InventoryError> {
    Ok(serde_json::from_value(Value::Object(to_storage_patch(record)))?)
}

/// Maps one storage row, optionally carrying `vehicle_images` and
/// `vehicle_videos`, onto the frontend shape.
///
/// Null columns are left out instead of being given display defaults; the
/// only values added are the documented aliases, `status`, `isAvailable` and
/// an empty `features` list.
pub fn to_frontend_shape(mut record: FieldMap) -> FieldMap {
    let is_available = record.remove(IS_AVAILABLE).and_then(|v| v.as_bool());
    if let Some(is_available) = is_available {
        record.insert(IS_AVAILABLE_ALIAS.to_owned(), Value::Bool(is_available));
    }

    for (column, aliases) in FRONTEND_ALIASES {
        let Some(value) = record.remove(*column) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        for alias in *aliases {
            record.insert((*alias).to_owned(), value.clone());
        }
    }
    record.retain(|_, value| !value.is_null());

    record.insert(
        STATUS.to_owned(),
        Value::from(VehicleStatus::from_availability(is_available).as_str()),
    );

    if let Some(images) = record.remove(VEHICLE_IMAGES) {
        record.insert("images".to_owned(), media::media_list_to_frontend_shape(images));
    }
    if let Some(videos) = record.remove(VEHICLE_VIDEOS) {
        record.insert("videos".to_owned(), media::media_list_to_frontend_shape(videos));
    }

    record
        .entry(FEATURES)
        .or_insert_with(|| Value::Array(Vec::new()));
    record
}

fn collapse_synonyms(record: &mut FieldMap) {
    for (alias, column) in FIELD_SYNONYMS {
        let Some(value) = record.remove(*alias) else {
            continue;
        };
        // an empty alias must not erase a value another alias already supplied
        if is_blank(&value) && record.contains_key(*column) {
            continue;
        }
        record.insert((*column).to_owned(), value);
    }
}

fn apply_status(record: &mut FieldMap) {
    let Some(status) = record.remove(STATUS) else {
        return;
    };
    if is_blank(&status) {
        return;
    }

    let is_available = status.as_str() == Some(VehicleStatus::Available.as_str());
    if !is_available && status.as_str() != Some(VehicleStatus::Sold.as_str()) {
        debug!(status = %status, "status has no storage counterpart, persisting as unavailable");
    }
    record.insert(IS_AVAILABLE.to_owned(), Value::Bool(is_available));
}

pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn normalize_column(column: &str, value: &Value) -> Option<Value> {
    if INTEGER_COLUMNS.contains(&column) {
        return as_integer(value).map(Value::from);
    }
    if BOOLEAN_COLUMNS.contains(&column) {
        return as_bool(value).map(Value::Bool);
    }
    match column {
        "price" => as_number(value).and_then(Number::from_f64).map(Value::Number),
        FEATURES => as_features(value),
        _ => as_text(value).map(Value::String),
    }
}

pub(crate) fn as_integer(value: &Value) -> Option<i32> {
    let n = match value {
        Value::Number(n) => n.as_i64().or_else(|| whole(n.as_f64()?))?,
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| whole(s.parse::<f64>().ok()?))?
        }
        _ => return None,
    };
    i32::try_from(n).ok()
}

fn whole(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

pub(crate) fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64()? {
            1 => Some(true),
            0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_owned()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_features(value: &Value) -> Option<Value> {
    match value {
        Value::Array(items) => Some(Value::Array(
            items
                .iter()
                .filter(|item| item.is_string() && !is_blank(item))
                .cloned()
                .collect(),
        )),
        Value::String(s) => Some(Value::Array(
            s.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(Value::from)
                .collect(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> FieldMap {
        match value {
            Value::Object(m) => m,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn storage_shape_contains_only_allow_listed_columns() {
        let storage = to_storage_shape(map(json!({
            "make": "Toyota",
            "model": "Corolla",
            "bodyType": "Sedan",
            "stockNumber": "A-113",
            "doors": 4,
            "createdAt": "2024-01-01T00:00:00Z",
            "id": "c0a8012e-0000-0000-0000-000000000000",
            "images": [{"url": "https://cdn/1.jpg"}],
            "imageFiles": ["1.jpg"],
        })));

        assert!(storage.keys().all(|k| STORAGE_COLUMNS.contains(&k.as_str())));
        assert_eq!(storage["make"], "Toyota");
        assert_eq!(storage["body_style"], "Sedan");
        assert!(!storage.contains_key("images"));
        assert!(!storage.contains_key("stockNumber"));
    }

    #[test]
    fn every_body_style_alias_yields_the_same_storage_record() {
        let expected = to_storage_shape(map(json!({"make": "Ford", "bodyType": "SUV"})));
        for alias in ["bodyStyle", "body_type", "body_style"] {
            let storage = to_storage_shape(map(json!({"make": "Ford", alias: "SUV"})));
            assert_eq!(storage, expected, "alias `{alias}`");
        }
    }

    #[test]
    fn color_and_exterior_color_collapse_onto_one_column() {
        let from_color = to_storage_shape(map(json!({"color": "Blue"})));
        let from_exterior = to_storage_shape(map(json!({"exteriorColor": "Blue"})));

        assert_eq!(from_color, from_exterior);
        assert_eq!(from_color["exterior_color"], "Blue");
        assert!(!from_color.contains_key("color"));
    }

    #[test]
    fn later_synonym_wins_when_aliases_disagree() {
        let storage = to_storage_shape(map(json!({"color": "Red", "exteriorColor": "Blue"})));
        assert_eq!(storage["exterior_color"], "Blue");
    }

    #[test]
    fn blank_alias_does_not_erase_a_supplied_value() {
        let storage = to_storage_shape(map(json!({"bodyType": "Coupe", "bodyStyle": ""})));
        assert_eq!(storage["body_style"], "Coupe");
    }

    #[test]
    fn status_available_becomes_is_available_true() {
        let storage = to_storage_shape(map(json!({"make": "Kia", "status": "Available"})));
        assert_eq!(storage["is_available"], true);
        assert!(!storage.contains_key("status"));
    }

    #[test]
    fn status_sold_becomes_is_available_false() {
        let storage = to_storage_shape(map(json!({"status": "Sold"})));
        assert_eq!(storage["is_available"], false);
    }

    #[test]
    fn pending_and_draft_statuses_collapse_to_unavailable() {
        for status in ["Pending", "Draft"] {
            let storage = to_storage_shape(map(json!({"status": status})));
            assert_eq!(storage["is_available"], false, "status `{status}`");
        }
    }

    #[test]
    fn status_overrides_is_available_alias() {
        let storage = to_storage_shape(map(json!({"isAvailable": true, "status": "Sold"})));
        assert_eq!(storage["is_available"], false);
    }

    #[test]
    fn blank_values_are_dropped_and_flags_defaulted() {
        let storage = to_storage_shape(map(json!({
            "make": "Honda",
            "vin": "",
            "engine": null,
            "description": "",
        })));

        assert_eq!(
            storage,
            map(json!({"make": "Honda", "is_available": true, "is_featured": false}))
        );
    }

    #[test]
    fn explicit_flags_are_kept() {
        let storage = to_storage_shape(map(json!({"isFeatured": true, "isAvailable": "false"})));
        assert_eq!(storage["is_featured"], true);
        assert_eq!(storage["is_available"], false);
    }

    #[test]
    fn numeric_columns_accept_form_strings() {
        let storage = to_storage_shape(map(json!({
            "year": "2021",
            "mileage": 42000.0,
            "price": "18999.50",
        })));

        assert_eq!(storage["year"], 2021);
        assert_eq!(storage["mileage"], 42000);
        assert_eq!(storage["price"], 18999.5);
    }

    #[test]
    fn unparsable_numbers_are_dropped() {
        let storage = to_storage_shape(map(json!({"year": "twenty", "mileage": 12.5})));
        assert!(!storage.contains_key("year"));
        assert!(!storage.contains_key("mileage"));
    }

    #[test]
    fn features_keep_order_and_accept_comma_lists() {
        let from_array = to_storage_shape(map(json!({"features": ["Sunroof", 3, "Heated seats"]})));
        assert_eq!(from_array["features"], json!(["Sunroof", "Heated seats"]));

        let from_text = to_storage_shape(map(json!({"features": "Sunroof, Heated seats,"})));
        assert_eq!(from_text["features"], json!(["Sunroof", "Heated seats"]));
    }

    #[test]
    fn storage_shape_is_idempotent() {
        let once = to_storage_shape(map(json!({
            "make": "Mazda",
            "bodyStyle": "Hatchback",
            "color": "Red",
            "fuelType": "Petrol",
            "status": "Sold",
            "features": ["Bluetooth"],
            "junk": 1,
        })));
        let twice = to_storage_shape(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn storage_shape_fits_the_write_model() {
        let changes = to_vehicle_changes(map(json!({
            "make": "BMW",
            "model": "320d",
            "year": 2019,
            "price": 21500,
            "mileage": 61000,
            "transmission": "Automatic",
            "engine": "2.0 Diesel",
            "vin": "WBA8E31090K000000",
            "description": "One owner",
            "dealerId": "dealer-7",
            "bodyType": "Sedan",
            "fuelType": "Diesel",
            "color": "Black",
            "interiorColor": "Beige",
            "status": "Available",
            "isFeatured": true,
            "features": ["Navigation"],
        })))
        .expect("allow-listed record");

        assert_eq!(changes.make.as_deref(), Some("BMW"));
        assert_eq!(changes.year, Some(2019));
        assert_eq!(changes.price, Some(21500.0));
        assert_eq!(changes.exterior_color.as_deref(), Some("Black"));
        assert_eq!(changes.is_available, Some(true));
        assert_eq!(changes.is_featured, Some(true));
        assert_eq!(changes.features, Some(vec!["Navigation".to_owned()]));
    }

    #[test]
    fn frontend_status_is_derived_from_availability() {
        let available = to_frontend_shape(map(json!({"is_available": true})));
        let sold = to_frontend_shape(map(json!({"is_available": false})));
        let draft = to_frontend_shape(map(json!({"make": "Audi"})));
        let null = to_frontend_shape(map(json!({"is_available": null})));

        assert_eq!(available["status"], "Available");
        assert_eq!(sold["status"], "Sold");
        assert_eq!(draft["status"], "Draft");
        assert_eq!(null["status"], "Draft");
        assert!(!available.contains_key("is_available"));
        assert_eq!(available["isAvailable"], true);
        assert!(!draft.contains_key("isAvailable"));
    }

    #[test]
    fn frontend_shape_fills_every_alias() {
        let frontend = to_frontend_shape(map(json!({
            "exterior_color": "Blue",
            "body_style": "SUV",
            "fuel_type": "Hybrid",
            "dealer_id": "dealer-1",
        })));

        assert_eq!(frontend["exteriorColor"], "Blue");
        assert_eq!(frontend["color"], "Blue");
        assert_eq!(frontend["bodyType"], "SUV");
        assert_eq!(frontend["bodyStyle"], "SUV");
        assert_eq!(frontend["fuelType"], "Hybrid");
        assert_eq!(frontend["dealerId"], "dealer-1");
        assert!(!frontend.contains_key("exterior_color"));
    }

    #[test]
    fn frontend_shape_leaves_missing_scalars_absent() {
        let frontend = to_frontend_shape(map(json!({"make": "Fiat", "vin": null, "interior_color": null})));

        assert!(!frontend.contains_key("vin"));
        assert!(!frontend.contains_key("interiorColor"));
        assert_eq!(frontend["features"], json!([]));
    }

    #[test]
    fn color_round_trips_through_storage() {
        let frontend = to_frontend_shape(to_storage_shape(map(json!({"make": "VW", "color": "Green"}))));
        assert_eq!(frontend["exteriorColor"], "Green");
        assert_eq!(frontend["color"], "Green");
    }

    #[test]
    fn round_trip_is_identity_up_to_renaming() {
        let original = map(json!({
            "make": "Volvo",
            "model": "XC60",
            "year": 2022,
            "bodyType": "SUV",
            "bodyStyle": "SUV",
            "fuelType": "Electric",
            "color": "White",
            "exteriorColor": "White",
            "interiorColor": "Black",
            "isFeatured": false,
            "isAvailable": false,
            "status": "Sold",
            "features": ["Tow bar", "Panoramic roof"],
        }));

        assert_eq!(to_frontend_shape(to_storage_shape(original.clone())), original);
    }

    #[test]
    fn is_available_alias_survives_a_round_trip() {
        let frontend = to_frontend_shape(to_storage_shape(map(json!({"isAvailable": false}))));

        assert_eq!(frontend["isAvailable"], false);
        assert_eq!(frontend["status"], "Sold");
        assert!(!frontend.contains_key("is_available"));
    }

    #[test]
    fn numeric_flags_are_read_as_booleans() {
        let storage = to_storage_shape(map(json!({"isAvailable": 0, "isFeatured": "1"})));
        assert_eq!(storage["is_available"], false);
        assert_eq!(storage["is_featured"], true);

        let unparsable = to_storage_shape(map(json!({"isAvailable": 2})));
        assert_eq!(unparsable["is_available"], true);
    }

    #[test]
    fn patch_carries_only_supplied_columns() {
        let patch = to_storage_patch(map(json!({"price": "12500", "junk": true})));
        assert_eq!(patch, map(json!({"price": 12500.0})));

        let changes = to_vehicle_patch(map(json!({"price": 12500}))).expect("patch");
        assert_eq!(changes.price, Some(12500.0));
        assert_eq!(changes.is_available, None);
        assert_eq!(changes.is_featured, None);
        assert_eq!(changes.make, None);
    }

    #[test]
    fn nested_images_are_renamed_in_order() {
        let frontend = to_frontend_shape(map(json!({
            "make": "Seat",
            "vehicle_images": [
                {"url": "https://cdn/a.jpg", "public_id": "veh/a", "sort_order": 0, "is_primary": true},
                {"url": "https://cdn/b.jpg", "public_id": "veh/b", "sort_order": 1, "is_primary": false},
            ],
        })));

        assert!(!frontend.contains_key("vehicle_images"));
        assert_eq!(
            frontend["images"],
            json!([
                {"url": "https://cdn/a.jpg", "publicId": "veh/a", "displayOrder": 0, "isPrimary": true},
                {"url": "https://cdn/b.jpg", "publicId": "veh/b", "displayOrder": 1, "isPrimary": false},
            ])
        );
    }

    #[test]
    fn nested_videos_are_renamed() {
        let frontend = to_frontend_shape(map(json!({
            "vehicle_videos": [{"url": "https://cdn/v.mp4", "public_id": "veh/v", "display_order": 3}],
        })));

        assert_eq!(
            frontend["videos"],
            json!([{"url": "https://cdn/v.mp4", "publicId": "veh/v", "displayOrder": 3}])
        );
    }
}
