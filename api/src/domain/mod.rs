use inventory::FieldMap;
use inventory::media::{MediaRemoval, RemovalOutcome};
use inventory::service::{VehicleDeletion, VehicleUpdate};
use reviews::{Review, ReviewsPayload};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// A vehicle in frontend shape: camelCase keys, derived `status`, nested
/// `images` and `videos`. Input records may use any accepted synonym.
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object, example = json!({
    "make": "Skoda",
    "model": "Octavia",
    "year": 2020,
    "price": 14500,
    "bodyType": "Estate",
    "color": "Grey",
    "status": "Available",
    "features": ["Cruise control"]
}))]
pub struct VehicleRecord(pub FieldMap);

/// A media row in frontend shape.
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object, example = json!({
    "url": "https://cdn.example.com/vehicles/octavia-front.jpg",
    "publicId": "vehicles/octavia-front",
    "isPrimary": true,
    "displayOrder": 0
}))]
pub struct MediaRecord(pub FieldMap);

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Maximum number of vehicles to return, clamped to `1..=500`; defaults to 500.
    pub limit: Option<i64>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    /// Public ids of images to release after the record is updated.
    #[serde(default)]
    pub remove_images: Vec<String>,
    #[serde(default)]
    pub remove_videos: Vec<String>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub vehicle: FieldMap,
}

impl UpdateVehicleRequest {
    pub fn media_to_remove(&self) -> Vec<String> {
        self.remove_images
            .iter()
            .chain(&self.remove_videos)
            .filter(|public_id| !public_id.trim().is_empty())
            .cloned()
            .collect()
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaRemovalReport {
    pub public_id: String,
    /// One of `removed`, `row_only`, `asset_only`, `failed`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_error: Option<String>,
}

impl From<MediaRemoval> for MediaRemovalReport {
    fn from(value: MediaRemoval) -> Self {
        let (status, row_error, asset_error) = match value.outcome {
            RemovalOutcome::Removed => ("removed", None, None),
            RemovalOutcome::RowOnly { asset_error } => ("row_only", None, Some(asset_error)),
            RemovalOutcome::AssetOnly { row_error } => ("asset_only", Some(row_error), None),
            RemovalOutcome::Failed {
                row_error,
                asset_error,
            } => ("failed", Some(row_error), Some(asset_error)),
        };
        Self {
            public_id: value.public_id,
            status: status.to_string(),
            row_error,
            asset_error,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleUpdateResponse {
    pub vehicle: VehicleRecord,
    pub removed_media: Vec<MediaRemovalReport>,
}

impl From<VehicleUpdate> for VehicleUpdateResponse {
    fn from(value: VehicleUpdate) -> Self {
        Self {
            vehicle: VehicleRecord(value.vehicle),
            removed_media: value.removed_media.into_iter().map(|x| x.into()).collect(),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDeletionResponse {
    pub id: Uuid,
    pub removed_media: Vec<MediaRemovalReport>,
}

impl From<VehicleDeletion> for VehicleDeletionResponse {
    fn from(value: VehicleDeletion) -> Self {
        Self {
            id: value.id,
            removed_media: value.removed_media.into_iter().map(|x| x.into()).collect(),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub author: String,
    pub rating: u8,
    pub text: String,
    #[schema(example = "2024-09-14T10:00:00Z")]
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// `google` or `fallback`.
    pub source: String,
}

impl From<Review> for ReviewResponse {
    fn from(value: Review) -> Self {
        Self {
            author: value.author,
            rating: value.rating,
            text: value.text,
            date: value.date,
            photo: value.photo,
            source: source_tag(&value.source),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsResponse {
    pub rating: f64,
    pub total_reviews: u64,
    pub reviews: Vec<ReviewResponse>,
    pub source: String,
}

impl From<ReviewsPayload> for ReviewsResponse {
    fn from(value: ReviewsPayload) -> Self {
        Self {
            rating: value.rating,
            total_reviews: value.total_reviews,
            reviews: value.reviews.into_iter().map(|x| x.into()).collect(),
            source: source_tag(&value.source),
        }
    }
}

fn source_tag<T: Serialize>(source: &T) -> String {
    match serde_json::to_value(source) {
        Ok(serde_json::Value::String(tag)) => tag,
        _ => String::new(),
    }
}
