use crate::error::InventoryError;
use crate::mapping::FieldMap;
use crate::media::{MediaKind, NewMedia};
use async_trait::async_trait;
use common::persistence::PgPool;
use common::persistence::models::inventory::{
    NewVehicleImage, NewVehicleVideo, Vehicle, VehicleChanges, VehicleImage, VehicleVideo,
};
use common::persistence::schema::{vehicle_images, vehicle_videos, vehicles};
use diesel::{
    BelongingToDsl, ExpressionMethods, GroupedBy, OptionalExtension, QueryDsl, SelectableHelper,
};
use diesel_async::RunQueryDsl;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

/// A `vehicles` row with its child media, each list in display order.
#[derive(Debug, Clone)]
pub struct VehicleWithMedia {
    pub vehicle: Vehicle,
    pub images: Vec<VehicleImage>,
    pub videos: Vec<VehicleVideo>,
}

impl VehicleWithMedia {
    /// The row in storage shape, children nested under `vehicle_images` and
    /// `vehicle_videos`.
    pub fn into_storage_shape(self) -> Result<FieldMap, InventoryError> {
        let mut record = match serde_json::to_value(&self.vehicle)? {
            Value::Object(record) => record,
            other => {
                return Err(InventoryError::InvalidRecord(format!(
                    "vehicle row did not serialize to an object: {other}"
                )));
            }
        };
        record.insert("vehicle_images".to_owned(), serde_json::to_value(&self.images)?);
        record.insert("vehicle_videos".to_owned(), serde_json::to_value(&self.videos)?);
        Ok(record)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StoredMedia {
    Image(VehicleImage),
    Video(VehicleVideo),
}

#[async_trait]
pub trait VehicleStoreExt {
    async fn list_vehicles(&self, limit: i64) -> Result<Vec<VehicleWithMedia>, InventoryError>;

    async fn find_vehicle(&self, id: Uuid) -> Result<Option<VehicleWithMedia>, InventoryError>;

    async fn insert_vehicle(&self, changes: VehicleChanges) -> Result<Vehicle, InventoryError>;

    async fn update_vehicle(
        &self,
        id: Uuid,
        changes: VehicleChanges,
    ) -> Result<Option<Vehicle>, InventoryError>;

    /// Deletes the vehicle row only; media rows are removed by the caller
    /// beforehand so their assets can be released too.
    async fn delete_vehicle(&self, id: Uuid) -> Result<bool, InventoryError>;

    async fn insert_media(
        &self,
        vehicle_id: Uuid,
        kind: MediaKind,
        media: NewMedia,
    ) -> Result<StoredMedia, InventoryError>;

    async fn media_public_ids(&self, vehicle_id: Uuid) -> Result<Vec<String>, InventoryError>;

    /// Deletes every image or video row carrying `public_id`.
    async fn delete_media(&self, public_id: &str) -> Result<usize, InventoryError>;
}

/// Do not wrap `PgVehicleStore` in an [`std::sync::Arc`], the pool is
/// already reference counted.
#[derive(Clone)]
pub struct PgVehicleStore {
    pool: PgPool,
}

impl PgVehicleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleStoreExt for PgVehicleStore {
    #[instrument(skip(self))]
    async fn list_vehicles(&self, limit: i64) -> Result<Vec<VehicleWithMedia>, InventoryError> {
        let mut conn = self.pool.get().await?;
        let all_vehicles = vehicles::table
            .order(vehicles::created_at.desc())
            .limit(limit)
            .select(Vehicle::as_select())
            .load(&mut conn)
            .await?;

        let all_images = VehicleImage::belonging_to(&all_vehicles)
            .order(vehicle_images::sort_order.asc())
            .select(VehicleImage::as_select())
            .load(&mut conn)
            .await?;
        let all_videos = VehicleVideo::belonging_to(&all_vehicles)
            .order(vehicle_videos::sort_order.asc())
            .select(VehicleVideo::as_select())
            .load(&mut conn)
            .await?;
        debug!(
            "loaded `{}` vehicles with `{}` images and `{}` videos",
            all_vehicles.len(),
            all_images.len(),
            all_videos.len()
        );

        let images_per_vehicle = all_images.grouped_by(&all_vehicles);
        let videos_per_vehicle = all_videos.grouped_by(&all_vehicles);
        Ok(all_vehicles
            .into_iter()
            .zip(images_per_vehicle)
            .zip(videos_per_vehicle)
            .map(|((vehicle, images), videos)| VehicleWithMedia {
                vehicle,
                images,
                videos,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn find_vehicle(&self, id: Uuid) -> Result<Option<VehicleWithMedia>, InventoryError> {
        let mut conn = self.pool.get().await?;
        let Some(vehicle) = vehicles::table
            .find(id)
            .select(Vehicle::as_select())
            .first(&mut conn)
            .await
            .optional()?
        else {
            return Ok(None);
        };

        let images = VehicleImage::belonging_to(&vehicle)
            .order(vehicle_images::sort_order.asc())
            .select(VehicleImage::as_select())
            .load(&mut conn)
            .await?;
        let videos = VehicleVideo::belonging_to(&vehicle)
            .order(vehicle_videos::sort_order.asc())
            .select(VehicleVideo::as_select())
            .load(&mut conn)
            .await?;

        Ok(Some(VehicleWithMedia {
            vehicle,
            images,
            videos,
        }))
    }

    #[instrument(skip_all)]
    async fn insert_vehicle(&self, changes: VehicleChanges) -> Result<Vehicle, InventoryError> {
        let mut conn = self.pool.get().await?;
        let vehicle = diesel::insert_into(vehicles::table)
            .values(&changes)
            .returning(Vehicle::as_returning())
            .get_result(&mut conn)
            .await?;
        debug!(id = %vehicle.id, "inserted vehicle");
        Ok(vehicle)
    }

    #[instrument(skip(self, changes))]
    async fn update_vehicle(
        &self,
        id: Uuid,
        changes: VehicleChanges,
    ) -> Result<Option<Vehicle>, InventoryError> {
        let mut conn = self.pool.get().await?;
        Ok(diesel::update(vehicles::table.find(id))
            .set((&changes, vehicles::updated_at.eq(diesel::dsl::now)))
            .returning(Vehicle::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?)
    }

    #[instrument(skip(self))]
    async fn delete_vehicle(&self, id: Uuid) -> Result<bool, InventoryError> {
        let mut conn = self.pool.get().await?;
        let n = diesel::delete(vehicles::table.find(id))
            .execute(&mut conn)
            .await?;
        Ok(n > 0)
    }

    #[instrument(skip(self, media))]
    async fn insert_media(
        &self,
        vehicle_id: Uuid,
        kind: MediaKind,
        media: NewMedia,
    ) -> Result<StoredMedia, InventoryError> {
        let mut conn = self.pool.get().await?;
        let stored = match kind {
            MediaKind::Image => StoredMedia::Image(
                diesel::insert_into(vehicle_images::table)
                    .values(NewVehicleImage {
                        vehicle_id,
                        url: media.url,
                        public_id: media.public_id,
                        is_primary: media.is_primary,
                        sort_order: media.sort_order,
                    })
                    .returning(VehicleImage::as_returning())
                    .get_result(&mut conn)
                    .await?,
            ),
            MediaKind::Video => StoredMedia::Video(
                diesel::insert_into(vehicle_videos::table)
                    .values(NewVehicleVideo {
                        vehicle_id,
                        url: media.url,
                        public_id: media.public_id,
                        is_primary: media.is_primary,
                        sort_order: media.sort_order,
                    })
                    .returning(VehicleVideo::as_returning())
                    .get_result(&mut conn)
                    .await?,
            ),
        };
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn media_public_ids(&self, vehicle_id: Uuid) -> Result<Vec<String>, InventoryError> {
        let mut conn = self.pool.get().await?;
        let image_ids = vehicle_images::table
            .filter(vehicle_images::vehicle_id.eq(vehicle_id))
            .filter(vehicle_images::public_id.is_not_null())
            .select(vehicle_images::public_id)
            .load::<Option<String>>(&mut conn)
            .await?;
        let video_ids = vehicle_videos::table
            .filter(vehicle_videos::vehicle_id.eq(vehicle_id))
            .filter(vehicle_videos::public_id.is_not_null())
            .select(vehicle_videos::public_id)
            .load::<Option<String>>(&mut conn)
            .await?;

        Ok(image_ids.into_iter().chain(video_ids).flatten().collect())
    }

    #[instrument(skip(self))]
    async fn delete_media(&self, public_id: &str) -> Result<usize, InventoryError> {
        let mut conn = self.pool.get().await?;
        let images = diesel::delete(
            vehicle_images::table.filter(vehicle_images::public_id.eq(public_id)),
        )
        .execute(&mut conn)
        .await?;
        let videos = diesel::delete(
            vehicle_videos::table.filter(vehicle_videos::public_id.eq(public_id)),
        )
        .execute(&mut conn)
        .await?;
        debug!("deleted `{images}` image rows and `{videos}` video rows");
        Ok(images + videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn storage_shape_nests_children_under_table_names() {
        let created_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let vehicle_id = Uuid::new_v4();
        let record = VehicleWithMedia {
            vehicle: Vehicle {
                id: vehicle_id,
                make: Some("Skoda".into()),
                model: Some("Octavia".into()),
                year: Some(2020),
                price: Some(14500.0),
                mileage: None,
                transmission: None,
                engine: None,
                vin: None,
                description: None,
                dealer_id: None,
                body_style: Some("Estate".into()),
                fuel_type: None,
                exterior_color: Some("Grey".into()),
                interior_color: None,
                is_available: Some(true),
                is_featured: false,
                features: vec!["Cruise control".into()],
                created_at,
                updated_at: created_at,
            },
            images: vec![VehicleImage {
                id: Uuid::new_v4(),
                vehicle_id,
                url: "https://cdn/o.jpg".into(),
                public_id: Some("vehicles/o".into()),
                is_primary: true,
                sort_order: 0,
                created_at,
            }],
            videos: vec![],
        }
        .into_storage_shape()
        .expect("serializable row");

        assert_eq!(record["make"], "Skoda");
        assert_eq!(record["body_style"], "Estate");
        assert_eq!(record["vehicle_images"][0]["public_id"], "vehicles/o");
        assert_eq!(record["vehicle_videos"], serde_json::json!([]));
        assert!(record["mileage"].is_null());
    }
}
