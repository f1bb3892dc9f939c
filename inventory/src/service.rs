use crate::error::InventoryError;
use crate::mapping::{FieldMap, to_frontend_shape, to_vehicle_changes, to_vehicle_patch};
use crate::media::{MediaKind, MediaRemoval, RemovalOutcome, media_to_frontend_shape, to_new_media};
use crate::store::{VehicleStoreExt, VehicleWithMedia};
use common::bucket::AssetStoreExt;
use futures::StreamExt;
use serde_json::Value;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Upper bound and default for one listing page.
pub const MAX_LIST_LIMIT: i64 = 500;

#[derive(Debug, Clone)]
pub struct VehicleUpdate {
    pub vehicle: FieldMap,
    pub removed_media: Vec<MediaRemoval>,
}

#[derive(Debug, Clone)]
pub struct VehicleDeletion {
    pub id: Uuid,
    pub removed_media: Vec<MediaRemoval>,
}

impl VehicleDeletion {
    pub fn is_complete(&self) -> bool {
        self.removed_media.iter().all(|m| m.outcome.is_complete())
    }
}

/// Create/read/update/delete of vehicles in frontend shape. Every record
/// crossing this boundary goes through the mapping module.
pub struct VehicleService<S, A> {
    store: S,
    assets: A,
}

impl<S, A> VehicleService<S, A>
where
    S: VehicleStoreExt + Send + Sync,
    A: AssetStoreExt + Send + Sync,
{
    pub fn new(store: S, assets: A) -> Self {
        Self { store, assets }
    }

    /// Newest vehicles first, at most `limit` of them (clamped to
    /// `1..=MAX_LIST_LIMIT`, default [`MAX_LIST_LIMIT`]).
    #[instrument(skip(self))]
    pub async fn list(&self, limit: Option<i64>) -> Result<Vec<FieldMap>, InventoryError> {
        let limit = limit.unwrap_or(MAX_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        self.store
            .list_vehicles(limit)
            .await?
            .into_iter()
            .map(frontend_record)
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<FieldMap, InventoryError> {
        let vehicle = self
            .store
            .find_vehicle(id)
            .await?
            .ok_or(InventoryError::VehicleNotFound(id))?;
        frontend_record(vehicle)
    }

    #[instrument(skip_all)]
    pub async fn create(&self, input: FieldMap) -> Result<FieldMap, InventoryError> {
        let changes = to_vehicle_changes(input)?;
        let vehicle = self.store.insert_vehicle(changes).await?;
        info!(id = %vehicle.id, "vehicle created");
        frontend_record(VehicleWithMedia {
            vehicle,
            images: Vec::new(),
            videos: Vec::new(),
        })
    }

    /// Applies `input` as a patch, columns it does not mention keep their
    /// value, and then removes the media listed in `remove_media`. Media is
    /// left alone when the record update fails.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: FieldMap,
        remove_media: &[String],
    ) -> Result<VehicleUpdate, InventoryError> {
        let changes = to_vehicle_patch(input)?;
        self.store
            .update_vehicle(id, changes)
            .await?
            .ok_or(InventoryError::VehicleNotFound(id))?;

        let removed_media = self.remove_many(remove_media.iter().cloned()).await;
        let vehicle = self.get(id).await?;
        Ok(VehicleUpdate {
            vehicle,
            removed_media,
        })
    }

    /// Releases every media item of the vehicle, then deletes the row.
    /// Rows without a `public_id` go with the vehicle through the foreign key.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<VehicleDeletion, InventoryError> {
        if self.store.find_vehicle(id).await?.is_none() {
            return Err(InventoryError::VehicleNotFound(id));
        }

        let public_ids = self.store.media_public_ids(id).await?;
        let removed_media = self.remove_many(public_ids).await;
        if !self.store.delete_vehicle(id).await? {
            return Err(InventoryError::VehicleNotFound(id));
        }

        let deletion = VehicleDeletion { id, removed_media };
        if deletion.is_complete() {
            info!(%id, "vehicle deleted");
        } else {
            warn!(%id, "vehicle deleted, some media could not be released");
        }
        Ok(deletion)
    }

    #[instrument(skip(self, input))]
    pub async fn add_media(
        &self,
        vehicle_id: Uuid,
        kind: MediaKind,
        input: FieldMap,
    ) -> Result<FieldMap, InventoryError> {
        let media = to_new_media(input)?;
        if self.store.find_vehicle(vehicle_id).await?.is_none() {
            return Err(InventoryError::VehicleNotFound(vehicle_id));
        }
        let stored = self.store.insert_media(vehicle_id, kind, media).await?;
        match serde_json::to_value(stored)? {
            Value::Object(row) => Ok(media_to_frontend_shape(row)),
            other => Err(InventoryError::InvalidRecord(format!(
                "media row did not serialize to an object: {other}"
            ))),
        }
    }

    /// Deletes the media row and the asset behind `public_id` independently.
    /// A missing row counts as removed so a retry after a partial failure
    /// converges.
    #[instrument(skip(self))]
    pub async fn remove_media(&self, public_id: &str) -> MediaRemoval {
        let (row, asset) = tokio::join!(
            self.store.delete_media(public_id),
            self.assets.delete_asset(public_id)
        );
        let outcome = RemovalOutcome::from_halves(
            row.map(|_| ()).map_err(|e| e.to_string()),
            asset.map_err(|e| e.to_string()),
        );
        if !outcome.is_complete() {
            error!(outcome = ?outcome, "media removal incomplete");
        }
        MediaRemoval {
            public_id: public_id.to_owned(),
            outcome,
        }
    }

    async fn remove_many(&self, public_ids: impl IntoIterator<Item = String>) -> Vec<MediaRemoval> {
        futures::stream::iter(public_ids)
            .then(|public_id| async move { self.remove_media(&public_id).await })
            .collect()
            .await
    }
}

fn frontend_record(vehicle: VehicleWithMedia) -> Result<FieldMap, InventoryError> {
    Ok(to_frontend_shape(vehicle.into_storage_shape()?))
}
