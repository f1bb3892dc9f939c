use crate::models::ReviewsPayload;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::GeneralError;
use common::persistence::PgPool;
use common::persistence::models::reviews::{ReviewsCacheRow, ReviewsCacheUpsert};
use common::persistence::schema::google_reviews_cache;
use diesel::upsert::excluded;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct CachedReviews {
    pub payload: ReviewsPayload,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait ReviewsCacheExt {
    async fn get(&self, place_id: &str) -> Result<Option<CachedReviews>, GeneralError>;

    /// Inserts or replaces the entry for `place_id`.
    async fn upsert(
        &self,
        place_id: &str,
        payload: &ReviewsPayload,
        updated_at: DateTime<Utc>,
    ) -> Result<(), GeneralError>;
}

/// Do not wrap `PgReviewsCache` in an [`std::sync::Arc`], the pool is
/// already reference counted.
#[derive(Clone)]
pub struct PgReviewsCache {
    pool: PgPool,
}

impl PgReviewsCache {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewsCacheExt for PgReviewsCache {
    #[instrument(skip(self))]
    async fn get(&self, place_id: &str) -> Result<Option<CachedReviews>, GeneralError> {
        let mut conn = self.pool.get().await?;
        let Some(row) = google_reviews_cache::table
            .find(place_id)
            .select(ReviewsCacheRow::as_select())
            .first(&mut conn)
            .await
            .optional()?
        else {
            return Ok(None);
        };

        Ok(Some(CachedReviews {
            payload: serde_json::from_value(row.reviews_data)?,
            updated_at: row.updated_at,
        }))
    }

    #[instrument(skip(self, payload))]
    async fn upsert(
        &self,
        place_id: &str,
        payload: &ReviewsPayload,
        updated_at: DateTime<Utc>,
    ) -> Result<(), GeneralError> {
        let mut conn = self.pool.get().await?;
        let n = diesel::insert_into(google_reviews_cache::table)
            .values(ReviewsCacheUpsert {
                place_id,
                reviews_data: serde_json::to_value(payload)?,
                updated_at,
            })
            .on_conflict(google_reviews_cache::place_id)
            .do_update()
            .set((
                google_reviews_cache::reviews_data.eq(excluded(google_reviews_cache::reviews_data)),
                google_reviews_cache::updated_at.eq(excluded(google_reviews_cache::updated_at)),
            ))
            .execute(&mut conn)
            .await?;
        debug!("upserted `{n}` reviews cache rows");
        Ok(())
    }
}
