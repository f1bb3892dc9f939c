use crate::cache::ReviewsCacheExt;
use crate::fallback::fallback_reviews;
use crate::models::ReviewsPayload;
use crate::provider::ReviewsProviderExt;
use chrono::{DateTime, TimeDelta, Utc};
use common::error::GeneralError;
use serde::Serialize;
use tracing::{debug, error, instrument, warn};

pub const FRESHNESS_WINDOW_SECS: i64 = 3600;

pub fn is_fresh(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(updated_at) < TimeDelta::seconds(FRESHNESS_WINDOW_SECS)
}

/// How a lookup was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupOutcome {
    FreshCacheHit,
    LiveFetchOk,
    FallbackServed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewsLookup {
    pub payload: ReviewsPayload,
    pub outcome: LookupOutcome,
}

enum LookupState {
    Start,
    FreshCacheHit(ReviewsPayload),
    StaleOrMissing,
    LiveFetchOk(ReviewsPayload),
    LiveFetchFailed(GeneralError),
    FallbackServed,
}

pub struct ReviewsGateway<C, P> {
    cache: C,
    provider: P,
}

impl<C, P> ReviewsGateway<C, P>
where
    C: ReviewsCacheExt + Send + Sync,
    P: ReviewsProviderExt + Send + Sync,
{
    pub fn new(cache: C, provider: P) -> Self {
        Self { cache, provider }
    }

    /// Never fails: every provider or cache problem ends in the fallback
    /// payload or the live payload, and is only logged.
    #[instrument(skip(self))]
    pub async fn lookup(&self, place_id: &str) -> ReviewsLookup {
        let now = Utc::now();
        let mut state = LookupState::Start;
        loop {
            state = match state {
                LookupState::Start => match self.cache.get(place_id).await {
                    Ok(Some(entry)) if is_fresh(entry.updated_at, now) => {
                        LookupState::FreshCacheHit(entry.payload)
                    }
                    Ok(Some(entry)) => {
                        debug!("cache entry from `{}` is stale", entry.updated_at);
                        LookupState::StaleOrMissing
                    }
                    Ok(None) => LookupState::StaleOrMissing,
                    Err(e) => {
                        warn!(cache_error = ?e, "reviews cache read failed, treating as miss");
                        LookupState::StaleOrMissing
                    }
                },
                LookupState::FreshCacheHit(payload) => {
                    debug!("serving reviews from cache");
                    return ReviewsLookup {
                        payload,
                        outcome: LookupOutcome::FreshCacheHit,
                    };
                }
                LookupState::StaleOrMissing => match self.provider.fetch(place_id).await {
                    Ok(payload) => LookupState::LiveFetchOk(payload),
                    Err(e) => LookupState::LiveFetchFailed(e),
                },
                LookupState::LiveFetchOk(payload) => {
                    if let Err(e) = self.cache.upsert(place_id, &payload, now).await {
                        error!(cache_error = ?e, "reviews cache upsert failed");
                    }
                    return ReviewsLookup {
                        payload,
                        outcome: LookupOutcome::LiveFetchOk,
                    };
                }
                LookupState::LiveFetchFailed(e) => {
                    warn!(provider_error = ?e, "live reviews fetch failed");
                    LookupState::FallbackServed
                }
                LookupState::FallbackServed => {
                    return ReviewsLookup {
                        payload: fallback_reviews(),
                        outcome: LookupOutcome::FallbackServed,
                    };
                }
            };
        }
    }
}
