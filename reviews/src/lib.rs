pub mod cache;
pub mod fallback;
pub mod gateway;
pub mod models;
pub mod provider;

pub use cache::{CachedReviews, PgReviewsCache, ReviewsCacheExt};
pub use gateway::{LookupOutcome, ReviewsGateway, ReviewsLookup};
pub use models::{Review, ReviewSource, ReviewsPayload};
pub use provider::{GooglePlacesProvider, ReviewsProviderExt};
