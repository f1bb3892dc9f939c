use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewSource {
    Google,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub author: String,
    /// Always within `1..=5`.
    pub rating: u8,
    pub text: String,
    /// RFC 3339 / ISO 8601 timestamp.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub source: ReviewSource,
}

/// What the storefront renders and what the cache stores as `reviews_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsPayload {
    pub rating: f64,
    pub total_reviews: u64,
    pub reviews: Vec<Review>,
    pub source: ReviewSource,
}

/// One review as the provider sends it. Every field is optional or loosely
/// typed since entries are validated one by one instead of failing the
/// whole response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReview {
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub text: Option<String>,
    /// Unix seconds.
    #[serde(default)]
    pub time: Value,
    #[serde(default)]
    pub profile_photo_url: Option<String>,
}

const MIN_RATING: f64 = 1.0;
const MAX_RATING: f64 = 5.0;

/// Keeps the reviews with an author, a text and a numeric timestamp, in
/// provider order.
pub fn transform_reviews(raw: Vec<RawReview>, source: ReviewSource) -> Vec<Review> {
    raw.into_iter()
        .filter_map(|review| transform_review(review, source))
        .collect()
}

fn transform_review(raw: RawReview, source: ReviewSource) -> Option<Review> {
    let author = raw.author_name.filter(|a| !a.trim().is_empty())?;
    let text = raw.text.filter(|t| !t.trim().is_empty())?;
    let date = unix_to_iso(raw.time.as_f64()?)?;
    let rating = raw
        .rating
        .and_then(|r| r.as_f64())
        .filter(|r| r.is_finite())
        .unwrap_or(MAX_RATING);

    Some(Review {
        author,
        rating: clamp_rating(rating),
        text,
        date,
        photo: raw.profile_photo_url.filter(|p| !p.is_empty()),
        source,
    })
}

pub fn clamp_rating(rating: f64) -> u8 {
    rating.round().clamp(MIN_RATING, MAX_RATING) as u8
}

fn unix_to_iso(seconds: f64) -> Option<String> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp(seconds.trunc() as i64, 0)
        .map(|date| date.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawReview {
        serde_json::from_value(value).expect("raw review")
    }

    #[test]
    fn invalid_timestamp_drops_only_that_review() {
        let reviews = transform_reviews(
            vec![
                raw(json!({"author_name": "Ana", "rating": 5, "text": "Great", "time": 1700000000})),
                raw(json!({"author_name": "Ben", "rating": 4, "text": "Good", "time": "invalid"})),
                raw(json!({"author_name": "Cy", "rating": 3, "text": "Fine", "time": 1700003600})),
            ],
            ReviewSource::Google,
        );

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].author, "Ana");
        assert_eq!(reviews[1].author, "Cy");
    }

    #[test]
    fn missing_author_or_text_is_dropped() {
        let reviews = transform_reviews(
            vec![
                raw(json!({"author_name": "", "text": "No name", "time": 1700000000})),
                raw(json!({"author_name": "Dee", "text": "  ", "time": 1700000000})),
                raw(json!({"text": "Anonymous", "time": 1700000000})),
            ],
            ReviewSource::Google,
        );

        assert!(reviews.is_empty());
    }

    #[test]
    fn ratings_are_clamped() {
        let reviews = transform_reviews(
            vec![
                raw(json!({"author_name": "Eve", "rating": 9, "text": "!", "time": 1})),
                raw(json!({"author_name": "Fay", "rating": 0, "text": "?", "time": 1})),
                raw(json!({"author_name": "Gus", "rating": "n/a", "text": ".", "time": 1})),
            ],
            ReviewSource::Google,
        );

        let ratings: Vec<u8> = reviews.iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![5, 1, 5]);
    }

    #[test]
    fn timestamp_becomes_iso_date_and_photo_is_kept() {
        let reviews = transform_reviews(
            vec![raw(json!({
                "author_name": "Hal",
                "rating": 4,
                "text": "Quick paperwork",
                "time": 1700000000,
                "profile_photo_url": "https://photos/hal.png",
            }))],
            ReviewSource::Google,
        );

        assert_eq!(reviews[0].date, "2023-11-14T22:13:20Z");
        assert_eq!(reviews[0].photo.as_deref(), Some("https://photos/hal.png"));
        assert_eq!(reviews[0].source, ReviewSource::Google);
    }

    #[test]
    fn payload_serializes_source_tag() {
        let payload = ReviewsPayload {
            rating: 4.5,
            total_reviews: 10,
            reviews: vec![],
            source: ReviewSource::Fallback,
        };
        assert_eq!(
            serde_json::to_value(&payload).expect("serializable"),
            json!({"rating": 4.5, "totalReviews": 10, "reviews": [], "source": "fallback"})
        );
    }
}
