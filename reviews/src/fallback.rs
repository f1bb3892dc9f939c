use crate::models::{Review, ReviewSource, ReviewsPayload};

/// (author, rating, text, date)
const CANNED_REVIEWS: &[(&str, u8, &str, &str)] = &[
    (
        "Maria K.",
        5,
        "Friendly team and a spotless car. The whole purchase took less than an hour.",
        "2024-09-14T10:00:00Z",
    ),
    (
        "Tomasz W.",
        5,
        "Honest description of the vehicle, no surprises at pickup. Would buy here again.",
        "2024-08-02T15:30:00Z",
    ),
    (
        "Daniel R.",
        4,
        "Good selection and fair prices. Financing paperwork was quick.",
        "2024-06-21T09:15:00Z",
    ),
];

/// Static reviews served when neither the cache nor the provider can answer.
pub fn fallback_reviews() -> ReviewsPayload {
    let reviews: Vec<Review> = CANNED_REVIEWS
        .iter()
        .map(|(author, rating, text, date)| Review {
            author: (*author).to_owned(),
            rating: *rating,
            text: (*text).to_owned(),
            date: (*date).to_owned(),
            photo: None,
            source: ReviewSource::Fallback,
        })
        .collect();

    let total: u64 = reviews.iter().map(|r| u64::from(r.rating)).sum();
    let rating = total as f64 / reviews.len().max(1) as f64;

    ReviewsPayload {
        rating: (rating * 10.0).round() / 10.0,
        total_reviews: reviews.len() as u64,
        reviews,
        source: ReviewSource::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_tagged_and_within_rating_bounds() {
        let payload = fallback_reviews();

        assert_eq!(payload.source, ReviewSource::Fallback);
        assert_eq!(payload.total_reviews, payload.reviews.len() as u64);
        assert!(!payload.reviews.is_empty());
        assert!(payload.reviews.iter().all(|r| (1..=5).contains(&r.rating)));
        assert!(payload.reviews.iter().all(|r| r.source == ReviewSource::Fallback));
        assert_eq!(payload.rating, 4.7);
    }
}
