use crate::models::{RawReview, ReviewSource, ReviewsPayload, transform_reviews};
use async_trait::async_trait;
use common::config::CONFIG;
use common::error::GeneralError;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const DETAILS_PATH: &str = "/maps/api/place/details/json";
const DETAILS_FIELDS: &str = "rating,user_ratings_total,reviews";

#[async_trait]
pub trait ReviewsProviderExt {
    async fn fetch(&self, place_id: &str) -> Result<ReviewsPayload, GeneralError>;
}

#[derive(Debug, Deserialize)]
struct PlaceDetailsResponse {
    status: String,
    #[serde(default)]
    result: Option<PlaceDetails>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaceDetails {
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    user_ratings_total: Option<u64>,
    #[serde(default)]
    reviews: Vec<RawReview>,
}

/// Do not wrap `GooglePlacesProvider` in a [`Rc`] or [`Arc`]
/// because [`reqwest::Client`] uses an [`Arc`] internally.
#[derive(Clone)]
pub struct GooglePlacesProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GooglePlacesProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GeneralError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeneralError::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn from_config() -> Result<Self, GeneralError> {
        Self::new(
            CONFIG.reviews.base_url.as_str(),
            CONFIG.reviews.api_key.clone(),
            Duration::from_millis(CONFIG.reviews.timeout_ms),
        )
    }
}

fn http_error(e: reqwest::Error) -> GeneralError {
    if e.is_timeout() {
        GeneralError::Timeout(e.to_string())
    } else {
        GeneralError::Http(e.to_string())
    }
}

#[async_trait]
impl ReviewsProviderExt for GooglePlacesProvider {
    #[instrument(skip(self))]
    async fn fetch(&self, place_id: &str) -> Result<ReviewsPayload, GeneralError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(GeneralError::MissingCredentials);
        };

        let response = self
            .http
            .get(format!("{}{DETAILS_PATH}", self.base_url))
            .query(&[
                ("place_id", place_id),
                ("fields", DETAILS_FIELDS),
                ("key", api_key),
            ])
            .send()
            .await
            .map_err(http_error)?
            .error_for_status()
            .map_err(http_error)?
            .json::<PlaceDetailsResponse>()
            .await
            .map_err(http_error)?;

        if response.status != "OK" {
            return Err(GeneralError::ProviderStatus {
                status: response.status,
                message: response.error_message.unwrap_or_default(),
            });
        }

        let details = response.result.unwrap_or_default();
        let raw_count = details.reviews.len();
        let reviews = transform_reviews(details.reviews, ReviewSource::Google);
        debug!(
            "provider returned `{raw_count}` reviews, `{}` kept after validation",
            reviews.len()
        );

        Ok(ReviewsPayload {
            rating: details.rating.unwrap_or_default(),
            total_reviews: details.user_ratings_total.unwrap_or_default(),
            reviews,
            source: ReviewSource::Google,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_details_server(body: serde_json::Value) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DETAILS_PATH))
            .and(query_param("place_id", "place-1"))
            .and(query_param("key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn provider(mock_srv: &MockServer, api_key: Option<&str>) -> GooglePlacesProvider {
        GooglePlacesProvider::new(
            mock_srv.uri(),
            api_key.map(str::to_owned),
            Duration::from_millis(500),
        )
        .expect("client")
    }

    #[tokio::test]
    async fn fetch_transforms_provider_reviews() {
        let mock_srv = mock_details_server(json!({
            "status": "OK",
            "result": {
                "rating": 4.7,
                "user_ratings_total": 128,
                "reviews": [
                    {"author_name": "Ana", "rating": 5, "text": "Great", "time": 1700000000},
                    {"author_name": "Ben", "rating": 4, "text": "Good", "time": "invalid"},
                ]
            }
        }))
        .await;

        let payload = provider(&mock_srv, Some("secret"))
            .fetch("place-1")
            .await
            .expect("payload");

        assert_eq!(payload.rating, 4.7);
        assert_eq!(payload.total_reviews, 128);
        assert_eq!(payload.source, ReviewSource::Google);
        assert_eq!(payload.reviews.len(), 1);
        assert_eq!(payload.reviews[0].author, "Ana");
    }

    #[tokio::test]
    async fn non_ok_status_is_a_failure() {
        let mock_srv = mock_details_server(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }))
        .await;

        let result = provider(&mock_srv, Some("secret")).fetch("place-1").await;

        assert_eq!(
            result,
            Err(GeneralError::ProviderStatus {
                status: "REQUEST_DENIED".into(),
                message: "The provided API key is invalid.".into(),
            })
        );
    }

    #[tokio::test]
    async fn missing_key_never_reaches_the_network() {
        let mock_srv = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_srv)
            .await;

        let result = provider(&mock_srv, Some("  ")).fetch("place-1").await;

        assert_eq!(result, Err(GeneralError::MissingCredentials));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let mock_srv = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DETAILS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "OK"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_srv)
            .await;

        let result = provider(&mock_srv, Some("secret")).fetch("place-1").await;

        assert!(matches!(result, Err(GeneralError::Timeout(_))));
    }
}
