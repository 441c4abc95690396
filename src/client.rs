use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{normalize, FetchError};
use crate::models::{AggregateStats, ReviewBatch};

/// HTTP client for the three upstream review endpoints.
///
/// The bearer token comes from the external token store; without one the
/// client can still serve the unauthenticated public lookup.
pub struct ApiClient {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Unauthenticated read of an instance's published reviews.
    pub async fn public_reviews(&self, public_key: &str) -> Result<ReviewBatch, FetchError> {
        info!(public_key, "Fetching public reviews");
        let body = self
            .get_json(&format!("/public/reviews/{}", public_key), false)
            .await?;
        batch_from_body(body)
    }

    /// Bearer-authenticated read of the instance-scoped reviews.
    pub async fn instance_reviews(&self, instance_id: &str) -> Result<ReviewBatch, FetchError> {
        info!(instance_id, "Fetching instance reviews");
        let body = self
            .get_json(&format!("/api/reviews/{}", instance_id), true)
            .await?;
        batch_from_body(body)
    }

    /// Bearer-authenticated read of the instance aggregate stats.
    pub async fn instance_stats(&self, instance_id: &str) -> Result<AggregateStats, FetchError> {
        debug!(instance_id, "Fetching instance stats");
        let body = self
            .get_json(&format!("/api/stats/{}", instance_id), true)
            .await?;
        serde_json::from_value(body)
            .map_err(|e| FetchError::Shape(format!("Malformed stats response: {}", e)))
    }

    async fn get_json(&self, path: &str, authed: bool) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.api_base, path);

        let mut request = self.client.get(&url);
        if authed {
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await?;
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();
        let bytes = response.bytes().await?;
        let body: Option<Value> = serde_json::from_slice(&bytes).ok();

        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "Upstream returned an error");
            return Err(FetchError::Http(normalize(
                status.as_u16(),
                &status_text,
                body.as_ref(),
            )));
        }

        body.ok_or_else(|| FetchError::Shape("No reviews found".to_string()))
    }
}

/// The public endpoint returns one response per configured locale, as a JSON
/// array; single-locale instances may answer with a bare object. Either way
/// the first entry must carry a review collection.
fn batch_from_body(body: Value) -> Result<ReviewBatch, FetchError> {
    let first = match body {
        Value::Array(mut entries) => {
            if entries.is_empty() {
                return Err(FetchError::Shape("No reviews found".to_string()));
            }
            entries.remove(0)
        }
        other => other,
    };

    if !first.get("reviews").map(Value::is_array).unwrap_or(false) {
        return Err(FetchError::Shape("No reviews found".to_string()));
    }

    serde_json::from_value(first)
        .map_err(|e| FetchError::Shape(format!("Malformed reviews response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reviews_payload() -> Value {
        json!({
            "success": true,
            "locale": "en-US",
            "averageRating": 4.6,
            "count": 42,
            "reviews": [
                {"reviewId": "r1", "name": "Sarah", "date": "2 days ago", "stars": 5, "text": "Great.", "avatar": "https://example.com/a.png"},
                {"reviewId": "r2", "name": "David", "date": "1 week ago", "stars": 4, "text": "Fine.", "avatar": "https://example.com/b.png"}
            ]
        })
    }

    #[tokio::test]
    async fn test_public_reviews_array_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/public/reviews/pk_live_abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([reviews_payload()])))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let batch = client.public_reviews("pk_live_abc").await.unwrap();
        assert_eq!(batch.count, 42);
        assert_eq!(batch.reviews.len(), 2);
    }

    #[tokio::test]
    async fn test_public_reviews_object_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/public/reviews/pk_live_abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reviews_payload()))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let batch = client.public_reviews("pk_live_abc").await.unwrap();
        assert_eq!(batch.reviews.len(), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/public/reviews/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "not found"})))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.public_reviews("missing").await.unwrap_err();
        match err {
            FetchError::Http(n) => {
                assert_eq!(n.message, "not found");
                assert_eq!(n.code.as_deref(), Some("http_404"));
                assert_eq!(n.status, Some(404));
            }
            other => panic!("expected Http, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_without_reviews_is_shape_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/public/reviews/pk_live_abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.public_reviews("pk_live_abc").await.unwrap_err();
        match err {
            FetchError::Shape(m) => assert_eq!(m, "No reviews found"),
            other => panic!("expected Shape, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_array_is_shape_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/public/reviews/pk_live_abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        assert!(matches!(
            client.public_reviews("pk_live_abc").await,
            Err(FetchError::Shape(_))
        ));
    }

    #[tokio::test]
    async fn test_instance_reviews_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reviews/inst-7"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reviews_payload()))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).with_token("tok-123");
        let batch = client.instance_reviews("inst-7").await.unwrap();
        assert_eq!(batch.reviews.len(), 2);
    }

    #[tokio::test]
    async fn test_instance_stats() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stats/inst-7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"success": true, "averageRating": 4.2, "totalCount": 131}),
            ))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).with_token("tok-123");
        let stats = client.instance_stats("inst-7").await.unwrap();
        assert_eq!(stats.total_count, 131);
    }
}
