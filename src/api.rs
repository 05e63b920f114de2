use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{Feedback, FeedbackDraft, Product};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Failure taxonomy for storefront backend calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    Validation(String),
}

impl ApiError {
    /// Short text suitable for a status line or form hint.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Could not reach the store server".to_string(),
            ApiError::Http { status, .. } => format!("Server rejected the request ({})", status),
            ApiError::NotFound(what) => format!("{} was not found", what),
            ApiError::Decode(_) => "Server sent data we could not read".to_string(),
            ApiError::Validation(msg) => msg.clone(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Http {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The four backend operations the storefront consumes.
///
/// Each call is a single network round trip. Implementations must not retry
/// or cache.
pub trait StoreApi: Send + Sync {
    fn list_products(&self) -> BoxFuture<'_, ApiResult<Vec<Product>>>;
    fn get_product<'a>(&'a self, id: &'a str) -> BoxFuture<'a, ApiResult<Product>>;
    fn list_feedback<'a>(&'a self, product_id: &'a str) -> BoxFuture<'a, ApiResult<Vec<Feedback>>>;
    fn submit_feedback<'a>(&'a self, draft: &'a FeedbackDraft) -> BoxFuture<'a, ApiResult<()>>;
}

/// `StoreApi` over HTTP/JSON.
pub struct HttpStoreApi {
    client: Client,
    base: Url,
}

impl HttpStoreApi {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ApiError::Validation(format!("invalid API URL {}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Validation(format!(
                "API URL cannot carry paths: {}",
                base_url
            )));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let response = ensure_success(response).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Map a non-success status into `ApiError::Http`, keeping the body text as the message.
async fn ensure_success(response: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        body.trim().to_string()
    };
    Err(ApiError::Http {
        status: status.as_u16(),
        message,
    })
}

impl StoreApi for HttpStoreApi {
    fn list_products(&self) -> BoxFuture<'_, ApiResult<Vec<Product>>> {
        async move {
            info!("Fetching product catalog");
            self.get_json(self.endpoint(&["products"])).await
        }
        .boxed()
    }

    fn get_product<'a>(&'a self, id: &'a str) -> BoxFuture<'a, ApiResult<Product>> {
        async move {
            info!(product_id = id, "Fetching product");
            match self.get_json(self.endpoint(&["products", id])).await {
                Err(ApiError::Http { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                    Err(ApiError::NotFound(format!("Product {}", id)))
                }
                other => other,
            }
        }
        .boxed()
    }

    fn list_feedback<'a>(&'a self, product_id: &'a str) -> BoxFuture<'a, ApiResult<Vec<Feedback>>> {
        async move {
            info!(product_id, "Fetching feedback");
            self.get_json(self.endpoint(&["feedback", product_id])).await
        }
        .boxed()
    }

    fn submit_feedback<'a>(&'a self, draft: &'a FeedbackDraft) -> BoxFuture<'a, ApiResult<()>> {
        async move {
            let url = self.endpoint(&["feedback"]);
            info!(product_id = draft.product_id(), "Submitting feedback");
            let response = self.client.post(url).json(draft).send().await?;
            // Created body, if any, is not needed: the list is refetched afterwards.
            ensure_success(response).await?;
            Ok(())
        }
        .boxed()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HttpStoreApi {
        HttpStoreApi::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_segments() {
        let api = HttpStoreApi::new("http://example.test/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            api.endpoint(&["products", "a b/c"]).as_str(),
            "http://example.test/api/products/a%20b%2Fc"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            HttpStoreApi::new("not a url", Duration::from_secs(1)),
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_products_in_server_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "2", "name": "Oil", "brand": "M", "image": "", "description": "", "certification": "", "category": "Oils"},
                {"_id": "1", "name": "Honey", "brand": "X", "image": "", "description": "", "certification": "", "category": "Honey"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let products = client(&server).list_products().await.unwrap();
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_get_product_maps_404_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/42"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(&server).get_product("42").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feedback/1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client(&server).list_feedback("1").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 500,
                message: "boom".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = client(&server).list_products().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_submit_posts_camel_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback"))
            .and(body_json(json!({"productId": "1", "name": "Ann", "message": "Great!"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "_id": "f1", "productId": "1", "name": "Ann", "message": "Great!"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let draft = FeedbackDraft::new("1", "Ann", "Great!").unwrap();
        client(&server).submit_feedback(&draft).await.unwrap();
    }

    #[tokio::test]
    async fn test_submit_rejection_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback"))
            .respond_with(ResponseTemplate::new(400).set_body_string("message too short"))
            .mount(&server)
            .await;

        let draft = FeedbackDraft::new("1", "Ann", "x").unwrap();
        let err = client(&server).submit_feedback(&draft).await.unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let api = HttpStoreApi::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = api.list_products().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn test_user_message_for_validation_is_verbatim() {
        let error = ApiError::Validation("Name is required".to_string());
        assert_eq!(error.user_message(), "Name is required");
    }
}
