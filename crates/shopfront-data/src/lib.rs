//! HTTP collaborators for shopfront.
//!
//! Provides a small JSON client over `reqwest` and the HTTP implementations of
//! the storefront's outbound seams:
//!
//! - [`HttpProductSource`]: fetches the product document
//! - [`HttpCheckoutGateway`]: posts checkout payloads
//! - [`ViaCepLookup`]: resolves Brazilian postal codes
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_data::{FetchClient, HttpProductSource};
//! use shopfront_commerce::catalog::ProductSource;
//!
//! let client = FetchClient::new(Duration::from_secs(10))?;
//! let source = HttpProductSource::new(client, "https://cdn.example.com/product.json");
//! let product = source.fetch_product().await?;
//! ```

mod catalog;
mod checkout;
mod error;
mod postal;

pub use catalog::HttpProductSource;
pub use checkout::HttpCheckoutGateway;
pub use error::FetchError;
pub use postal::{ViaCepLookup, VIACEP_BASE_URL};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Longest error body echoed back in an [`FetchError::HttpError`].
const MAX_ERROR_BODY: usize = 200;

/// HTTP client for making outbound JSON requests.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl FetchClient {
    /// Create a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("shopfront/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::RequestError(e.to_string()))?;
        Ok(Self {
            client,
            base_url: None,
        })
    }

    /// Create a client with a base URL that will be prepended to relative paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Resolve `url` against the base URL.
    pub fn url(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if !url.starts_with("http://") && !url.starts_with("https://") => {
                format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
            }
            _ => url.to_string(),
        }
    }

    /// GET `url` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let url = self.url(url);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        let body = check_status(response).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// POST `body` as JSON to `url` and return the response text.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<String, FetchError> {
        let url = self.url(url);
        let payload = serde_json::to_vec(body)?;
        tracing::debug!(%url, bytes = payload.len(), "POST");
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;
        check_status(response).await
    }
}

/// Read the body, turning non-2xx statuses into [`FetchError::HttpError`].
async fn check_status(response: reqwest::Response) -> Result<String, FetchError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let message: String = body.chars().take(MAX_ERROR_BODY).collect();
        return Err(FetchError::HttpError {
            status: status.as_u16(),
            message,
        });
    }
    Ok(body)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, HttpCheckoutGateway, HttpProductSource, ViaCepLookup};
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::FetchClient;
    use std::time::Duration;

    pub fn client() -> FetchClient {
        FetchClient::new(Duration::from_secs(5)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pong {
        ok: bool,
    }

    #[test]
    fn test_url_resolution() {
        let client = test_support::client().with_base_url("https://api.example.com/");
        assert_eq!(client.url("/ws/01310100"), "https://api.example.com/ws/01310100");
        assert_eq!(client.url("https://other.example.com/x"), "https://other.example.com/x");
    }

    #[tokio::test]
    async fn test_get_json_decodes_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_support::client().with_base_url(server.uri());
        let pong: Pong = client.get_json("/ping").await.unwrap();
        assert_eq!(pong, Pong { ok: true });
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = test_support::client().with_base_url(server.uri());
        let err = client.get_json::<Pong>("/ping").await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("maintenance"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = test_support::client();
        let err = client
            .get_json::<Pong>(&format!("{}/ping", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_post_json_sends_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orders"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!([{"quantity": 2}])))
            .respond_with(ResponseTemplate::new(201).set_body_string("created"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_support::client().with_base_url(server.uri());
        let body = client
            .post_json("/orders", &serde_json::json!([{"quantity": 2}]))
            .await
            .unwrap();
        assert_eq!(body, "created");
    }
}
