//! Checkout submission over HTTP.

use async_trait::async_trait;
use shopfront_commerce::checkout::{CheckoutGateway, CheckoutLine};
use shopfront_commerce::CommerceError;

use crate::FetchClient;

/// Posts checkout payloads to a third-party endpoint; any 2xx is success.
#[derive(Debug, Clone)]
pub struct HttpCheckoutGateway {
    client: FetchClient,
    url: String,
}

impl HttpCheckoutGateway {
    /// Create a gateway posting to `url`.
    pub fn new(client: FetchClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl CheckoutGateway for HttpCheckoutGateway {
    async fn submit(&self, lines: &[CheckoutLine]) -> Result<(), CommerceError> {
        let body = self
            .client
            .post_json(&self.url, lines)
            .await
            .map_err(|e| CommerceError::CheckoutFailed(e.to_string()))?;
        tracing::debug!(lines = lines.len(), response = %body, "checkout accepted");
        Ok(())
    }
}
