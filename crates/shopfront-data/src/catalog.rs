//! Product document fetched over HTTP.

use async_trait::async_trait;
use shopfront_commerce::catalog::{Product, ProductSource};
use shopfront_commerce::{CommerceError, Currency};

use crate::FetchClient;

/// Reads the product document from a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpProductSource {
    client: FetchClient,
    url: String,
    currency: Option<Currency>,
}

impl HttpProductSource {
    /// Create a source for `url`.
    pub fn new(client: FetchClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            currency: None,
        }
    }

    /// Price every product in `currency` regardless of what the document says.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    async fn fetch_product(&self) -> Result<Product, CommerceError> {
        let mut product: Product = self.client.get_json(&self.url).await.map_err(|e| {
            tracing::warn!(url = %self.url, error = %e, "product fetch failed");
            CommerceError::ProductUnavailable(e.to_string())
        })?;
        if let Some(currency) = self.currency {
            product.currency = currency;
        }
        tracing::debug!(id = %product.id, variants = product.variants.len(), "product fetched");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::client;
    use shopfront_commerce::ProductId;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn document() -> serde_json::Value {
        serde_json::json!({
            "id": 7,
            "title": "Pima Cotton Tee",
            "options": ["Color", "Size"],
            "values": [["Blue"], ["M"]],
            "variants": [
                {"id": 70, "product_id": 7, "values": ["Blue", "M"], "price": "129.90",
                 "inventory_quantity": 5, "image_url": "https://cdn.example.com/blue.png"}
            ],
            "image_url": "https://cdn.example.com/tee.png",
            "images": ["https://cdn.example.com/tee.png"]
        })
    }

    #[tokio::test]
    async fn test_fetch_product() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/product.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(document()))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpProductSource::new(client(), format!("{}/product.json", server.uri()))
            .with_currency(Currency::USD);
        let product = source.fetch_product().await.unwrap();
        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.currency, Currency::USD);
        assert!(product.find_variant(&["Blue", "M"]).is_some());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_product_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = HttpProductSource::new(client(), format!("{}/product.json", server.uri()));
        let err = source.fetch_product().await.unwrap_err();
        assert!(matches!(err, CommerceError::ProductUnavailable(_)));
    }
}
