//! Where product documents come from.

use async_trait::async_trait;

use crate::catalog::Product;
use crate::error::CommerceError;

/// Supplies the product shown on the page.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetch the current product document.
    async fn fetch_product(&self) -> Result<Product, CommerceError>;
}

/// A source that always returns the same product.
#[derive(Debug, Clone)]
pub struct StaticProductSource {
    product: Product,
}

impl StaticProductSource {
    /// Create a new static source.
    pub fn new(product: Product) -> Self {
        Self { product }
    }
}

#[async_trait]
impl ProductSource for StaticProductSource {
    async fn fetch_product(&self) -> Result<Product, CommerceError> {
        Ok(self.product.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::tee;

    #[tokio::test]
    async fn test_static_source_returns_product() {
        let source = StaticProductSource::new(tee());
        let product = source.fetch_product().await.unwrap();
        assert_eq!(product.title, "Pima Cotton Tee");
    }
}
