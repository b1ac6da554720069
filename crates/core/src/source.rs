use async_trait::async_trait;

use crate::domain::product::Product;

/// A supplementary product source outside the local catalog.
///
/// Implementations must not fail: an unavailable upstream degrades to
/// whatever was last known, or to an empty list.
#[async_trait]
pub trait RemoteProducts: Send + Sync {
    async fn fetch_products(&self) -> Vec<Product>;
}

/// Used when the remote gateway is disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRemoteProducts;

#[async_trait]
impl RemoteProducts for NoRemoteProducts {
    async fn fetch_products(&self) -> Vec<Product> {
        Vec::new()
    }
}
