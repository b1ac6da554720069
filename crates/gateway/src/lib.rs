//! Remote Product Gateway
//!
//! Pulls products from a third-party catalog API and turns them into the
//! storefront's own `Product` shape:
//! - `client` - pooled HTTP client with timeout and bounded retry
//! - `normalize` - upstream record → `Product` (id offset, price conversion, category mapping)
//! - `cache` - time-boxed cache entry, clock seam
//! - `remote` - `RemoteCatalog`, the `RemoteProducts` implementation tying the above together
//!
//! Failures never cross the `fetch_products` boundary. A broken upstream
//! degrades to the last known products, or to none.

pub mod cache;
pub mod client;
pub mod normalize;
pub mod remote;

#[cfg(test)]
mod test_support;

pub use cache::{CacheStatus, CachedResult, Clock, SystemClock};
pub use client::{GatewayError, RetryPolicy, UpstreamClient};
pub use normalize::{ExternalProduct, FixedRating, Normalizer, RandomRating, RatingSource};
pub use remote::{GatewaySettings, RemoteCatalog};
