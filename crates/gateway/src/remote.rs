use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shopchat_core::config::RemoteConfig;
use shopchat_core::{Product, RemoteProducts};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::{CacheStatus, CachedResult, Clock, SystemClock};
use crate::client::{GatewayError, RetryPolicy, UpstreamClient};
use crate::normalize::{Normalizer, RandomRating, RatingSource};

#[derive(Clone, Debug)]
pub struct GatewaySettings {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub cache_duration: Duration,
    pub id_offset: i64,
    pub price_factor: f64,
}

impl From<&RemoteConfig> for GatewaySettings {
    fn from(config: &RemoteConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            retry: RetryPolicy {
                max_retries: config.max_retries,
                backoff: Duration::from_millis(config.retry_backoff_ms),
            },
            cache_duration: Duration::from_secs(config.cache_duration_secs),
            id_offset: config.id_offset,
            price_factor: config.price_factor,
        }
    }
}

/// Remote product source with a single time-boxed cache entry.
///
/// `refresh` is held across check, fetch and populate, so concurrent callers
/// wait for one upstream round trip instead of each starting their own. The
/// entry itself sits behind a separate lock that is only held for reads and
/// the final write, so status checks never wait on the upstream.
pub struct RemoteCatalog {
    client: UpstreamClient,
    normalizer: Normalizer,
    cache_duration: Duration,
    clock: Arc<dyn Clock>,
    refresh: Mutex<()>,
    entry: RwLock<Option<CachedResult>>,
}

impl RemoteCatalog {
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        Self::with_parts(settings, Arc::new(SystemClock), Arc::new(RandomRating::default()))
    }

    pub fn with_parts(
        settings: GatewaySettings,
        clock: Arc<dyn Clock>,
        rating_source: Arc<dyn RatingSource>,
    ) -> Result<Self, GatewayError> {
        let client = UpstreamClient::new(settings.base_url, settings.timeout, settings.retry)?;
        let normalizer = Normalizer::new(settings.id_offset, settings.price_factor, rating_source);

        Ok(Self {
            client,
            normalizer,
            cache_duration: settings.cache_duration,
            clock,
            refresh: Mutex::new(()),
            entry: RwLock::new(None),
        })
    }

    pub fn upstream_url(&self) -> &str {
        self.client.url()
    }

    pub async fn cache_status(&self) -> CacheStatus {
        match self.entry.read().await.as_ref() {
            Some(entry) => entry.status(self.clock.now(), self.cache_duration),
            None => CacheStatus::Empty,
        }
    }
}

#[async_trait]
impl RemoteProducts for RemoteCatalog {
    async fn fetch_products(&self) -> Vec<Product> {
        let _refresh = self.refresh.lock().await;

        if let Some(entry) = self.entry.read().await.as_ref() {
            let now = self.clock.now();
            if entry.is_fresh(now, self.cache_duration) {
                debug!(
                    event_name = "gateway.cache.hit",
                    age_secs = entry.age_secs(now),
                    count = entry.data.len(),
                    "serving fresh remote products from cache"
                );
                return entry.data.clone();
            }
        }

        match self.client.fetch_records().await {
            Ok(records) => {
                let data = records
                    .into_iter()
                    .map(|record| self.normalizer.normalize(record))
                    .collect::<Vec<_>>();
                info!(
                    event_name = "gateway.fetch.succeeded",
                    upstream = %self.client.url(),
                    count = data.len(),
                    "remote products refreshed"
                );
                *self.entry.write().await = Some(CachedResult::new(data.clone(), self.clock.now()));
                data
            }
            Err(error) => {
                let fallback = self
                    .entry
                    .read()
                    .await
                    .as_ref()
                    .map(|entry| entry.data.clone())
                    .unwrap_or_default();
                warn!(
                    event_name = "gateway.fetch.failed",
                    upstream = %self.client.url(),
                    error = %error,
                    fallback_count = fallback.len(),
                    "remote refresh failed, serving last known products"
                );
                fallback
            }
        }
    }
}
