use std::time::Duration;

use chrono::{DateTime, Utc};
use shopchat_core::Product;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CachedResult {
    pub data: Vec<Product>,
    pub fetched_at: DateTime<Utc>,
}

impl CachedResult {
    pub fn new(data: Vec<Product>, fetched_at: DateTime<Utc>) -> Self {
        Self { data, fetched_at }
    }

    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.fetched_at).num_seconds()
    }

    /// Fresh while `now - fetched_at < ttl`. A clock that moved backwards
    /// counts as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (now - self.fetched_at).to_std() {
            Ok(age) => age < ttl,
            Err(_) => true,
        }
    }

    pub fn status(&self, now: DateTime<Utc>, ttl: Duration) -> CacheStatus {
        let age_secs = self.age_secs(now);
        let count = self.data.len();
        if self.is_fresh(now, ttl) {
            CacheStatus::Fresh { age_secs, count }
        } else {
            CacheStatus::Stale { age_secs, count }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Empty,
    Fresh { age_secs: i64, count: usize },
    Stale { age_secs: i64, count: usize },
}
