use std::ops::RangeInclusive;
use std::sync::Arc;

use rand::Rng;
use serde::Deserialize;
use shopchat_core::{map_category, Product, ProductId};

/// Upstream records carry no brand.
pub const DEFAULT_REMOTE_BRAND: &str = "Generic";

#[derive(Clone, Debug, Deserialize)]
pub struct ExternalProduct {
    pub id: i64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub rating: Option<ExternalRating>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExternalRating {
    #[serde(default)]
    pub rate: Option<f64>,
}

/// Supplies a rating for upstream records that do not have one.
pub trait RatingSource: Send + Sync {
    fn rating(&self) -> f64;
}

#[derive(Clone, Debug)]
pub struct RandomRating {
    range: RangeInclusive<f64>,
}

impl Default for RandomRating {
    fn default() -> Self {
        Self { range: 3.0..=5.0 }
    }
}

impl RatingSource for RandomRating {
    fn rating(&self) -> f64 {
        let raw = rand::thread_rng().gen_range(self.range.clone());
        (raw * 10.0).round() / 10.0
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedRating(pub f64);

impl RatingSource for FixedRating {
    fn rating(&self) -> f64 {
        self.0
    }
}

#[derive(Clone)]
pub struct Normalizer {
    id_offset: i64,
    price_factor: f64,
    rating_source: Arc<dyn RatingSource>,
}

impl Normalizer {
    pub fn new(id_offset: i64, price_factor: f64, rating_source: Arc<dyn RatingSource>) -> Self {
        Self { id_offset, price_factor, rating_source }
    }

    pub fn normalize(&self, record: ExternalProduct) -> Product {
        let rating = record
            .rating
            .and_then(|rating| rating.rate)
            .unwrap_or_else(|| self.rating_source.rating());

        Product {
            id: ProductId(record.id.saturating_add(self.id_offset)),
            name: record.title,
            // truncation toward zero, saturating on overflow
            price: (record.price * self.price_factor).trunc() as i64,
            image: record.image,
            brand: DEFAULT_REMOTE_BRAND.to_string(),
            category: map_category(&record.category),
            rating,
            offer: None,
        }
    }
}
