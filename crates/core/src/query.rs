//! Product filtering and ordering over the local catalog plus remote products.
//!
//! The engine is synchronous and has no I/O. Callers decide whether to fetch
//! remote products (see [`ProductQueryEngine::needs_remote`]) and pass both
//! pools in; local products always come first in the merged order.

use std::cmp::Reverse;

use crate::domain::category::Category;
use crate::domain::product::Product;

pub const MAX_RESULTS: usize = 5;
pub const REMOTE_SUPPLEMENT_THRESHOLD: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Category,
    /// Inclusive upper bound on price.
    pub price_ceiling: Option<i64>,
}

impl ProductQuery {
    pub fn new(category: Category, price_ceiling: Option<i64>) -> Self {
        Self { category, price_ceiling }
    }

    pub fn matches(&self, product: &Product) -> bool {
        product.category == self.category
            && self.price_ceiling.map_or(true, |ceiling| product.price <= ceiling)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceOrder {
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Refinement {
    Brand(String),
    Price(PriceOrder),
}

#[derive(Clone, Debug)]
pub struct ProductQueryEngine {
    max_results: usize,
    supplement_threshold: usize,
}

impl Default for ProductQueryEngine {
    fn default() -> Self {
        Self { max_results: MAX_RESULTS, supplement_threshold: REMOTE_SUPPLEMENT_THRESHOLD }
    }
}

impl ProductQueryEngine {
    /// True when the local pool alone yields fewer matches than the
    /// supplement threshold.
    pub fn needs_remote(&self, query: &ProductQuery, local: &[Product]) -> bool {
        local.iter().filter(|product| query.matches(product)).count() < self.supplement_threshold
    }

    pub fn search(
        &self,
        query: &ProductQuery,
        local: &[Product],
        remote: &[Product],
    ) -> Vec<Product> {
        local
            .iter()
            .chain(remote)
            .filter(|product| query.matches(product))
            .take(self.max_results)
            .cloned()
            .collect()
    }

    pub fn refine(
        &self,
        refinement: &Refinement,
        local: &[Product],
        remote: &[Product],
    ) -> Vec<Product> {
        let merged = local.iter().chain(remote);
        match refinement {
            Refinement::Brand(brand) => merged
                .filter(|product| product.is_brand(brand))
                .take(self.max_results)
                .cloned()
                .collect(),
            Refinement::Price(order) => {
                let mut sorted = merged.cloned().collect::<Vec<_>>();
                // sort_by_key is stable, so equal prices keep source order
                match order {
                    PriceOrder::Ascending => sorted.sort_by_key(|product| product.price),
                    PriceOrder::Descending => sorted.sort_by_key(|product| Reverse(product.price)),
                }
                sorted.truncate(self.max_results);
                sorted
            }
        }
    }
}
