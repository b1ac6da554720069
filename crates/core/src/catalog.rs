use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::domain::category::Category;
use crate::domain::product::{Product, ProductId};
use crate::errors::CatalogError;

/// The local product list. Loaded once at startup and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::Read { path: path.to_path_buf(), source })?;
        let products = serde_json::from_str::<Vec<Product>>(&raw)
            .map_err(|source| CatalogError::Parse { path: path.to_path_buf(), source })?;

        let mut seen = BTreeSet::new();
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId { path: path.to_path_buf(), id: product.id });
            }
        }

        Ok(Self::new(products))
    }

    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn count_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for product in &self.products {
            *counts.entry(product.category).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::Catalog;
    use crate::domain::category::Category;
    use crate::domain::product::ProductId;
    use crate::errors::CatalogError;

    const CATALOG_JSON: &str = r#"[
        {"id": 1, "name": "Cotton Tee", "price": 499, "image": "/img/tee.png",
         "brand": "Basics", "category": "clothing", "rating": 4.1},
        {"id": 2, "name": "Trail Shoes", "price": 2999, "image": "/img/trail.png",
         "brand": "Stride", "category": "footwear", "rating": 4.6, "offer": "10% off"},
        {"id": 3, "name": "Denim Jacket", "price": 1899, "image": "/img/denim.png",
         "brand": "Basics", "category": "clothing", "rating": 4.3}
    ]"#;

    #[test]
    fn loads_products_from_json_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("products.json");
        fs::write(&path, CATALOG_JSON).expect("write catalog");

        let catalog = Catalog::load(&path).expect("catalog should load");
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.find(ProductId(2)).and_then(|product| product.offer.as_deref()),
            Some("10% off")
        );
        assert!(catalog.find(ProductId(99)).is_none());

        let counts = catalog.count_by_category();
        assert_eq!(counts.get(&Category::Clothing), Some(&2));
        assert_eq!(counts.get(&Category::Footwear), Some(&1));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("absent.json");

        let error = Catalog::load(&path).expect_err("missing file should fail");
        assert!(matches!(error, CatalogError::Read { .. }));
        assert!(error.to_string().contains("absent.json"));
    }

    #[test]
    fn unknown_category_is_a_parse_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("products.json");
        fs::write(&path, r#"[{"id": 1, "name": "Kite", "price": 10, "category": "outdoors"}]"#)
            .expect("write catalog");

        let error = Catalog::load(&path).expect_err("unknown category should fail");
        assert!(matches!(error, CatalogError::Parse { .. }));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("products.json");
        fs::write(
            &path,
            r#"[{"id": 5, "name": "A", "price": 10, "category": "books"},
                {"id": 5, "name": "B", "price": 20, "category": "books"}]"#,
        )
        .expect("write catalog");

        let error = Catalog::load(&path).expect_err("duplicate ids should fail");
        assert!(matches!(error, CatalogError::DuplicateId { id: ProductId(5), .. }));
    }
}
