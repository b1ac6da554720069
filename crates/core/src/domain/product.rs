use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::category::Category;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sellable item as shown to the shopper.
///
/// `price` is in whole display-currency units (rupees). Remote products are
/// converted into the same unit before they reach this type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub brand: String,
    pub category: Category,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer: Option<String>,
}

impl Product {
    pub fn is_brand(&self, brand: &str) -> bool {
        self.brand.trim().to_lowercase() == brand.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Product, ProductId};
    use crate::domain::category::Category;

    #[test]
    fn product_id_serializes_as_bare_integer() {
        let product = Product {
            id: ProductId(7),
            name: "Canvas Sneakers".to_string(),
            price: 1299,
            image: "https://img.example/sneakers.png".to_string(),
            brand: "Stride".to_string(),
            category: Category::Footwear,
            rating: 4.2,
            offer: None,
        };

        let value = serde_json::to_value(&product).expect("serialize");
        assert_eq!(value["id"], json!(7));
        assert_eq!(value["category"], json!("footwear"));
        assert!(value.get("offer").is_none(), "absent offer should not be serialized");
    }

    #[test]
    fn optional_fields_default_when_missing() {
        let product: Product = serde_json::from_value(json!({
            "id": 3,
            "name": "Desk Lamp",
            "price": 899,
            "category": "home"
        }))
        .expect("deserialize");

        assert_eq!(product.brand, "");
        assert_eq!(product.rating, 0.0);
        assert!(product.offer.is_none());
    }

    #[test]
    fn brand_comparison_ignores_case_and_padding() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "name": "Runner",
            "price": 2500,
            "brand": "Nike",
            "category": "footwear"
        }))
        .expect("deserialize");

        assert!(product.is_brand(" nike "));
        assert!(!product.is_brand("adidas"));
    }
}
