use std::fmt;

use serde::{Deserialize, Serialize};

/// The storefront's fixed category vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Clothing,
    Footwear,
    Electronics,
    Jewelry,
    Accessories,
    Beauty,
    Home,
    Sports,
    Books,
    Toys,
    Grocery,
    Mobiles,
    General,
}

impl Category {
    /// Categories a shopper can ask for by name. `General` is only a fallback
    /// for upstream labels we do not recognise.
    pub const SEARCHABLE: [Category; 12] = [
        Category::Clothing,
        Category::Footwear,
        Category::Electronics,
        Category::Jewelry,
        Category::Accessories,
        Category::Beauty,
        Category::Home,
        Category::Sports,
        Category::Books,
        Category::Toys,
        Category::Grocery,
        Category::Mobiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clothing => "clothing",
            Self::Footwear => "footwear",
            Self::Electronics => "electronics",
            Self::Jewelry => "jewelry",
            Self::Accessories => "accessories",
            Self::Beauty => "beauty",
            Self::Home => "home",
            Self::Sports => "sports",
            Self::Books => "books",
            Self::Toys => "toys",
            Self::Grocery => "grocery",
            Self::Mobiles => "mobiles",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Upstream product API vocabulary. Matching is exact and case-sensitive.
const EXTERNAL_CATEGORY_MAP: [(&str, Category); 4] = [
    ("men's clothing", Category::Clothing),
    ("women's clothing", Category::Clothing),
    ("jewelery", Category::Jewelry),
    ("electronics", Category::Electronics),
];

pub fn map_category(external_label: &str) -> Category {
    EXTERNAL_CATEGORY_MAP
        .iter()
        .find(|(label, _)| *label == external_label)
        .map(|(_, category)| *category)
        .unwrap_or(Category::General)
}
