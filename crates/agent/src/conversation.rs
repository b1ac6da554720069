use serde::Serialize;
use shopchat_core::{Category, PriceOrder, Refinement};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    ShowCart,
    Search,
    FilterSort,
    FaqDelivery,
    FaqReturn,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::ShowCart => "show_cart",
            Self::Search => "search",
            Self::FilterSort => "filter_sort",
            Self::FaqDelivery => "faq_delivery",
            Self::FaqReturn => "faq_return",
            Self::Unknown => "unknown",
        }
    }
}

/// One row of the routing table. `matches` receives normalized text.
#[derive(Clone, Copy, Debug)]
pub struct IntentRule {
    pub intent: Intent,
    pub matches: fn(&str) -> bool,
}

const INTENT_RULES: [IntentRule; 6] = [
    IntentRule { intent: Intent::Greeting, matches: is_greeting },
    IntentRule { intent: Intent::ShowCart, matches: is_show_cart },
    IntentRule { intent: Intent::Search, matches: is_search },
    IntentRule { intent: Intent::FilterSort, matches: is_filter_sort },
    IntentRule { intent: Intent::FaqDelivery, matches: is_delivery_question },
    IntentRule { intent: Intent::FaqReturn, matches: is_return_question },
];

// Declaration order is match priority.
const CATEGORY_KEYWORDS: [(Category, &[&str]); 12] = [
    (Category::Clothing, &["clothing", "clothes", "shirt", "dress"]),
    (Category::Footwear, &["shoes", "footwear", "sneakers"]),
    (Category::Electronics, &["electronics", "gadget", "laptop"]),
    (Category::Jewelry, &["jewelry", "jewellery", "jewelery"]),
    (Category::Accessories, &["accessories", "bag", "watch"]),
    (Category::Beauty, &["beauty", "makeup", "cosmetics"]),
    (Category::Home, &["furniture", "kitchen", "decor"]),
    (Category::Sports, &["sports", "fitness", "gym"]),
    (Category::Books, &["book", "novel"]),
    (Category::Toys, &["toys", "games"]),
    (Category::Grocery, &["grocery", "food", "snacks"]),
    (Category::Mobiles, &["mobile", "phone", "smartphone"]),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedIntent {
    pub intent: Intent,
    pub normalized_text: String,
    pub category: Option<Category>,
    pub price_ceiling: Option<i64>,
    pub refinement: Option<Refinement>,
}

#[derive(Clone, Debug)]
pub struct IntentExtractor {
    rules: Vec<IntentRule>,
}

impl Default for IntentExtractor {
    fn default() -> Self {
        Self { rules: INTENT_RULES.to_vec() }
    }
}

impl IntentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    pub fn classify(&self, normalized_text: &str) -> Intent {
        self.rules
            .iter()
            .find(|rule| (rule.matches)(normalized_text))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Unknown)
    }

    pub fn extract(&self, text: &str) -> ExtractedIntent {
        let normalized_text = normalize_text(text);
        let intent = self.classify(&normalized_text);

        let (category, price_ceiling) = if intent == Intent::Search {
            (extract_category(&normalized_text), extract_price_ceiling(&normalized_text))
        } else {
            (None, None)
        };

        let refinement = if intent == Intent::FilterSort {
            extract_brand(&normalized_text)
                .map(Refinement::Brand)
                .or_else(|| extract_sort(&normalized_text).map(Refinement::Price))
        } else {
            None
        };

        ExtractedIntent { intent, normalized_text, category, price_ceiling, refinement }
    }
}

pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

pub fn extract_category(normalized_text: &str) -> Option<Category> {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| normalized_text.contains(keyword)))
        .map(|(category, _)| *category)
}

/// First run of ASCII digits, left to right. A run too long for `i64` yields
/// no ceiling.
pub fn extract_price_ceiling(normalized_text: &str) -> Option<i64> {
    let start = normalized_text.find(|ch: char| ch.is_ascii_digit())?;
    let run = &normalized_text[start..];
    let end = run.find(|ch: char| !ch.is_ascii_digit()).unwrap_or(run.len());
    run[..end].parse::<i64>().ok()
}

pub fn extract_brand(normalized_text: &str) -> Option<String> {
    let (_, rest) = normalized_text.split_once("brand")?;
    let brand = rest.trim().trim_start_matches(|ch: char| ch == ':' || ch == '=').trim();
    (!brand.is_empty()).then(|| brand.to_string())
}

pub fn extract_sort(normalized_text: &str) -> Option<PriceOrder> {
    if normalized_text.contains("low to high") || normalized_text.contains("sort by price") {
        Some(PriceOrder::Ascending)
    } else if normalized_text.contains("high to low") {
        Some(PriceOrder::Descending)
    } else {
        None
    }
}

fn is_greeting(text: &str) -> bool {
    matches!(text, "hi" | "hello")
}

fn is_show_cart(text: &str) -> bool {
    text.contains("cart") && ["show", "view", "my"].iter().any(|word| text.contains(word))
}

fn is_search(text: &str) -> bool {
    text.contains("show") || text.contains("find")
}

fn is_filter_sort(text: &str) -> bool {
    text.contains("filter") || text.contains("sort")
}

fn is_delivery_question(text: &str) -> bool {
    text.contains("delivery")
}

fn is_return_question(text: &str) -> bool {
    text.contains("return")
}
