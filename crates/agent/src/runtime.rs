use std::sync::Arc;

use serde::Serialize;
use shopchat_core::{
    Cart, CartView, Catalog, Category, PriceOrder, Product, ProductId, ProductQuery,
    ProductQueryEngine, Refinement, RemoteProducts,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::conversation::{Intent, IntentExtractor};

const GREETING_REPLY: &str = "Hello! I am your AI shopping assistant. How can I help you?";
const DELIVERY_REPLY: &str = "Delivery usually takes 3-5 working days.";
const RETURN_REPLY: &str = "You can return products within 7 days.";
const UNKNOWN_REPLY: &str = "I didn't understand that. Can you try again?";
const NO_CATEGORY_MATCHES_REPLY: &str = "Sorry, no products found in that category.";
const FILTER_GUIDANCE_REPLY: &str =
    "Tell me how to filter or sort, e.g. 'filter by brand nike' or 'sort by price low to high'.";
const EMPTY_CART_REPLY: &str = "Your cart is empty.";

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart: Option<Vec<Product>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl ChatReply {
    pub fn text(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), ..Self::default() }
    }

    pub fn with_products(reply: impl Into<String>, products: Vec<Product>) -> Self {
        Self { reply: reply.into(), products: Some(products), ..Self::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AddToCartOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_count: Option<usize>,
}

/// Service object shared by every request: read-only catalog, remote source
/// and the process-wide cart.
pub struct AgentRuntime {
    catalog: Arc<Catalog>,
    remote: Arc<dyn RemoteProducts>,
    engine: ProductQueryEngine,
    extractor: IntentExtractor,
    cart: Mutex<Cart>,
}

impl AgentRuntime {
    pub fn new(catalog: Arc<Catalog>, remote: Arc<dyn RemoteProducts>) -> Self {
        Self {
            catalog,
            remote,
            engine: ProductQueryEngine::default(),
            extractor: IntentExtractor::new(),
            cart: Mutex::new(Cart::default()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn handle_message(&self, text: &str) -> ChatReply {
        let extracted = self.extractor.extract(text);
        info!(
            event_name = "chat.message.routed",
            intent = extracted.intent.as_str(),
            category = extracted.category.map(|category| category.as_str()),
            price_ceiling = extracted.price_ceiling,
            "chat message routed"
        );

        match extracted.intent {
            Intent::Greeting => ChatReply::text(GREETING_REPLY),
            Intent::ShowCart => self.cart_reply().await,
            Intent::Search => match extracted.category {
                Some(category) => self.search(category, extracted.price_ceiling).await,
                None => ChatReply::text(category_clarification()),
            },
            Intent::FilterSort => match extracted.refinement {
                Some(refinement) => self.refine(refinement).await,
                None => ChatReply::text(FILTER_GUIDANCE_REPLY),
            },
            Intent::FaqDelivery => ChatReply::text(DELIVERY_REPLY),
            Intent::FaqReturn => ChatReply::text(RETURN_REPLY),
            Intent::Unknown => ChatReply::text(UNKNOWN_REPLY),
        }
    }

    /// Local catalog first, then the remote source. The cart lock is not held
    /// while the remote source is consulted.
    pub async fn add_to_cart(&self, product_id: ProductId) -> AddToCartOutcome {
        let product = match self.catalog.find(product_id) {
            Some(product) => Some(product.clone()),
            None => self
                .remote
                .fetch_products()
                .await
                .into_iter()
                .find(|product| product.id == product_id),
        };

        let Some(product) = product else {
            debug!(
                event_name = "cart.item.missing",
                product_id = product_id.0,
                "add to cart for unknown product"
            );
            return AddToCartOutcome {
                success: false,
                message: format!("Product {product_id} not found."),
                cart_count: None,
            };
        };

        let message = format!("{} added to cart.", product.name);
        let cart_count = self.cart.lock().await.add(product);
        info!(
            event_name = "cart.item.added",
            product_id = product_id.0,
            cart_count,
            "product added to cart"
        );

        AddToCartOutcome { success: true, message, cart_count: Some(cart_count) }
    }

    pub async fn view_cart(&self) -> CartView {
        self.cart.lock().await.view()
    }

    async fn cart_reply(&self) -> ChatReply {
        let view = self.view_cart().await;
        if view.count == 0 {
            return ChatReply::text(EMPTY_CART_REPLY);
        }

        let reply = format!("You have {} item(s) in your cart. Total: ₹{}", view.count, view.total);
        ChatReply {
            reply,
            products: None,
            cart: Some(view.items),
            total: Some(view.total),
        }
    }

    async fn search(&self, category: Category, price_ceiling: Option<i64>) -> ChatReply {
        let query = ProductQuery::new(category, price_ceiling);
        let local = self.catalog.products();
        let remote = if self.engine.needs_remote(&query, local) {
            self.remote.fetch_products().await
        } else {
            Vec::new()
        };

        let results = self.engine.search(&query, local, &remote);
        if results.is_empty() {
            return ChatReply::text(NO_CATEGORY_MATCHES_REPLY);
        }

        let reply = match price_ceiling {
            Some(ceiling) => format!("Here are some {category} items under ₹{ceiling}:"),
            None => format!("Here are some {category} items:"),
        };
        ChatReply::with_products(reply, results)
    }

    async fn refine(&self, refinement: Refinement) -> ChatReply {
        let remote = self.remote.fetch_products().await;
        let results = self.engine.refine(&refinement, self.catalog.products(), &remote);

        match refinement {
            Refinement::Brand(brand) if results.is_empty() => {
                ChatReply::text(format!("Sorry, no products found for brand '{brand}'."))
            }
            Refinement::Brand(brand) => {
                ChatReply::with_products(format!("Here are some {brand} products:"), results)
            }
            Refinement::Price(_) if results.is_empty() => {
                ChatReply::text(NO_CATEGORY_MATCHES_REPLY)
            }
            Refinement::Price(order) => {
                let direction = match order {
                    PriceOrder::Ascending => "low to high",
                    PriceOrder::Descending => "high to low",
                };
                let reply = format!("Products sorted by price ({direction}):");
                ChatReply::with_products(reply, results)
            }
        }
    }
}

fn category_clarification() -> String {
    let categories =
        Category::SEARCHABLE.iter().map(|category| category.as_str()).collect::<Vec<_>>();
    format!("Which category are you looking for? Try one of: {}.", categories.join(", "))
}
