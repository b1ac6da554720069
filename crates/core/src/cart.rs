use serde::Serialize;

use crate::domain::product::Product;

/// Session cart. Append-only, duplicates allowed, lives as long as the process.
#[derive(Clone, Debug, Default)]
pub struct Cart {
    items: Vec<Product>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartView {
    pub count: usize,
    pub total: i64,
    pub items: Vec<Product>,
}

impl Cart {
    /// Appends the product and returns the new item count.
    pub fn add(&mut self, product: Product) -> usize {
        self.items.push(product);
        self.items.len()
    }

    pub fn total(&self) -> i64 {
        self.items.iter().map(|product| product.price).fold(0i64, i64::saturating_add)
    }

    pub fn view(&self) -> CartView {
        CartView { count: self.items.len(), total: self.total(), items: self.items.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::Cart;
    use crate::domain::category::Category;
    use crate::domain::product::{Product, ProductId};

    fn product(id: i64, price: i64) -> Product {
        Product {
            id: ProductId(id),
            name: format!("item-{id}"),
            price,
            image: String::new(),
            brand: String::new(),
            category: Category::General,
            rating: 3.5,
            offer: None,
        }
    }

    #[test]
    fn duplicates_are_kept_in_insertion_order() {
        let mut cart = Cart::default();
        assert_eq!(cart.add(product(1, 100)), 1);
        assert_eq!(cart.add(product(2, 250)), 2);
        assert_eq!(cart.add(product(1, 100)), 3);

        let view = cart.view();
        assert_eq!(view.count, 3);
        assert_eq!(view.total, 450);
        assert_eq!(
            view.items.iter().map(|item| item.id.0).collect::<Vec<_>>(),
            vec![1, 2, 1]
        );
    }

    #[test]
    fn empty_cart_has_zero_total() {
        let cart = Cart::default();
        assert_eq!(cart.total(), 0);
        assert_eq!(cart.view().count, 0);
    }
}
