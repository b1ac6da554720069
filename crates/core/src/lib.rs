pub mod cart;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod query;
pub mod source;

pub use cart::{Cart, CartView};
pub use catalog::Catalog;
pub use domain::category::{map_category, Category};
pub use domain::product::{Product, ProductId};
pub use errors::{CatalogError, InterfaceError};
pub use query::{PriceOrder, ProductQuery, ProductQueryEngine, Refinement};
pub use source::{NoRemoteProducts, RemoteProducts};
