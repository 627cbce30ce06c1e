//! Catalog domain module.
//!
//! Products, their available stock, and the rules a new product must satisfy.
//! Pure domain logic (no IO, no storage).

pub mod catalog;
pub mod product;
pub mod seed;
pub mod validation;

pub use catalog::Catalog;
pub use product::Product;
pub use seed::seed_products;
pub use validation::{NewProduct, parse_product_form, validate_product};
