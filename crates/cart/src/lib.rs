//! Cart domain module.
//!
//! Line items held by a shopper, pending checkout. Each line snapshots the
//! product's name and price at the moment it was first added.

pub mod cart;
pub mod line;

pub use cart::Cart;
pub use line::CartLine;
