//! Infrastructure for shopledger: concrete stores and process configuration.

pub mod config;
pub mod store;

pub use config::ShopConfig;
pub use store::{InMemoryStore, JsonFileStore};
