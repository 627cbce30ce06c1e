//! Contracts for the collaborators that observe the ledger: a key/value
//! store for persistence and a presenter for rendering.

use std::sync::Arc;

use thiserror::Error;

use shopledger_cart::CartLine;
use shopledger_catalog::Product;

/// Keys under which ledger state is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Catalog,
    Cart,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Catalog => "sim-catalog",
            StorageKey::Cart => "sim-cart",
        }
    }
}

impl core::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Key/value persistence (string values, JSON by convention).
///
/// `get` returns `Ok(None)` when nothing was stored under the key.
pub trait KeyValueStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StoreError>;
    fn put(&self, key: StorageKey, value: &str) -> Result<(), StoreError>;
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: StorageKey) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: StorageKey, value: &str) -> Result<(), StoreError> {
        (**self).put(key, value)
    }
}

impl<S> KeyValueStore for &S
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: StorageKey) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: StorageKey, value: &str) -> Result<(), StoreError> {
        (**self).put(key, value)
    }
}

/// Renders the current catalog (already filtered) and cart.
///
/// Formatting (currency, markup) is entirely up to the implementation.
pub trait Presenter {
    fn render(&mut self, catalog: &[&Product], cart: &[CartLine], total: f64);
}

/// Presenter that renders nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPresenter;

impl Presenter for NoopPresenter {
    fn render(&mut self, _catalog: &[&Product], _cart: &[CartLine], _total: f64) {}
}

impl<P> Presenter for &mut P
where
    P: Presenter + ?Sized,
{
    fn render(&mut self, catalog: &[&Product], cart: &[CartLine], total: f64) {
        (**self).render(catalog, cart, total)
    }
}
