//! One shopping session around a [`Ledger`].
//!
//! Loads state from a [`KeyValueStore`], seeds the catalog when it is empty,
//! and after every successful mutation persists catalog and cart, publishes
//! the applied events, and re-renders through a [`Presenter`]. Rejected
//! operations change nothing and trigger none of that.

use serde::de::DeserializeOwned;

use shopledger_cart::{Cart, CartLine};
use shopledger_catalog::{Catalog, Product, parse_product_form, seed_products};
use shopledger_core::{DomainResult, ProductId, SessionId};
use shopledger_events::{EventBus, InMemoryEventBus, Subscription};

use crate::collaborators::{KeyValueStore, Presenter, StorageKey, StoreError};
use crate::command::LedgerCommand;
use crate::event::LedgerEvent;
use crate::ledger::{Ledger, added_product, held_line};
use crate::totals::{CheckoutSummary, Surcharges};

/// Session settings.
#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontOptions {
    pub surcharges: Surcharges,
    /// Add the starter products when the stored catalog is empty.
    pub seed_when_empty: bool,
}

impl Default for StorefrontOptions {
    fn default() -> Self {
        Self {
            surcharges: Surcharges::default(),
            seed_when_empty: true,
        }
    }
}

pub struct Storefront<S, P> {
    ledger: Ledger,
    store: S,
    presenter: P,
    filter: String,
    surcharges: Surcharges,
    bus: InMemoryEventBus<LedgerEvent>,
}

impl<S, P> core::fmt::Debug for Storefront<S, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Storefront")
            .field("ledger", &self.ledger)
            .field("filter", &self.filter)
            .field("surcharges", &self.surcharges)
            .finish_non_exhaustive()
    }
}

impl<S, P> Storefront<S, P>
where
    S: KeyValueStore,
    P: Presenter,
{
    /// Open a session over whatever `store` holds.
    ///
    /// Unreadable or malformed stored data is logged and treated as absent.
    pub fn open(store: S, presenter: P, options: StorefrontOptions) -> Self {
        let catalog = load::<_, Vec<Product>>(&store, StorageKey::Catalog)
            .and_then(|products| {
                Catalog::from_products(products)
                    .map_err(|e| tracing::warn!(error = %e, "discarding stored catalog"))
                    .ok()
            })
            .unwrap_or_default();
        let cart = load::<_, Vec<CartLine>>(&store, StorageKey::Cart)
            .and_then(|lines| {
                Cart::from_lines(lines)
                    .map_err(|e| tracing::warn!(error = %e, "discarding stored cart"))
                    .ok()
            })
            .unwrap_or_default();

        let session = SessionId::new();
        let ledger = Ledger::from_parts(session, catalog.clone(), cart).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding stored cart");
            Ledger::with_catalog(session, catalog)
        });

        let mut storefront = Self {
            ledger,
            store,
            presenter,
            filter: String::new(),
            surcharges: options.surcharges,
            bus: InMemoryEventBus::new(),
        };

        if options.seed_when_empty && storefront.ledger.catalog().is_empty() {
            storefront.seed();
        }

        tracing::info!(
            session = %storefront.ledger.id_typed(),
            products = storefront.ledger.catalog().len(),
            cart_lines = storefront.ledger.cart().len(),
            "storefront opened"
        );
        storefront.render();
        storefront
    }

    fn seed(&mut self) {
        for product in seed_products() {
            let command = LedgerCommand::add_product(
                product.name(),
                product.price(),
                i64::from(product.stock()),
            );
            if let Err(err) = self.ledger.execute(&command) {
                tracing::warn!(error = %err, "skipping seed product");
            }
        }
        tracing::info!(products = self.ledger.catalog().len(), "seeded empty catalog");
        self.persist_logged();
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn surcharges(&self) -> &Surcharges {
        &self.surcharges
    }

    /// Receive every event applied from now on.
    pub fn subscribe(&self) -> Subscription<LedgerEvent> {
        self.bus.subscribe()
    }

    /// Set the catalog search text and re-render.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        self.render();
    }

    pub fn add_product(&mut self, name: &str, price: f64, stock: i64) -> DomainResult<Product> {
        let command = LedgerCommand::add_product(name, price, stock);
        self.dispatch(&command)?;
        added_product(&self.ledger, &command)
    }

    /// Add a product from raw form text (price and stock still unparsed).
    pub fn add_product_form(&mut self, name: &str, price: &str, stock: &str) -> DomainResult<Product> {
        let parsed = parse_product_form(name, price, stock)?;
        self.add_product(parsed.name(), parsed.price(), i64::from(parsed.stock()))
    }

    pub fn add_to_cart(&mut self, id: &ProductId) -> DomainResult<CartLine> {
        self.dispatch(&LedgerCommand::add_to_cart(id))?;
        held_line(&self.ledger, id)
    }

    pub fn increment_cart_line(&mut self, id: &ProductId) -> DomainResult<()> {
        self.dispatch(&LedgerCommand::increment(id))
    }

    pub fn decrement_cart_line(&mut self, id: &ProductId) -> DomainResult<()> {
        self.dispatch(&LedgerCommand::decrement(id))
    }

    pub fn remove_cart_line(&mut self, id: &ProductId) -> DomainResult<()> {
        self.dispatch(&LedgerCommand::remove(id))
    }

    pub fn clear_cart(&mut self) {
        if let Err(err) = self.dispatch(&LedgerCommand::clear()) {
            tracing::error!(error = %err, "clearing the cart was rejected");
        }
    }

    pub fn checkout_summary(&self, shipping: bool) -> CheckoutSummary {
        self.ledger.checkout_summary(&self.surcharges, shipping)
    }

    /// Write catalog and cart to the store.
    pub fn persist(&self) -> Result<(), StoreError> {
        let catalog = serde_json::to_string(self.ledger.catalog())?;
        self.store.put(StorageKey::Catalog, &catalog)?;
        let cart = serde_json::to_string(self.ledger.cart())?;
        self.store.put(StorageKey::Cart, &cart)?;
        Ok(())
    }

    fn persist_logged(&self) {
        if let Err(err) = self.persist() {
            tracing::error!(error = %err, "failed to persist ledger state");
        }
    }

    fn render(&mut self) {
        let catalog = self.ledger.filter_catalog(&self.filter);
        self.presenter
            .render(&catalog, self.ledger.cart().lines(), self.ledger.compute_total());
    }

    fn dispatch(&mut self, command: &LedgerCommand) -> DomainResult<()> {
        let events = self.ledger.execute(command)?;
        if events.is_empty() {
            return Ok(());
        }

        self.persist_logged();
        for event in events {
            if let Err(err) = self.bus.publish(event) {
                tracing::error!(error = %err, "failed to publish ledger event");
            }
        }
        self.render();
        Ok(())
    }
}

fn load<S, T>(store: &S, key: StorageKey) -> Option<T>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(%key, error = %err, "failed to read stored state");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(%key, error = %err, "ignoring malformed stored state");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    use shopledger_core::DomainError;
    use shopledger_events::Event;

    use super::*;

    #[derive(Default)]
    struct RecordingStore {
        values: RefCell<HashMap<StorageKey, String>>,
        writes: Cell<usize>,
        fail_writes: bool,
    }

    impl KeyValueStore for RecordingStore {
        fn get(&self, key: StorageKey) -> Result<Option<String>, StoreError> {
            Ok(self.values.borrow().get(&key).cloned())
        }

        fn put(&self, key: StorageKey, value: &str) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.writes.set(self.writes.get() + 1);
            self.values.borrow_mut().insert(key, value.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        renders: Vec<(Vec<String>, usize, f64)>,
    }

    impl Presenter for RecordingPresenter {
        fn render(&mut self, catalog: &[&Product], cart: &[CartLine], total: f64) {
            let names = catalog.iter().map(|p| p.name().to_string()).collect();
            self.renders.push((names, cart.len(), total));
        }
    }

    fn unseeded() -> StorefrontOptions {
        StorefrontOptions {
            seed_when_empty: false,
            ..StorefrontOptions::default()
        }
    }

    #[test]
    fn open_seeds_empty_catalog_and_persists_it() {
        let store = RecordingStore::default();
        let sf = Storefront::open(&store, RecordingPresenter::default(), StorefrontOptions::default());

        assert_eq!(sf.ledger().catalog().len(), 4);
        assert_eq!(sf.ledger().catalog().products()[0].name(), "Mate Clásico");
        assert!(store.values.borrow().contains_key(&StorageKey::Catalog));
        assert_eq!(sf.presenter().renders.len(), 1);
    }

    #[test]
    fn open_without_seeding_stays_empty() {
        let store = RecordingStore::default();
        let sf = Storefront::open(&store, RecordingPresenter::default(), unseeded());
        assert!(sf.ledger().catalog().is_empty());
        assert_eq!(store.writes.get(), 0);
    }

    #[test]
    fn reopening_restores_state_without_reseeding() {
        let store = RecordingStore::default();
        let mate = {
            let mut sf = Storefront::open(&store, RecordingPresenter::default(), StorefrontOptions::default());
            let mate = sf.ledger().catalog().products()[0].id_typed().clone();
            sf.add_to_cart(&mate).unwrap();
            sf.add_to_cart(&mate).unwrap();
            mate
        };

        let sf = Storefront::open(&store, RecordingPresenter::default(), StorefrontOptions::default());
        assert_eq!(sf.ledger().catalog().len(), 4);
        assert_eq!(sf.ledger().held_units(&mate), 2);
        assert_eq!(sf.ledger().product(&mate).unwrap().stock(), 3);
    }

    #[test]
    fn malformed_stored_state_is_ignored() {
        let store = RecordingStore::default();
        store.values.borrow_mut().insert(StorageKey::Catalog, "not json".to_string());
        store.values.borrow_mut().insert(StorageKey::Cart, "{\"oops\":1}".to_string());

        let sf = Storefront::open(&store, RecordingPresenter::default(), unseeded());
        assert!(sf.ledger().catalog().is_empty());
        assert!(sf.ledger().cart().is_empty());
    }

    #[test]
    fn uncountable_stored_cart_is_dropped_but_catalog_kept() {
        let store = RecordingStore::default();
        store.values.borrow_mut().insert(
            StorageKey::Catalog,
            r#"[{"id": "p", "name": " Mate ", "price": 10.0, "stock": 4294967295}]"#.to_string(),
        );
        store.values.borrow_mut().insert(
            StorageKey::Cart,
            r#"[{"productId": "p", "name": "Mate", "price": 10.0, "qty": 5}]"#.to_string(),
        );

        let sf = Storefront::open(&store, RecordingPresenter::default(), unseeded());
        let id: ProductId = "p".parse().unwrap();
        assert_eq!(sf.ledger().product(&id).unwrap().name(), "Mate");
        assert_eq!(sf.ledger().product(&id).unwrap().stock(), u32::MAX);
        assert!(sf.ledger().cart().is_empty());
    }

    #[test]
    fn successful_mutations_persist_publish_and_render() {
        let store = RecordingStore::default();
        let mut sf = Storefront::open(&store, RecordingPresenter::default(), unseeded());
        let events = sf.subscribe();

        let product = sf.add_product("Mate", 100.0, 5).unwrap();
        let writes_after_add = store.writes.get();
        assert_eq!(writes_after_add, 2);

        sf.add_to_cart(product.id_typed()).unwrap();
        assert_eq!(store.writes.get(), 4);

        let received: Vec<_> = events.drain().iter().map(|e| e.event_type()).collect();
        assert_eq!(received, ["ledger.catalog.product_added", "ledger.cart.line_opened"]);

        let (_, lines, total) = sf.presenter().renders.last().cloned().unwrap();
        assert_eq!(lines, 1);
        assert_eq!(total, 100.0);

        let stored_cart = store.values.borrow().get(&StorageKey::Cart).cloned().unwrap();
        let lines: Vec<CartLine> = serde_json::from_str(&stored_cart).unwrap();
        assert_eq!(lines[0].qty(), 1);
    }

    #[test]
    fn failed_operations_do_not_persist_or_render() {
        let store = RecordingStore::default();
        let mut sf = Storefront::open(&store, RecordingPresenter::default(), unseeded());
        let product = sf.add_product("Mate", 100.0, 0).unwrap();
        let writes = store.writes.get();
        let renders = sf.presenter().renders.len();

        assert_eq!(
            sf.add_to_cart(product.id_typed()).unwrap_err(),
            DomainError::OutOfStock(product.id_typed().clone())
        );
        assert!(sf.add_product("", -1.0, -1).is_err());
        sf.clear_cart();

        assert_eq!(store.writes.get(), writes);
        assert_eq!(sf.presenter().renders.len(), renders);
    }

    #[test]
    fn persistence_failure_keeps_in_memory_mutation() {
        let store = RecordingStore {
            fail_writes: true,
            ..RecordingStore::default()
        };
        let mut sf = Storefront::open(&store, RecordingPresenter::default(), unseeded());
        let product = sf.add_product("Mate", 100.0, 2).unwrap();

        sf.add_to_cart(product.id_typed()).unwrap();
        assert_eq!(sf.ledger().held_units(product.id_typed()), 1);
        assert!(matches!(sf.persist(), Err(StoreError::Io(_))));
    }

    #[test]
    fn filter_narrows_rendered_catalog() {
        let store = RecordingStore::default();
        let mut sf = Storefront::open(&store, RecordingPresenter::default(), StorefrontOptions::default());

        sf.set_filter("TERMO");
        let (names, _, _) = sf.presenter().renders.last().cloned().unwrap();
        assert_eq!(names, ["Termo acero 1L"]);

        // Filter persists across mutations.
        let yerba = sf.ledger().catalog().products()[1].id_typed().clone();
        sf.add_to_cart(&yerba).unwrap();
        let (names, lines, _) = sf.presenter().renders.last().cloned().unwrap();
        assert_eq!(names, ["Termo acero 1L"]);
        assert_eq!(lines, 1);
    }

    #[test]
    fn form_input_is_parsed_and_validated() {
        let store = RecordingStore::default();
        let mut sf = Storefront::open(&store, RecordingPresenter::default(), unseeded());

        let p = sf.add_product_form(" Bombilla ", "2900", "8").unwrap();
        assert_eq!(p.name(), "Bombilla");
        assert_eq!(p.stock(), 8);

        let err = sf.add_product_form("B", "free", "-1").unwrap_err();
        assert_eq!(err.violations().len(), 3);
    }

    #[test]
    fn cart_round_trip_through_storefront() {
        let store = RecordingStore::default();
        let mut sf = Storefront::open(&store, RecordingPresenter::default(), unseeded());
        let id = sf.add_product("Termo", 500.0, 3).unwrap().id_typed().clone();

        sf.add_to_cart(&id).unwrap();
        sf.increment_cart_line(&id).unwrap();
        assert!((sf.checkout_summary(true).grand_total - 1310.0).abs() < 1e-9);

        sf.decrement_cart_line(&id).unwrap();
        sf.remove_cart_line(&id).unwrap();
        assert!(sf.ledger().cart().is_empty());
        assert_eq!(sf.ledger().product(&id).unwrap().stock(), 3);
        assert!(matches!(sf.remove_cart_line(&id), Err(DomainError::NotFound(_))));
    }
}
