use shopledger_cart::{Cart, CartLine};
use shopledger_catalog::{Catalog, Product, validate_product};
use shopledger_core::{Aggregate, AggregateRoot, DomainError, DomainResult, ProductId, SessionId};
use shopledger_events::Event;

use crate::command::{
    AddProduct, AddToCart, DecrementCartLine, IncrementCartLine, LedgerCommand, RemoveCartLine,
};
use crate::event::{
    CartCleared, CartLineDecremented, CartLineIncremented, CartLineOpened, CartLineRemoved,
    LedgerEvent, ProductAdded, ReturnedUnits,
};
use crate::snapshot::LedgerSnapshot;
use crate::totals::{Surcharges, CheckoutSummary, surcharged_total};

/// Aggregate root: the Inventory-Cart Ledger of one session.
///
/// Every unit of every product is either available in the catalog or held by
/// exactly one cart line. Operations are decided by `handle` against the
/// current state and only then applied, so a rejected operation changes
/// nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    id: SessionId,
    catalog: Catalog,
    cart: Cart,
    version: u64,
}

impl Ledger {
    /// An empty ledger (no products, empty cart).
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            catalog: Catalog::new(),
            cart: Cart::new(),
            version: 0,
        }
    }

    /// Rebuild a ledger from stored products and lines.
    ///
    /// Lines whose product is no longer in the catalog are kept; returning
    /// their units is skipped when they are removed.
    pub fn restore(id: SessionId, products: Vec<Product>, lines: Vec<CartLine>) -> DomainResult<Self> {
        Self::from_parts(
            id,
            Catalog::from_products(products)?,
            Cart::from_lines(lines)?,
        )
    }

    pub fn from_snapshot(id: SessionId, snapshot: LedgerSnapshot) -> DomainResult<Self> {
        Self::restore(id, snapshot.catalog, snapshot.cart)
    }

    /// Assemble a ledger from an already-checked catalog and cart.
    ///
    /// Fails when a product's available plus held units would not fit in a
    /// `u32`: such a pair could not be moved back into stock.
    pub fn from_parts(id: SessionId, catalog: Catalog, cart: Cart) -> DomainResult<Self> {
        for line in cart.lines() {
            if let Some(product) = catalog.get(line.product_id()) {
                ensure_countable(product.id_typed(), product.stock(), line.qty())?;
            }
        }
        Ok(Self {
            id,
            catalog,
            cart,
            version: 0,
        })
    }

    /// A ledger over `catalog` with an empty cart.
    pub fn with_catalog(id: SessionId, catalog: Catalog) -> Self {
        Self {
            id,
            catalog,
            cart: Cart::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> SessionId {
        self.id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.catalog.get(id)
    }

    pub fn cart_line(&self, id: &ProductId) -> Option<&CartLine> {
        self.cart.get(id)
    }

    /// Units of `id` held by the cart.
    pub fn held_units(&self, id: &ProductId) -> u32 {
        self.cart.held(id)
    }

    /// Catalog entries whose name contains `query` (case-insensitive).
    pub fn filter_catalog(&self, query: &str) -> Vec<&Product> {
        self.catalog.filter(query)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            catalog: self.catalog.products().to_vec(),
            cart: self.cart.lines().to_vec(),
        }
    }

    /// Decide and apply a command; returns the applied events.
    pub fn execute(&mut self, command: &LedgerCommand) -> DomainResult<Vec<LedgerEvent>> {
        match shopledger_events::execute(self, command) {
            Ok(events) => {
                tracing::debug!(
                    command = command.name(),
                    events = events.len(),
                    version = self.version,
                    "ledger command applied"
                );
                Ok(events)
            }
            Err(err) => {
                tracing::debug!(command = command.name(), error = %err, "ledger command rejected");
                Err(err)
            }
        }
    }

    /// Validate and append a new product with a fresh identifier.
    ///
    /// On failure every violated rule is reported.
    pub fn add_product(&mut self, name: &str, price: f64, stock: i64) -> DomainResult<Product> {
        let command = LedgerCommand::add_product(name, price, stock);
        self.execute(&command)?;
        added_product(self, &command)
    }

    /// Move one unit of `id` from the catalog into the cart.
    pub fn add_to_cart(&mut self, id: &ProductId) -> DomainResult<CartLine> {
        self.execute(&LedgerCommand::add_to_cart(id))?;
        held_line(self, id)
    }

    /// Move one more unit into an existing line. Refused with `OutOfStock`
    /// when the product has no units left.
    pub fn increment_cart_line(&mut self, id: &ProductId) -> DomainResult<()> {
        self.execute(&LedgerCommand::increment(id)).map(drop)
    }

    /// Return one unit from a line to the catalog; the line closes at zero.
    pub fn decrement_cart_line(&mut self, id: &ProductId) -> DomainResult<()> {
        self.execute(&LedgerCommand::decrement(id)).map(drop)
    }

    /// Return a line's whole quantity to the catalog and drop the line.
    pub fn remove_cart_line(&mut self, id: &ProductId) -> DomainResult<()> {
        self.execute(&LedgerCommand::remove(id)).map(drop)
    }

    /// Return every held unit and empty the cart. Never fails.
    pub fn clear_cart(&mut self) {
        for ev in self.handle_clear(chrono::Utc::now()) {
            self.apply(&ev);
        }
    }

    /// Sum of `price * qty` over the cart, using the prices snapshotted on
    /// each line.
    pub fn compute_total(&self) -> f64 {
        self.cart.total()
    }

    pub fn compute_total_with_surcharges(&self, tax_rate: f64, shipping: bool, shipping_cost: f64) -> f64 {
        surcharged_total(self.compute_total(), tax_rate, shipping, shipping_cost)
    }

    pub fn checkout_summary(&self, surcharges: &Surcharges, shipping: bool) -> CheckoutSummary {
        surcharges.summarize(self.compute_total(), shipping)
    }
}

pub(crate) fn added_product(ledger: &Ledger, command: &LedgerCommand) -> DomainResult<Product> {
    match command {
        LedgerCommand::AddProduct(cmd) => ledger
            .product(&cmd.product_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("product {}", cmd.product_id))),
        _ => Err(DomainError::invariant("expected an AddProduct command")),
    }
}

fn ensure_countable(id: &ProductId, available: u32, held: u32) -> DomainResult<()> {
    match available.checked_add(held) {
        Some(_) => Ok(()),
        None => Err(DomainError::invariant(format!(
            "units of {id} ({available} available, {held} held) exceed the countable range"
        ))),
    }
}

/// Outcome of a unit move inside `apply`. `handle` rules failures out, so
/// one showing up here means the state was inconsistent to begin with.
fn settle(event: &'static str, result: DomainResult<()>) {
    if let Err(err) = result {
        tracing::error!(event, error = %err, "event applied against inconsistent state");
        debug_assert!(false, "{event} applied against inconsistent state: {err}");
    }
}

pub(crate) fn held_line(ledger: &Ledger, id: &ProductId) -> DomainResult<CartLine> {
    ledger
        .cart_line(id)
        .cloned()
        .ok_or_else(|| DomainError::not_found(format!("cart line for {id}")))
}

impl AggregateRoot for Ledger {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Ledger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        let name = event.event_type();
        match event {
            LedgerEvent::ProductAdded(e) => {
                self.catalog.push(e.product.clone());
            }
            LedgerEvent::CartLineOpened(e) => {
                if let Some(product) = self.catalog.get_mut(&e.product_id) {
                    settle(name, product.take_unit());
                }
                self.cart
                    .push(CartLine::opened(e.product_id.clone(), e.name.clone(), e.price));
            }
            LedgerEvent::CartLineIncremented(e) => {
                if let Some(product) = self.catalog.get_mut(&e.product_id) {
                    settle(name, product.take_unit());
                }
                if let Some(line) = self.cart.get_mut(&e.product_id) {
                    settle(name, line.increment());
                }
            }
            LedgerEvent::CartLineDecremented(e) => {
                if let Some(product) = self.catalog.get_mut(&e.product_id) {
                    settle(name, product.restock(1));
                }
                let remaining = self.cart.get_mut(&e.product_id).map(|line| line.decrement());
                if remaining == Some(0) {
                    self.cart.remove(&e.product_id);
                }
            }
            LedgerEvent::CartLineRemoved(e) => {
                if let Some(product) = self.catalog.get_mut(&e.product_id) {
                    settle(name, product.restock(e.quantity));
                }
                self.cart.remove(&e.product_id);
            }
            LedgerEvent::CartCleared(e) => {
                for returned in &e.returned {
                    if let Some(product) = self.catalog.get_mut(&returned.product_id) {
                        settle(name, product.restock(returned.quantity));
                    }
                }
                self.cart.take_all();
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::AddProduct(cmd) => self.handle_add_product(cmd),
            LedgerCommand::AddToCart(cmd) => self.handle_add_to_cart(cmd),
            LedgerCommand::IncrementCartLine(cmd) => self.handle_increment(cmd),
            LedgerCommand::DecrementCartLine(cmd) => self.handle_decrement(cmd),
            LedgerCommand::RemoveCartLine(cmd) => self.handle_remove(cmd),
            LedgerCommand::ClearCart(cmd) => Ok(self.handle_clear(cmd.occurred_at)),
        }
    }
}

impl Ledger {
    fn require_product(&self, id: &ProductId) -> DomainResult<&Product> {
        self.catalog
            .get(id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))
    }

    fn require_line(&self, id: &ProductId) -> DomainResult<&CartLine> {
        self.cart
            .get(id)
            .ok_or_else(|| DomainError::not_found(format!("cart line for {id}")))
    }

    fn handle_add_product(&self, cmd: &AddProduct) -> DomainResult<Vec<LedgerEvent>> {
        let new_product = validate_product(&cmd.name, cmd.price, cmd.stock)?;
        if self.catalog.contains(&cmd.product_id) {
            return Err(DomainError::invariant(format!(
                "product id {} already exists",
                cmd.product_id
            )));
        }
        let product = new_product.into_product(cmd.product_id.clone());
        // A cart line left over from an earlier product with this id keeps
        // its units; they must still fit once returned.
        ensure_countable(&cmd.product_id, product.stock(), self.cart.held(&cmd.product_id))?;
        Ok(vec![LedgerEvent::ProductAdded(ProductAdded {
            product,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_to_cart(&self, cmd: &AddToCart) -> DomainResult<Vec<LedgerEvent>> {
        let product = self.require_product(&cmd.product_id)?;
        if !product.is_in_stock() {
            return Err(DomainError::out_of_stock(&cmd.product_id));
        }

        let event = if self.cart.get(&cmd.product_id).is_some() {
            LedgerEvent::CartLineIncremented(CartLineIncremented {
                product_id: cmd.product_id.clone(),
                occurred_at: cmd.occurred_at,
            })
        } else {
            LedgerEvent::CartLineOpened(CartLineOpened {
                product_id: cmd.product_id.clone(),
                name: product.name().to_string(),
                price: product.price(),
                occurred_at: cmd.occurred_at,
            })
        };
        Ok(vec![event])
    }

    fn handle_increment(&self, cmd: &IncrementCartLine) -> DomainResult<Vec<LedgerEvent>> {
        let product = self.require_product(&cmd.product_id)?;
        self.require_line(&cmd.product_id)?;
        if !product.is_in_stock() {
            return Err(DomainError::out_of_stock(&cmd.product_id));
        }
        Ok(vec![LedgerEvent::CartLineIncremented(CartLineIncremented {
            product_id: cmd.product_id.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_decrement(&self, cmd: &DecrementCartLine) -> DomainResult<Vec<LedgerEvent>> {
        self.require_product(&cmd.product_id)?;
        self.require_line(&cmd.product_id)?;
        Ok(vec![LedgerEvent::CartLineDecremented(CartLineDecremented {
            product_id: cmd.product_id.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveCartLine) -> DomainResult<Vec<LedgerEvent>> {
        let line = self.require_line(&cmd.product_id)?;
        Ok(vec![LedgerEvent::CartLineRemoved(CartLineRemoved {
            product_id: cmd.product_id.clone(),
            quantity: line.qty(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_clear(&self, occurred_at: chrono::DateTime<chrono::Utc>) -> Vec<LedgerEvent> {
        if self.cart.is_empty() {
            return Vec::new();
        }
        let returned = self
            .cart
            .lines()
            .iter()
            .map(|line| ReturnedUnits {
                product_id: line.product_id().clone(),
                quantity: line.qty(),
            })
            .collect();
        vec![LedgerEvent::CartCleared(CartCleared {
            returned,
            occurred_at,
        })]
    }
}
