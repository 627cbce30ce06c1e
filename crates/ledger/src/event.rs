use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopledger_catalog::Product;
use shopledger_core::ProductId;
use shopledger_events::Event;

/// Event: ProductAdded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAdded {
    pub product: Product,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartLineOpened (first unit of a product moved into the cart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineOpened {
    pub product_id: ProductId,
    pub name: String,
    pub price: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartLineIncremented (one more unit moved from stock to the line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineIncremented {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartLineDecremented (one unit returned; the line closes at zero).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineDecremented {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartLineRemoved (whole quantity returned).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineRemoved {
    pub product_id: ProductId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Units handed back to one product when the cart is cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnedUnits {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub returned: Vec<ReturnedUnits>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    ProductAdded(ProductAdded),
    CartLineOpened(CartLineOpened),
    CartLineIncremented(CartLineIncremented),
    CartLineDecremented(CartLineDecremented),
    CartLineRemoved(CartLineRemoved),
    CartCleared(CartCleared),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::ProductAdded(_) => "ledger.catalog.product_added",
            LedgerEvent::CartLineOpened(_) => "ledger.cart.line_opened",
            LedgerEvent::CartLineIncremented(_) => "ledger.cart.line_incremented",
            LedgerEvent::CartLineDecremented(_) => "ledger.cart.line_decremented",
            LedgerEvent::CartLineRemoved(_) => "ledger.cart.line_removed",
            LedgerEvent::CartCleared(_) => "ledger.cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::ProductAdded(e) => e.occurred_at,
            LedgerEvent::CartLineOpened(e) => e.occurred_at,
            LedgerEvent::CartLineIncremented(e) => e.occurred_at,
            LedgerEvent::CartLineDecremented(e) => e.occurred_at,
            LedgerEvent::CartLineRemoved(e) => e.occurred_at,
            LedgerEvent::CartCleared(e) => e.occurred_at,
        }
    }
}
