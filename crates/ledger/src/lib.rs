//! Inventory-Cart Ledger.
//!
//! Owns a catalog and a cart and keeps every unit of stock accounted for as
//! either available in the catalog or held by a cart line. All mutations go
//! through [`Ledger`]; rendering and persistence observe it from the outside
//! (see [`Storefront`]).

pub mod collaborators;
pub mod command;
pub mod event;
pub mod ledger;
pub mod snapshot;
pub mod storefront;
pub mod totals;

pub use collaborators::{KeyValueStore, NoopPresenter, Presenter, StorageKey, StoreError};
pub use command::{
    AddProduct, AddToCart, ClearCart, DecrementCartLine, IncrementCartLine, LedgerCommand,
    RemoveCartLine,
};
pub use event::{
    CartCleared, CartLineDecremented, CartLineIncremented, CartLineOpened, CartLineRemoved,
    LedgerEvent, ProductAdded, ReturnedUnits,
};
pub use ledger::Ledger;
pub use snapshot::LedgerSnapshot;
pub use storefront::{Storefront, StorefrontOptions};
pub use totals::{CheckoutSummary, Quote, QuoteItem, Surcharges, quote, surcharged_total};
