use serde::{Deserialize, Serialize};

use shopledger_cart::CartLine;
use shopledger_catalog::Product;

/// Plain-data copy of a ledger's state: the persisted shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub catalog: Vec<Product>,
    pub cart: Vec<CartLine>,
}

impl LedgerSnapshot {
    /// Units of every product: available plus held, keyed by product id.
    ///
    /// Lines whose product is missing from the catalog still count.
    pub fn units_by_product(&self) -> std::collections::BTreeMap<String, u64> {
        let mut units = std::collections::BTreeMap::new();
        for p in &self.catalog {
            *units.entry(p.id_typed().to_string()).or_insert(0) += u64::from(p.stock());
        }
        for line in &self.cart {
            *units.entry(line.product_id().to_string()).or_insert(0) += u64::from(line.qty());
        }
        units
    }
}
