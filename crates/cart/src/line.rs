use serde::{Deserialize, Serialize};

use shopledger_catalog::Product;
use shopledger_core::{DomainError, DomainResult, Entity, ProductId};

/// Cart line: one product, how many units are held, and the name/price seen
/// when the line was opened.
///
/// Later catalog edits do not change an existing line. `qty` is always >= 1
/// while the line exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    product_id: ProductId,
    name: String,
    price: f64,
    qty: u32,
}

impl CartLine {
    /// Open a line holding one unit of `product`.
    pub fn open(product: &Product) -> Self {
        Self::opened(product.id_typed().clone(), product.name(), product.price())
    }

    /// Open a line holding one unit, from an already-taken name/price snapshot.
    pub fn opened(product_id: ProductId, name: impl Into<String>, price: f64) -> Self {
        Self {
            product_id,
            name: name.into(),
            price,
            qty: 1,
        }
    }

    /// Rebuild a line from stored parts.
    pub fn restore(product_id: ProductId, name: impl Into<String>, price: f64, qty: u32) -> DomainResult<Self> {
        let line = Self {
            product_id,
            name: name.into(),
            price,
            qty,
        };
        line.check()?;
        Ok(line)
    }

    /// Re-check a line that did not come through [`CartLine::open`].
    pub fn check(&self) -> DomainResult<()> {
        if self.qty == 0 {
            return Err(DomainError::invariant(format!(
                "cart line for {} has zero quantity",
                self.product_id
            )));
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err(DomainError::invariant(format!(
                "cart line for {} has an invalid price",
                self.product_id
            )));
        }
        Ok(())
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn qty(&self) -> u32 {
        self.qty
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.qty)
    }

    /// Hold one more unit. Fails without change when the count would not fit.
    pub fn increment(&mut self) -> DomainResult<()> {
        self.qty = self.qty.checked_add(1).ok_or_else(|| {
            DomainError::invariant(format!("cart line for {} cannot hold more units", self.product_id))
        })?;
        Ok(())
    }

    /// Drop one unit; returns the remaining quantity. A line at zero must be
    /// removed by its owner.
    pub fn decrement(&mut self) -> u32 {
        self.qty = self.qty.saturating_sub(1);
        self.qty
    }
}

impl Entity for CartLine {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.product_id
    }
}
