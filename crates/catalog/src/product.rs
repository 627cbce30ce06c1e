use serde::{Deserialize, Serialize};

use shopledger_core::{DomainError, DomainResult, Entity, ProductId};

use crate::validation;

/// A catalog product.
///
/// `stock` counts units currently available for purchase, i.e. not held by
/// any cart line. It is unsigned, so it can never go negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredProduct")]
pub struct Product {
    id: ProductId,
    name: String,
    price: f64,
    stock: u32,
}

/// Persisted shape; read back through [`Product::new`] so the name is
/// trimmed the same way as on creation.
#[derive(Deserialize)]
struct StoredProduct {
    id: ProductId,
    name: String,
    price: f64,
    stock: u32,
}

impl From<StoredProduct> for Product {
    fn from(stored: StoredProduct) -> Self {
        Product::new(stored.id, stored.name, stored.price, stored.stock)
    }
}

impl Product {
    /// Build a product from already-validated parts.
    ///
    /// Prefer [`crate::validate_product`] for user input; this constructor
    /// only trims the name.
    pub fn new(id: ProductId, name: impl AsRef<str>, price: f64, stock: u32) -> Self {
        Self {
            id,
            name: name.as_ref().trim().to_string(),
            price,
            stock,
        }
    }

    pub fn id_typed(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Take one unit out of available stock.
    pub fn take_unit(&mut self) -> DomainResult<()> {
        self.stock = self
            .stock
            .checked_sub(1)
            .ok_or_else(|| DomainError::out_of_stock(&self.id))?;
        Ok(())
    }

    /// Return `qty` units to available stock. Fails without change when the
    /// count would not fit.
    pub fn restock(&mut self, qty: u32) -> DomainResult<()> {
        self.stock = self.stock.checked_add(qty).ok_or_else(|| {
            DomainError::invariant(format!("stock of {} cannot take {qty} more units", self.id))
        })?;
        Ok(())
    }

    /// Re-check the field rules on a product that did not come through
    /// validation (e.g. one read back from storage).
    pub fn check(&self) -> DomainResult<()> {
        let mut violations = Vec::new();
        if !validation::name_is_valid(&self.name) {
            violations.push(validation::NAME_RULE.to_string());
        }
        if !validation::price_is_valid(self.price) {
            violations.push(validation::PRICE_RULE.to_string());
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(violations))
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
