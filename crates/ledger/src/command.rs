use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopledger_core::ProductId;

/// Command: AddProduct.
///
/// Carries raw input; the ledger validates it. `stock` is signed so a
/// negative value can be reported rather than rejected by the type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddProduct {
    pub product_id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddToCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCart {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: IncrementCartLine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementCartLine {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DecrementCartLine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecrementCartLine {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveCartLine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveCartLine {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerCommand {
    AddProduct(AddProduct),
    AddToCart(AddToCart),
    IncrementCartLine(IncrementCartLine),
    DecrementCartLine(DecrementCartLine),
    RemoveCartLine(RemoveCartLine),
    ClearCart(ClearCart),
}

impl LedgerCommand {
    /// AddProduct with a freshly generated id, stamped now.
    pub fn add_product(name: impl Into<String>, price: f64, stock: i64) -> Self {
        Self::AddProduct(AddProduct {
            product_id: ProductId::generate(),
            name: name.into(),
            price,
            stock,
            occurred_at: Utc::now(),
        })
    }

    pub fn add_to_cart(product_id: &ProductId) -> Self {
        Self::AddToCart(AddToCart {
            product_id: product_id.clone(),
            occurred_at: Utc::now(),
        })
    }

    pub fn increment(product_id: &ProductId) -> Self {
        Self::IncrementCartLine(IncrementCartLine {
            product_id: product_id.clone(),
            occurred_at: Utc::now(),
        })
    }

    pub fn decrement(product_id: &ProductId) -> Self {
        Self::DecrementCartLine(DecrementCartLine {
            product_id: product_id.clone(),
            occurred_at: Utc::now(),
        })
    }

    pub fn remove(product_id: &ProductId) -> Self {
        Self::RemoveCartLine(RemoveCartLine {
            product_id: product_id.clone(),
            occurred_at: Utc::now(),
        })
    }

    pub fn clear() -> Self {
        Self::ClearCart(ClearCart {
            occurred_at: Utc::now(),
        })
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerCommand::AddProduct(_) => "add_product",
            LedgerCommand::AddToCart(_) => "add_to_cart",
            LedgerCommand::IncrementCartLine(_) => "increment_cart_line",
            LedgerCommand::DecrementCartLine(_) => "decrement_cart_line",
            LedgerCommand::RemoveCartLine(_) => "remove_cart_line",
            LedgerCommand::ClearCart(_) => "clear_cart",
        }
    }
}
