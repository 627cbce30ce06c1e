//! Cart totals with flat tax and optional flat shipping.
//!
//! Rates and fees are caller-supplied so the ledger stays policy-free.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use shopledger_core::{DomainError, DomainResult};

pub const DEFAULT_TAX_RATE: f64 = 0.21;
pub const DEFAULT_SHIPPING_COST: f64 = 100.0;

/// `subtotal * (1 + tax_rate) + (shipping ? shipping_cost : 0)`.
pub fn surcharged_total(subtotal: f64, tax_rate: f64, shipping: bool, shipping_cost: f64) -> f64 {
    let shipping = if shipping { shipping_cost } else { 0.0 };
    subtotal * (1.0 + tax_rate) + shipping
}

/// Tax rate and flat shipping fee applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surcharges {
    pub tax_rate: f64,
    pub shipping_cost: f64,
}

impl Default for Surcharges {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            shipping_cost: DEFAULT_SHIPPING_COST,
        }
    }
}

impl Surcharges {
    /// Both values must be finite and non-negative.
    pub fn new(tax_rate: f64, shipping_cost: f64) -> DomainResult<Self> {
        let mut violations = Vec::new();
        if !(tax_rate.is_finite() && tax_rate >= 0.0) {
            violations.push("tax rate must be a number greater than or equal to 0");
        }
        if !(shipping_cost.is_finite() && shipping_cost >= 0.0) {
            violations.push("shipping cost must be a number greater than or equal to 0");
        }
        if !violations.is_empty() {
            return Err(DomainError::validation(violations));
        }
        Ok(Self {
            tax_rate,
            shipping_cost,
        })
    }

    pub fn total(&self, subtotal: f64, shipping: bool) -> f64 {
        surcharged_total(subtotal, self.tax_rate, shipping, self.shipping_cost)
    }

    pub fn summarize(&self, subtotal: f64, shipping: bool) -> CheckoutSummary {
        let taxed_total = subtotal * (1.0 + self.tax_rate);
        let fee = if shipping { self.shipping_cost } else { 0.0 };
        CheckoutSummary {
            subtotal,
            taxed_total,
            with_shipping: shipping,
            shipping: fee,
            grand_total: taxed_total + fee,
        }
    }
}

/// Breakdown of a checkout total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub subtotal: f64,
    pub taxed_total: f64,
    /// Whether shipping was requested, even when the fee is zero.
    pub with_shipping: bool,
    pub shipping: f64,
    pub grand_total: f64,
}

impl CheckoutSummary {
    pub fn includes_shipping(&self) -> bool {
        self.with_shipping
    }
}

/// One named price in an ad-hoc quote, written `NAME=PRICE` on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    pub name: String,
    pub price: f64,
}

impl QuoteItem {
    pub fn new(name: impl AsRef<str>, price: f64) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            price,
        }
    }
}

impl FromStr for QuoteItem {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, price) = s
            .rsplit_once('=')
            .ok_or_else(|| DomainError::validation([format!("item {s:?} must look like NAME=PRICE")]))?;
        let price = price
            .trim()
            .parse::<f64>()
            .map_err(|_| DomainError::validation([format!("price of {s:?} is not a number")]))?;
        Ok(Self::new(name, price))
    }
}

/// Itemized checkout: the entered items in order, then the totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub items: Vec<QuoteItem>,
    pub summary: CheckoutSummary,
}

/// Checkout over an ad-hoc list of items (no catalog, no cart).
///
/// Every item needs a name and a finite, non-negative price; each offending
/// entry is reported by its 1-based position.
pub fn quote(items: Vec<QuoteItem>, surcharges: &Surcharges, shipping: bool) -> DomainResult<Quote> {
    let mut violations = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if item.name.is_empty() {
            violations.push(format!("item #{} needs a name", i + 1));
        }
        if !(item.price.is_finite() && item.price >= 0.0) {
            violations.push(format!(
                "price #{} must be a number greater than or equal to 0",
                i + 1
            ));
        }
    }
    if !violations.is_empty() {
        return Err(DomainError::Validation(violations));
    }
    let subtotal = items.iter().map(|item| item.price).sum();
    Ok(Quote {
        items,
        summary: surcharges.summarize(subtotal, shipping),
    })
}
