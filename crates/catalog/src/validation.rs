//! Input rules for adding a product to the catalog.
//!
//! Validation never short-circuits: every violated rule is reported, in the
//! order name, price, stock.

use shopledger_core::{DomainError, DomainResult, ProductId};

use crate::product::Product;

pub const NAME_RULE: &str = "name must have at least 2 characters";
pub const PRICE_RULE: &str = "price must be a number greater than 0";
pub const STOCK_RULE: &str = "stock must be an integer greater than or equal to 0";
pub const STOCK_RANGE_RULE: &str = "stock is too large";

const MIN_NAME_CHARS: usize = 2;

/// A product that passed validation but has no identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    name: String,
    price: f64,
    stock: u32,
}

impl NewProduct {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn into_product(self, id: ProductId) -> Product {
        Product::new(id, self.name, self.price, self.stock)
    }
}

pub(crate) fn name_is_valid(name: &str) -> bool {
    name.trim().chars().count() >= MIN_NAME_CHARS
}

pub(crate) fn price_is_valid(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Validate typed product input.
pub fn validate_product(name: &str, price: f64, stock: i64) -> DomainResult<NewProduct> {
    let mut violations = Vec::new();

    if !name_is_valid(name) {
        violations.push(NAME_RULE);
    }
    if !price_is_valid(price) {
        violations.push(PRICE_RULE);
    }
    let stock = if stock < 0 {
        violations.push(STOCK_RULE);
        None
    } else {
        let converted = u32::try_from(stock).ok();
        if converted.is_none() {
            violations.push(STOCK_RANGE_RULE);
        }
        converted
    };

    match stock {
        Some(stock) if violations.is_empty() => Ok(NewProduct {
            name: name.trim().to_string(),
            price,
            stock,
        }),
        _ => Err(DomainError::validation(violations)),
    }
}

/// Validate raw form fields (free text, as typed by a user).
///
/// Price and stock are parsed as numbers; a stock value must be integral
/// (`"3"` and `"3.0"` are fine, `"2.5"` is not). An empty stock field counts
/// as zero. Unparseable values report the same rule as out-of-range ones.
pub fn parse_product_form(name: &str, price: &str, stock: &str) -> DomainResult<NewProduct> {
    let price = price.trim().parse::<f64>().unwrap_or(f64::NAN);

    let stock = stock.trim();
    let stock = if stock.is_empty() {
        Some(0)
    } else {
        stock
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite() && s.fract() == 0.0 && *s >= i64::MIN as f64 && *s <= i64::MAX as f64)
            .map(|s| s as i64)
    };

    match stock {
        Some(stock) => validate_product(name, price, stock),
        None => {
            // Collect the other rules too; the stock rule is already known to fail.
            let mut violations: Vec<String> = match validate_product(name, price, 0) {
                Ok(_) => Vec::new(),
                Err(e) => e.violations().to_vec(),
            };
            violations.push(STOCK_RULE.to_string());
            Err(DomainError::Validation(violations))
        }
    }
}
