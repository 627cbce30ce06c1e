use serde::{Deserialize, Serialize};

use shopledger_core::entity::{first_duplicate, position_of};
use shopledger_core::{DomainError, DomainResult, ProductId};

use crate::line::CartLine;

/// Ordered cart lines, at most one per product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from lines read back from storage.
    pub fn from_lines(lines: Vec<CartLine>) -> DomainResult<Self> {
        if let Some(dup) = first_duplicate(&lines) {
            return Err(DomainError::invariant(format!("duplicate cart line for {dup}")));
        }
        for line in &lines {
            line.check()?;
        }
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&CartLine> {
        position_of(&self.lines, product_id).map(|i| &self.lines[i])
    }

    pub fn get_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        position_of(&self.lines, product_id).map(move |i| &mut self.lines[i])
    }

    /// Units of `product_id` currently held.
    pub fn held(&self, product_id: &ProductId) -> u32 {
        self.get(product_id).map_or(0, CartLine::qty)
    }

    /// Append a new line. Callers guarantee no line exists for the product.
    pub fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartLine> {
        position_of(&self.lines, product_id).map(|i| self.lines.remove(i))
    }

    /// Remove every line, returning them in order.
    pub fn take_all(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }

    /// Sum of `price * qty` over all lines.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopledger_catalog::Product;

    fn line(id: &str, price: f64, qty: u32) -> CartLine {
        CartLine::restore(id.parse().unwrap(), id, price, qty).unwrap()
    }

    #[test]
    fn total_sums_subtotals() {
        let cart = Cart::from_lines(vec![line("a", 100.0, 2), line("b", 50.5, 1)]).unwrap();
        assert_eq!(cart.total(), 250.5);
    }

    #[test]
    fn empty_cart_totals_zero() {
        assert_eq!(Cart::new().total(), 0.0);
    }

    #[test]
    fn held_counts_units_of_one_product() {
        let mut cart = Cart::new();
        cart.push(CartLine::open(&Product::new("a".parse().unwrap(), "Mate", 10.0, 3)));
        cart.get_mut(&"a".parse().unwrap()).unwrap().increment().unwrap();
        assert_eq!(cart.held(&"a".parse().unwrap()), 2);
        assert_eq!(cart.held(&"b".parse().unwrap()), 0);
    }

    #[test]
    fn remove_and_take_all() {
        let mut cart = Cart::from_lines(vec![line("a", 1.0, 1), line("b", 2.0, 3)]).unwrap();
        let removed = cart.remove(&"a".parse().unwrap()).unwrap();
        assert_eq!(removed.qty(), 1);
        assert!(cart.remove(&"a".parse().unwrap()).is_none());

        let rest = cart.take_all();
        assert_eq!(rest.len(), 1);
        assert!(cart.is_empty());
    }

    #[test]
    fn from_lines_rejects_duplicate_products() {
        let err = Cart::from_lines(vec![line("a", 1.0, 1), line("a", 1.0, 2)]).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }
}
