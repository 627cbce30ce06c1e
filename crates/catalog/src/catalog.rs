use serde::{Deserialize, Serialize};

use shopledger_core::entity::{first_duplicate, position_of};
use shopledger_core::{DomainError, DomainResult, ProductId};

use crate::product::Product;

/// Ordered collection of products (insertion order is display order).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from products read back from storage.
    ///
    /// Rejects duplicate identifiers and products whose fields break the
    /// catalog rules.
    pub fn from_products(products: Vec<Product>) -> DomainResult<Self> {
        if let Some(dup) = first_duplicate(&products) {
            return Err(DomainError::invariant(format!("duplicate product id {dup}")));
        }
        for p in &products {
            p.check().map_err(|e| {
                DomainError::invariant(format!("product {}: {e}", p.id_typed()))
            })?;
        }
        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        position_of(&self.products, id).map(|i| &self.products[i])
    }

    pub fn get_mut(&mut self, id: &ProductId) -> Option<&mut Product> {
        position_of(&self.products, id).map(move |i| &mut self.products[i])
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Append a product. Callers guarantee the id is not already present.
    pub fn push(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Products whose name contains `query`, case-insensitively.
    ///
    /// The query is trimmed; a blank query matches everything.
    pub fn filter(&self, query: &str) -> Vec<&Product> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| p.name().to_lowercase().contains(&q))
            .collect()
    }
}
