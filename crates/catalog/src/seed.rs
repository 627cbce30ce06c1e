//! Starter catalog used when a session opens with no stored products.

use crate::validation::NewProduct;

const SEED: [(&str, f64, i64); 4] = [
    ("Mate Clásico", 5200.0, 5),
    ("Yerba orgánica 1KG", 3200.0, 12),
    ("Termo acero 1L", 18900.0, 4),
    ("Bombilla alpaca", 2900.0, 8),
];

/// The starter products, already validated.
pub fn seed_products() -> Vec<NewProduct> {
    SEED.iter()
        .filter_map(|(name, price, stock)| crate::validate_product(name, *price, *stock).ok())
        .collect()
}
