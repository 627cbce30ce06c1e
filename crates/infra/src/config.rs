//! Process configuration read from the environment.
//!
//! | variable | default |
//! |----------|---------|
//! | `SHOPLEDGER_TAX_RATE` | `0.21` |
//! | `SHOPLEDGER_SHIPPING_COST` | `100` |
//! | `SHOPLEDGER_DATA_DIR` | `.shopledger` |
//! | `SHOPLEDGER_SEED` | `true` |
//!
//! Invalid values are logged and replaced by their default.

use std::path::PathBuf;

use shopledger_ledger::{StorefrontOptions, Surcharges};

pub const TAX_RATE_VAR: &str = "SHOPLEDGER_TAX_RATE";
pub const SHIPPING_COST_VAR: &str = "SHOPLEDGER_SHIPPING_COST";
pub const DATA_DIR_VAR: &str = "SHOPLEDGER_DATA_DIR";
pub const SEED_VAR: &str = "SHOPLEDGER_SEED";

const DEFAULT_DATA_DIR: &str = ".shopledger";

#[derive(Debug, Clone, PartialEq)]
pub struct ShopConfig {
    pub surcharges: Surcharges,
    pub data_dir: PathBuf,
    pub seed_when_empty: bool,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            surcharges: Surcharges::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            seed_when_empty: true,
        }
    }
}

impl ShopConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup (the environment, a map in
    /// tests, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let tax_rate = lookup(TAX_RATE_VAR)
            .and_then(|raw| non_negative(TAX_RATE_VAR, &raw))
            .unwrap_or(defaults.surcharges.tax_rate);
        let shipping_cost = lookup(SHIPPING_COST_VAR)
            .and_then(|raw| non_negative(SHIPPING_COST_VAR, &raw))
            .unwrap_or(defaults.surcharges.shipping_cost);
        let surcharges = Surcharges::new(tax_rate, shipping_cost).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid surcharges; using defaults");
            defaults.surcharges
        });

        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let seed_when_empty = lookup(SEED_VAR)
            .and_then(|raw| flag(SEED_VAR, &raw))
            .unwrap_or(defaults.seed_when_empty);

        Self {
            surcharges,
            data_dir,
            seed_when_empty,
        }
    }

    pub fn storefront_options(&self) -> StorefrontOptions {
        StorefrontOptions {
            surcharges: self.surcharges,
            seed_when_empty: self.seed_when_empty,
        }
    }
}

fn non_negative(var: &str, raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => {
            tracing::warn!(var, value = raw, "expected a non-negative number; using default");
            None
        }
    }
}

fn flag(var: &str, raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(var, value = raw, "expected a boolean; using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ShopConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ShopConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        assert_eq!(config_from(&[]), ShopConfig::default());
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = config_from(&[
            (TAX_RATE_VAR, "0.105"),
            (SHIPPING_COST_VAR, " 250 "),
            (DATA_DIR_VAR, "/tmp/shop"),
            (SEED_VAR, "off"),
        ]);
        assert_eq!(config.surcharges.tax_rate, 0.105);
        assert_eq!(config.surcharges.shipping_cost, 250.0);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/shop"));
        assert!(!config.seed_when_empty);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = config_from(&[
            (TAX_RATE_VAR, "-0.5"),
            (SHIPPING_COST_VAR, "lots"),
            (DATA_DIR_VAR, "   "),
            (SEED_VAR, "maybe"),
        ]);
        assert_eq!(config, ShopConfig::default());
    }

    #[test]
    fn storefront_options_carry_config() {
        let config = config_from(&[(SEED_VAR, "0"), (TAX_RATE_VAR, "0")]);
        let options = config.storefront_options();
        assert!(!options.seed_when_empty);
        assert_eq!(options.surcharges.tax_rate, 0.0);
    }
}
