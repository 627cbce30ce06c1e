use std::path::PathBuf;

use clap::{Parser, Subcommand};

use shopledger_ledger::QuoteItem;

/// Catalog and cart ledger backed by local JSON files.
#[derive(Debug, Parser)]
#[command(name = "shopledger", version, about)]
pub struct Cli {
    /// Directory holding the stored catalog and cart (overrides SHOPLEDGER_DATA_DIR).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log ledger decisions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Itemized checkout total for a list of NAME=PRICE entries, without
    /// touching the catalog.
    Quote {
        #[arg(required = true, value_name = "NAME=PRICE")]
        items: Vec<QuoteItem>,
        #[arg(long)]
        shipping: bool,
    },
    #[command(flatten)]
    Shop(ShopCommand),
}

/// Commands that work on the stored catalog and cart.
#[derive(Debug, Subcommand)]
pub enum ShopCommand {
    /// List products, optionally filtered by name.
    Catalog {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a product to the catalog.
    AddProduct {
        #[arg(long)]
        name: String,
        #[arg(long, allow_hyphen_values = true)]
        price: String,
        #[arg(long, allow_hyphen_values = true)]
        stock: String,
    },
    /// Put one unit of a product in the cart.
    Add { id: String },
    /// One more unit of a product already in the cart.
    Inc { id: String },
    /// One less unit; the line disappears at zero.
    Dec { id: String },
    /// Drop a cart line, returning its units to stock.
    Remove { id: String },
    /// Empty the cart.
    Clear,
    /// Show the cart and its checkout total.
    Total {
        #[arg(long)]
        shipping: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quote_items_with_shipping() {
        let cli = Cli::try_parse_from(["shopledger", "quote", "Mate=100", "Termo=250.5", "--shipping"])
            .unwrap();
        match cli.command {
            Command::Quote { items, shipping } => {
                assert_eq!(items, [QuoteItem::new("Mate", 100.0), QuoteItem::new("Termo", 250.5)]);
                assert!(shipping);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn quote_rejects_bare_prices() {
        assert!(Cli::try_parse_from(["shopledger", "quote", "100"]).is_err());
    }

    #[test]
    fn add_product_keeps_raw_text_for_validation() {
        let cli = Cli::try_parse_from([
            "shopledger", "add-product", "--name", "Mate", "--price", "-1", "--stock", "x",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Shop(ShopCommand::AddProduct { ref price, ref stock, .. })
                if price == "-1" && stock == "x"
        ));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["shopledger", "clear", "--data-dir", "/tmp/x", "-v"]).unwrap();
        assert!(matches!(cli.command, Command::Shop(ShopCommand::Clear)));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(cli.verbose);
    }
}
