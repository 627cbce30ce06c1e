mod cli;
mod presenter;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use shopledger_core::{DomainError, ProductId};
use shopledger_infra::{JsonFileStore, ShopConfig};
use shopledger_ledger::{Storefront, quote};

use crate::cli::{Cli, Command, ShopCommand};
use crate::presenter::{TablePresenter, write_quote, write_summary};

type Shop = Storefront<JsonFileStore, TablePresenter>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    shopledger_observability::tracing::init_with_default(if cli.verbose { "debug" } else { "warn" });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<DomainError>() {
                Some(DomainError::Validation(violations)) => {
                    eprintln!("error: invalid input");
                    for v in violations {
                        eprintln!("  - {v}");
                    }
                }
                _ => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ShopConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    tracing::debug!(data_dir = %config.data_dir.display(), "configuration loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Quote { items, shipping } => {
            let quoted = quote(items, &config.surcharges, shipping)?;
            write_quote(&mut out, &quoted)?;
            Ok(())
        }
        Command::Shop(command) => {
            let shop: Shop = Storefront::open(
                JsonFileStore::new(&config.data_dir),
                TablePresenter::default(),
                config.storefront_options(),
            );
            run_shop(shop, command, &mut out)
        }
    }
}

fn run_shop(mut shop: Shop, command: ShopCommand, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        ShopCommand::Catalog { search } => {
            shop.set_filter(search.unwrap_or_default());
            shop.presenter().write_catalog(out)?;
        }
        ShopCommand::AddProduct { name, price, stock } => {
            let product = shop.add_product_form(&name, &price, &stock)?;
            writeln!(out, "Added {} ({})", product.name(), product.id_typed())?;
        }
        ShopCommand::Add { id } => {
            let line = shop.add_to_cart(&product_id(&id)?)?;
            writeln!(out, "{} x{} in cart", line.name(), line.qty())?;
            shop.presenter().write_cart(out)?;
        }
        ShopCommand::Inc { id } => {
            shop.increment_cart_line(&product_id(&id)?)?;
            shop.presenter().write_cart(out)?;
        }
        ShopCommand::Dec { id } => {
            shop.decrement_cart_line(&product_id(&id)?)?;
            shop.presenter().write_cart(out)?;
        }
        ShopCommand::Remove { id } => {
            shop.remove_cart_line(&product_id(&id)?)?;
            writeln!(out, "Removed from cart.")?;
            shop.presenter().write_cart(out)?;
        }
        ShopCommand::Clear => {
            shop.clear_cart();
            writeln!(out, "Cart cleared.")?;
        }
        ShopCommand::Total { shipping } => {
            shop.presenter().write_cart(out)?;
            writeln!(out)?;
            write_summary(out, &shop.checkout_summary(shipping))?;
        }
    }
    Ok(())
}

fn product_id(raw: &str) -> anyhow::Result<ProductId> {
    raw.parse::<ProductId>()
        .with_context(|| format!("invalid product id {raw:?}"))
}
