//! Plain-text tables for the terminal.

use std::io::{self, Write};

use shopledger_cart::CartLine;
use shopledger_catalog::Product;
use shopledger_ledger::{CheckoutSummary, Presenter, Quote};

#[derive(Debug, Clone, PartialEq)]
struct ProductRow {
    id: String,
    name: String,
    price: f64,
    stock: u32,
}

/// Keeps the latest rendered frame; the binary prints it once the command
/// has run, so intermediate renders never reach the terminal.
#[derive(Debug, Default)]
pub struct TablePresenter {
    catalog: Vec<ProductRow>,
    cart: Vec<CartLine>,
    total: f64,
}

impl Presenter for TablePresenter {
    fn render(&mut self, catalog: &[&Product], cart: &[CartLine], total: f64) {
        self.catalog = catalog
            .iter()
            .map(|p| ProductRow {
                id: p.id_typed().to_string(),
                name: p.name().to_string(),
                price: p.price(),
                stock: p.stock(),
            })
            .collect();
        self.cart = cart.to_vec();
        self.total = total;
    }
}

impl TablePresenter {
    pub fn write_catalog(&self, out: &mut impl Write) -> io::Result<()> {
        if self.catalog.is_empty() {
            return writeln!(out, "No products to show.");
        }
        writeln!(out, "{:<38} {:<24} {:>12} {:>6}", "ID", "NAME", "PRICE", "STOCK")?;
        for row in &self.catalog {
            let stock = if row.stock == 0 {
                "-".to_string()
            } else {
                row.stock.to_string()
            };
            writeln!(
                out,
                "{:<38} {:<24} {:>12} {:>6}",
                row.id,
                row.name,
                money(row.price),
                stock
            )?;
        }
        Ok(())
    }

    pub fn write_cart(&self, out: &mut impl Write) -> io::Result<()> {
        if self.cart.is_empty() {
            writeln!(out, "Your cart is empty.")?;
        } else {
            writeln!(out, "{:<24} {:>12} {:>5} {:>12}", "NAME", "PRICE", "QTY", "SUBTOTAL")?;
            for line in &self.cart {
                writeln!(
                    out,
                    "{:<24} {:>12} {:>5} {:>12}",
                    line.name(),
                    money(line.price()),
                    line.qty(),
                    money(line.subtotal())
                )?;
            }
        }
        writeln!(out, "Total: {}", money(self.total))
    }
}

pub fn write_summary(out: &mut impl Write, summary: &CheckoutSummary) -> io::Result<()> {
    writeln!(out, "Subtotal:      {}", money(summary.subtotal))?;
    writeln!(out, "With tax:      {}", money(summary.taxed_total))?;
    let shipping = if summary.includes_shipping() { "yes" } else { "no" };
    writeln!(out, "Shipping ({shipping:>3}): {}", money(summary.shipping))?;
    writeln!(out, "Grand total:   {}", money(summary.grand_total))
}

/// Numbered `N. name - $price` lines, then the totals.
pub fn write_quote(out: &mut impl Write, quote: &Quote) -> io::Result<()> {
    for (i, item) in quote.items.iter().enumerate() {
        writeln!(out, "{}. {} - {}", i + 1, item.name, money(item.price))?;
    }
    writeln!(out)?;
    write_summary(out, &quote.summary)
}

fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopledger_ledger::{QuoteItem, Surcharges, quote};

    fn rendered(presenter: &TablePresenter) -> (String, String) {
        let mut catalog = Vec::new();
        presenter.write_catalog(&mut catalog).unwrap();
        let mut cart = Vec::new();
        presenter.write_cart(&mut cart).unwrap();
        (String::from_utf8(catalog).unwrap(), String::from_utf8(cart).unwrap())
    }

    #[test]
    fn empty_frame_prints_placeholders() {
        let (catalog, cart) = rendered(&TablePresenter::default());
        assert_eq!(catalog, "No products to show.\n");
        assert_eq!(cart, "Your cart is empty.\nTotal: $0.00\n");
    }

    #[test]
    fn latest_render_wins() {
        let mate = Product::new("p1".parse().unwrap(), "Mate", 5200.0, 0);
        let line = CartLine::open(&mate);
        let mut presenter = TablePresenter::default();

        presenter.render(&[], &[], 0.0);
        presenter.render(&[&mate], &[line], 5200.0);

        let (catalog, cart) = rendered(&presenter);
        assert!(catalog.contains("Mate"));
        assert!(catalog.contains("$5200.00"));
        assert!(catalog.trim_end().ends_with('-'));
        assert!(cart.contains("Total: $5200.00"));
    }

    #[test]
    fn summary_lists_every_component() {
        let mut out = Vec::new();
        write_summary(&mut out, &Surcharges::default().summarize(1000.0, true)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("$1210.00"));
        assert!(text.contains("Shipping (yes): $100.00"));
        assert!(text.contains("Grand total:   $1310.00"));
    }

    #[test]
    fn free_shipping_is_still_shown_as_requested() {
        let mut out = Vec::new();
        let summary = Surcharges::new(0.21, 0.0).unwrap().summarize(1000.0, true);
        write_summary(&mut out, &summary).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Shipping (yes): $0.00"));
    }

    #[test]
    fn quote_lists_items_before_totals() {
        let items = vec![QuoteItem::new("Mate", 100.0), QuoteItem::new("Termo", 250.5)];
        let quoted = quote(items, &Surcharges::default(), false).unwrap();
        let mut out = Vec::new();
        write_quote(&mut out, &quoted).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("1. Mate - $100.00\n2. Termo - $250.50\n\n"));
        assert!(text.contains("Subtotal:      $350.50"));
        assert!(text.contains("Shipping ( no): $0.00"));
    }
}
