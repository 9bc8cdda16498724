//! Receipt formatting.

use chrono::Local;

use super::Cart;

/// One entry in the append-only scan log. Unlike cart lines these are never
/// aggregated: scanning the same SKU twice produces two entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptEntry {
    pub item: String,
    pub price: f64,
    pub time: String,
}

impl ReceiptEntry {
    pub fn new(item: &str, price: f64) -> Self {
        Self {
            item: item.to_string(),
            price,
            time: Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

/// Render the printable receipt from current cart contents.
///
/// Lines come from the aggregated cart, not the scan log, so repeated items
/// appear once with a quantity. Empty cart renders nothing.
pub fn format_receipt(cart: &Cart) -> Vec<String> {
    if cart.is_empty() {
        return Vec::new();
    }

    let rule_heavy = "=".repeat(40);
    let rule_light = "-".repeat(40);

    let mut lines = vec![
        rule_heavy.clone(),
        "          ASTRID MART".to_string(),
        rule_heavy.clone(),
        format!("Date: {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
        rule_light.clone(),
    ];

    for line in cart.lines_by_added() {
        if line.quantity > 1 {
            lines.push(format!(
                "{} x{:<16} €{:.2}",
                line.name, line.quantity, line.line_total
            ));
            lines.push(format!("  (€{:.2} each)", line.unit_price));
        } else {
            lines.push(format!("{:<25} €{:.2}", line.name, line.unit_price));
        }
    }

    lines.push(rule_light);
    lines.push(format!("Total Items: {}", cart.item_count()));
    lines.push(format!("{:<25} €{:.2}", "TOTAL:", cart.total()));
    lines.push(rule_heavy.clone());
    lines.push("    Thank you for shopping!".to_string());
    lines.push(rule_heavy);

    lines
}
