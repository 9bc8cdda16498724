//! Cart ledger for retail mode.
//!
//! One line per distinct SKU with quantity aggregation, plus an append-only
//! scan log used for receipt history. The running total must equal the sum
//! of line totals after every mutation; this is asserted in debug builds.

mod receipt;

pub use receipt::ReceiptEntry;

use std::collections::HashMap;

use tracing::debug;

use crate::catalog::ProductRecord;
use crate::error::{Error, Result};

/// Tolerance for the running-total invariant.
const TOTAL_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub sku: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_total: f64,
    pub category: String,
    /// When the line was first created; never updated by repeat scans.
    pub first_added_ms: u64,
    /// Insertion counter, the deterministic tie-break when two lines share
    /// a `first_added_ms`.
    seq: u64,
}

/// What `remove_last` took out, for the status line.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedLine {
    pub name: String,
    /// Quantity still in the cart after removal; 0 means the line is gone.
    pub remaining: u32,
}

impl RemovedLine {
    pub fn message(&self) -> String {
        if self.remaining > 0 {
            format!("Removed one {} [Qty: {}]", self.name, self.remaining)
        } else {
            format!("Removed {} from cart", self.name)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: HashMap<String, CartLine>,
    running_total: f64,
    scan_log: Vec<ReceiptEntry>,
    next_seq: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product. Repeat SKUs aggregate onto the existing
    /// line; the scan log always gets a fresh entry. Returns the new line
    /// quantity.
    pub fn add(&mut self, product: &ProductRecord, sku: &str, now_ms: u64) -> u32 {
        let seq = self.next_seq;
        self.next_seq += 1;

        let line = self
            .lines
            .entry(sku.to_string())
            .and_modify(|line| {
                line.quantity += 1;
                line.line_total += product.price;
            })
            .or_insert_with(|| CartLine {
                sku: sku.to_string(),
                name: product.name.clone(),
                unit_price: product.price,
                quantity: 1,
                line_total: product.price,
                category: product.category.clone(),
                first_added_ms: now_ms,
                seq,
            });
        let quantity = line.quantity;

        self.running_total += product.price;
        self.scan_log.push(ReceiptEntry::new(&product.name, product.price));
        debug!(sku, quantity, total = self.running_total, "cart add");

        self.assert_consistent();
        quantity
    }

    /// Remove one unit of the most recently added line.
    ///
    /// "Most recent" is the maximum `first_added_ms`; identical timestamps
    /// fall back to insertion order.
    pub fn remove_last(&mut self) -> Result<RemovedLine> {
        let sku = self
            .lines
            .values()
            .max_by_key(|line| (line.first_added_ms, line.seq))
            .map(|line| line.sku.clone())
            .ok_or(Error::EmptyCart)?;

        let line = self.lines.get_mut(&sku).expect("line exists");
        self.running_total -= line.unit_price;

        let removed = if line.quantity > 1 {
            line.quantity -= 1;
            line.line_total -= line.unit_price;
            RemovedLine {
                name: line.name.clone(),
                remaining: line.quantity,
            }
        } else {
            let line = self.lines.remove(&sku).expect("line exists");
            RemovedLine {
                name: line.name,
                remaining: 0,
            }
        };

        debug!(sku, total = self.running_total, "cart remove");
        self.assert_consistent();
        Ok(removed)
    }

    /// Empty the cart, the total, and the scan log.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.running_total = 0.0;
        self.scan_log.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.values().map(|line| line.quantity).sum()
    }

    pub fn total(&self) -> f64 {
        self.running_total
    }

    /// Lines in display order: oldest first, insertion order breaking ties.
    pub fn lines_by_added(&self) -> Vec<&CartLine> {
        let mut lines: Vec<&CartLine> = self.lines.values().collect();
        lines.sort_by_key(|line| (line.first_added_ms, line.seq));
        lines
    }

    pub fn scan_log(&self) -> &[ReceiptEntry] {
        &self.scan_log
    }

    /// Formatted receipt for the current contents; empty when the cart is.
    pub fn receipt_lines(&self) -> Vec<String> {
        receipt::format_receipt(self)
    }

    fn assert_consistent(&self) {
        debug_assert!(
            (self.running_total - self.lines.values().map(|l| l.line_total).sum::<f64>()).abs()
                < TOTAL_EPSILON,
            "running total drifted from line totals"
        );
    }
}
