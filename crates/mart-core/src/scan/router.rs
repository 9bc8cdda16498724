//! Scan routing: cooldown gate plus dispatch to the active mode.
//!
//! One physical scan can surface as several logical events (key burst plus
//! device queue plus Enter), so every completed code passes a shared
//! cooldown clock before it may mutate anything. The clock is global across
//! keyboard, shortcut, and serial sources.

use tracing::debug;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::learning::{EvalOutcome, LearningSession};

/// Which handler an accepted scan is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Retail,
    Learning,
}

/// Result of submitting a completed code.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Dropped by the cooldown gate; no state change, no message.
    CoolingDown,
    Added {
        name: String,
        unit_price: f64,
        quantity: u32,
    },
    NotFound {
        code: String,
    },
    Correct {
        name: String,
    },
    Wrong {
        name: String,
    },
    /// Learning mode scan that resolved to no product; still advances.
    Unrecognized,
}

impl ScanOutcome {
    /// User-visible status line, `None` for silent outcomes.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::CoolingDown => None,
            Self::Added {
                name,
                unit_price,
                quantity,
            } => Some(format!(
                "Added: {} (€{:.2}) [Qty: {}]",
                name, unit_price, quantity
            )),
            Self::NotFound { .. } => Some("Product not found!".to_string()),
            Self::Correct { name } => Some(format!("✓ Correct! That's {}!", name)),
            Self::Wrong { name } => {
                Some(format!("That's {}. Moving to next product!", name))
            }
            Self::Unrecognized => {
                Some("Product not found. Moving to next product!".to_string())
            }
        }
    }

    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::CoolingDown)
    }
}

#[derive(Debug, Clone)]
pub struct ScanRouter {
    cooldown_ms: u64,
    last_accepted_ms: Option<u64>,
}

impl ScanRouter {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            cooldown_ms,
            last_accepted_ms: None,
        }
    }

    /// Forget the cooldown clock (mode entry).
    pub fn reset(&mut self) {
        self.last_accepted_ms = None;
    }

    /// Gate a scan attempt. The clock is stamped for every attempt that
    /// passes the gate, including failed lookups, so a misread scan cannot
    /// double-register as something else inside the window.
    fn accept(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_accepted_ms
            && now_ms.saturating_sub(last) < self.cooldown_ms
        {
            debug!(
                elapsed_ms = now_ms.saturating_sub(last),
                "scan dropped by cooldown gate"
            );
            return false;
        }
        self.last_accepted_ms = Some(now_ms);
        true
    }

    /// Submit a completed code or shortcut key against the active mode.
    pub fn submit(
        &mut self,
        code: &str,
        now_ms: u64,
        mode: ScanMode,
        catalog: &Catalog,
        cart: &mut Cart,
        learning: &mut LearningSession,
    ) -> ScanOutcome {
        if !self.accept(now_ms) {
            return ScanOutcome::CoolingDown;
        }

        let resolved = catalog.lookup(code);

        match mode {
            ScanMode::Retail => match resolved {
                Some((sku, product)) => {
                    let quantity = cart.add(product, sku, now_ms);
                    ScanOutcome::Added {
                        name: product.name.clone(),
                        unit_price: product.price,
                        quantity,
                    }
                }
                None => {
                    debug!(code, "retail scan did not resolve");
                    ScanOutcome::NotFound {
                        code: code.to_string(),
                    }
                }
            },
            ScanMode::Learning => {
                match learning.evaluate(resolved.map(|(_, product)| product)) {
                    EvalOutcome::Correct { name } => ScanOutcome::Correct { name },
                    EvalOutcome::Wrong { name } => ScanOutcome::Wrong { name },
                    EvalOutcome::Unrecognized => ScanOutcome::Unrecognized,
                }
            }
        }
    }
}
