//! Learning mode: a randomized quiz walk over the catalog.
//!
//! Each session shuffles the full product list once and asks the player to
//! scan the current target. Wrong or unrecognized scans are never retried
//! against the same target; every evaluated scan advances, which keeps the
//! pacing right for young players at the cost of scoring precision.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

use crate::catalog::{Catalog, ProductRecord};

/// Result of evaluating one scan against the current target.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutcome {
    Correct { name: String },
    Wrong { name: String },
    Unrecognized,
}

#[derive(Debug, Clone, Default)]
pub struct LearningSession {
    order: Vec<ProductRecord>,
    current_index: usize,
    current_target: Option<ProductRecord>,
    correct: u32,
    attempted: u32,
    found: Vec<String>,
}

impl LearningSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a session over a uniformly shuffled copy of the catalog.
    pub fn start<R: Rng>(&mut self, catalog: &Catalog, rng: &mut R) {
        let mut order: Vec<ProductRecord> = catalog.products().cloned().collect();
        order.shuffle(rng);
        info!("Learning session started with {} products", order.len());
        self.start_with_order(order);
    }

    /// Begin a session over an explicit product order.
    pub fn start_with_order(&mut self, order: Vec<ProductRecord>) {
        self.order = order;
        self.current_index = 0;
        self.current_target = None;
        self.correct = 0;
        self.attempted = 0;
        self.found.clear();
        self.advance();
    }

    /// Evaluate a resolved scan against the current target.
    ///
    /// Increments the attempt counter and advances to the next target no
    /// matter the outcome. Calling after completion is a no-op that reports
    /// `Unrecognized`.
    pub fn evaluate(&mut self, product: Option<&ProductRecord>) -> EvalOutcome {
        let Some(target) = self.current_target.as_ref() else {
            return EvalOutcome::Unrecognized;
        };

        self.attempted += 1;
        let outcome = match product {
            Some(p) if p.name == target.name => {
                self.correct += 1;
                self.found.push(p.name.clone());
                EvalOutcome::Correct {
                    name: p.name.clone(),
                }
            }
            Some(p) => EvalOutcome::Wrong {
                name: p.name.clone(),
            },
            None => EvalOutcome::Unrecognized,
        };

        self.advance();
        outcome
    }

    /// Move to the next product, or mark the session complete when the
    /// shuffled order is exhausted (`current_target` becomes `None`).
    fn advance(&mut self) {
        if self.current_index < self.order.len() {
            self.current_target = Some(self.order[self.current_index].clone());
            self.current_index += 1;
        } else {
            self.current_target = None;
        }
    }

    pub fn current_target(&self) -> Option<&ProductRecord> {
        self.current_target.as_ref()
    }

    /// Terminal signal: no target left after the session started.
    pub fn is_complete(&self) -> bool {
        self.current_target.is_none() && self.current_index >= self.order.len()
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn attempted(&self) -> u32 {
        self.attempted
    }

    /// Session length (products in the shuffled order).
    pub fn total(&self) -> usize {
        self.order.len()
    }

    /// Names of correctly identified products, in order found.
    pub fn found(&self) -> &[String] {
        &self.found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn records(n: usize) -> Vec<ProductRecord> {
        (0..n)
            .map(|i| {
                ProductRecord::new(
                    &format!("1000000{}", i),
                    &format!("Item {}", i),
                    1.0 + i as f64,
                    "Test",
                )
            })
            .collect()
    }

    #[test]
    fn test_start_sets_first_target() {
        let mut session = LearningSession::new();
        session.start_with_order(records(3));

        assert_eq!(session.current_target().unwrap().name, "Item 0");
        assert_eq!(session.total(), 3);
        assert!(!session.is_complete());
    }

    #[test]
    fn test_correct_scan_scores_and_advances() {
        let mut session = LearningSession::new();
        let items = records(2);
        session.start_with_order(items.clone());

        let outcome = session.evaluate(Some(&items[0]));
        assert_eq!(
            outcome,
            EvalOutcome::Correct {
                name: "Item 0".to_string()
            }
        );
        assert_eq!(session.correct(), 1);
        assert_eq!(session.attempted(), 1);
        assert_eq!(session.current_target().unwrap().name, "Item 1");
        assert_eq!(session.found(), ["Item 0"]);
    }

    #[test]
    fn test_wrong_scan_still_advances() {
        let mut session = LearningSession::new();
        let items = records(3);
        session.start_with_order(items.clone());

        // Scanning the wrong product never re-asks the same target
        let outcome = session.evaluate(Some(&items[2]));
        assert_eq!(
            outcome,
            EvalOutcome::Wrong {
                name: "Item 2".to_string()
            }
        );
        assert_eq!(session.correct(), 0);
        assert_eq!(session.attempted(), 1);
        assert_eq!(session.current_target().unwrap().name, "Item 1");
    }

    #[test]
    fn test_unrecognized_scan_still_advances() {
        let mut session = LearningSession::new();
        session.start_with_order(records(2));

        assert_eq!(session.evaluate(None), EvalOutcome::Unrecognized);
        assert_eq!(session.attempted(), 1);
        assert_eq!(session.current_target().unwrap().name, "Item 1");
    }

    #[test]
    fn test_terminates_after_exactly_n_evaluations() {
        let mut session = LearningSession::new();
        let n = 5;
        session.start_with_order(records(n));

        for i in 0..n {
            assert!(!session.is_complete(), "complete too early at {}", i);
            session.evaluate(None);
        }
        assert!(session.is_complete());
        assert!(session.current_target().is_none());
        assert_eq!(session.attempted(), n as u32);
    }

    #[test]
    fn test_evaluate_after_completion_is_noop() {
        let mut session = LearningSession::new();
        session.start_with_order(records(1));
        session.evaluate(None);
        assert!(session.is_complete());

        assert_eq!(session.evaluate(None), EvalOutcome::Unrecognized);
        assert_eq!(session.attempted(), 1);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let catalog = Catalog::default_products();
        let mut session = LearningSession::new();
        let mut rng = StdRng::seed_from_u64(7);
        session.start(&catalog, &mut rng);

        assert_eq!(session.total(), catalog.len());
        let mut names: Vec<String> = session.order.iter().map(|p| p.name.clone()).collect();
        names.sort();
        let mut expected: Vec<String> = catalog.products().map(|p| p.name.clone()).collect();
        expected.sort();
        assert_eq!(names, expected);
    }
}
