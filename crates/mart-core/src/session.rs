//! Kiosk session: the explicit context object owned by the game-loop driver.
//!
//! All mutable game state lives here and is only touched from the single
//! loop thread. The presentation layer feeds `InputEvent`s in, drains the
//! device listener once per tick, and reads state back to render; those
//! reads are pure.
//!
//! ## Mode transitions
//!
//! - Menu -> Retail | Learning | Manager, Red quits
//! - Retail -> Payment (checkout) | Menu
//! - Payment -> Retail (done or cancelled)
//! - Learning -> Complete (order exhausted) | Menu
//! - Complete | Manager -> Menu

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use strum::Display;
use tracing::{error, info};

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::config::KioskConfig;
use crate::learning::LearningSession;
use crate::scan::{DeviceListener, Disambiguator, ScanMode, ScanOutcome, ScanRouter};
use crate::storage::ReceiptWriter;

/// Colored arcade panel buttons, the cabinet's whole control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum GameButton {
    /// K1 - start/go actions
    Green,
    /// K2 - primary/educational actions
    Blue,
    /// K3 - management/utility actions
    Yellow,
    /// K4 - stop/exit actions
    Red,
}

/// Raw input events from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// One keystroke, keyboard or scanner-as-keyboard.
    Char(char),
    /// Explicit completion signal (Enter / device acknowledgement).
    Submit,
    Button(GameButton),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PaymentStep {
    Amount,
    Paying,
    Change,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Mode {
    Menu,
    Retail,
    Payment(PaymentStep),
    Learning,
    /// Learning score screen.
    Complete,
    Manager,
}

/// Monotonic clock for the game loop, in milliseconds since session start.
#[derive(Debug, Clone)]
pub struct GameClock {
    start: Instant,
}

impl GameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Kiosk {
    catalog: Catalog,
    config: KioskConfig,
    receipts: ReceiptWriter,
    mode: Mode,
    cart: Cart,
    learning: LearningSession,
    disambiguator: Disambiguator,
    router: ScanRouter,
    rng: StdRng,
    status: String,
    running: bool,
}

impl Kiosk {
    pub fn new(catalog: Catalog, config: KioskConfig) -> Self {
        Self::with_rng(catalog, config, StdRng::from_entropy())
    }

    /// Seeded variant for deterministic tests and demos.
    pub fn with_rng(catalog: Catalog, config: KioskConfig, rng: StdRng) -> Self {
        let receipts = ReceiptWriter::new(&config.receipts_dir);
        let disambiguator = Disambiguator::new(config.scan.clone());
        let router = ScanRouter::new(config.scan.scan_cooldown_ms);
        Self {
            catalog,
            config,
            receipts,
            mode: Mode::Menu,
            cart: Cart::new(),
            learning: LearningSession::new(),
            disambiguator,
            router,
            rng,
            status: String::new(),
            running: true,
        }
    }

    /// Dispatch one input event against the active mode.
    pub fn handle_event(&mut self, event: InputEvent, now_ms: u64) {
        match self.mode {
            Mode::Menu => self.handle_menu(event),
            Mode::Retail => self.handle_retail(event, now_ms),
            Mode::Payment(step) => self.handle_payment(step, event),
            Mode::Learning => self.handle_learning(event, now_ms),
            Mode::Complete => self.handle_complete(event),
            Mode::Manager => self.handle_manager(event),
        }
    }

    fn handle_menu(&mut self, event: InputEvent) {
        match event {
            InputEvent::Button(GameButton::Green) => self.start_retail(),
            InputEvent::Button(GameButton::Blue) => self.start_learning(),
            InputEvent::Button(GameButton::Yellow) => self.enter_manager(),
            InputEvent::Button(GameButton::Red) => self.running = false,
            // Hidden testing keys mirroring the button row
            InputEvent::Char('1') => self.start_retail(),
            InputEvent::Char('2') => self.start_learning(),
            InputEvent::Char('3') => self.enter_manager(),
            InputEvent::Char('q') => self.running = false,
            _ => {}
        }
    }

    fn handle_retail(&mut self, event: InputEvent, now_ms: u64) {
        match event {
            InputEvent::Button(GameButton::Green) => self.start_checkout(),
            InputEvent::Button(GameButton::Blue) => match self.cart.remove_last() {
                Ok(removed) => self.status = removed.message(),
                Err(_) => self.status = "Cart is empty!".to_string(),
            },
            InputEvent::Button(GameButton::Yellow) => {
                self.cart.clear();
                self.status = "Cart cleared!".to_string();
            }
            InputEvent::Button(GameButton::Red) => self.exit_to_menu(),
            InputEvent::Submit => self.handle_submit(now_ms),
            InputEvent::Char(c) => self.handle_scan_char(c, now_ms),
        }
    }

    fn handle_payment(&mut self, step: PaymentStep, event: InputEvent) {
        match event {
            InputEvent::Button(GameButton::Blue) => self.advance_payment(step),
            InputEvent::Button(GameButton::Red) => {
                // Cancel keeps the cart
                self.mode = Mode::Retail;
            }
            _ => {}
        }
    }

    fn handle_learning(&mut self, event: InputEvent, now_ms: u64) {
        match event {
            InputEvent::Button(GameButton::Red) => self.exit_to_menu(),
            InputEvent::Submit => self.handle_submit(now_ms),
            InputEvent::Char(c) => self.handle_scan_char(c, now_ms),
            _ => {}
        }
    }

    fn handle_complete(&mut self, event: InputEvent) {
        if let InputEvent::Button(GameButton::Red) = event {
            self.exit_to_menu();
        }
    }

    fn handle_manager(&mut self, event: InputEvent) {
        match event {
            InputEvent::Char('e') => {
                let path = self.config.products_path.with_extension("csv");
                match self.catalog.export_csv(&path) {
                    Ok(()) => self.status = format!("Products exported to {}", path.display()),
                    Err(e) => {
                        error!("CSV export failed: {}", e);
                        self.status = "Error exporting products".to_string();
                    }
                }
            }
            InputEvent::Char('i') => {
                let path = self.config.products_path.with_extension("csv");
                match self.catalog.import_csv(&path) {
                    Ok(count) => {
                        if let Err(e) = self.catalog.save(&self.config.products_path) {
                            error!("Failed to save product database: {}", e);
                        }
                        self.status = format!("Imported {} products", count);
                    }
                    Err(e) => {
                        error!("CSV import failed: {}", e);
                        self.status = format!("Error importing {}", path.display());
                    }
                }
            }
            InputEvent::Button(GameButton::Red) => self.exit_to_menu(),
            _ => {}
        }
    }

    /// Enter retail mode with a fresh cart and scan state.
    pub fn start_retail(&mut self) {
        info!("Entering retail mode");
        self.mode = Mode::Retail;
        self.cart = Cart::new();
        self.disambiguator.clear();
        self.router.reset();
        self.status.clear();
    }

    /// Enter learning mode with a newly shuffled product order.
    pub fn start_learning(&mut self) {
        info!("Entering learning mode");
        self.mode = Mode::Learning;
        self.learning.start(&self.catalog, &mut self.rng);
        self.disambiguator.clear();
        self.router.reset();
        self.status.clear();
        if self.learning.is_complete() {
            // Empty catalog: nothing to quiz
            self.mode = Mode::Complete;
        }
    }

    fn enter_manager(&mut self) {
        self.mode = Mode::Manager;
        self.status.clear();
    }

    fn exit_to_menu(&mut self) {
        self.mode = Mode::Menu;
        self.disambiguator.clear();
        self.status.clear();
    }

    /// Begin the checkout flow; refused on an empty cart.
    pub fn start_checkout(&mut self) {
        if self.cart.is_empty() {
            self.status = "Cart is empty!".to_string();
            return;
        }
        self.mode = Mode::Payment(PaymentStep::Amount);
    }

    fn advance_payment(&mut self, step: PaymentStep) {
        self.mode = Mode::Payment(match step {
            PaymentStep::Amount => PaymentStep::Paying,
            PaymentStep::Paying => PaymentStep::Change,
            PaymentStep::Change => PaymentStep::Done,
            PaymentStep::Done => {
                self.complete_payment();
                return;
            }
        });
    }

    /// Checkout completion: hand the receipt to the writer, destroy the
    /// cart, and return to retail mode.
    fn complete_payment(&mut self) {
        let lines = self.cart.receipt_lines();
        match self.receipts.write(&lines) {
            Ok(path) => info!("Receipt saved to {:?}", path),
            Err(e) => error!("Failed to write receipt: {}", e),
        }
        self.cart.clear();
        self.mode = Mode::Retail;
        self.status = "Payment complete! Thank you!".to_string();
    }

    fn handle_submit(&mut self, now_ms: u64) {
        if self.disambiguator.buffer().is_empty() {
            return;
        }
        let raw = self.disambiguator.buffer().to_string();
        match self.disambiguator.on_submit(&raw, &self.catalog) {
            Some(code) => {
                self.submit_code(&code, now_ms);
            }
            None => {
                self.status = format!("Unknown barcode: {}", raw);
                self.disambiguator.clear();
            }
        }
    }

    fn handle_scan_char(&mut self, c: char, now_ms: u64) {
        if let Some(code) = self.disambiguator.on_character(c, now_ms, &self.catalog) {
            self.submit_code(&code, now_ms);
        } else if c.is_ascii_digit()
            && self.disambiguator.buffer().len() == 1
            && self.catalog.has_shortcut(c)
        {
            // Single-key shortcut entry; also fires on the first digit of a
            // burst when that digit is aliased, same as the cooldown quirk
            // the cabinet always had
            self.submit_code(&c.to_string(), now_ms);
        } else if !self.disambiguator.buffer().is_empty() {
            self.status = format!("Scanning: {}", self.disambiguator.buffer());
        }
    }

    /// Submit a completed code against the active mode. This is also the
    /// entry point for raw codes drained from the device listener; returns
    /// `None` when no scanning mode is active.
    pub fn submit_code(&mut self, code: &str, now_ms: u64) -> Option<ScanOutcome> {
        let mode = self.active_scan_mode()?;
        let outcome = self.router.submit(
            code,
            now_ms,
            mode,
            &self.catalog,
            &mut self.cart,
            &mut self.learning,
        );
        if let Some(message) = outcome.message() {
            self.status = message;
        }
        if mode == ScanMode::Learning && self.learning.is_complete() {
            info!(
                correct = self.learning.correct(),
                total = self.learning.total(),
                "learning session complete"
            );
            self.mode = Mode::Complete;
        }
        Some(outcome)
    }

    /// Drain the device queue once per tick, non-blocking.
    pub fn drain_device(&mut self, listener: &DeviceListener, now_ms: u64) {
        for code in listener.try_drain() {
            self.submit_code(&code, now_ms);
        }
    }

    fn active_scan_mode(&self) -> Option<ScanMode> {
        match self.mode {
            Mode::Retail => Some(ScanMode::Retail),
            Mode::Learning => Some(ScanMode::Learning),
            _ => None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Latest transient status line for the presentation layer.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Current partial scan buffer, for scanning feedback.
    pub fn scan_buffer(&self) -> &str {
        self.disambiguator.buffer()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn learning(&self) -> &LearningSession {
        &self.learning
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_kiosk() -> (Kiosk, TempDir) {
        let dir = TempDir::new().unwrap();
        let mut config = KioskConfig::default();
        config.receipts_dir = dir.path().to_path_buf();
        config.products_path = dir.path().join("products.json");
        let kiosk = Kiosk::with_rng(
            Catalog::default_products(),
            config,
            StdRng::seed_from_u64(1),
        );
        (kiosk, dir)
    }

    #[test]
    fn test_menu_buttons() {
        let (mut kiosk, _dir) = test_kiosk();
        assert_eq!(kiosk.mode(), Mode::Menu);

        kiosk.handle_event(InputEvent::Button(GameButton::Green), 0);
        assert_eq!(kiosk.mode(), Mode::Retail);

        kiosk.handle_event(InputEvent::Button(GameButton::Red), 0);
        assert_eq!(kiosk.mode(), Mode::Menu);

        kiosk.handle_event(InputEvent::Button(GameButton::Blue), 0);
        assert_eq!(kiosk.mode(), Mode::Learning);
        assert!(kiosk.learning().current_target().is_some());

        kiosk.handle_event(InputEvent::Button(GameButton::Red), 0);
        kiosk.handle_event(InputEvent::Button(GameButton::Yellow), 0);
        assert_eq!(kiosk.mode(), Mode::Manager);

        kiosk.handle_event(InputEvent::Button(GameButton::Red), 0);
        kiosk.handle_event(InputEvent::Button(GameButton::Red), 0);
        assert!(!kiosk.is_running());
    }

    #[test]
    fn test_entering_retail_clears_cart() {
        let (mut kiosk, _dir) = test_kiosk();
        kiosk.start_retail();
        kiosk.submit_code("7501234567890", 0);
        assert_eq!(kiosk.cart().item_count(), 1);

        kiosk.handle_event(InputEvent::Button(GameButton::Red), 10);
        kiosk.handle_event(InputEvent::Button(GameButton::Green), 20);
        assert!(kiosk.cart().is_empty());
    }

    #[test]
    fn test_retail_scan_and_remove() {
        let (mut kiosk, _dir) = test_kiosk();
        kiosk.start_retail();

        kiosk.submit_code("7501234567890", 0);
        assert_eq!(kiosk.status(), "Added: White Bread (€2.20) [Qty: 1]");

        kiosk.handle_event(InputEvent::Button(GameButton::Blue), 10);
        assert_eq!(kiosk.status(), "Removed White Bread from cart");

        kiosk.handle_event(InputEvent::Button(GameButton::Blue), 20);
        assert_eq!(kiosk.status(), "Cart is empty!");
    }

    #[test]
    fn test_shortcut_key_scan() {
        let (mut kiosk, _dir) = test_kiosk();
        kiosk.start_retail();

        // Single slow press of an aliased digit
        kiosk.handle_event(InputEvent::Char('2'), 0);
        assert_eq!(kiosk.cart().item_count(), 1);
        assert!(kiosk.status().starts_with("Added: Whole Milk"));
    }

    #[test]
    fn test_checkout_flow_writes_receipt() {
        let (mut kiosk, dir) = test_kiosk();
        kiosk.start_retail();
        kiosk.submit_code("7501234567890", 0);

        kiosk.handle_event(InputEvent::Button(GameButton::Green), 10);
        assert_eq!(kiosk.mode(), Mode::Payment(PaymentStep::Amount));

        for _ in 0..3 {
            kiosk.handle_event(InputEvent::Button(GameButton::Blue), 10);
        }
        assert_eq!(kiosk.mode(), Mode::Payment(PaymentStep::Done));

        kiosk.handle_event(InputEvent::Button(GameButton::Blue), 10);
        assert_eq!(kiosk.mode(), Mode::Retail);
        assert!(kiosk.cart().is_empty());
        assert_eq!(kiosk.status(), "Payment complete! Thank you!");

        let receipts: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("receipt_"))
            .collect();
        assert_eq!(receipts.len(), 1);
    }

    #[test]
    fn test_checkout_refused_on_empty_cart() {
        let (mut kiosk, _dir) = test_kiosk();
        kiosk.start_retail();
        kiosk.handle_event(InputEvent::Button(GameButton::Green), 0);
        assert_eq!(kiosk.mode(), Mode::Retail);
        assert_eq!(kiosk.status(), "Cart is empty!");
    }

    #[test]
    fn test_payment_cancel_keeps_cart() {
        let (mut kiosk, _dir) = test_kiosk();
        kiosk.start_retail();
        kiosk.submit_code("7501234567890", 0);
        kiosk.start_checkout();

        kiosk.handle_event(InputEvent::Button(GameButton::Red), 10);
        assert_eq!(kiosk.mode(), Mode::Retail);
        assert_eq!(kiosk.cart().item_count(), 1);
    }

    #[test]
    fn test_unknown_submit_reports_and_clears() {
        let (mut kiosk, _dir) = test_kiosk();
        kiosk.start_retail();

        for (i, c) in "99999999".chars().enumerate() {
            kiosk.handle_event(InputEvent::Char(c), (i as u64) * 10);
        }
        kiosk.handle_event(InputEvent::Submit, 100);
        assert_eq!(kiosk.status(), "Unknown barcode: 99999999");
        assert!(kiosk.scan_buffer().is_empty());
    }

    #[test]
    fn test_learning_runs_to_complete_mode() {
        let (mut kiosk, _dir) = test_kiosk();
        kiosk.start_learning();

        let total = kiosk.learning().total() as u64;
        for i in 0..total {
            // Outside the cooldown window each time; code never resolves
            kiosk.submit_code("0000000000000", i * 2000);
        }
        assert_eq!(kiosk.mode(), Mode::Complete);
        assert_eq!(kiosk.learning().attempted(), total as u32);

        kiosk.handle_event(InputEvent::Button(GameButton::Red), 0);
        assert_eq!(kiosk.mode(), Mode::Menu);
    }

    #[test]
    fn test_manager_csv_round_trip() {
        let (mut kiosk, dir) = test_kiosk();
        kiosk.handle_event(InputEvent::Button(GameButton::Yellow), 0);
        assert_eq!(kiosk.mode(), Mode::Manager);

        kiosk.handle_event(InputEvent::Char('e'), 0);
        let csv_path = dir.path().join("products.csv");
        assert!(csv_path.exists());
        assert!(kiosk.status().starts_with("Products exported"));

        kiosk.handle_event(InputEvent::Char('i'), 0);
        assert_eq!(kiosk.status(), "Imported 10 products");
        assert!(dir.path().join("products.json").exists());
    }
}
