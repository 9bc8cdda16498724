//! Integration tests for the barcode input path.
//!
//! These drive the public API the way the cabinet loop does: characters in,
//! completed codes through the router, cart state out. Timing is supplied
//! explicitly so every cadence case is deterministic.

use mart_core::{
    Cart, Catalog, Disambiguator, KioskConfig, LearningSession, ScanMode, ScanOutcome, ScanRouter,
    ScanTuning,
};

fn demo_catalog() -> Catalog {
    Catalog::default_products()
}

fn retail_fixtures() -> (Catalog, Disambiguator, ScanRouter, Cart, LearningSession) {
    let tuning = ScanTuning::default();
    (
        demo_catalog(),
        Disambiguator::new(tuning.clone()),
        ScanRouter::new(tuning.scan_cooldown_ms),
        Cart::new(),
        LearningSession::new(),
    )
}

/// Feed a whole burst at scanner cadence, returning every emitted code.
fn burst(d: &mut Disambiguator, catalog: &Catalog, code: &str, start_ms: u64) -> Vec<String> {
    code.chars()
        .enumerate()
        .filter_map(|(i, ch)| d.on_character(ch, start_ms + (i as u64) * 10, catalog))
        .collect()
}

#[test]
fn test_scanner_burst_adds_exactly_one_item() {
    let (catalog, mut d, mut router, mut cart, mut learning) = retail_fixtures();

    let codes = burst(&mut d, &catalog, "7501234567890", 0);
    assert_eq!(codes, vec!["7501234567890".to_string()]);

    let outcome = router.submit(
        &codes[0],
        130,
        ScanMode::Retail,
        &catalog,
        &mut cart,
        &mut learning,
    );
    assert_eq!(
        outcome,
        ScanOutcome::Added {
            name: "White Bread".to_string(),
            unit_price: 2.20,
            quantity: 1,
        }
    );
    assert_eq!(cart.item_count(), 1);
}

#[test]
fn test_duplicate_burst_inside_cooldown_is_dropped() {
    let (catalog, mut d, mut router, mut cart, mut learning) = retail_fixtures();

    // Same physical scan surfacing twice 200ms apart
    for start in [0u64, 200] {
        let codes = burst(&mut d, &catalog, "7501234567890", start);
        for code in codes {
            router.submit(&code, start + 130, ScanMode::Retail, &catalog, &mut cart, &mut learning);
        }
    }
    assert_eq!(cart.item_count(), 1);

    // A later deliberate rescan goes through
    let codes = burst(&mut d, &catalog, "7501234567890", 2000);
    let outcome = router.submit(
        &codes[0],
        2130,
        ScanMode::Retail,
        &catalog,
        &mut cart,
        &mut learning,
    );
    assert!(matches!(outcome, ScanOutcome::Added { quantity: 2, .. }));
}

#[test]
fn test_burst_then_enter_does_not_double_add() {
    let (catalog, mut d, mut router, mut cart, mut learning) = retail_fixtures();

    let codes = burst(&mut d, &catalog, "7501234567890", 0);
    router.submit(&codes[0], 130, ScanMode::Retail, &catalog, &mut cart, &mut learning);

    // Trailing Enter from the device arrives over an empty buffer
    assert!(d.buffer().is_empty());
    assert_eq!(d.on_submit("", &catalog), None);
    assert_eq!(cart.item_count(), 1);
}

#[test]
fn test_abandoned_partial_scan_recovers() {
    let (catalog, mut d, mut router, mut cart, mut learning) = retail_fixtures();

    // A misread burst delivers only 5 characters
    for (i, ch) in "75012".chars().enumerate() {
        assert_eq!(d.on_character(ch, (i as u64) * 10, &catalog), None);
    }
    assert_eq!(d.buffer(), "75012");

    // The next scan happens well past the buffer timeout and works fine
    let codes = burst(&mut d, &catalog, "7501234567895", 5000);
    assert_eq!(codes, vec!["7501234567895".to_string()]);
    let outcome = router.submit(
        &codes[0],
        5130,
        ScanMode::Retail,
        &catalog,
        &mut cart,
        &mut learning,
    );
    assert!(matches!(outcome, ScanOutcome::Added { .. }));
    assert_eq!(cart.lines_by_added()[0].name, "Bananas");
}

#[test]
fn test_unknown_full_length_code_reports_not_found() {
    let (catalog, mut d, mut router, mut cart, mut learning) = retail_fixtures();

    let codes = burst(&mut d, &catalog, "4009999999999", 0);
    assert_eq!(codes.len(), 1);
    let outcome = router.submit(
        &codes[0],
        130,
        ScanMode::Retail,
        &catalog,
        &mut cart,
        &mut learning,
    );
    assert_eq!(
        outcome,
        ScanOutcome::NotFound {
            code: "4009999999999".to_string()
        }
    );
    assert!(cart.is_empty());
    assert_eq!(outcome.message().unwrap(), "Product not found!");
}

#[test]
fn test_cooldown_is_shared_across_sources() {
    let (catalog, mut d, mut router, mut cart, mut learning) = retail_fixtures();

    // Keyboard-path scan
    let codes = burst(&mut d, &catalog, "7501234567890", 0);
    router.submit(&codes[0], 130, ScanMode::Retail, &catalog, &mut cart, &mut learning);

    // Device-path code for a different product, 300ms later
    let outcome = router.submit(
        "7501234567891",
        430,
        ScanMode::Retail,
        &catalog,
        &mut cart,
        &mut learning,
    );
    assert_eq!(outcome, ScanOutcome::CoolingDown);
    assert_eq!(cart.item_count(), 1);
}

#[test]
fn test_config_tuning_flows_through() {
    // A tightened cooldown from config is honored by the router
    let mut config = KioskConfig::default();
    config.scan.scan_cooldown_ms = 100;

    let catalog = demo_catalog();
    let mut router = ScanRouter::new(config.scan.scan_cooldown_ms);
    let mut cart = Cart::new();
    let mut learning = LearningSession::new();

    router.submit("7501234567890", 0, ScanMode::Retail, &catalog, &mut cart, &mut learning);
    let outcome = router.submit(
        "7501234567890",
        150,
        ScanMode::Retail,
        &catalog,
        &mut cart,
        &mut learning,
    );
    assert!(matches!(outcome, ScanOutcome::Added { quantity: 2, .. }));
}
