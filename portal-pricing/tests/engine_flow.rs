use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use portal_pricing::{Config, PricingEngine};
use portal_shared::{DiscountTable, PartnerTier};
use portal_store::{FileStore, MemoryStore};

fn memory_engine() -> PricingEngine {
    PricingEngine::new(Arc::new(MemoryStore::new()))
}

fn temp_settings_path(tag: &str) -> PathBuf {
    let mut path = env::temp_dir();
    path.push(format!("portal-pricing-{}-{}.json", tag, std::process::id()));
    let _ = fs::remove_file(&path);
    path
}

#[test]
fn test_snapshot_round_trip_restores_tables() {
    let source = memory_engine();
    source.set_default_discounts(DiscountTable::new(2.0, 4.0, 6.0));
    source.update_brand_discounts("Axis", DiscountTable::new(12.0, 18.0, 24.0));
    source.update_brand_discounts("Bosch", DiscountTable::flat(20.0));
    source.set_extra_discount(true);

    let payload = serde_json::to_string(&source.export_config()).unwrap();

    let target = memory_engine();
    assert!(target.import_config(&payload));

    assert_eq!(target.default_discounts(), DiscountTable::new(2.0, 4.0, 6.0));
    assert_eq!(
        target.brand_discounts("Axis"),
        Some(DiscountTable::new(12.0, 18.0, 24.0))
    );
    assert_eq!(
        target.brand_discounts("Bosch"),
        Some(DiscountTable::flat(20.0))
    );
    // The campaign toggle is not part of the snapshot
    assert!(!target.extra_discount_enabled());
}

#[test]
fn test_partial_snapshot_applies_present_sections_only() {
    let engine = memory_engine();
    engine.update_brand_discounts("Axis", DiscountTable::flat(15.0));

    let payload = r#"{"defaultDiscounts": {"level1": 1, "level2": 2, "level3": 3}}"#;
    assert!(engine.import_config(payload));

    assert_eq!(engine.default_discounts(), DiscountTable::new(1.0, 2.0, 3.0));
    // Overrides were absent from the payload, so the stored ones survive
    assert_eq!(engine.brand_discounts("Axis"), Some(DiscountTable::flat(15.0)));
}

#[test]
fn test_malformed_snapshot_is_rejected_without_side_effects() {
    let engine = memory_engine();
    engine.set_default_discounts(DiscountTable::flat(10.0));

    assert!(!engine.import_config("not a snapshot"));

    assert_eq!(engine.default_discounts(), DiscountTable::flat(10.0));
}

#[test]
fn test_snapshot_with_unknown_fields_still_imports() {
    let engine = memory_engine();

    let payload = r#"{
        "defaultDiscounts": {"level1": 5, "level2": 5, "level3": 5},
        "exportDate": "2026-01-15T09:30:00Z",
        "extraDiscount": true
    }"#;
    assert!(engine.import_config(payload));

    assert_eq!(engine.default_discounts(), DiscountTable::flat(5.0));
    // Stray fields such as a future flag are ignored, not applied
    assert!(!engine.extra_discount_enabled());
}

#[test]
fn test_file_backed_configuration_survives_engine_restart() {
    let path = temp_settings_path("restart");

    let first = PricingEngine::new(Arc::new(FileStore::new(path.clone())));
    first.set_default_discounts(DiscountTable::new(10.0, 20.0, 30.0));
    first.update_brand_discounts("Axis", DiscountTable::flat(25.0));
    drop(first);

    let second = PricingEngine::new(Arc::new(FileStore::new(path.clone())));
    assert_eq!(
        second.net_price(100.0, PartnerTier::Level2, None),
        80.0
    );
    assert_eq!(second.brand_discounts("Axis"), Some(DiscountTable::flat(25.0)));

    let _ = fs::remove_file(path);
}

#[test]
fn test_default_config_wires_a_working_engine() {
    let engine = PricingEngine::from_config(&Config::default());

    engine.set_default_discounts(DiscountTable::flat(50.0));
    assert_eq!(engine.net_price(10.0, PartnerTier::Level1, None), 5.0);
}

#[test]
fn test_quote_line_pricing_at_add_time() {
    // A quote line captures the net price at the moment the item is added;
    // later configuration changes do not rewrite it.
    let engine = memory_engine();
    engine.set_default_discounts(DiscountTable::new(0.0, 10.0, 20.0));

    let captured = engine.net_price(349.0, PartnerTier::Level2, Some("Milesight"));
    assert_eq!(captured, 209.40);

    engine.update_brand_discounts("Humly", DiscountTable::flat(50.0));
    assert_eq!(captured, 209.40);
}
