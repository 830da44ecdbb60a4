//! Pricing scenarios exercised through the public engine and catalog loading.

use std::io::Write;
use std::sync::Arc;

use rust_decimal_macros::dec;
use serde_json::json;
use tempfile::NamedTempFile;

use notary_intake::workflows::intake::presenter::{display_amount, format_money, render_quote};
use notary_intake::workflows::intake::{
    CatalogError, LineKind, PricingCatalog, QuoteEngine, ServiceSelection,
};

fn quote_for(payload: serde_json::Value) -> notary_intake::workflows::intake::Quote {
    let selection = ServiceSelection::from_value(payload).expect("selection parses");
    QuoteEngine::default().compute_quote(&selection)
}

#[test]
fn new_jersey_apostille_for_three_documents() {
    let quote = quote_for(json!({
        "service_type": "apostille",
        "region": "nj",
        "num_documents": "3",
    }));

    assert_eq!(quote.total, dec!(1206.90));
    let rendered = render_quote(&quote);
    assert!(rendered.contains("Apostille (New Jersey)"), "{rendered}");
    assert!(rendered.contains("$759.90"), "{rendered}");
    assert!(rendered.contains("$1,206.90"), "{rendered}");
}

#[test]
fn mobile_power_of_attorney_with_expedited_turnaround() {
    let quote = quote_for(json!({
        "service_type": "power_of_attorney",
        "location_type": "mobile",
        "num_documents": 1,
        "urgency": "expedited",
        "delivery": "standard_mail",
    }));

    let documents = quote.line(LineKind::Documents).expect("documents line");
    assert_eq!(display_amount(documents), "Included");
    assert_eq!(format_money(quote.total), "$230.00");
}

#[test]
fn six_hour_remote_deposition_with_video_and_rush_booking() {
    let quote = quote_for(json!({
        "service_type": "remote_deposition",
        "session_hours": 6,
        "addons": ["audio_video"],
        "remote_urgency": ["rush_booking"],
    }));

    assert_eq!(quote.amount_of(LineKind::SessionOverage), dec!(300));
    assert_eq!(quote.total, dec!(1273.00));
}

#[test]
fn conflicting_payload_addons_are_repaired_before_pricing() {
    let quote = quote_for(json!({
        "service_type": "remote_deposition",
        "session_hours": 4,
        "addons": ["audio", "audio_video", "teleportation"],
    }));

    assert_eq!(quote.amount_of(LineKind::RecordingAddons), dec!(99));
    assert_eq!(quote.total, dec!(748));
}

#[test]
fn rate_sheet_overrides_standard_prices() {
    let mut sheet = NamedTempFile::new().expect("temp file");
    writeln!(sheet, "category,key,rate").expect("write header");
    writeln!(sheet, "# 2026 price review").expect("write comment");
    writeln!(sheet, "apostille,nj,500").expect("write row");
    writeln!(sheet, "apostille,additional_doc_discount,0.20").expect("write row");
    writeln!(sheet, "booking,rush_booking,140").expect("write row");
    sheet.flush().expect("flush");

    let catalog = PricingCatalog::from_path(sheet.path()).expect("sheet loads");
    let engine = QuoteEngine::new(Arc::new(catalog));

    let apostille = ServiceSelection::from_value(json!({
        "service_type": "apostille",
        "region": "nj",
        "num_documents": 3,
    }))
    .expect("parses");
    let quote = engine.compute_quote(&apostille);
    assert_eq!(quote.amount_of(LineKind::Documents), dec!(800));
    assert_eq!(quote.total, dec!(1300));

    let deposition = ServiceSelection::from_value(json!({
        "service_type": "remote_deposition",
        "remote_urgency": ["rush_booking"],
    }))
    .expect("parses");
    assert_eq!(engine.compute_quote(&deposition).total, dec!(789));
}

#[test]
fn rate_sheet_with_unknown_rate_is_rejected() {
    let mut sheet = NamedTempFile::new().expect("temp file");
    write!(sheet, "category,key,rate\nbooking,midnight_oil,300\n").expect("write");
    sheet.flush().expect("flush");

    match PricingCatalog::from_path(sheet.path()) {
        Err(CatalogError::UnknownRate { line, category, key }) => {
            assert_eq!(line, 2);
            assert_eq!(category, "booking");
            assert_eq!(key, "midnight_oil");
        }
        other => panic!("expected unknown rate, got {other:?}"),
    }
}

#[test]
fn missing_rate_sheet_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = PricingCatalog::from_path(dir.path().join("absent.csv"));
    assert!(matches!(result, Err(CatalogError::Io(_))));
}
