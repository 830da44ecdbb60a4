use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::common::*;
use crate::workflows::intake::catalog::RateKey;
use crate::workflows::intake::domain::{
    AddonId, ApostilleRegion, BookingOption, Delivery, LocationType, ServiceSelection,
    ServiceType, Urgency,
};
use crate::workflows::intake::pricing::{LineKind, Quote, UNSELECTED_SERVICE_LABEL};
use crate::workflows::intake::{PricingCatalog, QuoteEngine};

fn assert_total_matches_lines(quote: &Quote) {
    let sum: Decimal = quote.lines.iter().map(|line| line.amount).sum();
    assert_eq!(quote.total, sum, "total drifted from lines in {quote:?}");
}

#[test]
fn apostille_discounts_additional_documents() {
    let quote = engine().compute_quote(&apostille(Some(ApostilleRegion::Nj), 3));

    assert_eq!(quote.amount_of(LineKind::Base), dec!(447));
    assert_eq!(quote.amount_of(LineKind::Documents), dec!(759.90));
    assert!(quote.line(LineKind::Urgency).expect("urgency line").included);
    assert!(quote.line(LineKind::Delivery).expect("delivery line").included);
    assert_eq!(quote.total, dec!(1206.90));
    assert_total_matches_lines(&quote);
}

#[test]
fn apostille_without_region_prices_at_zero() {
    let mut selection = apostille(None, 2);
    selection.delivery = Delivery::Express;

    let quote = engine().compute_quote(&selection);

    assert_eq!(quote.amount_of(LineKind::Base), Decimal::ZERO);
    assert_eq!(quote.amount_of(LineKind::Documents), Decimal::ZERO);
    assert_eq!(quote.total, dec!(45));
    assert!(quote
        .line(LineKind::Base)
        .expect("base line")
        .label
        .contains("select an issuing region"));
}

#[test]
fn power_of_attorney_includes_the_first_document() {
    let quote = engine().compute_quote(&power_of_attorney_mobile_expedited());

    let documents = quote.line(LineKind::Documents).expect("documents line");
    assert!(documents.included);
    assert_eq!(documents.amount, Decimal::ZERO);
    assert_eq!(quote.amount_of(LineKind::Base), dec!(115));
    assert_eq!(quote.amount_of(LineKind::Location), dec!(25));
    assert_eq!(quote.amount_of(LineKind::Urgency), dec!(75));
    assert_eq!(quote.amount_of(LineKind::Delivery), dec!(15));
    assert_eq!(quote.total, dec!(230.00));
}

#[test]
fn notarization_documents_use_flat_rate_without_discount() {
    let selection = ServiceSelection {
        num_documents: 3,
        location_type: Some(LocationType::Office),
        urgency: Urgency::Rush,
        delivery: Delivery::Express,
        ..ServiceSelection::for_service(ServiceType::Trust)
    };

    let quote = engine().compute_quote(&selection);

    assert_eq!(quote.amount_of(LineKind::Documents), dec!(90));
    assert!(quote.line(LineKind::Location).expect("location line").included);
    assert_eq!(quote.total, dec!(460));
    assert_total_matches_lines(&quote);
}

#[test]
fn hospital_signings_never_charge_location() {
    let selection = ServiceSelection {
        num_documents: 2,
        location_type: Some(LocationType::Mobile),
        delivery: Delivery::International,
        ..ServiceSelection::for_service(ServiceType::Hospital)
    };

    let quote = engine().compute_quote(&selection);

    assert!(quote.line(LineKind::Location).is_none());
    assert_eq!(quote.amount_of(LineKind::Documents), dec!(35));
    assert_eq!(quote.total, dec!(325));
}

#[test]
fn remote_deposition_bills_overage_recording_and_booking() {
    let selection = remote_deposition(6, &[AddonId::AudioVideo], &[BookingOption::RushBooking]);

    let quote = engine().compute_quote(&selection);

    assert_eq!(quote.amount_of(LineKind::Base), dec!(649));
    assert_eq!(quote.amount_of(LineKind::SessionOverage), dec!(300));
    assert_eq!(quote.amount_of(LineKind::RecordingAddons), dec!(199));
    assert_eq!(quote.amount_of(LineKind::BookingFees), dec!(125));
    assert_eq!(quote.total, dec!(1273.00));
}

#[test]
fn remote_deposition_ignores_document_service_fields() {
    let mut selection = remote_deposition(3, &[], &[]);
    selection.num_documents = 5;
    selection.urgency = Urgency::Rush;
    selection.delivery = Delivery::International;

    let quote = engine().compute_quote(&selection);

    assert_eq!(quote.lines.len(), 1, "only the base line applies: {quote:?}");
    assert_eq!(quote.total, dec!(649));
}

#[test]
fn timestamp_is_waived_with_audio_video() {
    let bundled = remote_deposition(4, &[AddonId::AudioVideo, AddonId::Timestamp], &[]);
    let quote = engine().compute_quote(&bundled);
    assert_eq!(quote.amount_of(LineKind::RecordingAddons), dec!(199));
    assert!(quote
        .line(LineKind::RecordingAddons)
        .expect("recording line")
        .label
        .contains("(bundled)"));

    let audio_only = remote_deposition(4, &[AddonId::Audio, AddonId::Timestamp], &[]);
    let quote = engine().compute_quote(&audio_only);
    assert_eq!(quote.amount_of(LineKind::RecordingAddons), dec!(148));
}

#[test]
fn complexity_and_multiple_booking_fees_sum_per_line() {
    let selection = remote_deposition(
        4,
        &[
            AddonId::AudioVideo,
            AddonId::Timestamp,
            AddonId::ExhibitManagement,
            AddonId::TechnicalTestimony,
        ],
        &[BookingOption::SameDayBooking, BookingOption::RushBooking],
    );

    let quote = engine().compute_quote(&selection);

    assert_eq!(quote.amount_of(LineKind::ComplexityAddons), dec!(175));
    assert_eq!(quote.amount_of(LineKind::BookingFees), dec!(350));
    assert_eq!(quote.total, dec!(1373));
    assert_total_matches_lines(&quote);
}

#[test]
fn recording_only_skips_session_and_complexity_pricing() {
    let selection = ServiceSelection {
        session_hours: 9,
        addons: [
            AddonId::Audio,
            AddonId::Timestamp,
            AddonId::ArchiveMonthly,
            AddonId::MultiParty,
        ]
        .into_iter()
        .collect(),
        remote_urgency: [BookingOption::Weekend].into_iter().collect(),
        ..ServiceSelection::for_service(ServiceType::RecordingOnly)
    };

    let quote = engine().compute_quote(&selection);

    assert_eq!(quote.amount_of(LineKind::Base), Decimal::ZERO);
    assert!(quote.line(LineKind::SessionOverage).is_none());
    assert!(quote.line(LineKind::ComplexityAddons).is_none());
    assert_eq!(quote.amount_of(LineKind::RecordingAddons), dec!(173));
    assert_eq!(quote.total, dec!(323));
}

#[test]
fn certified_reporter_charges_coordination_and_booking_only() {
    let selection = ServiceSelection {
        addons: [AddonId::AudioVideo].into_iter().collect(),
        remote_urgency: [BookingOption::AfterHours].into_iter().collect(),
        ..ServiceSelection::for_service(ServiceType::CertifiedReporter)
    };

    let quote = engine().compute_quote(&selection);

    assert!(quote.line(LineKind::RecordingAddons).is_none());
    assert_eq!(quote.amount_of(LineKind::Base), dec!(95));
    assert_eq!(quote.total, dec!(190));
}

#[test]
fn unselected_service_yields_empty_placeholder_quote() {
    let quote = engine().compute_quote(&ServiceSelection::default());

    assert_eq!(quote.service_label, UNSELECTED_SERVICE_LABEL);
    assert!(quote.is_empty());
    assert_eq!(quote.total, Decimal::ZERO);
}

#[test]
fn lines_are_rounded_before_totalling() {
    let catalog = PricingCatalog::standard()
        .with_overrides([(RateKey::Apostille(ApostilleRegion::Nj), dec!(447.33))]);
    let engine = QuoteEngine::new(Arc::new(catalog));

    let quote = engine.compute_quote(&apostille(Some(ApostilleRegion::Nj), 4));

    assert_eq!(quote.amount_of(LineKind::Documents), dec!(1140.69));
    assert_eq!(quote.total, dec!(1588.02));
    assert_total_matches_lines(&quote);
}

#[test]
fn empty_catalog_never_fails() {
    let engine = QuoteEngine::new(Arc::new(PricingCatalog::empty()));
    for service in ServiceType::ordered() {
        let mut selection = remote_deposition(8, &[AddonId::Audio], &[BookingOption::Weekend]);
        selection.service_type = Some(service);
        selection.num_documents = 4;

        let quote = engine.compute_quote(&selection);

        assert_eq!(quote.total, Decimal::ZERO, "{service}");
        assert_eq!(quote.service_label, service.label());
    }
}

#[test]
fn recomputing_an_unchanged_selection_is_identical() {
    let selection = remote_deposition(
        7,
        &[AddonId::Audio, AddonId::SameDayDelivery],
        &[BookingOption::Weekend],
    );
    let engine = engine();
    assert_eq!(engine.compute_quote(&selection), engine.compute_quote(&selection));
}

#[test]
fn out_of_range_overrides_keep_quotes_finite_and_non_negative() {
    let catalog = PricingCatalog::standard().with_overrides([
        (RateKey::AdditionalDocDiscount, dec!(1.5)),
        (RateKey::Apostille(ApostilleRegion::Nj), Decimal::MAX),
        (RateKey::NotaryPerDoc(ServiceType::Trust), Decimal::MAX),
        (RateKey::RemoteOveragePerHour, Decimal::MAX),
        (RateKey::Booking(BookingOption::Weekend), Decimal::MAX),
    ]);
    let engine = QuoteEngine::new(Arc::new(catalog));

    let mut trust = ServiceSelection::for_service(ServiceType::Trust);
    trust.num_documents = u32::MAX;
    let selections = [
        apostille(Some(ApostilleRegion::Nj), u32::MAX),
        trust,
        remote_deposition(u32::MAX, &[AddonId::Audio], &[BookingOption::Weekend]),
    ];

    for selection in &selections {
        let quote = engine.compute_quote(selection);
        assert!(
            quote.lines.iter().all(|line| !line.amount.is_sign_negative()),
            "{quote:?}"
        );
        assert_total_matches_lines(&quote);
    }

    let discounted = engine.compute_quote(&apostille(Some(ApostilleRegion::Nj), 3));
    assert_eq!(discounted.amount_of(LineKind::Documents), Decimal::ZERO);
    assert_eq!(discounted.total, dec!(1000000));
}
