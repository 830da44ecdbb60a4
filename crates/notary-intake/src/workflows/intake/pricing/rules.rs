use rust_decimal::Decimal;

use super::super::addons::AddonSelectionResolver;
use super::super::catalog::PricingCatalog;
use super::super::domain::{AddonCategory, AddonId, ServiceSelection, ServiceType};
use super::{LineKind, PendingLine};

pub(super) fn price_lines(
    service: ServiceType,
    selection: &ServiceSelection,
    catalog: &PricingCatalog,
) -> Vec<PendingLine> {
    match service {
        ServiceType::Apostille => apostille_lines(selection, catalog),
        ServiceType::PowerOfAttorney
        | ServiceType::Trust
        | ServiceType::LoanSigning
        | ServiceType::Hospital => notarization_lines(service, selection, catalog),
        ServiceType::RemoteDeposition => remote_deposition_lines(selection, catalog),
        ServiceType::RecordingOnly => recording_only_lines(selection, catalog),
        ServiceType::CertifiedReporter => certified_reporter_lines(selection, catalog),
    }
}

fn apostille_lines(selection: &ServiceSelection, catalog: &PricingCatalog) -> Vec<PendingLine> {
    let mut lines = Vec::new();

    let base = catalog.apostille(selection.region);
    let label = match selection.region {
        Some(region) => format!("Apostille ({})", region.label()),
        None => "Apostille (select an issuing region)".to_string(),
    };
    lines.push(PendingLine::charge(LineKind::Base, label, base));

    let additional = selection.num_documents.saturating_sub(1);
    if additional > 0 {
        let discount = catalog.additional_doc_discount();
        let amount = Decimal::from(additional) * base * (Decimal::ONE - discount);
        lines.push(PendingLine::charge(
            LineKind::Documents,
            format!(
                "Additional documents ({additional} at {}% off)",
                (discount * Decimal::ONE_HUNDRED).normalize()
            ),
            amount,
        ));
    } else {
        lines.push(single_document_line());
    }

    lines.extend(turnaround_and_delivery(selection, catalog));
    lines
}

fn notarization_lines(
    service: ServiceType,
    selection: &ServiceSelection,
    catalog: &PricingCatalog,
) -> Vec<PendingLine> {
    let mut lines = vec![PendingLine::charge(
        LineKind::Base,
        format!("{} base fee", service.label()),
        catalog.notary_base(service),
    )];

    // Flat per-document rate; the volume discount applies to apostilles only.
    let additional = selection.num_documents.saturating_sub(1);
    if additional > 0 {
        lines.push(PendingLine::charge(
            LineKind::Documents,
            format!("Additional documents ({additional})"),
            Decimal::from(additional) * catalog.notary_per_doc(service),
        ));
    } else {
        lines.push(single_document_line());
    }

    if service != ServiceType::Hospital {
        if let Some(location) = selection.location_type {
            lines.push(PendingLine::charge_or_included(
                LineKind::Location,
                format!("Location: {}", location.label()),
                catalog.location(location),
            ));
        }
    }

    lines.extend(turnaround_and_delivery(selection, catalog));
    lines
}

fn remote_deposition_lines(
    selection: &ServiceSelection,
    catalog: &PricingCatalog,
) -> Vec<PendingLine> {
    let included_hours = catalog.remote_included_hours();
    let mut lines = vec![PendingLine::charge(
        LineKind::Base,
        format!("Remote deposition (up to {included_hours} hours)"),
        catalog.remote_base(),
    )];

    let overage_hours = selection.session_hours.saturating_sub(included_hours);
    if overage_hours > 0 {
        lines.push(PendingLine::charge(
            LineKind::SessionOverage,
            format!("Additional session hours ({overage_hours})"),
            Decimal::from(overage_hours) * catalog.remote_overage_per_hour(),
        ));
    }

    lines.extend(recording_line(selection, catalog));
    lines.extend(addon_line(
        selection,
        catalog,
        LineKind::ComplexityAddons,
        "Complexity add-ons",
        |addon| addon.category() == AddonCategory::Complexity,
    ));
    lines.extend(booking_line(selection, catalog));
    lines
}

fn recording_only_lines(selection: &ServiceSelection, catalog: &PricingCatalog) -> Vec<PendingLine> {
    let mut lines = vec![PendingLine::charge(
        LineKind::Base,
        "Recording only (no session fee)",
        Decimal::ZERO,
    )];
    lines.extend(recording_line(selection, catalog));
    lines.extend(booking_line(selection, catalog));
    lines
}

fn certified_reporter_lines(
    selection: &ServiceSelection,
    catalog: &PricingCatalog,
) -> Vec<PendingLine> {
    let mut lines = vec![PendingLine::charge(
        LineKind::Base,
        "Certified reporter coordination",
        catalog.reporter_coordination(),
    )];
    lines.extend(booking_line(selection, catalog));
    lines
}

fn single_document_line() -> PendingLine {
    PendingLine::charge_or_included(LineKind::Documents, "Documents (1)", Decimal::ZERO)
}

fn turnaround_and_delivery(
    selection: &ServiceSelection,
    catalog: &PricingCatalog,
) -> [PendingLine; 2] {
    [
        PendingLine::charge_or_included(
            LineKind::Urgency,
            format!("Turnaround: {}", selection.urgency.label()),
            catalog.urgency(selection.urgency),
        ),
        PendingLine::charge_or_included(
            LineKind::Delivery,
            format!("Delivery: {}", selection.delivery.label()),
            catalog.delivery(selection.delivery),
        ),
    ]
}

fn recording_line(selection: &ServiceSelection, catalog: &PricingCatalog) -> Option<PendingLine> {
    addon_line(
        selection,
        catalog,
        LineKind::RecordingAddons,
        "Recording add-ons",
        AddonId::is_recording,
    )
}

fn addon_line(
    selection: &ServiceSelection,
    catalog: &PricingCatalog,
    kind: LineKind,
    title: &str,
    include: impl Fn(AddonId) -> bool,
) -> Option<PendingLine> {
    let mut amount = Decimal::ZERO;
    let mut names = Vec::new();

    for addon in selection.addons.iter().copied().filter(|addon| include(*addon)) {
        if AddonSelectionResolver::is_waived(&selection.addons, addon) {
            names.push(format!("{} (bundled)", addon.label()));
        } else {
            amount += catalog.addon(addon);
            names.push(addon.label().to_string());
        }
    }

    if names.is_empty() {
        return None;
    }

    Some(PendingLine::charge(
        kind,
        format!("{title}: {}", names.join(", ")),
        amount,
    ))
}

fn booking_line(selection: &ServiceSelection, catalog: &PricingCatalog) -> Option<PendingLine> {
    if selection.remote_urgency.is_empty() {
        return None;
    }

    let amount: Decimal = selection
        .remote_urgency
        .iter()
        .map(|option| catalog.booking(*option))
        .sum();
    let names: Vec<&str> = selection
        .remote_urgency
        .iter()
        .map(|option| option.label())
        .collect();

    Some(PendingLine::charge(
        LineKind::BookingFees,
        format!("Booking & timing fees: {}", names.join(", ")),
        amount,
    ))
}
