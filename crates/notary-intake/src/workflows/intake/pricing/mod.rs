mod rules;

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::catalog::PricingCatalog;
use super::domain::ServiceSelection;

pub const UNSELECTED_SERVICE_LABEL: &str = "Select a service";

/// Stateless engine turning a selection into an itemized quote.
///
/// Never fails: an incomplete selection prices missing components at zero so a quote can be
/// rendered at every point of form entry.
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    catalog: Arc<PricingCatalog>,
}

impl Default for QuoteEngine {
    fn default() -> Self {
        Self::new(Arc::new(PricingCatalog::standard()))
    }
}

impl QuoteEngine {
    pub fn new(catalog: Arc<PricingCatalog>) -> Self {
        Self { catalog }
    }

    pub fn compute_quote(&self, selection: &ServiceSelection) -> Quote {
        let Some(service_type) = selection.service_type else {
            return Quote::unselected();
        };

        let lines = rules::price_lines(service_type, selection, &self.catalog)
            .into_iter()
            .map(PendingLine::finish)
            .collect();

        Quote::from_lines(service_type.label(), lines)
    }
}

/// What a quote line charges for, so callers can find lines without matching on labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Base,
    Documents,
    Location,
    Urgency,
    Delivery,
    SessionOverage,
    RecordingAddons,
    ComplexityAddons,
    BookingFees,
}

/// One itemized charge. `included` marks a zero-cost component shown as "Included".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLineItem {
    pub kind: LineKind,
    pub label: String,
    pub amount: Decimal,
    pub included: bool,
}

/// Itemized pricing result; `total` is always the exact sum of the line amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub service_label: String,
    pub lines: Vec<QuoteLineItem>,
    pub total: Decimal,
}

impl Quote {
    fn unselected() -> Self {
        Self {
            service_label: UNSELECTED_SERVICE_LABEL.to_string(),
            lines: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    fn from_lines(service_label: &str, lines: Vec<QuoteLineItem>) -> Self {
        let total: Decimal = lines.iter().map(|line| line.amount).sum();
        Self {
            service_label: service_label.to_string(),
            lines,
            total,
        }
    }

    pub fn line(&self, kind: LineKind) -> Option<&QuoteLineItem> {
        self.lines.iter().find(|line| line.kind == kind)
    }

    pub fn amount_of(&self, kind: LineKind) -> Decimal {
        self.line(kind).map_or(Decimal::ZERO, |line| line.amount)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Round a full-precision amount for presentation.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A line at full precision, rounded only when it becomes part of a quote.
struct PendingLine {
    kind: LineKind,
    label: String,
    amount: Decimal,
    included: bool,
}

impl PendingLine {
    fn charge(kind: LineKind, label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            kind,
            label: label.into(),
            amount,
            included: false,
        }
    }

    /// Zero-rate components render as "Included" rather than a zero charge.
    fn charge_or_included(kind: LineKind, label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            included: amount.is_zero(),
            ..Self::charge(kind, label, amount)
        }
    }

    fn finish(self) -> QuoteLineItem {
        QuoteLineItem {
            kind: self.kind,
            label: self.label,
            amount: round_money(self.amount),
            included: self.included,
        }
    }
}
