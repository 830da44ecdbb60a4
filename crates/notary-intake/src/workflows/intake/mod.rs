//! Intake pricing and form workflow.
//!
//! A field change updates the [`ServiceSelection`], the add-on resolver normalizes the add-on
//! set, and the [`QuoteEngine`] recomputes the [`Quote`]. Step navigation goes through the
//! [`FormStateController`], and a finished form yields a [`SubmissionPacket`] for the
//! [`IntakeHandoff`] collaborators.

pub mod addons;
pub mod catalog;
pub mod domain;
pub mod form;
pub mod handoff;
pub mod presenter;
pub mod pricing;

#[cfg(test)]
mod tests;

pub use addons::AddonSelectionResolver;
pub use catalog::{CatalogError, PricingCatalog, RateKey};
pub use domain::{
    AddonCategory, AddonId, ApostilleRegion, BookingOption, Delivery, IntakeError, LocationType,
    ServiceSelection, ServiceType, UnknownIdentifier, Urgency,
};
pub use form::{
    FieldChange, FieldGroup, FieldRule, FieldUpdate, FormLayout, FormStateController, StepChange,
    SubmissionPacket, TransitionRejected, VisibilityPolicy,
};
pub use handoff::{
    CaseId, CaseReceipt, CaseRecord, CaseStore, HandoffError, IntakeHandoff, IntakeNotice,
    NotificationDispatcher, NotifyError, StoreError,
};
pub use pricing::{LineKind, Quote, QuoteEngine, QuoteLineItem};
