use serde::{Deserialize, Serialize};

use super::super::addons::AddonSelectionResolver;
use super::super::domain::{
    lenient_identifier, lenient_or_default, parse_count, AddonId, ApostilleRegion, BookingOption, Delivery, LocationType,
    ServiceSelection, ServiceType, Urgency, DEFAULT_DOCUMENTS, DEFAULT_SESSION_HOURS,
};

/// A single user input event against the active selection.
///
/// Numeric fields carry the raw text typed into the control. Unrecognized identifiers clear
/// the field (or fall back to its default) instead of failing the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldChange {
    ServiceType(#[serde(deserialize_with = "lenient_identifier")] Option<ServiceType>),
    Region(#[serde(deserialize_with = "lenient_identifier")] Option<ApostilleRegion>),
    LocationType(#[serde(deserialize_with = "lenient_identifier")] Option<LocationType>),
    NumDocuments(String),
    SessionHours(String),
    Urgency(#[serde(deserialize_with = "lenient_or_default")] Urgency),
    Delivery(#[serde(deserialize_with = "lenient_or_default")] Delivery),
    Addon { addon: AddonId, selected: bool },
    Booking { option: BookingOption, selected: bool },
    Reset,
}

impl FieldChange {
    pub(super) fn apply_to(self, selection: &mut ServiceSelection) {
        match self {
            FieldChange::ServiceType(service_type) => selection.service_type = service_type,
            FieldChange::Region(region) => selection.region = region,
            FieldChange::LocationType(location) => selection.location_type = location,
            FieldChange::NumDocuments(raw) => {
                selection.num_documents = parse_count(&raw, DEFAULT_DOCUMENTS);
            }
            FieldChange::SessionHours(raw) => {
                selection.session_hours = parse_count(&raw, DEFAULT_SESSION_HOURS);
            }
            FieldChange::Urgency(urgency) => selection.urgency = urgency,
            FieldChange::Delivery(delivery) => selection.delivery = delivery,
            FieldChange::Addon { addon, selected } => {
                selection.addons =
                    AddonSelectionResolver::resolve(&selection.addons, addon, selected);
            }
            FieldChange::Booking { option, selected } => {
                selection.remote_urgency = AddonSelectionResolver::toggle_booking(
                    &selection.remote_urgency,
                    option,
                    selected,
                );
            }
            FieldChange::Reset => *selection = ServiceSelection::default(),
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            FieldChange::ServiceType(_) => "service_type",
            FieldChange::Region(_) => "region",
            FieldChange::LocationType(_) => "location_type",
            FieldChange::NumDocuments(_) => "num_documents",
            FieldChange::SessionHours(_) => "session_hours",
            FieldChange::Urgency(_) => "urgency",
            FieldChange::Delivery(_) => "delivery",
            FieldChange::Addon { .. } => "addons",
            FieldChange::Booking { .. } => "remote_urgency",
            FieldChange::Reset => "reset",
        }
    }
}
