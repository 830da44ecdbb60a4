use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::super::domain::{AddonCategory, ServiceSelection, ServiceType};

/// Field groups the presenter shows, hides, or requires as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    ServiceType,
    Region,
    LocationType,
    NumDocuments,
    SessionHours,
    RecordingAddons,
    RecordingDelivery,
    ComplexityAddons,
    CertifiedReporter,
    StandardUrgency,
    RemoteUrgency,
    Delivery,
}

impl FieldGroup {
    pub const fn ordered() -> [FieldGroup; 12] {
        [
            FieldGroup::ServiceType,
            FieldGroup::Region,
            FieldGroup::LocationType,
            FieldGroup::NumDocuments,
            FieldGroup::SessionHours,
            FieldGroup::RecordingAddons,
            FieldGroup::RecordingDelivery,
            FieldGroup::ComplexityAddons,
            FieldGroup::CertifiedReporter,
            FieldGroup::StandardUrgency,
            FieldGroup::RemoteUrgency,
            FieldGroup::Delivery,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FieldGroup::ServiceType => "service_type",
            FieldGroup::Region => "region",
            FieldGroup::LocationType => "location_type",
            FieldGroup::NumDocuments => "num_documents",
            FieldGroup::SessionHours => "session_hours",
            FieldGroup::RecordingAddons => "recording_addons",
            FieldGroup::RecordingDelivery => "recording_delivery",
            FieldGroup::ComplexityAddons => "complexity_addons",
            FieldGroup::CertifiedReporter => "certified_reporter",
            FieldGroup::StandardUrgency => "standard_urgency",
            FieldGroup::RemoteUrgency => "remote_urgency",
            FieldGroup::Delivery => "delivery",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FieldGroup::ServiceType => "Service",
            FieldGroup::Region => "Issuing region",
            FieldGroup::LocationType => "Signing location",
            FieldGroup::NumDocuments => "Number of documents",
            FieldGroup::SessionHours => "Session hours",
            FieldGroup::RecordingAddons => "Recording options",
            FieldGroup::RecordingDelivery => "Recording delivery & archive",
            FieldGroup::ComplexityAddons => "Case complexity",
            FieldGroup::CertifiedReporter => "Certified reporter details",
            FieldGroup::StandardUrgency => "Turnaround",
            FieldGroup::RemoteUrgency => "Booking timing",
            FieldGroup::Delivery => "Delivery method",
        }
    }

    /// Groups the form markup flags as required regardless of service type.
    const fn required_in_markup(self) -> bool {
        matches!(
            self,
            FieldGroup::ServiceType
                | FieldGroup::Region
                | FieldGroup::NumDocuments
                | FieldGroup::SessionHours
        )
    }

    /// Whether the selection carries a usable value for this group.
    pub fn has_value(self, selection: &ServiceSelection) -> bool {
        match self {
            FieldGroup::ServiceType => selection.service_type.is_some(),
            FieldGroup::Region => selection.region.is_some(),
            FieldGroup::LocationType => selection.location_type.is_some(),
            FieldGroup::NumDocuments => selection.num_documents > 0,
            FieldGroup::SessionHours => selection.session_hours > 0,
            FieldGroup::RecordingAddons => selection
                .addons_in(AddonCategory::Recording)
                .next()
                .is_some(),
            FieldGroup::RecordingDelivery => selection
                .addons_in(AddonCategory::RecordingDelivery)
                .next()
                .is_some(),
            FieldGroup::ComplexityAddons => selection
                .addons_in(AddonCategory::Complexity)
                .next()
                .is_some(),
            FieldGroup::CertifiedReporter => {
                selection.service_type == Some(ServiceType::CertifiedReporter)
            }
            FieldGroup::StandardUrgency | FieldGroup::Delivery => true,
            FieldGroup::RemoteUrgency => !selection.remote_urgency.is_empty(),
        }
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation flags for one field group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub visible: bool,
    pub required: bool,
}

impl FieldRule {
    /// Hidden groups are exempt from the required check.
    pub const fn is_enforced(self) -> bool {
        self.visible && self.required
    }
}

/// Pure table from service type to per-group visibility and required flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityPolicy {
    service_type: Option<ServiceType>,
    rules: BTreeMap<FieldGroup, FieldRule>,
}

impl VisibilityPolicy {
    pub fn for_service(service_type: Option<ServiceType>) -> Self {
        let visible = visible_groups(service_type);
        let rules = FieldGroup::ordered()
            .into_iter()
            .map(|group| {
                let rule = FieldRule {
                    visible: group == FieldGroup::ServiceType || visible.contains(&group),
                    required: group.required_in_markup(),
                };
                (group, rule)
            })
            .collect();

        Self {
            service_type,
            rules,
        }
    }

    pub fn service_type(&self) -> Option<ServiceType> {
        self.service_type
    }

    pub fn rule(&self, group: FieldGroup) -> FieldRule {
        self.rules.get(&group).copied().unwrap_or(FieldRule {
            visible: false,
            required: false,
        })
    }

    pub fn is_visible(&self, group: FieldGroup) -> bool {
        self.rule(group).visible
    }

    pub fn is_enforced(&self, group: FieldGroup) -> bool {
        self.rule(group).is_enforced()
    }

    pub fn visible_groups(&self) -> impl Iterator<Item = FieldGroup> + '_ {
        self.rules
            .iter()
            .filter(|(_, rule)| rule.visible)
            .map(|(group, _)| *group)
    }

    /// Enforced groups that have no value in `selection`, in display order.
    pub fn missing_fields(&self, selection: &ServiceSelection) -> Vec<FieldGroup> {
        self.rules
            .iter()
            .filter(|(group, rule)| rule.is_enforced() && !group.has_value(selection))
            .map(|(group, _)| *group)
            .collect()
    }
}

fn visible_groups(service_type: Option<ServiceType>) -> &'static [FieldGroup] {
    match service_type {
        None => &[],
        Some(ServiceType::Apostille) => &[
            FieldGroup::Region,
            FieldGroup::NumDocuments,
            FieldGroup::StandardUrgency,
            FieldGroup::Delivery,
        ],
        Some(ServiceType::PowerOfAttorney | ServiceType::Trust | ServiceType::LoanSigning) => &[
            FieldGroup::LocationType,
            FieldGroup::NumDocuments,
            FieldGroup::StandardUrgency,
            FieldGroup::Delivery,
        ],
        Some(ServiceType::Hospital) => &[
            FieldGroup::NumDocuments,
            FieldGroup::StandardUrgency,
            FieldGroup::Delivery,
        ],
        Some(ServiceType::RemoteDeposition) => &[
            FieldGroup::SessionHours,
            FieldGroup::RecordingAddons,
            FieldGroup::RecordingDelivery,
            FieldGroup::ComplexityAddons,
            FieldGroup::RemoteUrgency,
        ],
        Some(ServiceType::RecordingOnly) => &[
            FieldGroup::RecordingAddons,
            FieldGroup::RecordingDelivery,
            FieldGroup::RemoteUrgency,
        ],
        Some(ServiceType::CertifiedReporter) => {
            &[FieldGroup::CertifiedReporter, FieldGroup::RemoteUrgency]
        }
    }
}
