use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::addons::AddonSelectionResolver;

pub const DEFAULT_DOCUMENTS: u32 = 1;
pub const DEFAULT_SESSION_HOURS: u32 = 4;

/// Raised when an identifier does not belong to one of the closed enumerations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownIdentifier {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownIdentifier {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Errors surfaced at the selection boundary.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("selection payload is malformed: {0}")]
    MalformedSelection(#[from] serde_json::Error),
}

/// Services offered on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Apostille,
    PowerOfAttorney,
    Trust,
    LoanSigning,
    Hospital,
    RemoteDeposition,
    RecordingOnly,
    CertifiedReporter,
}

impl ServiceType {
    pub const fn ordered() -> [ServiceType; 8] {
        [
            ServiceType::Apostille,
            ServiceType::PowerOfAttorney,
            ServiceType::Trust,
            ServiceType::LoanSigning,
            ServiceType::Hospital,
            ServiceType::RemoteDeposition,
            ServiceType::RecordingOnly,
            ServiceType::CertifiedReporter,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ServiceType::Apostille => "apostille",
            ServiceType::PowerOfAttorney => "power_of_attorney",
            ServiceType::Trust => "trust",
            ServiceType::LoanSigning => "loan_signing",
            ServiceType::Hospital => "hospital",
            ServiceType::RemoteDeposition => "remote_deposition",
            ServiceType::RecordingOnly => "recording_only",
            ServiceType::CertifiedReporter => "certified_reporter",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ServiceType::Apostille => "Apostille",
            ServiceType::PowerOfAttorney => "Power of Attorney",
            ServiceType::Trust => "Trust Documents",
            ServiceType::LoanSigning => "Loan Signing",
            ServiceType::Hospital => "Hospital / Nursing Home Signing",
            ServiceType::RemoteDeposition => "Remote Deposition",
            ServiceType::RecordingOnly => "Recording Only",
            ServiceType::CertifiedReporter => "Certified Court Reporter",
        }
    }

    /// Flat base plus per-document categories.
    pub const fn is_notarization(self) -> bool {
        matches!(
            self,
            ServiceType::PowerOfAttorney
                | ServiceType::Trust
                | ServiceType::LoanSigning
                | ServiceType::Hospital
        )
    }

    /// Remote proceeding categories ignore documents, standard urgency, and delivery.
    pub const fn is_remote(self) -> bool {
        matches!(
            self,
            ServiceType::RemoteDeposition
                | ServiceType::RecordingOnly
                | ServiceType::CertifiedReporter
        )
    }
}

impl FromStr for ServiceType {
    type Err = UnknownIdentifier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        ServiceType::ordered()
            .into_iter()
            .find(|service| service.as_str() == normalized)
            .ok_or_else(|| UnknownIdentifier::new("service type", value))
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issuing jurisdiction for an apostille.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApostilleRegion {
    Nj,
    Ny,
    Pa,
    De,
    Ct,
    Federal,
}

impl ApostilleRegion {
    pub const fn ordered() -> [ApostilleRegion; 6] {
        [
            ApostilleRegion::Nj,
            ApostilleRegion::Ny,
            ApostilleRegion::Pa,
            ApostilleRegion::De,
            ApostilleRegion::Ct,
            ApostilleRegion::Federal,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ApostilleRegion::Nj => "nj",
            ApostilleRegion::Ny => "ny",
            ApostilleRegion::Pa => "pa",
            ApostilleRegion::De => "de",
            ApostilleRegion::Ct => "ct",
            ApostilleRegion::Federal => "federal",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ApostilleRegion::Nj => "New Jersey",
            ApostilleRegion::Ny => "New York",
            ApostilleRegion::Pa => "Pennsylvania",
            ApostilleRegion::De => "Delaware",
            ApostilleRegion::Ct => "Connecticut",
            ApostilleRegion::Federal => "U.S. Department of State",
        }
    }
}

impl FromStr for ApostilleRegion {
    type Err = UnknownIdentifier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        ApostilleRegion::ordered()
            .into_iter()
            .find(|region| region.as_str() == normalized)
            .ok_or_else(|| UnknownIdentifier::new("apostille region", value))
    }
}

/// Where an in-person signing takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Office,
    Mobile,
    Hospital,
}

impl LocationType {
    pub const fn ordered() -> [LocationType; 3] {
        [LocationType::Office, LocationType::Mobile, LocationType::Hospital]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            LocationType::Office => "office",
            LocationType::Mobile => "mobile",
            LocationType::Hospital => "hospital",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            LocationType::Office => "Our office",
            LocationType::Mobile => "Mobile visit",
            LocationType::Hospital => "Hospital / care facility",
        }
    }
}

impl FromStr for LocationType {
    type Err = UnknownIdentifier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        LocationType::ordered()
            .into_iter()
            .find(|location| location.as_str() == normalized)
            .ok_or_else(|| UnknownIdentifier::new("location type", value))
    }
}

/// Turnaround tier for document services.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    #[default]
    Standard,
    Expedited,
    Rush,
}

impl Urgency {
    pub const fn ordered() -> [Urgency; 3] {
        [Urgency::Standard, Urgency::Expedited, Urgency::Rush]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Urgency::Standard => "standard",
            Urgency::Expedited => "expedited",
            Urgency::Rush => "rush",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Urgency::Standard => "Standard",
            Urgency::Expedited => "Expedited",
            Urgency::Rush => "Rush",
        }
    }
}

impl FromStr for Urgency {
    type Err = UnknownIdentifier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Urgency::ordered()
            .into_iter()
            .find(|urgency| urgency.as_str() == normalized)
            .ok_or_else(|| UnknownIdentifier::new("urgency", value))
    }
}

/// Return shipping method for finished documents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    #[default]
    Pickup,
    StandardMail,
    Express,
    International,
}

impl Delivery {
    pub const fn ordered() -> [Delivery; 4] {
        [
            Delivery::Pickup,
            Delivery::StandardMail,
            Delivery::Express,
            Delivery::International,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Delivery::Pickup => "pickup",
            Delivery::StandardMail => "standard_mail",
            Delivery::Express => "express",
            Delivery::International => "international",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Delivery::Pickup => "Pickup",
            Delivery::StandardMail => "Standard mail",
            Delivery::Express => "Express courier",
            Delivery::International => "International shipping",
        }
    }
}

impl FromStr for Delivery {
    type Err = UnknownIdentifier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Delivery::ordered()
            .into_iter()
            .find(|delivery| delivery.as_str() == normalized)
            .ok_or_else(|| UnknownIdentifier::new("delivery", value))
    }
}

/// Pricing bucket an add-on belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddonCategory {
    Recording,
    RecordingDelivery,
    Complexity,
}

/// Checkbox-style options for remote proceedings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddonId {
    Audio,
    AudioVideo,
    Timestamp,
    SameDayDelivery,
    #[serde(rename = "24hr_delivery")]
    NextDayDelivery,
    ArchiveMonthly,
    ArchiveYearly,
    MultiParty,
    ExhibitManagement,
    InterpreterCoordination,
    TechnicalTestimony,
}

impl AddonId {
    pub const fn ordered() -> [AddonId; 11] {
        [
            AddonId::Audio,
            AddonId::AudioVideo,
            AddonId::Timestamp,
            AddonId::SameDayDelivery,
            AddonId::NextDayDelivery,
            AddonId::ArchiveMonthly,
            AddonId::ArchiveYearly,
            AddonId::MultiParty,
            AddonId::ExhibitManagement,
            AddonId::InterpreterCoordination,
            AddonId::TechnicalTestimony,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AddonId::Audio => "audio",
            AddonId::AudioVideo => "audio_video",
            AddonId::Timestamp => "timestamp",
            AddonId::SameDayDelivery => "same_day_delivery",
            AddonId::NextDayDelivery => "24hr_delivery",
            AddonId::ArchiveMonthly => "archive_monthly",
            AddonId::ArchiveYearly => "archive_yearly",
            AddonId::MultiParty => "multi_party",
            AddonId::ExhibitManagement => "exhibit_management",
            AddonId::InterpreterCoordination => "interpreter_coordination",
            AddonId::TechnicalTestimony => "technical_testimony",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AddonId::Audio => "Audio recording",
            AddonId::AudioVideo => "Audio + video recording",
            AddonId::Timestamp => "Timestamped transcript sync",
            AddonId::SameDayDelivery => "Same-day recording delivery",
            AddonId::NextDayDelivery => "24-hour recording delivery",
            AddonId::ArchiveMonthly => "Monthly archive storage",
            AddonId::ArchiveYearly => "Yearly archive storage",
            AddonId::MultiParty => "Multi-party session",
            AddonId::ExhibitManagement => "Exhibit management",
            AddonId::InterpreterCoordination => "Interpreter coordination",
            AddonId::TechnicalTestimony => "Technical / expert testimony",
        }
    }

    pub const fn category(self) -> AddonCategory {
        match self {
            AddonId::Audio | AddonId::AudioVideo | AddonId::Timestamp => AddonCategory::Recording,
            AddonId::SameDayDelivery
            | AddonId::NextDayDelivery
            | AddonId::ArchiveMonthly
            | AddonId::ArchiveYearly => AddonCategory::RecordingDelivery,
            AddonId::MultiParty
            | AddonId::ExhibitManagement
            | AddonId::InterpreterCoordination
            | AddonId::TechnicalTestimony => AddonCategory::Complexity,
        }
    }

    /// Recording and recording-delivery options share the recording line of a quote.
    pub const fn is_recording(self) -> bool {
        matches!(
            self.category(),
            AddonCategory::Recording | AddonCategory::RecordingDelivery
        )
    }
}

impl FromStr for AddonId {
    type Err = UnknownIdentifier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        AddonId::ordered()
            .into_iter()
            .find(|addon| addon.as_str() == normalized)
            .ok_or_else(|| UnknownIdentifier::new("add-on", value))
    }
}

impl fmt::Display for AddonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking-timing fees for remote proceedings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingOption {
    RushBooking,
    SameDayBooking,
    AfterHours,
    Weekend,
}

impl BookingOption {
    pub const fn ordered() -> [BookingOption; 4] {
        [
            BookingOption::RushBooking,
            BookingOption::SameDayBooking,
            BookingOption::AfterHours,
            BookingOption::Weekend,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BookingOption::RushBooking => "rush_booking",
            BookingOption::SameDayBooking => "same_day_booking",
            BookingOption::AfterHours => "after_hours",
            BookingOption::Weekend => "weekend",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BookingOption::RushBooking => "Rush booking (under 48 hours)",
            BookingOption::SameDayBooking => "Same-day booking",
            BookingOption::AfterHours => "After-hours session",
            BookingOption::Weekend => "Weekend session",
        }
    }
}

impl FromStr for BookingOption {
    type Err = UnknownIdentifier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        BookingOption::ordered()
            .into_iter()
            .find(|option| option.as_str() == normalized)
            .ok_or_else(|| UnknownIdentifier::new("booking option", value))
    }
}

/// The single mutable input to the quote engine, populated field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSelection {
    #[serde(deserialize_with = "lenient_identifier")]
    pub service_type: Option<ServiceType>,
    #[serde(deserialize_with = "lenient_identifier")]
    pub region: Option<ApostilleRegion>,
    #[serde(deserialize_with = "lenient_identifier")]
    pub location_type: Option<LocationType>,
    #[serde(deserialize_with = "document_count")]
    pub num_documents: u32,
    #[serde(deserialize_with = "session_hour_count")]
    pub session_hours: u32,
    #[serde(deserialize_with = "lenient_or_default")]
    pub urgency: Urgency,
    #[serde(deserialize_with = "lenient_or_default")]
    pub delivery: Delivery,
    #[serde(deserialize_with = "lenient_set")]
    pub addons: BTreeSet<AddonId>,
    #[serde(deserialize_with = "lenient_set")]
    pub remote_urgency: BTreeSet<BookingOption>,
}

impl Default for ServiceSelection {
    fn default() -> Self {
        Self {
            service_type: None,
            region: None,
            location_type: None,
            num_documents: DEFAULT_DOCUMENTS,
            session_hours: DEFAULT_SESSION_HOURS,
            urgency: Urgency::default(),
            delivery: Delivery::default(),
            addons: BTreeSet::new(),
            remote_urgency: BTreeSet::new(),
        }
    }
}

impl ServiceSelection {
    pub fn for_service(service_type: ServiceType) -> Self {
        Self {
            service_type: Some(service_type),
            ..Self::default()
        }
    }

    /// Parse a JSON payload, repairing conflicting add-on groups on the way in.
    pub fn from_json(payload: &str) -> Result<Self, IntakeError> {
        let mut selection: ServiceSelection = serde_json::from_str(payload)?;
        selection.addons = AddonSelectionResolver::normalize(&selection.addons);
        Ok(selection)
    }

    pub fn from_value(payload: serde_json::Value) -> Result<Self, IntakeError> {
        let mut selection: ServiceSelection = serde_json::from_value(payload)?;
        selection.addons = AddonSelectionResolver::normalize(&selection.addons);
        Ok(selection)
    }

    pub fn addons_in(&self, category: AddonCategory) -> impl Iterator<Item = AddonId> + '_ {
        self.addons
            .iter()
            .copied()
            .filter(move |addon| addon.category() == category)
    }
}

/// Parse free-form numeric input, falling back to `default` for anything that is not a
/// positive count.
pub fn parse_count(raw: &str, default: u32) -> u32 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<u32>() {
        return if value == 0 { default } else { value };
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 1.0 && value <= u32::MAX as f64 => {
            value.trunc() as u32
        }
        _ => default,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl RawCount {
    fn into_count(self, default: u32) -> u32 {
        match self {
            RawCount::Unsigned(value) => u32::try_from(value)
                .ok()
                .filter(|count| *count > 0)
                .unwrap_or(default),
            RawCount::Signed(_) => default,
            RawCount::Float(value) => parse_count(&value.to_string(), default),
            RawCount::Text(value) => parse_count(&value, default),
        }
    }
}

fn document_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawCount>::deserialize(deserializer)?;
    Ok(raw.map_or(DEFAULT_DOCUMENTS, |raw| raw.into_count(DEFAULT_DOCUMENTS)))
}

fn session_hour_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawCount>::deserialize(deserializer)?;
    Ok(raw.map_or(DEFAULT_SESSION_HOURS, |raw| {
        raw.into_count(DEFAULT_SESSION_HOURS)
    }))
}

pub(super) fn lenient_identifier<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = UnknownIdentifier>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(%err, "ignoring unrecognized selection value");
                None
            }
        }))
}

pub(super) fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = UnknownIdentifier> + Default,
{
    lenient_identifier(deserializer).map(Option::unwrap_or_default)
}

fn lenient_set<'de, D, T>(deserializer: D) -> Result<BTreeSet<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = UnknownIdentifier> + Ord,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(%err, "dropping unrecognized option");
                None
            }
        })
        .collect())
}
