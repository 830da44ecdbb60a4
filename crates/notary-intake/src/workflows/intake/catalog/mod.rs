mod loader;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::domain::{
    AddonCategory, AddonId, ApostilleRegion, BookingOption, Delivery, LocationType, ServiceType,
    Urgency,
};

/// Errors raised while loading a rate sheet override.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read rate sheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rate sheet CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: unknown rate '{category}/{key}'")]
    UnknownRate {
        line: u64,
        category: String,
        key: String,
    },
    #[error("line {line}: rate '{value}' is not a decimal between 0 and its ceiling")]
    InvalidRate { line: u64, value: String },
}

/// Largest money amount a single rate may carry.
pub const MAX_RATE: Decimal = dec!(1000000);

/// Address of a single price component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RateKey {
    Apostille(ApostilleRegion),
    AdditionalDocDiscount,
    NotaryBase(ServiceType),
    NotaryPerDoc(ServiceType),
    Location(LocationType),
    Urgency(Urgency),
    Delivery(Delivery),
    RemoteBase,
    RemoteIncludedHours,
    RemoteOveragePerHour,
    Addon(AddonId),
    Booking(BookingOption),
    ReporterCoordination,
}

impl RateKey {
    /// Upper bound for this rate; the discount is a fraction, everything else is money.
    pub fn ceiling(self) -> Decimal {
        match self {
            RateKey::AdditionalDocDiscount => Decimal::ONE,
            _ => MAX_RATE,
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            RateKey::Apostille(_) | RateKey::AdditionalDocDiscount => "apostille",
            RateKey::NotaryBase(service) | RateKey::NotaryPerDoc(service) => service.as_str(),
            RateKey::Location(_) => "location",
            RateKey::Urgency(_) => "urgency",
            RateKey::Delivery(_) => "delivery",
            RateKey::RemoteBase | RateKey::RemoteIncludedHours | RateKey::RemoteOveragePerHour => {
                "remote"
            }
            RateKey::Addon(addon) => match addon.category() {
                AddonCategory::Recording | AddonCategory::RecordingDelivery => "recording",
                AddonCategory::Complexity => "complexity",
            },
            RateKey::Booking(_) => "booking",
            RateKey::ReporterCoordination => "certified_reporter",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            RateKey::Apostille(region) => region.as_str(),
            RateKey::AdditionalDocDiscount => "additional_doc_discount",
            RateKey::NotaryBase(_) | RateKey::RemoteBase => "base",
            RateKey::NotaryPerDoc(_) => "per_doc",
            RateKey::Location(location) => location.as_str(),
            RateKey::Urgency(urgency) => urgency.as_str(),
            RateKey::Delivery(delivery) => delivery.as_str(),
            RateKey::RemoteIncludedHours => "included_hours",
            RateKey::RemoteOveragePerHour => "overage_per_hour",
            RateKey::Addon(addon) => addon.as_str(),
            RateKey::Booking(option) => option.as_str(),
            RateKey::ReporterCoordination => "coordination",
        }
    }

    /// Resolve a `(category, key)` pair as written in a rate sheet.
    pub fn parse(category: &str, key: &str) -> Option<RateKey> {
        let category = category.trim().to_ascii_lowercase();
        let key = key.trim().to_ascii_lowercase();

        match category.as_str() {
            "apostille" if key == "additional_doc_discount" => {
                Some(RateKey::AdditionalDocDiscount)
            }
            "apostille" => key.parse().ok().map(RateKey::Apostille),
            "location" => key.parse().ok().map(RateKey::Location),
            "urgency" => key.parse().ok().map(RateKey::Urgency),
            "delivery" => key.parse().ok().map(RateKey::Delivery),
            "remote" => match key.as_str() {
                "base" => Some(RateKey::RemoteBase),
                "included_hours" => Some(RateKey::RemoteIncludedHours),
                "overage_per_hour" => Some(RateKey::RemoteOveragePerHour),
                _ => None,
            },
            "recording" => key
                .parse::<AddonId>()
                .ok()
                .filter(|addon| addon.is_recording())
                .map(RateKey::Addon),
            "complexity" => key
                .parse::<AddonId>()
                .ok()
                .filter(|addon| addon.category() == AddonCategory::Complexity)
                .map(RateKey::Addon),
            "booking" => key.parse().ok().map(RateKey::Booking),
            "certified_reporter" if key == "coordination" => Some(RateKey::ReporterCoordination),
            other => {
                let service = other.parse::<ServiceType>().ok()?;
                if !service.is_notarization() {
                    return None;
                }
                match key.as_str() {
                    "base" => Some(RateKey::NotaryBase(service)),
                    "per_doc" => Some(RateKey::NotaryPerDoc(service)),
                    _ => None,
                }
            }
        }
    }
}

/// Immutable rate table backing every quote. Lookups of absent keys price at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingCatalog {
    rates: BTreeMap<RateKey, Decimal>,
}

impl Default for PricingCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl PricingCatalog {
    /// Published rates for the intake site.
    pub fn standard() -> Self {
        let mut rates = BTreeMap::new();

        for (region, rate) in [
            (ApostilleRegion::Nj, dec!(447)),
            (ApostilleRegion::Ny, dec!(475)),
            (ApostilleRegion::Pa, dec!(425)),
            (ApostilleRegion::De, dec!(395)),
            (ApostilleRegion::Ct, dec!(450)),
            (ApostilleRegion::Federal, dec!(595)),
        ] {
            rates.insert(RateKey::Apostille(region), rate);
        }
        rates.insert(RateKey::AdditionalDocDiscount, dec!(0.15));

        for (service, base, per_doc) in [
            (ServiceType::PowerOfAttorney, dec!(115), dec!(35)),
            (ServiceType::Trust, dec!(175), dec!(45)),
            (ServiceType::LoanSigning, dec!(150), dec!(25)),
            (ServiceType::Hospital, dec!(195), dec!(35)),
        ] {
            rates.insert(RateKey::NotaryBase(service), base);
            rates.insert(RateKey::NotaryPerDoc(service), per_doc);
        }

        rates.insert(RateKey::Location(LocationType::Office), Decimal::ZERO);
        rates.insert(RateKey::Location(LocationType::Mobile), dec!(25));
        rates.insert(RateKey::Location(LocationType::Hospital), dec!(75));

        rates.insert(RateKey::Urgency(Urgency::Standard), Decimal::ZERO);
        rates.insert(RateKey::Urgency(Urgency::Expedited), dec!(75));
        rates.insert(RateKey::Urgency(Urgency::Rush), dec!(150));

        rates.insert(RateKey::Delivery(Delivery::Pickup), Decimal::ZERO);
        rates.insert(RateKey::Delivery(Delivery::StandardMail), dec!(15));
        rates.insert(RateKey::Delivery(Delivery::Express), dec!(45));
        rates.insert(RateKey::Delivery(Delivery::International), dec!(95));

        rates.insert(RateKey::RemoteBase, dec!(649));
        rates.insert(RateKey::RemoteIncludedHours, dec!(4));
        rates.insert(RateKey::RemoteOveragePerHour, dec!(150));

        for (addon, rate) in [
            (AddonId::Audio, dec!(99)),
            (AddonId::AudioVideo, dec!(199)),
            (AddonId::Timestamp, dec!(49)),
            (AddonId::SameDayDelivery, dec!(175)),
            (AddonId::NextDayDelivery, dec!(95)),
            (AddonId::ArchiveMonthly, dec!(25)),
            (AddonId::ArchiveYearly, dec!(199)),
            (AddonId::MultiParty, dec!(75)),
            (AddonId::ExhibitManagement, dec!(50)),
            (AddonId::InterpreterCoordination, dec!(100)),
            (AddonId::TechnicalTestimony, dec!(125)),
        ] {
            rates.insert(RateKey::Addon(addon), rate);
        }

        for (option, rate) in [
            (BookingOption::RushBooking, dec!(125)),
            (BookingOption::SameDayBooking, dec!(225)),
            (BookingOption::AfterHours, dec!(95)),
            (BookingOption::Weekend, dec!(150)),
        ] {
            rates.insert(RateKey::Booking(option), rate);
        }

        rates.insert(RateKey::ReporterCoordination, dec!(95));

        Self { rates }
    }

    /// A catalog with no rates at all; every lookup prices at zero.
    pub fn empty() -> Self {
        Self {
            rates: BTreeMap::new(),
        }
    }

    /// Standard rates with a CSV rate sheet (`category,key,rate`) applied on top.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let overrides = loader::parse_rate_sheet(reader)?;
        Ok(Self::standard().with_overrides(overrides))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (RateKey, Decimal)>,
    {
        self.rates.extend(overrides);
        self
    }

    /// Rate for `key`, clamped to `0..=key.ceiling()`.
    pub fn rate(&self, key: RateKey) -> Decimal {
        self.rates
            .get(&key)
            .map_or(Decimal::ZERO, |rate| (*rate).clamp(Decimal::ZERO, key.ceiling()))
    }

    pub fn entries(&self) -> impl Iterator<Item = (RateKey, Decimal)> + '_ {
        self.rates.iter().map(|(key, rate)| (*key, *rate))
    }

    pub fn apostille(&self, region: Option<ApostilleRegion>) -> Decimal {
        region
            .map(|region| self.rate(RateKey::Apostille(region)))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn additional_doc_discount(&self) -> Decimal {
        self.rate(RateKey::AdditionalDocDiscount)
    }

    pub fn notary_base(&self, service: ServiceType) -> Decimal {
        self.rate(RateKey::NotaryBase(service))
    }

    pub fn notary_per_doc(&self, service: ServiceType) -> Decimal {
        self.rate(RateKey::NotaryPerDoc(service))
    }

    pub fn location(&self, location: LocationType) -> Decimal {
        self.rate(RateKey::Location(location))
    }

    pub fn urgency(&self, urgency: Urgency) -> Decimal {
        self.rate(RateKey::Urgency(urgency))
    }

    pub fn delivery(&self, delivery: Delivery) -> Decimal {
        self.rate(RateKey::Delivery(delivery))
    }

    pub fn remote_base(&self) -> Decimal {
        self.rate(RateKey::RemoteBase)
    }

    /// Session hours covered by the remote base price.
    pub fn remote_included_hours(&self) -> u32 {
        self.rate(RateKey::RemoteIncludedHours)
            .trunc()
            .to_u32()
            .unwrap_or(0)
    }

    pub fn remote_overage_per_hour(&self) -> Decimal {
        self.rate(RateKey::RemoteOveragePerHour)
    }

    pub fn addon(&self, addon: AddonId) -> Decimal {
        self.rate(RateKey::Addon(addon))
    }

    pub fn booking(&self, option: BookingOption) -> Decimal {
        self.rate(RateKey::Booking(option))
    }

    pub fn reporter_coordination(&self) -> Decimal {
        self.rate(RateKey::ReporterCoordination)
    }
}
