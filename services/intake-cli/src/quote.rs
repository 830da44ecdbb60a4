use std::fs;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use notary_intake::config::AppConfig;
use notary_intake::error::AppError;
use notary_intake::workflows::intake::presenter::{
    format_money, render_quote, render_rejection, render_visibility,
};
use notary_intake::workflows::intake::{
    AddonId, ApostilleRegion, BookingOption, Delivery, FieldChange, FormStateController,
    LocationType, Quote, QuoteEngine, RateKey, ServiceSelection, ServiceType, TransitionRejected,
    Urgency,
};
use serde::Serialize;

use crate::infra::load_catalog;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug, Default)]
pub(crate) struct QuoteArgs {
    /// Service type, e.g. apostille, power_of_attorney, remote_deposition
    #[arg(long)]
    pub(crate) service: Option<ServiceType>,
    /// Apostille issuing region (nj, ny, pa, de, ct, federal)
    #[arg(long)]
    pub(crate) region: Option<ApostilleRegion>,
    /// Signing location (office, mobile, hospital)
    #[arg(long)]
    pub(crate) location: Option<LocationType>,
    /// Number of documents; unusable values fall back to 1
    #[arg(long)]
    pub(crate) documents: Option<String>,
    /// Remote session hours; unusable values fall back to 4
    #[arg(long)]
    pub(crate) hours: Option<String>,
    #[arg(long)]
    pub(crate) urgency: Option<Urgency>,
    #[arg(long)]
    pub(crate) delivery: Option<Delivery>,
    /// Add-on to select (repeatable); later picks replace conflicting earlier ones
    #[arg(long = "addon")]
    pub(crate) addons: Vec<AddonId>,
    /// Booking/timing option to select (repeatable)
    #[arg(long = "booking")]
    pub(crate) booking: Vec<BookingOption>,
    /// Start from a JSON selection payload; flags are applied on top
    #[arg(long)]
    pub(crate) json: Option<PathBuf>,
    /// CSV rate sheet overriding the standard catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// CSV rate sheet overriding the standard catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Serialize)]
struct QuoteReport<'a> {
    selection: &'a ServiceSelection,
    quote: &'a Quote,
    missing_fields: Vec<&'static str>,
}

#[derive(Serialize)]
struct RateRow {
    category: &'static str,
    key: &'static str,
    rate: String,
}

pub(crate) fn run_quote(args: QuoteArgs, config: &AppConfig) -> Result<(), AppError> {
    let engine = QuoteEngine::new(load_catalog(args.catalog.as_ref(), config)?);
    let initial = match &args.json {
        Some(path) => ServiceSelection::from_json(&fs::read_to_string(path)?)?,
        None => ServiceSelection::default(),
    };
    let format = args.format;

    let form = field_changes(args).into_iter().fold(
        FormStateController::with_selection(engine, config.intake.layout(), initial),
        |form, change| form.apply(change).form,
    );
    let quote = form.quote();
    let missing = form.missing_fields();

    match format {
        OutputFormat::Json => {
            let report = QuoteReport {
                selection: form.selection(),
                quote: &quote,
                missing_fields: missing.iter().map(|group| group.as_str()).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            print!("{}", render_quote(&quote));
            if form.selection().service_type.is_some() {
                println!("\nForm fields (* required)");
                print!("{}", render_visibility(form.visibility()));
            }
            if !missing.is_empty() {
                println!(
                    "\n{}",
                    render_rejection(&TransitionRejected::MissingFields(missing))
                );
            }
        }
    }

    Ok(())
}

/// Flags become the same field events a form front-end would emit, so add-on conflicts
/// resolve exactly as they do interactively.
fn field_changes(args: QuoteArgs) -> Vec<FieldChange> {
    let QuoteArgs {
        service,
        region,
        location,
        documents,
        hours,
        urgency,
        delivery,
        addons,
        booking,
        ..
    } = args;

    let mut changes = Vec::new();
    if service.is_some() {
        changes.push(FieldChange::ServiceType(service));
    }
    if region.is_some() {
        changes.push(FieldChange::Region(region));
    }
    if location.is_some() {
        changes.push(FieldChange::LocationType(location));
    }
    changes.extend(documents.map(FieldChange::NumDocuments));
    changes.extend(hours.map(FieldChange::SessionHours));
    changes.extend(urgency.map(FieldChange::Urgency));
    changes.extend(delivery.map(FieldChange::Delivery));
    changes.extend(addons.into_iter().map(|addon| FieldChange::Addon {
        addon,
        selected: true,
    }));
    changes.extend(booking.into_iter().map(|option| FieldChange::Booking {
        option,
        selected: true,
    }));
    changes
}

pub(crate) fn run_catalog(args: CatalogArgs, config: &AppConfig) -> Result<(), AppError> {
    let catalog = load_catalog(args.catalog.as_ref(), config)?;
    match args.format {
        OutputFormat::Json => {
            let rows: Vec<RateRow> = catalog
                .entries()
                .map(|(key, rate)| RateRow {
                    category: key.category(),
                    key: key.key(),
                    rate: rate.to_string(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Text => {
            println!("{:<20} {:<24} {:>10}", "category", "key", "rate");
            for (key, rate) in catalog.entries() {
                let shown = match key {
                    RateKey::RemoteIncludedHours | RateKey::AdditionalDocDiscount => {
                        rate.normalize().to_string()
                    }
                    _ => format_money(rate),
                };
                println!("{:<20} {:<24} {:>10}", key.category(), key.key(), shown);
            }
        }
    }

    Ok(())
}
