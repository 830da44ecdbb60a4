use std::sync::Arc;

use chrono::SecondsFormat;
use clap::Args;
use notary_intake::config::AppConfig;
use notary_intake::error::AppError;
use notary_intake::workflows::intake::presenter::{
    format_money, render_quote, render_rejection, render_visibility,
};
use notary_intake::workflows::intake::{
    AddonId, ApostilleRegion, BookingOption, FieldChange, FormStateController, IntakeHandoff,
    QuoteEngine, ServiceType,
};

use crate::infra::{load_catalog, InMemoryCaseStore, InMemoryNotifications};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the remote deposition walkthrough.
    #[arg(long)]
    pub(crate) skip_remote: bool,
}

pub(crate) fn run_demo(args: DemoArgs, config: &AppConfig) -> Result<(), AppError> {
    let engine = QuoteEngine::new(load_catalog(None, config)?);
    let cases = Arc::new(InMemoryCaseStore::default());
    let notifications = Arc::new(InMemoryNotifications::default());
    let handoff = IntakeHandoff::new(cases, notifications.clone());

    println!("Notary intake demo");
    let form = FormStateController::new(engine.clone(), config.intake.layout());
    println!("\nStep 1: choose a service");
    let update = form.apply(FieldChange::ServiceType(Some(ServiceType::Apostille)));
    print!("{}", render_visibility(update.form.visibility()));

    let form = update.form;
    match form.advance(2) {
        Ok(_) => println!("Unexpectedly advanced without an issuing region"),
        Err(rejection) => println!("Continue pressed: {}", render_rejection(&rejection)),
    }

    let update = form
        .apply(FieldChange::Region(Some(ApostilleRegion::Nj)))
        .form
        .apply(FieldChange::NumDocuments("3".to_string()));
    println!("\nStep 2: details (running total {})", format_money(update.quote.total));

    let review = update.form.advance(2)?.form.advance(3)?;
    println!("\nStep 3: review");
    if let Some(quote) = &review.review_quote {
        print!("{}", render_quote(quote));
    }

    let mut form = review.form;
    let final_step = form.layout().final_step();
    if form.current_step() < final_step {
        form = form.advance(final_step)?.form;
    }
    let receipt = handoff.submit(form.submit()?)?;
    println!(
        "\nSubmitted as {} at {}",
        receipt.case_id.0,
        receipt
            .received_at
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    if !args.skip_remote {
        println!("\nRemote deposition walkthrough");
        let update = [
            FieldChange::ServiceType(Some(ServiceType::RemoteDeposition)),
            FieldChange::SessionHours("6".to_string()),
            FieldChange::Addon {
                addon: AddonId::Audio,
                selected: true,
            },
            FieldChange::Addon {
                addon: AddonId::Timestamp,
                selected: true,
            },
            // replaces audio and bundles the timestamp
            FieldChange::Addon {
                addon: AddonId::AudioVideo,
                selected: true,
            },
            FieldChange::Booking {
                option: BookingOption::RushBooking,
                selected: true,
            },
        ]
        .into_iter()
        .fold(
            FormStateController::new(engine, config.intake.layout()).apply(FieldChange::Reset),
            |update, change| update.form.apply(change),
        );
        print!("{}", render_quote(&update.quote));
    }

    println!("\nNotifications queued: {}", notifications.events().len());
    for notice in notifications.events() {
        let summary: Vec<String> = notice
            .details
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        println!(
            "  - {} for {} ({})",
            notice.template,
            notice.case_id.0,
            summary.join(", ")
        );
    }

    Ok(())
}
