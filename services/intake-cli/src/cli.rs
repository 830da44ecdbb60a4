use crate::demo::{run_demo, DemoArgs};
use crate::quote::{run_catalog, run_quote, CatalogArgs, QuoteArgs};
use clap::{Parser, Subcommand};
use notary_intake::config::AppConfig;
use notary_intake::error::AppError;
use notary_intake::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "Notary Intake",
    about = "Price notary, apostille, and remote deposition requests from the command line",
    version
)]
struct Cli {
    /// Log intake decisions (add-on resolution, step transitions) at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print an itemized quote for a single selection
    Quote(QuoteArgs),
    /// Print the effective rate table
    Catalog(CatalogArgs),
    /// Walk a scripted intake session through review, submission, and handoff
    Demo(DemoArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, cli.verbose)?;
    tracing::debug!(environment = ?config.environment, "configuration loaded");

    match cli.command {
        Command::Quote(args) => run_quote(args, &config),
        Command::Catalog(args) => run_catalog(args, &config),
        Command::Demo(args) => run_demo(args, &config),
    }
}
