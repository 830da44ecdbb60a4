mod cli;
mod demo;
mod infra;
mod quote;

use notary_intake::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
