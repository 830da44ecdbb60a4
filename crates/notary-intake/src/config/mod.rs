use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::workflows::intake::form::{FormLayout, MIN_FORM_STEPS};

const MAX_FORM_STEPS: u8 = 10;

/// Deployment stage, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Settings shared by the intake library and its command-line front end.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub intake: IntakeConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let raw_steps = env::var("INTAKE_FORM_STEPS").unwrap_or_else(|_| "3".to_string());
        let form_steps = raw_steps
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|steps| (MIN_FORM_STEPS..=MAX_FORM_STEPS).contains(steps))
            .ok_or(ConfigError::InvalidFormSteps { value: raw_steps })?;

        let catalog_path = env::var("INTAKE_CATALOG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            intake: IntakeConfig {
                form_steps,
                catalog_path,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Form layout and pricing sources.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub form_steps: u8,
    pub catalog_path: Option<PathBuf>,
}

impl IntakeConfig {
    pub fn layout(&self) -> FormLayout {
        FormLayout::with_steps(self.form_steps)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidFormSteps { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFormSteps { value } => write!(
                f,
                "INTAKE_FORM_STEPS must be between {} and {} (found '{}')",
                MIN_FORM_STEPS, MAX_FORM_STEPS, value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
