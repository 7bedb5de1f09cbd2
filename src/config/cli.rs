use crate::domain::model::Coordinate;
use crate::utils::error::{LocatorError, Result};
use crate::utils::validation::{validate_range, validate_required_field, Validate};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "office-locator")]
#[command(about = "Resolve the nearest office and the content to personalize for it")]
pub struct CliConfig {
    /// Path to TOML configuration file (embedded office list when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Visitor latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Visitor longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Skip the IP lookup
    #[arg(long)]
    pub offline: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Print the configured offices and exit
    #[arg(long)]
    pub list_offices: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl CliConfig {
    /// Coordinate given on the command line, if any.
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.lat, self.lng)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match (self.lat, self.lng) {
            (None, None) => Ok(()),
            (Some(lat), lng) => {
                let lng = *validate_required_field("lng", &lng)?;
                validate_range("lat", lat, -90.0, 90.0)?;
                validate_range("lng", lng, -180.0, 180.0)
            }
            (None, Some(_)) => Err(LocatorError::MissingConfigError {
                field: "lat".to_string(),
            }),
        }
    }
}
