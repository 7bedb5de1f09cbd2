pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, OutputFormat};
pub use config::LocatorConfig;

pub use adapters::{DevicePositionProvider, FallbackChain, IpLookupProvider};
pub use crate::core::{
    registry::OfficeRegistry,
    resolver::{ContentSettings, LocationResolver},
    session::{PageSession, SessionOutcome, TeardownHandle},
};
pub use domain::model::{Coordinate, NearestOffice, Office, PersonalizationResult, UserLocation};
pub use domain::ports::GeolocationProvider;
pub use utils::error::{LocatorError, Result};
