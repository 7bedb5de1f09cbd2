pub mod distance;
pub mod registry;
pub mod resolver;
pub mod session;

pub use crate::domain::model::{NearestOffice, Office, PersonalizationResult, UserLocation};
pub use crate::domain::ports::{ConfigProvider, GeolocationProvider};
pub use crate::utils::error::Result;
