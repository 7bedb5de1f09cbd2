use crate::domain::model::UserLocation;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn ip_lookup_endpoint(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn device_timeout(&self) -> Duration;
    fn default_country(&self) -> Option<&str>;
}

/// Upstream source of the visitor's location.
///
/// Any failure (network error, permission denial, timeout) comes back as an
/// `Err`; callers treat it as "no coordinate".
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn locate(&self) -> Result<UserLocation>;
}
