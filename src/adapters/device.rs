use crate::core::{ConfigProvider, GeolocationProvider};
use crate::domain::model::{Coordinate, LocationSource, UserLocation};
use crate::utils::error::{LocatorError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;

pub const DEFAULT_DEVICE_TIMEOUT: Duration = Duration::from_millis(5000);

enum PositionSource {
    Unsupported,
    Fixed(Coordinate),
    Reported(watch::Receiver<Option<Coordinate>>),
}

/// Lets the host hand over a device position once the user grants access.
#[derive(Debug)]
pub struct PositionReporter {
    sender: watch::Sender<Option<Coordinate>>,
}

impl PositionReporter {
    pub fn report(&self, coordinate: Coordinate) {
        self.sender.send_replace(Some(coordinate));
    }
}

/// Position reported by the device itself.
///
/// No reverse geocoding happens here, so city and state stay unknown.
pub struct DevicePositionProvider {
    source: PositionSource,
    timeout: Duration,
    default_country: Option<String>,
}

impl DevicePositionProvider {
    fn with_source(source: PositionSource) -> Self {
        Self {
            source,
            timeout: DEFAULT_DEVICE_TIMEOUT,
            default_country: None,
        }
    }

    pub fn unsupported() -> Self {
        Self::with_source(PositionSource::Unsupported)
    }

    pub fn fixed(coordinate: Coordinate) -> Self {
        Self::with_source(PositionSource::Fixed(coordinate))
    }

    /// Provider whose position arrives later through the returned reporter.
    pub fn reported() -> (Self, PositionReporter) {
        let (sender, receiver) = watch::channel(None);
        (
            Self::with_source(PositionSource::Reported(receiver)),
            PositionReporter { sender },
        )
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_country(mut self, country: Option<String>) -> Self {
        self.default_country = country;
        self
    }

    pub fn configured<C: ConfigProvider>(self, config: &C) -> Self {
        self.with_timeout(config.device_timeout())
            .with_default_country(config.default_country().map(str::to_string))
    }

    fn location(&self, coordinate: Coordinate) -> Result<UserLocation> {
        if !coordinate.latitude.is_finite() || !coordinate.longitude.is_finite() {
            return Err(LocatorError::geolocation("device reported a non-finite position"));
        }

        let mut location = UserLocation::from_coordinate(coordinate, LocationSource::Device);
        location.country = self.default_country.clone();
        Ok(location)
    }
}

#[async_trait]
impl GeolocationProvider for DevicePositionProvider {
    fn name(&self) -> &str {
        "device"
    }

    async fn locate(&self) -> Result<UserLocation> {
        match &self.source {
            PositionSource::Unsupported => Err(LocatorError::geolocation(
                "device geolocation not supported",
            )),
            PositionSource::Fixed(coordinate) => self.location(*coordinate),
            PositionSource::Reported(receiver) => {
                let mut receiver = receiver.clone();
                let waited =
                    tokio::time::timeout(self.timeout, receiver.wait_for(Option::is_some)).await;

                let coordinate = match waited {
                    Err(_) => {
                        return Err(LocatorError::TimeoutError {
                            operation: "Device geolocation".to_string(),
                            millis: self.timeout.as_millis() as u64,
                        })
                    }
                    Ok(Err(_)) => {
                        return Err(LocatorError::geolocation(
                            "device position source closed without a fix",
                        ))
                    }
                    Ok(Ok(position)) => *position,
                };

                match coordinate {
                    Some(coordinate) => self.location(coordinate),
                    None => Err(LocatorError::geolocation("device reported no position")),
                }
            }
        }
    }
}
