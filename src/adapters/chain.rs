use crate::core::GeolocationProvider;
use crate::domain::model::UserLocation;
use crate::utils::error::{LocatorError, Result};
use async_trait::async_trait;

/// Tries each provider in turn and returns the first location found.
pub struct FallbackChain {
    providers: Vec<Box<dyn GeolocationProvider>>,
}

impl FallbackChain {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn then(mut self, provider: impl GeolocationProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for FallbackChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeolocationProvider for FallbackChain {
    fn name(&self) -> &str {
        "fallback-chain"
    }

    async fn locate(&self) -> Result<UserLocation> {
        let mut last_error = None;

        for provider in &self.providers {
            match provider.locate().await {
                Ok(location) => {
                    tracing::debug!("Location provided by {}", provider.name());
                    return Ok(location);
                }
                Err(e) => {
                    tracing::warn!("{} failed: {}", provider.name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| LocatorError::geolocation("no geolocation providers configured")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::device::DevicePositionProvider;
    use crate::domain::model::{Coordinate, LocationSource};

    #[tokio::test]
    async fn test_falls_through_to_next_provider() {
        let chain = FallbackChain::new()
            .then(DevicePositionProvider::unsupported())
            .then(DevicePositionProvider::fixed(Coordinate::new(28.61, 77.21)));

        let location = chain.locate().await.unwrap();
        assert_eq!(location.source, LocationSource::Device);
        assert_eq!(location.coordinate, Some(Coordinate::new(28.61, 77.21)));
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let chain = FallbackChain::new()
            .then(DevicePositionProvider::fixed(Coordinate::new(19.07, 72.87)))
            .then(DevicePositionProvider::fixed(Coordinate::new(28.61, 77.21)));

        let location = chain.locate().await.unwrap();
        assert_eq!(location.coordinate, Some(Coordinate::new(19.07, 72.87)));
    }

    #[tokio::test]
    async fn test_empty_chain_fails() {
        let chain = FallbackChain::default();
        assert!(chain.is_empty());
        tokio_test::assert_err!(chain.locate().await);
    }

    #[tokio::test]
    async fn test_all_failing_returns_last_error() {
        let chain = FallbackChain::new()
            .then(DevicePositionProvider::unsupported())
            .then(DevicePositionProvider::unsupported());
        assert_eq!(chain.len(), 2);

        match chain.locate().await {
            Err(LocatorError::GeolocationError { message }) => {
                assert!(message.contains("not supported"))
            }
            other => panic!("expected geolocation error, got {:?}", other),
        }
    }
}
