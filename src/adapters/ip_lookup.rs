use crate::core::{ConfigProvider, GeolocationProvider};
use crate::domain::model::{Coordinate, LocationSource, UserLocation};
use crate::utils::error::{LocatorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_IP_LOOKUP_ENDPOINT: &str = "https://ipapi.co/json/";

/// Response body of an ipapi.co style lookup. Every field may be missing.
#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
    country_code: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<String>,
    postal: Option<String>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

impl From<IpLookupResponse> for UserLocation {
    fn from(body: IpLookupResponse) -> Self {
        UserLocation {
            city: body.city,
            state: body.region,
            country: body.country_name,
            country_code: body.country_code,
            postal: body.postal,
            timezone: body.timezone,
            coordinate: Coordinate::from_parts(body.latitude, body.longitude),
            source: LocationSource::IpLookup,
        }
    }
}

/// Locates the visitor from their public IP through an HTTP lookup service.
pub struct IpLookupProvider {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl IpLookupProvider {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.ip_lookup_endpoint(), config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GeolocationProvider for IpLookupProvider {
    fn name(&self) -> &str {
        "ip-lookup"
    }

    async fn locate(&self) -> Result<UserLocation> {
        tracing::debug!("Making IP lookup request to: {}", self.endpoint);

        let response = self.client.get(&self.endpoint).send().await.map_err(|e| {
            if e.is_timeout() {
                LocatorError::TimeoutError {
                    operation: "IP lookup".to_string(),
                    millis: self.timeout.as_millis() as u64,
                }
            } else {
                LocatorError::ApiError(e)
            }
        })?;

        tracing::debug!("IP lookup response status: {}", response.status());

        if !response.status().is_success() {
            return Err(LocatorError::geolocation(format!(
                "IP lookup returned HTTP {}",
                response.status()
            )));
        }

        let body: IpLookupResponse = response.json().await?;
        if body.error {
            return Err(LocatorError::geolocation(format!(
                "IP lookup refused: {}",
                body.reason.as_deref().unwrap_or("no reason given")
            )));
        }

        Ok(body.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_maps_lookup_fields() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/json/");
            then.status(200).json_body(serde_json::json!({
                "ip": "203.0.113.7",
                "city": "Pune",
                "region": "Maharashtra",
                "country_name": "India",
                "country_code": "IN",
                "latitude": 18.5204,
                "longitude": 73.8567,
                "timezone": "Asia/Kolkata",
                "postal": "411001"
            }));
        });

        let provider = IpLookupProvider::new(server.url("/json/"), Duration::from_secs(5)).unwrap();
        let location = provider.locate().await.unwrap();

        mock.assert();
        assert_eq!(location.city.as_deref(), Some("Pune"));
        assert_eq!(location.state.as_deref(), Some("Maharashtra"));
        assert_eq!(location.country_code.as_deref(), Some("IN"));
        assert_eq!(location.postal.as_deref(), Some("411001"));
        assert_eq!(location.coordinate, Some(Coordinate::new(18.5204, 73.8567)));
        assert_eq!(location.source, LocationSource::IpLookup);
    }

    #[tokio::test]
    async fn test_missing_coordinates_are_not_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/json/");
            then.status(200)
                .json_body(serde_json::json!({ "city": "Nagpur", "latitude": null }));
        });

        let provider = IpLookupProvider::new(server.url("/json/"), Duration::from_secs(5)).unwrap();
        let location = provider.locate().await.unwrap();
        assert_eq!(location.city.as_deref(), Some("Nagpur"));
        assert!(location.coordinate.is_none());
    }

    #[tokio::test]
    async fn test_error_body_is_a_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/json/");
            then.status(200)
                .json_body(serde_json::json!({ "error": true, "reason": "RateLimited" }));
        });

        let provider = IpLookupProvider::new(server.url("/json/"), Duration::from_secs(5)).unwrap();
        match provider.locate().await {
            Err(LocatorError::GeolocationError { message }) => {
                assert!(message.contains("RateLimited"))
            }
            other => panic!("expected geolocation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_a_failure() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/json/");
            then.status(503);
        });

        let provider = IpLookupProvider::new(server.url("/json/"), Duration::from_secs(5)).unwrap();
        let result = provider.locate().await;

        mock.assert();
        assert!(matches!(result, Err(LocatorError::GeolocationError { .. })));
    }
}
