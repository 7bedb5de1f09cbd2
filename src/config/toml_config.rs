use crate::adapters::ip_lookup::DEFAULT_IP_LOOKUP_ENDPOINT;
use crate::core::registry::OfficeRegistry;
use crate::core::resolver::{ContentSettings, LocationResolver};
use crate::core::ConfigProvider;
use crate::domain::model::Office;
use crate::utils::error::{LocatorError, Result};
use crate::utils::validation::{
    validate_email, validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocatorConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub content: ContentSettings,
    /// `None` means the embedded registry.
    pub offices: Option<Vec<Office>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_endpoint")]
    pub ip_lookup_endpoint: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_device_timeout_ms")]
    pub device_timeout_ms: u64,
    pub default_country: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_IP_LOOKUP_ENDPOINT.to_string()
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_device_timeout_ms() -> u64 {
    5000
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            ip_lookup_endpoint: default_endpoint(),
            timeout_seconds: default_timeout_seconds(),
            device_timeout_ms: default_device_timeout_ms(),
            default_country: None,
        }
    }
}

impl LocatorConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LocatorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LocatorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LocatorError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("provider.ip_lookup_endpoint", &self.provider.ip_lookup_endpoint)?;
        validate_positive_number("provider.timeout_seconds", self.provider.timeout_seconds, 1)?;
        validate_positive_number("provider.device_timeout_ms", self.provider.device_timeout_ms, 1)?;
        validate_non_empty_string("content.tagline", &self.content.tagline)?;

        if let Some(offices) = &self.offices {
            for office in offices {
                validate_non_empty_string("offices.city", &office.city)?;
                validate_non_empty_string("offices.phone", &office.phone)?;
                validate_email("offices.email", &office.email)?;
            }
        }

        Ok(())
    }

    /// Build the office registry, checking its invariants.
    pub fn registry(&self) -> Result<OfficeRegistry> {
        match &self.offices {
            Some(offices) => OfficeRegistry::new(offices.clone()),
            None => OfficeRegistry::embedded(),
        }
    }

    pub fn resolver(&self) -> Result<LocationResolver> {
        Ok(LocationResolver::with_content(
            Arc::new(self.registry()?),
            self.content.clone(),
        ))
    }
}

impl ConfigProvider for LocatorConfig {
    fn ip_lookup_endpoint(&self) -> &str {
        &self.provider.ip_lookup_endpoint
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_seconds)
    }

    fn device_timeout(&self) -> Duration {
        Duration::from_millis(self.provider.device_timeout_ms)
    }

    fn default_country(&self) -> Option<&str> {
        self.provider.default_country.as_deref()
    }
}

impl Validate for LocatorConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TWO_OFFICES: &str = r#"
[provider]
ip_lookup_endpoint = "https://geo.example.com/json/"
timeout_seconds = 3
default_country = "India"

[content]
tagline = "Since 1999"

[[offices]]
id = "pune"
city = "Pune"
state = "Maharashtra"
phone = "+91-20-1234567"
email = "pune@rayvaanah.com"
address = "Hinjewadi Phase 1, Pune"
latitude = 18.5204
longitude = 73.8567
projects = ["Pune Metro"]

[[offices]]
id = "kochi"
city = "Kochi"
state = "Kerala"
phone = "+91-484-1234567"
email = "kochi@rayvaanah.com"
address = "Infopark, Kochi"
latitude = 9.9312
longitude = 76.2673
"#;

    #[test]
    fn test_parse_full_config() {
        let config = LocatorConfig::from_toml_str(TWO_OFFICES).unwrap();

        assert_eq!(config.ip_lookup_endpoint(), "https://geo.example.com/json/");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.device_timeout(), Duration::from_millis(5000));
        assert_eq!(config.default_country(), Some("India"));
        assert_eq!(config.content.tagline, "Since 1999");
        assert_eq!(config.content.projects_subtitle, "Infrastructure excellence in your region");

        let registry = config.registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.default_office().id, "pune");
        assert!(registry.get("kochi").unwrap().projects.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LocatorConfig::from_toml_str("").unwrap();
        assert_eq!(config.ip_lookup_endpoint(), DEFAULT_IP_LOOKUP_ENDPOINT);
        assert_eq!(config.registry().unwrap().len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_empty_office_list_is_a_registry_error() {
        let config = LocatorConfig::from_toml_str("offices = []").unwrap();
        assert!(matches!(config.registry(), Err(LocatorError::EmptyRegistry)));
        assert!(config.resolver().is_err());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("OFFICE_LOCATOR_TEST_ENDPOINT", "https://ip.internal/json");

        let config = LocatorConfig::from_toml_str(
            r#"
[provider]
ip_lookup_endpoint = "${OFFICE_LOCATOR_TEST_ENDPOINT}"
"#,
        )
        .unwrap();
        assert_eq!(config.provider.ip_lookup_endpoint, "https://ip.internal/json");

        std::env::remove_var("OFFICE_LOCATOR_TEST_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let config = LocatorConfig::from_toml_str(
            r#"
[provider]
ip_lookup_endpoint = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = LocatorConfig::from_toml_str(
            r#"
[provider]
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_office_email_fails_validation() {
        let broken = TWO_OFFICES.replace("pune@rayvaanah.com", "pune-at-rayvaanah");
        let config = LocatorConfig::from_toml_str(&broken).unwrap();
        assert!(matches!(
            config.validate(),
            Err(LocatorError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_malformed_toml() {
        let result = LocatorConfig::from_toml_str("[provider\ntimeout_seconds = ");
        assert!(matches!(
            result,
            Err(LocatorError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(TWO_OFFICES.as_bytes()).unwrap();

        let config = LocatorConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.registry().unwrap().default_office().city, "Pune");
    }
}
