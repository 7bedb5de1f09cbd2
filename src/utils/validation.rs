use crate::utils::error::{LocatorError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> LocatorError {
    LocatorError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Accepts absolute http(s) URLs only.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;

    if matches!(url.scheme(), "http" | "https") {
        Ok(())
    } else {
        Err(invalid(
            field_name,
            url_str,
            format!("Expected http or https, got {}", url.scheme()),
        ))
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    (value >= min_value)
        .then_some(())
        .ok_or_else(|| invalid(field_name, value, format!("Must be {} or more", min_value)))
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| LocatorError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Must contain non-whitespace text"));
    }
    Ok(())
}

pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    let well_formed = value
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.contains('@'))
        .unwrap_or(false);

    if !well_formed {
        return Err(invalid(
            field_name,
            value,
            "Expected an address of the form name@domain.tld",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN fails both comparisons, so check containment positively
    if !(value >= min && value <= max) {
        return Err(invalid(
            field_name,
            value,
            format!("Must lie within [{}, {}]", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("ip_lookup_endpoint", "https://ipapi.co/json/").is_ok());
        assert!(validate_url("ip_lookup_endpoint", "http://localhost:8080/json").is_ok());
        assert!(validate_url("ip_lookup_endpoint", "").is_err());
        assert!(validate_url("ip_lookup_endpoint", "invalid-url").is_err());
        assert!(validate_url("ip_lookup_endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("timeout_seconds", 5, 1).is_ok());
        assert!(validate_positive_number("timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range_rejects_nan() {
        assert!(validate_range("latitude", 19.07, -90.0, 90.0).is_ok());
        assert!(validate_range("latitude", 91.0, -90.0, 90.0).is_err());
        assert!(validate_range("latitude", f64::NAN, -90.0, 90.0).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "mumbai@rayvaanah.com").is_ok());
        assert!(validate_email("email", "mumbai.rayvaanah.com").is_err());
        assert!(validate_email("email", "@rayvaanah.com").is_err());
        assert!(validate_email("email", "a@b@c.com").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(72.8777);
        let missing: Option<f64> = None;
        assert!(validate_required_field("lng", &present).is_ok());
        assert!(matches!(
            validate_required_field("lng", &missing),
            Err(LocatorError::MissingConfigError { .. })
        ));
    }
}
