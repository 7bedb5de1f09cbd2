use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Office registry is empty")]
    EmptyRegistry,

    #[error("Duplicate office id: {id}")]
    DuplicateOfficeId { id: String },

    #[error("Office '{id}' has an invalid coordinate ({latitude}, {longitude})")]
    InvalidOfficeCoordinate {
        id: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("Geolocation unavailable: {message}")]
    GeolocationError { message: String },

    #[error("{operation} timed out after {millis} ms")]
    TimeoutError { operation: String, millis: u64 },

    #[error("Session already produced its result")]
    SessionFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Registry,
    Network,
    Geolocation,
    Session,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LocatorError {
    pub fn geolocation(message: impl Into<String>) -> Self {
        LocatorError::GeolocationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LocatorError::ConfigError { .. }
            | LocatorError::ConfigValidationError { .. }
            | LocatorError::InvalidConfigValueError { .. }
            | LocatorError::MissingConfigError { .. } => ErrorCategory::Configuration,
            LocatorError::EmptyRegistry
            | LocatorError::DuplicateOfficeId { .. }
            | LocatorError::InvalidOfficeCoordinate { .. } => ErrorCategory::Registry,
            LocatorError::ApiError(_) | LocatorError::TimeoutError { .. } => {
                ErrorCategory::Network
            }
            LocatorError::GeolocationError { .. } => ErrorCategory::Geolocation,
            LocatorError::SessionFinished => ErrorCategory::Session,
            LocatorError::IoError(_) | LocatorError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Geolocation => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Session => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Registry => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the configuration file syntax and field values"
            }
            ErrorCategory::Registry => {
                "Make sure [[offices]] lists at least one office with a unique id and a valid coordinate"
            }
            ErrorCategory::Network => {
                "Check network connectivity and the ip_lookup_endpoint setting, or run with --offline"
            }
            ErrorCategory::Geolocation => {
                "Pass --lat/--lng explicitly; the default office is used meanwhile"
            }
            ErrorCategory::Session => "Start a new session for each page view",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LocatorError::EmptyRegistry => {
                "No offices are configured, nothing to resolve against".to_string()
            }
            LocatorError::DuplicateOfficeId { id } => {
                format!("Office id '{}' is listed more than once", id)
            }
            LocatorError::InvalidOfficeCoordinate { id, .. } => {
                format!("Office '{}' has a coordinate outside the valid range", id)
            }
            LocatorError::ApiError(_) => "Could not reach the location service".to_string(),
            LocatorError::TimeoutError { operation, .. } => {
                format!("{} took too long", operation)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LocatorError>;
