use thiserror::Error;

#[derive(Error, Debug)]
pub enum SherpaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Partner valuation API returned {status}: {message}")]
    PartnerError { status: u16, message: String },

    #[error("{what} not found: {id}")]
    NotFoundError { what: String, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    Storage,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SherpaError {
    pub fn validation(message: impl Into<String>) -> Self {
        SherpaError::ValidationError {
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>, id: impl Into<String>) -> Self {
        SherpaError::NotFoundError {
            what: what.into(),
            id: id.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SherpaError::ConfigError { .. }
            | SherpaError::ConfigValidationError { .. }
            | SherpaError::InvalidConfigValueError { .. }
            | SherpaError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SherpaError::ApiError(_) | SherpaError::PartnerError { .. } => ErrorCategory::Network,
            SherpaError::CsvError(_) | SherpaError::SerializationError(_) => ErrorCategory::Data,
            SherpaError::IoError(_) => ErrorCategory::Storage,
            SherpaError::ValidationError { .. } | SherpaError::NotFoundError { .. } => {
                ErrorCategory::Input
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SherpaError::NotFoundError { .. } => ErrorSeverity::Low,
            // 網路錯誤通常可以重試
            SherpaError::ApiError(_) | SherpaError::PartnerError { .. } => ErrorSeverity::Medium,
            SherpaError::ValidationError { .. }
            | SherpaError::CsvError(_)
            | SherpaError::SerializationError(_) => ErrorSeverity::High,
            SherpaError::IoError(_)
            | SherpaError::ConfigError { .. }
            | SherpaError::ConfigValidationError { .. }
            | SherpaError::InvalidConfigValueError { .. }
            | SherpaError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SherpaError::IoError(_) => {
                "Check that the storage directory exists and is writable".to_string()
            }
            SherpaError::ApiError(_) => {
                "Check network connectivity and the partner endpoint, then retry".to_string()
            }
            SherpaError::PartnerError { status, .. } if *status == 401 || *status == 403 => {
                "Verify the partner API key (PARTNER_API_KEY)".to_string()
            }
            SherpaError::PartnerError { .. } => {
                "Retry later; the local estimate is still available via `autosherpa value`"
                    .to_string()
            }
            SherpaError::CsvError(_) => {
                "Make sure the catalog CSV has the header id,name,price,fuel".to_string()
            }
            SherpaError::SerializationError(_) => {
                "Check the JSON payload against the tool's argument names".to_string()
            }
            SherpaError::ConfigError { .. } | SherpaError::ConfigValidationError { .. } => {
                "Check the TOML configuration file syntax".to_string()
            }
            SherpaError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the configuration", field)
            }
            SherpaError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration or environment", field)
            }
            SherpaError::ValidationError { .. } => "Correct the input and try again".to_string(),
            SherpaError::NotFoundError { what, .. } => {
                format!("List the available {} values and pick one of them", what)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not reach the valuation partner: {}", self),
            ErrorCategory::Data => format!("Could not read data: {}", self),
            ErrorCategory::Storage => format!("Could not access storage: {}", self),
            ErrorCategory::Input => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SherpaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = SherpaError::validation("months must be positive");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);

        let err = SherpaError::PartnerError {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);

        let err = SherpaError::MissingConfigError {
            field: "partner.api_key".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.recovery_suggestion().contains("partner.api_key"));
    }

    #[test]
    fn test_partner_auth_suggestion() {
        let err = SherpaError::PartnerError {
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert!(err.recovery_suggestion().contains("PARTNER_API_KEY"));
    }
}
