//! Field checks for the two places bad values come from.
//!
//! `config_*` helpers guard a loaded `AppConfig` and fail with
//! `InvalidConfigValueError` / `MissingConfigError`. `require_*` helpers guard
//! arguments arriving through a tool call or the CLI and fail with
//! `ValidationError`.

use crate::utils::error::{Result, SherpaError};
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn bad_config(field: &str, value: impl Display, reason: impl Into<String>) -> SherpaError {
    SherpaError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Partner endpoints must be absolute `http(s)` URLs with a host.
pub fn config_endpoint(field: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| bad_config(field, raw, format!("not a URL ({})", e)))?;

    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(url),
        "http" | "https" => Err(bad_config(field, raw, "endpoint has no host")),
        scheme => Err(bad_config(field, raw, format!("partner calls need http(s), not {}", scheme))),
    }
}

/// A usable file path, optionally pinned to one extension (case-insensitive).
pub fn config_file(field: &str, path: &str, extension: Option<&str>) -> Result<()> {
    if path.trim().is_empty() || path.contains('\0') {
        return Err(bad_config(field, path, "path is empty or contains a NUL byte"));
    }

    if let Some(expected) = extension {
        let actual = Path::new(path).extension().and_then(|ext| ext.to_str());
        if !actual.is_some_and(|ext| ext.eq_ignore_ascii_case(expected)) {
            return Err(bad_config(field, path, format!("expected a .{} file", expected)));
        }
    }

    Ok(())
}

pub fn config_within<T: PartialOrd + Display>(
    field: &str,
    value: T,
    allowed: RangeInclusive<T>,
) -> Result<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    let reason = format!("must be between {} and {}", allowed.start(), allowed.end());
    Err(bad_config(field, value, reason))
}

pub fn config_at_least<T: PartialOrd + Display>(field: &str, value: T, min: T) -> Result<()> {
    if value < min {
        let reason = format!("must be at least {}", min);
        return Err(bad_config(field, value, reason));
    }
    Ok(())
}

pub fn config_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(bad_config(field, value, "must not be blank"));
    }
    Ok(())
}

/// A secret that must be set after `${VAR}` substitution. A placeholder that
/// survived substitution is reported as the missing environment variable.
pub fn config_secret<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str> {
    let secret = value.as_deref().ok_or_else(|| SherpaError::MissingConfigError {
        field: field.to_string(),
    })?;

    if let Some(var) = secret.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        return Err(SherpaError::MissingConfigError {
            field: var.to_string(),
        });
    }
    if secret.trim().is_empty() {
        return Err(bad_config(field, "", "must not be blank"));
    }

    Ok(secret)
}

/// Free-text argument from a caller, such as a phone number or a model id.
pub fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(SherpaError::validation(format!("{} must not be empty", field)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{ErrorCategory, ErrorSeverity};

    #[test]
    fn test_config_endpoint() {
        assert!(config_endpoint("partner.endpoint", "https://partner.example.com/valuation").is_ok());
        assert!(config_endpoint("partner.endpoint", "http://localhost:8080").is_ok());
        assert!(config_endpoint("partner.endpoint", "").is_err());
        assert!(config_endpoint("partner.endpoint", "not a url").is_err());

        let err = config_endpoint("partner.endpoint", "ftp://partner.example.com").unwrap_err();
        assert!(matches!(err, SherpaError::InvalidConfigValueError { ref field, .. } if field == "partner.endpoint"));
    }

    #[test]
    fn test_config_file_extension() {
        assert!(config_file("catalog.path", "stock.csv", Some("csv")).is_ok());
        assert!(config_file("catalog.path", "STOCK.CSV", Some("csv")).is_ok());
        assert!(config_file("catalog.path", "stock.xlsx", Some("csv")).is_err());
        assert!(config_file("catalog.path", "stock", Some("csv")).is_err());
        assert!(config_file("faq.path", "kb.txt", None).is_ok());
        assert!(config_file("storage.path", "  ", None).is_err());
    }

    #[test]
    fn test_config_ranges() {
        assert!(config_within("scheduling.service.hours", 16u32, 0..=23).is_ok());
        assert!(config_within("scheduling.service.hours", 24u32, 0..=23).is_err());
        assert!(config_at_least("scheduling.service.days", 7u32, 1).is_ok());
        assert!(config_at_least("scheduling.service.days", 0u32, 1).is_err());
        assert!(config_non_empty("packages.id", " ").is_err());
    }

    #[test]
    fn test_config_secret() {
        assert_eq!(config_secret("partner.api_key", &Some("s3cret".to_string())).unwrap(), "s3cret");

        let err = config_secret("partner.api_key", &None).unwrap_err();
        assert!(matches!(err, SherpaError::MissingConfigError { ref field } if field == "partner.api_key"));

        let err = config_secret("partner.api_key", &Some("${PARTNER_API_KEY}".to_string())).unwrap_err();
        assert!(matches!(err, SherpaError::MissingConfigError { ref field } if field == "PARTNER_API_KEY"));
    }

    #[test]
    fn test_require_text_is_an_input_error() {
        assert_eq!(require_text("user_phone", "919000000000").unwrap(), "919000000000");

        let err = require_text("user_phone", "  ").unwrap_err();
        assert!(matches!(err, SherpaError::ValidationError { .. }));
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
