use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    /// 參考價格，以整數盧比計
    pub price: u64,
    pub fuel: String,
}

/// Declared vehicle condition. Matching is case-insensitive; anything that
/// is not one of the known tags (or their aliases), including `null`, is
/// treated as `Good`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", rename_all = "lowercase")]
pub enum Condition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "excellent" | "like new" => Condition::Excellent,
            "fair" | "average" => Condition::Fair,
            "poor" | "bad" => Condition::Poor,
            _ => Condition::Good,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Condition::Excellent => 1.03,
            Condition::Good => 1.0,
            Condition::Fair => 0.94,
            Condition::Poor => 0.80,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
        }
    }
}

impl From<&str> for Condition {
    fn from(tag: &str) -> Self {
        Condition::from_tag(tag)
    }
}

impl From<String> for Condition {
    fn from(tag: String) -> Self {
        Condition::from_tag(&tag)
    }
}

impl From<Option<String>> for Condition {
    fn from(tag: Option<String>) -> Self {
        tag.as_deref().map(Condition::from_tag).unwrap_or_default()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts a registration year as a JSON integer, a float (truncated) or a
/// numeric string such as `" 2019 "`.
pub fn deserialize_year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YearInput {
        Integer(i64),
        Float(f64),
        Text(String),
    }

    let year = match YearInput::deserialize(deserializer)? {
        YearInput::Integer(year) => year,
        YearInput::Float(year) if year.is_finite() => year.trunc() as i64,
        YearInput::Float(year) => return Err(D::Error::custom(format!("invalid year {}", year))),
        YearInput::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("invalid year '{}'", text)))?,
    };

    i32::try_from(year).map_err(|_| D::Error::custom(format!("year {} is out of range", year)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRequest {
    pub model: String,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: i32,
    #[serde(default)]
    pub kms: u64,
    #[serde(default)]
    pub condition: Condition,
}

impl ValuationRequest {
    pub fn new(model: impl Into<String>, year: i32) -> Self {
        Self {
            model: model.into(),
            year,
            kms: 0,
            condition: Condition::Good,
        }
    }

    pub fn with_kms(mut self, kms: u64) -> Self {
        self.kms = kms;
        self
    }

    pub fn with_condition(mut self, condition: impl Into<Condition>) -> Self {
        self.condition = condition.into();
        self
    }
}

/// Every intermediate figure of a single estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationBreakdown {
    pub base_price: u64,
    pub fallback_price_used: bool,
    pub age_years: u32,
    pub depreciated: f64,
    /// Positive reduces value, negative is a low-mileage bonus.
    pub mileage_penalty: f64,
    pub condition_factor: f64,
    pub pre_noise: f64,
    pub noise_factor: f64,
    pub floor: f64,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationQuote {
    pub estimated_value: u64,
    pub currency: String,
    pub confidence: f64,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerRequest {
    pub model: String,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: i32,
    #[serde(default)]
    pub kms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reg_no: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmiPlan {
    pub principal: u64,
    pub annual_rate_percent: f64,
    pub months: u32,
    pub emi: u64,
    pub total_payable: u64,
    pub total_interest: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
    #[serde(skip)]
    pub keywords: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePackage {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    TestDrive,
    Service,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: u64,
    pub kind: BookingKind,
    pub user_phone: String,
    pub car_model: String,
    pub slot: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_aliases_case_insensitive() {
        assert_eq!(Condition::from_tag("Like New"), Condition::Excellent);
        assert_eq!(Condition::from_tag("AVERAGE"), Condition::Fair);
        assert_eq!(Condition::from_tag("bad"), Condition::Poor);
        assert_eq!(Condition::from_tag(""), Condition::Good);
        assert_eq!(Condition::from_tag("mint-ish"), Condition::Good);
        // 不做 trim，多餘空白視為無法辨識
        assert_eq!(Condition::from_tag(" poor"), Condition::Good);
    }

    #[test]
    fn test_valuation_request_defaults_from_json() {
        let request: ValuationRequest =
            serde_json::from_str(r#"{"model": "creta", "year": 2019}"#).unwrap();
        assert_eq!(request.kms, 0);
        assert_eq!(request.condition, Condition::Good);

        let request: ValuationRequest =
            serde_json::from_str(r#"{"model": "creta", "year": 2019, "condition": "Poor"}"#)
                .unwrap();
        assert_eq!(request.condition, Condition::Poor);
    }

    #[test]
    fn test_null_condition_is_good() {
        let request: ValuationRequest =
            serde_json::from_str(r#"{"model": "creta", "year": 2019, "condition": null}"#)
                .unwrap();
        assert_eq!(request.condition, Condition::Good);
        assert_eq!(serde_json::to_string(&Condition::Excellent).unwrap(), "\"excellent\"");
    }

    #[test]
    fn test_year_accepts_numeric_strings() {
        let parse = |raw: &str| serde_json::from_str::<ValuationRequest>(raw).map(|r| r.year);

        assert_eq!(parse(r#"{"model": "creta", "year": "2019"}"#).unwrap(), 2019);
        assert_eq!(parse(r#"{"model": "creta", "year": " 2019 "}"#).unwrap(), 2019);
        assert_eq!(parse(r#"{"model": "creta", "year": 2019.0}"#).unwrap(), 2019);
        assert_eq!(parse(r#"{"model": "creta", "year": -5}"#).unwrap(), -5);
        assert!(parse(r#"{"model": "creta", "year": "last year"}"#).is_err());
        assert!(parse(r#"{"model": "creta", "year": 99999999999}"#).is_err());
        assert!(parse(r#"{"model": "creta", "year": null}"#).is_err());
    }

    #[test]
    fn test_booking_kind_serialization() {
        let json = serde_json::to_string(&BookingKind::TestDrive).unwrap();
        assert_eq!(json, "\"test_drive\"");
    }
}
