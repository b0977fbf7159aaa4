use crate::core::finance::{DEFAULT_ANNUAL_RATE_PERCENT, DEFAULT_TENURE_MONTHS};
use crate::core::scheduling::{default_packages, SlotPlan};
use crate::domain::model::ServicePackage;
use crate::utils::error::{Result, SherpaError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dealership: DealershipConfig,
    pub catalog: CatalogConfig,
    pub faq: FaqConfig,
    pub storage: StorageConfig,
    pub finance: FinanceConfig,
    pub partner: Option<PartnerConfig>,
    pub scheduling: SchedulingConfig,
    pub packages: Option<Vec<ServicePackage>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DealershipConfig {
    pub name: String,
}

impl Default for DealershipConfig {
    fn default() -> Self {
        Self {
            name: "Sherpa Hyundai".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// CSV with `id,name,price,fuel`; built-in stock when absent
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqConfig {
    pub path: Option<String>,
    pub max_results: usize,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_results: crate::core::faq::DEFAULT_MAX_RESULTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "./data/ledger".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceConfig {
    pub annual_rate_percent: f64,
    pub tenure_months: u32,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            annual_rate_percent: DEFAULT_ANNUAL_RATE_PERCENT,
            tenure_months: DEFAULT_TENURE_MONTHS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub enabled: Option<bool>,
}

impl PartnerConfig {
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(8)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    pub service: SlotPlan,
    pub test_drive: SlotPlan,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            service: SlotPlan::service(),
            test_drive: SlotPlan::test_drive(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SherpaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SherpaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PARTNER_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SherpaError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn packages(&self) -> Vec<ServicePackage> {
        self.packages.clone().unwrap_or_else(default_packages)
    }

    /// Partner settings, if configured and switched on.
    pub fn active_partner(&self) -> Option<&PartnerConfig> {
        self.partner.as_ref().filter(|p| p.is_enabled())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(path) = &self.catalog.path {
            validation::config_file("catalog.path", path, Some("csv"))?;
        }

        if let Some(path) = &self.faq.path {
            validation::config_file("faq.path", path, None)?;
        }
        validation::config_at_least("faq.max_results", self.faq.max_results, 1)?;

        validation::config_file("storage.path", &self.storage.path, None)?;

        validation::config_within(
            "finance.annual_rate_percent",
            self.finance.annual_rate_percent,
            0.0..=100.0,
        )?;
        validation::config_at_least("finance.tenure_months", self.finance.tenure_months, 1)?;

        if let Some(partner) = self.active_partner() {
            validation::config_endpoint("partner.endpoint", &partner.endpoint)?;
            // 未被替換的 ${VAR} 代表環境變數沒有設定
            validation::config_secret("partner.api_key", &partner.api_key)?;
            validation::config_at_least("partner.timeout_seconds", partner.timeout_seconds(), 1)?;
        }

        for (field, plan) in [
            ("scheduling.service", &self.scheduling.service),
            ("scheduling.test_drive", &self.scheduling.test_drive),
        ] {
            validation::config_at_least(&format!("{}.days", field), plan.days, 1)?;
            if plan.hours.is_empty() {
                return Err(SherpaError::InvalidConfigValueError {
                    field: format!("{}.hours", field),
                    value: "[]".to_string(),
                    reason: "At least one hour is required".to_string(),
                });
            }
            for hour in &plan.hours {
                validation::config_within(&format!("{}.hours", field), *hour, 0..=23)?;
            }
        }

        for package in &self.packages() {
            validation::config_non_empty("packages.id", &package.id)?;
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.dealership.name, "Sherpa Hyundai");
        assert_eq!(config.finance.tenure_months, 60);
        assert_eq!(config.scheduling.service.hours, vec![10, 13, 16]);
        assert_eq!(config.packages().len(), 3);
        assert!(config.active_partner().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[dealership]
name = "Sherpa Hyundai Electronic City"

[catalog]
path = "stock.csv"

[finance]
annual_rate_percent = 9.25
tenure_months = 48

[partner]
endpoint = "https://partner.example.com/valuation"
api_key = "secret"
timeout_seconds = 3

[scheduling.test_drive]
days = 3
hours = [11, 15]

[[packages]]
id = "express"
name = "Express Service"
price = 999
description = "Quick wash and top-up"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.catalog.path.as_deref(), Some("stock.csv"));
        assert_eq!(config.finance.annual_rate_percent, 9.25);
        assert_eq!(config.active_partner().unwrap().timeout_seconds(), 3);
        assert_eq!(config.scheduling.test_drive.days, 3);
        // 未填寫的 service 排程保留預設
        assert_eq!(config.scheduling.service, SlotPlan::service());
        assert_eq!(config.packages()[0].id, "express");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("AUTOSHERPA_TEST_PARTNER_KEY", "key-from-env");

        let toml_content = r#"
[partner]
endpoint = "https://partner.example.com/valuation"
api_key = "${AUTOSHERPA_TEST_PARTNER_KEY}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.partner.unwrap().api_key.as_deref(),
            Some("key-from-env")
        );

        std::env::remove_var("AUTOSHERPA_TEST_PARTNER_KEY");
    }

    #[test]
    fn test_unset_env_var_is_reported_missing() {
        let toml_content = r#"
[partner]
endpoint = "https://partner.example.com/valuation"
api_key = "${AUTOSHERPA_UNSET_PARTNER_KEY}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, SherpaError::MissingConfigError { ref field } if field == "AUTOSHERPA_UNSET_PARTNER_KEY"));
    }

    #[test]
    fn test_config_validation() {
        let bad_endpoint = r#"
[partner]
endpoint = "invalid-url"
api_key = "secret"
"#;
        assert!(AppConfig::from_toml_str(bad_endpoint).unwrap().validate().is_err());

        // 關閉的 partner 不做驗證
        let disabled = r#"
[partner]
endpoint = "invalid-url"
enabled = false
"#;
        assert!(AppConfig::from_toml_str(disabled).unwrap().validate().is_ok());

        let bad_hours = r#"
[scheduling.service]
days = 7
hours = [10, 25]
"#;
        assert!(AppConfig::from_toml_str(bad_hours).unwrap().validate().is_err());

        let bad_catalog = r#"
[catalog]
path = "stock.json"
"#;
        assert!(AppConfig::from_toml_str(bad_catalog).unwrap().validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\npath = \"/var/lib/autosherpa\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.storage.path, "/var/lib/autosherpa");
    }
}
