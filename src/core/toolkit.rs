//! JSON tool-call surface for the assistant's agents.
//!
//! Each `ToolCall` variant maps to one dealership tool. An agent runtime
//! sends `{"tool": "<name>", ...args}` and receives a JSON value back.

use crate::adapters::catalog::InMemoryCatalog;
use crate::adapters::partner::QuoteService;
use crate::core::booking::BookingLedger;
use crate::core::faq::FaqIndex;
use crate::core::finance::emi_plan;
use crate::core::scheduling::SlotPlan;
use crate::core::valuation::ValuationEstimator;
use crate::domain::model::{deserialize_year, Condition, PartnerRequest, ValuationRequest};
use crate::domain::ports::{CatalogLookup, MarketNoise, Storage};
use crate::utils::error::{Result, SherpaError};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolCall {
    SearchCars {
        #[serde(default)]
        brand: Option<String>,
        #[serde(default)]
        budget_lt: Option<u64>,
    },
    GetCarById {
        car_id: String,
    },
    EstimateCarValue {
        model: String,
        #[serde(deserialize_with = "deserialize_year")]
        year: i32,
        #[serde(default)]
        kms: u64,
        #[serde(default)]
        condition: Condition,
    },
    PartnerValuation {
        model: String,
        #[serde(deserialize_with = "deserialize_year")]
        year: i32,
        #[serde(default)]
        kms: u64,
        #[serde(default)]
        reg_no: Option<String>,
    },
    CalculateEmi {
        principal: u64,
        #[serde(default)]
        annual_rate_percent: Option<f64>,
        #[serde(default)]
        months: Option<u32>,
    },
    FaqLookup {
        question: String,
    },
    ListServicePackages,
    GetAvailableTestdriveSlots {
        #[serde(default)]
        location: Option<String>,
        #[serde(default)]
        date: Option<String>,
    },
    GetAvailableServiceSlots {
        #[serde(default)]
        location: Option<String>,
        #[serde(default)]
        date: Option<String>,
    },
    BookTestdrive {
        user_phone: String,
        car_model: String,
        slot: String,
    },
    BookServiceAppointment {
        user_phone: String,
        car_model: String,
        slot: String,
        #[serde(default)]
        package_id: Option<String>,
    },
}

impl ToolCall {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::SearchCars { .. } => "search_cars",
            ToolCall::GetCarById { .. } => "get_car_by_id",
            ToolCall::EstimateCarValue { .. } => "estimate_car_value",
            ToolCall::PartnerValuation { .. } => "partner_valuation",
            ToolCall::CalculateEmi { .. } => "calculate_emi",
            ToolCall::FaqLookup { .. } => "faq_lookup",
            ToolCall::ListServicePackages => "list_service_packages",
            ToolCall::GetAvailableTestdriveSlots { .. } => "get_available_testdrive_slots",
            ToolCall::GetAvailableServiceSlots { .. } => "get_available_service_slots",
            ToolCall::BookTestdrive { .. } => "book_testdrive",
            ToolCall::BookServiceAppointment { .. } => "book_service_appointment",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolDefaults {
    pub annual_rate_percent: f64,
    pub tenure_months: u32,
    pub faq_max_results: usize,
    pub service_slots: SlotPlan,
    pub test_drive_slots: SlotPlan,
}

pub type SharedEstimator = ValuationEstimator<Arc<InMemoryCatalog>, Arc<dyn MarketNoise>>;

pub struct Toolkit<S: Storage> {
    catalog: Arc<InMemoryCatalog>,
    estimator: SharedEstimator,
    quotes: QuoteService<Arc<InMemoryCatalog>, Arc<dyn MarketNoise>>,
    faq: FaqIndex,
    ledger: BookingLedger<S>,
    defaults: ToolDefaults,
}

impl<S: Storage> Toolkit<S> {
    pub fn new(
        estimator: SharedEstimator,
        quotes: QuoteService<Arc<InMemoryCatalog>, Arc<dyn MarketNoise>>,
        faq: FaqIndex,
        ledger: BookingLedger<S>,
        defaults: ToolDefaults,
    ) -> Self {
        Self {
            catalog: estimator.catalog().clone(),
            estimator,
            quotes,
            faq,
            ledger,
            defaults,
        }
    }

    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.catalog
    }

    pub fn estimator(&self) -> &SharedEstimator {
        &self.estimator
    }

    pub fn quotes(&self) -> &QuoteService<Arc<InMemoryCatalog>, Arc<dyn MarketNoise>> {
        &self.quotes
    }

    pub fn faq(&self) -> &FaqIndex {
        &self.faq
    }

    pub fn ledger(&self) -> &BookingLedger<S> {
        &self.ledger
    }

    pub fn defaults(&self) -> &ToolDefaults {
        &self.defaults
    }

    pub async fn invoke_json(&self, raw: &str) -> Result<Value> {
        let call = ToolCall::from_json(raw)?;
        self.invoke(call).await
    }

    pub async fn invoke(&self, call: ToolCall) -> Result<Value> {
        tracing::debug!("Invoking tool: {}", call.name());

        let value = match call {
            ToolCall::SearchCars { brand, budget_lt } => {
                json!(self.catalog.search(brand.as_deref(), budget_lt))
            }
            ToolCall::GetCarById { car_id } => json!(self.catalog.lookup(&car_id)),
            ToolCall::EstimateCarValue {
                model,
                year,
                kms,
                condition,
            } => {
                let request = ValuationRequest {
                    model,
                    year,
                    kms,
                    condition,
                };
                json!(self.estimator.estimate(&request))
            }
            ToolCall::PartnerValuation {
                model,
                year,
                kms,
                reg_no,
            } => {
                let request = PartnerRequest {
                    model,
                    year,
                    kms,
                    reg_no,
                };
                json!(self.quotes.quote(&request).await)
            }
            ToolCall::CalculateEmi {
                principal,
                annual_rate_percent,
                months,
            } => {
                let plan = emi_plan(
                    principal,
                    annual_rate_percent.unwrap_or(self.defaults.annual_rate_percent),
                    months.unwrap_or(self.defaults.tenure_months),
                )?;
                json!(plan)
            }
            ToolCall::FaqLookup { question } => {
                json!(self.faq.answer(&question, self.defaults.faq_max_results))
            }
            ToolCall::ListServicePackages => json!(self.ledger.packages()),
            ToolCall::GetAvailableTestdriveSlots { location, date } => {
                log_location(location.as_deref());
                json!(self.defaults.test_drive_slots.available_slots(date.as_deref()))
            }
            ToolCall::GetAvailableServiceSlots { location, date } => {
                log_location(location.as_deref());
                json!(self.defaults.service_slots.available_slots(date.as_deref()))
            }
            ToolCall::BookTestdrive {
                user_phone,
                car_model,
                slot,
            } => {
                let booking = self
                    .ledger
                    .book_test_drive(&user_phone, &car_model, &slot)
                    .await?;
                json!(booking)
            }
            ToolCall::BookServiceAppointment {
                user_phone,
                car_model,
                slot,
                package_id,
            } => {
                let booking = self
                    .ledger
                    .book_service(&user_phone, &car_model, &slot, package_id.as_deref())
                    .await?;
                json!(booking)
            }
        };

        Ok(value)
    }

    /// Principal for an EMI request naming a model instead of an amount.
    pub fn principal_for_model(&self, model: &str) -> Result<u64> {
        self.catalog
            .lookup(model)
            .map(|car| car.price)
            .ok_or_else(|| SherpaError::not_found("car model", model))
    }
}

fn log_location(location: Option<&str>) {
    if let Some(location) = location {
        // 所有分店共用同一份排程
        tracing::debug!("Slot location '{}' shares the dealership schedule", location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_calls() {
        let call = ToolCall::from_json(
            r#"{"tool": "estimate_car_value", "model": "nexon", "year": 2019}"#,
        )
        .unwrap();
        assert_eq!(
            call,
            ToolCall::EstimateCarValue {
                model: "nexon".to_string(),
                year: 2019,
                kms: 0,
                condition: Condition::Good,
            }
        );

        let call = ToolCall::from_json(r#"{"tool": "list_service_packages"}"#).unwrap();
        assert_eq!(call.name(), "list_service_packages");

        let call = ToolCall::from_json(r#"{"tool": "search_cars", "brand": "kia"}"#).unwrap();
        assert!(matches!(call, ToolCall::SearchCars { budget_lt: None, .. }));
    }

    #[test]
    fn test_parse_loose_llm_arguments() {
        let call = ToolCall::from_json(
            r#"{"tool": "estimate_car_value", "model": "creta", "year": "2019", "condition": null}"#,
        )
        .unwrap();
        assert_eq!(
            call,
            ToolCall::EstimateCarValue {
                model: "creta".to_string(),
                year: 2019,
                kms: 0,
                condition: Condition::Good,
            }
        );

        let call = ToolCall::from_json(
            r#"{"tool": "partner_valuation", "model": "creta", "year": "2020", "reg_no": null}"#,
        )
        .unwrap();
        assert!(matches!(call, ToolCall::PartnerValuation { year: 2020, reg_no: None, .. }));
    }

    #[test]
    fn test_reject_unknown_or_malformed_calls() {
        assert!(matches!(
            ToolCall::from_json(r#"{"tool": "order_pizza"}"#),
            Err(SherpaError::SerializationError(_))
        ));
        assert!(ToolCall::from_json(r#"{"tool": "calculate_emi"}"#).is_err());
        assert!(ToolCall::from_json("not json").is_err());
    }
}
