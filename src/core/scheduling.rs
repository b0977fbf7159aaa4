use crate::domain::model::ServicePackage;
use crate::utils::error::{Result, SherpaError};
use chrono::{Days, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SLOT_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Window of bookable days and the hours offered on each day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPlan {
    pub days: u32,
    pub hours: Vec<u32>,
}

impl SlotPlan {
    pub fn service() -> Self {
        Self {
            days: 7,
            hours: vec![10, 13, 16],
        }
    }

    pub fn test_drive() -> Self {
        Self {
            days: 2,
            hours: vec![10, 14],
        }
    }

    /// Slots starting from `date` (`YYYY-MM-DD`), or from today when the
    /// date is absent or unparsable.
    pub fn available_slots(&self, date: Option<&str>) -> Vec<String> {
        let start = date
            .and_then(|d| match NaiveDate::parse_from_str(d, DATE_FORMAT) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::debug!("Ignoring unparsable slot date '{}': {}", d, e);
                    None
                }
            })
            .unwrap_or_else(|| Utc::now().date_naive());

        self.slots_from(start)
    }

    pub fn slots_from(&self, start: NaiveDate) -> Vec<String> {
        let mut slots = Vec::with_capacity(self.days as usize * self.hours.len());
        for offset in 0..self.days {
            let Some(day) = start.checked_add_days(Days::new(offset as u64)) else {
                break;
            };
            for hour in &self.hours {
                if let Some(slot) = day.and_hms_opt(*hour, 0, 0) {
                    slots.push(slot.format(SLOT_FORMAT).to_string());
                }
            }
        }
        slots
    }
}

pub fn parse_slot(slot: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(slot, SLOT_FORMAT).map_err(|e| {
        SherpaError::validation(format!(
            "slot '{}' is not in YYYY-MM-DD HH:MM format: {}",
            slot, e
        ))
    })
}

pub fn default_packages() -> Vec<ServicePackage> {
    let package = |id: &str, name: &str, price: u64, description: &str| ServicePackage {
        id: id.to_string(),
        name: name.to_string(),
        price,
        description: description.to_string(),
    };

    vec![
        package(
            "basic",
            "Basic Service",
            1499,
            "Oil change, filter check, basic inspection",
        ),
        package(
            "comprehensive",
            "Comprehensive Service",
            4499,
            "Full inspection, fluids, brakes check",
        ),
        package(
            "detailing",
            "Complete Detailing",
            2499,
            "Interior + Exterior detailing and polish",
        ),
    ]
}
