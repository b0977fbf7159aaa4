//! Resale valuation heuristic.
//!
//! `base -> cumulative depreciation -> mileage -> condition -> noise -> floor`.
//! All rates below are pricing policy, not derived values.

use crate::domain::model::{ValuationBreakdown, ValuationRequest};
use crate::domain::ports::{CatalogLookup, MarketNoise};
use chrono::{Datelike, Utc};

/// Base price assumed for models missing from the catalog (10 lakh).
pub const FALLBACK_BASE_PRICE: u64 = 1_000_000;

/// Baseline annual depreciation once a car is past its third year.
pub const DEFAULT_DEPRECIATION_RATE: f64 = 0.15;

/// Lower bound for older-car depreciation. Currently never binds because it
/// sits below `DEFAULT_DEPRECIATION_RATE`.
pub const MIN_DEPRECIATION_RATE: f64 = 0.07;

pub const MARKET_NOISE_SPREAD: f64 = 0.03;

/// The estimate never drops below this share of the base price.
pub const FLOOR_RATIO: f64 = 0.05;

/// Depreciation applied during the given year of ownership (1-based).
pub fn depreciation_rate(year_of_ownership: u32) -> f64 {
    match year_of_ownership {
        0 => 0.0,
        1 => 0.25,
        2 => 0.20,
        3 => 0.17,
        _ => MIN_DEPRECIATION_RATE.max(DEFAULT_DEPRECIATION_RATE),
    }
}

/// Cumulative depreciation over `age_years` years of ownership. Every year
/// past the third shares one rate, so the tail is applied in a single step.
pub fn depreciate(value: f64, age_years: u32) -> f64 {
    let mut est = value;
    for year in 1..=age_years.min(3) {
        est *= 1.0 - depreciation_rate(year);
    }
    if age_years > 3 {
        est *= (1.0 - depreciation_rate(4)).powf(f64::from(age_years - 3));
    }
    est
}

/// Whole years between registration and `current_year`, never negative.
pub fn age_in_years(registration_year: i32, current_year: i32) -> u32 {
    let age = i64::from(current_year) - i64::from(registration_year);
    age.clamp(0, i64::from(u32::MAX)) as u32
}

/// Mileage adjustment for an already-depreciated value. Positive values
/// reduce the estimate; a negative value is a low-usage bonus.
pub fn mileage_penalty(value: f64, kms: u64, age_years: u32) -> f64 {
    if kms == 0 || age_years == 0 {
        return 0.0;
    }

    let avg_annual_kms = kms as f64 / age_years as f64;
    if avg_annual_kms > 20_000.0 {
        value * 0.10
    } else if avg_annual_kms > 15_000.0 {
        value * 0.05
    } else if avg_annual_kms < 8_000.0 {
        -value * 0.03
    } else {
        0.0
    }
}

#[derive(Debug, Clone)]
pub struct ValuationEstimator<C: CatalogLookup, N: MarketNoise> {
    catalog: C,
    noise: N,
}

impl<C: CatalogLookup, N: MarketNoise> ValuationEstimator<C, N> {
    pub fn new(catalog: C, noise: N) -> Self {
        Self { catalog, noise }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Estimate against the current UTC calendar year.
    pub fn estimate(&self, request: &ValuationRequest) -> u64 {
        self.estimate_as_of(request, Utc::now().year())
    }

    pub fn estimate_as_of(&self, request: &ValuationRequest, current_year: i32) -> u64 {
        self.breakdown_as_of(request, current_year).value
    }

    pub fn breakdown(&self, request: &ValuationRequest) -> ValuationBreakdown {
        self.breakdown_as_of(request, Utc::now().year())
    }

    pub fn breakdown_as_of(
        &self,
        request: &ValuationRequest,
        current_year: i32,
    ) -> ValuationBreakdown {
        let (base_price, fallback_price_used) = match self.catalog.lookup(&request.model) {
            Some(entry) if entry.price > 0 => (entry.price, false),
            _ => (FALLBACK_BASE_PRICE, true),
        };

        let age_years = age_in_years(request.year, current_year);

        let mut est = depreciate(base_price as f64, age_years);
        let depreciated = est;

        let penalty = mileage_penalty(est, request.kms, age_years);
        est -= penalty;

        let condition_factor = request.condition.multiplier();
        est *= condition_factor;
        let pre_noise = est;

        let noise_factor = self.noise.sample(MARKET_NOISE_SPREAD);
        est *= noise_factor;

        let floor = base_price as f64 * FLOOR_RATIO;
        let value = est.max(floor).round() as u64;

        tracing::debug!(
            model = %request.model,
            base_price,
            fallback_price_used,
            age_years,
            condition = %request.condition,
            value,
            "estimated resale value"
        );

        ValuationBreakdown {
            base_price,
            fallback_price_used,
            age_years,
            depreciated,
            mileage_penalty: penalty,
            condition_factor,
            pre_noise,
            noise_factor,
            floor,
            value,
        }
    }
}
