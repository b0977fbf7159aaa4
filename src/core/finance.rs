use crate::domain::model::EmiPlan;
use crate::utils::error::{Result, SherpaError};

pub const DEFAULT_ANNUAL_RATE_PERCENT: f64 = 8.5;
pub const DEFAULT_TENURE_MONTHS: u32 = 60;

/// Equated monthly instalment, `P·r·(1+r)^n / ((1+r)^n − 1)` with
/// `r = annual_rate / 12 / 100`, rounded to whole rupees.
pub fn calculate_emi(principal: u64, annual_rate_percent: f64, months: u32) -> Result<u64> {
    if months == 0 {
        return Err(SherpaError::validation("loan tenure must be at least one month"));
    }
    if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
        return Err(SherpaError::validation(format!(
            "interest rate must be a non-negative number, got {}",
            annual_rate_percent
        )));
    }

    let periods = i32::try_from(months).map_err(|_| {
        SherpaError::validation(format!("loan tenure of {} months is too long", months))
    })?;

    let p = principal as f64;
    let r = annual_rate_percent / 12.0 / 100.0;
    let emi = if r == 0.0 {
        p / f64::from(months)
    } else {
        let growth = (1.0 + r).powi(periods);
        if growth.is_infinite() {
            // n → ∞ 時 EMI 收斂到每月利息
            p * r
        } else {
            p * r * growth / (growth - 1.0)
        }
    };

    Ok(emi.round() as u64)
}

pub fn emi_plan(principal: u64, annual_rate_percent: f64, months: u32) -> Result<EmiPlan> {
    let emi = calculate_emi(principal, annual_rate_percent, months)?;
    let total_payable = emi.checked_mul(u64::from(months)).ok_or_else(|| {
        SherpaError::validation(format!(
            "total repayment for a principal of {} does not fit",
            principal
        ))
    })?;

    Ok(EmiPlan {
        principal,
        annual_rate_percent,
        months,
        emi,
        total_payable,
        total_interest: total_payable.saturating_sub(principal),
    })
}
