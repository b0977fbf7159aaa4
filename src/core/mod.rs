pub mod booking;
pub mod faq;
pub mod finance;
pub mod scheduling;
pub mod toolkit;
pub mod valuation;

pub use crate::domain::model::{CatalogEntry, Condition, ValuationQuote, ValuationRequest};
pub use crate::domain::ports::{CatalogLookup, MarketNoise, PartnerValuation, Storage};
pub use crate::utils::error::Result;
