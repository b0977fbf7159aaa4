pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{catalog::InMemoryCatalog, storage::LocalStorage};
pub use config::AppConfig;
pub use core::{toolkit::Toolkit, valuation::ValuationEstimator};
pub use utils::error::{Result, SherpaError};
