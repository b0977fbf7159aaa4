use crate::adapters::catalog::InMemoryCatalog;
use crate::adapters::noise::{SeededNoise, ThreadRngNoise};
use crate::adapters::partner::{HttpPartnerClient, QuoteService};
use crate::adapters::storage::LocalStorage;
use crate::config::AppConfig;
use crate::core::booking::BookingLedger;
use crate::core::faq::FaqIndex;
use crate::core::toolkit::{ToolDefaults, Toolkit};
use crate::core::valuation::ValuationEstimator;
use crate::domain::ports::{MarketNoise, Storage};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;

/// Market noise for a run: seeded when a seed is given, thread RNG otherwise.
pub fn market_noise(seed: Option<u64>) -> Arc<dyn MarketNoise> {
    match seed {
        Some(seed) => Arc::new(SeededNoise::new(seed)),
        None => Arc::new(ThreadRngNoise),
    }
}

pub fn load_catalog(config: &AppConfig) -> Result<InMemoryCatalog> {
    match &config.catalog.path {
        Some(path) => {
            tracing::info!("📁 Loading catalog from: {}", path);
            InMemoryCatalog::from_csv_file(path)
        }
        None => Ok(InMemoryCatalog::dealership_stock()),
    }
}

pub fn load_faq(config: &AppConfig) -> Result<FaqIndex> {
    match &config.faq.path {
        Some(path) => {
            tracing::info!("📁 Loading FAQ knowledge base from: {}", path);
            FaqIndex::from_file(path)
        }
        None => Ok(FaqIndex::builtin()),
    }
}

pub fn build_toolkit(config: &AppConfig, noise: Arc<dyn MarketNoise>) -> Result<Toolkit<LocalStorage>> {
    let storage = LocalStorage::new(config.storage.path.clone());
    build_toolkit_with_storage(config, noise, storage)
}

pub fn build_toolkit_with_storage<S: Storage>(
    config: &AppConfig,
    noise: Arc<dyn MarketNoise>,
    storage: S,
) -> Result<Toolkit<S>> {
    tracing::debug!("Building toolkit for {}", config.dealership.name);
    let catalog = Arc::new(load_catalog(config)?);
    let estimator = ValuationEstimator::new(catalog, noise);

    let quotes = match config.active_partner() {
        Some(partner) => {
            tracing::debug!("Partner valuation enabled: {}", partner.endpoint);
            let client = HttpPartnerClient::new(
                partner.endpoint.clone(),
                partner.api_key.clone(),
                Duration::from_secs(partner.timeout_seconds()),
            )?;
            QuoteService::with_partner(estimator.clone(), Arc::new(client))
        }
        None => QuoteService::local_only(estimator.clone()),
    };

    let ledger = BookingLedger::new(storage, config.packages());
    let defaults = ToolDefaults {
        annual_rate_percent: config.finance.annual_rate_percent,
        tenure_months: config.finance.tenure_months,
        faq_max_results: config.faq.max_results,
        service_slots: config.scheduling.service.clone(),
        test_drive_slots: config.scheduling.test_drive.clone(),
    };

    Ok(Toolkit::new(estimator, quotes, load_faq(config)?, ledger, defaults))
}
