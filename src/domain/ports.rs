use crate::domain::model::{CatalogEntry, PartnerRequest, ValuationQuote};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Maps a model identifier to its reference price.
pub trait CatalogLookup: Send + Sync {
    fn lookup(&self, model_id: &str) -> Option<CatalogEntry>;
}

impl<T: CatalogLookup + ?Sized> CatalogLookup for Arc<T> {
    fn lookup(&self, model_id: &str) -> Option<CatalogEntry> {
        (**self).lookup(model_id)
    }
}

/// Source of the market-noise multiplier. `sample(spread)` returns a factor
/// uniformly drawn from `[1 - spread, 1 + spread]`.
pub trait MarketNoise: Send + Sync {
    fn sample(&self, spread: f64) -> f64;
}

impl<T: MarketNoise + ?Sized> MarketNoise for Arc<T> {
    fn sample(&self, spread: f64) -> f64 {
        (**self).sample(spread)
    }
}

#[async_trait]
pub trait PartnerValuation: Send + Sync {
    async fn quote(&self, request: &PartnerRequest) -> Result<ValuationQuote>;
}
