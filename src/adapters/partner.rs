use crate::core::valuation::ValuationEstimator;
use crate::domain::model::{PartnerRequest, ValuationQuote, ValuationRequest};
use crate::domain::ports::{CatalogLookup, MarketNoise, PartnerValuation};
use crate::utils::error::{Result, SherpaError};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub const LOCAL_SOURCE: &str = "local_heuristic";
pub const LOCAL_CONFIDENCE: f64 = 0.72;
pub const CURRENCY: &str = "INR";

/// Client for an external valuation partner (Cars24, Spinny, ...).
#[derive(Debug, Clone)]
pub struct HttpPartnerClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpPartnerClient {
    pub fn new(endpoint: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PartnerValuation for HttpPartnerClient {
    async fn quote(&self, request: &PartnerRequest) -> Result<ValuationQuote> {
        tracing::debug!("Requesting partner valuation from: {}", self.endpoint);

        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("Partner response status: {}", status);

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SherpaError::PartnerError {
                status: status.as_u16(),
                message,
            });
        }

        let quote: ValuationQuote = response.json().await?;
        Ok(quote)
    }
}

/// Partner quote with the local heuristic as a fallback.
pub struct QuoteService<C: CatalogLookup, N: MarketNoise> {
    estimator: ValuationEstimator<C, N>,
    partner: Option<Arc<dyn PartnerValuation>>,
}

impl<C: CatalogLookup, N: MarketNoise> QuoteService<C, N> {
    pub fn local_only(estimator: ValuationEstimator<C, N>) -> Self {
        Self {
            estimator,
            partner: None,
        }
    }

    pub fn with_partner(
        estimator: ValuationEstimator<C, N>,
        partner: Arc<dyn PartnerValuation>,
    ) -> Self {
        Self {
            estimator,
            partner: Some(partner),
        }
    }

    pub fn has_partner(&self) -> bool {
        self.partner.is_some()
    }

    pub fn local_quote(&self, request: &PartnerRequest) -> ValuationQuote {
        // 合作方請求沒有車況欄位，固定以 good 估算
        let valuation = ValuationRequest::new(request.model.clone(), request.year)
            .with_kms(request.kms);

        ValuationQuote {
            estimated_value: self.estimator.estimate(&valuation),
            currency: CURRENCY.to_string(),
            confidence: LOCAL_CONFIDENCE,
            source: LOCAL_SOURCE.to_string(),
        }
    }

    pub async fn quote(&self, request: &PartnerRequest) -> ValuationQuote {
        if let Some(partner) = &self.partner {
            match partner.quote(request).await {
                Ok(quote) => return quote,
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Partner valuation failed for '{}': {} ({:?}); using local estimate",
                        request.model,
                        e,
                        e.category()
                    );
                }
            }
        }

        self.local_quote(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::catalog::InMemoryCatalog;
    use crate::adapters::noise::FixedNoise;

    struct FailingPartner;

    #[async_trait]
    impl PartnerValuation for FailingPartner {
        async fn quote(&self, _request: &PartnerRequest) -> Result<ValuationQuote> {
            Err(SherpaError::PartnerError {
                status: 503,
                message: "maintenance".to_string(),
            })
        }
    }

    fn estimator() -> ValuationEstimator<InMemoryCatalog, FixedNoise> {
        ValuationEstimator::new(InMemoryCatalog::dealership_stock(), FixedNoise::neutral())
    }

    fn request() -> PartnerRequest {
        PartnerRequest {
            model: "unknown-model".to_string(),
            year: 9999,
            kms: 0,
            reg_no: None,
        }
    }

    #[tokio::test]
    async fn test_local_only_quote() {
        let service = QuoteService::local_only(estimator());
        let quote = service.quote(&request()).await;

        assert!(!service.has_partner());
        assert_eq!(quote.estimated_value, 1_000_000);
        assert_eq!(quote.currency, "INR");
        assert_eq!(quote.source, LOCAL_SOURCE);
        assert_eq!(quote.confidence, LOCAL_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_failing_partner_falls_back() {
        let service = QuoteService::with_partner(estimator(), Arc::new(FailingPartner));
        let quote = service.quote(&request()).await;
        assert_eq!(quote.source, LOCAL_SOURCE);
        assert_eq!(quote.estimated_value, 1_000_000);
    }
}
