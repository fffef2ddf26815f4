use crate::adapters::http::ReqwestTransport;
use crate::core::fetcher::{ProviderEndpoints, ProviderFetcher};
use crate::core::race::RaceCoordinator;
use crate::domain::model::{LookupOutcome, LookupResult, Provider};
use crate::domain::ports::{ConfigProvider, HttpTransport};
use crate::utils::error::{CepError, Result};
use crate::utils::validation::validate_cep;
use std::time::{Duration, Instant};

/// Caller-facing entry point: validate, race the providers, map the outcome.
pub struct CepLookup<T: HttpTransport> {
    coordinator: RaceCoordinator<T>,
    providers: Vec<Provider>,
    timeout: Duration,
}

impl CepLookup<ReqwestTransport> {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let transport = ReqwestTransport::new(config.user_agent(), config.connect_timeout())?;
        Self::with_transport(transport, config)
    }
}

impl<T: HttpTransport> CepLookup<T> {
    pub fn new(coordinator: RaceCoordinator<T>, providers: Vec<Provider>, timeout: Duration) -> Self {
        Self {
            coordinator,
            providers,
            timeout,
        }
    }

    /// 以設定建立查詢器；未知或空的 provider 清單直接回報錯誤
    pub fn with_transport<C: ConfigProvider>(transport: T, config: &C) -> Result<Self> {
        let providers = config.providers()?;
        if providers.is_empty() {
            return Err(CepError::InvalidConfigValueError {
                field: "lookup.providers".to_string(),
                value: "[]".to_string(),
                reason: "At least one provider is required".to_string(),
            });
        }

        let endpoints = Provider::ALL
            .iter()
            .fold(ProviderEndpoints::default(), |endpoints, provider| {
                endpoints.with_template(*provider, config.endpoint_template(*provider))
            });
        let coordinator = RaceCoordinator::new(ProviderFetcher::new(transport, endpoints))
            .with_arbitration(config.arbitration());

        Ok(Self::new(coordinator, providers, config.timeout()))
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub async fn lookup(&self, raw_cep: &str) -> Result<LookupResult> {
        self.lookup_with_timeout(raw_cep, None).await
    }

    /// 查詢 CEP；`timeout` 為 `None` 時使用設定中的逾時
    pub async fn lookup_with_timeout(
        &self,
        raw_cep: &str,
        timeout: Option<Duration>,
    ) -> Result<LookupResult> {
        // 格式錯誤時直接返回，不發出任何請求
        let cep = validate_cep(raw_cep)?;
        let timeout = timeout.unwrap_or(self.timeout);
        let started = Instant::now();

        tracing::info!(
            "🔍 Looking up CEP {} across {} providers",
            cep.hyphenated(),
            self.providers.len()
        );

        let outcome = self
            .coordinator
            .resolve(&cep, &self.providers, timeout)
            .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            LookupOutcome::Success { address, provider } => {
                tracing::info!("✅ {} answered first in {}ms", provider, elapsed_ms);
                Ok(LookupResult {
                    address,
                    provider,
                    elapsed_ms,
                    resolved_at: chrono::Utc::now(),
                })
            }
            LookupOutcome::ProviderError { provider, cause } => {
                tracing::warn!("❌ First arrival from {} was unusable: {}", provider, cause);
                Err(CepError::ProviderFailed {
                    provider,
                    message: cause.to_string(),
                })
            }
            LookupOutcome::Timeout => {
                tracing::warn!("⏰ No provider answered within {}ms", timeout.as_millis());
                Err(CepError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
            LookupOutcome::Exhausted { failures } => {
                for failure in &failures {
                    tracing::debug!("   {} failed: {}", failure.provider, failure.error);
                }
                tracing::warn!("❌ All {} providers failed", self.providers.len());
                Err(CepError::AllProvidersFailed {
                    attempted: self.providers.len(),
                })
            }
        }
    }
}
