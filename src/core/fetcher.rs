use crate::domain::model::{Cep, Provider, RawProviderResponse};
use crate::domain::ports::HttpTransport;
use crate::utils::error::CepError;
use std::collections::HashMap;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Per-provider URL templates; `{cep}` is replaced with the provider's CEP format.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    templates: HashMap<Provider, String>,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        let templates = Provider::ALL
            .iter()
            .map(|p| (*p, p.default_endpoint().to_string()))
            .collect();
        Self { templates }
    }
}

impl ProviderEndpoints {
    pub fn with_template(mut self, provider: Provider, template: impl Into<String>) -> Self {
        self.templates.insert(provider, template.into());
        self
    }

    pub fn template(&self, provider: Provider) -> &str {
        self.templates
            .get(&provider)
            .map(String::as_str)
            .unwrap_or_else(|| provider.default_endpoint())
    }

    pub fn url_for(&self, provider: Provider, cep: &Cep) -> String {
        self.template(provider)
            .replace("{cep}", &provider.format_cep(cep))
    }
}

pub struct ProviderFetcher<T: HttpTransport> {
    transport: T,
    endpoints: ProviderEndpoints,
}

impl<T: HttpTransport> ProviderFetcher<T> {
    pub fn new(transport: T, endpoints: ProviderEndpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// 對單一 provider 發出一次請求，不重試
    ///
    /// 若 token 先被取消，進行中的請求 future 會被 drop（連線層級中止），
    /// 並回傳 [`CepError::Cancelled`]。
    pub async fn fetch(
        &self,
        cep: &Cep,
        provider: Provider,
        token: &CancellationToken,
    ) -> RawProviderResponse {
        let url = self.endpoints.url_for(provider, cep);
        let started = Instant::now();
        tracing::debug!("📡 Requesting {} at {}", provider, url);

        let response = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!(
                    "🛑 {} request cancelled after {}ms",
                    provider,
                    started.elapsed().as_millis()
                );
                return RawProviderResponse::failed(provider, CepError::Cancelled { provider });
            }
            response = self.transport.get(&url) => response,
        };

        match response {
            Err(e) => {
                tracing::debug!("⚠️ {} transport error: {}", provider, e);
                RawProviderResponse::failed(provider, e)
            }
            Ok(response) if !response.is_success() => {
                tracing::debug!(
                    "⚠️ {} answered HTTP {} in {}ms",
                    provider,
                    response.status,
                    started.elapsed().as_millis()
                );
                RawProviderResponse::failed(
                    provider,
                    CepError::ProviderStatus {
                        provider,
                        status: response.status,
                    },
                )
            }
            Ok(response) => {
                tracing::debug!(
                    "📥 {} answered HTTP {} ({} bytes) in {}ms",
                    provider,
                    response.status,
                    response.body.len(),
                    started.elapsed().as_millis()
                );
                RawProviderResponse::body(provider, response.body)
            }
        }
    }
}
