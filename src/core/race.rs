//! First-success race across address providers.
//!
//! Every lookup owns one cancellation scope and one [`JoinSet`]. Fetchers
//! report through a single mpsc channel, so arrivals are handled strictly in
//! completion order. Which provider wins is intentionally left to the network:
//! two runs with the same input may be answered by different providers.

use crate::core::fetcher::ProviderFetcher;
use crate::core::normalizer::normalize_payload;
use crate::domain::model::{Arbitration, Cep, LookupOutcome, Provider, ProviderFailure};
use crate::domain::ports::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

pub struct RaceCoordinator<T: HttpTransport> {
    fetcher: Arc<ProviderFetcher<T>>,
    arbitration: Arbitration,
}

impl<T: HttpTransport> RaceCoordinator<T> {
    pub fn new(fetcher: ProviderFetcher<T>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            arbitration: Arbitration::default(),
        }
    }

    pub fn with_arbitration(mut self, arbitration: Arbitration) -> Self {
        self.arbitration = arbitration;
        self
    }

    pub async fn resolve(
        &self,
        cep: &Cep,
        providers: &[Provider],
        timeout: Duration,
    ) -> LookupOutcome {
        if providers.is_empty() {
            return LookupOutcome::Exhausted {
                failures: Vec::new(),
            };
        }

        let scope = CancellationToken::new();
        // 容量等於 provider 數量，fetcher 送出結果時永遠不會阻塞
        let (tx, mut rx) = mpsc::channel(providers.len());
        let mut tasks = JoinSet::new();

        for &provider in providers {
            let fetcher = Arc::clone(&self.fetcher);
            let token = scope.child_token();
            let tx = tx.clone();
            let cep = cep.clone();
            tasks.spawn(async move {
                let raw = fetcher.fetch(&cep, provider, &token).await;
                let _ = tx.send(raw).await;
            });
        }
        drop(tx);

        tracing::debug!(
            "🏁 Racing {} providers for CEP {} (timeout {}ms, {:?})",
            providers.len(),
            cep,
            timeout.as_millis(),
            self.arbitration
        );

        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);
        let mut failures = Vec::new();

        let outcome = loop {
            tokio::select! {
                // deadline 優先：逾時後抵達的結果一律不採用
                biased;
                _ = &mut deadline => break LookupOutcome::Timeout,
                arrival = rx.recv() => {
                    let Some(raw) = arrival else {
                        break LookupOutcome::Exhausted { failures };
                    };
                    let provider = raw.provider;
                    let result = raw.payload.and_then(|body| normalize_payload(provider, &body));

                    match result {
                        Ok(address) => break LookupOutcome::Success { address, provider },
                        Err(cause) if self.arbitration == Arbitration::FirstArrival => {
                            break LookupOutcome::ProviderError { provider, cause };
                        }
                        Err(error) => {
                            tracing::warn!("⚠️ Discarding {} result: {}", provider, error);
                            failures.push(ProviderFailure { provider, error });
                        }
                    }
                }
            }
        };

        scope.cancel();
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("❌ Provider task failed to complete: {}", e);
            }
        }

        outcome
    }
}
