use crate::domain::model::{Arbitration, Provider};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// GET-only HTTP capability. Dropping the returned future must abort the request.
#[async_trait]
pub trait HttpTransport: Send + Sync + 'static {
    async fn get(&self, url: &str) -> Result<TransportResponse>;
}

pub trait ConfigProvider: Send + Sync {
    fn timeout(&self) -> Duration;
    fn providers(&self) -> Result<Vec<Provider>>;
    fn endpoint_template(&self, provider: Provider) -> &str;
    fn arbitration(&self) -> Arbitration;
    fn user_agent(&self) -> &str;
    fn connect_timeout(&self) -> Duration;
}
