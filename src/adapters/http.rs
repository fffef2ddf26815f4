use crate::domain::ports::{HttpTransport, TransportResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("cep-lookup/", env!("CARGO_PKG_VERSION"));

/// `HttpTransport` backed by a shared reqwest client.
///
/// No request-level timeout is configured here: the race coordinator owns the
/// deadline and aborts a request by dropping its future.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str, connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::from_client(Client::new())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        // 非 2xx 的內容不會被解析，但仍讀完以便重用連線
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_get_returns_status_and_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/ws/01001-000/json/")
                .header("accept", "application/json");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(r#"{"uf":"SP"}"#);
        });

        let transport = ReqwestTransport::new(DEFAULT_USER_AGENT, Duration::from_secs(2)).unwrap();
        let response = transport
            .get(&server.url("/ws/01001-000/json/"))
            .await
            .unwrap();

        api_mock.assert();
        assert!(response.is_success());
        assert_eq!(response.body, br#"{"uf":"SP"}"#.to_vec());
    }

    #[tokio::test]
    async fn test_non_success_status_is_not_an_error_here() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not found");
        });

        let response = ReqwestTransport::default()
            .get(&server.url("/missing"))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // 連到已關閉的埠
        let result = ReqwestTransport::default().get("http://127.0.0.1:1/").await;
        assert!(matches!(result, Err(crate::utils::error::CepError::Transport(_))));
    }
}
