use crate::utils::error::{CepError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 已驗證的 CEP，固定為 8 位 ASCII 數字
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cep(String);

impl Cep {
    /// 僅供 validation 模組在檢查通過後建立
    pub(crate) fn from_validated(digits: String) -> Self {
        Self(digits)
    }

    pub fn digits(&self) -> &str {
        &self.0
    }

    /// 標準格式 `NNNNN-NNN`
    pub fn hyphenated(&self) -> String {
        format!("{}-{}", &self.0[..5], &self.0[5..])
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a provider expects the CEP to appear in its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CepFormat {
    Digits,
    Hyphenated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    BrasilApi,
    ViaCep,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::BrasilApi, Provider::ViaCep];

    /// 設定檔與命令列使用的識別字
    pub fn key(&self) -> &'static str {
        match self {
            Provider::BrasilApi => "brasilapi",
            Provider::ViaCep => "viacep",
        }
    }

    pub fn cep_format(&self) -> CepFormat {
        match self {
            Provider::BrasilApi => CepFormat::Digits,
            Provider::ViaCep => CepFormat::Hyphenated,
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Provider::BrasilApi => "https://brasilapi.com.br/api/cep/v1/{cep}",
            Provider::ViaCep => "https://viacep.com.br/ws/{cep}/json/",
        }
    }

    pub fn format_cep(&self, cep: &Cep) -> String {
        match self.cep_format() {
            CepFormat::Digits => cep.digits().to_string(),
            CepFormat::Hyphenated => cep.hyphenated(),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::BrasilApi => f.write_str("BrasilAPI"),
            Provider::ViaCep => f.write_str("ViaCEP"),
        }
    }
}

impl FromStr for Provider {
    type Err = CepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brasilapi" => Ok(Provider::BrasilApi),
            "viacep" => Ok(Provider::ViaCep),
            _ => Err(CepError::UnknownProvider {
                name: s.to_string(),
            }),
        }
    }
}

/// 統一的地址格式，欄位可以是空字串
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "zipCode")]
    pub zip_code: String,
}

/// One fetcher's result: the raw body on success, the provider error otherwise.
#[derive(Debug)]
pub struct RawProviderResponse {
    pub provider: Provider,
    pub payload: Result<Vec<u8>>,
}

impl RawProviderResponse {
    pub fn body(provider: Provider, body: Vec<u8>) -> Self {
        Self {
            provider,
            payload: Ok(body),
        }
    }

    pub fn failed(provider: Provider, error: CepError) -> Self {
        Self {
            provider,
            payload: Err(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Arbitration {
    /// 跳過失敗的回應，繼續等待下一個 provider
    #[default]
    Drain,
    /// 第一個抵達的回應即為最終結果，不論成功與否
    #[serde(alias = "first")]
    FirstArrival,
}

impl FromStr for Arbitration {
    type Err = CepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drain" => Ok(Arbitration::Drain),
            "first" | "first-arrival" => Ok(Arbitration::FirstArrival),
            other => Err(CepError::InvalidConfigValueError {
                field: "arbitration".to_string(),
                value: other.to_string(),
                reason: "Expected 'drain' or 'first-arrival'".to_string(),
            }),
        }
    }
}

#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: Provider,
    pub error: CepError,
}

/// Terminal state of one race.
#[derive(Debug)]
pub enum LookupOutcome {
    Success { address: Address, provider: Provider },
    ProviderError { provider: Provider, cause: CepError },
    Timeout,
    Exhausted { failures: Vec<ProviderFailure> },
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupResult {
    pub address: Address,
    pub provider: Provider,
    pub elapsed_ms: u64,
    pub resolved_at: DateTime<Utc>,
}
