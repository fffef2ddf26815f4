use crate::domain::model::{Address, Provider, RawProviderResponse};
use crate::utils::error::{CepError, Result};
use serde::Deserialize;

// 各 provider 的原始格式；缺少或為 null 的欄位一律視為空字串

#[derive(Debug, Deserialize)]
struct ViaCepPayload {
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
    #[serde(default)]
    cep: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BrasilApiPayload {
    #[serde(default)]
    street: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    cep: Option<String>,
}

impl From<ViaCepPayload> for Address {
    fn from(payload: ViaCepPayload) -> Self {
        Address {
            street: payload.logradouro.unwrap_or_default(),
            city: payload.localidade.unwrap_or_default(),
            state: payload.uf.unwrap_or_default(),
            zip_code: payload.cep.unwrap_or_default(),
        }
    }
}

impl From<BrasilApiPayload> for Address {
    fn from(payload: BrasilApiPayload) -> Self {
        Address {
            street: payload.street.unwrap_or_default(),
            city: payload.city.unwrap_or_default(),
            state: payload.state.unwrap_or_default(),
            zip_code: payload.cep.unwrap_or_default(),
        }
    }
}

/// Convert a fetcher result into the canonical [`Address`].
///
/// A response that already carries a provider error is reported as
/// [`CepError::Upstream`]; the race coordinator never normalizes those.
pub fn normalize(raw: &RawProviderResponse) -> Result<Address> {
    match &raw.payload {
        Ok(body) => normalize_payload(raw.provider, body),
        Err(e) => Err(CepError::Upstream {
            provider: raw.provider,
            message: e.to_string(),
        }),
    }
}

pub fn normalize_payload(provider: Provider, body: &[u8]) -> Result<Address> {
    let parse_error = |source: serde_json::Error| CepError::Parse { provider, source };

    match provider {
        Provider::ViaCep => serde_json::from_slice::<ViaCepPayload>(body)
            .map(Address::from)
            .map_err(parse_error),
        Provider::BrasilApi => serde_json::from_slice::<BrasilApiPayload>(body)
            .map(Address::from)
            .map_err(parse_error),
    }
}

/// 以字串標籤指定 provider，未知標籤回傳 [`CepError::UnknownProvider`]
pub fn normalize_tagged(tag: &str, body: &[u8]) -> Result<Address> {
    let provider: Provider = tag.parse()?;
    normalize_payload(provider, body)
}
