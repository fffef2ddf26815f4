use crate::domain::model::Cep;
use crate::utils::error::{CepError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub const CEP_LENGTH: usize = 8;

/// 驗證並清理 CEP：移除所有 `-` 後必須剛好是 8 位數字
pub fn validate_cep(raw: &str) -> Result<Cep> {
    let cleaned: String = raw.chars().filter(|c| *c != '-').collect();

    if cleaned.len() != CEP_LENGTH || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CepError::InvalidCep {
            input: raw.to_string(),
        });
    }

    Ok(Cep::from_validated(cleaned))
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CepError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// 端點模板必須包含 `{cep}`，且代入範例 CEP 後是合法的 http(s) URL
pub fn validate_endpoint_template(field_name: &str, template: &str) -> Result<()> {
    if !template.contains("{cep}") {
        return Err(CepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: template.to_string(),
            reason: "Template must contain the {cep} placeholder".to_string(),
        });
    }

    validate_url(field_name, &template.replace("{cep}", "01001000"))
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(CepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
