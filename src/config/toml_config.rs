use crate::domain::model::{Arbitration, Provider};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CepError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    pub timeout_ms: Option<u64>,
    pub providers: Option<Vec<String>>,
    pub arbitration: Option<Arbitration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub brasilapi: Option<EndpointConfig>,
    pub viacep: Option<EndpointConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub user_agent: Option<String>,
    pub connect_timeout_ms: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CepError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CepError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${VIACEP_URL})，未設定的變數保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CepError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn timeout_ms(&self) -> u64 {
        self.lookup.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
    }

    /// 解析 provider 名稱，未指定時使用全部已知 provider
    pub fn resolved_providers(&self) -> Result<Vec<Provider>> {
        match &self.lookup.providers {
            Some(names) => names.iter().map(|name| name.parse()).collect(),
            None => Ok(Provider::ALL.to_vec()),
        }
    }

    fn endpoint_config(&self, provider: Provider) -> Option<&EndpointConfig> {
        match provider {
            Provider::BrasilApi => self.providers.brasilapi.as_ref(),
            Provider::ViaCep => self.providers.viacep.as_ref(),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("lookup.timeout_ms", self.timeout_ms(), 1)?;

        if let Some(connect_timeout) = self.http.connect_timeout_ms {
            validation::validate_positive_number("http.connect_timeout_ms", connect_timeout, 1)?;
        }

        if let Some(user_agent) = &self.http.user_agent {
            validation::validate_non_empty_string("http.user_agent", user_agent)?;
        }

        let providers = self.resolved_providers()?;
        if providers.is_empty() {
            return Err(CepError::InvalidConfigValueError {
                field: "lookup.providers".to_string(),
                value: "[]".to_string(),
                reason: "At least one provider is required".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for provider in &providers {
            if !seen.insert(*provider) {
                return Err(CepError::InvalidConfigValueError {
                    field: "lookup.providers".to_string(),
                    value: provider.key().to_string(),
                    reason: "Provider listed more than once".to_string(),
                });
            }
            let field = format!("providers.{}.url", provider.key());
            validation::validate_endpoint_template(&field, self.endpoint_template(*provider))?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms())
    }

    fn providers(&self) -> Result<Vec<Provider>> {
        self.resolved_providers()
    }

    fn endpoint_template(&self, provider: Provider) -> &str {
        self.endpoint_config(provider)
            .map(|endpoint| endpoint.url.as_str())
            .unwrap_or_else(|| provider.default_endpoint())
    }

    fn arbitration(&self) -> Arbitration {
        self.lookup.arbitration.unwrap_or_default()
    }

    fn user_agent(&self) -> &str {
        self.http
            .user_agent
            .as_deref()
            .unwrap_or(crate::adapters::http::DEFAULT_USER_AGENT)
    }

    fn connect_timeout(&self) -> Duration {
        Duration::from_millis(
            self.http
                .connect_timeout_ms
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
        )
    }
}
