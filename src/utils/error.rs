use crate::domain::model::Provider;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CepError {
    #[error("Invalid CEP: {input}")]
    InvalidCep { input: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{provider} returned HTTP {status}")]
    ProviderStatus { provider: Provider, status: u16 },

    #[error("{provider} request was cancelled")]
    Cancelled { provider: Provider },

    #[error("Failed to parse {provider} response: {source}")]
    Parse {
        provider: Provider,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown provider: {name}")]
    UnknownProvider { name: String },

    #[error("{provider} upstream error: {message}")]
    Upstream { provider: Provider, message: String },

    #[error("Lookup timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("All {attempted} providers failed without a usable address")]
    AllProvidersFailed { attempted: usize },

    #[error("{provider} failed: {message}")]
    ProviderFailed { provider: Provider, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Parsing,
    Timeout,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CepError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CepError::InvalidCep { .. } => ErrorCategory::Input,
            CepError::Transport(_)
            | CepError::ProviderStatus { .. }
            | CepError::Cancelled { .. }
            | CepError::Upstream { .. }
            | CepError::AllProvidersFailed { .. }
            | CepError::ProviderFailed { .. } => ErrorCategory::Network,
            CepError::Parse { .. } | CepError::SerializationError(_) => ErrorCategory::Parsing,
            CepError::Timeout { .. } => ErrorCategory::Timeout,
            CepError::UnknownProvider { .. }
            | CepError::ConfigError { .. }
            | CepError::InvalidConfigValueError { .. }
            | CepError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CepError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一 provider 失敗不影響整體查詢
            ErrorCategory::Parsing => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Timeout => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CepError::InvalidCep { .. } => {
                "Provide exactly 8 digits, optionally formatted as 12345-678".to_string()
            }
            CepError::Timeout { timeout_ms } => format!(
                "No provider answered within {}ms; retry later or raise --timeout-ms",
                timeout_ms
            ),
            CepError::AllProvidersFailed { .. } | CepError::ProviderFailed { .. } => {
                "Check that the CEP exists and that the providers are reachable".to_string()
            }
            CepError::UnknownProvider { .. } => {
                "Known providers are: brasilapi, viacep".to_string()
            }
            CepError::ConfigError { .. }
            | CepError::InvalidConfigValueError { .. }
            | CepError::MissingConfigError { .. } => {
                "Review the configuration file and command-line flags".to_string()
            }
            CepError::Transport(_) | CepError::ProviderStatus { .. } | CepError::Cancelled { .. } => {
                "Check network connectivity".to_string()
            }
            CepError::Parse { .. } | CepError::Upstream { .. } | CepError::SerializationError(_) => {
                "The provider returned an unexpected payload; try another provider".to_string()
            }
            CepError::IoError(_) => "Check file permissions and paths".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CepError::InvalidCep { input } => format!("'{}' is not a valid CEP", input),
            CepError::Timeout { .. } => "The address lookup timed out".to_string(),
            CepError::AllProvidersFailed { .. } => {
                "No provider returned an address for this CEP".to_string()
            }
            CepError::ProviderFailed { provider, .. } => {
                format!("The first provider to answer ({}) reported an error", provider)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_category() {
        let invalid = CepError::InvalidCep {
            input: "abc".to_string(),
        };
        assert_eq!(invalid.category(), ErrorCategory::Input);
        assert_eq!(invalid.severity(), ErrorSeverity::High);

        let timeout = CepError::Timeout { timeout_ms: 1000 };
        assert_eq!(timeout.category(), ErrorCategory::Timeout);
        assert_eq!(timeout.severity(), ErrorSeverity::Medium);
        assert!(timeout.recovery_suggestion().contains("1000ms"));
    }
}
