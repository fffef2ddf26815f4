use crate::config::toml_config::TomlConfig;
use crate::domain::model::Arbitration;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "cep-lookup")]
#[command(about = "Resolve a Brazilian CEP by racing several address providers")]
pub struct CliConfig {
    /// CEP to resolve, e.g. 89010-904
    pub cep: String,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Overall lookup timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Providers to race (comma separated): brasilapi, viacep
    #[arg(long, value_delimiter = ',')]
    pub providers: Vec<String>,

    /// drain (skip failed providers) or first-arrival
    #[arg(long)]
    pub arbitration: Option<Arbitration>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// 載入設定檔（若有指定）並套用命令列覆蓋設定
    pub fn load_settings(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(timeout_ms) = self.timeout_ms {
            tracing::debug!("🔧 Timeout overridden to {}ms", timeout_ms);
            config.lookup.timeout_ms = Some(timeout_ms);
        }
        if !self.providers.is_empty() {
            tracing::debug!("🔧 Providers overridden to {:?}", self.providers);
            config.lookup.providers = Some(self.providers.clone());
        }
        if let Some(arbitration) = self.arbitration {
            tracing::debug!("🔧 Arbitration overridden to {:?}", arbitration);
            config.lookup.arbitration = Some(arbitration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Provider;
    use crate::domain::ports::ConfigProvider;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_parse_minimal_args() {
        let cli = CliConfig::try_parse_from(["cep-lookup", "89010-904"]).unwrap();
        assert_eq!(cli.cep, "89010-904");
        assert!(cli.providers.is_empty());

        let settings = cli.load_settings().unwrap();
        assert_eq!(settings.timeout(), Duration::from_millis(1000));
        assert_eq!(settings.providers().unwrap(), Provider::ALL.to_vec());
    }

    #[test]
    fn test_flags_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cep.toml");
        std::fs::write(
            &path,
            "[lookup]\ntimeout_ms = 3000\nproviders = [\"brasilapi\"]\narbitration = \"drain\"\n",
        )
        .unwrap();

        let cli = CliConfig::try_parse_from([
            "cep-lookup",
            "--config",
            path.to_str().unwrap(),
            "--timeout-ms",
            "200",
            "--providers",
            "viacep,brasilapi",
            "--arbitration",
            "first",
            "01001000",
        ])
        .unwrap();

        let settings = cli.load_settings().unwrap();
        assert_eq!(settings.timeout(), Duration::from_millis(200));
        assert_eq!(
            settings.providers().unwrap(),
            vec![Provider::ViaCep, Provider::BrasilApi]
        );
        assert_eq!(settings.arbitration(), Arbitration::FirstArrival);
    }

    #[test]
    fn test_cep_is_required() {
        assert!(CliConfig::try_parse_from(["cep-lookup"]).is_err());
    }
}
