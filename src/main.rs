use cep_lookup::utils::error::ErrorSeverity;
use cep_lookup::utils::{logger, validation::Validate};
use cep_lookup::{CepError, CepLookup, CliConfig, LookupResult};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    // 載入並驗證配置
    let settings = match cli.load_settings().and_then(|settings| {
        settings.validate()?;
        Ok(settings)
    }) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    let lookup = match CepLookup::from_config(&settings) {
        Ok(lookup) => lookup,
        Err(e) => exit_with(&e),
    };

    match lookup.lookup(&cli.cep).await {
        Ok(result) if cli.json => println!("{}", serde_json::to_string_pretty(&result)?),
        Ok(result) => print_result(&result),
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn print_result(result: &LookupResult) {
    println!("Resposta de {}:", result.provider);
    println!("Rua: {}", result.address.street);
    println!("Cidade: {}", result.address.city);
    println!("Estado: {}", result.address.state);
    println!("CEP: {}", result.address.zip_code);
}

fn exit_with(e: &CepError) -> ! {
    tracing::error!(
        "❌ Lookup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
