use cep_lookup::utils::validation::Validate;
use cep_lookup::{CepError, CepLookup, Provider, TomlConfig};
use httpmock::prelude::*;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn config_for(brasilapi: &str, viacep: &str, timeout_ms: u64) -> TomlConfig {
    let config = TomlConfig::from_toml_str(&format!(
        r#"
[lookup]
timeout_ms = {}

[providers.brasilapi]
url = "{}"

[providers.viacep]
url = "{}"
"#,
        timeout_ms, brasilapi, viacep
    ))
    .unwrap();
    config.validate().unwrap();
    config
}

fn mock_config(server: &MockServer, timeout_ms: u64) -> TomlConfig {
    config_for(
        &server.url("/api/cep/v1/{cep}"),
        &server.url("/ws/{cep}/json/"),
        timeout_ms,
    )
}

#[tokio::test]
async fn test_brasilapi_answers_first() {
    let server = MockServer::start();

    let brasilapi_mock = server.mock(|when, then| {
        when.method(GET).path("/api/cep/v1/89010904");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "street": "Rua X",
                "city": "Curitiba",
                "state": "PR",
                "cep": "89010904"
            }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/ws/89010-904/json/");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(serde_json::json!({ "logradouro": "late" }));
    });

    let lookup = CepLookup::from_config(&mock_config(&server, 2000)).unwrap();
    let started = Instant::now();
    let result = lookup.lookup("89010-904").await.unwrap();

    // 慢的 provider 被取消，不需等到它回應
    assert!(started.elapsed() < Duration::from_secs(2));
    brasilapi_mock.assert();
    assert_eq!(result.provider, Provider::BrasilApi);
    assert_eq!(result.address.street, "Rua X");
    assert_eq!(result.address.city, "Curitiba");
    assert_eq!(result.address.state, "PR");
    assert_eq!(result.address.zip_code, "89010904");
}

#[tokio::test]
async fn test_viacep_uses_hyphenated_cep() {
    let server = MockServer::start();

    let viacep_mock = server.mock(|when, then| {
        when.method(GET).path("/ws/01001-000/json/");
        then.status(200).json_body(serde_json::json!({
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP"
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/cep/v1/01001000");
        then.status(500);
    });

    let lookup = CepLookup::from_config(&mock_config(&server, 2000)).unwrap();
    let result = lookup.lookup("01001000").await.unwrap();

    viacep_mock.assert();
    assert_eq!(result.provider, Provider::ViaCep);
    assert_eq!(result.address.street, "Praça da Sé");
    assert_eq!(result.address.city, "São Paulo");
    assert_eq!(result.address.zip_code, "01001-000");
}

#[tokio::test]
async fn test_not_found_on_both_providers() {
    let server = MockServer::start();

    let brasilapi_mock = server.mock(|when, then| {
        when.method(GET).path("/api/cep/v1/00000000");
        then.status(404).json_body(serde_json::json!({
            "name": "CepPromiseError",
            "message": "Todos os serviços de CEP retornaram erro."
        }));
    });
    let viacep_mock = server.mock(|when, then| {
        when.method(GET).path("/ws/00000-000/json/");
        then.status(404);
    });

    let lookup = CepLookup::from_config(&mock_config(&server, 2000)).unwrap();
    let result = lookup.lookup("00000-000").await;

    brasilapi_mock.assert();
    viacep_mock.assert();
    assert!(matches!(
        result,
        Err(CepError::AllProvidersFailed { attempted: 2 })
    ));
}

#[tokio::test]
async fn test_slow_providers_time_out() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/api/cep/v1/89010904");
        then.status(200)
            .delay(Duration::from_millis(100))
            .json_body(serde_json::json!({ "city": "Curitiba" }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/ws/89010-904/json/");
        then.status(200)
            .delay(Duration::from_millis(100))
            .json_body(serde_json::json!({ "localidade": "Curitiba" }));
    });

    let lookup = CepLookup::from_config(&mock_config(&server, 1)).unwrap();
    let result = lookup.lookup("89010-904").await;

    assert!(matches!(result, Err(CepError::Timeout { timeout_ms: 1 })));
}

#[tokio::test]
async fn test_unreachable_providers_fail_without_timing_out() {
    // 兩個 provider 都指向已關閉的埠
    let config = config_for(
        "http://127.0.0.1:1/api/cep/v1/{cep}",
        "http://127.0.0.1:1/ws/{cep}/json/",
        10_000,
    );
    let lookup = CepLookup::from_config(&config).unwrap();

    let started = Instant::now();
    let result = lookup.lookup("89010-904").await;

    assert!(matches!(result, Err(CepError::AllProvidersFailed { .. })));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_malformed_first_response_falls_through() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/api/cep/v1/89010904");
        then.status(200)
            .header("Content-Type", "text/html")
            .body("<html>Service Unavailable</html>");
    });
    server.mock(|when, then| {
        when.method(GET).path("/ws/89010-904/json/");
        then.status(200)
            .delay(Duration::from_millis(50))
            .json_body(serde_json::json!({
                "logradouro": "Rua Doutor Luiz de Freitas Melro",
                "localidade": "Blumenau",
                "uf": "SC",
                "cep": "89010-904"
            }));
    });

    let lookup = CepLookup::from_config(&mock_config(&server, 2000)).unwrap();
    let result = lookup.lookup("89010904").await.unwrap();

    assert_eq!(result.provider, Provider::ViaCep);
    assert_eq!(result.address.city, "Blumenau");
}

#[tokio::test]
async fn test_invalid_cep_never_reaches_the_network() {
    let server = MockServer::start();
    let any_mock = server.mock(|when, then| {
        when.method(GET);
        then.status(200).body("{}");
    });

    let lookup = CepLookup::from_config(&mock_config(&server, 2000)).unwrap();
    let result = lookup.lookup("8901-0904-1").await;

    assert!(matches!(result, Err(CepError::InvalidCep { .. })));
    assert_eq!(any_mock.hits(), 0);
}

#[tokio::test]
async fn test_config_file_and_json_output() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/cep/v1/89010904");
        then.status(200).json_body(serde_json::json!({
            "street": "Rua X",
            "city": "Curitiba",
            "state": "PR",
            "cep": "89010904"
        }));
    });

    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("cep-lookup.toml");
    let config_content = format!(
        r#"
[lookup]
timeout_ms = 2000
providers = ["brasilapi"]

[providers.brasilapi]
url = "{}"

[http]
user_agent = "cep-lookup-test"
"#,
        server.url("/api/cep/v1/{cep}")
    );
    tokio::fs::write(&config_path, config_content).await?;

    let config = TomlConfig::from_file(&config_path)?;
    config.validate()?;
    let lookup = CepLookup::from_config(&config)?;
    let result = lookup.lookup("89010-904").await?;

    let json = serde_json::to_value(&result)?;
    assert_eq!(json["provider"], "brasilapi");
    assert_eq!(json["address"]["zipCode"], "89010904");
    assert_eq!(json["address"]["city"], "Curitiba");
    assert!(json["resolved_at"].is_string());

    Ok(())
}
