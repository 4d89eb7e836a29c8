use std::fs;
use std::path::Path;
use tracing::info;
use xrate::core::RateOrigin;
use xrate::core::config::AppConfig;
use xrate::core::defaults::default_rates;
use xrate::store::{FileSnapshotStore, SnapshotStore};

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const API_KEY: &str = "integration-key";

    pub async fn create_mock_server(base: &str, status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/v6/{API_KEY}/latest/{base}");

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn usd_payload() -> &'static str {
        r#"{
            "result": "success",
            "base_code": "USD",
            "conversion_rates": {
                "USD": 1,
                "EUR": 0.9215,
                "IDR": 15736.45,
                "JPY": 151.2
            }
        }"#
    }
}

fn config_yaml(base_url: &str, data_dir: &Path) -> String {
    format!(
        r#"
api_key: "{}"
provider:
  base_url: "{}"
  timeout_secs: 2
  retries: 0
reference_currency: "USD"
data_path: "{}"
"#,
        test_utils::API_KEY,
        base_url,
        data_dir.display()
    )
}

fn config(base_url: &str, data_dir: &Path) -> AppConfig {
    serde_yaml::from_str(&config_yaml(base_url, data_dir)).expect("Failed to parse test config")
}

#[test_log::test(tokio::test)]
async fn test_convert_with_live_rates() {
    let mock_server = test_utils::create_mock_server("USD", 200, test_utils::usd_payload()).await;
    let data_dir = tempfile::tempdir().unwrap();
    let config = config(&mock_server.uri(), data_dir.path());

    let converter = xrate::build_converter(&config).await.unwrap();
    let converted = converter.convert(100.0, "USD", "EUR").await.unwrap();
    info!(?converted, "Converted with live rates");
    assert!((converted - 92.15).abs() < 1e-9);

    let cached = converter.manager().cache().current().await.unwrap();
    assert_eq!(cached.origin, RateOrigin::Live);

    let snapshot = fs::read_to_string(config.snapshot_path().unwrap()).unwrap();
    assert!(snapshot.contains("\"EUR\": 0.92"));
    assert!(snapshot.contains("\"IDR\": 15736.45"));
}

#[test_log::test(tokio::test)]
async fn test_unreachable_provider_falls_back_to_defaults() {
    let data_dir = tempfile::tempdir().unwrap();
    // Nothing listens on port 1.
    let config = config("http://127.0.0.1:1", data_dir.path());

    let converter = xrate::build_converter(&config).await.unwrap();
    let converted = converter.convert(1.0, "USD", "IDR").await.unwrap();
    assert_eq!(converted, 15925.78);

    let store = FileSnapshotStore::new(config.snapshot_path().unwrap(), 2);
    assert_eq!(store.load().await, default_rates());
}

#[test_log::test(tokio::test)]
async fn test_provider_error_falls_back_to_snapshot() {
    let mock_server = test_utils::create_mock_server(
        "USD",
        200,
        r#"{"result": "error", "error-type": "quota-reached"}"#,
    )
    .await;
    let data_dir = tempfile::tempdir().unwrap();
    let config = config(&mock_server.uri(), data_dir.path());
    fs::write(
        config.snapshot_path().unwrap(),
        "{\n  \"USD\": 1.00,\n  \"GBP\": 0.80,\n}\n",
    )
    .unwrap();

    let converter = xrate::build_converter(&config).await.unwrap();
    let converted = converter.convert(10.0, "GBP", "USD").await.unwrap();
    assert!((converted - 12.5).abs() < 1e-9);

    let cached = converter.manager().cache().current().await.unwrap();
    assert_eq!(cached.origin, RateOrigin::Snapshot);
}

#[test_log::test(tokio::test)]
async fn test_high_value_base_snapshot_converts_offline() {
    let idr_payload = r#"{
        "result": "success",
        "base_code": "IDR",
        "conversion_rates": {"IDR": 1, "USD": 0.0000628, "EUR": 0.0000579, "JPY": 0.0095}
    }"#;
    let mock_server = test_utils::create_mock_server("IDR", 200, idr_payload).await;
    let data_dir = tempfile::tempdir().unwrap();

    let mut online = config(&mock_server.uri(), data_dir.path());
    online.reference_currency = "IDR".to_string();
    let converter = xrate::build_converter(&online).await.unwrap();
    let cached = converter.manager().cache().current().await.unwrap();
    assert_eq!(cached.origin, RateOrigin::Live);

    let snapshot = fs::read_to_string(online.snapshot_path().unwrap()).unwrap();
    assert!(!snapshot.contains(": 0.00,"));
    assert!(snapshot.contains("\"JPY\": 0.0095"));

    let offline = config("http://127.0.0.1:1", data_dir.path());
    let converter = xrate::build_converter(&offline).await.unwrap();
    let usd_to_eur = converter.convert(1.0, "USD", "EUR").await.unwrap();
    assert!((usd_to_eur - 0.0000579 / 0.0000628).abs() < 0.01);
    let usd_to_idr = converter.convert(1.0, "USD", "IDR").await.unwrap();
    assert!((usd_to_idr - 1.0 / 0.0000628).abs() / usd_to_idr < 0.01);
}

#[test_log::test(tokio::test)]
async fn test_persistence_disabled_writes_no_snapshot() {
    let data_dir = tempfile::tempdir().unwrap();
    let mut config = config("http://127.0.0.1:1", data_dir.path());
    config.persist = false;

    let converter = xrate::build_converter(&config).await.unwrap();
    assert_eq!(converter.convert(1.0, "USD", "IDR").await.unwrap(), 15925.78);

    let cached = converter.manager().cache().current().await.unwrap();
    assert_eq!(cached.origin, RateOrigin::Snapshot);
    assert!(!config.snapshot_path().unwrap().exists());
}

#[test_log::test(tokio::test)]
async fn test_rates_command_fetches_requested_base_only() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    let eur_payload = r#"{"result": "success", "conversion_rates": {"EUR": 1, "USD": 1.08}}"#;
    Mock::given(method("GET"))
        .and(path(format!("/v6/{}/latest/EUR", test_utils::API_KEY)))
        .respond_with(ResponseTemplate::new(200).set_body_string(eur_payload))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v6/{}/latest/USD", test_utils::API_KEY)))
        .respond_with(ResponseTemplate::new(200).set_body_string(test_utils::usd_payload()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let data_dir = tempfile::tempdir().unwrap();
    let config_file = tempfile::NamedTempFile::new().unwrap();
    fs::write(
        config_file.path(),
        config_yaml(&mock_server.uri(), data_dir.path()),
    )
    .unwrap();

    let result = xrate::run_command(
        xrate::AppCommand::Rates {
            base: Some("EUR".to_string()),
        },
        config_file.path().to_str(),
    )
    .await;
    assert!(result.is_ok(), "Rates failed with: {:?}", result.err());
    mock_server.verify().await;
}

#[test_log::test(tokio::test)]
async fn test_unknown_currency_is_reported() {
    let mock_server = test_utils::create_mock_server("USD", 200, test_utils::usd_payload()).await;
    let data_dir = tempfile::tempdir().unwrap();
    let config = config(&mock_server.uri(), data_dir.path());

    let converter = xrate::build_converter(&config).await.unwrap();
    let err = converter.convert(10.0, "USD", "XXX").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid currency: XXX");
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_mock_server("USD", 200, test_utils::usd_payload()).await;
    let data_dir = tempfile::tempdir().unwrap();

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(
        config_file.path(),
        config_yaml(&mock_server.uri(), data_dir.path()),
    )
    .expect("Failed to write config file");
    let config_path = config_file.path().to_str().unwrap();

    let result = xrate::run_command(
        xrate::AppCommand::Convert {
            amount: 5.0,
            from: "USD".to_string(),
            to: "JPY".to_string(),
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());

    let result = xrate::run_command(
        xrate::AppCommand::Rates {
            base: Some("USD".to_string()),
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "Rates failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_convert_command_surfaces_invalid_currency() {
    let mock_server = test_utils::create_mock_server("USD", 200, test_utils::usd_payload()).await;
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = tempfile::NamedTempFile::new().unwrap();
    fs::write(
        config_file.path(),
        config_yaml(&mock_server.uri(), data_dir.path()),
    )
    .unwrap();

    let result = xrate::run_command(
        xrate::AppCommand::Convert {
            amount: 5.0,
            from: "USD".to_string(),
            to: "XXX".to_string(),
        },
        config_file.path().to_str(),
    )
    .await;
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("Invalid currency: XXX"));
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails() {
    let result = xrate::run_command(
        xrate::AppCommand::Rates { base: None },
        Some("/nonexistent/xrate/config.yaml"),
    )
    .await;
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file")
    );
}

#[test_log::test(tokio::test)]
async fn test_codes_command_needs_no_config() {
    let result = xrate::run_command(xrate::AppCommand::Codes, Some("/nonexistent.yaml")).await;
    assert!(result.is_ok());
}
