//! Unit tests for configuration validation.

#[path = "common/test_constants.rs"]
mod test_constants;

use std::time::Duration;

use provider_openstack::config::{ConfigError, ProviderConfig};
use provider_openstack::telemetry::LogFormat;
use rstest::*;

use test_constants::{DEFAULT_ENDPOINT, DEFAULT_TOKEN};

#[fixture]
fn valid_config() -> ProviderConfig {
    ProviderConfig {
        compute_endpoint: String::from(DEFAULT_ENDPOINT),
        auth_token: String::from(DEFAULT_TOKEN),
        request_timeout_secs: 30,
        poll_interval_secs: 60,
        error_backoff_secs: 30,
        field_manager: String::from("provider-openstack"),
        log_format: String::from("text"),
    }
}

#[rstest]
fn config_validation_accepts_complete_config(valid_config: ProviderConfig) {
    valid_config
        .validate()
        .unwrap_or_else(|err| panic!("valid config should pass: {err}"));
}

#[rstest]
fn config_validation_rejects_missing_token_with_actionable_error(valid_config: ProviderConfig) {
    let cfg = ProviderConfig {
        auth_token: String::from("  "),
        ..valid_config
    };

    let error = cfg.validate().expect_err("token is required");
    let ConfigError::MissingField(ref message) = error else {
        panic!("expected MissingField error");
    };
    assert!(
        message.contains("OS_AUTH_TOKEN"),
        "error should mention env var: {message}"
    );
    assert!(
        message.contains("provider-openstack.toml"),
        "error should mention config file: {message}"
    );
    assert!(
        message.contains("auth_token"),
        "error should mention TOML key: {message}"
    );
}

#[rstest]
#[case::endpoint(|cfg: &mut ProviderConfig| cfg.compute_endpoint.clear(), "OS_COMPUTE_ENDPOINT", "compute_endpoint")]
#[case::field_manager(|cfg: &mut ProviderConfig| cfg.field_manager.clear(), "OS_FIELD_MANAGER", "field_manager")]
#[case::timeout(|cfg: &mut ProviderConfig| cfg.request_timeout_secs = 0, "OS_REQUEST_TIMEOUT_SECS", "request_timeout_secs")]
#[case::poll(|cfg: &mut ProviderConfig| cfg.poll_interval_secs = 0, "OS_POLL_INTERVAL_SECS", "poll_interval_secs")]
#[case::backoff(|cfg: &mut ProviderConfig| cfg.error_backoff_secs = 0, "OS_ERROR_BACKOFF_SECS", "error_backoff_secs")]
#[case::log_format(|cfg: &mut ProviderConfig| cfg.log_format = String::from("xml"), "OS_LOG_FORMAT", "log_format")]
fn config_validation_produces_actionable_errors(
    valid_config: ProviderConfig,
    #[case] mutate: fn(&mut ProviderConfig),
    #[case] env_var: &str,
    #[case] toml_key: &str,
) {
    let mut cfg = valid_config;
    mutate(&mut cfg);

    let message = cfg
        .validate()
        .expect_err("validation should fail")
        .to_string();
    assert!(
        message.contains(env_var),
        "error should mention env var {env_var}: {message}"
    );
    assert!(
        message.contains(toml_key),
        "error should mention TOML key {toml_key}: {message}"
    );
}

#[rstest]
fn settings_reflect_configured_durations(valid_config: ProviderConfig) {
    let cfg = ProviderConfig {
        poll_interval_secs: 120,
        error_backoff_secs: 5,
        field_manager: String::from(" custom-manager "),
        ..valid_config
    };

    let settings = cfg
        .settings()
        .unwrap_or_else(|err| panic!("settings should build: {err}"));

    assert_eq!(settings.poll_interval, Duration::from_secs(120));
    assert_eq!(settings.error_backoff, Duration::from_secs(5));
    assert_eq!(settings.field_manager, "custom-manager");
}

#[rstest]
#[case("text", LogFormat::Text)]
#[case("json", LogFormat::Json)]
fn log_format_is_parsed(
    valid_config: ProviderConfig,
    #[case] raw: &str,
    #[case] expected: LogFormat,
) {
    let cfg = ProviderConfig {
        log_format: String::from(raw),
        ..valid_config
    };
    assert_eq!(cfg.log_format(), Ok(expected));
}

#[rstest]
fn request_timeout_uses_seconds(valid_config: ProviderConfig) {
    assert_eq!(valid_config.request_timeout(), Duration::from_secs(30));
}
