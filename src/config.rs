//! Configuration loading via `ortho-config`.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::telemetry::LogFormat;

/// Provider configuration derived from environment variables, configuration
/// files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "OS")]
pub struct ProviderConfig {
    /// Base URL of the compute API (for example
    /// `https://compute.example.com/v2.1`). This value is required; it
    /// defaults to empty so that [`ProviderConfig::validate`] can name the
    /// missing setting.
    #[ortho_config(default = String::new())]
    pub compute_endpoint: String,
    /// Token sent in the `X-Auth-Token` header. This value is required.
    #[ortho_config(default = String::new())]
    pub auth_token: String,
    /// Timeout applied to each compute API request, in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Delay before an instance is observed again after a successful pass.
    #[ortho_config(default = 60)]
    pub poll_interval_secs: u64,
    /// Delay before a failed reconcile pass is retried.
    #[ortho_config(default = 30)]
    pub error_backoff_secs: u64,
    /// Field manager recorded on patches and CRD installs.
    #[ortho_config(default = "provider-openstack".to_owned())]
    pub field_manager: String,
    /// Log output format, `text` or `json`.
    #[ortho_config(default = "text".to_owned())]
    pub log_format: String,
}

/// Metadata for a configuration field, used to generate actionable error
/// messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }

    fn hint(&self) -> String {
        format!(
            "set {} or add {} to [openstack] in provider-openstack.toml",
            self.env_var, self.toml_key
        )
    }
}

/// Reconcile timing derived from [`ProviderConfig`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReconcileSettings {
    /// Requeue delay after a successful pass.
    pub poll_interval: Duration,
    /// Requeue delay after a failed pass.
    pub error_backoff: Duration,
    /// Field manager recorded on patches.
    pub field_manager: String,
}

impl ProviderConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: {}",
                metadata.description,
                metadata.hint()
            )));
        }
        Ok(())
    }

    fn require_positive(value: u64, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::Invalid(format!(
                "{} must be greater than zero: {}",
                metadata.description,
                metadata.hint()
            )));
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("provider-openstack")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Parsed log format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for anything but `text` or `json`.
    pub fn log_format(&self) -> Result<LogFormat, ConfigError> {
        self.log_format.parse().map_err(|_| {
            ConfigError::Invalid(format!(
                "log format must be `text` or `json`, got `{}`: {}",
                self.log_format,
                FieldMetadata::new("log format", "OS_LOG_FORMAT", "log_format").hint()
            ))
        })
    }

    /// Request timeout for the compute API client.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Builds the reconcile timing settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails.
    pub fn settings(&self) -> Result<ReconcileSettings, ConfigError> {
        self.validate()?;
        Ok(ReconcileSettings {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            error_backoff: Duration::from_secs(self.error_backoff_secs),
            field_manager: self.field_manager.trim().to_owned(),
        })
    }

    /// Performs semantic validation. Error messages include guidance on how
    /// to provide values via environment variables or configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty
    /// and [`ConfigError::Invalid`] when a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.compute_endpoint,
            &FieldMetadata::new(
                "compute API endpoint",
                "OS_COMPUTE_ENDPOINT",
                "compute_endpoint",
            ),
        )?;
        Self::require_field(
            &self.auth_token,
            &FieldMetadata::new("compute API token", "OS_AUTH_TOKEN", "auth_token"),
        )?;
        Self::require_field(
            &self.field_manager,
            &FieldMetadata::new("field manager", "OS_FIELD_MANAGER", "field_manager"),
        )?;
        Self::require_positive(
            self.request_timeout_secs,
            &FieldMetadata::new(
                "request timeout",
                "OS_REQUEST_TIMEOUT_SECS",
                "request_timeout_secs",
            ),
        )?;
        Self::require_positive(
            self.poll_interval_secs,
            &FieldMetadata::new(
                "poll interval",
                "OS_POLL_INTERVAL_SECS",
                "poll_interval_secs",
            ),
        )?;
        Self::require_positive(
            self.error_backoff_secs,
            &FieldMetadata::new(
                "error backoff",
                "OS_ERROR_BACKOFF_SECS",
                "error_backoff_secs",
            ),
        )?;
        self.log_format().map(|_| ())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a configuration value is out of range.
    #[error("invalid configuration value: {0}")]
    Invalid(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}
