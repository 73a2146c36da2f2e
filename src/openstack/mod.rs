//! OpenStack compute backend for the instance lifecycle.

mod error;
mod lifecycle;
mod types;

use crate::backend::{BackendFuture, ComputeBackend, InstanceCreateRequest, ProviderInstance};
use crate::config::ProviderConfig;

pub use error::OpenStackBackendError;

/// Backend that manages servers through an OpenStack-style compute API.
#[derive(Clone, Debug)]
pub struct OpenStackBackend {
    http: reqwest::Client,
    endpoint: String,
    auth_token: String,
}

impl OpenStackBackend {
    /// Constructs a new backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OpenStackBackendError::Config`] when the configuration fails
    /// validation or the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self, OpenStackBackendError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| OpenStackBackendError::Config(err.to_string()))?;
        Ok(Self::with_client(
            http,
            &config.compute_endpoint,
            &config.auth_token,
        ))
    }

    /// Constructs a backend around an existing HTTP client.
    #[must_use]
    pub fn with_client(http: reqwest::Client, endpoint: &str, auth_token: &str) -> Self {
        Self {
            http,
            endpoint: endpoint.trim().trim_end_matches('/').to_owned(),
            auth_token: auth_token.trim().to_owned(),
        }
    }

    /// Base URL requests are issued against, without a trailing slash.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ComputeBackend for OpenStackBackend {
    type Error = OpenStackBackendError;

    fn get(&self, id: u64) -> BackendFuture<'_, ProviderInstance, Self::Error> {
        Box::pin(async move { self.fetch_server(id).await })
    }

    fn create<'a>(
        &'a self,
        request: &'a InstanceCreateRequest,
    ) -> BackendFuture<'a, ProviderInstance, Self::Error> {
        Box::pin(async move {
            request.validate()?;
            self.create_server(request).await
        })
    }

    fn delete(&self, id: u64) -> BackendFuture<'_, (), Self::Error> {
        Box::pin(async move { self.delete_server(id).await })
    }

    fn is_not_found(error: &Self::Error) -> bool {
        matches!(error, OpenStackBackendError::NotFound { .. })
    }
}
