//! Compute API seam used by the external client.
//!
//! The external client never talks HTTP directly. It sequences `get`,
//! `create` and `delete` calls through [`ComputeBackend`], which keeps the
//! field mapping testable against scripted doubles.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Parameters sent to the provider when creating a new instance.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InstanceCreateRequest {
    /// Provider-side name of the instance (the external name).
    pub name: String,
    /// Region slug the instance is placed in.
    pub region: String,
    /// Flavor (size) identifier.
    pub flavor: String,
    /// Image identifier or public image slug.
    pub image: String,
    /// SSH key identifiers or fingerprints embedded at creation.
    pub ssh_keys: Vec<String>,
    /// Whether automated backups are enabled.
    pub backups: bool,
    /// Whether a floating IP is attached to the instance.
    pub floating_networking: bool,
    /// Whether the monitoring agent is installed.
    pub monitoring: bool,
    /// Block storage volumes attached at creation.
    pub volumes: Vec<String>,
    /// Tag names applied after creation.
    pub tags: Vec<String>,
    /// Network the instance joins. Empty means the provider default.
    pub network_uuid: String,
}

impl InstanceCreateRequest {
    /// Starts a builder for an [`InstanceCreateRequest`].
    #[must_use]
    pub fn builder() -> InstanceCreateRequestBuilder {
        InstanceCreateRequestBuilder::new()
    }

    /// Validates the request, returning the name of the first required field
    /// that is empty.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Validation`] when `name`, `region`, `flavor`
    /// or `image` is empty.
    pub fn validate(&self) -> Result<(), BackendError> {
        for (field, value) in [
            ("name", &self.name),
            ("region", &self.region),
            ("flavor", &self.flavor),
            ("image", &self.image),
        ] {
            if value.is_empty() {
                return Err(BackendError::Validation(field.to_owned()));
            }
        }
        Ok(())
    }
}

/// Builder for [`InstanceCreateRequest`] that trims inputs and validates on
/// construction.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InstanceCreateRequestBuilder {
    request: InstanceCreateRequest,
}

impl InstanceCreateRequestBuilder {
    /// Creates an empty builder; required fields must be populated before
    /// build.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the provider-side name.
    #[must_use]
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.request.name = value.into();
        self
    }

    /// Sets the region.
    #[must_use]
    pub fn region(mut self, value: impl Into<String>) -> Self {
        self.request.region = value.into();
        self
    }

    /// Sets the flavor.
    #[must_use]
    pub fn flavor(mut self, value: impl Into<String>) -> Self {
        self.request.flavor = value.into();
        self
    }

    /// Sets the image.
    #[must_use]
    pub fn image(mut self, value: impl Into<String>) -> Self {
        self.request.image = value.into();
        self
    }

    /// Sets the SSH keys.
    #[must_use]
    pub fn ssh_keys(mut self, value: Vec<String>) -> Self {
        self.request.ssh_keys = value;
        self
    }

    /// Enables or disables automated backups.
    #[must_use]
    pub const fn backups(mut self, value: bool) -> Self {
        self.request.backups = value;
        self
    }

    /// Enables or disables the floating IP.
    #[must_use]
    pub const fn floating_networking(mut self, value: bool) -> Self {
        self.request.floating_networking = value;
        self
    }

    /// Enables or disables the monitoring agent.
    #[must_use]
    pub const fn monitoring(mut self, value: bool) -> Self {
        self.request.monitoring = value;
        self
    }

    /// Sets the attached volumes.
    #[must_use]
    pub fn volumes(mut self, value: Vec<String>) -> Self {
        self.request.volumes = value;
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn tags(mut self, value: Vec<String>) -> Self {
        self.request.tags = value;
        self
    }

    /// Sets the network UUID.
    #[must_use]
    pub fn network_uuid(mut self, value: impl Into<String>) -> Self {
        self.request.network_uuid = value.into();
        self
    }

    /// Builds and validates the [`InstanceCreateRequest`], trimming string
    /// inputs.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Validation`] when a required field is empty.
    pub fn build(self) -> Result<InstanceCreateRequest, BackendError> {
        let raw = self.request;
        let request = InstanceCreateRequest {
            name: raw.name.trim().to_owned(),
            region: raw.region.trim().to_owned(),
            flavor: raw.flavor.trim().to_owned(),
            image: raw.image.trim().to_owned(),
            network_uuid: raw.network_uuid.trim().to_owned(),
            ..raw
        };
        request.validate()?;
        Ok(request)
    }
}

/// Instance record as reported by the provider.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProviderInstance {
    /// Provider-assigned numeric identifier.
    pub id: u64,
    /// Creation timestamp in RFC 3339 text format.
    pub created: String,
    /// Raw lifecycle status string (for example `ACTIVE`).
    pub status: String,
    /// Volumes currently attached to the instance.
    pub volume_ids: Vec<String>,
    /// Tags currently applied to the instance.
    pub tags: Vec<String>,
    /// Network the instance belongs to, empty when unknown.
    pub network_uuid: String,
}

/// Errors raised while preparing backend requests.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum BackendError {
    /// Raised when a request is missing a required field.
    #[error("missing or empty field: {0}")]
    Validation(String),
}

/// Future returned by backend operations.
pub type BackendFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Minimal interface implemented by compute providers.
pub trait ComputeBackend {
    /// Provider specific error type returned by the backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches the instance with the given provider identifier.
    fn get(&self, id: u64) -> BackendFuture<'_, ProviderInstance, Self::Error>;

    /// Creates a new instance and returns the provider's initial record.
    fn create<'a>(
        &'a self,
        request: &'a InstanceCreateRequest,
    ) -> BackendFuture<'a, ProviderInstance, Self::Error>;

    /// Deletes the instance with the given provider identifier.
    fn delete(&self, id: u64) -> BackendFuture<'_, (), Self::Error>;

    /// Reports whether an error means the instance does not exist.
    fn is_not_found(error: &Self::Error) -> bool;
}
