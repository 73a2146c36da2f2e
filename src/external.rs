//! Observe, create, update and delete for `Instance` resources.
//!
//! [`InstanceExternal`] is the adapter the reconciler calls on every pass. It
//! reads the desired spec, talks to the compute API through a
//! [`ComputeBackend`], and writes what it saw back onto the resource's status.
//! Persisting those changes is left to the caller.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::apis::{Condition, Instance, InstanceState};
use crate::backend::{BackendError, ComputeBackend};
use crate::compute::{generate_instance, late_initialize_spec, observation_from};

/// Result of observing the external resource.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExternalObservation {
    /// Whether the provider has an instance for the resource.
    pub resource_exists: bool,
    /// Whether the provider's instance matches the desired spec.
    pub resource_up_to_date: bool,
    /// Whether optional spec fields were filled from the provider's record.
    pub resource_late_initialized: bool,
}

impl ExternalObservation {
    const fn absent() -> Self {
        Self {
            resource_exists: false,
            resource_up_to_date: false,
            resource_late_initialized: false,
        }
    }
}

/// Result of creating the external resource.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExternalCreation {
    /// Identifier the provider assigned to the new instance.
    pub id: u64,
}

/// Result of updating the external resource. Instances are immutable, so this
/// carries nothing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExternalUpdate;

/// Errors raised by [`InstanceExternal`] operations.
#[derive(Debug, Error)]
pub enum ExternalError<E>
where
    E: std::error::Error + 'static,
{
    /// The instance could not be fetched.
    #[error("cannot get instance: {0}")]
    Get(#[source] E),
    /// The provider rejected or failed the create call.
    #[error("creation of Instance resource has failed: {0}")]
    Create(#[source] E),
    /// The provider rejected or failed the delete call.
    #[error("deletion of Instance resource has failed: {0}")]
    Delete(#[source] E),
    /// The create request could not be built from the spec.
    #[error("creation of Instance resource has failed: {0}")]
    Request(#[from] BackendError),
}

/// External client bound to a compute backend.
#[derive(Clone, Debug)]
pub struct InstanceExternal<B> {
    backend: B,
}

impl<B> InstanceExternal<B>
where
    B: ComputeBackend + Send + Sync,
{
    /// Wraps a backend.
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Observes the provider's instance and copies it onto the resource.
    ///
    /// An instance with no recorded identifier, or whose identifier the
    /// provider no longer knows, is reported as absent. Otherwise unset
    /// optional spec fields are late-initialized, `status.atProvider` is
    /// refreshed and the Ready condition follows the provider state.
    ///
    /// # Errors
    ///
    /// Returns [`ExternalError::Get`] when the provider call fails for any
    /// reason other than "not found".
    pub async fn observe(
        &self,
        instance: &mut Instance,
    ) -> Result<ExternalObservation, ExternalError<B::Error>> {
        let Some(id) = instance.provider_id() else {
            debug!(instance = %instance.external_name(), "no provider id recorded");
            return Ok(ExternalObservation::absent());
        };

        let observed = match self.backend.get(id).await {
            Ok(observed) => observed,
            Err(err) if B::is_not_found(&err) => {
                info!(instance = %instance.external_name(), id, "instance no longer exists");
                return Ok(ExternalObservation::absent());
            }
            Err(err) => return Err(ExternalError::Get(err)),
        };

        let late_initialized = late_initialize_spec(&mut instance.spec.for_provider, &observed);
        let observation = observation_from(&observed);
        let state = observation.status.unwrap_or(InstanceState::Unknown);
        instance.status_mut().at_provider = observation;

        match state {
            InstanceState::Build => instance.set_condition(Condition::creating()),
            InstanceState::Active => instance.set_condition(Condition::available()),
            InstanceState::Error => instance.set_condition(Condition::unavailable()),
            _ => {}
        }

        debug!(
            instance = %instance.external_name(),
            id,
            state = %state,
            late_initialized,
            "observed instance"
        );
        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: true,
            resource_late_initialized: late_initialized,
        })
    }

    /// Creates the instance and records the provider's identity on the
    /// resource.
    ///
    /// # Errors
    ///
    /// Returns [`ExternalError::Request`] when a required field is empty and
    /// [`ExternalError::Create`] when the provider call fails.
    pub async fn create(
        &self,
        instance: &mut Instance,
    ) -> Result<ExternalCreation, ExternalError<B::Error>> {
        instance.set_condition(Condition::creating());
        let name = instance.external_name();
        let request = generate_instance(&name, &instance.spec.for_provider)?;

        let created = self
            .backend
            .create(&request)
            .await
            .map_err(ExternalError::Create)?;

        instance.status_mut().at_provider = observation_from(&created);
        info!(instance = %name, id = created.id, status = %created.status, "created instance");
        Ok(ExternalCreation { id: created.id })
    }

    /// Instances cannot be changed after creation, so this does nothing.
    #[must_use]
    pub fn update(&self, instance: &Instance) -> ExternalUpdate {
        debug!(instance = %instance.external_name(), "update is a no-op");
        ExternalUpdate
    }

    /// Deletes the provider's instance.
    ///
    /// Nothing is called when no identifier was recorded, and an instance the
    /// provider already forgot counts as deleted.
    ///
    /// # Errors
    ///
    /// Returns [`ExternalError::Delete`] when the provider call fails.
    pub async fn delete(&self, instance: &mut Instance) -> Result<(), ExternalError<B::Error>> {
        instance.set_condition(Condition::deleting());
        let Some(id) = instance.provider_id() else {
            debug!(instance = %instance.external_name(), "nothing to delete");
            return Ok(());
        };

        match self.backend.delete(id).await {
            Ok(()) => {
                info!(instance = %instance.external_name(), id, "deleted instance");
                Ok(())
            }
            Err(err) if B::is_not_found(&err) => {
                warn!(instance = %instance.external_name(), id, "instance already gone");
                Ok(())
            }
            Err(err) => Err(ExternalError::Delete(err)),
        }
    }
}
