//! The body of one reconcile pass, independent of the Kubernetes API.
//!
//! Each pass mutates a working copy of the resource. The caller decides what
//! to persist afterwards.

use tracing::{debug, info};

use crate::apis::{Condition, DeletionPolicy, Instance};
use crate::backend::ComputeBackend;
use crate::external::{ExternalError, ExternalObservation, ExternalUpdate, InstanceExternal};

/// What an apply pass did.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ApplyOutcome {
    /// Observation taken at the start of the pass.
    pub observation: ExternalObservation,
    /// Identifier of the instance created during the pass, if any.
    pub created: Option<u64>,
}

impl ApplyOutcome {
    /// Whether the spec changed and must be written back.
    #[must_use]
    pub const fn spec_changed(&self) -> bool {
        self.observation.resource_late_initialized
    }
}

/// What a cleanup pass did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CleanupOutcome {
    /// The provider's instance was deleted, or was already gone.
    Deleted,
    /// The deletion policy kept the provider's instance.
    Orphaned,
}

/// Observes the instance, creates it when absent and records the Synced
/// condition on `instance`.
///
/// # Errors
///
/// Returns the external client's error after recording it as a
/// `ReconcileError` condition.
pub async fn apply_pass<B>(
    external: &InstanceExternal<B>,
    instance: &mut Instance,
) -> Result<ApplyOutcome, ExternalError<B::Error>>
where
    B: ComputeBackend + Send + Sync,
{
    let result = apply_steps(external, instance).await;
    record_sync(instance, result.as_ref().map(|_| ()));
    result
}

async fn apply_steps<B>(
    external: &InstanceExternal<B>,
    instance: &mut Instance,
) -> Result<ApplyOutcome, ExternalError<B::Error>>
where
    B: ComputeBackend + Send + Sync,
{
    let observation = external.observe(instance).await?;
    if !observation.resource_exists {
        let creation = external.create(instance).await?;
        return Ok(ApplyOutcome {
            observation,
            created: Some(creation.id),
        });
    }
    if !observation.resource_up_to_date {
        // Parameters are immutable, so the update sends nothing.
        let _update: ExternalUpdate = external.update(instance);
    }
    Ok(ApplyOutcome {
        observation,
        created: None,
    })
}

/// Deletes the provider's instance unless the deletion policy orphans it.
///
/// # Errors
///
/// Returns the external client's error after recording it as a
/// `ReconcileError` condition.
pub async fn cleanup_pass<B>(
    external: &InstanceExternal<B>,
    instance: &mut Instance,
) -> Result<CleanupOutcome, ExternalError<B::Error>>
where
    B: ComputeBackend + Send + Sync,
{
    if instance.spec.deletion_policy == DeletionPolicy::Orphan {
        info!(instance = %instance.external_name(), "orphaning provider instance");
        instance.set_condition(Condition::reconcile_success());
        return Ok(CleanupOutcome::Orphaned);
    }
    let result = external.delete(instance).await;
    record_sync(instance, result.as_ref().map(|_| ()));
    result.map(|()| CleanupOutcome::Deleted)
}

fn record_sync<E: std::fmt::Display>(instance: &mut Instance, result: Result<(), &E>) {
    match result {
        Ok(()) => instance.set_condition(Condition::reconcile_success()),
        Err(err) => {
            debug!(instance = %instance.external_name(), error = %err, "pass failed");
            instance.set_condition(Condition::reconcile_error(err.to_string()));
        }
    }
}
