//! Kubernetes controller glue for `Instance` resources.
//!
//! The runtime's [`Controller`] owns watching, queueing and backoff. This
//! module adds the managed-resource finalizer, runs one pass through the
//! external client, and writes back the late-initialized spec and status.

mod error;
mod pass;
mod retry;

use std::sync::Arc;

use futures::StreamExt;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::api::{ListParams, Patch, PatchParams};
use kube::runtime::controller::{Action, Controller};
use kube::runtime::finalizer::{Event, finalizer};
use kube::runtime::watcher::Config as WatcherConfig;
use kube::{Api, Client, CustomResourceExt, ResourceExt};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::apis::Instance;
use crate::backend::ComputeBackend;
use crate::config::ReconcileSettings;
use crate::external::InstanceExternal;

use retry::{CREATED_STATUS_ATTEMPTS, CREATED_STATUS_DELAY, retry_write};

pub use error::ReconcileError;
pub use pass::{ApplyOutcome, CleanupOutcome, apply_pass, cleanup_pass};

/// Finalizer guarding provider cleanup of managed resources.
pub const FINALIZER: &str = "finalizer.managedresource.crossplane.io";

/// Shared state handed to every reconcile call.
pub struct Context<B> {
    client: Client,
    external: InstanceExternal<B>,
    settings: ReconcileSettings,
}

impl<B> Context<B> {
    /// Bundles the client, external client and timing settings.
    #[must_use]
    pub const fn new(
        client: Client,
        external: InstanceExternal<B>,
        settings: ReconcileSettings,
    ) -> Self {
        Self {
            client,
            external,
            settings,
        }
    }
}

/// Reconciles one `Instance`, adding or honouring the finalizer.
///
/// # Errors
///
/// Returns [`ReconcileError`] when the finalizer update, the external client
/// or a status write fails.
pub async fn reconcile<B>(
    instance: Arc<Instance>,
    ctx: Arc<Context<B>>,
) -> Result<Action, ReconcileError>
where
    B: ComputeBackend + Send + Sync + 'static,
{
    let api: Api<Instance> = Api::all(ctx.client.clone());
    finalizer(&api, FINALIZER, instance, |event| async {
        match event {
            Event::Apply(current) => apply(&api, &ctx, &current).await,
            Event::Cleanup(current) => cleanup(&api, &ctx, &current).await,
        }
    })
    .await
    .map_err(ReconcileError::from)
}

async fn apply<B>(
    api: &Api<Instance>,
    ctx: &Context<B>,
    current: &Instance,
) -> Result<Action, ReconcileError>
where
    B: ComputeBackend + Send + Sync + 'static,
{
    let name = current.name_any();
    let mut working = current.clone();
    match apply_pass(&ctx.external, &mut working).await {
        Ok(outcome) => {
            let field_manager = ctx.settings.field_manager.as_str();
            if let Some(id) = outcome.created {
                record_created(api, &name, &working, field_manager, id).await?;
                return Ok(Action::requeue(ctx.settings.poll_interval));
            }
            if outcome.spec_changed() {
                patch_spec(api, &name, &working, field_manager).await?;
            }
            patch_status(api, &name, &working, field_manager).await?;
            Ok(Action::requeue(ctx.settings.poll_interval))
        }
        Err(err) => {
            persist_status_best_effort(api, &name, &working, &ctx.settings.field_manager).await;
            Err(err.into())
        }
    }
}

async fn cleanup<B>(
    api: &Api<Instance>,
    ctx: &Context<B>,
    current: &Instance,
) -> Result<Action, ReconcileError>
where
    B: ComputeBackend + Send + Sync + 'static,
{
    let name = current.name_any();
    let mut working = current.clone();
    let result = cleanup_pass(&ctx.external, &mut working).await;
    persist_status_best_effort(api, &name, &working, &ctx.settings.field_manager).await;
    let outcome = result?;
    debug!(instance = %name, ?outcome, "cleanup finished");
    Ok(Action::await_change())
}

async fn patch_spec(
    api: &Api<Instance>,
    name: &str,
    instance: &Instance,
    field_manager: &str,
) -> Result<(), ReconcileError> {
    let for_provider = serde_json::to_value(&instance.spec.for_provider)?;
    let body = json!({ "spec": { "forProvider": for_provider } });
    api.patch(name, &PatchParams::apply(field_manager), &Patch::Merge(&body))
        .await?;
    debug!(instance = %name, "persisted late-initialized spec");
    Ok(())
}

async fn patch_status(
    api: &Api<Instance>,
    name: &str,
    instance: &Instance,
    field_manager: &str,
) -> Result<(), ReconcileError> {
    let status = serde_json::to_value(&instance.status)?;
    let body = json!({ "status": status });
    api.patch_status(name, &PatchParams::apply(field_manager), &Patch::Merge(&body))
        .await?;
    Ok(())
}

/// Persists the status of a freshly created instance. The provider identifier
/// lives only in that status, so a lost write would create the instance again
/// on the next pass.
async fn record_created(
    api: &Api<Instance>,
    name: &str,
    instance: &Instance,
    field_manager: &str,
    id: u64,
) -> Result<(), ReconcileError> {
    retry_write(CREATED_STATUS_ATTEMPTS, CREATED_STATUS_DELAY, || {
        patch_status(api, name, instance, field_manager)
    })
    .await
    .inspect_err(|err| {
        error!(
            instance = %name,
            id,
            error = %err,
            "created provider instance but could not record it"
        );
    })?;
    info!(instance = %name, id, "recorded new provider instance");
    Ok(())
}

/// Status write whose failure is only logged, used when the pass already
/// failed or the object is going away.
async fn persist_status_best_effort(
    api: &Api<Instance>,
    name: &str,
    instance: &Instance,
    field_manager: &str,
) {
    if let Err(err) = patch_status(api, name, instance, field_manager).await {
        warn!(instance = %name, error = %err, "failed to persist status");
    }
}

/// Requeues a failed object after the configured backoff.
#[expect(
    clippy::needless_pass_by_value,
    reason = "signature is fixed by kube::runtime::Controller::run"
)]
fn error_policy<B>(
    instance: Arc<Instance>,
    error: &ReconcileError,
    ctx: Arc<Context<B>>,
) -> Action {
    warn!(instance = %instance.name_any(), %error, "reconcile failed");
    Action::requeue(ctx.settings.error_backoff)
}

/// Installs or updates the `Instance` CRD with a server-side apply.
///
/// # Errors
///
/// Returns [`ReconcileError::Kube`] when the API server rejects the apply.
pub async fn install_crd(client: Client, field_manager: &str) -> Result<(), ReconcileError> {
    let crds: Api<CustomResourceDefinition> = Api::all(client);
    let params = PatchParams::apply(field_manager).force();
    info!(crd = Instance::crd_name(), "installing CRD");
    crds.patch(Instance::crd_name(), &params, &Patch::Apply(&Instance::crd()))
        .await?;
    Ok(())
}

/// Runs the controller until a termination signal arrives.
///
/// # Errors
///
/// Returns [`ReconcileError::Kube`] when `Instance` objects cannot be listed,
/// which usually means the CRD is not installed.
pub async fn run<B>(
    client: Client,
    external: InstanceExternal<B>,
    settings: ReconcileSettings,
) -> Result<(), ReconcileError>
where
    B: ComputeBackend + Send + Sync + 'static,
{
    let instances: Api<Instance> = Api::all(client.clone());
    instances.list(&ListParams::default().limit(1)).await?;

    info!(
        poll_interval = ?settings.poll_interval,
        error_backoff = ?settings.error_backoff,
        "starting instance controller"
    );
    let ctx = Arc::new(Context::new(client, external, settings));
    Controller::new(instances, WatcherConfig::default().timeout(25))
        .shutdown_on_signal()
        .run(reconcile, error_policy, ctx)
        .for_each(|result| async move {
            match result {
                Ok((object, action)) => debug!(instance = %object.name, ?action, "reconciled"),
                Err(err) => warn!(error = %err, "reconcile loop error"),
            }
        })
        .await;
    info!("instance controller stopped");
    Ok(())
}
