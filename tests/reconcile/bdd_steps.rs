//! BDD step definitions for instance reconciliation.

use provider_openstack::ProviderInstance;
use provider_openstack::apis::{ConditionType, DeletionPolicy};
use provider_openstack::controller::{apply_pass, cleanup_pass};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

use super::test_helpers::{PassResult, ReconcileContext, desired_instance};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

fn runtime() -> Runtime {
    Runtime::new().unwrap_or_else(|err| panic!("tokio runtime: {err}"))
}

#[given("a desired instance named \"{name}\"")]
fn desired_instance_named(
    mut reconcile_context: ReconcileContext,
    name: String,
) -> ReconcileContext {
    reconcile_context.instance = desired_instance(name.trim());
    reconcile_context
}

#[given("the external name is \"{external_name}\"")]
fn external_name_is(
    mut reconcile_context: ReconcileContext,
    external_name: String,
) -> ReconcileContext {
    reconcile_context.instance.metadata.annotations = Some(
        [(String::from("crossplane.io/external-name"), external_name)]
            .into_iter()
            .collect(),
    );
    reconcile_context
}

#[given("the image is empty")]
fn image_is_empty(mut reconcile_context: ReconcileContext) -> ReconcileContext {
    reconcile_context.instance.spec.for_provider.image.clear();
    reconcile_context
}

#[given("the deletion policy is \"{policy}\"")]
fn deletion_policy_is(
    mut reconcile_context: ReconcileContext,
    policy: String,
) -> ReconcileContext {
    reconcile_context.instance.spec.deletion_policy = match policy.as_str() {
        "Orphan" => DeletionPolicy::Orphan,
        "Delete" => DeletionPolicy::Delete,
        other => panic!("unknown deletion policy: {other}"),
    };
    reconcile_context
}

#[given("the instance has been reconciled once")]
fn reconciled_once(mut reconcile_context: ReconcileContext) -> ReconcileContext {
    let external = reconcile_context.external();
    runtime()
        .block_on(apply_pass(&external, &mut reconcile_context.instance))
        .unwrap_or_else(|err| panic!("initial reconcile failed: {err}"));
    reconcile_context
}

#[given("the provider reports status \"{status}\"")]
fn provider_reports_status(
    reconcile_context: ReconcileContext,
    status: String,
) -> ReconcileContext {
    let Some(id) = reconcile_context.instance.provider_id() else {
        panic!("test setup requires a created instance");
    };
    assert!(
        reconcile_context.backend.set_status(id, &status),
        "instance {id} should exist in the scripted backend"
    );
    reconcile_context
}

#[given("the provider forgets instance {id:u64}")]
fn provider_forgets(reconcile_context: ReconcileContext, id: u64) -> ReconcileContext {
    reconcile_context.backend.forget(id);
    reconcile_context
}

#[given("the provider already runs instance {id:u64} on network \"{network}\"")]
fn provider_runs_instance(
    reconcile_context: ReconcileContext,
    id: u64,
    network: String,
) -> ReconcileContext {
    reconcile_context.backend.insert(ProviderInstance {
        id,
        created: String::from("2024-04-30T08:00:00Z"),
        status: String::from("ACTIVE"),
        network_uuid: network,
        ..ProviderInstance::default()
    });
    reconcile_context
}

#[given("the resource already records provider id {id:u64}")]
fn resource_records_id(mut reconcile_context: ReconcileContext, id: u64) -> ReconcileContext {
    reconcile_context.instance.status_mut().at_provider.id = Some(id);
    reconcile_context
}

#[given("the provider fails the next get")]
fn provider_fails_get(reconcile_context: ReconcileContext) -> ReconcileContext {
    reconcile_context.backend.fail_next_get();
    reconcile_context
}

#[given("the provider fails the next delete")]
fn provider_fails_delete(reconcile_context: ReconcileContext) -> ReconcileContext {
    reconcile_context.backend.fail_next_delete();
    reconcile_context
}

#[when("the instance is reconciled")]
fn instance_reconciled(mut reconcile_context: ReconcileContext) -> ReconcileContext {
    let external = reconcile_context.external();
    let result = runtime().block_on(apply_pass(&external, &mut reconcile_context.instance));
    reconcile_context.outcome = Some(match result {
        Ok(outcome) => PassResult::Applied(outcome),
        Err(err) => PassResult::Failed(err.to_string()),
    });
    reconcile_context
}

#[when("the instance is deleted")]
fn instance_deleted(mut reconcile_context: ReconcileContext) -> ReconcileContext {
    let external = reconcile_context.external();
    let result = runtime().block_on(cleanup_pass(&external, &mut reconcile_context.instance));
    reconcile_context.outcome = Some(match result {
        Ok(outcome) => PassResult::Cleaned(outcome),
        Err(err) => PassResult::Failed(err.to_string()),
    });
    reconcile_context
}

#[then("the create request count for \"{name}\" is {count:usize}")]
fn create_request_count(
    reconcile_context: &ReconcileContext,
    name: String,
    count: usize,
) -> Result<(), StepError> {
    let matching = reconcile_context
        .backend
        .create_requests()
        .iter()
        .filter(|request| request.name == name)
        .count();
    if matching == count {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} create requests for {name}, got {matching}"
        )))
    }
}

#[then("the instance records provider id {id:u64}")]
fn records_provider_id(reconcile_context: &ReconcileContext, id: u64) -> Result<(), StepError> {
    match reconcile_context.instance.provider_id() {
        Some(recorded) if recorded == id => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected provider id {id}, got {other:?}"
        ))),
    }
}

#[then("the {kind} condition reason is \"{reason}\"")]
fn condition_reason(
    reconcile_context: &ReconcileContext,
    kind: String,
    reason: String,
) -> Result<(), StepError> {
    let condition_type = match kind.as_str() {
        "Ready" => ConditionType::Ready,
        "Synced" => ConditionType::Synced,
        other => return Err(StepError::Assertion(format!("unknown condition {other}"))),
    };
    let condition = reconcile_context
        .instance
        .condition(condition_type)
        .ok_or_else(|| StepError::Assertion(format!("missing {kind} condition")))?;
    let actual = format!("{:?}", condition.reason);
    if actual == reason {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {kind} reason {reason}, got {actual}"
        )))
    }
}

#[then("the observed state is \"{state}\"")]
fn observed_state(reconcile_context: &ReconcileContext, state: String) -> Result<(), StepError> {
    let observed = reconcile_context
        .instance
        .status
        .as_ref()
        .and_then(|status| status.at_provider.status)
        .ok_or_else(|| StepError::Assertion(String::from("missing observed state")))?;
    if observed.as_str() == state {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected state {state}, got {observed}"
        )))
    }
}

#[then("the spec network is \"{network}\"")]
fn spec_network(reconcile_context: &ReconcileContext, network: String) -> Result<(), StepError> {
    let actual = reconcile_context.instance.spec.for_provider.network_uuid.as_deref();
    if actual == Some(network.as_str()) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected network {network}, got {actual:?}"
        )))
    }
}

#[then("the spec was late-initialized")]
fn spec_late_initialized(reconcile_context: &ReconcileContext) -> Result<(), StepError> {
    match reconcile_context.outcome.as_ref() {
        Some(PassResult::Applied(outcome)) if outcome.spec_changed() => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected late-initialized spec, got {other:?}"
        ))),
    }
}

#[then("the reconcile fails with \"{message}\"")]
fn reconcile_fails(reconcile_context: &ReconcileContext, message: String) -> Result<(), StepError> {
    match reconcile_context.outcome.as_ref() {
        Some(PassResult::Failed(actual)) if *actual == message => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected failure {message}, got {other:?}"
        ))),
    }
}

#[then("the provider received a delete for instance {id:u64}")]
fn provider_received_delete(
    reconcile_context: &ReconcileContext,
    id: u64,
) -> Result<(), StepError> {
    let calls = reconcile_context.backend.delete_calls();
    if calls == [id] {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected a single delete for {id}, got {calls:?}"
        )))
    }
}

#[then("the provider received no delete calls")]
fn provider_received_no_delete(reconcile_context: &ReconcileContext) -> Result<(), StepError> {
    let calls = reconcile_context.backend.delete_calls();
    if calls.is_empty() {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected no delete calls, got {calls:?}"
        )))
    }
}

#[then("the cleanup outcome is \"{expected}\"")]
fn cleanup_outcome(
    reconcile_context: &ReconcileContext,
    expected: String,
) -> Result<(), StepError> {
    match reconcile_context.outcome.as_ref() {
        Some(PassResult::Cleaned(outcome)) if format!("{outcome:?}") == expected => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected cleanup outcome {expected}, got {other:?}"
        ))),
    }
}
