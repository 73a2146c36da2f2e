//! BDD scenarios for instance reconciliation.

use rstest_bdd_macros::scenario;

use super::test_helpers::{ReconcileContext, reconcile_context};

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Create an instance that does not exist yet"
)]
fn scenario_create_missing_instance(reconcile_context: ReconcileContext) {
    drop(reconcile_context);
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Use the external name annotation as the provider name"
)]
fn scenario_external_name_annotation(reconcile_context: ReconcileContext) {
    drop(reconcile_context);
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Report an active instance as available"
)]
fn scenario_active_is_available(reconcile_context: ReconcileContext) {
    drop(reconcile_context);
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Report a failed instance as unavailable"
)]
fn scenario_error_is_unavailable(reconcile_context: ReconcileContext) {
    drop(reconcile_context);
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Treat unknown provider states as unknown"
)]
fn scenario_unknown_state(reconcile_context: ReconcileContext) {
    drop(reconcile_context);
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Recreate an instance the provider no longer knows"
)]
fn scenario_recreate_vanished_instance(reconcile_context: ReconcileContext) {
    drop(reconcile_context);
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Late-initialize the network from the provider"
)]
fn scenario_late_initialize_network(reconcile_context: ReconcileContext) {
    drop(reconcile_context);
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Surface provider read failures"
)]
fn scenario_get_failure(reconcile_context: ReconcileContext) {
    drop(reconcile_context);
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Reject an instance without an image"
)]
fn scenario_missing_image(reconcile_context: ReconcileContext) {
    drop(reconcile_context);
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Delete the provider instance with the resource"
)]
fn scenario_delete_instance(reconcile_context: ReconcileContext) {
    drop(reconcile_context);
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Keep the provider instance when orphaned"
)]
fn scenario_orphan_instance(reconcile_context: ReconcileContext) {
    drop(reconcile_context);
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Skip deletion when nothing was created"
)]
fn scenario_delete_without_id(reconcile_context: ReconcileContext) {
    drop(reconcile_context);
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Surface provider delete failures"
)]
fn scenario_delete_failure(reconcile_context: ReconcileContext) {
    drop(reconcile_context);
}
