//! Shared fixtures for reconcile BDD scenarios.

use provider_openstack::apis::{DeletionPolicy, Instance, InstanceParameters, InstanceSpec};
use provider_openstack::controller::{ApplyOutcome, CleanupOutcome};
use provider_openstack::test_support::ScriptedBackend;
use provider_openstack::InstanceExternal;
use rstest::fixture;

use crate::test_constants::{DEFAULT_FLAVOR, DEFAULT_IMAGE, DEFAULT_REGION};

#[derive(Clone, Debug)]
pub enum PassResult {
    Applied(ApplyOutcome),
    Cleaned(CleanupOutcome),
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct ReconcileContext {
    pub backend: ScriptedBackend,
    pub instance: Instance,
    pub outcome: Option<PassResult>,
}

impl ReconcileContext {
    pub fn external(&self) -> InstanceExternal<ScriptedBackend> {
        InstanceExternal::new(self.backend.clone())
    }
}

#[fixture]
pub fn reconcile_context() -> ReconcileContext {
    ReconcileContext {
        backend: ScriptedBackend::new(),
        instance: desired_instance("instance"),
        outcome: None,
    }
}

pub fn desired_instance(name: &str) -> Instance {
    Instance::new(
        name,
        InstanceSpec {
            for_provider: InstanceParameters {
                region: String::from(DEFAULT_REGION),
                flavor: String::from(DEFAULT_FLAVOR),
                image: String::from(DEFAULT_IMAGE),
                ..InstanceParameters::default()
            },
            deletion_policy: DeletionPolicy::Delete,
        },
    )
}
