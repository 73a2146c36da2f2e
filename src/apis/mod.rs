//! Custom resource types served by the provider.

pub mod condition;
pub mod instance;
pub mod manifest;

pub use condition::{Condition, ConditionReason, ConditionStatus, ConditionType};
pub use instance::{
    DeletionPolicy, EXTERNAL_NAME_ANNOTATION, Instance, InstanceObservation, InstanceParameters,
    InstanceSpec, InstanceState, InstanceStatus,
};
pub use manifest::{ManifestError, render_crd, write_crd};
