//! Kubernetes provider for OpenStack compute instances.
//!
//! Users declare an [`Instance`] custom resource. The controller drives an
//! OpenStack-style compute API until a matching server exists, then keeps
//! the resource's status in step with what the provider reports. Deleting the
//! resource deletes the server unless the deletion policy orphans it.

pub mod apis;
pub mod backend;
pub mod compute;
pub mod config;
pub mod controller;
pub mod external;
pub mod openstack;
pub mod telemetry;
pub mod test_support;

pub use apis::{Instance, InstanceParameters, InstanceSpec, InstanceState, InstanceStatus};
pub use backend::{
    BackendError, ComputeBackend, InstanceCreateRequest, InstanceCreateRequestBuilder,
    ProviderInstance,
};
pub use config::{ConfigError, ProviderConfig, ReconcileSettings};
pub use controller::ReconcileError;
pub use external::{
    ExternalCreation, ExternalError, ExternalObservation, ExternalUpdate, InstanceExternal,
};
pub use openstack::{OpenStackBackend, OpenStackBackendError};
pub use test_support::{ScriptedBackend, ScriptedBackendError};
