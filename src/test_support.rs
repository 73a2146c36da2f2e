//! Test support utilities shared across unit and integration tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::backend::{BackendFuture, ComputeBackend, InstanceCreateRequest, ProviderInstance};

/// In-memory compute backend that behaves like a tiny cloud.
///
/// Creates assign sequential identifiers starting at 1 and report the
/// instance as `BUILD`. Gets and deletes of unknown identifiers fail with
/// [`ScriptedBackendError::NotFound`]. Failures can be injected per
/// operation, and every create request and delete call is recorded.
#[derive(Clone, Debug, Default)]
pub struct ScriptedBackend {
    state: Arc<Mutex<ScriptedState>>,
}

#[derive(Debug, Default)]
struct ScriptedState {
    next_id: u64,
    instances: BTreeMap<u64, ProviderInstance>,
    created: Vec<InstanceCreateRequest>,
    deleted: Vec<u64>,
    fail_get: bool,
    fail_create: bool,
    fail_delete: bool,
}

/// Errors returned by [`ScriptedBackend`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ScriptedBackendError {
    /// No instance with the identifier exists.
    #[error("instance {id} not found")]
    NotFound {
        /// Requested identifier.
        id: u64,
    },
    /// An injected failure.
    #[error("{operation} unavailable")]
    Unavailable {
        /// Operation that failed.
        operation: &'static str,
    },
}

impl ScriptedBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds an instance as if it had been created out of band.
    pub fn insert(&self, instance: ProviderInstance) {
        let mut state = self.lock();
        state.next_id = state.next_id.max(instance.id);
        state.instances.insert(instance.id, instance);
    }

    /// Changes the reported status of an existing instance. Returns `false`
    /// when the identifier is unknown.
    pub fn set_status(&self, id: u64, status: &str) -> bool {
        let mut state = self.lock();
        let Some(instance) = state.instances.get_mut(&id) else {
            return false;
        };
        status.clone_into(&mut instance.status);
        true
    }

    /// Drops an instance without recording a delete call.
    pub fn forget(&self, id: u64) {
        self.lock().instances.remove(&id);
    }

    /// Makes the next `get` fail with [`ScriptedBackendError::Unavailable`].
    pub fn fail_next_get(&self) {
        self.lock().fail_get = true;
    }

    /// Makes the next `create` fail with [`ScriptedBackendError::Unavailable`].
    pub fn fail_next_create(&self) {
        self.lock().fail_create = true;
    }

    /// Makes the next `delete` fail with [`ScriptedBackendError::Unavailable`].
    pub fn fail_next_delete(&self) {
        self.lock().fail_delete = true;
    }

    /// Returns the instance currently stored under `id`.
    #[must_use]
    pub fn instance(&self, id: u64) -> Option<ProviderInstance> {
        self.lock().instances.get(&id).cloned()
    }

    /// Returns every create request received so far.
    #[must_use]
    pub fn create_requests(&self) -> Vec<InstanceCreateRequest> {
        self.lock().created.clone()
    }

    /// Returns the identifiers passed to `delete`, including unknown ones.
    #[must_use]
    pub fn delete_calls(&self) -> Vec<u64> {
        self.lock().deleted.clone()
    }
}

impl ComputeBackend for ScriptedBackend {
    type Error = ScriptedBackendError;

    fn get(&self, id: u64) -> BackendFuture<'_, ProviderInstance, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            if std::mem::take(&mut state.fail_get) {
                return Err(ScriptedBackendError::Unavailable { operation: "get" });
            }
            state
                .instances
                .get(&id)
                .cloned()
                .ok_or(ScriptedBackendError::NotFound { id })
        })
    }

    fn create<'a>(
        &'a self,
        request: &'a InstanceCreateRequest,
    ) -> BackendFuture<'a, ProviderInstance, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.created.push(request.clone());
            if std::mem::take(&mut state.fail_create) {
                return Err(ScriptedBackendError::Unavailable {
                    operation: "create",
                });
            }
            state.next_id += 1;
            let instance = ProviderInstance {
                id: state.next_id,
                created: String::from("2024-05-01T10:00:00Z"),
                status: String::from("BUILD"),
                volume_ids: request.volumes.clone(),
                tags: request.tags.clone(),
                network_uuid: request.network_uuid.clone(),
            };
            state.instances.insert(instance.id, instance.clone());
            Ok(instance)
        })
    }

    fn delete(&self, id: u64) -> BackendFuture<'_, (), Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.deleted.push(id);
            if std::mem::take(&mut state.fail_delete) {
                return Err(ScriptedBackendError::Unavailable {
                    operation: "delete",
                });
            }
            state
                .instances
                .remove(&id)
                .map(|_| ())
                .ok_or(ScriptedBackendError::NotFound { id })
        })
    }

    fn is_not_found(error: &Self::Error) -> bool {
        matches!(error, ScriptedBackendError::NotFound { .. })
    }
}
