//! Errors surfaced to the controller runtime.

use kube::runtime::finalizer;
use thiserror::Error;

use crate::external::ExternalError;

/// Errors raised by a reconcile pass.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The Kubernetes API rejected a read or patch.
    #[error("kubernetes API error: {0}")]
    Kube(#[from] kube::Error),
    /// The external client failed.
    #[error("{0}")]
    External(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// A patch body could not be serialised.
    #[error("failed to serialise patch: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Adding or removing the finalizer failed, or the wrapped pass failed.
    #[error("finalizer error: {0}")]
    Finalizer(#[source] Box<finalizer::Error<ReconcileError>>),
}

impl<E> From<ExternalError<E>> for ReconcileError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(value: ExternalError<E>) -> Self {
        Self::External(Box::new(value))
    }
}

impl From<finalizer::Error<Self>> for ReconcileError {
    fn from(value: finalizer::Error<Self>) -> Self {
        Self::Finalizer(Box::new(value))
    }
}
