//! Managed-resource conditions surfaced on `status.conditions`.

use chrono::{SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of condition.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionType {
    /// Whether the external resource is ready for use.
    Ready,
    /// Whether the last reconcile pass succeeded.
    Synced,
}

/// Truth value of a condition.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
    /// The condition holds.
    True,
    /// The condition does not hold.
    False,
    /// The controller cannot tell.
    Unknown,
}

/// Machine-readable reason for the current condition status.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionReason {
    /// The external resource is available.
    Available,
    /// The external resource is not available.
    Unavailable,
    /// The external resource is being created.
    Creating,
    /// The external resource is being deleted.
    Deleting,
    /// The last reconcile pass succeeded.
    ReconcileSuccess,
    /// The last reconcile pass failed.
    ReconcileError,
}

/// A single observed condition of a managed resource.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition kind.
    #[serde(rename = "type")]
    pub kind: ConditionType,
    /// Condition status.
    pub status: ConditionStatus,
    /// Reason for the status.
    pub reason: ConditionReason,
    /// When the status last changed, in RFC 3339 format.
    pub last_transition_time: String,
    /// Human-readable detail, usually an error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    fn new(kind: ConditionType, status: ConditionStatus, reason: ConditionReason) -> Self {
        Self {
            kind,
            status,
            reason,
            last_transition_time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            message: None,
        }
    }

    /// Ready condition for an instance that can be used.
    #[must_use]
    pub fn available() -> Self {
        Self::new(
            ConditionType::Ready,
            ConditionStatus::True,
            ConditionReason::Available,
        )
    }

    /// Ready condition for an instance the provider reports as failed.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(
            ConditionType::Ready,
            ConditionStatus::False,
            ConditionReason::Unavailable,
        )
    }

    /// Ready condition for an instance that is still being built.
    #[must_use]
    pub fn creating() -> Self {
        Self::new(
            ConditionType::Ready,
            ConditionStatus::False,
            ConditionReason::Creating,
        )
    }

    /// Ready condition for an instance that is being removed.
    #[must_use]
    pub fn deleting() -> Self {
        Self::new(
            ConditionType::Ready,
            ConditionStatus::False,
            ConditionReason::Deleting,
        )
    }

    /// Synced condition after a successful reconcile pass.
    #[must_use]
    pub fn reconcile_success() -> Self {
        Self::new(
            ConditionType::Synced,
            ConditionStatus::True,
            ConditionReason::ReconcileSuccess,
        )
    }

    /// Synced condition after a failed reconcile pass.
    #[must_use]
    pub fn reconcile_error(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(
                ConditionType::Synced,
                ConditionStatus::False,
                ConditionReason::ReconcileError,
            )
        }
    }

    /// Compares two conditions ignoring the transition time.
    #[must_use]
    pub fn equivalent(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.status == other.status
            && self.reason == other.reason
            && self.message == other.message
    }
}

/// Replaces the condition of the same kind, keeping the existing entry (and
/// its transition time) when nothing but the timestamp would change.
pub fn set_condition(conditions: &mut Vec<Condition>, condition: Condition) {
    match conditions.iter_mut().find(|existing| existing.kind == condition.kind) {
        Some(existing) if existing.equivalent(&condition) => {}
        Some(existing) => *existing = condition,
        None => conditions.push(condition),
    }
}
