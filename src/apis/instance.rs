//! The `Instance` managed resource.

use std::fmt;

use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::condition::{Condition, ConditionType, set_condition};

/// Annotation carrying the provider-side name of a managed resource.
pub const EXTERNAL_NAME_ANNOTATION: &str = "crossplane.io/external-name";

/// Desired state of an OpenStack instance.
///
/// Every field is immutable: it is sent to the provider once, at creation.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct InstanceParameters {
    /// Slug of the region to deploy in.
    pub region: String,
    /// Slug of the flavor selected for this instance.
    pub flavor: String,
    /// ID of a public or private image, or the slug of a public image.
    pub image: String,
    /// IDs or fingerprints of SSH keys embedded in the root account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_keys: Option<Vec<String>>,
    /// Enables automated backups. Can only be set at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backups: Option<bool>,
    /// Attaches a floating IP to the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floating_networking: Option<bool>,
    /// Installs the node exporter agent for monitoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring: Option<bool>,
    /// Block storage volumes attached to the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<String>>,
    /// Tag names applied to the instance after creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// UUID of the network the instance is assigned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_uuid: Option<String>,
}

/// What happens to the provider's instance when the resource is deleted.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum DeletionPolicy {
    /// Delete the provider's instance.
    #[default]
    Delete,
    /// Leave the provider's instance running.
    Orphan,
}

/// Spec of an [`Instance`].
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "compute.openstack.crossplane.io",
    version = "v1alpha1",
    kind = "Instance",
    plural = "instances",
    status = "InstanceStatus",
    category = "crossplane",
    category = "managed",
    category = "openstack",
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#,
    printcolumn = r#"{"name":"STATE","type":"string","jsonPath":".status.atProvider.status"}"#,
    printcolumn = r#"{"name":"ID","type":"integer","jsonPath":".status.atProvider.id"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSpec {
    /// Provider parameters.
    pub for_provider: InstanceParameters,
    /// Deletion behaviour for the provider's instance.
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
}

/// Lifecycle state reported by the compute API.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceState {
    /// Running and usable.
    Active,
    /// Being built.
    Build,
    /// Deleted.
    Deleted,
    /// Failed.
    Error,
    /// Hard reboot in progress.
    HardReboot,
    /// Live migration in progress.
    Migrating,
    /// Password reset in progress.
    Password,
    /// Paused.
    Paused,
    /// Soft reboot in progress.
    Reboot,
    /// Rebuild in progress.
    Rebuild,
    /// In rescue mode.
    Rescue,
    /// Resize in progress.
    Resize,
    /// Resize being reverted.
    RevertResize,
    /// Shelved.
    Shelved,
    /// Shelved and offloaded from its host.
    ShelvedOffloaded,
    /// Powered off.
    Shutoff,
    /// Soft deleted, still recoverable.
    SoftDeleted,
    /// Suspended.
    Suspended,
    /// Resize awaiting confirmation.
    VerifyResize,
    /// State unknown, including any string the provider adds later.
    #[serde(other)]
    Unknown,
}

impl InstanceState {
    /// Wire representation of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Build => "BUILD",
            Self::Deleted => "DELETED",
            Self::Error => "ERROR",
            Self::HardReboot => "HARD_REBOOT",
            Self::Migrating => "MIGRATING",
            Self::Password => "PASSWORD",
            Self::Paused => "PAUSED",
            Self::Reboot => "REBOOT",
            Self::Rebuild => "REBUILD",
            Self::Rescue => "RESCUE",
            Self::Resize => "RESIZE",
            Self::RevertResize => "REVERT_RESIZE",
            Self::Shelved => "SHELVED",
            Self::ShelvedOffloaded => "SHELVED_OFFLOADED",
            Self::Shutoff => "SHUTOFF",
            Self::SoftDeleted => "SOFT_DELETED",
            Self::Suspended => "SUSPENDED",
            Self::Unknown => "UNKNOWN",
            Self::VerifyResize => "VERIFY_RESIZE",
        }
    }

    /// Parses a provider status string. Matching ignores ASCII case and
    /// unrecognised values map to [`InstanceState::Unknown`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        const ALL: [InstanceState; 20] = [
            InstanceState::Active,
            InstanceState::Build,
            InstanceState::Deleted,
            InstanceState::Error,
            InstanceState::HardReboot,
            InstanceState::Migrating,
            InstanceState::Password,
            InstanceState::Paused,
            InstanceState::Reboot,
            InstanceState::Rebuild,
            InstanceState::Rescue,
            InstanceState::Resize,
            InstanceState::RevertResize,
            InstanceState::Shelved,
            InstanceState::ShelvedOffloaded,
            InstanceState::Shutoff,
            InstanceState::SoftDeleted,
            InstanceState::Suspended,
            InstanceState::Unknown,
            InstanceState::VerifyResize,
        ];
        let trimmed = raw.trim();
        ALL.into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(trimmed))
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observed state of the provider's instance.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceObservation {
    /// Creation timestamp in RFC 3339 text format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    /// Identifier assigned by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Lifecycle state of the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InstanceState>,
}

/// Status of an [`Instance`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceStatus {
    /// Managed-resource conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    /// State observed at the provider.
    #[serde(default)]
    pub at_provider: InstanceObservation,
}

impl Instance {
    /// Provider-side name: the external-name annotation when set, otherwise
    /// the object name.
    #[must_use]
    pub fn external_name(&self) -> String {
        self.annotations()
            .get(EXTERNAL_NAME_ANNOTATION)
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map_or_else(|| self.name_any(), str::to_owned)
    }

    /// Provider identifier recorded by a previous create.
    #[must_use]
    pub fn provider_id(&self) -> Option<u64> {
        self.status.as_ref().and_then(|status| status.at_provider.id)
    }

    /// Mutable status, initialised to the default when absent.
    pub fn status_mut(&mut self) -> &mut InstanceStatus {
        self.status.get_or_insert_with(InstanceStatus::default)
    }

    /// Sets a condition, replacing any existing condition of the same kind.
    pub fn set_condition(&mut self, condition: Condition) {
        set_condition(&mut self.status_mut().conditions, condition);
    }

    /// Returns the condition of the given kind, if present.
    #[must_use]
    pub fn condition(&self, kind: ConditionType) -> Option<&Condition> {
        self.status
            .as_ref()
            .and_then(|status| status.conditions.iter().find(|c| c.kind == kind))
    }
}
