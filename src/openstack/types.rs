//! Wire types for the compute API's `servers` resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::{InstanceCreateRequest, ProviderInstance};

#[derive(Debug, Deserialize)]
pub(crate) struct ServerEnvelope {
    pub(crate) server: Server,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Server {
    pub(crate) id: u64,
    #[serde(default)]
    pub(crate) created: String,
    #[serde(default)]
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) volume_ids: Vec<String>,
    #[serde(default)]
    pub(crate) tags: Vec<String>,
    #[serde(default)]
    pub(crate) network_uuid: Option<String>,
}

impl From<Server> for ProviderInstance {
    fn from(server: Server) -> Self {
        Self {
            id: server.id,
            created: server.created,
            status: server.status,
            volume_ids: server.volume_ids,
            tags: server.tags,
            network_uuid: server.network_uuid.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateServerEnvelope<'a> {
    pub(crate) server: CreateServer<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateServer<'a> {
    name: &'a str,
    region: &'a str,
    flavor: &'a str,
    image: &'a str,
    ssh_keys: &'a [String],
    backups: bool,
    floating_networking: bool,
    monitoring: bool,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    volumes: &'a [String],
    tags: &'a [String],
    #[serde(skip_serializing_if = "str::is_empty")]
    network_uuid: &'a str,
}

impl<'a> From<&'a InstanceCreateRequest> for CreateServerEnvelope<'a> {
    fn from(request: &'a InstanceCreateRequest) -> Self {
        Self {
            server: CreateServer {
                name: &request.name,
                region: &request.region,
                flavor: &request.flavor,
                image: &request.image,
                ssh_keys: &request.ssh_keys,
                backups: request.backups,
                floating_networking: request.floating_networking,
                monitoring: request.monitoring,
                volumes: &request.volumes,
                tags: &request.tags,
                network_uuid: &request.network_uuid,
            },
        }
    }
}

/// Extracts a readable message from an error body.
///
/// Compute APIs wrap faults as `{"itemNotFound": {"message": "..."}}`; the
/// first nested `message` wins, otherwise the trimmed body is returned.
pub(crate) fn fault_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::from("empty response body");
    }
    serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|value| nested_message(&value))
        .unwrap_or_else(|| trimmed.to_owned())
}

fn nested_message(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    if let Some(message) = object.get("message").and_then(Value::as_str) {
        return Some(message.to_owned());
    }
    object
        .values()
        .filter_map(Value::as_object)
        .find_map(|fault| fault.get("message").and_then(Value::as_str))
        .map(str::to_owned)
}
