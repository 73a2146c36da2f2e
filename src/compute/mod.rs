//! Field mapping between `Instance` resources and the compute API.

use crate::apis::{InstanceObservation, InstanceParameters, InstanceState};
use crate::backend::{BackendError, InstanceCreateRequest, ProviderInstance};

/// Builds the create request for `params` under the provider-side `name`.
///
/// Unset booleans are sent as `false` and an unset network as empty.
///
/// # Errors
///
/// Returns [`BackendError::Validation`] when the name, region, flavor or
/// image is empty.
pub fn generate_instance(
    name: &str,
    params: &InstanceParameters,
) -> Result<InstanceCreateRequest, BackendError> {
    InstanceCreateRequest::builder()
        .name(name)
        .region(&params.region)
        .flavor(&params.flavor)
        .image(&params.image)
        .ssh_keys(params.ssh_keys.clone().unwrap_or_default())
        .backups(params.backups.unwrap_or_default())
        .floating_networking(params.floating_networking.unwrap_or_default())
        .monitoring(params.monitoring.unwrap_or_default())
        .volumes(params.volumes.clone().unwrap_or_default())
        .tags(params.tags.clone().unwrap_or_default())
        .network_uuid(params.network_uuid.clone().unwrap_or_default())
        .build()
}

/// Fills unset optional fields of `params` from the provider's record.
///
/// Values the user set are never overwritten. Returns `true` when any field
/// changed, in which case the spec must be persisted.
pub fn late_initialize_spec(params: &mut InstanceParameters, observed: &ProviderInstance) -> bool {
    let volumes = late_initialize_string_slice(&mut params.volumes, &observed.volume_ids);
    let tags = late_initialize_string_slice(&mut params.tags, &observed.tags);
    let network = late_initialize_string(&mut params.network_uuid, &observed.network_uuid);
    volumes || tags || network
}

/// Converts the provider's record into the status observation.
#[must_use]
pub fn observation_from(observed: &ProviderInstance) -> InstanceObservation {
    InstanceObservation {
        creation_timestamp: Some(observed.created.clone()).filter(|ts| !ts.is_empty()),
        id: Some(observed.id),
        status: Some(InstanceState::parse(&observed.status)),
    }
}

fn late_initialize_string_slice(current: &mut Option<Vec<String>>, observed: &[String]) -> bool {
    if current.as_ref().is_some_and(|values| !values.is_empty()) || observed.is_empty() {
        return false;
    }
    *current = Some(observed.to_vec());
    true
}

fn late_initialize_string(current: &mut Option<String>, observed: &str) -> bool {
    if current.is_some() || observed.is_empty() {
        return false;
    }
    *current = Some(observed.to_owned());
    true
}
