//! HTTP calls against the compute API's `/servers` collection.

use std::fmt::Display;

use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::debug;

use crate::backend::{InstanceCreateRequest, ProviderInstance};

use super::types::{CreateServerEnvelope, ServerEnvelope, fault_message};
use super::{OpenStackBackend, OpenStackBackendError};

const AUTH_HEADER: &str = "X-Auth-Token";
const JSON: &str = "application/json";

impl OpenStackBackend {
    fn servers_url(&self) -> String {
        format!("{}/servers", self.endpoint)
    }

    fn server_url(&self, id: u64) -> String {
        format!("{}/servers/{id}", self.endpoint)
    }

    fn authorised(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(AUTH_HEADER, self.auth_token.as_str())
            .header(ACCEPT, JSON)
    }

    pub(super) async fn fetch_server(
        &self,
        id: u64,
    ) -> Result<ProviderInstance, OpenStackBackendError> {
        debug!(id, "fetching server");
        let response = self
            .authorised(self.http.get(self.server_url(id)))
            .send()
            .await?;
        let envelope: ServerEnvelope = check_status(response, Some(id)).await?.json().await?;
        Ok(envelope.server.into())
    }

    pub(super) async fn create_server(
        &self,
        request: &InstanceCreateRequest,
    ) -> Result<ProviderInstance, OpenStackBackendError> {
        debug!(name = %request.name, region = %request.region, "creating server");
        let response = self
            .authorised(self.http.post(self.servers_url()))
            .json(&CreateServerEnvelope::from(request))
            .send()
            .await?;
        let envelope: ServerEnvelope = check_status(response, None).await?.json().await?;
        Ok(envelope.server.into())
    }

    pub(super) async fn delete_server(&self, id: u64) -> Result<(), OpenStackBackendError> {
        debug!(id, "deleting server");
        let response = self
            .authorised(self.http.delete(self.server_url(id)))
            .send()
            .await?;
        check_status(response, Some(id)).await.map(|_| ())
    }
}

/// Maps non-success responses to backend errors. A 404 on a request naming a
/// server becomes [`OpenStackBackendError::NotFound`].
async fn check_status(
    response: Response,
    id: Option<u64>,
) -> Result<Response, OpenStackBackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if let (StatusCode::NOT_FOUND, Some(server_id)) = (status, id) {
        return Err(OpenStackBackendError::NotFound { id: server_id });
    }
    Err(OpenStackBackendError::Api {
        status: status.as_u16(),
        message: failure_message(response.text().await),
    })
}

/// Message for a failed response, falling back to the read error when the
/// body itself could not be read.
fn failure_message<E: Display>(body: Result<String, E>) -> String {
    match body {
        Ok(text) => fault_message(&text),
        Err(err) => format!("unreadable response body: {err}"),
    }
}
