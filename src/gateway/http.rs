use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::traits::Gateway;
use super::types::{
    AppointmentsEnvelope, ErrorBody, GatewayError, GatewayResult, LoginRequest, LoginResponse,
    ProfileEnvelope, RegisterResponse,
};
use crate::app::BackendConfig;
use crate::constants::NETWORK_ERROR_MESSAGE;
use crate::models::{Appointment, DoctorRegistration, NewPrescription, Profile};
use crate::store::PreferenceStore;
use crate::utils::{ClinicError, ClinicResult};

/// REST implementation of [`Gateway`]
///
/// The bearer token is read from the preference store on every request, so a
/// login or logout elsewhere is picked up without rebuilding the client.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    store: Arc<PreferenceStore>,
}

impl HttpGateway {
    /// Create a gateway for the configured backend
    pub fn new(config: &BackendConfig, store: Arc<PreferenceStore>) -> ClinicResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClinicError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    /// Backend root this gateway talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.store.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> GatewayResult<reqwest::Response> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!("Backend returned {}: {}", status, message);
        Err(GatewayError::new(message))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> GatewayResult<T> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| {
            warn!("Unexpected response body: {}", e);
            GatewayError::new("Unexpected response from server")
        })
    }
}

/// Map a transport failure to a readable message
fn transport_error(err: reqwest::Error) -> GatewayError {
    debug!("Request failed: {:?}", err);
    if err.is_timeout() {
        GatewayError::new("Request timed out")
    } else if err.is_connect() {
        GatewayError::new(NETWORK_ERROR_MESSAGE)
    } else {
        GatewayError::new(err.to_string())
    }
}

/// Extract the message from a non-2xx response body
fn error_message(status: StatusCode, body: &str) -> String {
    if let Some(message) = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_text)
    {
        return message;
    }

    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => format!("Request failed with status {}", status.as_u16()),
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn login(&self, email: &str, password: &str) -> GatewayResult<LoginResponse> {
        let request = self
            .client
            .post(self.url("auth/login"))
            .json(&LoginRequest { email, password });
        self.send_json(request).await
    }

    async fn register_doctor(
        &self,
        registration: &DoctorRegistration,
    ) -> GatewayResult<RegisterResponse> {
        let request = self
            .client
            .post(self.url("auth/register-doctor"))
            .json(registration);
        self.send_json(request).await
    }

    async fn get_profile(&self) -> GatewayResult<Profile> {
        let request = self.authorized(self.client.get(self.url("doctor/profile")));
        let envelope: ProfileEnvelope = self.send_json(request).await?;
        Ok(envelope.into_profile())
    }

    async fn logout(&self, token: &str) -> GatewayResult<()> {
        let request = self
            .client
            .post(self.url("auth/logout"))
            .bearer_auth(token);
        self.send(request).await.map(|_| ())
    }

    async fn get_appointments(&self) -> GatewayResult<Vec<Appointment>> {
        let request = self.authorized(self.client.get(self.url("doctor/appointments")));
        let envelope: AppointmentsEnvelope = self.send_json(request).await?;
        Ok(envelope.into_appointments())
    }

    async fn create_prescription(&self, prescription: &NewPrescription) -> GatewayResult<()> {
        let request = self
            .authorized(self.client.post(self.url("doctor/prescriptions")))
            .json(prescription);
        self.send(request).await.map(|_| ())
    }
}
