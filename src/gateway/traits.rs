use async_trait::async_trait;

use super::types::{GatewayResult, LoginResponse, RegisterResponse};
use crate::models::{Appointment, DoctorRegistration, NewPrescription, Profile};

/// Remote healthcare backend, as seen by the session layer
///
/// Implementations own transport concerns (timeouts, auth headers); callers
/// only see a payload or a [`GatewayError`](super::GatewayError) message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> GatewayResult<LoginResponse>;

    async fn register_doctor(
        &self,
        registration: &DoctorRegistration,
    ) -> GatewayResult<RegisterResponse>;

    /// Profile of the currently authenticated doctor
    async fn get_profile(&self) -> GatewayResult<Profile>;

    /// Invalidate `token` server-side
    async fn logout(&self, token: &str) -> GatewayResult<()>;

    async fn get_appointments(&self) -> GatewayResult<Vec<Appointment>>;

    async fn create_prescription(&self, prescription: &NewPrescription) -> GatewayResult<()>;
}
