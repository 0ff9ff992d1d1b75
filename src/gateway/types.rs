use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_ERROR_MESSAGE;
use crate::models::{Appointment, Profile};

/// Failure reported by the remote backend; carries a readable message only
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Message for UI states, falling back to a generic one when blank
    pub fn user_message(&self) -> String {
        if self.message.trim().is_empty() {
            DEFAULT_ERROR_MESSAGE.to_string()
        } else {
            self.message.clone()
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Body of a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(alias = "doctor", alias = "profile")]
    pub user: Profile,
}

/// Body of a successful doctor registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Profile endpoint answers either `{ "doctor": {...} }` or the bare object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProfileEnvelope {
    Wrapped {
        #[serde(alias = "user", alias = "profile")]
        doctor: Profile,
    },
    Bare(Profile),
}

impl ProfileEnvelope {
    pub fn into_profile(self) -> Profile {
        match self {
            ProfileEnvelope::Wrapped { doctor } => doctor,
            ProfileEnvelope::Bare(profile) => profile,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum AppointmentsEnvelope {
    Wrapped { appointments: Vec<Appointment> },
    Bare(Vec<Appointment>),
}

impl AppointmentsEnvelope {
    pub fn into_appointments(self) -> Vec<Appointment> {
        match self {
            AppointmentsEnvelope::Wrapped { appointments } => appointments,
            AppointmentsEnvelope::Bare(appointments) => appointments,
        }
    }
}

/// Error body shape used by the backend
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// First non-blank of `message`, then `error`
    pub fn into_text(self) -> Option<String> {
        [self.message, self.error]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
    }
}
