use once_cell::sync::Lazy;
use regex::Regex;

use super::errors::{ClinicError, ClinicResult};
use crate::constants::MIN_PASSWORD_LENGTH;
use crate::models::{DoctorRegistration, NewPrescription};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

fn invalid(message: impl Into<String>) -> ClinicError {
    ClinicError::ValidationError(message.into())
}

/// Check that an email address looks plausible
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Validate login input before it goes over the wire
pub fn validate_login(email: &str, password: &str) -> ClinicResult<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(invalid("Email and password are required"));
    }
    if !is_valid_email(email) {
        return Err(invalid("Please enter a valid email address"));
    }
    Ok(())
}

/// Validate a doctor registration form
pub fn validate_registration(registration: &DoctorRegistration) -> ClinicResult<()> {
    if registration.name.trim().is_empty() {
        return Err(invalid("Name is required"));
    }
    if !is_valid_email(&registration.email) {
        return Err(invalid("Please enter a valid email address"));
    }
    if registration.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(invalid(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Validate a prescription before submission
pub fn validate_prescription(prescription: &NewPrescription) -> ClinicResult<()> {
    if prescription.appointment_id.trim().is_empty() {
        return Err(invalid("Appointment is required"));
    }
    if prescription.medicines.is_empty() {
        return Err(invalid("Add at least one medicine"));
    }
    if prescription
        .medicines
        .iter()
        .any(|m| m.name.trim().is_empty())
    {
        return Err(invalid("Every medicine needs a name"));
    }
    Ok(())
}
