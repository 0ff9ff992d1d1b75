use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of an appointment
///
/// Parsed case-insensitively; anything unrecognised is treated as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl From<String> for AppointmentStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "CONFIRMED" => AppointmentStatus::Confirmed,
            "COMPLETED" => AppointmentStatus::Completed,
            "CANCELLED" | "CANCELED" => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Pending,
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.to_string().to_ascii_uppercase()
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", label)
    }
}

/// A patient booking with the signed-in doctor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(deserialize_with = "date_prefix")]
    pub date: NaiveDate,
    /// Time slot label as sent by the backend, e.g. "10:30 AM"
    #[serde(default)]
    pub time_slot: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub fee: Option<f64>,
}

/// Accepts a bare `YYYY-MM-DD` or a full ISO timestamp, keeping the date part
fn date_prefix<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let day = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(serde::de::Error::custom)
}
