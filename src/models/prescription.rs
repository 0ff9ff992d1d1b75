use serde::{Deserialize, Serialize};

/// One line of a prescription
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
}

impl std::str::FromStr for Medicine {
    type Err = String;

    /// Parse `name|dosage|frequency|duration`; trailing parts are optional
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('|').map(str::trim);
        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return Err(format!("Medicine '{}' has no name", s));
        }
        Ok(Self {
            name: name.to_string(),
            dosage: parts.next().unwrap_or_default().to_string(),
            frequency: parts.next().unwrap_or_default().to_string(),
            duration: parts.next().unwrap_or_default().to_string(),
        })
    }
}

/// Prescription written against an appointment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPrescription {
    pub appointment_id: String,
    pub patient_id: String,
    pub medicines: Vec<Medicine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Doctor sign-up form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
