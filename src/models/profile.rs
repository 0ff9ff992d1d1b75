use serde::{Deserialize, Serialize};

/// Doctor profile as returned by the backend and cached locally
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub qualification: Option<String>,
    /// Years in practice
    #[serde(default)]
    pub experience: Option<u32>,
    /// Consultation fee
    #[serde(default)]
    pub fee: Option<f64>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
}

impl Profile {
    /// Short one-line label, e.g. "A. Mishra (Cardiology)"
    pub fn display_name(&self) -> String {
        match &self.specialization {
            Some(spec) if !spec.is_empty() => format!("{} ({})", self.name, spec),
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_backend_shape() {
        let json = r#"{
            "_id": "64f0",
            "name": "A. Mishra",
            "email": "a.mishra@example.com",
            "role": "doctor",
            "specialization": "Cardiology",
            "experience": 12,
            "fee": 500.0
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, "64f0");
        assert_eq!(profile.experience, Some(12));
        assert_eq!(profile.bio, None);
        assert_eq!(profile.display_name(), "A. Mishra (Cardiology)");
    }
}
