use serde::{Deserialize, Serialize};

use super::Profile;

/// Theme preference, persisted as `LIGHT`, `DARK` or `FOLLOW_SYSTEM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    FollowSystem,
}

impl ThemeMode {
    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "LIGHT",
            ThemeMode::Dark => "DARK",
            ThemeMode::FollowSystem => "FOLLOW_SYSTEM",
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "LIGHT" => Ok(ThemeMode::Light),
            "DARK" => Ok(ThemeMode::Dark),
            "FOLLOW_SYSTEM" | "SYSTEM" => Ok(ThemeMode::FollowSystem),
            other => Err(format!("Unknown theme mode: {}", other)),
        }
    }
}

/// Point-in-time view of the locally persisted session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub auth_token: Option<String>,
    pub theme_mode: ThemeMode,
    pub cached_profile: Option<Profile>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.auth_token.is_some()
    }
}
