/// Constants module to avoid magic strings in the codebase

// Backend
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/api";
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
/// How long the CLI lets the server-side logout finish before exiting
pub const LOGOUT_GRACE_SECS: u64 = 3;

// Preference store layout
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";
pub const KEY_AUTH_TOKEN: &str = "auth_token";
pub const KEY_THEME_MODE: &str = "theme_mode";
pub const KEY_CACHED_PROFILE: &str = "cached_profile";

// Config
pub const APP_NAME: &str = "clinicdesk";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOCAL_CONFIG_PATH: &str = ".clinicdesk/config.toml";
pub const ENV_PREFIX: &str = "CLINICDESK_";

// Messages
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";
pub const NETWORK_ERROR_MESSAGE: &str = "Network unreachable. Check your connection";

// Validation
pub const MIN_PASSWORD_LENGTH: usize = 6;
