use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::constants::{KEY_AUTH_TOKEN, KEY_CACHED_PROFILE, KEY_THEME_MODE};
use crate::models::{Profile, Session, ThemeMode};
use crate::utils::{ClinicError, ClinicResult};

type Entries = BTreeMap<String, String>;

/// Durable key-value store for the session fields
///
/// Entries live in a JSON object on disk and are mirrored in memory. Each
/// logical field (token, theme, cached profile) has a watch channel that
/// re-emits whenever its key changes, whichever API made the change.
pub struct PreferenceStore {
    /// `None` for the in-memory variant
    path: Option<PathBuf>,
    entries: Mutex<Entries>,
    token_tx: watch::Sender<Option<String>>,
    theme_tx: watch::Sender<ThemeMode>,
    profile_tx: watch::Sender<Option<Profile>>,
}

impl PreferenceStore {
    /// Open (or create) the store backed by `path`
    pub fn open(path: impl AsRef<Path>) -> ClinicResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = if path.exists() {
            // Bytes, not a String: a non-UTF-8 file is just another parse failure
            let raw = fs::read(&path)?;
            match serde_json::from_slice::<Entries>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(
                        "Preference file {} is unreadable ({}), starting empty",
                        path.display(),
                        e
                    );
                    Entries::new()
                }
            }
        } else {
            Entries::new()
        };

        debug!("Opened preference store at {}", path.display());
        Ok(Self::with_entries(Some(path), entries))
    }

    /// Store that never touches disk
    pub fn in_memory() -> Self {
        Self::with_entries(None, Entries::new())
    }

    fn with_entries(path: Option<PathBuf>, entries: Entries) -> Self {
        let (token_tx, _) = watch::channel(decode_token(&entries));
        let (theme_tx, _) = watch::channel(decode_theme(&entries));
        let (profile_tx, _) = watch::channel(decode_profile(&entries));
        Self {
            path,
            entries: Mutex::new(entries),
            token_tx,
            theme_tx,
            profile_tx,
        }
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ---------------------------------------------------------------------
    // Raw key-value access
    // ---------------------------------------------------------------------

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) -> ClinicResult<()> {
        let value = value.into();
        self.update(&[key], |entries| {
            entries.insert(key.to_string(), value);
        })
    }

    pub fn remove(&self, key: &str) -> ClinicResult<()> {
        self.update(&[key], |entries| {
            entries.remove(key);
        })
    }

    /// Apply `mutate` to a copy of the entries, persist it, then commit and notify
    ///
    /// The lock is held across persist + notify so observers of a key see
    /// writes in the order they were applied. A failed persist leaves the
    /// in-memory state untouched.
    fn update(&self, keys: &[&str], mutate: impl FnOnce(&mut Entries)) -> ClinicResult<()> {
        let mut guard = self.entries.lock();
        let mut next = guard.clone();
        mutate(&mut next);

        if let Some(path) = &self.path {
            persist(path, &next)?;
        }

        *guard = next;
        for key in keys {
            self.notify(key, &guard);
        }
        Ok(())
    }

    fn notify(&self, key: &str, entries: &Entries) {
        match key {
            KEY_AUTH_TOKEN => {
                self.token_tx.send_replace(decode_token(entries));
            }
            KEY_THEME_MODE => {
                self.theme_tx.send_replace(decode_theme(entries));
            }
            KEY_CACHED_PROFILE => {
                self.profile_tx.send_replace(decode_profile(entries));
            }
            _ => {}
        }
    }

    // ---------------------------------------------------------------------
    // Typed session fields
    // ---------------------------------------------------------------------

    pub fn token(&self) -> Option<String> {
        self.token_tx.borrow().clone()
    }

    pub fn set_token(&self, token: &str) -> ClinicResult<()> {
        self.set(KEY_AUTH_TOKEN, token)
    }

    pub fn theme_mode(&self) -> ThemeMode {
        *self.theme_tx.borrow()
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) -> ClinicResult<()> {
        self.set(KEY_THEME_MODE, mode.as_str())
    }

    /// Cached profile; a corrupt blob reads as `None`
    pub fn cached_profile(&self) -> Option<Profile> {
        self.profile_tx.borrow().clone()
    }

    pub fn set_cached_profile(&self, profile: &Profile) -> ClinicResult<()> {
        let blob = serde_json::to_string(profile)?;
        self.set(KEY_CACHED_PROFILE, blob)
    }

    /// Drop token and cached profile together; theme is kept
    pub fn clear_session(&self) -> ClinicResult<()> {
        self.update(&[KEY_AUTH_TOKEN, KEY_CACHED_PROFILE], |entries| {
            entries.remove(KEY_AUTH_TOKEN);
            entries.remove(KEY_CACHED_PROFILE);
        })
    }

    pub fn snapshot(&self) -> Session {
        Session {
            auth_token: self.token(),
            theme_mode: self.theme_mode(),
            cached_profile: self.cached_profile(),
        }
    }

    // ---------------------------------------------------------------------
    // Subscriptions
    // ---------------------------------------------------------------------

    pub fn watch_token(&self) -> watch::Receiver<Option<String>> {
        self.token_tx.subscribe()
    }

    pub fn watch_theme_mode(&self) -> watch::Receiver<ThemeMode> {
        self.theme_tx.subscribe()
    }

    pub fn watch_cached_profile(&self) -> watch::Receiver<Option<Profile>> {
        self.profile_tx.subscribe()
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("path", &self.path)
            .field("keys", &self.entries.lock().keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Write via temp file + rename so a crash never leaves a half-written file
fn persist(path: &Path, entries: &Entries) -> ClinicResult<()> {
    let json = serde_json::to_string_pretty(entries)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path).map_err(|e| {
        ClinicError::StorageError(format!("Failed to replace {}: {}", path.display(), e))
    })
}

fn decode_token(entries: &Entries) -> Option<String> {
    entries.get(KEY_AUTH_TOKEN).filter(|t| !t.is_empty()).cloned()
}

fn decode_theme(entries: &Entries) -> ThemeMode {
    entries
        .get(KEY_THEME_MODE)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default()
}

fn decode_profile(entries: &Entries) -> Option<Profile> {
    let blob = entries.get(KEY_CACHED_PROFILE)?;
    match serde_json::from_str(blob) {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!("Ignoring malformed cached profile: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn profile() -> Profile {
        Profile {
            id: "1".to_string(),
            name: "A. Mishra".to_string(),
            email: "a.mishra@example.com".to_string(),
            role: "doctor".to_string(),
            specialization: Some("Cardiology".to_string()),
            qualification: Some("MD".to_string()),
            experience: Some(12),
            fee: Some(500.0),
            bio: Some("Heart specialist".to_string()),
            address: Some("12 Park Street".to_string()),
            image: None,
        }
    }

    #[test]
    fn test_empty_store_defaults() {
        let store = PreferenceStore::in_memory();
        let session = store.snapshot();
        assert_eq!(session, Session::default());
        assert_eq!(session.theme_mode, ThemeMode::FollowSystem);
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_profile_round_trip() {
        let store = PreferenceStore::in_memory();
        store.set_cached_profile(&profile()).unwrap();
        assert_eq!(store.cached_profile(), Some(profile()));
    }

    #[test]
    fn test_corrupted_profile_reads_as_absent() {
        let store = PreferenceStore::in_memory();
        store.set(KEY_CACHED_PROFILE, "{not json").unwrap();
        assert_eq!(store.cached_profile(), None);
        // Raw value is still there; only the typed view hides it
        assert_eq!(store.get(KEY_CACHED_PROFILE).as_deref(), Some("{not json"));
    }

    #[test]
    fn test_clear_session_keeps_theme() {
        let store = PreferenceStore::in_memory();
        store.set_token("tok").unwrap();
        store.set_cached_profile(&profile()).unwrap();
        store.set_theme_mode(ThemeMode::Dark).unwrap();

        store.clear_session().unwrap();

        assert_eq!(store.token(), None);
        assert_eq!(store.cached_profile(), None);
        assert_eq!(store.theme_mode(), ThemeMode::Dark);
    }

    #[test]
    fn test_unknown_theme_value_reads_as_default() {
        let store = PreferenceStore::in_memory();
        store.set(KEY_THEME_MODE, "SEPIA").unwrap();
        assert_eq!(store.theme_mode(), ThemeMode::FollowSystem);
    }

    #[test]
    fn test_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        {
            let store = PreferenceStore::open(&path).unwrap();
            store.set_token("tok-123").unwrap();
            store.set_theme_mode(ThemeMode::Light).unwrap();
            store.set_cached_profile(&profile()).unwrap();
        }

        let reopened = PreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("tok-123"));
        assert_eq!(reopened.theme_mode(), ThemeMode::Light);
        assert_eq!(reopened.cached_profile(), Some(profile()));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_unreadable_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "garbage").unwrap();

        let store = PreferenceStore::open(&path).unwrap();
        assert_eq!(store.snapshot(), Session::default());

        // First write replaces the garbage with a valid file
        store.set_token("t").unwrap();
        let reopened = PreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("t"));
    }

    #[test]
    fn test_non_utf8_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        let store = PreferenceStore::open(&path).unwrap();
        assert_eq!(store.snapshot(), Session::default());

        store.set_theme_mode(ThemeMode::Dark).unwrap();
        let reopened = PreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.theme_mode(), ThemeMode::Dark);
    }

    #[test]
    fn test_failed_persist_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        let store = PreferenceStore::open(&path).unwrap();
        store.set_token("before").unwrap();

        // A directory where the temp file should go makes the write fail
        fs::create_dir(path.with_extension("json.tmp")).unwrap();

        assert!(store.set_token("after").is_err());
        assert_eq!(store.token().as_deref(), Some("before"));
    }

    #[tokio::test]
    async fn test_subscription_sees_raw_writes() {
        let store = PreferenceStore::in_memory();
        let mut rx = store.watch_token();
        assert_eq!(*rx.borrow_and_update(), None);

        store.set(KEY_AUTH_TOKEN, "raw").unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_deref(), Some("raw"));

        store.remove(KEY_AUTH_TOKEN).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), None);
    }

    #[tokio::test]
    async fn test_theme_subscription_unaffected_by_profile_writes() {
        let store = PreferenceStore::in_memory();
        store.set_theme_mode(ThemeMode::Dark).unwrap();
        let mut rx = store.watch_theme_mode();
        rx.borrow_and_update();

        store.set_cached_profile(&profile()).unwrap();
        assert!(!rx.has_changed().unwrap());
        assert_eq!(*rx.borrow(), ThemeMode::Dark);
    }
}
