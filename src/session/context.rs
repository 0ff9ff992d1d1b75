use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::gateway::Gateway;
use crate::models::{Session, ThemeMode};
use crate::store::PreferenceStore;
use crate::utils::ClinicResult;

/// Explicitly constructed session context shared by the view models
///
/// Cheap to clone; every clone refers to the same store and gateway.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<PreferenceStore>,
    gateway: Arc<dyn Gateway>,
}

impl SessionContext {
    pub fn new(store: Arc<PreferenceStore>, gateway: Arc<dyn Gateway>) -> Self {
        Self { store, gateway }
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    pub fn gateway(&self) -> &dyn Gateway {
        self.gateway.as_ref()
    }

    pub fn snapshot(&self) -> Session {
        self.store.snapshot()
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.token().is_some()
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.store.theme_mode()
    }

    /// Persist the theme preference; touches nothing else in the session
    pub fn set_theme_mode(&self, mode: ThemeMode) -> ClinicResult<()> {
        debug!("Theme set to {}", mode);
        self.store.set_theme_mode(mode)
    }

    /// Sign out locally, then tell the backend without waiting for it
    ///
    /// Token and cached profile are cleared in a single store write before
    /// this returns. The server-side call runs on a background task when a
    /// runtime is available and its outcome is only logged. The task handle
    /// is returned so a short-lived process can give it a moment to finish
    /// before the runtime shuts down; dropping it leaves the task running.
    pub fn logout(&self) -> ClinicResult<Option<JoinHandle<()>>> {
        let token = self.store.token();
        self.store.clear_session()?;
        info!("Signed out");

        let Some(token) = token else {
            return Ok(None);
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let gateway = Arc::clone(&self.gateway);
                Ok(Some(handle.spawn(async move {
                    if let Err(e) = gateway.logout(&token).await {
                        warn!("Server-side logout failed: {}", e);
                    }
                })))
            }
            Err(_) => {
                debug!("No runtime available, skipping server-side logout");
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
