use tokio::sync::watch;
use tracing::{error, info, warn};

use super::projector::{project, Projection};
use crate::models::{Profile, UiState};
use crate::session::SessionContext;

/// Doctor profile screen state: cached profile first, refreshed from the backend
pub struct ProfileViewModel {
    ctx: SessionContext,
    refresh_error: watch::Sender<Option<String>>,
    projection: Projection<Profile>,
}

impl ProfileViewModel {
    /// Build the view model without contacting the backend
    ///
    /// Spawns the projection task, so this needs a tokio runtime.
    pub fn new(ctx: SessionContext) -> Self {
        let (refresh_error, error_rx) = watch::channel(None);
        let projection = Projection::spawn(ctx.store().watch_cached_profile(), error_rx);
        Self {
            ctx,
            refresh_error,
            projection,
        }
    }

    /// Build the view model and run the initial refresh
    pub async fn init(ctx: SessionContext) -> Self {
        let vm = Self::new(ctx);
        vm.refresh().await;
        vm
    }

    /// Fetch the profile and cache it; failures land in the error slot
    ///
    /// Also the "try again" action. Overlapping calls are not fenced.
    pub async fn refresh(&self) {
        self.refresh_error.send_replace(None);

        match self.ctx.gateway().get_profile().await {
            Ok(profile) => {
                info!("Profile refreshed for {}", profile.name);
                if let Err(e) = self.ctx.store().set_cached_profile(&profile) {
                    error!("Failed to cache profile: {}", e);
                    self.refresh_error.send_replace(Some(e.user_message()));
                }
            }
            Err(e) => {
                warn!("Profile refresh failed: {}", e);
                self.refresh_error.send_replace(Some(e.user_message()));
            }
        }
    }

    /// State computed directly from the current inputs
    pub fn state(&self) -> UiState<Profile> {
        let cached = self.ctx.store().cached_profile();
        let error = self.refresh_error.borrow();
        project(cached.as_ref(), error.as_deref())
    }

    /// Latest refresh error, whether or not it is visible in the state
    pub fn last_error(&self) -> Option<String> {
        self.refresh_error.borrow().clone()
    }

    /// Reactive view of the state
    pub fn subscribe(&self) -> watch::Receiver<UiState<Profile>> {
        self.projection.subscribe()
    }
}
