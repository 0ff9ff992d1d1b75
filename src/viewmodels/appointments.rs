use tokio::sync::watch;
use tracing::{info, warn};

use super::projector::{project, Projection};
use crate::models::{Appointment, AppointmentStatus, UiState};
use crate::session::SessionContext;

/// Appointment list state; the last good list is kept in memory only
pub struct AppointmentsViewModel {
    ctx: SessionContext,
    appointments: watch::Sender<Option<Vec<Appointment>>>,
    refresh_error: watch::Sender<Option<String>>,
    projection: Projection<Vec<Appointment>>,
}

impl AppointmentsViewModel {
    pub fn new(ctx: SessionContext) -> Self {
        let (appointments, list_rx) = watch::channel(None);
        let (refresh_error, error_rx) = watch::channel(None);
        let projection = Projection::spawn(list_rx, error_rx);
        Self {
            ctx,
            appointments,
            refresh_error,
            projection,
        }
    }

    pub async fn init(ctx: SessionContext) -> Self {
        let vm = Self::new(ctx);
        vm.refresh().await;
        vm
    }

    pub async fn refresh(&self) {
        self.refresh_error.send_replace(None);

        match self.ctx.gateway().get_appointments().await {
            Ok(mut list) => {
                list.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time_slot.cmp(&b.time_slot)));
                info!("Loaded {} appointments", list.len());
                self.appointments.send_replace(Some(list));
            }
            Err(e) => {
                warn!("Appointment refresh failed: {}", e);
                self.refresh_error.send_replace(Some(e.user_message()));
            }
        }
    }

    pub fn state(&self) -> UiState<Vec<Appointment>> {
        let list = self.appointments.borrow();
        let error = self.refresh_error.borrow();
        project(list.as_ref(), error.as_deref())
    }

    /// Appointments with the given status, from the last good list
    pub fn with_status(&self, status: AppointmentStatus) -> Vec<Appointment> {
        self.appointments
            .borrow()
            .iter()
            .flatten()
            .filter(|a| a.status == status)
            .cloned()
            .collect()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState<Vec<Appointment>>> {
        self.projection.subscribe()
    }
}
