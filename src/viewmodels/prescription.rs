use tokio::sync::watch;
use tracing::{info, warn};

use crate::models::{NewPrescription, UiState};
use crate::session::SessionContext;
use crate::utils::validate_prescription;

/// Prescription form submission
///
/// `None` in the state channel means nothing has been submitted yet.
pub struct PrescriptionViewModel {
    ctx: SessionContext,
    state: watch::Sender<Option<UiState<()>>>,
}

impl PrescriptionViewModel {
    pub fn new(ctx: SessionContext) -> Self {
        let (state, _) = watch::channel(None);
        Self { ctx, state }
    }

    pub async fn submit(&self, prescription: &NewPrescription) -> UiState<()> {
        if let Err(e) = validate_prescription(prescription) {
            return self.publish(UiState::Error(e.user_message()));
        }

        self.publish(UiState::Loading);
        let outcome = match self.ctx.gateway().create_prescription(prescription).await {
            Ok(()) => {
                info!(
                    "Prescription saved for appointment {}",
                    prescription.appointment_id
                );
                UiState::Success(())
            }
            Err(e) => {
                warn!("Prescription submission failed: {}", e);
                UiState::Error(e.user_message())
            }
        };
        self.publish(outcome)
    }

    pub fn state(&self) -> Option<UiState<()>> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<UiState<()>>> {
        self.state.subscribe()
    }

    fn publish(&self, state: UiState<()>) -> UiState<()> {
        self.state.send_replace(Some(state.clone()));
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, MockGateway};
    use crate::models::Medicine;
    use crate::store::PreferenceStore;
    use std::sync::Arc;

    fn prescription(medicines: Vec<Medicine>) -> NewPrescription {
        NewPrescription {
            appointment_id: "apt-1".to_string(),
            patient_id: "pat-1".to_string(),
            medicines,
            notes: Some("After meals".to_string()),
        }
    }

    fn vm_with(gateway: MockGateway) -> PrescriptionViewModel {
        let ctx = SessionContext::new(Arc::new(PreferenceStore::in_memory()), Arc::new(gateway));
        PrescriptionViewModel::new(ctx)
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_backend() {
        let mut gateway = MockGateway::new();
        gateway.expect_create_prescription().times(0);

        let vm = vm_with(gateway);
        assert_eq!(vm.state(), None);
        let state = vm.submit(&prescription(vec![])).await;
        assert!(state.is_error());
        assert_eq!(vm.state(), Some(state));
    }

    #[tokio::test]
    async fn test_submit_success_and_failure() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_create_prescription()
            .withf(|p| p.medicines.len() == 1)
            .times(1)
            .returning(|_| Ok(()));
        let vm = vm_with(gateway);
        let meds = vec!["Paracetamol|500mg|2x|5 days".parse::<Medicine>().unwrap()];
        assert_eq!(vm.submit(&prescription(meds.clone())).await, UiState::Success(()));

        let mut gateway = MockGateway::new();
        gateway
            .expect_create_prescription()
            .returning(|_| Err(GatewayError::new("Appointment not found")));
        let vm = vm_with(gateway);
        assert_eq!(
            vm.submit(&prescription(meds)).await,
            UiState::Error("Appointment not found".to_string())
        );
    }
}
