use tokio::sync::watch;
use tracing::{info, warn};

use crate::models::{DoctorRegistration, Profile, UiState};
use crate::session::SessionContext;
use crate::utils::{validate_login, validate_registration, ClinicError};

/// Login and sign-up flows
///
/// On success the token and profile are stored as two separate writes
/// (token first). On failure the session is left exactly as it was.
pub struct AuthViewModel {
    ctx: SessionContext,
    state: watch::Sender<Option<UiState<Profile>>>,
}

impl AuthViewModel {
    pub fn new(ctx: SessionContext) -> Self {
        let (state, _) = watch::channel(None);
        Self { ctx, state }
    }

    pub async fn login(&self, email: &str, password: &str) -> UiState<Profile> {
        if let Err(e) = validate_login(email, password) {
            return self.publish(UiState::Error(e.user_message()));
        }

        self.publish(UiState::Loading);
        let outcome = match self.ctx.gateway().login(email.trim(), password).await {
            Ok(response) => self
                .store_session(&response.token, &response.user)
                .map(|()| response.user),
            Err(e) => Err(ClinicError::from(e)),
        };
        self.finish("Login", outcome)
    }

    /// Register, then fetch the new profile with the issued token
    ///
    /// If the follow-up fetch fails the token stays stored and the error is
    /// reported; a later profile refresh fills the cache.
    pub async fn register_doctor(&self, registration: &DoctorRegistration) -> UiState<Profile> {
        if let Err(e) = validate_registration(registration) {
            return self.publish(UiState::Error(e.user_message()));
        }

        self.publish(UiState::Loading);
        let outcome = self.register_and_fetch(registration).await;
        self.finish("Registration", outcome)
    }

    async fn register_and_fetch(
        &self,
        registration: &DoctorRegistration,
    ) -> Result<Profile, ClinicError> {
        let response = self.ctx.gateway().register_doctor(registration).await?;
        self.ctx.store().set_token(&response.token)?;

        let profile = self.ctx.gateway().get_profile().await?;
        self.ctx.store().set_cached_profile(&profile)?;
        Ok(profile)
    }

    fn store_session(&self, token: &str, profile: &Profile) -> Result<(), ClinicError> {
        self.ctx.store().set_token(token)?;
        self.ctx.store().set_cached_profile(profile)
    }

    fn finish(&self, flow: &str, outcome: Result<Profile, ClinicError>) -> UiState<Profile> {
        match outcome {
            Ok(profile) => {
                info!("{} succeeded for {}", flow, profile.email);
                self.publish(UiState::Success(profile))
            }
            Err(e) => {
                warn!("{} failed: {}", flow, e);
                self.publish(UiState::Error(e.user_message()))
            }
        }
    }

    pub fn state(&self) -> Option<UiState<Profile>> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<UiState<Profile>>> {
        self.state.subscribe()
    }

    fn publish(&self, state: UiState<Profile>) -> UiState<Profile> {
        self.state.send_replace(Some(state.clone()));
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, LoginResponse, MockGateway, RegisterResponse};
    use crate::models::ThemeMode;
    use crate::store::PreferenceStore;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn mishra() -> Profile {
        Profile {
            id: "1".to_string(),
            name: "A. Mishra".to_string(),
            email: "a.mishra@example.com".to_string(),
            role: "doctor".to_string(),
            ..Default::default()
        }
    }

    fn registration() -> DoctorRegistration {
        DoctorRegistration {
            name: "A. Mishra".to_string(),
            email: "a.mishra@example.com".to_string(),
            password: "secret123".to_string(),
            specialization: Some("Cardiology".to_string()),
            ..Default::default()
        }
    }

    fn setup(gateway: MockGateway) -> (Arc<PreferenceStore>, AuthViewModel) {
        let store = Arc::new(PreferenceStore::in_memory());
        let ctx = SessionContext::new(store.clone(), Arc::new(gateway));
        (store, AuthViewModel::new(ctx))
    }

    #[tokio::test]
    async fn test_login_stores_token_and_profile() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_login()
            .withf(|email, password| {
                email.to_string() == "a.mishra@example.com" && password.to_string() == "pw-1"
            })
            .times(1)
            .returning(|_, _| {
                Ok(LoginResponse {
                    token: "tok-9".to_string(),
                    user: mishra(),
                })
            });

        let (store, vm) = setup(gateway);
        let state = vm.login(" a.mishra@example.com ", "pw-1").await;

        assert_eq!(state, UiState::Success(mishra()));
        assert_eq!(vm.state(), Some(UiState::Success(mishra())));
        assert_eq!(store.token().as_deref(), Some("tok-9"));
        assert_eq!(store.cached_profile(), Some(mishra()));
    }

    #[tokio::test]
    async fn test_login_failure_leaves_session_unchanged() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_login()
            .returning(|_, _| Err(GatewayError::new("Invalid credentials")));

        let (store, vm) = setup(gateway);
        store.set_theme_mode(ThemeMode::Dark).unwrap();
        let before = store.snapshot();

        let state = vm.login("a.mishra@example.com", "wrong").await;
        assert_eq!(state, UiState::Error("Invalid credentials".to_string()));
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_blank_login_failure_uses_default_message() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_login()
            .returning(|_, _| Err(GatewayError::new("")));

        let (store, vm) = setup(gateway);
        let state = vm.login("a@b.co", "pw").await;

        assert_eq!(
            state,
            UiState::Error(crate::constants::DEFAULT_ERROR_MESSAGE.to_string())
        );
        assert_eq!(store.token(), None);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_email_locally() {
        let mut gateway = MockGateway::new();
        gateway.expect_login().times(0);

        let (_, vm) = setup(gateway);
        assert!(vm.login("not-an-email", "pw").await.is_error());
    }

    #[tokio::test]
    async fn test_register_then_fetch_profile() {
        let mut gateway = MockGateway::new();
        gateway.expect_register_doctor().times(1).returning(|_| {
            Ok(RegisterResponse {
                token: "tok-new".to_string(),
            })
        });
        gateway
            .expect_get_profile()
            .times(1)
            .returning(|| Ok(mishra()));

        let (store, vm) = setup(gateway);
        let state = vm.register_doctor(&registration()).await;

        assert_eq!(state, UiState::Success(mishra()));
        assert_eq!(store.token().as_deref(), Some("tok-new"));
        assert_eq!(store.cached_profile(), Some(mishra()));
    }

    #[tokio::test]
    async fn test_register_keeps_token_when_profile_fetch_fails() {
        let mut gateway = MockGateway::new();
        gateway.expect_register_doctor().returning(|_| {
            Ok(RegisterResponse {
                token: "tok-new".to_string(),
            })
        });
        gateway
            .expect_get_profile()
            .returning(|| Err(GatewayError::new("network unreachable")));

        let (store, vm) = setup(gateway);
        let state = vm.register_doctor(&registration()).await;

        assert_eq!(state, UiState::Error("network unreachable".to_string()));
        assert_eq!(store.token().as_deref(), Some("tok-new"));
        assert_eq!(store.cached_profile(), None);
    }

    #[tokio::test]
    async fn test_invalid_registration_never_reaches_backend() {
        let mut gateway = MockGateway::new();
        gateway.expect_register_doctor().times(0);

        let (store, vm) = setup(gateway);
        let mut form = registration();
        form.password = "123".to_string();

        assert!(vm.register_doctor(&form).await.is_error());
        assert_eq!(store.token(), None);
    }
}
