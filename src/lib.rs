pub mod app;
pub mod cli;
pub mod constants;
pub mod gateway;
pub mod models;
pub mod session;
pub mod store;
pub mod utils;
pub mod viewmodels;

pub use app::{load_config, Config};
pub use gateway::{Gateway, GatewayError, HttpGateway};
pub use models::{Profile, Session, ThemeMode, UiState};
pub use session::SessionContext;
pub use store::PreferenceStore;
pub use utils::ClinicError;
