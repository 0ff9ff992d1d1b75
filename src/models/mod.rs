// Gateway module for models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod appointment;
mod prescription;
mod profile;
mod session;
mod ui_state;

// Public re-exports - the ONLY way to access model types
pub use appointment::{Appointment, AppointmentStatus};
pub use prescription::{DoctorRegistration, Medicine, NewPrescription};
pub use profile::Profile;
pub use session::{Session, ThemeMode};
pub use ui_state::UiState;
