// Gateway module for view models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod appointments;
mod auth;
mod prescription;
mod profile;
mod projector;

// Public re-exports - the ONLY way to access view model functionality
pub use appointments::AppointmentsViewModel;
pub use auth::AuthViewModel;
pub use prescription::PrescriptionViewModel;
pub use profile::ProfileViewModel;
pub use projector::{project, Projection};
