// Gateway module for utils - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod errors;
mod logger;
mod validation;

// Public re-exports - the ONLY way to access utils functionality
pub use errors::{ClinicError, ClinicResult};
pub use logger::init_logger;
pub use validation::{
    is_valid_email, validate_login, validate_prescription, validate_registration,
};
