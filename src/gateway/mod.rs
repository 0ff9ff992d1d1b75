// Gateway module for the remote backend - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod http;
mod traits;
mod types;

// Public re-exports - the ONLY way to reach the backend
pub use http::HttpGateway;
#[cfg(test)]
pub use traits::MockGateway;
pub use traits::Gateway;
pub use types::{GatewayError, GatewayResult, LoginResponse, RegisterResponse};
