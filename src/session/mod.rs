/// Session context - Gateway

mod context;

pub use context::SessionContext;
