/// Persistent preference store - Gateway

mod preferences;

pub use preferences::PreferenceStore;
