pub mod config;
pub mod event_store;

pub use config::{Config, ConfigError};
pub use event_store::{EventPatch, EventStore, StoreError};
