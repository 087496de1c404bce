//! Local infrastructure for the Solace chat client.
//!
//! Currently this is the client configuration store: a TOML file under the
//! user's config directory, read and written atomically.

pub mod config;

pub use config::{ClientConfig, ConfigStorage, ConfigStorageError};
