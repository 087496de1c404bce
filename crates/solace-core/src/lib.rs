//! Core domain layer for the Solace therapy-chat client.
//!
//! This crate contains the pure models and logic the rest of the
//! application is built on: the transcript message types, the append-only
//! transcript store, the stress-signal detector, the conversation state
//! machine, and the contracts for the remote collaborators (assistant
//! exchange, history, and session-creation services).

pub mod error;
pub mod exchange;
pub mod message;
pub mod service;
pub mod session;
pub mod state;
pub mod stress;
pub mod transcript;

// Re-export common error type
pub use error::{Result, SolaceError};
