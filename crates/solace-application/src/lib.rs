//! Use-case layer for the Solace chat client.
//!
//! This crate owns the control flow the front end drives: the
//! [`ChatController`] submission pipeline (optimistic insert, stress-signal
//! pause, exchange dispatch, failure recovery) and the
//! [`SessionIdentityManager`] identity lifecycle (resume an existing
//! session or mint one lazily, exactly once).

pub mod controller;
pub mod identity;
pub mod suggestions;

pub use controller::{ChatController, SubmissionOutcome};
pub use identity::{NavigationCallback, SessionIdentityManager};
pub use suggestions::SUGGESTED_QUESTIONS;
