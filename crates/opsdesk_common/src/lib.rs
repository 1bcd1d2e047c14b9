//! Opsdesk Common - Shared types and schemas for the Opsdesk triage engine.
//!
//! Wire shapes for tickets, classifications and decisions live here so the
//! engine crate and any future transport agree on one contract.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;
