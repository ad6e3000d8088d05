//! API server for TalentFlow.
//!
//! Provides the HTTP REST API over the job service.

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use state::AppState;
