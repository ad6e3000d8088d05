//! Core domain types for the TalentFlow hiring pipeline.
//!
//! This crate contains:
//! - Job identifiers and records
//! - The error taxonomy shared by every layer
//! - Order reconciliation (moving a job within the dense `1..=N` ordering)
//! - Job listing queries (search, status filter, sort, pagination)

pub mod error;
pub mod id;
pub mod job;
pub mod order;
pub mod query;

pub use error::{Error, Result};
pub use id::JobId;
pub use job::{Job, JobPatch, JobStatus, NewJob};
pub use order::{MovePlan, MoveRequest};
pub use query::{JobPage, JobQuery, JobSort};
