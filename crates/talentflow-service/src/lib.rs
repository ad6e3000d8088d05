//! Job service for TalentFlow.
//!
//! Serializes every mutation of the job collection behind a single writer,
//! injects simulated network faults at the storage boundary, and offers an
//! optimistic client-side board that rolls back when a write is rejected.

pub mod board;
pub mod fault;
pub mod jobs;

pub use board::OptimisticBoard;
pub use fault::{FaultInjector, FlakyStore};
pub use jobs::JobService;
