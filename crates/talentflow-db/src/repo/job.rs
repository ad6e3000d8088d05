//! Job store contract.

use async_trait::async_trait;
use talentflow_core::{Job, JobId};

use crate::DbResult;

/// Persistence for the job collection.
///
/// Stores hold the whole collection and expose one write: an atomic replace.
/// Either every record of a `bulk_replace` becomes visible or none does, so a
/// reader never observes a half-applied reorder.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// All jobs sorted by order.
    async fn get_all(&self) -> DbResult<Vec<Job>>;

    async fn get(&self, id: JobId) -> DbResult<Option<Job>>;

    /// Replace the entire collection with `jobs`.
    ///
    /// Rejects duplicate ids, slugs or orders with [`crate::DbError::Duplicate`]
    /// and leaves the previous collection in place.
    async fn bulk_replace(&self, jobs: Vec<Job>) -> DbResult<()>;
}
