//! In-memory job store.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use talentflow_core::{Job, JobId};
use tokio::sync::RwLock;

use crate::{DbError, DbResult, JobStore};

/// Job store held in process memory. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: RwLock<BTreeMap<JobId, Job>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `jobs`.
    pub fn with_jobs(jobs: Vec<Job>) -> DbResult<Self> {
        Ok(Self {
            jobs: RwLock::new(index(jobs)?),
        })
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn get_all(&self) -> DbResult<Vec<Job>> {
        let mut jobs: Vec<Job> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by_key(|j| j.order);
        Ok(jobs)
    }

    async fn get(&self, id: JobId) -> DbResult<Option<Job>> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn bulk_replace(&self, jobs: Vec<Job>) -> DbResult<()> {
        let replacement = index(jobs)?;
        *self.jobs.write().await = replacement;
        Ok(())
    }
}

/// Key jobs by id, enforcing the same uniqueness rules as the SQL schema.
fn index(jobs: Vec<Job>) -> DbResult<BTreeMap<JobId, Job>> {
    let mut slugs = HashSet::new();
    let mut orders = HashSet::new();
    let mut map = BTreeMap::new();

    for job in jobs {
        if !slugs.insert(job.slug.clone()) {
            return Err(DbError::Duplicate(format!("job slug {}", job.slug)));
        }
        if !orders.insert(job.order) {
            return Err(DbError::Duplicate(format!("job order {}", job.order)));
        }
        if let Some(previous) = map.insert(job.id, job) {
            return Err(DbError::Duplicate(format!("job {}", previous.id)));
        }
    }
    Ok(map)
}
