//! Client-side view of the job board with optimistic reordering.

use std::sync::Arc;

use chrono::Utc;
use talentflow_core::order::{self, MovePlan, MoveRequest};
use talentflow_core::{Job, JobId, Result};
use tracing::warn;

use crate::JobService;

/// The ordering a client shows to its user.
///
/// A move is applied to the local view before the service confirms it. If the
/// service rejects the move the view reverts to the last known-good
/// collection, so no job ever shows a duplicate or missing order.
pub struct OptimisticBoard {
    service: Arc<JobService>,
    jobs: Vec<Job>,
}

impl OptimisticBoard {
    pub async fn load(service: Arc<JobService>) -> Result<Self> {
        let jobs = service.all().await?;
        Ok(Self { service, jobs })
    }

    /// Jobs as currently displayed, sorted by order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Replace the view with the service's current collection.
    /// On error the previous view is kept.
    pub async fn refresh(&mut self) -> Result<()> {
        self.jobs = self.service.all().await?;
        Ok(())
    }

    pub async fn move_job(&mut self, job_id: JobId, from_order: u32, to_order: u32) -> Result<()> {
        let request = MoveRequest {
            job_id,
            from_order,
            to_order,
        };

        let optimistic = match order::plan_move(&self.jobs, &request, Utc::now())? {
            MovePlan::Unchanged => return Ok(()),
            MovePlan::Reordered(jobs) => jobs,
        };
        let snapshot = std::mem::replace(&mut self.jobs, optimistic);

        match self.service.reorder(job_id, from_order, to_order).await {
            Ok(confirmed) => {
                self.jobs = confirmed;
                Ok(())
            }
            Err(err) => {
                warn!(
                    %job_id,
                    from_order,
                    to_order,
                    error = %err,
                    "Reorder rejected, rolling back"
                );
                self.jobs = snapshot;
                Err(err)
            }
        }
    }
}
