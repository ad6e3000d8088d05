//! Order reconciliation for the job board.
//!
//! Jobs carry a 1-based `order`; across a collection of `N` jobs the orders are
//! exactly `1..=N`. Moving one job re-stamps every job so that invariant holds
//! again afterwards. Everything here is pure: persistence and fault handling
//! live with the callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Job, JobId, Result};

/// A request to move one job to a new position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub job_id: JobId,
    /// The order the client believes the job currently has.
    pub from_order: u32,
    /// The order the job should have after the move.
    pub to_order: u32,
}

/// Outcome of planning a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovePlan {
    /// The job is already where it was asked to go. Nothing needs writing.
    Unchanged,
    /// The full collection with new orders, sorted by order.
    Reordered(Vec<Job>),
}

/// Compute the collection that results from moving a job.
///
/// The moving job is resolved by id. `from_order` is checked against the job's
/// current order and a mismatch is reported as [`Error::Conflict`], since the
/// caller acted on a stale view. Both orders must exist in the collection.
///
/// Jobs whose order changes get `updated_at = now`; the rest are returned as-is.
pub fn plan_move(jobs: &[Job], request: &MoveRequest, now: DateTime<Utc>) -> Result<MovePlan> {
    verify_dense(jobs)?;

    let len = jobs.len() as u64;
    for (label, value) in [("from", request.from_order), ("to", request.to_order)] {
        if value == 0 || u64::from(value) > len {
            return Err(Error::NotFound(format!(
                "no job at {} order {} (collection has {} jobs)",
                label, value, len
            )));
        }
    }

    let mut ordered = jobs.to_vec();
    ordered.sort_by_key(|j| j.order);

    let index = ordered
        .iter()
        .position(|j| j.id == request.job_id)
        .ok_or_else(|| Error::NotFound(format!("job {}", request.job_id)))?;

    let current = ordered[index].order;
    if current != request.from_order {
        return Err(Error::Conflict(format!(
            "job {} is at order {}, not {}",
            request.job_id, current, request.from_order
        )));
    }

    if request.from_order == request.to_order {
        return Ok(MovePlan::Unchanged);
    }

    let moving = ordered.remove(index);
    // The reduced sequence has N-1 jobs; inserting at `to - 1` leaves the job at `to`.
    ordered.insert((request.to_order - 1) as usize, moving);
    stamp_positions(&mut ordered, now);

    Ok(MovePlan::Reordered(ordered))
}

/// Sort by order and close any gaps, e.g. after a job was removed.
pub fn restamp(jobs: &mut [Job], now: DateTime<Utc>) {
    jobs.sort_by_key(|j| j.order);
    stamp_positions(jobs, now);
}

/// The order a newly created job gets: one past the current maximum.
pub fn next_order(jobs: &[Job]) -> u32 {
    jobs.iter().map(|j| j.order).max().unwrap_or(0) + 1
}

/// Check that the orders form exactly `1..=N` with no repeats.
pub fn verify_dense(jobs: &[Job]) -> Result<()> {
    let len = jobs.len();
    let mut seen = vec![false; len];

    for job in jobs {
        let slot = (job.order as usize).checked_sub(1).filter(|&i| i < len);
        match slot {
            Some(i) if !seen[i] => seen[i] = true,
            _ => {
                return Err(Error::Internal(format!(
                    "job {} has order {} outside the dense sequence 1..={}",
                    job.id, job.order, len
                )));
            }
        }
    }
    Ok(())
}

fn stamp_positions(jobs: &mut [Job], now: DateTime<Utc>) {
    for (index, job) in jobs.iter_mut().enumerate() {
        let order = index as u32 + 1;
        if job.order != order {
            job.order = order;
            job.updated_at = now;
        }
    }
}
