//! Job service: CRUD and reordering over a [`JobStore`].

use std::sync::Arc;

use chrono::Utc;
use talentflow_core::job::ensure_unique_slug;
use talentflow_core::order::{self, MovePlan, MoveRequest};
use talentflow_core::{Error, Job, JobId, JobPage, JobPatch, JobQuery, NewJob, Result};
use talentflow_db::JobStore;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Owns the job collection's write path.
///
/// All mutations run one at a time: each holds `writer` across its
/// read-modify-write, so two reorders can never interleave and break the dense
/// `1..=N` ordering. Reads go straight to the store, whose `bulk_replace` is
/// atomic.
pub struct JobService {
    store: Arc<dyn JobStore>,
    writer: Mutex<()>,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
        }
    }

    /// All jobs sorted by order.
    pub async fn all(&self) -> Result<Vec<Job>> {
        Ok(self.store.get_all().await?)
    }

    pub async fn list(&self, query: &JobQuery) -> Result<JobPage> {
        let jobs = self.store.get_all().await?;
        Ok(query.apply(jobs))
    }

    pub async fn get(&self, id: JobId) -> Result<Job> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("job {}", id)))
    }

    /// Create a job at the end of the ordering.
    pub async fn create(&self, new: NewJob) -> Result<Job> {
        let _guard = self.writer.lock().await;
        let mut jobs = self.store.get_all().await?;

        let job = Job::create(new, order::next_order(&jobs), Utc::now())?;
        ensure_unique_slug(&jobs, &job.slug, None)?;
        jobs.push(job.clone());

        self.write("create", jobs).await?;
        info!(job_id = %job.id, slug = %job.slug, order = job.order, "Created job");
        Ok(job)
    }

    /// Update a job's fields. Its order is left alone.
    pub async fn update(&self, id: JobId, patch: JobPatch) -> Result<Job> {
        let _guard = self.writer.lock().await;
        let mut jobs = self.store.get_all().await?;

        let index = position_of(&jobs, id)?;
        let mut job = jobs[index].clone();
        job.apply(patch, Utc::now())?;
        ensure_unique_slug(&jobs, &job.slug, Some(id))?;
        jobs[index] = job.clone();

        self.write("update", jobs).await?;
        info!(job_id = %id, "Updated job");
        Ok(job)
    }

    /// Delete a job and close the gap it leaves in the ordering.
    pub async fn delete(&self, id: JobId) -> Result<()> {
        let _guard = self.writer.lock().await;
        let mut jobs = self.store.get_all().await?;

        let removed = jobs.remove(position_of(&jobs, id)?);
        order::restamp(&mut jobs, Utc::now());

        self.write("delete", jobs).await?;
        info!(job_id = %id, order = removed.order, "Deleted job");
        Ok(())
    }

    /// Move a job from `from_order` to `to_order` and return the whole
    /// collection sorted by its new orders.
    ///
    /// A move to the job's current position writes nothing. A failed write
    /// leaves the stored collection exactly as it was; this method does not retry.
    pub async fn reorder(&self, job_id: JobId, from_order: u32, to_order: u32) -> Result<Vec<Job>> {
        let request = MoveRequest {
            job_id,
            from_order,
            to_order,
        };

        let _guard = self.writer.lock().await;
        let jobs = self.store.get_all().await?;

        match order::plan_move(&jobs, &request, Utc::now())? {
            MovePlan::Unchanged => Ok(jobs),
            MovePlan::Reordered(reordered) => {
                self.write("reorder", reordered.clone()).await?;
                info!(%job_id, from_order, to_order, "Reordered job");
                Ok(reordered)
            }
        }
    }

    async fn write(&self, op: &'static str, jobs: Vec<Job>) -> Result<()> {
        self.store.bulk_replace(jobs).await.map_err(|e| {
            let err = Error::from(e);
            if err.is_transient() {
                warn!(op, error = %err, "Job write failed, nothing was applied");
            }
            err
        })
    }
}

fn position_of(jobs: &[Job], id: JobId) -> Result<usize> {
    jobs.iter()
        .position(|j| j.id == id)
        .ok_or_else(|| Error::NotFound(format!("job {}", id)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use talentflow_config::NetworkConfig;
    use talentflow_core::JobStatus;
    use talentflow_core::order::verify_dense;
    use talentflow_db::{DbError, DbResult, MemoryJobStore};

    use crate::{FaultInjector, FlakyStore};

    /// Memory store that counts writes and can be told to reject them.
    #[derive(Default)]
    pub(crate) struct ControlledStore {
        inner: MemoryJobStore,
        pub(crate) writes: AtomicUsize,
        pub(crate) reject_writes: AtomicBool,
    }

    #[async_trait]
    impl JobStore for ControlledStore {
        async fn get_all(&self) -> DbResult<Vec<Job>> {
            self.inner.get_all().await
        }

        async fn get(&self, id: JobId) -> DbResult<Option<Job>> {
            self.inner.get(id).await
        }

        async fn bulk_replace(&self, jobs: Vec<Job>) -> DbResult<()> {
            if self.reject_writes.load(Ordering::SeqCst) {
                return Err(DbError::Unavailable("write rejected".to_string()));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.bulk_replace(jobs).await
        }
    }

    pub(crate) async fn service_with(titles: &[&str]) -> (JobService, Arc<ControlledStore>) {
        let store = Arc::new(ControlledStore::default());
        let service = JobService::new(store.clone());
        for title in titles {
            service
                .create(NewJob {
                    title: title.to_string(),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        store.writes.store(0, Ordering::SeqCst);
        (service, store)
    }

    pub(crate) fn layout(jobs: &[Job]) -> Vec<(String, u32)> {
        jobs.iter().map(|j| (j.title.clone(), j.order)).collect()
    }

    pub(crate) fn expect(pairs: &[(&str, u32)]) -> Vec<(String, u32)> {
        pairs.iter().map(|(t, o)| (t.to_string(), *o)).collect()
    }

    async fn id_of(service: &JobService, title: &str) -> JobId {
        service
            .all()
            .await
            .unwrap()
            .into_iter()
            .find(|j| j.title == title)
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_appends() {
        let (service, _) = service_with(&["Job1", "Job2"]).await;
        let job = service
            .create(NewJob {
                title: "Job3".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(job.order, 3);
        assert_eq!(job.slug, "job3");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_slug() {
        let (service, store) = service_with(&["Backend Engineer"]).await;
        let err = service
            .create(NewJob {
                title: "Backend  Engineer".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_keeps_order() {
        let (service, _) = service_with(&["Job1", "Job2"]).await;
        let id = id_of(&service, "Job2").await;

        let job = service
            .update(
                id,
                JobPatch {
                    status: Some(JobStatus::Archived),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(job.order, 2);
        assert_eq!(service.get(id).await.unwrap().status, JobStatus::Archived);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_slug() {
        let (service, _) = service_with(&["Job1", "Job2"]).await;
        let id = id_of(&service, "Job2").await;
        let err = service
            .update(
                id,
                JobPatch {
                    slug: Some("job1".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_closes_gap() {
        let (service, _) = service_with(&["A", "B", "C", "D"]).await;
        service.delete(id_of(&service, "B").await).await.unwrap();

        let jobs = service.all().await.unwrap();
        assert_eq!(layout(&jobs), expect(&[("A", 1), ("C", 2), ("D", 3)]));

        let err = service.delete(JobId::new()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reorder_forward_and_backward() {
        let (service, _) = service_with(&["A", "B", "C", "D"]).await;

        let jobs = service
            .reorder(id_of(&service, "A").await, 1, 3)
            .await
            .unwrap();
        assert_eq!(
            layout(&jobs),
            expect(&[("B", 1), ("C", 2), ("A", 3), ("D", 4)])
        );

        let jobs = service
            .reorder(id_of(&service, "D").await, 4, 1)
            .await
            .unwrap();
        assert_eq!(
            layout(&jobs),
            expect(&[("D", 1), ("B", 2), ("C", 3), ("A", 4)])
        );
        assert_eq!(layout(&service.all().await.unwrap()), layout(&jobs));
    }

    #[tokio::test]
    async fn test_reorder_scenario() {
        let (service, _) = service_with(&["Job1", "Job2", "Job3"]).await;
        let job2 = id_of(&service, "Job2").await;

        let jobs = service.reorder(job2, 2, 1).await.unwrap();
        assert_eq!(
            layout(&jobs),
            expect(&[("Job2", 1), ("Job1", 2), ("Job3", 3)])
        );

        let jobs = service.reorder(job2, 1, 3).await.unwrap();
        assert_eq!(
            layout(&jobs),
            expect(&[("Job1", 1), ("Job3", 2), ("Job2", 3)])
        );
    }

    #[tokio::test]
    async fn test_reorder_same_position_writes_nothing() {
        let (service, store) = service_with(&["A", "B", "C"]).await;
        let before = service.all().await.unwrap();

        let jobs = service
            .reorder(id_of(&service, "B").await, 2, 2)
            .await
            .unwrap();
        assert_eq!(jobs, before);
        assert_eq!(service.all().await.unwrap(), before);
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reorder_failed_write_leaves_collection() {
        let (service, store) = service_with(&["A", "B", "C", "D"]).await;
        let before = service.all().await.unwrap();
        store.reject_writes.store(true, Ordering::SeqCst);

        let err = service
            .reorder(id_of(&service, "A").await, 1, 4)
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert_eq!(service.all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_reorder_not_found_leaves_collection() {
        let (service, store) = service_with(&["A", "B", "C"]).await;
        let before = service.all().await.unwrap();

        let err = service
            .reorder(id_of(&service, "A").await, 9, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(service.all().await.unwrap(), before);
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reorders_stay_dense() {
        let titles: Vec<String> = (1..=8).map(|i| format!("Job{i}")).collect();
        let jobs: Vec<Job> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                Job::create(
                    NewJob {
                        title: t.clone(),
                        ..Default::default()
                    },
                    i as u32 + 1,
                    Utc::now(),
                )
                .unwrap()
            })
            .collect();

        let slow = FlakyStore::new(
            Arc::new(MemoryJobStore::with_jobs(jobs).unwrap()),
            FaultInjector::with_seed(
                &NetworkConfig {
                    min_delay_ms: 0,
                    max_delay_ms: 3,
                    failure_rate: 0.0,
                },
                11,
            ),
        );
        let service = Arc::new(JobService::new(Arc::new(slow)));

        let tasks: Vec<_> = (0..24u32)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    // Everyone races to move whatever sits first to the back.
                    let snapshot = service.all().await?;
                    let first = snapshot.iter().find(|j| j.order == 1).unwrap().id;
                    service.reorder(first, 1, 8 - (i % 3)).await
                })
            })
            .collect();

        for result in futures::future::join_all(tasks).await {
            match result.unwrap() {
                Ok(jobs) => verify_dense(&jobs).unwrap(),
                Err(Error::Conflict(_)) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        let jobs = service.all().await.unwrap();
        assert_eq!(jobs.len(), 8);
        verify_dense(&jobs).unwrap();
    }
}
