//! Simulated network faults at the storage boundary.
//!
//! Each storage call is delayed by a uniform random duration and fails with a
//! configurable probability. A failed call never reaches the wrapped store, so
//! a rejected write leaves the stored collection untouched.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use talentflow_config::NetworkConfig;
use talentflow_core::{Job, JobId};
use talentflow_db::{DbError, DbResult, JobStore};
use tracing::{debug, warn};

/// Decides the latency and outcome of simulated calls.
#[derive(Debug)]
pub struct FaultInjector {
    min_delay_ms: u64,
    max_delay_ms: u64,
    failure_rate: f64,
    rng: Mutex<StdRng>,
}

/// The sampled fate of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOutcome {
    pub delay: Duration,
    pub fail: bool,
}

impl FaultInjector {
    pub fn new(config: &NetworkConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic injector for tests and reproducible simulations.
    pub fn with_seed(config: &NetworkConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// An injector that never delays and never fails.
    pub fn disabled() -> Self {
        Self::with_seed(&NetworkConfig::none(), 0)
    }

    fn with_rng(config: &NetworkConfig, rng: StdRng) -> Self {
        Self {
            min_delay_ms: config.min_delay_ms.min(config.max_delay_ms),
            max_delay_ms: config.max_delay_ms,
            failure_rate: config.failure_rate,
            rng: Mutex::new(rng),
        }
    }

    /// Sample the delay and failure decision for the next call.
    pub fn next_outcome(&self) -> CallOutcome {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let delay_ms = if self.max_delay_ms == 0 {
            0
        } else {
            rng.random_range(self.min_delay_ms..=self.max_delay_ms)
        };
        let fail = self.failure_rate > 0.0 && rng.random::<f64>() < self.failure_rate;

        CallOutcome {
            delay: Duration::from_millis(delay_ms),
            fail,
        }
    }

    /// Run `call` after the simulated latency, unless the call is chosen to fail.
    ///
    /// On failure `call` is dropped without being polled and
    /// [`DbError::Unavailable`] is returned.
    pub async fn simulate_call<T, F>(&self, op: &'static str, call: F) -> DbResult<T>
    where
        F: Future<Output = DbResult<T>>,
    {
        let outcome = self.next_outcome();
        if !outcome.delay.is_zero() {
            debug!(op, delay_ms = outcome.delay.as_millis() as u64, "Simulating latency");
            tokio::time::sleep(outcome.delay).await;
        }

        if outcome.fail {
            warn!(op, "Injected storage failure");
            return Err(DbError::Unavailable(format!("simulated {} failure", op)));
        }
        call.await
    }
}

/// A [`JobStore`] that routes every call through a [`FaultInjector`].
pub struct FlakyStore {
    inner: Arc<dyn JobStore>,
    faults: FaultInjector,
}

impl FlakyStore {
    pub fn new(inner: Arc<dyn JobStore>, faults: FaultInjector) -> Self {
        Self { inner, faults }
    }
}

#[async_trait]
impl JobStore for FlakyStore {
    async fn get_all(&self) -> DbResult<Vec<Job>> {
        self.faults
            .simulate_call("get_all", self.inner.get_all())
            .await
    }

    async fn get(&self, id: JobId) -> DbResult<Option<Job>> {
        self.faults.simulate_call("get", self.inner.get(id)).await
    }

    async fn bulk_replace(&self, jobs: Vec<Job>) -> DbResult<()> {
        self.faults
            .simulate_call("bulk_replace", self.inner.bulk_replace(jobs))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use talentflow_db::MemoryJobStore;
    use talentflow_db::seed::sample_jobs;

    fn network(min: u64, max: u64, failure_rate: f64) -> NetworkConfig {
        NetworkConfig {
            min_delay_ms: min,
            max_delay_ms: max,
            failure_rate,
        }
    }

    #[test]
    fn test_delay_within_bounds() {
        let faults = FaultInjector::with_seed(&network(200, 1200, 0.0), 7);
        for _ in 0..200 {
            let outcome = faults.next_outcome();
            assert!(outcome.delay >= Duration::from_millis(200));
            assert!(outcome.delay <= Duration::from_millis(1200));
            assert!(!outcome.fail);
        }
    }

    #[test]
    fn test_same_seed_same_outcomes() {
        let config = network(0, 50, 0.5);
        let a = FaultInjector::with_seed(&config, 42);
        let b = FaultInjector::with_seed(&config, 42);
        for _ in 0..50 {
            assert_eq!(a.next_outcome(), b.next_outcome());
        }
    }

    #[test]
    fn test_failure_rate_extremes() {
        let never = FaultInjector::with_seed(&network(0, 0, 0.0), 1);
        let always = FaultInjector::with_seed(&network(0, 0, 1.0), 1);
        for _ in 0..100 {
            assert!(!never.next_outcome().fail);
            assert!(always.next_outcome().fail);
        }
    }

    #[test]
    fn test_disabled_is_immediate() {
        let outcome = FaultInjector::disabled().next_outcome();
        assert_eq!(outcome.delay, Duration::ZERO);
        assert!(!outcome.fail);
    }

    #[tokio::test]
    async fn test_failed_write_never_reaches_store() {
        let jobs = sample_jobs(3, Utc::now()).unwrap();
        let inner = Arc::new(MemoryJobStore::with_jobs(jobs.clone()).unwrap());
        let flaky = FlakyStore::new(
            inner.clone(),
            FaultInjector::with_seed(&network(0, 0, 1.0), 3),
        );

        let err = flaky.bulk_replace(Vec::new()).await.unwrap_err();
        assert!(matches!(err, DbError::Unavailable(_)));
        assert_eq!(inner.get_all().await.unwrap(), jobs);
    }

    #[tokio::test]
    async fn test_passes_through_when_healthy() {
        let jobs = sample_jobs(2, Utc::now()).unwrap();
        let inner = Arc::new(MemoryJobStore::with_jobs(jobs.clone()).unwrap());
        let flaky = FlakyStore::new(inner, FaultInjector::with_seed(&network(0, 2, 0.0), 3));

        assert_eq!(flaky.get_all().await.unwrap(), jobs);
        assert_eq!(flaky.get(jobs[1].id).await.unwrap(), Some(jobs[1].clone()));
    }
}
