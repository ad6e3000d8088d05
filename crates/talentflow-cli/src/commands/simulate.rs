//! Local reorder simulation with injected storage faults.

use std::sync::Arc;

use anyhow::{Result, bail};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use talentflow_config::NetworkConfig;
use talentflow_core::order::verify_dense;
use talentflow_db::seed::sample_jobs;
use talentflow_db::{JobStore, MemoryJobStore};
use talentflow_service::{FaultInjector, FlakyStore, JobService, OptimisticBoard};

const LOAD_ATTEMPTS: usize = 10;

pub struct SimulateOptions {
    pub jobs: usize,
    pub moves: usize,
    pub failure_rate: f64,
    pub max_delay_ms: u64,
    pub seed: Option<u64>,
}

#[derive(Debug, Default)]
struct Tally {
    applied: usize,
    unchanged: usize,
    rolled_back: usize,
}

/// Drive an [`OptimisticBoard`] through random moves.
///
/// After every move the board must hold a dense ordering and match the store
/// exactly, whether the write went through or was rolled back.
pub async fn run(opts: SimulateOptions) -> Result<()> {
    let network = NetworkConfig {
        min_delay_ms: 0,
        max_delay_ms: opts.max_delay_ms,
        failure_rate: opts.failure_rate,
    };
    network.validate()?;
    if opts.jobs < 2 {
        bail!("Need at least two jobs to reorder");
    }

    let seed = opts.seed.unwrap_or_else(rand::random);
    println!(
        "Simulating {} moves over {} jobs (failure rate {:.1}%, seed {})",
        opts.moves,
        opts.jobs,
        opts.failure_rate * 100.0,
        seed
    );

    let backing = Arc::new(MemoryJobStore::with_jobs(sample_jobs(opts.jobs, Utc::now())?)?);
    let flaky = FlakyStore::new(backing.clone(), FaultInjector::with_seed(&network, seed));
    let service = Arc::new(JobService::new(Arc::new(flaky)));
    let mut board = load_board(service).await?;

    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut tally = Tally::default();
    let len = board.jobs().len() as u32;

    for step in 1..=opts.moves {
        let from = rng.random_range(1..=len);
        let to = rng.random_range(1..=len);
        let job = &board.jobs()[(from - 1) as usize];
        let (id, title) = (job.id, job.title.clone());

        match board.move_job(id, from, to).await {
            Ok(()) if from == to => tally.unchanged += 1,
            Ok(()) => {
                tally.applied += 1;
                println!("{:>4}. moved   {:<28} {:>3} -> {:<3}", step, title, from, to);
            }
            Err(e) if e.is_transient() => {
                tally.rolled_back += 1;
                println!(
                    "{:>4}. rolled back {:<24} {:>3} -> {:<3} ({})",
                    step, title, from, to, e
                );
            }
            Err(e) => return Err(e.into()),
        }

        verify_dense(board.jobs())?;
        if backing.get_all().await?.as_slice() != board.jobs() {
            bail!("Board diverged from the store after move {}", step);
        }
    }

    println!(
        "\n{} applied, {} unchanged, {} rolled back; ordering stayed dense throughout",
        tally.applied, tally.unchanged, tally.rolled_back
    );
    Ok(())
}

/// The board's initial read can fail like any other call; retry it a few times.
async fn load_board(service: Arc<JobService>) -> Result<OptimisticBoard> {
    let mut last_error = None;
    for _ in 0..LOAD_ATTEMPTS {
        match OptimisticBoard::load(service.clone()).await {
            Ok(board) => return Ok(board),
            Err(e) if e.is_transient() => last_error = Some(e),
            Err(e) => return Err(e.into()),
        }
    }
    match last_error {
        Some(e) => bail!("Could not load the board after {} attempts: {}", LOAD_ATTEMPTS, e),
        None => bail!("Could not load the board"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(failure_rate: f64) -> SimulateOptions {
        SimulateOptions {
            jobs: 8,
            moves: 60,
            failure_rate,
            max_delay_ms: 0,
            seed: Some(42),
        }
    }

    #[tokio::test]
    async fn test_run_with_faults_keeps_board_consistent() {
        run(options(0.3)).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_without_faults() {
        run(options(0.0)).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_rejects_bad_options() {
        let too_few = SimulateOptions {
            jobs: 1,
            ..options(0.0)
        };
        assert!(run(too_few).await.is_err());
        assert!(run(options(1.5)).await.is_err());
    }
}
