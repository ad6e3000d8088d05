//! Sample data for demo and development stores.

use chrono::{DateTime, Utc};
use talentflow_core::{Job, JobStatus, NewJob};
use tracing::info;

use crate::{DbError, DbResult, JobStore};

const SAMPLE_TITLES: [&str; 25] = [
    "Frontend Developer",
    "Backend Engineer",
    "Fullstack Developer",
    "UI/UX Designer",
    "DevOps Engineer",
    "QA Engineer",
    "Product Manager",
    "Data Scientist",
    "Mobile App Developer",
    "Technical Writer",
    "Cloud Engineer",
    "AI/ML Engineer",
    "Salesforce Developer",
    "Business Analyst",
    "Scrum Master",
    "Support Engineer",
    "Cybersecurity Analyst",
    "Database Administrator",
    "Network Engineer",
    "Game Developer",
    "Embedded Systems Engineer",
    "Systems Architect",
    "Site Reliability Engineer",
    "Blockchain Developer",
    "SEO Specialist",
];

/// Build `count` sample jobs with orders `1..=count`.
///
/// Titles cycle through the sample list; repeats get a numeric suffix so slugs
/// stay unique. Every fourth job is archived.
pub fn sample_jobs(count: usize, now: DateTime<Utc>) -> DbResult<Vec<Job>> {
    (0..count)
        .map(|i| {
            let base = SAMPLE_TITLES[i % SAMPLE_TITLES.len()];
            let round = i / SAMPLE_TITLES.len();
            let title = if round == 0 {
                base.to_string()
            } else {
                format!("{} {}", base, round + 1)
            };
            let status = if i % 4 == 3 {
                JobStatus::Archived
            } else {
                JobStatus::Active
            };

            let new = NewJob {
                title,
                status: Some(status),
                tags: Some(vec!["tag1".to_string(), "tag2".to_string()]),
                ..Default::default()
            };
            Job::create(new, i as u32 + 1, now).map_err(|e| DbError::Corrupt(e.to_string()))
        })
        .collect()
}

/// Write sample jobs into `store` if it holds none. Returns how many were written.
pub async fn seed_if_empty(store: &dyn JobStore, count: usize) -> DbResult<usize> {
    if count == 0 || !store.get_all().await?.is_empty() {
        return Ok(0);
    }

    let jobs = sample_jobs(count, Utc::now())?;
    store.bulk_replace(jobs).await?;
    info!(count, "Seeded sample jobs");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryJobStore;
    use talentflow_core::order::verify_dense;

    #[test]
    fn test_sample_jobs_are_dense_and_unique() {
        let jobs = sample_jobs(60, Utc::now()).unwrap();
        assert_eq!(jobs.len(), 60);
        verify_dense(&jobs).unwrap();

        let mut slugs: Vec<&str> = jobs.iter().map(|j| j.slug.as_str()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), 60);
        assert_eq!(jobs[25].slug, "frontend-developer-2");
        assert_eq!(jobs[3].status, JobStatus::Archived);
    }

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let store = MemoryJobStore::new();
        assert_eq!(seed_if_empty(&store, 5).await.unwrap(), 5);
        assert_eq!(seed_if_empty(&store, 5).await.unwrap(), 0);
        assert_eq!(store.get_all().await.unwrap().len(), 5);
    }
}
