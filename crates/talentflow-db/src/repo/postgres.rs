//! PostgreSQL job store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use talentflow_core::{Job, JobId, JobStatus};
use tracing::debug;

use crate::{DbError, DbResult, JobStore};

const UNIQUE_VIOLATION: &str = "23505";

/// A job row in the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobRecord {
    pub id: uuid::Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub status: String,
    pub tags: Vec<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<JobRecord> for Job {
    type Error = DbError;

    fn try_from(record: JobRecord) -> DbResult<Self> {
        let status = record
            .status
            .parse::<JobStatus>()
            .map_err(|_| DbError::Corrupt(format!("job {} status {}", record.id, record.status)))?;
        let order = u32::try_from(record.position).map_err(|_| {
            DbError::Corrupt(format!("job {} position {}", record.id, record.position))
        })?;

        Ok(Job {
            id: JobId::from(record.id),
            title: record.title,
            slug: record.slug,
            description: record.description,
            status,
            tags: record.tags,
            order,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// PostgreSQL implementation of JobStore.
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn get_all(&self) -> DbResult<Vec<Job>> {
        let records = sqlx::query_as::<_, JobRecord>("SELECT * FROM jobs ORDER BY position")
            .fetch_all(&self.pool)
            .await?;
        records.into_iter().map(Job::try_from).collect()
    }

    async fn get(&self, id: JobId) -> DbResult<Option<Job>> {
        let record = sqlx::query_as::<_, JobRecord>("SELECT * FROM jobs WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        record.map(Job::try_from).transpose()
    }

    async fn bulk_replace(&self, jobs: Vec<Job>) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM jobs").execute(&mut *tx).await?;

        for job in &jobs {
            let position = i32::try_from(job.order)
                .map_err(|_| DbError::Corrupt(format!("job {} order {}", job.id, job.order)))?;

            sqlx::query(
                r#"
                INSERT INTO jobs
                    (id, title, slug, description, status, tags, position, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(job.id.as_uuid())
            .bind(&job.title)
            .bind(&job.slug)
            .bind(&job.description)
            .bind(job.status.as_str())
            .bind(&job.tags)
            .bind(position)
            .bind(job.created_at)
            .bind(job.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| unique_violation(e, job))?;
        }

        // Dropping `tx` on any early return rolls the whole replace back.
        tx.commit().await?;
        debug!(count = jobs.len(), "Replaced job collection");
        Ok(())
    }
}

fn unique_violation(err: sqlx::Error, job: &Job) -> DbError {
    let is_unique = err
        .as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION);

    if is_unique {
        DbError::Duplicate(format!("job {} ({})", job.id, job.slug))
    } else {
        DbError::Database(err)
    }
}
