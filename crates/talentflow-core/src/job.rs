//! Job postings.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::{Error, JobId, Result};

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// A job posting in the hiring pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    /// URL-safe name, unique across the collection.
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub status: JobStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    /// 1-based position. Across a collection the orders are exactly `1..=N`.
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Archived,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(JobStatus::Active),
            "archived" => Ok(JobStatus::Archived),
            other => Err(Error::InvalidInput(format!("unknown job status: {}", other))),
        }
    }
}

/// Fields accepted when creating a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub status: Option<JobStatus>,
    pub tags: Option<Vec<String>>,
}

/// Partial update of a job. The order is owned by the reconciler and cannot be patched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub status: Option<JobStatus>,
    pub tags: Option<Vec<String>>,
}

impl Job {
    /// Build a new job at the given order, validating title and slug.
    pub fn create(new: NewJob, order: u32, now: DateTime<Utc>) -> Result<Self> {
        let title = normalize_title(&new.title)?;
        let slug = normalize_slug(new.slug.as_deref().unwrap_or(&title))?;

        Ok(Self {
            id: JobId::new(),
            title,
            slug,
            description: new.description.unwrap_or_default(),
            status: new.status.unwrap_or_default(),
            tags: new.tags.unwrap_or_default(),
            order,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a patch in place. Leaves the job untouched on error.
    pub fn apply(&mut self, patch: JobPatch, now: DateTime<Utc>) -> Result<()> {
        let title = patch.title.as_deref().map(normalize_title).transpose()?;
        let slug = patch.slug.as_deref().map(normalize_slug).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(slug) = slug {
            self.slug = slug;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Turn a title into a slug: lowercase, non-alphanumeric runs become `-`.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Reject `slug` if another job (other than `except`) already uses it.
pub fn ensure_unique_slug(jobs: &[Job], slug: &str, except: Option<JobId>) -> Result<()> {
    let taken = jobs
        .iter()
        .any(|j| j.slug == slug && Some(j.id) != except);
    if taken {
        return Err(Error::Conflict(format!(
            "job with slug \"{}\" already exists",
            slug
        )));
    }
    Ok(())
}

fn normalize_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput("job title is required".to_string()));
    }
    Ok(title.to_string())
}

fn normalize_slug(raw: &str) -> Result<String> {
    let slug = slugify(raw);
    if slug.is_empty() {
        return Err(Error::InvalidInput(
            "job slug must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(slug)
}
