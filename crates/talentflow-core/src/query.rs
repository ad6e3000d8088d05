//! Job listing: search, status filter, sort and pagination.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::{Job, JobStatus};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobSort {
    #[default]
    Order,
    Title,
    /// Newest first.
    CreatedAt,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobQuery {
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub status: Option<JobStatus>,
    /// 1-based page number.
    #[serde(deserialize_with = "blank_as_none")]
    pub page: Option<usize>,
    #[serde(deserialize_with = "blank_as_none")]
    pub page_size: Option<usize>,
    pub sort: JobSort,
}

/// Query strings carry every value as text; an empty value means "not set".
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

/// One page of jobs plus the number of jobs matching the filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPage {
    pub results: Vec<Job>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl JobQuery {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Filter, sort and slice `jobs`.
    pub fn apply(&self, mut jobs: Vec<Job>) -> JobPage {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            jobs.retain(|j| j.title.to_lowercase().contains(&needle));
        }
        if let Some(status) = self.status {
            jobs.retain(|j| j.status == status);
        }

        match self.sort {
            JobSort::Order => jobs.sort_by_key(|j| j.order),
            JobSort::Title => jobs.sort_by(|a, b| {
                a.title
                    .to_lowercase()
                    .cmp(&b.title.to_lowercase())
                    .then(a.order.cmp(&b.order))
            }),
            JobSort::CreatedAt => jobs.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then(a.order.cmp(&b.order))
            }),
        }

        let page = self.page();
        let page_size = self.page_size();
        let total = jobs.len();
        let results = jobs
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        JobPage {
            results,
            total,
            page,
            page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewJob;
    use chrono::{Duration, Utc};

    fn sample() -> Vec<Job> {
        let base = Utc::now();
        ["Frontend Developer", "Backend Engineer", "DevOps Engineer", "Data Scientist"]
            .iter()
            .enumerate()
            .map(|(i, title)| {
                let mut job = Job::create(
                    NewJob {
                        title: title.to_string(),
                        ..Default::default()
                    },
                    i as u32 + 1,
                    base + Duration::seconds(i as i64),
                )
                .unwrap();
                if i == 2 {
                    job.status = JobStatus::Archived;
                }
                job
            })
            .collect()
    }

    fn titles(page: &JobPage) -> Vec<&str> {
        page.results.iter().map(|j| j.title.as_str()).collect()
    }

    #[test]
    fn test_defaults_sort_by_order() {
        let mut jobs = sample();
        jobs.reverse();
        let page = JobQuery::default().apply(jobs);
        assert_eq!(page.total, 4);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(
            titles(&page),
            vec![
                "Frontend Developer",
                "Backend Engineer",
                "DevOps Engineer",
                "Data Scientist"
            ]
        );
    }

    #[test]
    fn test_search_and_status() {
        let query = JobQuery {
            search: Some("ENGINEER".to_string()),
            status: Some(JobStatus::Active),
            ..Default::default()
        };
        let page = query.apply(sample());
        assert_eq!(page.total, 1);
        assert_eq!(titles(&page), vec!["Backend Engineer"]);
    }

    #[test]
    fn test_sort_by_title_and_created_at() {
        let by_title = JobQuery {
            sort: JobSort::Title,
            ..Default::default()
        }
        .apply(sample());
        assert_eq!(titles(&by_title)[0], "Backend Engineer");

        let newest = JobQuery {
            sort: JobSort::CreatedAt,
            ..Default::default()
        }
        .apply(sample());
        assert_eq!(titles(&newest)[0], "Data Scientist");
    }

    #[test]
    fn test_pagination() {
        let query = JobQuery {
            page: Some(2),
            page_size: Some(3),
            ..Default::default()
        };
        let page = query.apply(sample());
        assert_eq!(page.total, 4);
        assert_eq!(titles(&page), vec!["Data Scientist"]);

        let past_end = JobQuery {
            page: Some(9),
            ..Default::default()
        }
        .apply(sample());
        assert!(past_end.results.is_empty());
        assert_eq!(past_end.total, 4);
    }

    #[test]
    fn test_blank_params_are_unset() {
        let query: JobQuery =
            serde_json::from_str(r#"{"status": "", "page": " ", "pageSize": ""}"#).unwrap();
        assert_eq!(query.status, None);
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), DEFAULT_PAGE_SIZE);

        let query: JobQuery =
            serde_json::from_str(r#"{"status": "archived", "page": "3", "pageSize": "5"}"#)
                .unwrap();
        assert_eq!(query.status, Some(JobStatus::Archived));
        assert_eq!(query.page(), 3);
        assert_eq!(query.page_size(), 5);

        assert!(serde_json::from_str::<JobQuery>(r#"{"status": "closed"}"#).is_err());
        assert!(serde_json::from_str::<JobQuery>(r#"{"page": "two"}"#).is_err());
    }

    #[test]
    fn test_page_bounds() {
        let query = JobQuery {
            page: Some(0),
            page_size: Some(10_000),
            ..Default::default()
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), MAX_PAGE_SIZE);
    }
}
