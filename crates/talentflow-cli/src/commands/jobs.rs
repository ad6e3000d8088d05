//! Job commands against a running API server.

use anyhow::{Context, Result, bail};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use talentflow_core::{Job, JobPage};

pub struct ApiClient {
    base: String,
    http: Client,
}

impl ApiClient {
    pub fn new(api_url: &str) -> Self {
        Self {
            base: format!("{}/api/v1/jobs", api_url.trim_end_matches('/')),
            http: Client::new(),
        }
    }

    pub async fn list(
        &self,
        search: Option<String>,
        status: Option<String>,
        sort: Option<String>,
        page: usize,
        page_size: usize,
    ) -> Result<()> {
        let mut params = vec![
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        if let Some(search) = search {
            params.push(("search", search));
        }
        if let Some(status) = status {
            params.push(("status", status));
        }
        if let Some(sort) = sort {
            params.push(("sort", sort));
        }

        let page: JobPage = self.send(self.http.get(&self.base).query(&params)).await?;
        print_jobs(&page.results);
        let pages = page.total.div_ceil(page.page_size.max(1)).max(1);
        println!(
            "\npage {} of {} ({} jobs)",
            page.page, pages, page.total
        );
        Ok(())
    }

    pub async fn show(&self, id: &str) -> Result<()> {
        let job: Job = self.send(self.http.get(self.job_url(id))).await?;
        print_job(&job);
        Ok(())
    }

    pub async fn create(
        &self,
        title: String,
        slug: Option<String>,
        description: Option<String>,
        tags: Vec<String>,
    ) -> Result<()> {
        let body = json!({
            "title": title,
            "slug": slug,
            "description": description,
            "tags": tags,
        });
        let job: Job = self.send(self.http.post(&self.base).json(&body)).await?;
        println!("Created job {} at order {}", job.id, job.order);
        Ok(())
    }

    pub async fn update(
        &self,
        id: &str,
        title: Option<String>,
        slug: Option<String>,
        description: Option<String>,
        tags: Option<Vec<String>>,
    ) -> Result<()> {
        let body = json!({
            "title": title,
            "slug": slug,
            "description": description,
            "tags": tags,
        });
        let job: Job = self
            .send(self.http.patch(self.job_url(id)).json(&body))
            .await?;
        print_job(&job);
        Ok(())
    }

    pub async fn archive(&self, id: &str, restore: bool) -> Result<()> {
        let status = if restore { "active" } else { "archived" };
        let job: Job = self
            .send(
                self.http
                    .patch(self.job_url(id))
                    .json(&json!({ "status": status })),
            )
            .await?;
        println!("Job {} is now {}", job.id, job.status);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let _: Value = self.send(self.http.delete(self.job_url(id))).await?;
        println!("Deleted job {}", id);
        Ok(())
    }

    pub async fn reorder(&self, id: &str, from: u32, to: u32) -> Result<()> {
        let jobs: Vec<Job> = self
            .send(
                self.http
                    .patch(format!("{}/reorder", self.job_url(id)))
                    .json(&json!({ "fromOrder": from, "toOrder": to })),
            )
            .await?;
        print_jobs(&jobs);
        Ok(())
    }

    fn job_url(&self, id: &str) -> String {
        format!("{}/{}", self.base, id)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .context("Failed to reach the API server")?;
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .context("Failed to decode API response");
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = body["error"].as_str().unwrap_or("no error message");
        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            bail!("{} ({}), nothing was changed; try again", message, status);
        }
        bail!("{} ({})", message, status);
    }
}

fn print_jobs(jobs: &[Job]) {
    for job in jobs {
        println!(
            "{:>4}  {}  {:<8}  {}",
            job.order, job.id, job.status, job.title
        );
    }
}

fn print_job(job: &Job) {
    println!("{} ({})", job.title, job.slug);
    println!("  id:      {}", job.id);
    println!("  order:   {}", job.order);
    println!("  status:  {}", job.status);
    if !job.tags.is_empty() {
        println!("  tags:    {}", job.tags.join(", "));
    }
    if !job.description.is_empty() {
        println!("  {}", job.description);
    }
    println!("  updated: {}", job.updated_at.to_rfc3339());
}
