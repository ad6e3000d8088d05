//! Job endpoints.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::{Json, Path, Query};
use talentflow_core::{Job, JobId, JobPage, JobPatch, JobQuery, NewJob};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/{id}", get(get_job).patch(update_job).delete(delete_job))
        .route("/{id}/reorder", patch(reorder_job))
}

async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<JobPage>, ApiError> {
    Ok(Json(state.jobs.list(&query).await?))
}

async fn create_job(
    State(state): State<AppState>,
    Json(req): Json<NewJob>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let job = state.jobs.create(req).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> Result<Json<Job>, ApiError> {
    Ok(Json(state.jobs.get(id).await?))
}

async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
    Json(patch): Json<JobPatch>,
) -> Result<Json<Job>, ApiError> {
    Ok(Json(state.jobs.update(id, patch).await?))
}

#[derive(Debug, Serialize, Deserialize)]
struct DeleteResponse {
    id: JobId,
    deleted: bool,
}

async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.jobs.delete(id).await?;
    Ok(Json(DeleteResponse { id, deleted: true }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReorderRequest {
    from_order: u32,
    to_order: u32,
}

/// Returns the whole collection with its new orders.
async fn reorder_job(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<Vec<Job>>, ApiError> {
    let jobs = state
        .jobs
        .reorder(id, req.from_order, req.to_order)
        .await?;
    Ok(Json(jobs))
}
