use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::db::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::require_admin_writes;
use crate::models::{Job, JobFilter, JobPatch, NewJob};

pub fn routes() -> Router {
    Router::new()
        .route("/jobs", get(list).post(create))
        .route("/jobs/:id", get(show).patch(update).delete(remove))
        .route_layer(axum::middleware::from_fn(require_admin_writes))
}

/// GET /jobs - list jobs, optionally filtered
async fn list(Query(filter): Query<JobFilter>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let jobs = Job::find_all(&pool, &filter).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

/// GET /jobs/:id - one job
async fn show(Path(id): Path<i32>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let job = Job::get(&pool, id).await?;
    Ok(Json(json!({ "job": job })))
}

/// POST /jobs - create a job (admin)
async fn create(Json(data): Json<NewJob>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let job = Job::create(&pool, &data).await?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

/// PATCH /jobs/:id - partial update (admin)
async fn update(
    Path(id): Path<i32>,
    Json(patch): Json<JobPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let job = Job::update(&pool, id, &patch).await?;
    Ok(Json(json!({ "job": job })))
}

/// DELETE /jobs/:id - delete a job (admin)
async fn remove(Path(id): Path<i32>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Job::delete(&pool, id).await?;
    Ok(Json(json!({ "deleted": id })))
}
