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
use crate::models::{Company, CompanyFilter, CompanyPatch, NewCompany};

pub fn routes() -> Router {
    Router::new()
        .route("/companies", get(list).post(create))
        .route(
            "/companies/:handle",
            get(show).patch(update).delete(remove),
        )
        .route_layer(axum::middleware::from_fn(require_admin_writes))
}

/// GET /companies - list companies, optionally filtered
async fn list(Query(filter): Query<CompanyFilter>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let companies = Company::find_all(&pool, &filter).await?;
    Ok(Json(json!({ "companies": companies })))
}

/// GET /companies/:handle - one company with its jobs
async fn show(Path(handle): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let company = Company::get(&pool, &handle).await?;
    Ok(Json(json!({ "company": company })))
}

/// POST /companies - create a company (admin)
async fn create(Json(data): Json<NewCompany>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let company = Company::create(&pool, &data).await?;
    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

/// PATCH /companies/:handle - partial update (admin)
async fn update(
    Path(handle): Path<String>,
    Json(patch): Json<CompanyPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let company = Company::update(&pool, &handle, &patch).await?;
    Ok(Json(json!({ "company": company })))
}

/// DELETE /companies/:handle - delete a company (admin)
async fn remove(Path(handle): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Company::delete(&pool, &handle).await?;
    Ok(Json(json!({ "deleted": handle })))
}
