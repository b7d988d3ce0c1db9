pub mod companies;
pub mod jobs;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::db::DatabaseManager;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Jobly API",
        "version": version,
        "description": "Job board REST backend - companies and jobs with filtered search",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "companies": "GET /companies[?name&minEmployees&maxEmployees], GET /companies/:handle (public); POST, PATCH, DELETE (admin)",
            "jobs": "GET /jobs[?title&minSalary&hasEquity], GET /jobs/:id (public); POST, PATCH, DELETE (admin)",
        }
    }))
}

pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
