use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use mongodb::bson::doc;
use serde_json::json;

use crate::{error::ApiError, AppState};

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "ts": Utc::now().to_rfc3339() }))
}

pub async fn health_db(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .db
        .run_command(doc! { "ping": 1 }, None)
        .await
        .map_err(ApiError::db)?;

    Ok(Json(json!({ "ok": true })))
}

pub async fn not_found() -> impl IntoResponse {
    ApiError::NotFound
}
