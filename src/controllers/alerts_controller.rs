use axum::{
    extract::{Extension, Path, State},
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::ApiError,
    models::{CurrentUser, Platform, PriceAlert},
    services::{alerts_service, watchlist_service},
    AppState,
};

use super::search_controller::MAX_PRICE_VALUE;

fn parse_oid(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::bad_request("bad id"))
}

fn alert_json(alert: &PriceAlert) -> serde_json::Value {
    let rfc3339 = |ts: i64| {
        chrono::DateTime::from_timestamp(ts, 0)
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| ts.to_string())
    };

    json!({
        "id": alert.id.to_hex(),
        "platform": alert.platform,
        "target_price": alert.target_price,
        "is_active": alert.is_active,
        "last_triggered": alert.last_triggered.map(rfc3339),
        "created_at": rfc3339(alert.created_at),
    })
}

// GET /api/watchlist/:id/alerts
pub async fn get_alerts(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let oid = parse_oid(&id)?;

    let item = watchlist_service::get_owned(&state, user.id, oid).await?;
    let alerts = alerts_service::list_alerts(&state, item.id).await?;
    let alerts: Vec<serde_json::Value> = alerts.iter().map(alert_json).collect();

    Ok(Json(json!({ "alerts": alerts })))
}

#[derive(Deserialize)]
pub struct CreateAlertBody {
    pub platform: Option<String>,

    #[serde(rename = "targetPrice")]
    pub target_price: Option<i64>,
}

// POST /api/watchlist/:id/alerts
pub async fn post_alert(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<CreateAlertBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let oid = parse_oid(&id)?;

    let Some(platform) = body.platform.as_deref().and_then(Platform::parse) else {
        return Err(ApiError::bad_request("invalid platform"));
    };

    let Some(target_price) = body.target_price else {
        return Err(ApiError::bad_request("targetPrice required"));
    };
    if !(0..=MAX_PRICE_VALUE).contains(&target_price) {
        return Err(ApiError::bad_request(format!(
            "targetPrice must be between 0 and {MAX_PRICE_VALUE}"
        )));
    }

    let item = watchlist_service::get_owned(&state, user.id, oid).await?;
    let alert = alerts_service::upsert_alert(&state, item.id, platform, target_price).await?;

    Ok(Json(json!({ "alert": alert_json(&alert) })))
}

// DELETE /api/watchlist/:wid/alerts/:aid
pub async fn delete_alert(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((wid, aid)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let wid = parse_oid(&wid)?;
    let aid = parse_oid(&aid)?;

    let item = watchlist_service::get_owned(&state, user.id, wid).await?;
    alerts_service::delete_alert(&state, item.id, aid).await?;

    Ok(Json(json!({ "ok": true })))
}

// GET /api/alerts/triggered
pub async fn get_triggered(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let alerts = alerts_service::list_triggered(&state, user.id).await?;

    Ok(Json(json!({ "alerts": alerts })))
}
