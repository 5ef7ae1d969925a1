use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::SecondsFormat;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::ApiError,
    models::{CurrentUser, WatchlistItem},
    services::{snapshot_service, watchlist_service},
    AppState,
};

use super::search_controller::{MAX_PRICE_VALUE, MAX_QUERY_LEN};

fn parse_oid(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::bad_request("bad id"))
}

fn rfc3339(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}

fn item_json(item: &WatchlistItem) -> serde_json::Value {
    json!({
        "id": item.id.to_hex(),
        "query": item.query,
        "min_price": item.min_price,
        "max_price": item.max_price,
        "created_at": rfc3339(item.created_at),
    })
}

fn validate_price(v: Option<i64>, field: &str) -> Result<Option<i64>, ApiError> {
    if let Some(p) = v {
        if !(0..=MAX_PRICE_VALUE).contains(&p) {
            return Err(ApiError::bad_request(format!(
                "{field} must be between 0 and {MAX_PRICE_VALUE}"
            )));
        }
    }
    Ok(v)
}

// GET /api/watchlist
pub async fn get_watchlist(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let items = watchlist_service::list_items(&state, user.id).await?;
    let items: Vec<serde_json::Value> = items.iter().map(item_json).collect();

    Ok(Json(json!({ "items": items })))
}

#[derive(Deserialize)]
pub struct CreateItemBody {
    pub query: Option<String>,

    #[serde(rename = "minPrice")]
    pub min_price: Option<i64>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<i64>,
}

// POST /api/watchlist
pub async fn post_watchlist(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreateItemBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let query = body.query.as_deref().unwrap_or("").trim().to_string();

    if query.is_empty() {
        return Err(ApiError::bad_request("query required"));
    }
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ApiError::bad_request("query too long"));
    }

    let min_price = validate_price(body.min_price, "minPrice")?;
    let max_price = validate_price(body.max_price, "maxPrice")?;

    let item =
        watchlist_service::upsert_item(&state, user.id, &query, min_price, max_price).await?;

    Ok(Json(json!({ "item": item_json(&item) })))
}

// DELETE /api/watchlist/:id
pub async fn delete_watchlist_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let oid = parse_oid(&id)?;

    watchlist_service::delete_item(&state, user.id, oid).await?;

    Ok(Json(json!({ "ok": true })))
}

// POST /api/watchlist/:id/snapshot
pub async fn post_snapshot(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let oid = parse_oid(&id)?;

    let item = watchlist_service::get_owned(&state, user.id, oid).await?;
    let res = snapshot_service::collect_snapshot(&state, &item).await?;

    Ok(Json(json!({
        "count": res.count,
        "collectedAt": res.collected_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    })))
}

// POST /api/watchlist/snapshot-all
pub async fn post_snapshot_all(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let res = snapshot_service::snapshot_all(&state, user.id).await?;

    Ok(Json(json!({ "items": res.items, "total": res.total })))
}

#[derive(Deserialize)]
pub struct HistoryParams {
    pub days: Option<i64>,
}

// GET /api/watchlist/:id/history?days=
pub async fn get_history(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let oid = parse_oid(&id)?;

    let days = params
        .days
        .unwrap_or(snapshot_service::DEFAULT_HISTORY_DAYS)
        .clamp(1, snapshot_service::MAX_HISTORY_DAYS);

    let item = watchlist_service::get_owned(&state, user.id, oid).await?;
    let history = snapshot_service::history(&state, item.id, days).await?;

    Ok(Json(json!({ "query": item.query, "history": history })))
}
