use std::collections::HashMap;

use chrono::{Duration, Utc};
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};

use crate::{
    error::ApiError,
    models::{Platform, PriceAlert, WatchlistItem},
    AppState,
};

/// Triggers older than this fall off the /api/alerts/triggered listing.
pub const TRIGGERED_WINDOW_DAYS: i64 = 7;

pub async fn list_alerts(
    state: &AppState,
    watchlist_id: ObjectId,
) -> Result<Vec<PriceAlert>, ApiError> {
    let alerts = state.db.collection::<PriceAlert>("alerts");

    let find_opts = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();

    let mut cursor = alerts
        .find(doc! { "watchlist_id": watchlist_id }, find_opts)
        .await
        .map_err(ApiError::db)?;

    let mut items: Vec<PriceAlert> = Vec::new();
    while let Some(res) = cursor.next().await {
        items.push(res.map_err(ApiError::db)?);
    }

    Ok(items)
}

/// Create-or-replace the alert for (watchlist, platform). Setting a new
/// target reactivates the alert and clears any stale trigger timestamp.
pub async fn upsert_alert(
    state: &AppState,
    watchlist_id: ObjectId,
    platform: Platform,
    target_price: i64,
) -> Result<PriceAlert, ApiError> {
    let alerts = state.db.collection::<PriceAlert>("alerts");
    let now = Utc::now().timestamp();

    let opts = FindOneAndUpdateOptions::builder()
        .upsert(true)
        .return_document(ReturnDocument::After)
        .build();

    let alert = alerts
        .find_one_and_update(
            doc! { "watchlist_id": watchlist_id, "platform": platform.as_str() },
            doc! {
                "$set": {
                    "target_price": target_price,
                    "is_active": true,
                    "last_triggered": mongodb::bson::Bson::Null,
                },
                "$setOnInsert": {
                    "_id": ObjectId::new(),
                    "created_at": now,
                },
            },
            opts,
        )
        .await
        .map_err(ApiError::db)?
        .ok_or_else(|| ApiError::Db("upsert returned no document".to_string()))?;

    Ok(alert)
}

pub async fn delete_alert(
    state: &AppState,
    watchlist_id: ObjectId,
    alert_id: ObjectId,
) -> Result<(), ApiError> {
    let alerts = state.db.collection::<PriceAlert>("alerts");

    let res = alerts
        .delete_one(doc! { "_id": alert_id, "watchlist_id": watchlist_id }, None)
        .await
        .map_err(ApiError::db)?;

    if res.deleted_count == 0 {
        return Err(ApiError::NotFound);
    }

    Ok(())
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct TriggeredAlert {
    pub id: String,
    pub platform: Platform,
    pub target_price: i64,
    pub last_triggered: String,
    pub query: String,
}

/// Active alerts across all of the user's watchlist items that fired within
/// the trailing window, newest trigger first.
pub async fn list_triggered(
    state: &AppState,
    user_id: ObjectId,
) -> Result<Vec<TriggeredAlert>, ApiError> {
    let watchlist = state.db.collection::<WatchlistItem>("watchlist");

    let mut cursor = watchlist
        .find(doc! { "user_id": user_id }, None)
        .await
        .map_err(ApiError::db)?;

    let mut query_by_id: HashMap<ObjectId, String> = HashMap::new();
    while let Some(res) = cursor.next().await {
        let item = res.map_err(ApiError::db)?;
        query_by_id.insert(item.id, item.query);
    }

    if query_by_id.is_empty() {
        return Ok(Vec::new());
    }

    let since = (Utc::now() - Duration::days(TRIGGERED_WINDOW_DAYS)).timestamp();
    let ids: Vec<ObjectId> = query_by_id.keys().copied().collect();

    let alerts = state.db.collection::<PriceAlert>("alerts");
    let find_opts = FindOptions::builder()
        .sort(doc! { "last_triggered": -1 })
        .build();

    let mut cursor = alerts
        .find(
            doc! {
                "watchlist_id": { "$in": ids },
                "is_active": true,
                "last_triggered": { "$gte": since },
            },
            find_opts,
        )
        .await
        .map_err(ApiError::db)?;

    let mut out: Vec<TriggeredAlert> = Vec::new();
    while let Some(res) = cursor.next().await {
        let alert = res.map_err(ApiError::db)?;

        let Some(ts) = alert.last_triggered else {
            continue;
        };

        let last_triggered = chrono::DateTime::from_timestamp(ts, 0)
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| ts.to_string());

        out.push(TriggeredAlert {
            id: alert.id.to_hex(),
            platform: alert.platform,
            target_price: alert.target_price,
            last_triggered,
            query: query_by_id
                .get(&alert.watchlist_id)
                .cloned()
                .unwrap_or_default(),
        });
    }

    Ok(out)
}
