use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};

use crate::{error::ApiError, models::WatchlistItem, AppState};

pub async fn list_items(state: &AppState, user_id: ObjectId) -> Result<Vec<WatchlistItem>, ApiError> {
    let watchlist = state.db.collection::<WatchlistItem>("watchlist");

    let find_opts = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();

    let mut cursor = watchlist
        .find(doc! { "user_id": user_id }, find_opts)
        .await
        .map_err(ApiError::db)?;

    let mut items: Vec<WatchlistItem> = Vec::new();
    while let Some(res) = cursor.next().await {
        items.push(res.map_err(ApiError::db)?);
    }

    Ok(items)
}

/// Create-or-refresh the entry for (user, query). Saving the same query again
/// just updates the price bounds instead of erroring on the unique index.
pub async fn upsert_item(
    state: &AppState,
    user_id: ObjectId,
    query: &str,
    min_price: Option<i64>,
    max_price: Option<i64>,
) -> Result<WatchlistItem, ApiError> {
    let watchlist = state.db.collection::<WatchlistItem>("watchlist");
    let now = Utc::now().timestamp();

    let opts = FindOneAndUpdateOptions::builder()
        .upsert(true)
        .return_document(ReturnDocument::After)
        .build();

    let item = watchlist
        .find_one_and_update(
            doc! { "user_id": user_id, "query": query },
            doc! {
                "$set": { "min_price": min_price, "max_price": max_price },
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

    Ok(item)
}

/// Ownership check: resolves only items belonging to `user_id`, so a foreign
/// id reads the same as a missing one.
pub async fn get_owned(
    state: &AppState,
    user_id: ObjectId,
    item_id: ObjectId,
) -> Result<WatchlistItem, ApiError> {
    let watchlist = state.db.collection::<WatchlistItem>("watchlist");

    watchlist
        .find_one(doc! { "_id": item_id, "user_id": user_id }, None)
        .await
        .map_err(ApiError::db)?
        .ok_or(ApiError::NotFound)
}

/// Deletes the item and everything hanging off it (snapshots, alerts).
pub async fn delete_item(
    state: &AppState,
    user_id: ObjectId,
    item_id: ObjectId,
) -> Result<(), ApiError> {
    let watchlist = state.db.collection::<WatchlistItem>("watchlist");

    let res = watchlist
        .delete_one(doc! { "_id": item_id, "user_id": user_id }, None)
        .await
        .map_err(ApiError::db)?;

    if res.deleted_count == 0 {
        return Err(ApiError::NotFound);
    }

    let snapshots = state
        .db
        .collection::<mongodb::bson::Document>("snapshots");
    snapshots
        .delete_many(doc! { "watchlist_id": item_id }, None)
        .await
        .map_err(ApiError::db)?;

    let alerts = state.db.collection::<mongodb::bson::Document>("alerts");
    alerts
        .delete_many(doc! { "watchlist_id": item_id }, None)
        .await
        .map_err(ApiError::db)?;

    Ok(())
}
