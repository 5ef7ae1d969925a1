use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A saved (query, price-range) pair a user tracks. Unique per
/// (user_id, query).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistItem {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub query: String,

    pub min_price: Option<i64>,
    pub max_price: Option<i64>,

    pub created_at: i64,
}
