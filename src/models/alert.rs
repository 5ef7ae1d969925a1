use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::offer::Platform;

/// Per-platform target price on a watchlist item. Unique per
/// (watchlist_id, platform); triggering refreshes last_triggered but keeps
/// the alert active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceAlert {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub watchlist_id: ObjectId,
    pub platform: Platform,

    pub target_price: i64,
    pub is_active: bool,

    pub last_triggered: Option<i64>,
    pub created_at: i64,
}
