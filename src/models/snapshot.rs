use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::offer::Platform;

/// One persisted offer capture. Append-only; rows share a collected_at per
/// snapshot run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSnapshot {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub watchlist_id: ObjectId,
    pub platform: Platform,

    pub price: i64,
    pub title: String,
    pub url: String,

    pub collected_at: i64,
}
