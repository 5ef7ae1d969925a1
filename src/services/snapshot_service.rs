use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;

use crate::{
    error::ApiError,
    models::{Offer, PriceAlert, PriceSnapshot, WatchlistItem},
    services::offers,
    AppState,
};

pub const DEFAULT_HISTORY_DAYS: i64 = 30;
pub const MAX_HISTORY_DAYS: i64 = 90;

#[derive(Debug, Clone)]
pub struct SnapshotResult {
    pub count: usize,
    pub collected_at: DateTime<Utc>,
}

/// Generate offers for the item and persist one row per offer, all sharing
/// one collected_at. Inserts are awaited one by one; a mid-loop failure
/// aborts the run and leaves the rows already written in place.
pub async fn collect_snapshot(
    state: &AppState,
    item: &WatchlistItem,
) -> Result<SnapshotResult, ApiError> {
    let now = Utc::now();
    let generated = offers::generate_offers(&item.query, item.min_price, item.max_price, now);

    let snapshots = state.db.collection::<PriceSnapshot>("snapshots");
    for offer in &generated {
        let row = PriceSnapshot {
            id: ObjectId::new(),
            watchlist_id: item.id,
            platform: offer.platform,
            price: offer.price,
            title: offer.title.clone(),
            url: offer.url.clone(),
            collected_at: now.timestamp(),
        };

        snapshots.insert_one(&row, None).await.map_err(ApiError::db)?;
    }

    check_alerts(state, item.id, &generated, now).await?;

    Ok(SnapshotResult {
        count: generated.len(),
        collected_at: now,
    })
}

/// An offer satisfies an alert when the platform matches and the price is at
/// or under the target.
fn matching_offer<'a>(alert: &PriceAlert, generated: &'a [Offer]) -> Option<&'a Offer> {
    generated
        .iter()
        .find(|o| o.platform == alert.platform && o.price <= alert.target_price)
}

/// Refresh last_triggered on every active alert the generated offers satisfy.
/// Alerts stay active; a repeat hit just moves the timestamp forward.
pub async fn check_alerts(
    state: &AppState,
    watchlist_id: ObjectId,
    generated: &[Offer],
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    let alerts = state.db.collection::<PriceAlert>("alerts");

    let mut cursor = alerts
        .find(doc! { "watchlist_id": watchlist_id, "is_active": true }, None)
        .await
        .map_err(ApiError::db)?;

    while let Some(res) = cursor.next().await {
        let alert = res.map_err(ApiError::db)?;

        let Some(offer) = matching_offer(&alert, generated) else {
            continue;
        };

        tracing::info!(
            alert_id = %alert.id,
            platform = alert.platform.as_str(),
            price = offer.price,
            target = alert.target_price,
            "price alert hit"
        );

        alerts
            .update_one(
                doc! { "_id": alert.id },
                doc! { "$set": { "last_triggered": now.timestamp() } },
                None,
            )
            .await
            .map_err(ApiError::db)?;
    }

    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct BatchResult {
    pub items: usize,
    pub total: usize,
}

/// Snapshot every watchlist item the user owns. The first failing item aborts
/// the rest of the batch.
pub async fn snapshot_all(state: &AppState, user_id: ObjectId) -> Result<BatchResult, ApiError> {
    let items = super::watchlist_service::list_items(state, user_id).await?;

    let mut total = 0usize;
    for item in &items {
        let res = collect_snapshot(state, item).await?;
        total += res.count;
    }

    Ok(BatchResult {
        items: items.len(),
        total,
    })
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct HistoryPoint {
    pub platform: crate::models::Platform,
    pub price: i64,
    pub collected_at: String,
}

/// Snapshots within the trailing `days` window, oldest first.
pub async fn history(
    state: &AppState,
    watchlist_id: ObjectId,
    days: i64,
) -> Result<Vec<HistoryPoint>, ApiError> {
    let since = (Utc::now() - chrono::Duration::days(days)).timestamp();

    let snapshots = state.db.collection::<PriceSnapshot>("snapshots");
    let find_opts = FindOptions::builder()
        .sort(doc! { "collected_at": 1 })
        .build();

    let mut cursor = snapshots
        .find(
            doc! { "watchlist_id": watchlist_id, "collected_at": { "$gte": since } },
            find_opts,
        )
        .await
        .map_err(ApiError::db)?;

    let mut points: Vec<HistoryPoint> = Vec::new();
    while let Some(res) = cursor.next().await {
        let row = res.map_err(ApiError::db)?;
        let collected_at = DateTime::from_timestamp(row.collected_at, 0)
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| row.collected_at.to_string());

        points.push(HistoryPoint {
            platform: row.platform,
            price: row.price,
            collected_at,
        });
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Badge, Platform};

    fn offer(platform: Platform, price: i64) -> Offer {
        Offer {
            platform,
            title: format!("thing | {} (search)", platform.as_str()),
            price,
            url: String::new(),
            updated_at: "2026-01-15T12:00:00.000Z".to_string(),
            badge: Badge::Buyable,
        }
    }

    fn alert(platform: Platform, target_price: i64) -> PriceAlert {
        PriceAlert {
            id: ObjectId::new(),
            watchlist_id: ObjectId::new(),
            platform,
            target_price,
            is_active: true,
            last_triggered: None,
            created_at: 0,
        }
    }

    #[test]
    fn offer_at_target_price_matches() {
        let generated = vec![offer(Platform::Pchome, 900), offer(Platform::Shopee, 1020)];
        let a = alert(Platform::Pchome, 900);

        let hit = matching_offer(&a, &generated).expect("should match");
        assert_eq!(hit.platform, Platform::Pchome);
        assert_eq!(hit.price, 900);
    }

    #[test]
    fn offer_above_target_price_does_not_match() {
        let generated = vec![offer(Platform::Pchome, 901)];
        let a = alert(Platform::Pchome, 900);

        assert!(matching_offer(&a, &generated).is_none());
    }

    #[test]
    fn platform_mismatch_does_not_match_even_when_cheaper() {
        let generated = vec![offer(Platform::Shopee, 100)];
        let a = alert(Platform::Momo, 900);

        assert!(matching_offer(&a, &generated).is_none());
    }
}
