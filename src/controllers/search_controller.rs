use axum::{extract::Query, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::{error::ApiError, services::offers};

pub const MAX_QUERY_LEN: usize = 200;
pub const MAX_PRICE_VALUE: i64 = 999_999;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,

    #[serde(rename = "minPrice")]
    pub min_price: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
}

/// Unparseable numbers read as absent, matching lenient query-string
/// handling; parseable but out-of-range values are rejected upstream.
fn to_price(v: Option<&String>) -> Option<i64> {
    v.and_then(|s| s.trim().parse::<i64>().ok())
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

// GET /api/search?q=&minPrice=&maxPrice=
pub async fn get_search(
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let q = params.q.as_deref().unwrap_or("").trim().to_string();

    if q.is_empty() {
        return Ok(Json(json!({ "items": [] })));
    }

    if q.chars().count() > MAX_QUERY_LEN {
        return Err(ApiError::bad_request("query too long"));
    }

    let min_price = validate_price(to_price(params.min_price.as_ref()), "minPrice")?;
    let max_price = validate_price(to_price(params.max_price.as_ref()), "maxPrice")?;

    let items = offers::generate_offers(&q, min_price, max_price, Utc::now());

    Ok(Json(json!({ "items": items })))
}
