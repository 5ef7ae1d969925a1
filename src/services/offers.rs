use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{Badge, Offer, Platform};

pub const DEFAULT_MIN_PRICE: i64 = 200;
pub const DEFAULT_MAX_PRICE: i64 = 9000;

/// Per-platform price offsets applied to the seeded base price.
const PLATFORM_OFFSETS: [(Platform, i64); 3] = [
    (Platform::Pchome, 0),
    (Platform::Shopee, 120),
    (Platform::Momo, 240),
];

/// DJB2-style fold of the query into an unsigned 32-bit seed. Hashes the
/// UTF-16 code units so multibyte queries seed the same way regardless of
/// their UTF-8 width.
fn hash_query(q: &str) -> u32 {
    let mut h: u32 = 5381;
    for unit in q.encode_utf16() {
        h = h.wrapping_mul(33) ^ u32::from(unit);
    }
    h
}

fn clamp(n: i64, lo: i64, hi: i64) -> i64 {
    n.min(hi).max(lo)
}

fn search_url(platform: Platform, q: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(q.as_bytes()).collect();
    match platform {
        Platform::Pchome => format!("https://24h.pchome.com.tw/search/?q={encoded}"),
        Platform::Shopee => format!("https://shopee.tw/search?keyword={encoded}"),
        Platform::Momo => {
            format!("https://www.momoshop.com.tw/search/searchShop.jsp?keyword={encoded}")
        }
    }
}

fn display_name(platform: Platform) -> &'static str {
    match platform {
        Platform::Pchome => "PChome",
        Platform::Shopee => "Shopee",
        Platform::Momo => "momo",
    }
}

/// Generate the three simulated per-platform offers for a query.
///
/// Deterministic for a given (query, min, max): the seed comes only from the
/// lowercased trimmed query, and `now` merely stamps `updatedAt`. Bounds
/// default to [200, 9000], a reversed pair is swapped, and every price is
/// clamped back into the corrected range.
pub fn generate_offers(
    query: &str,
    min_price: Option<i64>,
    max_price: Option<i64>,
    now: DateTime<Utc>,
) -> Vec<Offer> {
    let lo0 = min_price.unwrap_or(DEFAULT_MIN_PRICE);
    let hi0 = max_price.unwrap_or(DEFAULT_MAX_PRICE);

    let lo = lo0.min(hi0);
    let hi = lo0.max(hi0);
    let range = (hi - lo + 1).max(1);

    let q = query.trim();
    let seed = hash_query(&q.to_lowercase());
    let base = lo + (i64::from(seed) % range);

    let updated_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut offers: Vec<Offer> = PLATFORM_OFFSETS
        .iter()
        .map(|&(platform, offset)| Offer {
            platform,
            title: format!("{q} | {} (search)", display_name(platform)),
            price: clamp(base + offset, lo, hi),
            url: search_url(platform, q),
            updated_at: updated_at.clone(),
            badge: Badge::Buyable,
        })
        .collect();

    let min_p = offers.iter().map(|o| o.price).min().unwrap_or(lo);
    for offer in &mut offers {
        if offer.price == min_p {
            offer.badge = Badge::Lowest;
        }
    }

    offers
}
