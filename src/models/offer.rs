use serde::{Deserialize, Serialize};

/// Shopping platforms we quote prices for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Pchome,
    Shopee,
    Momo,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Pchome => "pchome",
            Platform::Shopee => "shopee",
            Platform::Momo => "momo",
        }
    }

    pub fn parse(s: &str) -> Option<Platform> {
        match s.trim().to_lowercase().as_str() {
            "pchome" => Some(Platform::Pchome),
            "shopee" => Some(Platform::Shopee),
            "momo" => Some(Platform::Momo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Lowest,
    Buyable,
}

/// One simulated platform price quote. Generated per request, never stored
/// directly (snapshots copy the fields they need).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub platform: Platform,
    pub title: String,
    pub price: i64,
    pub url: String,

    #[serde(rename = "updatedAt")]
    pub updated_at: String,

    pub badge: Badge,
}
