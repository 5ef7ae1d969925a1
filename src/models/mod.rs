pub mod user;
pub mod offer;
pub mod watchlist;
pub mod snapshot;
pub mod alert;

pub use user::{CurrentUser, User};
pub use offer::{Badge, Offer, Platform};
pub use watchlist::WatchlistItem;
pub use snapshot::PriceSnapshot;
pub use alert::PriceAlert;
