pub mod db_init;
pub mod offers;

pub mod auth_service;
pub mod watchlist_service;
pub mod snapshot_service;
pub mod alerts_service;
