pub mod home_controller;
pub mod search_controller;
pub mod auth_controller;
pub mod watchlist_controller;
pub mod alerts_controller;
