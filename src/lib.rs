//! Library entrypoint for PricePulse.
//!
//! This file exists mainly to make controller tests easy (integration tests
//! under `tests/` can import the app state, routers, controllers, services).

pub mod config;
pub mod error;
pub mod models;

// Keep these modules at crate root because the codebase references them as
// `crate::auth` and `crate::rate_limit`.
#[path = "middleware/auth.rs"]
pub mod auth;
#[path = "middleware/rate_limit.rs"]
pub mod rate_limit;

pub mod services;

pub mod controllers;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub settings: config::Settings,
    pub auth_limiter: rate_limit::RateLimiter,
}
