use axum::{routing::get, Router};

use crate::{controllers::home_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/healthz", get(home_controller::health))
        .route("/healthz/db", get(home_controller::health_db))
}
