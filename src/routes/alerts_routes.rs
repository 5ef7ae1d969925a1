use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{controllers::alerts_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/api/watchlist/:id/alerts",
            get(alerts_controller::get_alerts),
        )
        .route(
            "/api/watchlist/:id/alerts",
            post(alerts_controller::post_alert),
        )
        .route(
            "/api/watchlist/:wid/alerts/:aid",
            delete(alerts_controller::delete_alert),
        )
        .route(
            "/api/alerts/triggered",
            get(alerts_controller::get_triggered),
        )
}
