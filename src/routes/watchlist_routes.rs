use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{controllers::watchlist_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/watchlist", get(watchlist_controller::get_watchlist))
        .route("/api/watchlist", post(watchlist_controller::post_watchlist))
        .route(
            "/api/watchlist/snapshot-all",
            post(watchlist_controller::post_snapshot_all),
        )
        .route(
            "/api/watchlist/:id",
            delete(watchlist_controller::delete_watchlist_item),
        )
        .route(
            "/api/watchlist/:id/snapshot",
            post(watchlist_controller::post_snapshot),
        )
        .route(
            "/api/watchlist/:id/history",
            get(watchlist_controller::get_history),
        )
}
