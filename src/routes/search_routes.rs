use axum::{routing::get, Router};

use crate::{controllers::search_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/api/search", get(search_controller::get_search))
}
