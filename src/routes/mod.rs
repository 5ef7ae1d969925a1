use axum::http::{header, HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::{controllers::home_controller, rate_limit, AppState};

pub mod home_routes;
pub mod search_routes;
pub mod auth_routes;
pub mod watchlist_routes;
pub mod alerts_routes;

fn cors_layer(state: &AppState) -> CorsLayer {
    // Browser clients send credentials, so the origin must be explicit;
    // an unparseable WEB_ORIGIN falls back to a no-CORS layer.
    match state.settings.web_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(_) => CorsLayer::new(),
    }
}

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = search_routes::add_routes(router);
    let router = watchlist_routes::add_routes(router);
    let router = alerts_routes::add_routes(router);

    // credential endpoints get their own per-IP limiter
    let auth = auth_routes::add_routes(Router::<AppState>::new()).layer(from_fn_with_state(
        state.auth_limiter.clone(),
        rate_limit::rate_limit_middleware,
    ));

    router
        .merge(auth)
        .fallback(home_controller::not_found)
        .layer(from_fn_with_state(state.clone(), crate::auth::require_auth))
        .layer(from_fn_with_state(state.clone(), crate::auth::inject_current_user))
        .layer(cors_layer(&state))
        .with_state(state)
}
