use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use mongodb::Client;
use pricepulse::{config, rate_limit::RateLimiter, routes, AppState};
use tower::ServiceExt;

async fn test_state() -> AppState {
    let settings = config::load();

    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("mongodb client");
    let db = client.database(&settings.mongodb_db);

    AppState {
        db,
        settings,
        auth_limiter: RateLimiter::default(),
    }
}

async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

#[tokio::test]
async fn watchlist_requires_login() {
    let app = routes::app(test_state().await);

    let res = app.oneshot(request("GET", "/api/watchlist")).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(res).await;
    assert_eq!(body["message"], "not logged in");
}

#[tokio::test]
async fn watchlist_create_requires_login() {
    let app = routes::app(test_state().await);

    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/watchlist")
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::json!({ "query": "ssd" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn watchlist_delete_requires_login() {
    let app = routes::app(test_state().await);

    let res = app
        .oneshot(request("DELETE", "/api/watchlist/652f00000000000000000000"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn snapshot_routes_require_login() {
    let app = routes::app(test_state().await);

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/watchlist/652f00000000000000000000/snapshot",
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .oneshot(request("POST", "/api/watchlist/snapshot-all"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn history_and_alerts_require_login() {
    let app = routes::app(test_state().await);

    let res = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/watchlist/652f00000000000000000000/history?days=30",
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/watchlist/652f00000000000000000000/alerts",
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .oneshot(request("GET", "/api/alerts/triggered"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_session_cookie_reads_as_logged_out() {
    let state = test_state().await;
    let cookie_name = state.settings.jwt_cookie_name.clone();
    let app = routes::app(state);

    let res = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/watchlist")
                .header(header::COOKIE, format!("{cookie_name}=not-a-jwt"))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
