use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use mongodb::Client;
use pricepulse::{config, rate_limit::RateLimiter, routes, AppState};
use tower::ServiceExt;

async fn test_state_with_limiter(limiter: RateLimiter) -> AppState {
    let settings = config::load();

    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("mongodb client");
    let db = client.database(&settings.mongodb_db);

    AppState {
        db,
        settings,
        auth_limiter: limiter,
    }
}

async fn test_state() -> AppState {
    test_state_with_limiter(RateLimiter::default()).await
}

async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn register_rejects_missing_fields() {
    let app = routes::app(test_state().await);

    let res = app
        .oneshot(post_json(
            "/api/auth/register",
            serde_json::json!({ "email": "", "password": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = body_json(res).await;
    assert_eq!(body["message"], "email/password required");
}

#[tokio::test]
async fn register_rejects_invalid_email() {
    let app = routes::app(test_state().await);

    let res = app
        .oneshot(post_json(
            "/api/auth/register",
            serde_json::json!({ "email": "not-an-email", "password": "123456" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = body_json(res).await;
    assert_eq!(body["message"], "invalid email");
}

#[tokio::test]
async fn register_rejects_short_password() {
    let app = routes::app(test_state().await);

    let res = app
        .oneshot(post_json(
            "/api/auth/register",
            serde_json::json!({ "email": "test@example.com", "password": "123" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = body_json(res).await;
    assert_eq!(body["message"], "password too short");
}

#[tokio::test]
async fn register_rejects_overlong_password() {
    let app = routes::app(test_state().await);

    let res = app
        .oneshot(post_json(
            "/api/auth/register",
            serde_json::json!({ "email": "test@example.com", "password": "x".repeat(129) }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = body_json(res).await;
    assert_eq!(body["message"], "password too long");
}

#[tokio::test]
async fn login_rejects_missing_password() {
    let app = routes::app(test_state().await);

    let res = app
        .oneshot(post_json(
            "/api/auth/login",
            serde_json::json!({ "email": "test@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn me_without_session_is_null() {
    let app = routes::app(test_state().await);

    let res = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/me")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = body_json(res).await;
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn logout_clears_cookie() {
    let app = routes::app(test_state().await);

    let res = app
        .oneshot(post_json("/api/auth/logout", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    assert!(res.headers().contains_key(header::SET_COOKIE));
}

#[tokio::test]
async fn auth_endpoints_rate_limit_per_ip() {
    let state = test_state_with_limiter(RateLimiter::new(0.001, 3.0)).await;
    let app = routes::app(state);

    let request = || {
        Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "203.0.113.9")
            .body(axum::body::Body::from(
                serde_json::json!({ "email": "", "password": "" }).to_string(),
            ))
            .unwrap()
    };

    for _ in 0..3 {
        let res = app.clone().oneshot(request()).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    let res = app.oneshot(request()).await.unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
}
