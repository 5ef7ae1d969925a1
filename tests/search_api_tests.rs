use axum::http::{Request, StatusCode};
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

fn get(uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

#[tokio::test]
async fn search_returns_three_offers() {
    let app = routes::app(test_state().await);

    let res = app
        .oneshot(get("/api/search?q=keyboard&minPrice=1000&maxPrice=5000"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = body_json(res).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);

    let platforms: Vec<&str> = items
        .iter()
        .map(|i| i["platform"].as_str().unwrap())
        .collect();
    assert_eq!(platforms, vec!["pchome", "shopee", "momo"]);

    for item in items {
        let price = item["price"].as_i64().unwrap();
        assert!((1000..=5000).contains(&price));
        assert!(item["badge"] == "lowest" || item["badge"] == "buyable");
    }

    let lowest = items.iter().filter(|i| i["badge"] == "lowest").count();
    assert!(lowest >= 1);
}

#[tokio::test]
async fn search_is_deterministic_across_requests() {
    let app = routes::app(test_state().await);

    let res_a = app
        .clone()
        .oneshot(get("/api/search?q=AirPods&minPrice=1000&maxPrice=8000"))
        .await
        .unwrap();
    let res_b = app
        .oneshot(get("/api/search?q=AirPods&minPrice=1000&maxPrice=8000"))
        .await
        .unwrap();

    let a = body_json(res_a).await;
    let b = body_json(res_b).await;

    let prices = |v: &serde_json::Value| -> Vec<i64> {
        v["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["price"].as_i64().unwrap())
            .collect()
    };

    assert_eq!(prices(&a), prices(&b));
}

#[tokio::test]
async fn search_with_empty_query_returns_empty_items() {
    let app = routes::app(test_state().await);

    let res = app.oneshot(get("/api/search?q=")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = body_json(res).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn search_with_swapped_bounds_stays_in_range() {
    let app = routes::app(test_state().await);

    let res = app
        .oneshot(get("/api/search?q=mouse&minPrice=3000&maxPrice=500"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = body_json(res).await;
    for item in body["items"].as_array().unwrap() {
        let price = item["price"].as_i64().unwrap();
        assert!((500..=3000).contains(&price));
    }
}

#[tokio::test]
async fn search_rejects_overlong_query() {
    let app = routes::app(test_state().await);

    let q = "x".repeat(201);
    let res = app
        .oneshot(get(&format!("/api/search?q={q}")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_rejects_out_of_range_price() {
    let app = routes::app(test_state().await);

    let res = app
        .oneshot(get("/api/search?q=ssd&minPrice=1000000"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn healthz_is_public() {
    let app = routes::app(test_state().await);

    let res = app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = body_json(res).await;
    assert_eq!(body["ok"], true);
}
