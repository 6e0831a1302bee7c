//! Route table, fallback, and health probes.

mod common;

use http::{Method, StatusCode};
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn unknown_path_is_route_not_found() {
    let t = spawn_app().await;
    for uri in ["/", "/customers", "/orders/1/items", "/users/1"] {
        let (status, body) = t.send(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({ "message": "Route not found" }));
    }
}

#[tokio::test]
async fn method_mismatch_is_route_not_found() {
    let t = spawn_app().await;

    let (status, body) = t.send(Method::DELETE, "/orders", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Route not found" }));

    let (status, _) = t.send(Method::POST, "/orders/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = t.send(Method::PUT, "/users", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn route_not_found_is_distinct_from_order_not_found() {
    let t = spawn_app().await;
    let (_, missing_order) = t.send(Method::GET, "/orders/77", None).await;
    let (_, missing_route) = t.send(Method::GET, "/order/77", None).await;
    assert_eq!(missing_order["message"], "Order not found");
    assert_eq!(missing_route["message"], "Route not found");
}

#[tokio::test]
async fn liveness_answers_ok() {
    let t = spawn_app().await;
    let res = t
        .app
        .call(http::Request::get("/healthz").body(bytes::Bytes::new()).expect("request"))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), b"ok");
}

#[tokio::test]
async fn readiness_follows_the_pool() {
    let t = spawn_app().await;

    let ready = t
        .app
        .call(http::Request::get("/readyz").body(bytes::Bytes::new()).expect("request"))
        .await;
    assert_eq!(ready.status_code(), StatusCode::OK);
    assert_eq!(ready.body(), b"ready");

    t.db.close().await;

    let not_ready = t
        .app
        .call(http::Request::get("/readyz").body(bytes::Bytes::new()).expect("request"))
        .await;
    assert_eq!(not_ready.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(not_ready.body(), b"not ready");

    // Liveness does not depend on the database.
    let (status, _) = t.send(Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
}
