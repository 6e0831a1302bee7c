//! `GET /users`.

mod common;

use http::{Method, StatusCode};
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn empty_table_lists_nothing() {
    let t = spawn_app().await;
    let (status, body) = t.send(Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_is_capped_at_ten_rows() {
    let t = spawn_app().await;
    t.seed_customers(15).await;

    let (status, body) = t.send(Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn short_table_is_returned_whole() {
    let t = spawn_app().await;
    t.seed_customers(3).await;

    let (_, body) = t.send(Method::GET, "/users", None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn rows_carry_every_column_verbatim() {
    let t = spawn_app().await;
    t.seed_customers(1).await;
    sqlx::query("INSERT INTO customer (customer_id, cust_name) VALUES ('C900', 'No City')")
        .execute(t.db.pool())
        .await
        .expect("insert");

    let (_, body) = t.send(Method::GET, "/users", None).await;
    let rows = body.as_array().expect("array");

    assert_eq!(
        rows[0],
        json!({ "customer_id": "C001", "cust_name": "Customer 1", "city": "London", "grade": 100, "salesman_id": 5001 })
    );
    assert_eq!(rows[1]["city"], json!(null));
    assert_eq!(rows[1]["grade"], json!(null));
}
