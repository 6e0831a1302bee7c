//! Shared harness: a router over a throwaway SQLite file seeded from `schema.sql`.

#![allow(dead_code)]

use bytes::Bytes;
use http::{Method, StatusCode};
use orderdesk::api::{self, AppState};
use orderdesk::db::Db;
use orderdesk::{Config, Router};
use serde_json::Value;
use sqlx::Executor;

pub const SCHEMA: &str = include_str!("../../schema.sql");

pub struct TestApp {
    pub app: Router<AppState>,
    pub db: Db,
    pub dir: tempfile::TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_with(|_| {}).await
}

/// Like [`spawn_app`], with a hook to adjust the configuration first.
pub async fn spawn_with(tweak: impl FnOnce(&mut Config)) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut config = Config::default();
    config.database.url = format!("sqlite://{}?mode=rwc", dir.path().join("orders.db").display());
    config.database.max_connections = 4;
    config.database.acquire_timeout_secs = 1;
    tweak(&mut config);
    config.validate().expect("test config");

    let db = Db::connect(&config.database).await.expect("connect");
    db.pool().execute(SCHEMA).await.expect("schema");

    let app = api::router(AppState::new(db.clone(), &config));
    TestApp { app, db, dir }
}

impl TestApp {
    /// Sends one request and returns the status with the body parsed as JSON
    /// (`Value::Null` for a non-JSON body).
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = body.map(|v| Bytes::from(v.to_string())).unwrap_or_default();
        let req = http::Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .expect("request");

        let res = self.app.call(req).await;
        let json = serde_json::from_slice(res.body()).unwrap_or(Value::Null);
        (res.status_code(), json)
    }

    pub async fn send_raw(&self, method: Method, uri: &str, body: &'static str) -> (StatusCode, Value) {
        let req = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Bytes::from_static(body.as_bytes()))
            .expect("request");

        let res = self.app.call(req).await;
        let json = serde_json::from_slice(res.body()).unwrap_or(Value::Null);
        (res.status_code(), json)
    }

    pub async fn seed_customers(&self, count: usize) {
        for i in 0..count {
            sqlx::query("INSERT INTO customer (customer_id, cust_name, city, grade, salesman_id) VALUES (?, ?, ?, ?, ?)")
                .bind(format!("C{:03}", i + 1))
                .bind(format!("Customer {}", i + 1))
                .bind("London")
                .bind(100_i64)
                .bind(5001_i64)
                .execute(self.db.pool())
                .await
                .expect("seed customer");
        }
    }
}
