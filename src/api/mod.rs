//! HTTP surface: application state, routes, and handlers.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | `GET` | `/users` | [`customers::list`] |
//! | `GET` | `/orders` | [`orders::list`] |
//! | `GET` | `/orders/{id}` | [`orders::get`] |
//! | `POST` | `/orders` | [`orders::create`] |
//! | `PATCH` | `/orders/{id}` | [`orders::update_amount`] |
//! | `PUT` | `/orders/{id}` | [`orders::replace`] |
//! | `DELETE` | `/orders/{id}` | [`orders::delete`] |
//! | `GET` | `/healthz`, `/readyz` | [`health`](crate::health) |
//!
//! Anything else answers 404 `{"message":"Route not found"}`.

pub mod customers;
mod error;
pub mod orders;

pub use error::ApiError;

use crate::config::{Config, OrdersConfig};
use crate::db::Db;
use crate::health;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;

use http::StatusCode;
use serde_json::json;
use tracing::debug;

/// Shared, read-only state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Db,
    pub orders: OrdersConfig,
}

impl AppState {
    pub fn new(db: Db, config: &Config) -> Self {
        Self { db, orders: config.orders.clone() }
    }
}

/// Builds the full route table around `state`.
pub fn router(state: AppState) -> Router<AppState> {
    Router::with_state(state)
        .get("/users", customers::list)
        .get("/orders", orders::list)
        .get("/orders/{id}", orders::get)
        .post("/orders", orders::create)
        .patch("/orders/{id}", orders::update_amount)
        .put("/orders/{id}", orders::replace)
        .delete("/orders/{id}", orders::delete)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
        .fallback(route_not_found)
}

async fn route_not_found(req: Request, _state: AppState) -> Response {
    debug!(method = %req.method(), path = req.path(), "no matching route");
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Route not found" }))).into_response()
}
