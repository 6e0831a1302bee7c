//! # orderdesk
//!
//! A small HTTP service over two relational tables: customers and orders.
//!
//! Every request takes the same path through the crate:
//!
//! ```text
//! Router ──► handler ──► Validator ──► Db::acquire ──► one SQL statement ──► JSON
//!                            │                                  │
//!                            └─ 400 before any pool access      └─ connection dropped → back to pool
//! ```
//!
//! - Radix-tree routing via [`matchit`], one tree per method, with a JSON 404
//!   fallback.
//! - A bounded sqlx pool ([`db::Db`]) built once in `main` and injected into
//!   every handler through [`api::AppState`].
//! - Async I/O on tokio and hyper, graceful shutdown on SIGTERM / Ctrl-C.
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use orderdesk::{Config, Server, api, db::Db};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), orderdesk::Error> {
//!     let config = Config::load()?;
//!     let db = Db::connect(&config.database).await?;
//!     let app = api::router(api::AppState::new(db.clone(), &config));
//!
//!     Server::bind(config.server.addr).serve(app).await?;
//!     db.close().await;
//!     Ok(())
//! }
//! ```

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod api;
pub mod config;
pub mod db;
pub mod health;
pub mod validate;

pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use request::{BodyError, Request};
pub use response::{IntoResponse, Json, Response};
pub use router::Router;
pub use server::Server;
