//! Unified startup/serve error type.

use crate::config::ConfigError;
use crate::db::StorageError;

/// The error type returned by the service's fallible entry points.
///
/// Per-request failures (400, 404, 500) are expressed as HTTP responses by
/// [`ApiError`](crate::api::ApiError), not as `Error`s. This type surfaces
/// what stops the process: bad configuration, an unreachable database, or
/// failing to bind the listening socket.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
