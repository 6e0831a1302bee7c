//! Kubernetes health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the pod serve traffic? Failure → pulled from load-balancer. |

use http::StatusCode;
use tracing::warn;

use crate::api::AppState;
use crate::request::Request;
use crate::response::Response;

/// Always `200 OK` with body `"ok"`. Touches nothing but the process.
pub async fn liveness(_req: Request, _state: AppState) -> Response {
    Response::text("ok")
}

/// `200 ready` when a pooled connection can run a statement, else
/// `503 not ready`.
pub async fn readiness(_req: Request, state: AppState) -> Response {
    match state.db.ping().await {
        Ok(()) => Response::text("ready"),
        Err(e) => {
            warn!(error = %e, "readiness check failed");
            Response::text("not ready").with_status(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
