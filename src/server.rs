//! Listener loop and graceful shutdown.
//!
//! [`Server::serve`] stops accepting as soon as SIGTERM or Ctrl-C arrives,
//! then waits for every open connection to finish its requests before it
//! returns. `main` closes the pool only after that, so no handler loses its
//! connection mid-statement. An orchestrator's grace period (30 s on
//! Kubernetes by default) must cover the slowest request plus
//! `database.acquire_timeout_secs`.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::response::Response;
use crate::router::Router;

/// Accepts HTTP/1.1 and HTTP/2 connections for one [`Router`].
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// The socket is bound by [`serve`](Server::serve), not here.
    pub fn bind(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Binds, then serves until SIGTERM or Ctrl-C and a full drain.
    pub async fn serve<S>(self, router: Router<S>) -> Result<(), Error>
    where
        S: Clone + Send + Sync + 'static,
    {
        let listener = TcpListener::bind(self.addr).await?;
        Self::serve_with_shutdown(listener, router, shutdown_signal()).await
    }

    /// Serves connections from `listener` until `shutdown` resolves, then
    /// waits for in-flight connections to finish.
    pub async fn serve_with_shutdown<S>(
        listener: TcpListener,
        router: Router<S>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), Error>
    where
        S: Clone + Send + Sync + 'static,
    {
        let router = Arc::new(router);
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        info!(addr = %listener.local_addr()?, "orderdesk listening");

        loop {
            tokio::select! {
                // Shutdown wins over queued accepts.
                biased;

                () = &mut shutdown => break,

                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        connections.spawn(serve_connection(stream, peer, Arc::clone(&router)));
                    }
                    Err(e) => warn!(error = %e, "accept failed"),
                },

                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }

        info!(open_connections = connections.len(), "shutting down, draining connections");
        while connections.join_next().await.is_some() {}

        info!("orderdesk stopped");
        Ok(())
    }
}

/// Drives one TCP connection until the client closes it.
async fn serve_connection<S>(stream: TcpStream, peer: SocketAddr, router: Arc<Router<S>>)
where
    S: Clone + Send + Sync + 'static,
{
    debug!(%peer, "connection opened");

    let svc = service_fn(move |req| {
        let router = Arc::clone(&router);
        async move { dispatch(&router, req).await }
    });

    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
        .serve_connection(TokioIo::new(stream), svc)
        .await
    {
        error!(%peer, error = %e, "connection failed");
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Reads the whole body, then hands the request to the router. Never fails
/// towards hyper: a body that cannot be read is answered 400 here.
async fn dispatch<S>(
    router: &Router<S>,
    req: hyper::Request<Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible>
where
    S: Clone + Send + Sync + 'static,
{
    let (parts, body) = req.into_parts();

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, "failed to read request body");
            return Ok(Response::status(StatusCode::BAD_REQUEST).into_inner());
        }
    };

    let response = router.call(http::Request::from_parts(parts, body)).await;
    Ok(response.into_inner())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first SIGTERM or SIGINT (Ctrl-C). On Windows only Ctrl-C.
///
/// A handler that fails to install never fires; the other one still does.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
