//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. A request that matches no
//! tree goes to the fallback handler.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;
use tracing::{Instrument, info, info_span};

use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Owns the application state `S`; every handler call receives a clone of it.
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve),
/// or drive it directly with [`Router::call`].
pub struct Router<S> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    fallback: BoxedHandler<S>,
    state: S,
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Creates an empty router around `state`. Unmatched requests get a bare 404
    /// until [`fallback`](Router::fallback) replaces it.
    pub fn with_state(state: S) -> Self {
        Self {
            routes: HashMap::new(),
            fallback: not_found::<S>.into_boxed_handler(),
            state,
        }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid template or conflicts with an existing
    /// route for the same method. Routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn patch(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::PATCH, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    /// Handler for every method + path pair no route matches.
    pub fn fallback(mut self, handler: impl Handler<S>) -> Self {
        self.fallback = handler.into_boxed_handler();
        self
    }

    /// Routes one request and produces one response.
    pub async fn call(&self, req: http::Request<Bytes>) -> Response {
        let (parts, body) = req.into_parts();
        let span = info_span!("request", method = %parts.method, path = %parts.uri.path());

        async move {
            let started = Instant::now();
            let (handler, params) = self
                .lookup(&parts.method, parts.uri.path())
                .unwrap_or_else(|| (Arc::clone(&self.fallback), HashMap::new()));

            let response = handler.call(Request::new(parts, body, params), self.state.clone()).await;

            info!(
                status = response.status_code().as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "request completed",
            );
            response
        }
        .instrument(span)
        .await
    }

    fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler<S>, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

async fn not_found<S>(_req: Request, _state: S) -> StatusCode {
    StatusCode::NOT_FOUND
}
