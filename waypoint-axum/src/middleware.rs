//! Request-lifecycle tower middlewares.

use std::task::{Context, Poll};

use axum::http::{header, HeaderValue, Request};
use tower::{Layer, Service};

/// Request extension marking the request as excluded from previous-URL
/// history: [`crate::extract::facts_from_parts`] will not read `Referer`,
/// so redirect fallbacks target the site root instead of the prior page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcludeFromHistory;

/// Overwrites the `Accept` header with `application/json` so the request
/// always classifies as wanting JSON, whatever the client declared.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceJsonLayer;

impl ForceJsonLayer {
    /// Creates the layer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for ForceJsonLayer {
    type Service = ForceJson<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ForceJson { inner }
    }
}

/// Service produced by [`ForceJsonLayer`].
#[derive(Debug, Clone)]
pub struct ForceJson<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for ForceJson<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        req.headers_mut()
            .insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        self.inner.call(req)
    }
}

/// Marks the request with [`ExcludeFromHistory`] so it never becomes a
/// redirect-back target.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcludeFromHistoryLayer;

impl ExcludeFromHistoryLayer {
    /// Creates the layer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for ExcludeFromHistoryLayer {
    type Service = ExcludeFromHistoryService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ExcludeFromHistoryService { inner }
    }
}

/// Service produced by [`ExcludeFromHistoryLayer`].
#[derive(Debug, Clone)]
pub struct ExcludeFromHistoryService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for ExcludeFromHistoryService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        req.extensions_mut().insert(ExcludeFromHistory);
        self.inner.call(req)
    }
}
