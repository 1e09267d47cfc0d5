//! Pass-through pipeline hook.
//!
//! The metrics adapter hands this layer back to the host so it can be
//! composed with the rest of the middleware chain. It wraps the inner
//! service without touching the request, the response, or the error type:
//! the chain always continues to the next stage.

use std::task::{Context, Poll};

use tower::{Layer, Service};

#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughLayer;

impl PassThroughLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for PassThroughLayer {
    type Service = PassThrough<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PassThrough { inner }
    }
}

#[derive(Debug, Clone)]
pub struct PassThrough<S> {
    inner: S,
}

impl<S, R> Service<R> for PassThrough<S>
where
    S: Service<R>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: R) -> Self::Future {
        self.inner.call(req)
    }
}
