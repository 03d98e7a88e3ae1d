//! Timeout layer for RPC requests.
//!
//! Requests that exceed the deadline fail; nothing is retried.

use alloy::{
    rpc::json_rpc::{RequestPacket, ResponsePacket},
    transports::{Transport, TransportError, TransportErrorKind, TransportFut},
};
use futures::FutureExt;
use std::{
    task::{Context, Poll},
    time::Duration,
};
use tower::{Layer, Service};
use tracing::{trace, warn};

/// A [`tower::Layer`] that fails RPC requests taking longer than `timeout`.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutLayer {
    timeout: Duration,
}

impl TimeoutLayer {
    /// Create a new [`TimeoutLayer`].
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl<T> Layer<T> for TimeoutLayer {
    type Service = TimeoutService<T>;

    fn layer(&self, inner: T) -> Self::Service {
        TimeoutService { inner, timeout: self.timeout }
    }
}

/// A service that wraps a transport with a request deadline.
#[derive(Debug, Clone)]
pub struct TimeoutService<T> {
    inner: T,
    timeout: Duration,
}

impl<T> Service<RequestPacket> for TimeoutService<T>
where
    T: Transport + Clone,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = TransportFut<'static>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: RequestPacket) -> Self::Future {
        let method = req.as_single().map(|r| r.method()).unwrap_or("batch").to_string();
        let timeout = self.timeout;
        let fut = self.inner.call(req);

        async move {
            trace!(%method, "Sending RPC request");
            tokio::time::timeout(timeout, fut).await.unwrap_or_else(|_| {
                warn!(%method, timeout_secs = timeout.as_secs(), "RPC request timed out");
                Err(TransportErrorKind::custom_str(&format!("{method} timed out after {timeout:?}")))
            })
        }
        .boxed()
    }
}
