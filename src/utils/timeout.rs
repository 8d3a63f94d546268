//! # Deadline Helpers
//!
//! Async deadline wrappers for transport operations.
//!
//! Every blocking transport call is bounded by an explicit caller-supplied
//! deadline; `None` preserves wait-forever behavior for callers that want
//! it.

use std::future::Future;
use std::time::Duration;

use crate::error::TransportError;

/// Default deadline for a single send or receive.
pub const DEFAULT_IO_DEADLINE: Duration = Duration::from_secs(5);

/// Default deadline for the TCP connect handshake or a server's accept.
pub const DEFAULT_CONNECT_DEADLINE: Duration = Duration::from_secs(10);

/// Default deadline for a full command/reply round trip.
pub const DEFAULT_REPLY_DEADLINE: Duration = Duration::from_secs(30);

/// Run `future`, aborting with [`TransportError::Timeout`] once `deadline`
/// elapses. A `deadline` of `None` awaits the future without bound.
pub async fn with_deadline<F>(
    deadline: Option<Duration>,
    future: F,
) -> Result<F::Output, TransportError>
where
    F: Future,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, future)
            .await
            .map_err(|_| TransportError::Timeout(limit)),
        None => Ok(future.await),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[tokio::test]
    async fn completes_within_deadline() {
        let out = with_deadline(Some(Duration::from_secs(5)), async { 42 })
            .await
            .unwrap();
        assert_eq!(out, 42);
    }

    #[tokio::test]
    async fn expires_on_slow_future() {
        let result = with_deadline(Some(Duration::from_millis(10)), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
        })
        .await;
        assert!(matches!(result, Err(TransportError::Timeout(_))));
    }

    #[tokio::test]
    async fn none_means_no_deadline() {
        let out = with_deadline(None, async { "done" }).await.unwrap();
        assert_eq!(out, "done");
    }
}
