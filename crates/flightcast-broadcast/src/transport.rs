//! Push transport seam.
//!
//! A [`PushTransport`] delivers one payload to one subscriber endpoint.
//! The transport classifies the one expected, routine failure mode —
//! the endpoint is confirmed gone — as a [`DeliveryOutcome::Stale`]
//! value rather than an error, so callers never inspect transport-
//! specific error shapes to decide on pruning.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::registry::SubscriberId;
use crate::translate::BroadcastPayload;

/// Result of one push attempt that did not hard-fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The payload reached the subscriber endpoint.
    Delivered,

    /// The endpoint is confirmed no longer valid (HTTP 410-equivalent).
    /// The subscriber should be pruned from the registry.
    Stale,
}

impl DeliveryOutcome {
    /// Returns `true` if the endpoint was reported gone.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, DeliveryOutcome::Stale)
    }
}

/// One-shot push delivery to a subscriber endpoint.
///
/// Implementations wrap the external push-delivery service. A delivery
/// attempt has no side effects beyond the remote push itself; in
/// particular the transport never mutates the registry.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Attempts a one-shot push of `payload` to `subscriber`.
    ///
    /// Returns [`DeliveryOutcome::Stale`] when the endpoint reports
    /// itself gone. That is the only failure the transport absorbs.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] for any other failure. The caller
    /// treats this as fatal for the delivery and does not retry.
    async fn deliver(
        &self,
        subscriber: &SubscriberId,
        payload: &BroadcastPayload,
    ) -> Result<DeliveryOutcome, TransportError>;
}
