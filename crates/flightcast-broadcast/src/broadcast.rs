//! Concurrent fan-out of one payload to all subscribers.
//!
//! [`FanoutBroadcaster`] delivers a payload to every subscriber in a
//! snapshot concurrently and joins on all outcomes before returning
//! (fan-out / fan-in). Subscribers reported stale by the transport are
//! pruned from the registry; any other delivery failure is surfaced to
//! the caller once every delivery has settled.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::error::BroadcastError;
use crate::metrics::BroadcastMetrics;
use crate::registry::{SubscriberId, SubscriberRegistry};
use crate::translate::BroadcastPayload;
use crate::transport::{DeliveryOutcome, PushTransport};

/// Delivers one payload to many subscribers concurrently.
///
/// The transport and registry are explicit constructor parameters; the
/// broadcaster holds no process-wide mutable state, so concurrent batch
/// invocations with different handles cannot alias each other.
pub struct FanoutBroadcaster<T, R> {
    transport: Arc<T>,
    registry: Arc<R>,
    metrics: Arc<BroadcastMetrics>,
}

impl<T, R> FanoutBroadcaster<T, R>
where
    T: PushTransport,
    R: SubscriberRegistry,
{
    /// Creates a new broadcaster over the given transport and registry.
    #[must_use]
    pub fn new(transport: Arc<T>, registry: Arc<R>) -> Self {
        Self::with_metrics(transport, registry, Arc::new(BroadcastMetrics::new()))
    }

    /// Creates a broadcaster that records into an existing metrics handle.
    #[must_use]
    pub fn with_metrics(
        transport: Arc<T>,
        registry: Arc<R>,
        metrics: Arc<BroadcastMetrics>,
    ) -> Self {
        Self {
            transport,
            registry,
            metrics,
        }
    }

    /// Returns the metrics handle.
    #[must_use]
    pub fn metrics(&self) -> &Arc<BroadcastMetrics> {
        &self.metrics
    }

    /// Delivers `payload` to every subscriber in the snapshot.
    ///
    /// All deliveries run concurrently and the call returns only after
    /// every one has settled; a slow or failing subscriber does not block
    /// delivery to the others. An empty snapshot is a no-op success.
    ///
    /// Each [`DeliveryOutcome::Stale`] outcome triggers exactly one
    /// removal attempt against the registry; removal failures are logged
    /// and swallowed (stale entries persist until the next opportunity).
    ///
    /// # Errors
    ///
    /// Returns [`BroadcastError::Delivery`] carrying the first non-stale
    /// transport error in snapshot order. All removals for stale
    /// outcomes are attempted before the error is returned.
    pub async fn broadcast(
        &self,
        payload: &BroadcastPayload,
        subscribers: &[SubscriberId],
    ) -> Result<(), BroadcastError> {
        if subscribers.is_empty() {
            debug!("no subscribers, skipping broadcast");
            return Ok(());
        }

        let deliveries = subscribers.iter().map(|subscriber| {
            let transport = Arc::clone(&self.transport);
            async move {
                debug!(subscriber = %subscriber, "delivering payload");
                (subscriber, transport.deliver(subscriber, payload).await)
            }
        });

        // join_all preserves snapshot order, which makes the
        // first-error tie-break deterministic per run.
        let settled = join_all(deliveries).await;

        let mut first_error = None;
        for (subscriber, result) in settled {
            match result {
                Ok(DeliveryOutcome::Delivered) => {
                    self.metrics.record_delivery();
                }
                Ok(DeliveryOutcome::Stale) => {
                    info!(subscriber = %subscriber, "pruning stale subscriber");
                    self.metrics.record_stale_pruned();
                    if let Err(e) = self.registry.remove_subscriber(subscriber).await {
                        warn!(subscriber = %subscriber, error = %e, "stale subscriber removal failed");
                    }
                }
                Err(e) => {
                    self.metrics.record_error();
                    if first_error.is_none() {
                        first_error = Some(BroadcastError::Delivery {
                            subscriber: subscriber.clone(),
                            source: e,
                        });
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<T, R> std::fmt::Debug for FanoutBroadcaster<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutBroadcaster")
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}
