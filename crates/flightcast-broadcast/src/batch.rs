//! Batch processing with per-record failure isolation.
//!
//! [`BatchProcessor`] drives a batch of change records through
//! translation and fan-out. Failures are contained at the per-record
//! boundary: one bad record is logged and reported in the
//! [`BatchResult`], and its siblings are still processed. Nothing
//! escapes [`BatchProcessor::process_batch`].

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, warn};

use crate::broadcast::FanoutBroadcaster;
use crate::error::BroadcastError;
use crate::metrics::BroadcastMetrics;
use crate::record::{ChangeRecord, SequenceToken};
use crate::registry::{SubscriberId, SubscriberRegistry};
use crate::translate::EventTranslator;
use crate::transport::PushTransport;

/// One record that could not be processed end-to-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRecord {
    /// The sequence token of the failed record.
    #[serde(rename = "itemIdentifier")]
    pub item_identifier: SequenceToken,
}

/// Ordered report of the records in a batch that failed.
///
/// Consumed by the entrypoint to signal partial-batch failure back to
/// the upstream stream source, so only failed records are redelivered.
/// Serializes in the shape the upstream source expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    /// Failed records, in batch order.
    #[serde(rename = "batchItemFailures")]
    pub failures: Vec<FailedRecord>,
}

impl BatchResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a failed record.
    pub fn record_failure(&mut self, token: SequenceToken) {
        self.failures.push(FailedRecord {
            item_identifier: token,
        });
    }

    /// Returns `true` when every record in the batch succeeded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the number of failed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }
}

/// Drives a batch of change records through translate + broadcast.
pub struct BatchProcessor<T, R> {
    translator: EventTranslator,
    broadcaster: FanoutBroadcaster<T, R>,
    registry: Arc<R>,
    metrics: Arc<BroadcastMetrics>,
}

impl<T, R> BatchProcessor<T, R>
where
    T: PushTransport,
    R: SubscriberRegistry,
{
    /// Creates a new batch processor over the given transport and registry.
    #[must_use]
    pub fn new(transport: Arc<T>, registry: Arc<R>) -> Self {
        let metrics = Arc::new(BroadcastMetrics::new());
        let broadcaster = FanoutBroadcaster::with_metrics(
            transport,
            Arc::clone(&registry),
            Arc::clone(&metrics),
        );
        Self {
            translator: EventTranslator::new(),
            broadcaster,
            registry,
            metrics,
        }
    }

    /// Returns the metrics handle shared with the broadcaster.
    #[must_use]
    pub fn metrics(&self) -> &Arc<BroadcastMetrics> {
        &self.metrics
    }

    /// Processes a batch of change records, returning the failure report.
    ///
    /// The subscriber snapshot is fetched once per invocation and shared
    /// across all records in the batch; a listing failure degrades to an
    /// empty snapshot (zero deliveries) rather than failing the batch.
    /// Records are processed sequentially; each record's deliveries fan
    /// out concurrently inside [`FanoutBroadcaster::broadcast`].
    pub async fn process_batch(&self, records: &[ChangeRecord]) -> BatchResult {
        let subscribers = self.subscriber_snapshot().await;

        let mut result = BatchResult::new();
        for record in records {
            if let Err(e) = self.process_record(record, &subscribers).await {
                error!(
                    sequence_token = %record.sequence_token,
                    error = %e,
                    "record processing failed"
                );
                result.record_failure(record.sequence_token.clone());
            }
        }

        self.metrics.record_batch(records.len() as u64);
        result
    }

    async fn process_record(
        &self,
        record: &ChangeRecord,
        subscribers: &[SubscriberId],
    ) -> Result<(), BroadcastError> {
        let payload = self.translator.translate(record)?;
        self.broadcaster.broadcast(&payload, subscribers).await
    }

    async fn subscriber_snapshot(&self) -> Vec<SubscriberId> {
        match self.registry.list_subscribers().await {
            Ok(subscribers) => subscribers,
            Err(e) => {
                warn!(error = %e, "could not load subscribers, broadcasting to none");
                Vec::new()
            }
        }
    }
}

impl<T, R> std::fmt::Debug for BatchProcessor<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchProcessor")
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}
