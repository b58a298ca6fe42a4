//! Testing utilities for the broadcast pipeline.
//!
//! Provides scripted mocks for the two external seams
//! ([`MockSubscriberRegistry`], [`MockPushTransport`]) and builders for
//! change records, used by this crate's tests and by downstream crates
//! wiring the pipeline into an entrypoint.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::error::{RegistryError, TransportError};
use crate::record::{ChangeRecord, OperationKind, SequenceToken};
use crate::registry::{SubscriberId, SubscriberRegistry};
use crate::translate::{BroadcastPayload, EventTranslator};
use crate::transport::{DeliveryOutcome, PushTransport};

/// Returns a well-formed flight entity image.
#[must_use]
pub fn flight_image() -> Value {
    json!({
        "flightId": "FC100",
        "origin": "SEA",
        "destination": "JFK",
        "status": "DELAYED",
        "gate": "B12"
    })
}

/// Builds a change record with a well-formed image.
#[must_use]
pub fn change_record(operation: OperationKind, token: &str) -> ChangeRecord {
    ChangeRecord::new(operation, SequenceToken::new(token), flight_image())
}

/// Builds a change record whose image fails schema validation.
#[must_use]
pub fn malformed_record(token: &str) -> ChangeRecord {
    ChangeRecord::new(
        OperationKind::Modify,
        SequenceToken::new(token),
        json!({"flightId": "FC100"}),
    )
}

/// Returns a translated payload for a well-formed modify record.
///
/// # Panics
///
/// Panics if translation fails (should not happen with the builder image).
#[must_use]
pub fn flight_payload() -> BroadcastPayload {
    EventTranslator::new()
        .translate(&change_record(OperationKind::Modify, "seq-0"))
        .unwrap()
}

/// In-memory subscriber registry with scriptable failures.
#[derive(Debug, Default)]
pub struct MockSubscriberRegistry {
    subscribers: Mutex<Vec<SubscriberId>>,
    removed: Mutex<Vec<SubscriberId>>,
    fail_listing: AtomicBool,
    fail_removals: AtomicBool,
    list_calls: AtomicU64,
    remove_calls: AtomicU64,
}

impl MockSubscriberRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with the given subscriber ids.
    #[must_use]
    pub fn with_subscribers(ids: &[&str]) -> Self {
        let registry = Self::new();
        *registry.subscribers.lock() = ids.iter().map(|id| SubscriberId::new(*id)).collect();
        registry
    }

    /// Makes every subsequent listing fail.
    pub fn fail_listing(&self) {
        self.fail_listing.store(true, Ordering::Relaxed);
    }

    /// Makes every subsequent removal fail.
    pub fn fail_removals(&self) {
        self.fail_removals.store(true, Ordering::Relaxed);
    }

    /// Returns the identities removed so far, in removal order.
    #[must_use]
    pub fn removed(&self) -> Vec<SubscriberId> {
        self.removed.lock().clone()
    }

    /// Returns the number of listing calls made.
    #[must_use]
    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::Relaxed)
    }

    /// Returns the number of removal calls made.
    #[must_use]
    pub fn remove_calls(&self) -> u64 {
        self.remove_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SubscriberRegistry for MockSubscriberRegistry {
    async fn list_subscribers(&self) -> Result<Vec<SubscriberId>, RegistryError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_listing.load(Ordering::Relaxed) {
            return Err(RegistryError::Unavailable("scripted outage".into()));
        }
        Ok(self.subscribers.lock().clone())
    }

    async fn remove_subscriber(&self, subscriber: &SubscriberId) -> Result<(), RegistryError> {
        self.remove_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_removals.load(Ordering::Relaxed) {
            return Err(RegistryError::RemoveFailed("scripted outage".into()));
        }
        // Idempotent: removing an absent id is fine.
        self.subscribers.lock().retain(|s| s != subscriber);
        self.removed.lock().push(subscriber.clone());
        Ok(())
    }
}

/// Push transport that records every delivery attempt.
///
/// Outcomes are scripted per subscriber: stale, persistent failure, or
/// failure for the next N attempts only. Unscripted deliveries succeed.
#[derive(Debug, Default)]
pub struct MockPushTransport {
    attempts: Mutex<Vec<(SubscriberId, Value)>>,
    stale: Mutex<HashSet<SubscriberId>>,
    failing: Mutex<HashSet<SubscriberId>>,
    fail_next: Mutex<HashMap<SubscriberId, u64>>,
}

impl MockPushTransport {
    /// Creates a transport where every delivery succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the endpoint of `id` as gone: deliveries report stale.
    pub fn stale_for(&self, id: &str) {
        self.stale.lock().insert(SubscriberId::new(id));
    }

    /// Scripts every delivery to `id` to fail with a transport error.
    pub fn fail_for(&self, id: &str) {
        self.failing.lock().insert(SubscriberId::new(id));
    }

    /// Scripts the next `n` deliveries to `id` to fail, then succeed.
    pub fn fail_for_next_deliveries(&self, id: &str, n: u64) {
        self.fail_next.lock().insert(SubscriberId::new(id), n);
    }

    /// Returns the total number of delivery attempts.
    #[must_use]
    pub fn delivery_count(&self) -> usize {
        self.attempts.lock().len()
    }

    /// Returns the number of delivery attempts to `id`.
    #[must_use]
    pub fn deliveries_to(&self, id: &str) -> usize {
        let target = SubscriberId::new(id);
        self.attempts
            .lock()
            .iter()
            .filter(|(sub, _)| *sub == target)
            .count()
    }

    /// Returns the serialized payloads attempted against `id`, in order.
    #[must_use]
    pub fn payloads_to(&self, id: &str) -> Vec<Value> {
        let target = SubscriberId::new(id);
        self.attempts
            .lock()
            .iter()
            .filter(|(sub, _)| *sub == target)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

#[async_trait]
impl PushTransport for MockPushTransport {
    async fn deliver(
        &self,
        subscriber: &SubscriberId,
        payload: &BroadcastPayload,
    ) -> Result<DeliveryOutcome, TransportError> {
        let encoded = serde_json::to_value(payload)?;
        self.attempts.lock().push((subscriber.clone(), encoded));

        {
            let mut fail_next = self.fail_next.lock();
            if let Some(remaining) = fail_next.get_mut(subscriber) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(TransportError::DeliveryFailed("scripted failure".into()));
                }
            }
        }

        if self.failing.lock().contains(subscriber) {
            return Err(TransportError::DeliveryFailed("scripted failure".into()));
        }

        if self.stale.lock().contains(subscriber) {
            return Ok(DeliveryOutcome::Stale);
        }

        Ok(DeliveryOutcome::Delivered)
    }
}
