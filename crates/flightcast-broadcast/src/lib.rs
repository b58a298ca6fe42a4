//! # Flightcast Broadcast
//!
//! Change-event fan-out for flight status updates: a batch of upstream
//! change records is translated into normalized payloads and delivered
//! to every subscriber endpoint listed by a registry, pruning
//! subscribers whose endpoint has gone stale.
//!
//! ## Pipeline
//!
//! ```text
//! batch of ChangeRecord
//!   -> BatchProcessor          (sequential records, failure isolation)
//!      -> EventTranslator      (raw image -> BroadcastPayload)
//!      -> FanoutBroadcaster    (concurrent deliveries, fan-out/fan-in)
//!         -> PushTransport     (one-shot push per subscriber)
//!         -> SubscriberRegistry(snapshot + stale pruning)
//!   <- BatchResult             (failed sequence tokens, batch order)
//! ```
//!
//! The registry store and the push-delivery service live outside this
//! crate, behind the [`registry::SubscriberRegistry`] and
//! [`transport::PushTransport`] seams.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Broadcast error types.
pub mod error;

/// Upstream change record types.
pub mod record;

/// Flight status entity schema.
pub mod flight;

/// Change record translation into broadcast payloads.
pub mod translate;

/// Subscriber registry seam.
pub mod registry;

/// Push transport seam.
pub mod transport;

/// Concurrent fan-out of one payload to all subscribers.
pub mod broadcast;

/// Batch processing with per-record failure isolation.
pub mod batch;

/// Broadcast configuration surface.
pub mod config;

/// Broadcast pipeline metrics.
pub mod metrics;

/// Testing utilities (scripted mocks, record builders).
pub mod testing;
