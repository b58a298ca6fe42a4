//! Broadcast error types.
//!
//! Provides a unified error hierarchy for the fan-out pipeline:
//! - [`RegistryError`]: Subscriber registry operations
//! - [`TransportError`]: Push delivery failures (non-stale)
//! - [`TranslateError`]: Change record translation failures
//! - [`BroadcastError`]: Per-record failures surfaced to the batch loop

use thiserror::Error;

use crate::registry::SubscriberId;

/// Errors from the subscriber registry.
///
/// Both variants are non-fatal to batch processing: a failed listing is
/// treated as an empty subscriber snapshot, and a failed removal leaves
/// the stale entry for a later cleanup pass.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry could not be reached or the listing query failed.
    #[error("registry unavailable: {0}")]
    Unavailable(String),

    /// A subscriber removal failed.
    #[error("removal failed: {0}")]
    RemoveFailed(String),
}

/// Errors from the push transport.
///
/// A stale endpoint is *not* an error: the transport reports it as
/// [`DeliveryOutcome::Stale`](crate::transport::DeliveryOutcome::Stale).
/// Everything here is fatal to the record being processed and is never
/// retried by the broadcaster.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to connect to the push endpoint.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The push endpoint rejected the delivery.
    #[error("endpoint rejected delivery with status {status}: {message}")]
    Rejected {
        /// Status code returned by the endpoint.
        status: u16,
        /// Details from the endpoint response.
        message: String,
    },

    /// The payload could not be encoded for the wire.
    #[error("payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// An internal transport failure that fits no other category.
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Errors that occur while translating a change record into a payload.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The raw entity image does not parse against the flight schema.
    #[error("malformed entity image: {0}")]
    MalformedImage(String),

    /// An unrecognized operation kind string on the upstream record.
    #[error("unknown operation kind: {0}")]
    UnknownOperation(String),
}

impl From<serde_json::Error> for TranslateError {
    fn from(e: serde_json::Error) -> Self {
        TranslateError::MalformedImage(e.to_string())
    }
}

/// A per-record failure surfaced by the broadcaster to the batch loop.
///
/// Stale subscribers never produce this; they are pruned and the record
/// still succeeds. Only translation failures and non-stale transport
/// errors mark a record as failed.
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// A delivery to one subscriber failed with a non-stale error.
    #[error("delivery to subscriber {subscriber} failed: {source}")]
    Delivery {
        /// The subscriber whose delivery failed.
        subscriber: SubscriberId,
        /// The underlying transport error.
        #[source]
        source: TransportError,
    },

    /// The record could not be translated into a payload.
    #[error(transparent)]
    Translate(#[from] TranslateError),
}

/// Errors from the broadcast configuration surface.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration key is not set.
    #[error("missing required config: {0}")]
    MissingKey(String),

    /// A configuration value could not be parsed.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue {
        /// The configuration key.
        key: String,
        /// Details about the parse failure.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::Unavailable("table not found".into());
        assert_eq!(err.to_string(), "registry unavailable: table not found");
    }

    #[test]
    fn test_transport_rejected_display() {
        let err = TransportError::Rejected {
            status: 403,
            message: "forbidden".into(),
        };
        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("forbidden"));
    }

    #[test]
    fn test_translate_error_from_json() {
        let json_err: Result<serde_json::Value, _> = serde_json::from_str("{bad json");
        let err: TranslateError = json_err.unwrap_err().into();
        assert!(matches!(err, TranslateError::MalformedImage(_)));
    }

    #[test]
    fn test_broadcast_error_from_translate() {
        let err: BroadcastError = TranslateError::MalformedImage("missing origin".into()).into();
        assert!(matches!(err, BroadcastError::Translate(_)));
        assert!(err.to_string().contains("missing origin"));
    }

    #[test]
    fn test_broadcast_delivery_error_display() {
        let err = BroadcastError::Delivery {
            subscriber: SubscriberId::new("conn-1"),
            source: TransportError::DeliveryFailed("socket closed".into()),
        };
        assert!(err.to_string().contains("conn-1"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingKey("push.endpoint".into());
        assert_eq!(err.to_string(), "missing required config: push.endpoint");
    }
}
