//! Upstream change record types.
//!
//! A [`ChangeRecord`] is one entry in an input batch: the operation that
//! happened to a tracked flight, an opaque sequence token used for
//! partial-batch failure reporting, and the raw entity image to be parsed
//! against the flight schema.

use std::fmt;

use serde_json::Value;

use crate::error::TranslateError;

/// The kind of change carried by an upstream record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// A new entity was created.
    Insert,
    /// An existing entity was updated.
    Modify,
    /// An entity was deleted.
    Remove,
}

impl OperationKind {
    /// Parses an operation kind from the upstream event name.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::UnknownOperation`] for any string other
    /// than `INSERT`, `MODIFY`, or `REMOVE`.
    pub fn from_event_name(s: &str) -> Result<Self, TranslateError> {
        match s {
            "INSERT" => Ok(OperationKind::Insert),
            "MODIFY" => Ok(OperationKind::Modify),
            "REMOVE" => Ok(OperationKind::Remove),
            other => Err(TranslateError::UnknownOperation(other.to_string())),
        }
    }

    /// Returns the upstream event name for this kind.
    #[must_use]
    pub fn as_event_name(&self) -> &'static str {
        match self {
            OperationKind::Insert => "INSERT",
            OperationKind::Modify => "MODIFY",
            OperationKind::Remove => "REMOVE",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_event_name())
    }
}

/// Opaque, per-record unique token identifying a record within its stream.
///
/// Only used for reporting failed records back to the upstream source;
/// the core never interprets its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SequenceToken(String);

impl SequenceToken {
    /// Creates a new sequence token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SequenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One raw change record from the upstream stream.
///
/// The envelope (stream metadata, shard info) is stripped by the
/// entrypoint before records reach the core; only the fields the
/// pipeline needs survive. Consumed once, never persisted.
#[derive(Debug, Clone)]
pub struct ChangeRecord {
    /// The kind of change this record represents.
    pub operation: OperationKind,

    /// Opaque token identifying this record for failure reporting.
    pub sequence_token: SequenceToken,

    /// The raw entity state, not yet validated against the flight schema.
    pub raw_image: Value,
}

impl ChangeRecord {
    /// Creates a new change record.
    #[must_use]
    pub fn new(operation: OperationKind, sequence_token: SequenceToken, raw_image: Value) -> Self {
        Self {
            operation,
            sequence_token,
            raw_image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_kind_parse() {
        assert_eq!(
            OperationKind::from_event_name("INSERT").unwrap(),
            OperationKind::Insert
        );
        assert_eq!(
            OperationKind::from_event_name("MODIFY").unwrap(),
            OperationKind::Modify
        );
        assert_eq!(
            OperationKind::from_event_name("REMOVE").unwrap(),
            OperationKind::Remove
        );
    }

    #[test]
    fn test_operation_kind_parse_unknown() {
        let err = OperationKind::from_event_name("TRUNCATE").unwrap_err();
        assert!(err.to_string().contains("TRUNCATE"));
    }

    #[test]
    fn test_operation_kind_roundtrip() {
        for kind in [
            OperationKind::Insert,
            OperationKind::Modify,
            OperationKind::Remove,
        ] {
            assert_eq!(
                OperationKind::from_event_name(kind.as_event_name()).unwrap(),
                kind
            );
        }
    }

    #[test]
    fn test_sequence_token_display() {
        let token = SequenceToken::new("4950000000000000000001");
        assert_eq!(token.to_string(), "4950000000000000000001");
        assert_eq!(token.as_str(), "4950000000000000000001");
    }

    #[test]
    fn test_sequence_token_serializes_transparent() {
        let token = SequenceToken::new("seq-1");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"seq-1\"");
    }

    #[test]
    fn test_change_record_construction() {
        let record = ChangeRecord::new(
            OperationKind::Insert,
            SequenceToken::new("seq-1"),
            json!({"flightId": "FC100"}),
        );
        assert_eq!(record.operation, OperationKind::Insert);
        assert_eq!(record.sequence_token.as_str(), "seq-1");
        assert_eq!(record.raw_image["flightId"], "FC100");
    }
}
