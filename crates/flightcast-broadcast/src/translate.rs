//! Change record translation.
//!
//! [`EventTranslator`] maps one raw [`ChangeRecord`] into a normalized
//! [`BroadcastPayload`]: the entity snapshot parsed against the flight
//! schema, plus the derived broadcast operation.
//!
//! ## Operation mapping
//!
//! | Record kind | Payload operation |
//! |-------------|-------------------|
//! | `Insert`    | `CREATE`          |
//! | `Modify`    | `UPDATE`          |
//! | `Remove`    | *(absent)*        |
//!
//! Removal records carry no operation: upstream never emits a delete
//! broadcast, so the `operation` key is simply left off the payload.

use serde::Serialize;

use crate::error::TranslateError;
use crate::flight::FlightSnapshot;
use crate::record::{ChangeRecord, OperationKind};

/// Broadcast-facing operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BroadcastOp {
    /// The entity was created.
    Create,
    /// The entity was updated.
    Update,
}

impl BroadcastOp {
    /// Returns the wire representation of the operation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BroadcastOp::Create => "CREATE",
            BroadcastOp::Update => "UPDATE",
        }
    }
}

/// Normalized payload delivered to every subscriber for one record.
///
/// Serializes as the flattened entity snapshot with an additional
/// `"operation"` key when the record kind maps to a broadcast operation.
/// Immutable once constructed; shared read-only across all concurrent
/// deliveries for the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BroadcastPayload {
    /// The entity snapshot.
    #[serde(flatten)]
    pub snapshot: FlightSnapshot,

    /// The derived operation, absent for unmapped record kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<BroadcastOp>,
}

/// Maps raw change records into broadcast payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventTranslator;

impl EventTranslator {
    /// Creates a new translator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Translates one change record into a broadcast payload.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::MalformedImage`] when the raw image
    /// does not parse against the flight schema.
    pub fn translate(&self, record: &ChangeRecord) -> Result<BroadcastPayload, TranslateError> {
        let snapshot: FlightSnapshot = serde_json::from_value(record.raw_image.clone())?;

        let operation = match record.operation {
            OperationKind::Insert => Some(BroadcastOp::Create),
            OperationKind::Modify => Some(BroadcastOp::Update),
            OperationKind::Remove => None,
        };

        Ok(BroadcastPayload {
            snapshot,
            operation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SequenceToken;
    use serde_json::json;

    fn image() -> serde_json::Value {
        json!({
            "flightId": "FC100",
            "origin": "SEA",
            "destination": "JFK",
            "status": "DELAYED",
            "gate": "B12"
        })
    }

    fn record(kind: OperationKind) -> ChangeRecord {
        ChangeRecord::new(kind, SequenceToken::new("seq-1"), image())
    }

    #[test]
    fn test_modify_maps_to_update() {
        let payload = EventTranslator::new()
            .translate(&record(OperationKind::Modify))
            .unwrap();
        assert_eq!(payload.operation, Some(BroadcastOp::Update));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["operation"], "UPDATE");
        assert_eq!(json["flightId"], "FC100");
        assert_eq!(json["gate"], "B12");
    }

    #[test]
    fn test_insert_maps_to_create() {
        let payload = EventTranslator::new()
            .translate(&record(OperationKind::Insert))
            .unwrap();
        assert_eq!(payload.operation, Some(BroadcastOp::Create));
        assert_eq!(serde_json::to_value(&payload).unwrap()["operation"], "CREATE");
    }

    // Removal records intentionally carry no operation key; upstream
    // never emits a delete broadcast.
    #[test]
    fn test_remove_has_no_operation_key() {
        let payload = EventTranslator::new()
            .translate(&record(OperationKind::Remove))
            .unwrap();
        assert_eq!(payload.operation, None);

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("operation").is_none());
        assert_eq!(json["flightId"], "FC100");
    }

    #[test]
    fn test_malformed_image_is_translate_error() {
        let record = ChangeRecord::new(
            OperationKind::Insert,
            SequenceToken::new("seq-1"),
            json!({"flightId": "FC100"}),
        );
        let err = EventTranslator::new().translate(&record).unwrap_err();
        assert!(matches!(err, TranslateError::MalformedImage(_)));
    }

    #[test]
    fn test_broadcast_op_as_str() {
        assert_eq!(BroadcastOp::Create.as_str(), "CREATE");
        assert_eq!(BroadcastOp::Update.as_str(), "UPDATE");
    }
}
