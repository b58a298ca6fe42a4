//! Flight status entity schema.
//!
//! [`FlightSnapshot`] is the normalized entity state extracted from a raw
//! change record image. The schema is owned upstream; this type pins the
//! fields the broadcaster requires and passes any additional attributes
//! through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A point-in-time snapshot of one tracked flight.
///
/// Required fields must be present and well-typed in the raw image or the
/// record is considered malformed. Unknown attributes are retained in
/// `extra` and flattened back into the broadcast payload, so schema
/// additions upstream do not require a change here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSnapshot {
    /// Unique flight identifier.
    pub flight_id: String,

    /// Origin airport code.
    pub origin: String,

    /// Destination airport code.
    pub destination: String,

    /// Current status (e.g., "SCHEDULED", "DELAYED", "LANDED").
    pub status: String,

    /// Attributes outside the pinned schema, passed through as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_minimal_image() {
        let snapshot: FlightSnapshot = serde_json::from_value(json!({
            "flightId": "FC100",
            "origin": "SEA",
            "destination": "JFK",
            "status": "SCHEDULED"
        }))
        .unwrap();

        assert_eq!(snapshot.flight_id, "FC100");
        assert_eq!(snapshot.status, "SCHEDULED");
        assert!(snapshot.extra.is_empty());
    }

    #[test]
    fn test_extra_attributes_pass_through() {
        let snapshot: FlightSnapshot = serde_json::from_value(json!({
            "flightId": "FC100",
            "origin": "SEA",
            "destination": "JFK",
            "status": "DELAYED",
            "gate": "B12",
            "delayMinutes": 45
        }))
        .unwrap();

        assert_eq!(snapshot.extra["gate"], "B12");
        assert_eq!(snapshot.extra["delayMinutes"], 45);

        let back = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(back["gate"], "B12");
        assert_eq!(back["flightId"], "FC100");
    }

    #[test]
    fn test_missing_required_field_is_error() {
        let result: Result<FlightSnapshot, _> = serde_json::from_value(json!({
            "flightId": "FC100",
            "origin": "SEA",
            "status": "SCHEDULED"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_ill_typed_field_is_error() {
        let result: Result<FlightSnapshot, _> = serde_json::from_value(json!({
            "flightId": 100,
            "origin": "SEA",
            "destination": "JFK",
            "status": "SCHEDULED"
        }));
        assert!(result.is_err());
    }
}
