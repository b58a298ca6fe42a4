//! Subscriber registry seam.
//!
//! The registry owns the set of subscriber endpoint identities. The
//! broadcaster only reads the current set and requests removals; the
//! backing store (and its persistence) lives outside this crate.

use std::fmt;

use async_trait::async_trait;

use crate::error::RegistryError;

/// Opaque subscriber endpoint identity (e.g., a connection id).
///
/// The registry is the only component that interprets this value; the
/// broadcaster treats it as a routing key for deliveries and removals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(String);

impl SubscriberId {
    /// Creates a new subscriber identity.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of truth for the current subscriber set.
///
/// Implementations wrap an external store (the production registry is a
/// remote table keyed by connection id). Both operations are best-effort
/// from the pipeline's perspective: the batch loop converts a listing
/// failure into an empty snapshot, and the broadcaster logs and swallows
/// removal failures.
#[async_trait]
pub trait SubscriberRegistry: Send + Sync {
    /// Returns a best-effort snapshot of the current subscriber set.
    ///
    /// The snapshot is taken once per batch invocation; subscribers added
    /// after the snapshot will not receive events from that batch.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unavailable`] when the underlying store
    /// cannot be queried.
    async fn list_subscribers(&self) -> Result<Vec<SubscriberId>, RegistryError>;

    /// Removes a subscriber identity from the registry.
    ///
    /// Must be idempotent: removing an identity that is already absent
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::RemoveFailed`] when the deletion could
    /// not be performed.
    async fn remove_subscriber(&self, subscriber: &SubscriberId) -> Result<(), RegistryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_id_display() {
        let id = SubscriberId::new("conn-abc123");
        assert_eq!(id.to_string(), "conn-abc123");
        assert_eq!(id.as_str(), "conn-abc123");
    }

    #[test]
    fn test_subscriber_id_equality() {
        assert_eq!(SubscriberId::new("a"), SubscriberId::new("a"));
        assert_ne!(SubscriberId::new("a"), SubscriberId::new("b"));
    }

    #[test]
    fn test_subscriber_id_serializes_transparent() {
        let id = SubscriberId::new("conn-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"conn-1\"");
    }
}
