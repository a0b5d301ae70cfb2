//! Identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for each dispatched request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps log lines for one request easy to
/// correlate.
///
/// # Example
///
/// ```
/// use folio_core::RequestId;
///
/// let id = RequestId::new();
/// assert_ne!(id, RequestId::new());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Generates a fresh opaque identifier for a document fragment such as an
/// array item.
///
/// Identifiers are collision-resistant and sort by creation time.
#[must_use]
pub fn new_id() -> String {
    Uuid::now_v7().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_request_id_display_is_uuid() {
        let id = RequestId::new();
        assert_eq!(id.to_string().len(), 36);
        assert_eq!(RequestId::from(*id.as_uuid()), id);
    }

    #[test]
    fn test_new_id_is_unique_and_compact() {
        let ids: HashSet<_> = (0..256).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 256);
        assert!(ids.iter().all(|id| id.len() == 32 && !id.contains('-')));
    }
}
