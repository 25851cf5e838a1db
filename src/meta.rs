use std::time::SystemTime;

use uuid::Uuid;

use crate::EventId;

/// Metadata attached to every accepted publication.
///
/// - `id`: unique identifier of the publication.
/// - `timestamp`: acceptance time in nanoseconds since Unix epoch (truncated to `u64`).
///
/// Both values only serve logging and monitoring; dispatch never looks at them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meta {
    id: EventId,
    timestamp: u64,
}

impl Meta {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().as_u128(),
            timestamp: SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map_or(0, |d| d.as_nanos() as u64),
        }
    }

    /// Unique identifier for this publication.
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Timestamp in nanoseconds since Unix epoch (u64 truncation).
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

impl Default for Meta {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = Meta::new();
        let b = Meta::new();
        assert_ne!(a.id(), b.id());
        assert!(a.timestamp() > 0);
        assert!(b.timestamp() >= a.timestamp());
    }
}
