//! Typed ID wrappers for type safety across mintari.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for an uploaded image record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRecordId(Uuid);

impl ImageRecordId {
    /// Generate a new random record ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageRecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ImageRecordId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ImageRecordId> for Uuid {
    fn from(id: ImageRecordId) -> Self {
        id.0
    }
}

impl FromStr for ImageRecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Display for ImageRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(ImageRecordId::new(), ImageRecordId::new());
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let id = ImageRecordId::new();
        let parsed: ImageRecordId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not-a-uuid".parse::<ImageRecordId>().is_err());
    }

    #[test]
    fn test_serializes_transparently() {
        let uuid = Uuid::new_v4();
        let id = ImageRecordId::from(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}
