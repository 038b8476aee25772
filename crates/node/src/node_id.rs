use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Unique identifier for a node on the topology canvas.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(uuid::Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Stable id derived from a human readable name.
    ///
    /// The same name always maps to the same id, so scripts can refer to
    /// `"router-1"` instead of a full UUID.
    pub fn named(name: &str) -> Self {
        Self(uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, name.as_bytes()))
    }

    /// Parses a full UUID, falling back to [`NodeId::named`].
    pub fn parse(s: &str) -> Self {
        match uuid::Uuid::parse_str(s) {
            Ok(uuid) => Self(uuid),
            Err(_) => Self::named(s),
        }
    }

    /// Get the full UUID string.
    pub fn to_uuid_string(&self) -> String {
        self.0.to_string()
    }

    /// Create a NodeId from a u128 (useful for tests).
    pub fn from_u128(value: u128) -> Self {
        Self(uuid::Uuid::from_u128(value))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", &self.0.to_string()[..8])
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_ids_are_stable() {
        assert_eq!(NodeId::named("router-1"), NodeId::named("router-1"));
        assert_ne!(NodeId::named("router-1"), NodeId::named("router-2"));
    }

    #[test]
    fn deserialize_accepts_uuid_or_name() {
        let id = NodeId::from_u128(42);
        let json = serde_json::to_string(&id).unwrap();
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let by_name: NodeId = serde_json::from_str("\"zone-a\"").unwrap();
        assert_eq!(by_name, NodeId::named("zone-a"));
    }

    #[test]
    fn display_is_short() {
        let id = NodeId::from_u128(1);
        assert_eq!(id.to_string().len(), 8);
        assert_eq!(format!("{:?}", id), format!("NodeId({})", id));
    }
}
