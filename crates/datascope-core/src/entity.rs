//! Entity types, grant targets, and per-type metadata.

use crate::{CoreError, EntityId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A namespaced entity type, e.g. `cmdb.instance`.
///
/// The namespace routes indirect-permission derivation; the name identifies
/// one row-bearing type inside it. Serializes as its `"namespace.name"` key
/// so target maps stay representable as plain JSON objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct EntityType {
    namespace: String,
    name: String,
}

impl EntityType {
    /// Creates an entity type from a namespace and a type name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// The namespace component.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The type name component.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stable string key, `"namespace.name"`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

impl From<EntityType> for String {
    fn from(entity_type: EntityType) -> Self {
        entity_type.key()
    }
}

impl TryFrom<String> for EntityType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for EntityType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((namespace, name)) if !namespace.is_empty() && !name.is_empty() => {
                Ok(Self::new(namespace, name))
            }
            _ => Err(CoreError::InvalidEntityTypeKey(s.to_string())),
        }
    }
}

/// One concrete entity named inside a FILTER-type grant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// The entity type the id belongs to.
    pub entity_type: EntityType,
    /// The entity id.
    pub id: EntityId,
}

impl Target {
    /// Creates a target.
    pub fn new(entity_type: EntityType, id: impl Into<EntityId>) -> Self {
        Self {
            entity_type,
            id: id.into(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.id)
    }
}

/// Query-relevant metadata about one entity type.
///
/// Registered once at startup. Entity types without a descriptor are
/// treated as not tracking a creator attribute, so SELF-class resolution
/// contributes nothing for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// The described entity type.
    pub entity_type: EntityType,
    /// Whether rows of this type carry a created-by attribute.
    pub tracks_creator: bool,
}

impl EntityDescriptor {
    /// Creates a descriptor for a type without creator tracking.
    #[must_use]
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            tracks_creator: false,
        }
    }

    /// Marks the type as tracking a created-by attribute.
    #[must_use]
    pub fn with_creator_tracking(mut self) -> Self {
        self.tracks_creator = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_type_key_round_trip() {
        let ty = EntityType::new("cmdb", "instance");
        assert_eq!(ty.key(), "cmdb.instance");
        assert_eq!("cmdb.instance".parse::<EntityType>().unwrap(), ty);
    }

    #[test]
    fn entity_type_rejects_bad_keys() {
        assert!("".parse::<EntityType>().is_err());
        assert!("cmdb".parse::<EntityType>().is_err());
        assert!(".instance".parse::<EntityType>().is_err());
        assert!("cmdb.".parse::<EntityType>().is_err());
    }

    #[test]
    fn entity_type_serializes_as_key() {
        let ty = EntityType::new("cmdb", "model");
        let json = serde_json::to_string(&ty).unwrap();
        assert_eq!(json, "\"cmdb.model\"");
        let back: EntityType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);
    }

    #[test]
    fn descriptor_defaults_to_no_creator() {
        let desc = EntityDescriptor::new(EntityType::new("cmdb", "model"));
        assert!(!desc.tracks_creator);
        assert!(desc.with_creator_tracking().tracks_creator);
    }
}
