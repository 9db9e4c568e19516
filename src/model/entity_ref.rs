// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::ids::{CollectionId, FileId, IdError, LocationId};

/// The kind of a catalog entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Location,
    File,
    Collection,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::File => "file",
            Self::Collection => "collection",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the location tree: either a Location or a File.
///
/// Location children are stored as a single ordered sequence of this tagged variant, so
/// sub-locations and files keep their relative insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    Location(LocationId),
    File(FileId),
}

impl EntityId {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Location(_) => EntityKind::Location,
            Self::File(_) => EntityKind::File,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Location(id) => id.as_str(),
            Self::File(id) => id.as_str(),
        }
    }

    pub fn as_location(&self) -> Option<&LocationId> {
        match self {
            Self::Location(id) => Some(id),
            Self::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileId> {
        match self {
            Self::File(id) => Some(id),
            Self::Location(_) => None,
        }
    }
}

impl From<LocationId> for EntityId {
    fn from(id: LocationId) -> Self {
        Self::Location(id)
    }
}

impl From<FileId> for EntityId {
    fn from(id: FileId) -> Self {
        Self::File(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind(), self.as_str())
    }
}

/// Back reference from a Location to its container.
///
/// This is a lookup key only; the container owns the child, never the other way around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParentRef {
    Catalog,
    Location(LocationId),
}

impl ParentRef {
    pub fn as_location(&self) -> Option<&LocationId> {
        match self {
            Self::Catalog => None,
            Self::Location(id) => Some(id),
        }
    }
}

impl From<LocationId> for ParentRef {
    fn from(id: LocationId) -> Self {
        Self::Location(id)
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => f.write_str("catalog"),
            Self::Location(id) => write!(f, "location/{id}"),
        }
    }
}

/// Reference to any addressable entity, used in change deltas.
///
/// Canonical format: `<kind>/<id>`, e.g. `location/loc:1` or `collection/col:4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityRef {
    Location(LocationId),
    File(FileId),
    Collection(CollectionId),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Location(_) => EntityKind::Location,
            Self::File(_) => EntityKind::File,
            Self::Collection(_) => EntityKind::Collection,
        }
    }

    pub fn id_str(&self) -> &str {
        match self {
            Self::Location(id) => id.as_str(),
            Self::File(id) => id.as_str(),
            Self::Collection(id) => id.as_str(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, ParseEntityRefError> {
        let (kind, id) = input.split_once('/').ok_or(ParseEntityRefError::MissingId)?;
        if id.is_empty() {
            return Err(ParseEntityRefError::MissingId);
        }
        match kind {
            "location" => Ok(Self::Location(LocationId::new(id)?)),
            "file" => Ok(Self::File(FileId::new(id)?)),
            "collection" => Ok(Self::Collection(CollectionId::new(id)?)),
            other => Err(ParseEntityRefError::UnknownKind(other.to_owned())),
        }
    }
}

impl From<EntityId> for EntityRef {
    fn from(id: EntityId) -> Self {
        match id {
            EntityId::Location(id) => Self::Location(id),
            EntityId::File(id) => Self::File(id),
        }
    }
}

impl From<CollectionId> for EntityRef {
    fn from(id: CollectionId) -> Self {
        Self::Collection(id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind(), self.id_str())
    }
}

impl FromStr for EntityRef {
    type Err = ParseEntityRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEntityRefError {
    #[error("entity ref is missing the id segment")]
    MissingId,
    #[error("unknown entity kind '{0}'")]
    UnknownKind(String),
    #[error("invalid entity id: {0}")]
    InvalidId(#[from] IdError),
}

#[cfg(test)]
mod tests {
    use super::{EntityRef, ParseEntityRefError};
    use crate::model::{CollectionId, IdError, LocationId};

    #[test]
    fn entity_ref_parses_canonical_form() {
        let parsed: EntityRef = "location/loc:7".parse().expect("parse");
        assert_eq!(parsed, EntityRef::Location(LocationId::new("loc:7").expect("id")));
        assert_eq!(parsed.to_string(), "location/loc:7");

        let parsed = EntityRef::parse("collection/favorites").expect("parse");
        assert_eq!(parsed, EntityRef::Collection(CollectionId::new("favorites").expect("id")));
    }

    #[test]
    fn entity_ref_rejects_malformed_input() {
        assert_eq!(EntityRef::parse("loc:7"), Err(ParseEntityRefError::MissingId));
        assert_eq!(EntityRef::parse("file/"), Err(ParseEntityRefError::MissingId));
        assert_eq!(
            EntityRef::parse("album/a"),
            Err(ParseEntityRefError::UnknownKind("album".to_owned()))
        );
        assert_eq!(
            EntityRef::parse("file/a/b"),
            Err(ParseEntityRefError::InvalidId(IdError::ContainsSlash))
        );
    }
}
