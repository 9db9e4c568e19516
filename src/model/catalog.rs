// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use thiserror::Error;

use super::collection::Collection;
use super::entity_ref::{EntityId, EntityKind, ParentRef};
use super::file::File;
use super::ids::{
    CollectionId, FileId, Id, LocationId, COLLECTION_ID_PREFIX, FILE_ID_PREFIX,
    LOCATION_ID_PREFIX,
};
use super::location::Location;

/// Opaque address of the remote source a catalog mirrors. Never dereferenced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Remote(String);

impl Remote {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reasons a display name is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name must not be empty")]
    Empty,
    #[error("name must not contain '/'")]
    ContainsSlash,
}

/// Names are non-empty (after trimming) and never contain `/`, so `/`-joined paths stay
/// unambiguous.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.trim().is_empty() {
        return Err(NameError::Empty);
    }
    if name.contains('/') {
        return Err(NameError::ContainsSlash);
    }
    Ok(())
}

/// A structural violation found by [`Catalog::check_integrity`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("{parent} lists missing child {child}")]
    MissingChild { parent: ParentRef, child: EntityId },
    #[error("{child} is listed under {listed_under} but points at {points_at}")]
    ParentMismatch {
        child: EntityId,
        listed_under: ParentRef,
        points_at: ParentRef,
    },
    #[error("{child} is listed more than once")]
    DuplicateChild { child: EntityId },
    #[error("{entity} is not reachable from the catalog root")]
    Unreachable { entity: EntityId },
    #[error("{entity} has an invalid name {name:?}: {reason}")]
    InvalidName {
        entity: String,
        name: String,
        reason: NameError,
    },
    #[error("collection {collection} references missing location {location}")]
    DanglingMember {
        collection: CollectionId,
        location: LocationId,
    },
    #[error("collection {collection} lists location {location} more than once")]
    DuplicateMember {
        collection: CollectionId,
        location: LocationId,
    },
}

/// Root aggregate: owns the location tree and the collections.
///
/// Parent links are ids resolved through the per-kind tables, never owning pointers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    remote: Option<Remote>,
    children: Vec<LocationId>,
    locations: BTreeMap<LocationId, Location>,
    files: BTreeMap<FileId, File>,
    collections: BTreeMap<CollectionId, Collection>,
    rev: u64,
    next_id: u64,
}

impl Catalog {
    pub fn new(remote: Option<Remote>) -> Self {
        Self {
            remote,
            ..Self::default()
        }
    }

    pub(crate) fn from_parts(
        remote: Option<Remote>,
        children: Vec<LocationId>,
        locations: BTreeMap<LocationId, Location>,
        files: BTreeMap<FileId, File>,
        collections: BTreeMap<CollectionId, Collection>,
        rev: u64,
        next_id: u64,
    ) -> Self {
        Self {
            remote,
            children,
            locations,
            files,
            collections,
            rev,
            next_id,
        }
    }

    pub fn remote(&self) -> Option<&Remote> {
        self.remote.as_ref()
    }

    /// Top-level locations in insertion order.
    pub fn children(&self) -> &[LocationId] {
        &self.children
    }

    pub fn locations(&self) -> &BTreeMap<LocationId, Location> {
        &self.locations
    }

    pub fn files(&self) -> &BTreeMap<FileId, File> {
        &self.files
    }

    pub fn collections(&self) -> &BTreeMap<CollectionId, Collection> {
        &self.collections
    }

    pub fn location(&self, location_id: &LocationId) -> Option<&Location> {
        self.locations.get(location_id)
    }

    pub fn file(&self, file_id: &FileId) -> Option<&File> {
        self.files.get(file_id)
    }

    pub fn collection(&self, collection_id: &CollectionId) -> Option<&Collection> {
        self.collections.get(collection_id)
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    /// Counter backing generated ids; persisted so ids are never reused after a reload.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn contains(&self, entity_id: &EntityId) -> bool {
        match entity_id {
            EntityId::Location(id) => self.locations.contains_key(id),
            EntityId::File(id) => self.files.contains_key(id),
        }
    }

    pub fn parent_exists(&self, parent: &ParentRef) -> bool {
        match parent {
            ParentRef::Catalog => true,
            ParentRef::Location(id) => self.locations.contains_key(id),
        }
    }

    /// Looks up a tree entity by its raw id, trying locations first.
    pub fn resolve_id(&self, raw: &str) -> Option<EntityId> {
        if let Some((id, _)) = self.locations.get_key_value(raw) {
            return Some(EntityId::Location(id.clone()));
        }
        self.files
            .get_key_value(raw)
            .map(|(id, _)| EntityId::File(id.clone()))
    }

    /// Which table, if any, already holds `raw`. Ids are unique across all three kinds.
    pub fn kind_of_id(&self, raw: &str) -> Option<EntityKind> {
        id_kind(&self.locations, &self.files, &self.collections, raw)
    }

    pub fn name_of(&self, entity_id: &EntityId) -> Option<&str> {
        match entity_id {
            EntityId::Location(id) => self.locations.get(id).map(Location::name),
            EntityId::File(id) => self.files.get(id).map(File::name),
        }
    }

    /// Children of a container as tree entity ids.
    pub fn children_of(&self, parent: &ParentRef) -> Option<Vec<EntityId>> {
        match parent {
            ParentRef::Catalog => Some(
                self.children
                    .iter()
                    .cloned()
                    .map(EntityId::Location)
                    .collect(),
            ),
            ParentRef::Location(id) => self
                .locations
                .get(id)
                .map(|location| location.children().to_vec()),
        }
    }

    /// Verifies ids, back references, reachability and collection membership.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        let mut seen = BTreeSet::<EntityId>::new();
        let mut stack = Vec::<(ParentRef, EntityId)>::new();

        for location_id in self.children.iter().rev() {
            stack.push((ParentRef::Catalog, EntityId::Location(location_id.clone())));
        }

        while let Some((listed_under, child)) = stack.pop() {
            if !seen.insert(child.clone()) {
                return Err(IntegrityError::DuplicateChild { child });
            }

            match &child {
                EntityId::Location(id) => {
                    let Some(location) = self.locations.get(id) else {
                        return Err(IntegrityError::MissingChild {
                            parent: listed_under,
                            child,
                        });
                    };
                    if location.parent() != &listed_under {
                        return Err(IntegrityError::ParentMismatch {
                            child,
                            listed_under,
                            points_at: location.parent().clone(),
                        });
                    }
                    check_name(&child, location.name())?;
                    for grandchild in location.children().iter().rev() {
                        stack.push((ParentRef::Location(id.clone()), grandchild.clone()));
                    }
                }
                EntityId::File(id) => {
                    let Some(file) = self.files.get(id) else {
                        return Err(IntegrityError::MissingChild {
                            parent: listed_under,
                            child,
                        });
                    };
                    let points_at = ParentRef::Location(file.parent().clone());
                    if points_at != listed_under {
                        return Err(IntegrityError::ParentMismatch {
                            child,
                            listed_under,
                            points_at,
                        });
                    }
                    check_name(&child, file.name())?;
                }
            }
        }

        let all_entities = self
            .locations
            .keys()
            .cloned()
            .map(EntityId::Location)
            .chain(self.files.keys().cloned().map(EntityId::File));
        for entity in all_entities {
            if !seen.contains(&entity) {
                return Err(IntegrityError::Unreachable { entity });
            }
        }

        for (collection_id, collection) in &self.collections {
            if let Err(reason) = validate_name(collection.name()) {
                return Err(IntegrityError::InvalidName {
                    entity: format!("{}/{collection_id}", EntityKind::Collection),
                    name: collection.name().to_owned(),
                    reason,
                });
            }
            let mut members = BTreeSet::new();
            for location in collection.locations() {
                if !self.locations.contains_key(location) {
                    return Err(IntegrityError::DanglingMember {
                        collection: collection_id.clone(),
                        location: location.clone(),
                    });
                }
                if !members.insert(location) {
                    return Err(IntegrityError::DuplicateMember {
                        collection: collection_id.clone(),
                        location: location.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub(crate) fn assign_remote(&mut self, remote: Option<Remote>) {
        self.remote = remote;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<LocationId> {
        &mut self.children
    }

    pub(crate) fn locations_mut(&mut self) -> &mut BTreeMap<LocationId, Location> {
        &mut self.locations
    }

    pub(crate) fn files_mut(&mut self) -> &mut BTreeMap<FileId, File> {
        &mut self.files
    }

    pub(crate) fn collections_mut(&mut self) -> &mut BTreeMap<CollectionId, Collection> {
        &mut self.collections
    }

    pub(crate) fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    pub(crate) fn allocate_location_id(&mut self) -> LocationId {
        let (locations, files, collections) = (&self.locations, &self.files, &self.collections);
        allocate_id(&mut self.next_id, LOCATION_ID_PREFIX, |raw| {
            id_kind(locations, files, collections, raw).is_some()
        })
    }

    pub(crate) fn allocate_file_id(&mut self) -> FileId {
        let (locations, files, collections) = (&self.locations, &self.files, &self.collections);
        allocate_id(&mut self.next_id, FILE_ID_PREFIX, |raw| {
            id_kind(locations, files, collections, raw).is_some()
        })
    }

    pub(crate) fn allocate_collection_id(&mut self) -> CollectionId {
        let (locations, files, collections) = (&self.locations, &self.files, &self.collections);
        allocate_id(&mut self.next_id, COLLECTION_ID_PREFIX, |raw| {
            id_kind(locations, files, collections, raw).is_some()
        })
    }
}

fn id_kind(
    locations: &BTreeMap<LocationId, Location>,
    files: &BTreeMap<FileId, File>,
    collections: &BTreeMap<CollectionId, Collection>,
    raw: &str,
) -> Option<EntityKind> {
    if locations.contains_key(raw) {
        Some(EntityKind::Location)
    } else if files.contains_key(raw) {
        Some(EntityKind::File)
    } else if collections.contains_key(raw) {
        Some(EntityKind::Collection)
    } else {
        None
    }
}

fn check_name(entity: &EntityId, name: &str) -> Result<(), IntegrityError> {
    validate_name(name).map_err(|reason| IntegrityError::InvalidName {
        entity: entity.to_string(),
        name: name.to_owned(),
        reason,
    })
}

// Caller-chosen ids of any kind may already occupy `<prefix>:<n>`; keep counting past them.
fn allocate_id<T>(next_id: &mut u64, prefix: &str, is_taken: impl Fn(&str) -> bool) -> Id<T> {
    loop {
        *next_id = next_id.saturating_add(1);
        let Ok(candidate) = Id::<T>::new(format!("{prefix}:{next_id}")) else {
            continue;
        };
        if !is_taken(candidate.as_str()) {
            return candidate;
        }
    }
}
