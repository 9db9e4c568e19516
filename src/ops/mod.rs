// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for catalogs.
//!
//! Each operation validates before it touches the catalog, so a rejected call leaves contents
//! and `rev` unchanged. The direct methods on [`Catalog`] apply a single mutation; batches go
//! through [`apply_ops`] with optimistic concurrency (revision checks) and produce a minimal
//! delta for callers that keep derived state.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::model::{
    validate_name, Catalog, Collection, CollectionId, EntityId, EntityKind, EntityRef, File,
    FileId, FileKind, Location, LocationId, Meta, NameError, ParentRef, Remote,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// `location_id: None` lets the catalog generate one.
    CreateLocation {
        location_id: Option<LocationId>,
        name: String,
        parent: ParentRef,
    },
    CreateFile {
        file_id: Option<FileId>,
        name: String,
        parent: LocationId,
        kind: FileKind,
        meta: Meta,
    },
    CreateCollection {
        collection_id: Option<CollectionId>,
        name: String,
    },
    AddLocationToCollection {
        collection_id: CollectionId,
        location_id: LocationId,
    },
    RemoveLocationFromCollection {
        collection_id: CollectionId,
        location_id: LocationId,
    },
    RemoveEntity {
        entity_id: EntityId,
    },
    RemoveCollection {
        collection_id: CollectionId,
    },
    Rename {
        target: EntityRef,
        name: String,
    },
    Move {
        entity_id: EntityId,
        new_parent: ParentRef,
    },
    SetFileKind {
        file_id: FileId,
        kind: FileKind,
    },
    SetFileMeta {
        file_id: FileId,
        meta: Meta,
    },
    SetRemote {
        remote: Option<Remote>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which entities changed as the result of applying ops.
///
/// Containers whose child list changed are reported as updated. `catalog_updated` covers the
/// root itself (remote, top-level children).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<EntityRef>,
    pub removed: Vec<EntityRef>,
    pub updated: Vec<EntityRef>,
    pub catalog_updated: bool,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.updated.is_empty()
            && !self.catalog_updated
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: HashSet<EntityRef>,
    removed: HashSet<EntityRef>,
    updated: HashSet<EntityRef>,
    catalog_updated: bool,
}

impl DeltaBuilder {
    fn record_added(&mut self, entity: impl Into<EntityRef>) {
        let entity = entity.into();
        self.removed.remove(&entity);
        self.updated.remove(&entity);
        self.added.insert(entity);
    }

    fn record_removed(&mut self, entity: impl Into<EntityRef>) {
        let entity = entity.into();
        // Created and dropped within one batch: nothing for the caller to see.
        if self.added.remove(&entity) {
            self.updated.remove(&entity);
            return;
        }
        self.updated.remove(&entity);
        self.removed.insert(entity);
    }

    fn record_updated(&mut self, entity: impl Into<EntityRef>) {
        let entity = entity.into();
        if self.added.contains(&entity) || self.removed.contains(&entity) {
            return;
        }
        self.updated.insert(entity);
    }

    fn record_container_updated(&mut self, parent: &ParentRef) {
        match parent {
            ParentRef::Catalog => self.catalog_updated = true,
            ParentRef::Location(id) => self.record_updated(EntityRef::Location(id.clone())),
        }
    }

    fn finish(self) -> Delta {
        let mut added = self.added.into_iter().collect::<Vec<_>>();
        let mut removed = self.removed.into_iter().collect::<Vec<_>>();
        let mut updated = self.updated.into_iter().collect::<Vec<_>>();

        added.sort();
        removed.sort();
        updated.sort();

        Delta {
            added,
            removed,
            updated,
            catalog_updated: self.catalog_updated,
        }
    }
}

/// Applies `ops` atomically: either every op succeeds and the catalog revision is bumped once,
/// or the catalog is left exactly as it was.
pub fn apply_ops(
    catalog: &mut Catalog,
    base_rev: u64,
    ops: &[Op],
) -> Result<ApplyResult, CatalogError> {
    let current_rev = catalog.rev();
    if base_rev != current_rev {
        return Err(CatalogError::Conflict {
            base_rev,
            current_rev,
        });
    }

    if ops.is_empty() {
        return Ok(ApplyResult {
            new_rev: current_rev,
            applied: 0,
            delta: Delta::default(),
        });
    }

    let mut working = catalog.clone();
    let mut delta = DeltaBuilder::default();

    for op in ops {
        apply_op(&mut working, op, &mut delta)?;
    }

    working.bump_rev();
    *catalog = working;
    let new_rev = catalog.rev();
    debug!(new_rev, applied = ops.len(), "applied catalog ops");

    Ok(ApplyResult {
        new_rev,
        applied: ops.len(),
        delta: delta.finish(),
    })
}

fn apply_op(catalog: &mut Catalog, op: &Op, delta: &mut DeltaBuilder) -> Result<(), CatalogError> {
    match op {
        Op::CreateLocation {
            location_id,
            name,
            parent,
        } => insert_location(catalog, location_id.clone(), name, parent, delta).map(|_| ()),
        Op::CreateFile {
            file_id,
            name,
            parent,
            kind,
            meta,
        } => insert_file(
            catalog,
            file_id.clone(),
            name,
            parent,
            kind.clone(),
            meta.clone(),
            delta,
        )
        .map(|_| ()),
        Op::CreateCollection {
            collection_id,
            name,
        } => insert_collection(catalog, collection_id.clone(), name, delta).map(|_| ()),
        Op::AddLocationToCollection {
            collection_id,
            location_id,
        } => add_member(catalog, collection_id, location_id, delta).map(|_| ()),
        Op::RemoveLocationFromCollection {
            collection_id,
            location_id,
        } => remove_member(catalog, collection_id, location_id, delta),
        Op::RemoveEntity { entity_id } => remove_subtree(catalog, entity_id, delta).map(|_| ()),
        Op::RemoveCollection { collection_id } => {
            remove_collection(catalog, collection_id, delta)
        }
        Op::Rename { target, name } => rename(catalog, target, name, delta),
        Op::Move {
            entity_id,
            new_parent,
        } => move_entity(catalog, entity_id, new_parent, delta),
        Op::SetFileKind { file_id, kind } => {
            let file = file_mut(catalog, file_id)?;
            file.set_kind(kind.clone());
            delta.record_updated(EntityRef::File(file_id.clone()));
            Ok(())
        }
        Op::SetFileMeta { file_id, meta } => {
            let file = file_mut(catalog, file_id)?;
            file.set_meta(meta.clone());
            delta.record_updated(EntityRef::File(file_id.clone()));
            Ok(())
        }
        Op::SetRemote { remote } => {
            catalog.assign_remote(remote.clone());
            delta.catalog_updated = true;
            Ok(())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("parent {parent} does not exist")]
    InvalidParent { parent: ParentRef },
    #[error("{kind} not found (id={id})")]
    NotFound { kind: EntityKind, id: String },
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: NameError },
    #[error("{kind} already exists (id={id})")]
    AlreadyExists { kind: EntityKind, id: String },
    #[error("cannot move location {location} under {target}, which is inside its own subtree")]
    Cycle {
        location: LocationId,
        target: LocationId,
    },
    #[error("stale base_rev (base_rev={base_rev}, current_rev={current_rev})")]
    Conflict { base_rev: u64, current_rev: u64 },
}

impl CatalogError {
    fn not_found(kind: EntityKind, id: impl AsRef<str>) -> Self {
        Self::NotFound {
            kind,
            id: id.as_ref().to_owned(),
        }
    }
}

// Extracted single-mutation implementation shared by the direct methods and `apply_ops`.
include!("ops_impl.rs");
