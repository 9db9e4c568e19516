// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over catalogs.
//!
//! Queries never mutate; they derive paths, walks, search hits and summaries from the
//! id-linked tables of a [`Catalog`].

pub mod search;
pub mod tree;

pub use search::{find_by_name, fuzzy_find, SearchHit};
pub use tree::{
    collection_locations, collections_containing, list_files, path_of, resolve_parent,
    resolve_path, walk, walk_from, WalkEntry,
};

use crate::model::{Catalog, CollectionId, EntityId, FileKind, Meta, ParentRef};

#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub entity: EntityId,
    pub name: String,
    pub path: String,
    pub parent: ParentRef,
    pub collections: Vec<CollectionId>,
    pub details: EntityDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityDetails {
    Location { sub_locations: usize, files: usize },
    File { kind: FileKind, meta: Meta },
}

/// Summary of one location or file, or `None` when the id is unknown.
pub fn entity_info(catalog: &Catalog, entity: &EntityId) -> Option<EntityInfo> {
    let name = catalog.name_of(entity)?.to_owned();
    let path = path_of(catalog, entity)?;
    let parent = resolve_parent(catalog, entity)?;

    let (collections, details) = match entity {
        EntityId::Location(id) => {
            let location = catalog.location(id)?;
            let collections = collections_containing(catalog, id)
                .into_iter()
                .map(|collection| collection.collection_id().clone())
                .collect();
            let details = EntityDetails::Location {
                sub_locations: location.sub_locations().count(),
                files: location.files().count(),
            };
            (collections, details)
        }
        EntityId::File(id) => {
            let file = catalog.file(id)?;
            let details = EntityDetails::File {
                kind: file.kind().clone(),
                meta: file.meta().clone(),
            };
            (Vec::new(), details)
        }
    };

    Some(EntityInfo {
        entity: entity.clone(),
        name,
        path,
        parent,
        collections,
        details,
    })
}
