// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::SmallVec;

use crate::model::{
    Catalog, Collection, CollectionId, EntityId, File, Location, LocationId, ParentRef,
};

/// One visited entity of a depth-first walk. Top-level locations have depth 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub depth: usize,
    pub entity: EntityId,
}

/// Resolves the container of a location or file.
pub fn resolve_parent(catalog: &Catalog, entity: &EntityId) -> Option<ParentRef> {
    match entity {
        EntityId::Location(id) => catalog.location(id).map(|loc| loc.parent().clone()),
        EntityId::File(id) => catalog
            .file(id)
            .map(|file| ParentRef::Location(file.parent().clone())),
    }
}

/// `/`-joined names from the top-level location down to `entity`.
pub fn path_of(catalog: &Catalog, entity: &EntityId) -> Option<String> {
    let mut segments: SmallVec<[&str; 8]> = SmallVec::new();
    segments.push(catalog.name_of(entity)?);

    let mut cursor = resolve_parent(catalog, entity)?;
    while let ParentRef::Location(id) = cursor {
        let location = catalog.location(&id)?;
        segments.push(location.name());
        // A parent chain longer than the table means the links loop.
        if segments.len() > catalog.locations().len() + 1 {
            return None;
        }
        cursor = location.parent().clone();
    }

    segments.reverse();
    Some(segments.join("/"))
}

/// Follows `path` (names separated by `/`) from the catalog root. Each segment picks the first
/// matching child in child order; files are only valid as the last segment.
pub fn resolve_path(catalog: &Catalog, path: &str) -> Option<EntityId> {
    let mut segments = path.split('/').filter(|segment| !segment.is_empty()).peekable();
    let first = segments.next()?;

    let mut current = catalog
        .children()
        .iter()
        .find(|id| catalog.location(id).is_some_and(|loc| loc.name() == first))
        .cloned()
        .map(EntityId::Location)?;

    while let Some(segment) = segments.next() {
        let EntityId::Location(location_id) = &current else {
            return None;
        };
        let location = catalog.location(location_id)?;
        let is_last = segments.peek().is_none();
        current = location
            .children()
            .iter()
            .find(|child| {
                let matches_kind = is_last || matches!(child, EntityId::Location(_));
                matches_kind && catalog.name_of(child) == Some(segment)
            })?
            .clone();
    }

    Some(current)
}

/// Depth-first pre-order walk over the whole catalog in child order.
pub fn walk(catalog: &Catalog) -> Vec<WalkEntry> {
    let roots = catalog
        .children()
        .iter()
        .cloned()
        .map(EntityId::Location)
        .collect::<Vec<_>>();
    walk_entities(catalog, roots, 0)
}

/// Depth-first pre-order walk of the subtree below `location` (the location itself excluded).
pub fn walk_from(catalog: &Catalog, location: &LocationId) -> Vec<WalkEntry> {
    match catalog.location(location) {
        Some(loc) => walk_entities(catalog, loc.children().to_vec(), 0),
        None => Vec::new(),
    }
}

fn walk_entities(catalog: &Catalog, roots: Vec<EntityId>, base_depth: usize) -> Vec<WalkEntry> {
    let mut out = Vec::new();
    let mut stack = roots
        .into_iter()
        .rev()
        .map(|entity| (base_depth, entity))
        .collect::<Vec<_>>();

    while let Some((depth, entity)) = stack.pop() {
        if let EntityId::Location(id) = &entity {
            if let Some(location) = catalog.location(id) {
                stack.extend(
                    location
                        .children()
                        .iter()
                        .rev()
                        .cloned()
                        .map(|child| (depth + 1, child)),
                );
            }
        }
        out.push(WalkEntry { depth, entity });
    }

    out
}

/// Every file of the catalog in walk order.
pub fn list_files(catalog: &Catalog) -> Vec<&File> {
    walk(catalog)
        .into_iter()
        .filter_map(|entry| entry.entity.as_file().and_then(|id| catalog.file(id)))
        .collect()
}

/// Members of a collection that still resolve to locations, in membership order.
pub fn collection_locations<'a>(
    catalog: &'a Catalog,
    collection_id: &CollectionId,
) -> Option<Vec<&'a Location>> {
    let collection = catalog.collection(collection_id)?;
    Some(
        collection
            .locations()
            .iter()
            .filter_map(|id| catalog.location(id))
            .collect(),
    )
}

pub fn collections_containing<'a>(
    catalog: &'a Catalog,
    location_id: &LocationId,
) -> Vec<&'a Collection> {
    catalog
        .collections()
        .values()
        .filter(|collection| collection.contains(location_id))
        .collect()
}
