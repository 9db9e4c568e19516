// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Single mutations of the catalog, each validating fully before it writes.
/// Keeps `ops::mod` focused on public op types and batch orchestration.
impl Catalog {
    /// Creates a location under the catalog root or an existing location.
    pub fn create_location(
        &mut self,
        name: impl AsRef<str>,
        parent: ParentRef,
    ) -> Result<LocationId, CatalogError> {
        let mut delta = DeltaBuilder::default();
        let location_id = insert_location(self, None, name.as_ref(), &parent, &mut delta)?;
        commit(self, delta);
        debug!(location_id = %location_id, parent = %parent, "created location");
        Ok(location_id)
    }

    /// Creates a file inside an existing location.
    pub fn create_file(
        &mut self,
        name: impl AsRef<str>,
        parent: &LocationId,
        kind: FileKind,
        meta: Meta,
    ) -> Result<FileId, CatalogError> {
        let mut delta = DeltaBuilder::default();
        let file_id = insert_file(self, None, name.as_ref(), parent, kind, meta, &mut delta)?;
        commit(self, delta);
        debug!(file_id = %file_id, parent = %parent, "created file");
        Ok(file_id)
    }

    pub fn create_collection(
        &mut self,
        name: impl AsRef<str>,
    ) -> Result<CollectionId, CatalogError> {
        let mut delta = DeltaBuilder::default();
        let collection_id = insert_collection(self, None, name.as_ref(), &mut delta)?;
        commit(self, delta);
        debug!(collection_id = %collection_id, "created collection");
        Ok(collection_id)
    }

    /// Idempotent: returns `false` (and leaves `rev` alone) when the location is already a
    /// member.
    pub fn add_location_to_collection(
        &mut self,
        collection_id: &CollectionId,
        location_id: &LocationId,
    ) -> Result<bool, CatalogError> {
        let mut delta = DeltaBuilder::default();
        let added = add_member(self, collection_id, location_id, &mut delta)?;
        commit(self, delta);
        debug!(collection_id = %collection_id, location_id = %location_id, added, "collection add");
        Ok(added)
    }

    pub fn remove_location_from_collection(
        &mut self,
        collection_id: &CollectionId,
        location_id: &LocationId,
    ) -> Result<(), CatalogError> {
        let mut delta = DeltaBuilder::default();
        remove_member(self, collection_id, location_id, &mut delta)?;
        commit(self, delta);
        debug!(collection_id = %collection_id, location_id = %location_id, "collection remove");
        Ok(())
    }

    /// Removes a file, or a location with its whole subtree. Removed locations are detached
    /// from every collection. Returns the removed entities in depth-first pre-order.
    pub fn remove_entity(&mut self, entity_id: &EntityId) -> Result<Vec<EntityId>, CatalogError> {
        let mut delta = DeltaBuilder::default();
        let removed = remove_subtree(self, entity_id, &mut delta)?;
        commit(self, delta);
        debug!(entity = %entity_id, removed = removed.len(), "removed entity");
        Ok(removed)
    }

    pub fn remove_collection(&mut self, collection_id: &CollectionId) -> Result<(), CatalogError> {
        let mut delta = DeltaBuilder::default();
        remove_collection(self, collection_id, &mut delta)?;
        commit(self, delta);
        debug!(collection_id = %collection_id, "removed collection");
        Ok(())
    }

    pub fn rename_entity(
        &mut self,
        entity_id: &EntityId,
        name: impl AsRef<str>,
    ) -> Result<(), CatalogError> {
        let mut delta = DeltaBuilder::default();
        rename(self, &EntityRef::from(entity_id.clone()), name.as_ref(), &mut delta)?;
        commit(self, delta);
        debug!(entity = %entity_id, "renamed entity");
        Ok(())
    }

    pub fn rename_collection(
        &mut self,
        collection_id: &CollectionId,
        name: impl AsRef<str>,
    ) -> Result<(), CatalogError> {
        let mut delta = DeltaBuilder::default();
        let target = EntityRef::Collection(collection_id.clone());
        rename(self, &target, name.as_ref(), &mut delta)?;
        commit(self, delta);
        debug!(collection_id = %collection_id, "renamed collection");
        Ok(())
    }

    /// Re-parents a location or file, appending it to the new parent's children.
    pub fn move_entity(
        &mut self,
        entity_id: &EntityId,
        new_parent: ParentRef,
    ) -> Result<(), CatalogError> {
        let mut delta = DeltaBuilder::default();
        move_entity(self, entity_id, &new_parent, &mut delta)?;
        commit(self, delta);
        debug!(entity = %entity_id, new_parent = %new_parent, "moved entity");
        Ok(())
    }

    pub fn set_file_kind(&mut self, file_id: &FileId, kind: FileKind) -> Result<(), CatalogError> {
        file_mut(self, file_id)?.set_kind(kind);
        self.bump_rev();
        Ok(())
    }

    pub fn set_file_meta(&mut self, file_id: &FileId, meta: Meta) -> Result<(), CatalogError> {
        file_mut(self, file_id)?.set_meta(meta);
        self.bump_rev();
        Ok(())
    }

    pub fn set_remote(&mut self, remote: Option<Remote>) {
        self.assign_remote(remote);
        self.bump_rev();
    }
}

// No-op mutations (e.g. re-adding a collection member) leave `rev` untouched.
fn commit(catalog: &mut Catalog, delta: DeltaBuilder) {
    if !delta.finish().is_empty() {
        catalog.bump_rev();
    }
}

fn checked_name(name: &str) -> Result<&str, CatalogError> {
    validate_name(name).map_err(|reason| CatalogError::InvalidName {
        name: name.to_owned(),
        reason,
    })?;
    Ok(name)
}

fn insert_location(
    catalog: &mut Catalog,
    location_id: Option<LocationId>,
    name: &str,
    parent: &ParentRef,
    delta: &mut DeltaBuilder,
) -> Result<LocationId, CatalogError> {
    let name = checked_name(name)?;
    if !catalog.parent_exists(parent) {
        return Err(CatalogError::InvalidParent {
            parent: parent.clone(),
        });
    }

    let location_id = match location_id {
        Some(id) => {
            if let Some(kind) = catalog.kind_of_id(id.as_str()) {
                return Err(CatalogError::AlreadyExists {
                    kind,
                    id: id.into_string(),
                });
            }
            id
        }
        None => catalog.allocate_location_id(),
    };

    catalog.locations_mut().insert(
        location_id.clone(),
        Location::new(location_id.clone(), name, parent.clone()),
    );
    attach_child(catalog, parent, EntityId::Location(location_id.clone()));

    delta.record_added(EntityRef::Location(location_id.clone()));
    delta.record_container_updated(parent);
    Ok(location_id)
}

fn insert_file(
    catalog: &mut Catalog,
    file_id: Option<FileId>,
    name: &str,
    parent: &LocationId,
    kind: FileKind,
    meta: Meta,
    delta: &mut DeltaBuilder,
) -> Result<FileId, CatalogError> {
    let name = checked_name(name)?;
    let parent_ref = ParentRef::Location(parent.clone());
    if !catalog.parent_exists(&parent_ref) {
        return Err(CatalogError::InvalidParent { parent: parent_ref });
    }

    let file_id = match file_id {
        Some(id) => {
            if let Some(kind) = catalog.kind_of_id(id.as_str()) {
                return Err(CatalogError::AlreadyExists {
                    kind,
                    id: id.into_string(),
                });
            }
            id
        }
        None => catalog.allocate_file_id(),
    };

    catalog.files_mut().insert(
        file_id.clone(),
        File::new(file_id.clone(), name, parent.clone(), kind, meta),
    );
    attach_child(catalog, &parent_ref, EntityId::File(file_id.clone()));

    delta.record_added(EntityRef::File(file_id.clone()));
    delta.record_container_updated(&parent_ref);
    Ok(file_id)
}

fn insert_collection(
    catalog: &mut Catalog,
    collection_id: Option<CollectionId>,
    name: &str,
    delta: &mut DeltaBuilder,
) -> Result<CollectionId, CatalogError> {
    let name = checked_name(name)?;
    let collection_id = match collection_id {
        Some(id) => {
            if let Some(kind) = catalog.kind_of_id(id.as_str()) {
                return Err(CatalogError::AlreadyExists {
                    kind,
                    id: id.into_string(),
                });
            }
            id
        }
        None => catalog.allocate_collection_id(),
    };

    catalog.collections_mut().insert(
        collection_id.clone(),
        Collection::new(collection_id.clone(), name),
    );
    delta.record_added(EntityRef::Collection(collection_id.clone()));
    Ok(collection_id)
}

fn add_member(
    catalog: &mut Catalog,
    collection_id: &CollectionId,
    location_id: &LocationId,
    delta: &mut DeltaBuilder,
) -> Result<bool, CatalogError> {
    if !catalog.locations().contains_key(location_id) {
        return Err(CatalogError::not_found(EntityKind::Location, location_id));
    }
    let Some(collection) = catalog.collections_mut().get_mut(collection_id) else {
        return Err(CatalogError::not_found(EntityKind::Collection, collection_id));
    };

    let added = collection.insert(location_id.clone());
    if added {
        delta.record_updated(EntityRef::Collection(collection_id.clone()));
    }
    Ok(added)
}

fn remove_member(
    catalog: &mut Catalog,
    collection_id: &CollectionId,
    location_id: &LocationId,
    delta: &mut DeltaBuilder,
) -> Result<(), CatalogError> {
    let Some(collection) = catalog.collections_mut().get_mut(collection_id) else {
        return Err(CatalogError::not_found(EntityKind::Collection, collection_id));
    };
    if !collection.remove(location_id) {
        return Err(CatalogError::not_found(EntityKind::Location, location_id));
    }
    delta.record_updated(EntityRef::Collection(collection_id.clone()));
    Ok(())
}

fn remove_subtree(
    catalog: &mut Catalog,
    entity_id: &EntityId,
    delta: &mut DeltaBuilder,
) -> Result<Vec<EntityId>, CatalogError> {
    let parent = match entity_id {
        EntityId::Location(id) => match catalog.location(id) {
            Some(location) => location.parent().clone(),
            None => return Err(CatalogError::not_found(EntityKind::Location, id)),
        },
        EntityId::File(id) => match catalog.file(id) {
            Some(file) => ParentRef::Location(file.parent().clone()),
            None => return Err(CatalogError::not_found(EntityKind::File, id)),
        },
    };

    let mut removed = Vec::new();
    let mut stack = vec![entity_id.clone()];
    while let Some(entity) = stack.pop() {
        if let EntityId::Location(id) = &entity {
            if let Some(location) = catalog.location(id) {
                stack.extend(location.children().iter().rev().cloned());
            }
        }
        removed.push(entity);
    }

    detach_child(catalog, &parent, entity_id);
    delta.record_container_updated(&parent);

    for entity in &removed {
        match entity {
            EntityId::Location(id) => {
                catalog.locations_mut().remove(id);
                for (collection_id, collection) in catalog.collections_mut().iter_mut() {
                    if collection.remove(id) {
                        delta.record_updated(EntityRef::Collection(collection_id.clone()));
                    }
                }
            }
            EntityId::File(id) => {
                catalog.files_mut().remove(id);
            }
        }
        delta.record_removed(EntityRef::from(entity.clone()));
    }

    Ok(removed)
}

fn remove_collection(
    catalog: &mut Catalog,
    collection_id: &CollectionId,
    delta: &mut DeltaBuilder,
) -> Result<(), CatalogError> {
    if catalog.collections_mut().remove(collection_id).is_none() {
        return Err(CatalogError::not_found(EntityKind::Collection, collection_id));
    }
    delta.record_removed(EntityRef::Collection(collection_id.clone()));
    Ok(())
}

fn rename(
    catalog: &mut Catalog,
    target: &EntityRef,
    name: &str,
    delta: &mut DeltaBuilder,
) -> Result<(), CatalogError> {
    let name = checked_name(name)?;
    match target {
        EntityRef::Location(id) => {
            let Some(location) = catalog.locations_mut().get_mut(id) else {
                return Err(CatalogError::not_found(EntityKind::Location, id));
            };
            location.set_name(name);
        }
        EntityRef::File(id) => file_mut(catalog, id)?.set_name(name),
        EntityRef::Collection(id) => {
            let Some(collection) = catalog.collections_mut().get_mut(id) else {
                return Err(CatalogError::not_found(EntityKind::Collection, id));
            };
            collection.set_name(name);
        }
    }
    delta.record_updated(target.clone());
    Ok(())
}

fn move_entity(
    catalog: &mut Catalog,
    entity_id: &EntityId,
    new_parent: &ParentRef,
    delta: &mut DeltaBuilder,
) -> Result<(), CatalogError> {
    let old_parent = match entity_id {
        EntityId::Location(id) => {
            let Some(location) = catalog.location(id) else {
                return Err(CatalogError::not_found(EntityKind::Location, id));
            };
            let old_parent = location.parent().clone();
            if !catalog.parent_exists(new_parent) {
                return Err(CatalogError::InvalidParent {
                    parent: new_parent.clone(),
                });
            }
            if let ParentRef::Location(target) = new_parent {
                ensure_not_within(catalog, id, target)?;
            }
            old_parent
        }
        EntityId::File(id) => {
            let Some(file) = catalog.file(id) else {
                return Err(CatalogError::not_found(EntityKind::File, id));
            };
            let old_parent = ParentRef::Location(file.parent().clone());
            // Files live in locations only.
            if new_parent.as_location().is_none() || !catalog.parent_exists(new_parent) {
                return Err(CatalogError::InvalidParent {
                    parent: new_parent.clone(),
                });
            }
            old_parent
        }
    };

    detach_child(catalog, &old_parent, entity_id);
    attach_child(catalog, new_parent, entity_id.clone());
    match entity_id {
        EntityId::Location(id) => {
            if let Some(location) = catalog.locations_mut().get_mut(id) {
                location.set_parent(new_parent.clone());
            }
        }
        EntityId::File(id) => {
            if let (Some(file), Some(target)) =
                (catalog.files_mut().get_mut(id), new_parent.as_location())
            {
                file.set_parent(target.clone());
            }
        }
    }

    delta.record_updated(EntityRef::from(entity_id.clone()));
    delta.record_container_updated(&old_parent);
    delta.record_container_updated(new_parent);
    Ok(())
}

/// Rejects `target` when it is `location` itself or one of its descendants.
fn ensure_not_within(
    catalog: &Catalog,
    location: &LocationId,
    target: &LocationId,
) -> Result<(), CatalogError> {
    let mut cursor = Some(target);
    while let Some(current) = cursor {
        if current == location {
            return Err(CatalogError::Cycle {
                location: location.clone(),
                target: target.clone(),
            });
        }
        cursor = catalog
            .location(current)
            .and_then(|loc| loc.parent().as_location());
    }
    Ok(())
}

fn file_mut<'a>(catalog: &'a mut Catalog, file_id: &FileId) -> Result<&'a mut File, CatalogError> {
    catalog
        .files_mut()
        .get_mut(file_id)
        .ok_or_else(|| CatalogError::not_found(EntityKind::File, file_id))
}

fn attach_child(catalog: &mut Catalog, parent: &ParentRef, child: EntityId) {
    match parent {
        ParentRef::Catalog => {
            if let EntityId::Location(id) = child {
                catalog.children_mut().push(id);
            }
        }
        ParentRef::Location(parent_id) => {
            if let Some(location) = catalog.locations_mut().get_mut(parent_id) {
                location.children_mut().push(child);
            }
        }
    }
}

fn detach_child(catalog: &mut Catalog, parent: &ParentRef, child: &EntityId) {
    match parent {
        ParentRef::Catalog => {
            if let EntityId::Location(id) = child {
                catalog.children_mut().retain(|existing| existing != id);
            }
        }
        ParentRef::Location(parent_id) => {
            if let Some(location) = catalog.locations_mut().get_mut(parent_id) {
                location.children_mut().retain(|existing| existing != child);
            }
        }
    }
}
