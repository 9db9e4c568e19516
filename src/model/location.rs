// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::entity_ref::{EntityId, ParentRef};
use super::ids::{FileId, LocationId};

/// A node of the hierarchical namespace, analogous to a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    location_id: LocationId,
    name: String,
    parent: ParentRef,
    children: Vec<EntityId>,
}

impl Location {
    pub fn new(location_id: LocationId, name: impl Into<String>, parent: ParentRef) -> Self {
        Self {
            location_id,
            name: name.into(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn location_id(&self) -> &LocationId {
        &self.location_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> &ParentRef {
        &self.parent
    }

    /// Sub-locations and files in insertion order.
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn sub_locations(&self) -> impl Iterator<Item = &LocationId> + '_ {
        self.children.iter().filter_map(EntityId::as_location)
    }

    pub fn files(&self) -> impl Iterator<Item = &FileId> + '_ {
        self.children.iter().filter_map(EntityId::as_file)
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_parent(&mut self, parent: ParentRef) {
        self.parent = parent;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<EntityId> {
        &mut self.children
    }
}
