// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{CollectionId, LocationId};

/// A named grouping of locations. Members are references only; removing a collection never
/// touches the locations it lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    collection_id: CollectionId,
    name: String,
    locations: Vec<LocationId>,
}

impl Collection {
    pub fn new(collection_id: CollectionId, name: impl Into<String>) -> Self {
        Self {
            collection_id,
            name: name.into(),
            locations: Vec::new(),
        }
    }

    pub fn collection_id(&self) -> &CollectionId {
        &self.collection_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locations(&self) -> &[LocationId] {
        &self.locations
    }

    pub fn contains(&self, location_id: &LocationId) -> bool {
        self.locations.contains(location_id)
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns `false` when the location was already a member.
    pub(crate) fn insert(&mut self, location_id: LocationId) -> bool {
        if self.contains(&location_id) {
            return false;
        }
        self.locations.push(location_id);
        true
    }

    /// Returns `false` when the location was not a member.
    pub(crate) fn remove(&mut self, location_id: &LocationId) -> bool {
        let before = self.locations.len();
        self.locations.retain(|id| id != location_id);
        self.locations.len() != before
    }
}
