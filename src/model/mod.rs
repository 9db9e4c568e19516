// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A catalog owns a tree of locations (directory-like nodes holding files) and a flat set of
//! collections that reference locations without owning them.

pub mod catalog;
pub mod collection;
pub mod entity_ref;
pub mod file;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod location;

pub use catalog::{validate_name, Catalog, IntegrityError, NameError, Remote};
pub use collection::Collection;
pub use entity_ref::{EntityId, EntityKind, EntityRef, ParentRef, ParseEntityRefError};
pub use file::{File, FileKind, Meta};
pub use ids::{CollectionId, FileId, Id, IdError, LocationId};
pub use location::Location;
