// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Open DAM: an in-memory catalog of locations, files and collections.
//!
//! The [`model`] holds the id-linked catalog tables, [`ops`] mutates them with validation,
//! [`query`] derives read-only views, [`store`] persists catalogs in a `.dam/` folder and
//! [`import`] mirrors directories from disk.

pub mod config;
pub mod import;
pub mod model;
pub mod ops;
pub mod query;
pub mod store;

pub use config::DamConfig;
pub use model::{Catalog, EntityId, FileKind, LocationId, Meta, ParentRef};
pub use ops::{apply_ops, CatalogError, Op};
