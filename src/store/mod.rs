// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for catalogs on disk.
//!
//! The store module reads/writes the catalog folder format: a `.dam/` directory holding the
//! catalog snapshot and an optional config file.

pub mod catalog_folder;

pub use catalog_folder::{CatalogFolder, StoreError, WriteDurability};
