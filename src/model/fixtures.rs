// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::catalog::Catalog;
use super::entity_ref::ParentRef;
use super::file::{FileKind, Meta};
use super::ids::{CollectionId, FileId, LocationId};

/// Ids of the entities created by [`sample_catalog`].
pub(crate) struct Sample {
    pub catalog: Catalog,
    pub root: LocationId,
    pub docs: LocationId,
    pub photos: LocationId,
    pub readme: FileId,
    pub beach: FileId,
    pub favorites: CollectionId,
}

/// `root/docs/readme.txt`, `root/photos/beach.jpg` and a `favorites` collection holding
/// `docs`.
pub(crate) fn sample_catalog() -> Sample {
    let mut catalog = Catalog::new(None);

    let root = catalog
        .create_location("root", ParentRef::Catalog)
        .expect("create root");
    let docs = catalog
        .create_location("docs", ParentRef::Location(root.clone()))
        .expect("create docs");
    let readme = catalog
        .create_file("readme.txt", &docs, FileKind::new(FileKind::TEXT), Meta::new())
        .expect("create readme");
    let photos = catalog
        .create_location("photos", ParentRef::Location(root.clone()))
        .expect("create photos");

    let mut meta = Meta::new();
    meta.insert("size".to_owned(), serde_json::json!(2048));
    let beach = catalog
        .create_file("beach.jpg", &photos, FileKind::new(FileKind::IMAGE), meta)
        .expect("create beach");

    let favorites = catalog.create_collection("favorites").expect("create favorites");
    catalog
        .add_location_to_collection(&favorites, &docs)
        .expect("add docs");

    Sample {
        catalog,
        root,
        docs,
        photos,
        readme,
        beach,
        favorites,
    }
}
