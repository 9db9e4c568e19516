// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;

use opendam::import::{import_dir, ImportOptions};
use opendam::model::{Catalog, EntityId, FileKind, LocationId, Meta, ParentRef};
use opendam::ops::CatalogError;
use opendam::query::{collections_containing, find_by_name, path_of, resolve_path};
use opendam::store::CatalogFolder;

#[test]
fn nested_locations_and_files_keep_insertion_order() {
    let mut catalog = Catalog::new(None);
    let root = catalog
        .create_location("root", ParentRef::Catalog)
        .expect("root");
    let docs = catalog
        .create_location("docs", ParentRef::Location(root.clone()))
        .expect("docs");
    let readme = catalog
        .create_file("readme.txt", &docs, FileKind::new("text"), Meta::new())
        .expect("readme");

    assert_eq!(catalog.children(), &[root.clone()]);
    assert_eq!(
        catalog.location(&root).expect("root").children(),
        &[EntityId::Location(docs.clone())]
    );
    assert_eq!(
        catalog.location(&docs).expect("docs").children(),
        &[EntityId::File(readme)]
    );
    catalog.check_integrity().expect("integrity");
}

#[test]
fn adding_a_location_twice_keeps_one_membership() {
    let mut catalog = Catalog::new(None);
    let docs = catalog
        .create_location("docs", ParentRef::Catalog)
        .expect("docs");
    let favorites = catalog.create_collection("favorites").expect("favorites");

    assert!(catalog
        .add_location_to_collection(&favorites, &docs)
        .expect("first add"));
    assert!(!catalog
        .add_location_to_collection(&favorites, &docs)
        .expect("second add"));

    let collection = catalog.collection(&favorites).expect("favorites");
    assert_eq!(collection.locations(), &[docs]);
}

#[test]
fn file_under_unknown_location_is_an_invalid_parent() {
    let mut catalog = Catalog::new(None);
    let unknown = LocationId::new("loc:missing").expect("id");

    let err = catalog
        .create_file("x", &unknown, FileKind::default(), Meta::new())
        .expect_err("unknown parent");

    assert_eq!(
        err,
        CatalogError::InvalidParent {
            parent: ParentRef::Location(unknown)
        }
    );
    assert!(catalog.files().is_empty());
    assert_eq!(catalog.rev(), 0);
}

#[test]
fn removing_a_location_detaches_it_everywhere() {
    let mut catalog = Catalog::new(None);
    let root = catalog
        .create_location("root", ParentRef::Catalog)
        .expect("root");
    let docs = catalog
        .create_location("docs", ParentRef::Location(root.clone()))
        .expect("docs");
    catalog
        .create_file("readme.txt", &docs, FileKind::new("text"), Meta::new())
        .expect("readme");
    let favorites = catalog.create_collection("favorites").expect("favorites");
    catalog
        .add_location_to_collection(&favorites, &docs)
        .expect("add docs");

    catalog
        .remove_entity(&EntityId::Location(root))
        .expect("remove root");

    assert!(catalog.children().is_empty());
    assert!(catalog.locations().is_empty());
    assert!(catalog.files().is_empty());
    assert!(catalog
        .collection(&favorites)
        .expect("favorites")
        .locations()
        .is_empty());
    catalog.check_integrity().expect("integrity");
}

#[test]
fn imported_catalog_survives_a_save_load_cycle() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let media = tmp.path().join("media");
    fs::create_dir_all(media.join("2024").join("summer")).expect("dirs");
    fs::write(media.join("2024").join("summer").join("beach.JPG"), [0u8; 8]).expect("beach");
    fs::write(media.join("notes.md"), "# notes\n").expect("notes");

    let home = tmp.path().join("catalog-home");
    let folder = CatalogFolder::new(&home);
    let mut catalog = folder.load_or_init().expect("init");

    let report = import_dir(
        &mut catalog,
        ParentRef::Catalog,
        &media,
        &ImportOptions::default(),
    )
    .expect("import");
    assert_eq!(report.files, 2);

    let summer = resolve_path(&catalog, "media/2024/summer").expect("summer");
    let summer_id = summer.as_location().cloned().expect("location");
    let album = catalog.create_collection("album").expect("album");
    catalog
        .add_location_to_collection(&album, &summer_id)
        .expect("add summer");

    folder.save(&catalog).expect("save");
    let loaded = folder.load().expect("load");
    assert_eq!(loaded, catalog);

    let beach = find_by_name(&loaded, "beach");
    assert_eq!(beach.len(), 1);
    assert_eq!(
        path_of(&loaded, &beach[0]).as_deref(),
        Some("media/2024/summer/beach.JPG")
    );
    let file = loaded
        .file(beach[0].as_file().expect("file id"))
        .expect("beach file");
    assert_eq!(file.kind(), &FileKind::new(FileKind::IMAGE));
    assert_eq!(collections_containing(&loaded, &summer_id).len(), 1);
}
