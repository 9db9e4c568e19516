// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::TempDir;

use super::{CatalogFolder, StoreError, WriteDurability, CATALOG_FORMAT_VERSION};
use crate::config::DamConfig;
use crate::model::fixtures::sample_catalog;
use crate::model::{Catalog, IntegrityError, Remote};

struct CatalogFolderTestCtx {
    tmp: TempDir,
    folder: CatalogFolder,
}

impl CatalogFolderTestCtx {
    fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let folder = CatalogFolder::new(tmp.path().join("my-catalog"));
        Self { tmp, folder }
    }

    fn write_snapshot(&self, value: serde_json::Value) {
        std::fs::create_dir_all(self.folder.dam_dir()).expect("create .dam");
        std::fs::write(
            self.folder.catalog_path(),
            serde_json::to_string_pretty(&value).expect("json"),
        )
        .expect("write snapshot");
    }
}

#[fixture]
fn ctx() -> CatalogFolderTestCtx {
    CatalogFolderTestCtx::new()
}

#[rstest]
fn save_then_load_returns_an_equal_catalog(ctx: CatalogFolderTestCtx) {
    let mut sample = sample_catalog();
    sample
        .catalog
        .set_remote(Some(Remote::new("ssh://nas/photos")));

    ctx.folder.save(&sample.catalog).expect("save");
    let loaded = ctx.folder.load().expect("load");

    assert_eq!(loaded, sample.catalog);
    assert_eq!(loaded.rev(), sample.catalog.rev());
    assert_eq!(loaded.next_id(), sample.catalog.next_id());
}

#[rstest]
fn snapshot_uses_tagged_children_and_type_field(ctx: CatalogFolderTestCtx) {
    let sample = sample_catalog();
    ctx.folder.save(&sample.catalog).expect("save");

    let raw = std::fs::read_to_string(ctx.folder.catalog_path()).expect("read");
    assert!(raw.ends_with('\n'));
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");

    assert_eq!(value["version"], json!(CATALOG_FORMAT_VERSION));
    assert_eq!(value["children"], json!([sample.root.as_str()]));
    assert_eq!(
        value["locations"][0]["children"],
        json!([
            { "location": sample.docs.as_str() },
            { "location": sample.photos.as_str() },
        ])
    );
    assert_eq!(value["locations"][0]["parent"], json!(null));
    assert_eq!(value["files"][0]["type"], json!("text"));
    assert_eq!(
        value["collections"][0]["locations"],
        json!([sample.docs.as_str()])
    );
}

#[rstest]
fn init_creates_an_empty_catalog_once(ctx: CatalogFolderTestCtx) {
    assert!(!ctx.folder.is_initialized());

    let catalog = ctx
        .folder
        .init(Some(Remote::new("s3://bucket")))
        .expect("init");
    assert!(ctx.folder.is_initialized());
    assert_eq!(catalog.remote().map(Remote::as_str), Some("s3://bucket"));

    let err = ctx.folder.init(None).expect_err("second init");
    assert!(matches!(err, StoreError::AlreadyInitialized { .. }));

    let loaded = ctx.folder.load_or_init().expect("load_or_init");
    assert_eq!(loaded, catalog);
}

#[rstest]
fn load_or_init_initializes_a_fresh_folder(ctx: CatalogFolderTestCtx) {
    let catalog = ctx.folder.load_or_init().expect("load_or_init");
    assert_eq!(catalog, Catalog::default());
    assert!(ctx.folder.is_initialized());
}

#[rstest]
fn load_without_snapshot_is_an_io_error(ctx: CatalogFolderTestCtx) {
    let err = ctx.folder.load().expect_err("missing snapshot");
    assert!(matches!(err, StoreError::Io { .. }));
}

#[rstest]
fn load_rejects_unsupported_version(ctx: CatalogFolderTestCtx) {
    ctx.write_snapshot(json!({ "version": 99 }));
    let err = ctx.folder.load().expect_err("version");
    assert!(matches!(err, StoreError::UnsupportedVersion { version: 99, .. }));
}

#[rstest]
fn load_rejects_malformed_json(ctx: CatalogFolderTestCtx) {
    std::fs::create_dir_all(ctx.folder.dam_dir()).expect("create .dam");
    std::fs::write(ctx.folder.catalog_path(), "{ not json").expect("write");
    let err = ctx.folder.load().expect_err("malformed");
    assert!(matches!(err, StoreError::Json { .. }));
}

#[rstest]
fn load_rejects_invalid_ids(ctx: CatalogFolderTestCtx) {
    ctx.write_snapshot(json!({
        "version": 1,
        "children": ["a/b"],
    }));
    let err = ctx.folder.load().expect_err("invalid id");
    assert!(matches!(
        err,
        StoreError::InvalidId {
            field: "children[]",
            ..
        }
    ));
}

#[rstest]
fn load_rejects_file_with_missing_parent(ctx: CatalogFolderTestCtx) {
    ctx.write_snapshot(json!({
        "version": 1,
        "files": [
            { "file_id": "file:1", "name": "x.txt", "parent": "loc:9", "type": "text" }
        ],
    }));
    let err = ctx.folder.load().expect_err("dangling parent");
    assert!(matches!(err, StoreError::Integrity { .. }));
}

#[rstest]
fn load_rejects_parent_cycles(ctx: CatalogFolderTestCtx) {
    ctx.write_snapshot(json!({
        "version": 1,
        "locations": [
            { "location_id": "loc:1", "name": "a", "parent": "loc:2",
              "children": [{ "location": "loc:2" }] },
            { "location_id": "loc:2", "name": "b", "parent": "loc:1",
              "children": [{ "location": "loc:1" }] }
        ],
    }));
    let err = ctx.folder.load().expect_err("cycle");
    assert!(matches!(
        err,
        StoreError::Integrity {
            source: IntegrityError::Unreachable { .. },
            ..
        }
    ));
}

#[rstest]
fn load_rejects_duplicate_collection_members(ctx: CatalogFolderTestCtx) {
    ctx.write_snapshot(json!({
        "version": 1,
        "children": ["loc:1"],
        "locations": [{ "location_id": "loc:1", "name": "root" }],
        "collections": [
            { "collection_id": "col:2", "name": "fav", "locations": ["loc:1", "loc:1"] }
        ],
    }));
    let err = ctx.folder.load().expect_err("duplicate member");
    assert!(matches!(
        err,
        StoreError::Integrity {
            source: IntegrityError::DuplicateMember { .. },
            ..
        }
    ));
}

#[rstest]
fn load_rejects_duplicate_ids(ctx: CatalogFolderTestCtx) {
    ctx.write_snapshot(json!({
        "version": 1,
        "children": ["loc:1"],
        "locations": [
            { "location_id": "loc:1", "name": "root" },
            { "location_id": "loc:1", "name": "again" }
        ],
    }));
    let err = ctx.folder.load().expect_err("duplicate id");
    assert!(matches!(err, StoreError::DuplicateId { .. }));
}

#[rstest]
fn load_rejects_ids_shared_across_kinds(ctx: CatalogFolderTestCtx) {
    ctx.write_snapshot(json!({
        "version": 1,
        "children": ["loc:1"],
        "locations": [
            { "location_id": "loc:1", "name": "root", "children": [{ "file": "loc:1" }] }
        ],
        "files": [
            { "file_id": "loc:1", "name": "shadow.txt", "parent": "loc:1", "type": "text" }
        ],
    }));
    let err = ctx.folder.load().expect_err("shared id");
    assert!(matches!(
        err,
        StoreError::DuplicateId {
            field: "files[].file_id",
            ..
        }
    ));
}

#[rstest]
fn failed_temp_write_leaves_no_temp_file(ctx: CatalogFolderTestCtx) {
    std::fs::create_dir_all(ctx.folder.dam_dir()).expect("create .dam");
    let tmp_path = ctx.folder.dam_dir().join(".opendam.tmp.catalog.json.1");
    std::fs::write(&tmp_path, "partial").expect("write temp");

    let err = super::discard_tmp_on_error(
        &tmp_path,
        Err(std::io::Error::new(std::io::ErrorKind::Other, "fsync failed")),
    )
    .expect_err("write error");

    assert!(matches!(err, StoreError::Io { ref path, .. } if path == &tmp_path));
    assert!(!tmp_path.exists());
    assert!(super::discard_tmp_on_error(&tmp_path, Ok(())).is_ok());
}

#[rstest]
#[case(WriteDurability::BestEffort)]
#[case(WriteDurability::Durable)]
fn save_overwrites_atomically(ctx: CatalogFolderTestCtx, #[case] durability: WriteDurability) {
    let folder = ctx.folder.clone().with_durability(durability);
    let mut sample = sample_catalog();

    folder.save(&sample.catalog).expect("first save");
    sample
        .catalog
        .create_location("archive", crate::model::ParentRef::Catalog)
        .expect("archive");
    folder.save(&sample.catalog).expect("second save");

    assert_eq!(folder.load().expect("load"), sample.catalog);

    let leftovers = std::fs::read_dir(folder.dam_dir())
        .expect("read_dir")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(".opendam.tmp."))
        .count();
    assert_eq!(leftovers, 0);
}

#[cfg(unix)]
#[rstest]
fn save_refuses_symlinked_snapshot(ctx: CatalogFolderTestCtx) {
    let outside = ctx.tmp.path().join("outside.json");
    std::fs::write(&outside, "{}").expect("write outside");
    std::fs::create_dir_all(ctx.folder.dam_dir()).expect("create .dam");
    std::os::unix::fs::symlink(&outside, ctx.folder.catalog_path()).expect("symlink");

    let err = ctx
        .folder
        .save(&Catalog::default())
        .expect_err("symlink refused");
    assert!(matches!(err, StoreError::SymlinkRefused { .. }));
    assert_eq!(std::fs::read_to_string(&outside).expect("read"), "{}");
}

#[cfg(unix)]
#[rstest]
fn save_refuses_symlinked_dam_dir(ctx: CatalogFolderTestCtx) {
    let outside = ctx.tmp.path().join("elsewhere");
    std::fs::create_dir_all(&outside).expect("create outside");
    std::fs::create_dir_all(ctx.folder.root()).expect("create root");
    std::os::unix::fs::symlink(&outside, ctx.folder.dam_dir()).expect("symlink");

    let err = ctx
        .folder
        .save(&Catalog::default())
        .expect_err("symlink refused");
    assert!(matches!(err, StoreError::SymlinkRefused { .. }));
}

#[rstest]
fn config_defaults_when_missing_and_round_trips(ctx: CatalogFolderTestCtx) {
    assert_eq!(ctx.folder.load_config().expect("default"), DamConfig::default());

    let mut config = DamConfig::default();
    config.durability = WriteDurability::Durable;
    config.import.include_hidden = true;
    config.import.max_depth = Some(3);
    ctx.folder.save_config(&config).expect("save config");

    assert_eq!(ctx.folder.load_config().expect("load config"), config);

    let folder = CatalogFolder::from_config(ctx.folder.root(), &config);
    assert_eq!(folder.durability(), WriteDurability::Durable);
}

#[rstest]
fn config_rejects_unknown_fields(ctx: CatalogFolderTestCtx) {
    std::fs::create_dir_all(ctx.folder.dam_dir()).expect("create .dam");
    std::fs::write(ctx.folder.config_path(), r#"{ "durablity": "durable" }"#).expect("write");

    let err = ctx.folder.load_config().expect_err("unknown field");
    assert!(matches!(err, StoreError::Json { .. }));
}
