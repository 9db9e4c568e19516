// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mirrors a directory tree from disk into a catalog.
//!
//! Directories become locations and regular files become files, created through the regular
//! mutation operations so the catalog invariants hold for imported data too. Importing the
//! same directory again reuses what is already there: entries are matched by name under the
//! same parent, missing ones are created and existing files get their metadata refreshed.

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use exif::{In, Tag};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::model::{validate_name, Catalog, EntityId, FileId, FileKind, LocationId, Meta, ParentRef};
use crate::ops::CatalogError;

/// EXIF fields copied into `meta["exif"]` for image files, keyed by tag name.
const EXIF_TAGS: [Tag; 11] = [
    Tag::Make,
    Tag::Model,
    Tag::LensModel,
    Tag::DateTimeOriginal,
    Tag::ExposureTime,
    Tag::FNumber,
    Tag::PhotographicSensitivity,
    Tag::FocalLength,
    Tag::Orientation,
    Tag::PixelXDimension,
    Tag::PixelYDimension,
];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportOptions {
    /// Import entries whose name starts with `.`.
    pub include_hidden: bool,
    pub follow_links: bool,
    /// Depth limit below the imported directory (`1` imports direct children only).
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Location mirroring the imported directory itself.
    pub root: LocationId,
    /// Directories mirrored, the imported directory included.
    pub locations: usize,
    /// Regular files mirrored.
    pub files: usize,
    /// Locations and files that did not exist before this import.
    pub added: usize,
    /// Existing files whose metadata changed on disk.
    pub refreshed: usize,
    pub skipped: usize,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{path:?} is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("io error at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Imports `dir` as a location under `parent`, or rescans it when `parent` already has a
/// location with the directory's name.
///
/// The catalog is only modified when the import succeeds as a whole. Unreadable entries and
/// entries with unusable names are skipped and counted in [`ImportReport::skipped`]. Entries
/// that disappeared from disk stay in the catalog.
pub fn import_dir(
    catalog: &mut Catalog,
    parent: ParentRef,
    dir: impl AsRef<Path>,
    options: &ImportOptions,
) -> Result<ImportReport, ImportError> {
    let dir = dir.as_ref();
    let root_path = fs::canonicalize(dir).map_err(|source| ImportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    if !root_path.is_dir() {
        return Err(ImportError::NotADirectory { path: root_path });
    }

    let root_name = root_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root_path.to_string_lossy().replace('/', "_"));

    let mut working = catalog.clone();
    let mut added = 0;
    let root = match child_location(&working, &parent, &root_name) {
        Some(existing) => existing,
        None => {
            added += 1;
            working.create_location(&root_name, parent)?
        }
    };
    let mut report = ImportReport {
        root: root.clone(),
        locations: 1,
        files: 0,
        added,
        refreshed: 0,
        skipped: 0,
    };

    let mut dirs = HashMap::<PathBuf, LocationId>::new();
    dirs.insert(root_path.clone(), root);

    let mut walker = WalkDir::new(&root_path)
        .follow_links(options.follow_links)
        .sort_by_file_name();
    if let Some(max_depth) = options.max_depth {
        walker = walker.max_depth(max_depth);
    }

    let entries = walker
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || options.include_hidden || !is_hidden(entry));

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                report.skipped += 1;
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }

        let path = entry.path();
        let Some(parent_id) = path.parent().and_then(|parent| dirs.get(parent)).cloned() else {
            // The containing directory was skipped.
            report.skipped += 1;
            continue;
        };

        let name = entry.file_name().to_string_lossy();
        if let Err(reason) = validate_name(&name) {
            warn!(path = %path.display(), %reason, "skipping entry with unusable name");
            report.skipped += 1;
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_dir() {
            let parent_ref = ParentRef::Location(parent_id);
            let location_id = match child_location(&working, &parent_ref, &name) {
                Some(existing) => existing,
                None => {
                    report.added += 1;
                    working.create_location(&name, parent_ref)?
                }
            };
            dirs.insert(path.to_path_buf(), location_id);
            report.locations += 1;
        } else if file_type.is_file() {
            let kind = path
                .extension()
                .map(|ext| FileKind::from_extension(&ext.to_string_lossy()))
                .unwrap_or_default();
            let meta = match file_meta(&entry, &kind) {
                Ok(meta) => meta,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable file");
                    report.skipped += 1;
                    continue;
                }
            };

            match child_file(&working, &parent_id, &name) {
                Some(file_id) => {
                    if refresh_file_meta(&mut working, &file_id, meta)? {
                        report.refreshed += 1;
                    }
                }
                None => {
                    working.create_file(&name, &parent_id, kind, meta)?;
                    report.added += 1;
                }
            }
            report.files += 1;
        } else {
            debug!(path = %path.display(), "skipping special file");
            report.skipped += 1;
        }
    }

    *catalog = working;
    info!(
        dir = %root_path.display(),
        locations = report.locations,
        files = report.files,
        added = report.added,
        refreshed = report.refreshed,
        skipped = report.skipped,
        "imported directory"
    );
    Ok(report)
}

/// First location named `name` directly under `parent`.
fn child_location(catalog: &Catalog, parent: &ParentRef, name: &str) -> Option<LocationId> {
    catalog
        .children_of(parent)?
        .into_iter()
        .find_map(|child| match child {
            EntityId::Location(id) => catalog
                .location(&id)
                .filter(|location| location.name() == name)
                .map(|_| id),
            EntityId::File(_) => None,
        })
}

/// First file named `name` directly under `parent`.
fn child_file(catalog: &Catalog, parent: &LocationId, name: &str) -> Option<FileId> {
    let location = catalog.location(parent)?;
    location
        .files()
        .find(|file_id| {
            catalog
                .file(file_id)
                .map_or(false, |file| file.name() == name)
        })
        .cloned()
}

/// Merges freshly read keys over the stored meta. Keys set by other means are kept.
fn refresh_file_meta(
    catalog: &mut Catalog,
    file_id: &FileId,
    fresh: Meta,
) -> Result<bool, CatalogError> {
    let Some(file) = catalog.file(file_id) else {
        return Ok(false);
    };
    let mut merged = file.meta().clone();
    merged.extend(fresh);
    if &merged == file.meta() {
        return Ok(false);
    }
    catalog.set_file_meta(file_id, merged)?;
    Ok(true)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map_or(false, |name| name.starts_with('.'))
}

fn file_meta(entry: &DirEntry, kind: &FileKind) -> Result<Meta, walkdir::Error> {
    let metadata = entry.metadata()?;

    let mut meta = Meta::new();
    meta.insert(
        "path".to_owned(),
        Value::String(entry.path().to_string_lossy().into_owned()),
    );
    meta.insert("size".to_owned(), Value::from(metadata.len()));
    if let Ok(modified) = metadata.modified() {
        meta.insert("modified".to_owned(), Value::String(rfc3339(modified)));
    }
    if let Ok(created) = metadata.created() {
        meta.insert("created".to_owned(), Value::String(rfc3339(created)));
    }
    if kind.as_str() == FileKind::IMAGE {
        if let Some(fields) = exif_fields(entry.path()) {
            meta.insert("exif".to_owned(), Value::Object(fields));
        }
    }
    Ok(meta)
}

fn exif_fields(path: &Path) -> Option<Map<String, Value>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "cannot open file for exif");
            return None;
        }
    };
    let exif = match exif::Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(exif) => exif,
        Err(
            exif::Error::NotFound(_) | exif::Error::NotSupported(_) | exif::Error::BlankValue(_),
        ) => return None,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "unreadable exif");
            return None;
        }
    };

    let fields = EXIF_TAGS
        .iter()
        .filter_map(|tag| {
            let field = exif.get_field(*tag, In::PRIMARY)?;
            let value = field.display_value().to_string().replace(['\\', '"'], "");
            Some((tag.to_string(), Value::String(value)))
        })
        .collect::<Map<_, _>>();
    (!fields.is_empty()).then_some(fields)
}

fn rfc3339(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339()
}
