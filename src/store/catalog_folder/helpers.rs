// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Catalog folder persistence helpers: snapshot json conversion and safe filesystem writes.

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogJson {
    version: u32,
    #[serde(default)]
    rev: u64,
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    remote: Option<String>,
    #[serde(default)]
    children: Vec<String>,
    #[serde(default)]
    locations: Vec<LocationJson>,
    #[serde(default)]
    files: Vec<FileJson>,
    #[serde(default)]
    collections: Vec<CollectionJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocationJson {
    location_id: String,
    name: String,
    /// `None` for top-level locations.
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    children: Vec<ChildJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ChildJson {
    Location(String),
    File(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileJson {
    file_id: String,
    name: String,
    parent: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    meta: Meta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CollectionJson {
    collection_id: String,
    name: String,
    #[serde(default)]
    locations: Vec<String>,
}

fn catalog_to_json(catalog: &Catalog) -> CatalogJson {
    CatalogJson {
        version: CATALOG_FORMAT_VERSION,
        rev: catalog.rev(),
        next_id: catalog.next_id(),
        remote: catalog.remote().map(|remote| remote.as_str().to_owned()),
        children: catalog.children().iter().map(ToString::to_string).collect(),
        locations: catalog
            .locations()
            .values()
            .map(|location| LocationJson {
                location_id: location.location_id().to_string(),
                name: location.name().to_owned(),
                parent: location.parent().as_location().map(ToString::to_string),
                children: location
                    .children()
                    .iter()
                    .map(|child| match child {
                        EntityId::Location(id) => ChildJson::Location(id.to_string()),
                        EntityId::File(id) => ChildJson::File(id.to_string()),
                    })
                    .collect(),
            })
            .collect(),
        files: catalog
            .files()
            .values()
            .map(|file| FileJson {
                file_id: file.file_id().to_string(),
                name: file.name().to_owned(),
                parent: file.parent().to_string(),
                kind: file.kind().as_str().to_owned(),
                meta: file.meta().clone(),
            })
            .collect(),
        collections: catalog
            .collections()
            .values()
            .map(|collection| CollectionJson {
                collection_id: collection.collection_id().to_string(),
                name: collection.name().to_owned(),
                locations: collection
                    .locations()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            })
            .collect(),
    }
}

fn parse_id<T>(field: &'static str, value: String) -> Result<Id<T>, StoreError> {
    Id::new(&value).map_err(|source| StoreError::InvalidId {
        field,
        value,
        source,
    })
}

fn catalog_from_json(path: &Path, catalog_json: CatalogJson) -> Result<Catalog, StoreError> {
    if catalog_json.version != CATALOG_FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            version: catalog_json.version,
        });
    }

    let children = catalog_json
        .children
        .into_iter()
        .map(|id| parse_id("children[]", id))
        .collect::<Result<Vec<LocationId>, _>>()?;

    let mut locations = BTreeMap::<LocationId, Location>::new();
    for location_json in catalog_json.locations {
        let location_id: LocationId =
            parse_id("locations[].location_id", location_json.location_id)?;
        let parent = match location_json.parent {
            Some(parent) => ParentRef::Location(parse_id("locations[].parent", parent)?),
            None => ParentRef::Catalog,
        };

        let mut location = Location::new(location_id.clone(), location_json.name, parent);
        for child_json in location_json.children {
            let child = match child_json {
                ChildJson::Location(id) => {
                    EntityId::Location(parse_id("locations[].children[].location", id)?)
                }
                ChildJson::File(id) => EntityId::File(parse_id("locations[].children[].file", id)?),
            };
            location.children_mut().push(child);
        }

        if locations.contains_key(&location_id) {
            return Err(StoreError::DuplicateId {
                field: "locations[].location_id",
                value: location_id.into_string(),
            });
        }
        locations.insert(location_id, location);
    }

    let mut files = BTreeMap::<FileId, File>::new();
    for file_json in catalog_json.files {
        let file_id: FileId = parse_id("files[].file_id", file_json.file_id)?;
        let parent = parse_id("files[].parent", file_json.parent)?;
        let file = File::new(
            file_id.clone(),
            file_json.name,
            parent,
            FileKind::new(file_json.kind),
            file_json.meta,
        );

        if files.contains_key(&file_id) || locations.contains_key(file_id.as_str()) {
            return Err(StoreError::DuplicateId {
                field: "files[].file_id",
                value: file_id.into_string(),
            });
        }
        files.insert(file_id, file);
    }

    let mut collections = BTreeMap::<CollectionId, Collection>::new();
    for collection_json in catalog_json.collections {
        let collection_id: CollectionId =
            parse_id("collections[].collection_id", collection_json.collection_id)?;
        let mut collection = Collection::new(collection_id.clone(), collection_json.name);
        for location_id in collection_json.locations {
            let location_id: LocationId = parse_id("collections[].locations[]", location_id)?;
            if !collection.insert(location_id.clone()) {
                return Err(StoreError::Integrity {
                    path: path.to_path_buf(),
                    source: IntegrityError::DuplicateMember {
                        collection: collection_id,
                        location: location_id,
                    },
                });
            }
        }

        let raw = collection_id.as_str();
        if collections.contains_key(raw)
            || locations.contains_key(raw)
            || files.contains_key(raw)
        {
            return Err(StoreError::DuplicateId {
                field: "collections[].collection_id",
                value: collection_id.into_string(),
            });
        }
        collections.insert(collection_id, collection);
    }

    let catalog = Catalog::from_parts(
        catalog_json.remote.map(Remote::new),
        children,
        locations,
        files,
        collections,
        catalog_json.rev,
        catalog_json.next_id,
    );

    catalog
        .check_integrity()
        .map_err(|source| StoreError::Integrity {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(catalog)
}

fn ensure_dam_dir(root: &Path, dam_dir: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(|source| StoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    match fs::symlink_metadata(dam_dir) {
        Ok(md) => {
            if md.file_type().is_symlink() {
                return Err(StoreError::SymlinkRefused {
                    path: dam_dir.to_path_buf(),
                });
            }
            if !md.is_dir() {
                return Err(StoreError::Io {
                    path: dam_dir.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::AlreadyExists, "expected directory"),
                });
            }
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir(dam_dir).map_err(|source| StoreError::Io {
                path: dam_dir.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(StoreError::Io {
            path: dam_dir.to_path_buf(),
            source,
        }),
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn discard_tmp_on_error(tmp_path: &Path, written: io::Result<()>) -> Result<(), StoreError> {
    written.map_err(|source| {
        let _ = fs::remove_file(tmp_path);
        StoreError::Io {
            path: tmp_path.to_path_buf(),
            source,
        }
    })
}

/// Writes `contents` to `path` (a file directly inside `dir`) via a temp file and rename.
fn write_atomic(
    dir: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = dir.join(format!(
        ".opendam.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    let written = file.write_all(contents).and_then(|()| match durability {
        WriteDurability::Durable => file.sync_all(),
        WriteDurability::BestEffort => Ok(()),
    });
    drop(file);
    discard_tmp_on_error(&tmp_path, written)?;

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir_handle = fs::File::open(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            dir_handle.sync_all().map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}
