// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::DamConfig;
use crate::model::{
    Catalog, Collection, CollectionId, EntityId, File, FileId, FileKind, Id, IdError,
    IntegrityError, Location, LocationId, Meta, ParentRef, Remote,
};

const DAM_DIRNAME: &str = ".dam";
const CATALOG_FILENAME: &str = "catalog.json";
const CONFIG_FILENAME: &str = "config.json";

/// Snapshot format written by [`CatalogFolder::save`].
pub const CATALOG_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("json error at {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("corrupt catalog at {path:?}: {source}")]
    Integrity {
        path: PathBuf,
        source: IntegrityError,
    },
    #[error("invalid id for {field} ({value:?}): {source}")]
    InvalidId {
        field: &'static str,
        value: String,
        source: IdError,
    },
    #[error("duplicate {field} {value:?}")]
    DuplicateId { field: &'static str, value: String },
    #[error("catalog already initialized at {path:?}")]
    AlreadyInitialized { path: PathBuf },
    #[error("refusing to write through symlink at {path:?}")]
    SymlinkRefused { path: PathBuf },
    #[error("unsupported catalog format version {version} at {path:?}")]
    UnsupportedVersion { path: PathBuf, version: u32 },
}

/// A catalog home directory. All state lives below `<root>/.dam/`.
#[derive(Debug, Clone)]
pub struct CatalogFolder {
    root: PathBuf,
    durability: WriteDurability,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

impl CatalogFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    /// A folder whose write behavior follows `config`.
    pub fn from_config(root: impl Into<PathBuf>, config: &DamConfig) -> Self {
        Self::new(root).with_durability(config.durability)
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dam_dir(&self) -> PathBuf {
        self.root.join(DAM_DIRNAME)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dam_dir().join(CATALOG_FILENAME)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dam_dir().join(CONFIG_FILENAME)
    }

    pub fn is_initialized(&self) -> bool {
        self.catalog_path().is_file()
    }

    /// Writes an empty catalog snapshot. Fails if one already exists.
    pub fn init(&self, remote: Option<Remote>) -> Result<Catalog, StoreError> {
        if self.is_initialized() {
            return Err(StoreError::AlreadyInitialized {
                path: self.catalog_path(),
            });
        }

        let catalog = Catalog::new(remote);
        self.save(&catalog)?;
        info!(path = %self.root.display(), "initialized catalog folder");
        Ok(catalog)
    }

    pub fn load_or_init(&self) -> Result<Catalog, StoreError> {
        if self.is_initialized() {
            self.load()
        } else {
            self.init(None)
        }
    }

    pub fn load(&self) -> Result<Catalog, StoreError> {
        let catalog_path = self.catalog_path();
        let catalog_str = fs::read_to_string(&catalog_path).map_err(|source| StoreError::Io {
            path: catalog_path.clone(),
            source,
        })?;

        let catalog_json: CatalogJson =
            serde_json::from_str(&catalog_str).map_err(|source| StoreError::Json {
                path: catalog_path.clone(),
                source,
            })?;

        let catalog = catalog_from_json(&catalog_path, catalog_json)?;
        info!(
            path = %catalog_path.display(),
            rev = catalog.rev(),
            locations = catalog.locations().len(),
            files = catalog.files().len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    pub fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let catalog_path = self.catalog_path();
        let catalog_json = catalog_to_json(catalog);
        let catalog_str =
            serde_json::to_string_pretty(&catalog_json).map_err(|source| StoreError::Json {
                path: catalog_path.clone(),
                source,
            })?;

        self.write_in_dam_dir(&catalog_path, format!("{catalog_str}\n").as_bytes())?;
        info!(path = %catalog_path.display(), rev = catalog.rev(), "saved catalog");
        Ok(())
    }

    /// Reads `.dam/config.json`; a missing file yields the default config.
    pub fn load_config(&self) -> Result<DamConfig, StoreError> {
        let config_path = self.config_path();
        let config_str = match fs::read_to_string(&config_path) {
            Ok(config_str) => config_str,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Ok(DamConfig::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: config_path,
                    source,
                })
            }
        };

        serde_json::from_str(&config_str).map_err(|source| StoreError::Json {
            path: config_path,
            source,
        })
    }

    pub fn save_config(&self, config: &DamConfig) -> Result<(), StoreError> {
        let config_path = self.config_path();
        let config_str =
            serde_json::to_string_pretty(config).map_err(|source| StoreError::Json {
                path: config_path.clone(),
                source,
            })?;

        self.write_in_dam_dir(&config_path, format!("{config_str}\n").as_bytes())
    }

    fn write_in_dam_dir(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
        let dam_dir = self.dam_dir();
        ensure_dam_dir(&self.root, &dam_dir)?;
        write_atomic(&dam_dir, path, contents, self.durability)
    }
}

// Extracted snapshot conversion and safe filesystem writes for `CatalogFolder`.
include!("catalog_folder/helpers.rs");

#[cfg(test)]
mod tests;
