// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use smol_str::SmolStr;

use super::ids::{FileId, LocationId};

/// Opaque metadata attached to a file.
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// Free-form type discriminator of a file (the catalog `type` field).
///
/// The importer assigns one of the well-known categories below; any other string is kept
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileKind(SmolStr);

impl FileKind {
    pub const IMAGE: &'static str = "image";
    pub const VIDEO: &'static str = "video";
    pub const AUDIO: &'static str = "audio";
    pub const TEXT: &'static str = "text";
    pub const DOCUMENT: &'static str = "document";
    pub const ARCHIVE: &'static str = "archive";
    pub const OTHER: &'static str = "other";

    pub fn new(kind: impl AsRef<str>) -> Self {
        Self(SmolStr::new(kind.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Categorizes a file by its extension (case-insensitive, without the dot).
    pub fn from_extension(extension: &str) -> Self {
        let extension = extension.to_ascii_lowercase();
        let kind = match extension.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tif" | "tiff" | "webp" | "heic" | "heif"
            | "raw" | "cr2" | "nef" | "arw" | "dng" | "svg" => Self::IMAGE,
            "mp4" | "mov" | "avi" | "mkv" | "webm" | "m4v" | "mts" => Self::VIDEO,
            "mp3" | "wav" | "flac" | "aac" | "ogg" | "m4a" | "aiff" => Self::AUDIO,
            "txt" | "md" | "markdown" | "csv" | "json" | "toml" | "yaml" | "yml" | "xml"
            | "log" => Self::TEXT,
            "pdf" | "doc" | "docx" | "odt" | "rtf" | "xls" | "xlsx" | "ods" | "ppt" | "pptx"
            | "key" | "pages" => Self::DOCUMENT,
            "zip" | "tar" | "gz" | "tgz" | "bz2" | "xz" | "7z" | "rar" => Self::ARCHIVE,
            _ => Self::OTHER,
        };
        Self::new(kind)
    }
}

impl Default for FileKind {
    fn default() -> Self {
        Self::new(Self::OTHER)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FileKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

/// A leaf asset inside a location.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    file_id: FileId,
    name: String,
    parent: LocationId,
    kind: FileKind,
    meta: Meta,
}

impl File {
    pub fn new(
        file_id: FileId,
        name: impl Into<String>,
        parent: LocationId,
        kind: FileKind,
        meta: Meta,
    ) -> Self {
        Self {
            file_id,
            name: name.into(),
            parent,
            kind,
            meta,
        }
    }

    pub fn file_id(&self) -> &FileId {
        &self.file_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> &LocationId {
        &self.parent
    }

    pub fn kind(&self) -> &FileKind {
        &self.kind
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_parent(&mut self, parent: LocationId) {
        self.parent = parent;
    }

    pub(crate) fn set_kind(&mut self, kind: FileKind) {
        self.kind = kind;
    }

    pub(crate) fn set_meta(&mut self, meta: Meta) {
        self.meta = meta;
    }
}
