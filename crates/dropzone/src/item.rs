//! Item descriptors observed on a drop target.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::preview::PreviewRef;

/// Whether a descriptor names a file or a directory entry still awaiting expansion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    #[default]
    File,
    /// Never filtered directly; the walker replaces it with the files it contains.
    DirectoryEntry,
}

/// Where an item's bytes can be read from. Only used for preview creation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ItemSource {
    #[default]
    Unavailable,
    /// Backed by a file on the local file system
    Path(PathBuf),
    /// Bytes already held in memory by the host
    Memory(Arc<[u8]>),
}

/// Metadata for one dragged, dropped, or picked item.
///
/// Serialized with the browser-style field names (`name`, `size`, `type`) so hosts can
/// exchange descriptors with a web frontend unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemDescriptor {
    pub name: String,
    pub size: u64,
    /// Declared MIME type as reported by the host. May be empty or a placeholder.
    #[serde(rename = "type", alias = "mimeType", default)]
    pub mime_type: String,
    #[serde(default)]
    pub kind: ItemKind,
    /// Attached by the coordinator to accepted items when previews are enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewRef>,
    #[serde(skip)]
    pub source: ItemSource,
}

impl ItemDescriptor {
    /// Creates a file descriptor with no content source.
    pub fn file(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            kind: ItemKind::File,
            preview: None,
            source: ItemSource::Unavailable,
        }
    }

    /// Creates a file descriptor whose size comes from the given bytes.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Self {
            size: bytes.len() as u64,
            source: ItemSource::Memory(bytes),
            ..Self::file(name, 0, mime_type)
        }
    }

    /// Creates a placeholder for a directory entry seen during a drag.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::DirectoryEntry,
            ..Self::file(name, 0, "")
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = ItemSource::Path(path.into());
        self
    }

    pub fn is_file(&self) -> bool {
        self.kind == ItemKind::File
    }

    /// Returns the extension after the last dot, without the dot.
    ///
    /// Dotfiles like `.bashrc` have no extension.
    pub fn extension(&self) -> Option<&str> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() { None } else { Some(ext) }
    }
}
