//! Local file system entries.

use futures_util::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, ReadDir};

use super::{DirectoryReader, EntryHandle, FileSystemEntry};
use crate::error::WalkEntryError;
use crate::item::ItemDescriptor;

/// Entries handed out per `read_entries` call.
const BATCH_SIZE: usize = 64;

/// A file or directory on the local file system.
///
/// Symlinks are classified by their own type, so a symlinked directory is never descended
/// into and cyclic links can't make a walk infinite. Resolving one as a file follows it.
#[derive(Debug, Clone)]
pub struct LocalEntry {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

impl LocalEntry {
    /// Opens an entry for `path`, following a symlink at the top level only.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, WalkEntryError> {
        let path = path.into();
        let metadata = fs::metadata(&path).await?;
        Ok(Self::new(path, metadata.is_dir()))
    }

    fn new(path: PathBuf, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name, is_dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_handle(self) -> EntryHandle {
        Arc::new(self)
    }
}

impl FileSystemEntry for LocalEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_directory(&self) -> bool {
        self.is_dir
    }

    fn file(&self) -> BoxFuture<'_, Result<ItemDescriptor, WalkEntryError>> {
        async move {
            let metadata = fs::metadata(&self.path).await?;
            if !metadata.is_file() {
                return Err(WalkEntryError::NotAFile(self.path.display().to_string()));
            }
            let mime_type = mime_guess::from_path(&self.path)
                .first_raw()
                .unwrap_or_default();
            Ok(ItemDescriptor::file(self.name.clone(), metadata.len(), mime_type).with_path(&self.path))
        }
        .boxed()
    }

    fn metadata_hint(&self) -> Option<ItemDescriptor> {
        if self.is_dir {
            return Some(ItemDescriptor::directory(self.name.clone()));
        }
        // A synchronous stat; an entry that can't be stat'ed gets no hint
        let metadata = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::debug!("No drag-time metadata for {}: {}", self.path.display(), e);
                return None;
            }
        };
        let mime_type = mime_guess::from_path(&self.path).first_raw().unwrap_or_default();
        Some(ItemDescriptor::file(self.name.clone(), metadata.len(), mime_type))
    }

    fn create_reader(&self) -> Result<Box<dyn DirectoryReader>, WalkEntryError> {
        if !self.is_dir {
            return Err(WalkEntryError::Io(format!("{} is not a directory", self.path.display())));
        }
        Ok(Box::new(LocalReader {
            path: self.path.clone(),
            read_dir: None,
            exhausted: false,
        }))
    }
}

/// Reads a directory lazily, in batches of [`BATCH_SIZE`], in OS enumeration order.
struct LocalReader {
    path: PathBuf,
    read_dir: Option<ReadDir>,
    exhausted: bool,
}

impl LocalReader {
    async fn next_batch(&mut self) -> Result<Vec<EntryHandle>, WalkEntryError> {
        if self.exhausted {
            return Ok(Vec::new());
        }
        if self.read_dir.is_none() {
            self.read_dir = Some(fs::read_dir(&self.path).await?);
        }
        let Some(read_dir) = self.read_dir.as_mut() else {
            return Ok(Vec::new());
        };

        let mut batch: Vec<EntryHandle> = Vec::with_capacity(BATCH_SIZE);
        while batch.len() < BATCH_SIZE {
            let Some(dir_entry) = read_dir.next_entry().await? else {
                self.exhausted = true;
                break;
            };
            let file_type = match dir_entry.file_type().await {
                Ok(file_type) => file_type,
                Err(e) => {
                    log::warn!("Skipping {}: {}", dir_entry.path().display(), e);
                    continue;
                }
            };
            batch.push(Arc::new(LocalEntry::new(dir_entry.path(), file_type.is_dir())));
        }
        Ok(batch)
    }
}

impl DirectoryReader for LocalReader {
    fn read_entries(&mut self) -> BoxFuture<'_, Result<Vec<EntryHandle>, WalkEntryError>> {
        self.next_batch().boxed()
    }
}
