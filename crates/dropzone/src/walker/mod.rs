//! Directory-entry traversal.
//!
//! This module provides the `FileSystemEntry` and `DirectoryReader` traits, which abstract
//! over whatever the host hands us for a dropped folder, and the `DirectoryWalker`, which
//! expands such an entry into a flat, depth-first list of file descriptors.
//!
//! Implementations:
//! - `LocalEntry`: real paths on the local file system
//! - `MemoryEntry`: in-memory trees, for hosts that already hold an enumeration and for tests

mod local;
mod memory;

pub use local::LocalEntry;
pub use memory::MemoryEntry;

use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;

use crate::error::WalkEntryError;
use crate::item::ItemDescriptor;

/// Shared handle to an entry. Entries are handed out by readers and by drag events.
pub type EntryHandle = Arc<dyn FileSystemEntry>;

/// A file or directory as exposed by the host's entry API.
pub trait FileSystemEntry: Send + Sync {
    /// Entry name (last path component).
    fn name(&self) -> &str;

    fn is_directory(&self) -> bool;

    // ========================================
    // Files
    // ========================================

    /// Resolves a file entry into its descriptor.
    fn file(&self) -> BoxFuture<'_, Result<ItemDescriptor, WalkEntryError>>;

    /// Metadata available synchronously, without touching the backing store.
    ///
    /// Used during a drag, when only metadata may be inspected. Defaults to none.
    fn metadata_hint(&self) -> Option<ItemDescriptor> {
        None
    }

    // ========================================
    // Directories
    // ========================================

    /// Opens a reader over a directory entry's children.
    fn create_reader(&self) -> Result<Box<dyn DirectoryReader>, WalkEntryError>;
}

/// Batched enumeration of a directory's children.
///
/// Each call returns the next batch; an empty batch means enumeration is complete.
pub trait DirectoryReader: Send {
    fn read_entries(&mut self) -> BoxFuture<'_, Result<Vec<EntryHandle>, WalkEntryError>>;
}

/// Expands directory entries into flat file lists.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryWalker {
    /// Max number of sibling subtrees resolved at the same time
    concurrency: usize,
}

impl Default for DirectoryWalker {
    fn default() -> Self {
        Self::new(4)
    }
}

impl DirectoryWalker {
    /// Creates a walker; a concurrency of 0 is treated as 1.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Walks `root` and returns every file beneath it, depth-first, left-to-right.
    ///
    /// A file root yields itself. Entries that fail to resolve are skipped.
    pub async fn walk(&self, root: Option<EntryHandle>) -> Vec<ItemDescriptor> {
        match root {
            Some(entry) => self.walk_entry(entry).await,
            None => Vec::new(),
        }
    }

    fn walk_entry(&self, entry: EntryHandle) -> BoxFuture<'_, Vec<ItemDescriptor>> {
        async move {
            if !entry.is_directory() {
                return resolve_file(entry.as_ref()).await.into_iter().collect::<Vec<_>>();
            }

            let children = read_all_entries(entry.as_ref()).await;
            log::debug!("Walking {} ({} entries)", entry.name(), children.len());

            // `buffered` yields in input order, so completion order can't leak into the output
            let pending: Vec<BoxFuture<'_, Vec<ItemDescriptor>>> =
                children.into_iter().map(|child| self.walk_entry(child)).collect();
            let subtrees: Vec<Vec<ItemDescriptor>> = stream::iter(pending)
                .buffered(self.concurrency)
                .collect()
                .await;
            subtrees.into_iter().flatten().collect::<Vec<_>>()
        }
        .boxed()
    }
}

async fn resolve_file(entry: &dyn FileSystemEntry) -> Option<ItemDescriptor> {
    match entry.file().await {
        Ok(item) => Some(item),
        Err(e) => {
            log::warn!("Skipping dropped entry {}: {}", entry.name(), e);
            None
        }
    }
}

/// Drains a directory reader. A failing batch ends enumeration, keeping what was read.
async fn read_all_entries(entry: &dyn FileSystemEntry) -> Vec<EntryHandle> {
    let mut reader = match entry.create_reader() {
        Ok(reader) => reader,
        Err(e) => {
            log::warn!("Skipping dropped directory {}: {}", entry.name(), e);
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    loop {
        match reader.read_entries().await {
            Ok(batch) if batch.is_empty() => break,
            Ok(batch) => entries.extend(batch),
            Err(e) => {
                log::warn!(
                    "Reading {} failed after {} entries, keeping those: {}",
                    entry.name(),
                    entries.len(),
                    e
                );
                break;
            }
        }
    }
    entries
}
