//! In-memory entry trees.
//!
//! For hosts that already hold a full enumeration (for example one received over IPC) and
//! for tests, which can shape batch boundaries, failures and latency per entry.

use futures_util::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;

use super::{DirectoryReader, EntryHandle, FileSystemEntry};
use crate::error::WalkEntryError;
use crate::item::ItemDescriptor;

/// A file or directory held in memory.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    name: String,
    node: Node,
    /// Resolving or reading this entry fails
    failing: bool,
    /// Delay before each resolution or batch
    latency: Duration,
}

#[derive(Debug, Clone)]
enum Node {
    File(ItemDescriptor),
    Directory { children: Vec<MemoryEntry>, batch_size: usize },
}

impl MemoryEntry {
    pub fn file(item: ItemDescriptor) -> Self {
        Self {
            name: item.name.clone(),
            node: Node::File(item),
            failing: false,
            latency: Duration::ZERO,
        }
    }

    /// Creates a directory whose children are returned in a single batch.
    pub fn directory(name: impl Into<String>, children: Vec<MemoryEntry>) -> Self {
        let batch_size = children.len().max(1);
        Self {
            name: name.into(),
            node: Node::Directory { children, batch_size },
            failing: false,
            latency: Duration::ZERO,
        }
    }

    /// Splits a directory's enumeration into batches of `batch_size`. No-op for files.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        if let Node::Directory { batch_size: size, .. } = &mut self.node {
            *size = batch_size.max(1);
        }
        self
    }

    /// Makes resolution fail: files won't resolve, directories fail their first batch.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn into_handle(self) -> EntryHandle {
        Arc::new(self)
    }

    fn failure(&self) -> WalkEntryError {
        WalkEntryError::NotFound(self.name.clone())
    }
}

async fn delay(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

impl FileSystemEntry for MemoryEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_directory(&self) -> bool {
        matches!(self.node, Node::Directory { .. })
    }

    fn file(&self) -> BoxFuture<'_, Result<ItemDescriptor, WalkEntryError>> {
        async move {
            delay(self.latency).await;
            match &self.node {
                Node::File(_) if self.failing => Err(self.failure()),
                Node::File(item) => Ok(item.clone()),
                Node::Directory { .. } => Err(WalkEntryError::NotAFile(self.name.clone())),
            }
        }
        .boxed()
    }

    fn metadata_hint(&self) -> Option<ItemDescriptor> {
        match &self.node {
            Node::File(item) => Some(item.clone()),
            Node::Directory { .. } => Some(ItemDescriptor::directory(self.name.clone())),
        }
    }

    fn create_reader(&self) -> Result<Box<dyn DirectoryReader>, WalkEntryError> {
        match &self.node {
            Node::Directory { children, batch_size } => Ok(Box::new(MemoryReader {
                pending: children.iter().cloned().map(MemoryEntry::into_handle).collect(),
                batch_size: *batch_size,
                failing: self.failing,
                latency: self.latency,
                name: self.name.clone(),
            })),
            Node::File(_) => Err(WalkEntryError::Io(format!("{} is not a directory", self.name))),
        }
    }
}

struct MemoryReader {
    /// Children not yet handed out, in order
    pending: Vec<EntryHandle>,
    batch_size: usize,
    failing: bool,
    latency: Duration,
    name: String,
}

impl DirectoryReader for MemoryReader {
    fn read_entries(&mut self) -> BoxFuture<'_, Result<Vec<EntryHandle>, WalkEntryError>> {
        async move {
            delay(self.latency).await;
            if self.failing {
                return Err(WalkEntryError::PermissionDenied(self.name.clone()));
            }
            let take = self.batch_size.min(self.pending.len());
            Ok(self.pending.drain(..take).collect::<Vec<_>>())
        }
        .boxed()
    }
}
