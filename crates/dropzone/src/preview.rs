//! Preview references for accepted items.
//!
//! A preview reference is an opaque, revocable handle to a snapshot of an item's bytes.
//! The coordinator acquires one per accepted item right before emission; releasing it is
//! the consumer's job ([`PreviewFactory::revoke_preview`]).

use futures_util::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::error::PreviewError;
use crate::ignore_poison::IgnorePoison;
use crate::item::{ItemDescriptor, ItemSource};

const PREVIEW_SCHEME: &str = "preview://";

/// Opaque handle of the form `preview://<uuid>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewRef(String);

impl PreviewRef {
    fn new(id: Uuid, name: &str) -> Self {
        Self(format!("{PREVIEW_SCHEME}{id}/{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn id(&self) -> Option<Uuid> {
        let rest = self.0.strip_prefix(PREVIEW_SCHEME)?;
        let (id, _) = rest.split_once('/')?;
        Uuid::parse_str(id).ok()
    }
}

impl fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creates and revokes preview references.
pub trait PreviewFactory: Send + Sync {
    fn create_preview<'a>(&'a self, item: &'a ItemDescriptor) -> BoxFuture<'a, Result<PreviewRef, PreviewError>>;

    /// Releases a reference. Returns false if it was unknown or already revoked.
    fn revoke_preview(&self, preview: &PreviewRef) -> bool;
}

/// In-process preview store keyed by reference.
#[derive(Default)]
pub struct PreviewRegistry {
    entries: Mutex<HashMap<Uuid, Arc<[u8]>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the snapshot behind a live reference.
    pub fn resolve(&self, preview: &PreviewRef) -> Option<Arc<[u8]>> {
        let id = preview.id()?;
        self.entries.lock_ignore_poison().get(&id).cloned()
    }

    /// Number of live references.
    pub fn len(&self) -> usize {
        self.entries.lock_ignore_poison().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn register(&self, name: &str, bytes: Arc<[u8]>) -> PreviewRef {
        let id = Uuid::new_v4();
        self.entries.lock_ignore_poison().insert(id, bytes);
        PreviewRef::new(id, name)
    }
}

impl PreviewFactory for PreviewRegistry {
    fn create_preview<'a>(&'a self, item: &'a ItemDescriptor) -> BoxFuture<'a, Result<PreviewRef, PreviewError>> {
        async move {
            let bytes: Arc<[u8]> = match &item.source {
                ItemSource::Memory(bytes) => Arc::clone(bytes),
                ItemSource::Path(path) => tokio::fs::read(path).await?.into(),
                ItemSource::Unavailable => return Err(PreviewError::NoSource(item.name.clone())),
            };
            Ok(self.register(&item.name, bytes))
        }
        .boxed()
    }

    fn revoke_preview(&self, preview: &PreviewRef) -> bool {
        match preview.id() {
            Some(id) => self.entries.lock_ignore_poison().remove(&id).is_some(),
            None => false,
        }
    }
}
