//! Drag events and their data transfer.

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::DropEffectError;
use crate::ignore_poison::IgnorePoison;
use crate::item::ItemDescriptor;
use crate::walker::EntryHandle;

/// One data item of a drag: a plain file, or an entry that may turn out to be a directory.
#[derive(Clone)]
pub enum TransferItem {
    File(ItemDescriptor),
    Entry(EntryHandle),
}

impl fmt::Debug for TransferItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(item) => f.debug_tuple("File").field(item).finish(),
            Self::Entry(entry) => f
                .debug_struct("Entry")
                .field("name", &entry.name())
                .field("is_directory", &entry.is_directory())
                .finish(),
        }
    }
}

impl TransferItem {
    /// What may be inspected during a drag, before the drop grants access.
    ///
    /// Entries without a metadata hint become name-only placeholders.
    pub fn candidate(&self) -> ItemDescriptor {
        match self {
            Self::File(item) => item.clone(),
            Self::Entry(entry) => entry.metadata_hint().unwrap_or_else(|| {
                if entry.is_directory() {
                    ItemDescriptor::directory(entry.name())
                } else {
                    ItemDescriptor::file(entry.name(), 0, "")
                }
            }),
        }
    }
}

/// Drop indicator a target requests from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    None,
    Copy,
    Move,
    Link,
}

/// Host-side data of a drag or drop event.
pub trait DataTransfer: Send + Sync {
    /// Items in host order.
    fn items(&self) -> Vec<TransferItem>;

    /// Requests a drop indicator. Hosts may refuse.
    fn set_drop_effect(&self, effect: DropEffect) -> Result<(), DropEffectError> {
        let _ = effect;
        Err(DropEffectError::Unsupported)
    }
}

/// A data transfer over a fixed item list.
#[derive(Debug, Default)]
pub struct StaticTransfer {
    items: Vec<TransferItem>,
    drop_effect: Mutex<Option<DropEffect>>,
    /// Refuse every drop-effect update
    refuse_drop_effect: bool,
}

impl StaticTransfer {
    pub fn new(items: Vec<TransferItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn from_files(files: Vec<ItemDescriptor>) -> Self {
        Self::new(files.into_iter().map(TransferItem::File).collect())
    }

    pub fn from_entries(entries: Vec<EntryHandle>) -> Self {
        Self::new(entries.into_iter().map(TransferItem::Entry).collect())
    }

    /// Makes `set_drop_effect` fail, like a host that forbids touching the indicator.
    pub fn refusing_drop_effect(mut self) -> Self {
        self.refuse_drop_effect = true;
        self
    }

    /// The last drop effect accepted by this transfer.
    pub fn drop_effect(&self) -> Option<DropEffect> {
        *self.drop_effect.lock_ignore_poison()
    }
}

impl DataTransfer for StaticTransfer {
    fn items(&self) -> Vec<TransferItem> {
        self.items.clone()
    }

    fn set_drop_effect(&self, effect: DropEffect) -> Result<(), DropEffectError> {
        if self.refuse_drop_effect {
            return Err(DropEffectError::Rejected(format!("{:?}", effect)));
        }
        *self.drop_effect.lock_ignore_poison() = Some(effect);
        Ok(())
    }
}

/// Where an event came from. Picker selections go through the same path as drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrigin {
    Drag,
    Picker,
}

/// A drag lifecycle event as delivered by the host.
///
/// The same event may be dispatched to several nested targets; [`stop_propagation`]
/// keeps it from reaching outer ones.
///
/// [`stop_propagation`]: DragEvent::stop_propagation
pub struct DragEvent {
    transfer: Arc<dyn DataTransfer>,
    origin: EventOrigin,
    propagation_stopped: AtomicBool,
}

impl fmt::Debug for DragEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragEvent")
            .field("origin", &self.origin)
            .field("items", &self.transfer.items())
            .field("propagation_stopped", &self.is_propagation_stopped())
            .finish()
    }
}

impl DragEvent {
    pub fn new(transfer: Arc<dyn DataTransfer>) -> Self {
        Self {
            transfer,
            origin: EventOrigin::Drag,
            propagation_stopped: AtomicBool::new(false),
        }
    }

    /// A drag event carrying plain files.
    pub fn from_files(files: Vec<ItemDescriptor>) -> Self {
        Self::new(Arc::new(StaticTransfer::from_files(files)))
    }

    /// A picker selection, shaped like a drop.
    pub fn picker(files: Vec<ItemDescriptor>) -> Self {
        Self {
            origin: EventOrigin::Picker,
            ..Self::from_files(files)
        }
    }

    pub fn transfer(&self) -> &dyn DataTransfer {
        self.transfer.as_ref()
    }

    pub fn origin(&self) -> EventOrigin {
        self.origin
    }

    pub fn items(&self) -> Vec<TransferItem> {
        self.transfer.items()
    }

    /// Metadata-only view of the items, for drag-time classification.
    pub fn candidate_items(&self) -> Vec<ItemDescriptor> {
        self.transfer.items().iter().map(TransferItem::candidate).collect()
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.load(Ordering::Relaxed)
    }
}
