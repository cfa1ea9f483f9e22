//! Drop-target controller.
//!
//! Accepts file-drag and file-picker gestures from a host UI surface, classifies the
//! incoming items against acceptance criteria (MIME type, size bounds, cardinality),
//! flattens dropped directory trees, and reports drag/drop lifecycle transitions.
//!
//! The host owns rendering and event delivery. This crate owns:
//! - [`DragSessionTracker`]: the enter/leave counter and derived active/accept/reject flags
//! - [`filter`]: the type and size predicates
//! - [`DirectoryWalker`]: async expansion of directory entries into flat file lists
//! - [`DropCoordinator`]: expansion, partitioning, previews, and notification emission
//! - [`DropTarget`] and [`DropSurface`]: per-instance wiring and nested-target propagation

// Warn on redundant path prefixes (e.g., std::path::Path when Path is imported)
#![warn(unused_qualifications)]
// Use log::* macros instead of println!/eprintln! for proper log level control
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod coordinator;
pub mod criteria;
pub mod dialog;
pub mod error;
pub mod event;
pub mod filter;
pub mod handler;
mod ignore_poison;
pub mod item;
pub mod preview;
pub mod session;
pub mod surface;
pub mod target;
pub mod walker;

#[cfg(test)]
mod target_test;
#[cfg(test)]
mod test_support;

pub use config::{DropTargetConfig, load_config};
pub use coordinator::{DropCoordinator, DropResult};
pub use criteria::{AcceptPattern, CriteriaSpec, OverflowPolicy};
pub use dialog::{FilePicker, PickerRequest};
pub use error::{ConfigError, DropEffectError, PreviewError, SurfaceError, WalkEntryError};
pub use event::{DataTransfer, DragEvent, DropEffect, EventOrigin, StaticTransfer, TransferItem};
pub use handler::{DropHandler, NoopHandler};
pub use item::{ItemDescriptor, ItemKind, ItemSource};
pub use preview::{PreviewFactory, PreviewRef, PreviewRegistry};
pub use session::{DragSessionTracker, DragState};
pub use surface::{DocumentDropAction, DropSurface, TargetId};
pub use target::{DropOutcome, DropTarget, DropTargetBuilder};
pub use walker::{DirectoryReader, DirectoryWalker, EntryHandle, FileSystemEntry, LocalEntry, MemoryEntry};
