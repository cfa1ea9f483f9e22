//! Consumer-side notifications.

use crate::event::DragEvent;
use crate::item::ItemDescriptor;

/// Receives drop-target notifications. Every method defaults to a no-op.
///
/// Called synchronously from the thread that delivered the event; implementations
/// shouldn't block.
pub trait DropHandler: Send + Sync {
    /// A drop (or picker selection) completed. Always fires, even when both lists are empty.
    fn on_drop(&self, accepted: &[ItemDescriptor], rejected: &[ItemDescriptor], event: &DragEvent) {
        let _ = (accepted, rejected, event);
    }

    /// Fires after `on_drop` when at least one item was accepted.
    fn on_drop_accepted(&self, accepted: &[ItemDescriptor], event: &DragEvent) {
        let _ = (accepted, event);
    }

    /// Fires after `on_drop` when at least one item was rejected.
    fn on_drop_rejected(&self, rejected: &[ItemDescriptor], event: &DragEvent) {
        let _ = (rejected, event);
    }

    // ========================================
    // Drag lifecycle
    // ========================================

    fn on_drag_start(&self, event: &DragEvent) {
        let _ = event;
    }

    fn on_drag_enter(&self, event: &DragEvent) {
        let _ = event;
    }

    fn on_drag_over(&self, event: &DragEvent) {
        let _ = event;
    }

    /// Fires only when the pointer left the target itself, not one of its descendants.
    fn on_drag_leave(&self, event: &DragEvent) {
        let _ = event;
    }

    /// The file picker closed without a selection.
    fn on_file_dialog_cancel(&self) {}
}

/// Handler that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl DropHandler for NoopHandler {}
