//! A single drop target: session, criteria, picker, and notification wiring.
//!
//! The host forwards its events here one at a time. Synchronous events (enter, over,
//! leave, click) update state and notify immediately. Drops are async because directory
//! expansion may suspend; their notifications fire once the whole expansion finished, and
//! not at all if the target was torn down in the meantime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::DropTargetConfig;
use crate::coordinator::{DropCoordinator, DropResult};
use crate::criteria::CriteriaSpec;
use crate::dialog::{FileDialogState, FilePicker, PickerRequest};
use crate::error::ConfigError;
use crate::event::{DragEvent, DropEffect};
use crate::handler::{DropHandler, NoopHandler};
use crate::ignore_poison::IgnorePoison;
use crate::item::ItemDescriptor;
use crate::preview::{PreviewFactory, PreviewRegistry};
use crate::session::{DragSessionTracker, DragState};
use crate::walker::DirectoryWalker;

/// What became of a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Processed and notified
    Completed(DropResult),
    /// The target is disabled or unmounted; nothing happened
    Ignored,
    /// The target was torn down while the drop was being expanded; nothing was notified
    Discarded,
}

impl DropOutcome {
    pub fn result(&self) -> Option<&DropResult> {
        match self {
            Self::Completed(result) => Some(result),
            _ => None,
        }
    }
}

/// Config and the criteria derived from it, swapped together.
struct Settings {
    config: DropTargetConfig,
    criteria: CriteriaSpec,
}

pub struct DropTarget {
    settings: Mutex<Settings>,
    session: Mutex<DragSessionTracker>,
    dialog: Mutex<FileDialogState>,
    handler: Arc<dyn DropHandler>,
    picker: Option<Arc<dyn FilePicker>>,
    previews: Arc<dyn PreviewFactory>,
    mounted: AtomicBool,
}

/// Builds a [`DropTarget`]. Without a handler, notifications go nowhere; without a preview
/// factory, previews go to a private [`PreviewRegistry`].
pub struct DropTargetBuilder {
    config: DropTargetConfig,
    handler: Arc<dyn DropHandler>,
    picker: Option<Arc<dyn FilePicker>>,
    previews: Option<Arc<dyn PreviewFactory>>,
}

impl DropTargetBuilder {
    pub fn handler(mut self, handler: Arc<dyn DropHandler>) -> Self {
        self.handler = handler;
        self
    }

    pub fn picker(mut self, picker: Arc<dyn FilePicker>) -> Self {
        self.picker = Some(picker);
        self
    }

    pub fn previews(mut self, previews: Arc<dyn PreviewFactory>) -> Self {
        self.previews = Some(previews);
        self
    }

    pub fn build(self) -> Result<DropTarget, ConfigError> {
        self.config.validate()?;
        let criteria = self.config.criteria()?;
        Ok(DropTarget {
            settings: Mutex::new(Settings {
                config: self.config,
                criteria,
            }),
            session: Mutex::new(DragSessionTracker::new()),
            dialog: Mutex::new(FileDialogState::default()),
            handler: self.handler,
            picker: self.picker,
            previews: self.previews.unwrap_or_else(|| Arc::new(PreviewRegistry::new())),
            mounted: AtomicBool::new(true),
        })
    }
}

impl DropTarget {
    pub fn builder(config: DropTargetConfig) -> DropTargetBuilder {
        DropTargetBuilder {
            config,
            handler: Arc::new(NoopHandler),
            picker: None,
            previews: None,
        }
    }

    /// A target without handler or picker.
    pub fn new(config: DropTargetConfig) -> Result<Self, ConfigError> {
        Self::builder(config).build()
    }

    pub fn config(&self) -> DropTargetConfig {
        self.settings.lock_ignore_poison().config.clone()
    }

    pub fn criteria(&self) -> CriteriaSpec {
        self.settings.lock_ignore_poison().criteria.clone()
    }

    pub fn drag_state(&self) -> DragState {
        self.session.lock_ignore_poison().state()
    }

    pub fn is_file_dialog_active(&self) -> bool {
        self.dialog.lock_ignore_poison().is_active()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    fn is_disabled(&self) -> bool {
        self.settings.lock_ignore_poison().config.disabled
    }

    /// Whether this target asks the surface to swallow drops that miss every target.
    pub fn prevents_document_drops(&self) -> bool {
        self.settings.lock_ignore_poison().config.prevent_drop_on_document
    }

    /// Replaces the config. An active drag is re-classified under the new criteria.
    pub fn set_config(&self, config: DropTargetConfig) -> Result<DragState, ConfigError> {
        config.validate()?;
        let criteria = config.criteria()?;
        {
            let mut settings = self.settings.lock_ignore_poison();
            settings.config = config;
            settings.criteria = criteria.clone();
        }
        let state = self.session.lock_ignore_poison().reevaluate(&criteria);
        log::debug!("Drop target reconfigured, drag state now {:?}", state);
        Ok(state)
    }

    // ========================================
    // Drag lifecycle
    // ========================================

    pub fn on_drag_start(&self, event: &DragEvent) {
        if self.is_disabled() {
            return;
        }
        self.handler.on_drag_start(event);
    }

    /// Counts the enter and classifies the event's items by metadata.
    pub fn on_drag_enter(&self, event: &DragEvent) -> DragState {
        if self.is_disabled() {
            return self.drag_state();
        }
        let criteria = self.criteria();
        let state = self
            .session
            .lock_ignore_poison()
            .on_enter(event.candidate_items(), &criteria);
        self.handler.on_drag_enter(event);
        state
    }

    /// Requests the copy indicator. A host refusing it doesn't affect the drag.
    pub fn on_drag_over(&self, event: &DragEvent) -> DragState {
        if self.is_disabled() {
            return self.drag_state();
        }
        if let Err(e) = event.transfer().set_drop_effect(DropEffect::Copy) {
            log::debug!("Host refused drop effect: {}", e);
        }
        self.handler.on_drag_over(event);
        self.drag_state()
    }

    /// Counts the leave. The handler only hears about the leave that ends the session.
    pub fn on_drag_leave(&self, event: &DragEvent) -> DragState {
        if self.is_disabled() {
            return self.drag_state();
        }
        let (ended, state) = {
            let mut session = self.session.lock_ignore_poison();
            let ended = session.on_leave();
            (ended, session.state())
        };
        if ended {
            self.handler.on_drag_leave(event);
        }
        state
    }

    /// Ends a drag session without a drop, e.g. after a drop that missed every target.
    pub fn reset_drag(&self) {
        self.session.lock_ignore_poison().on_drop();
    }

    /// Ends the drag, expands and classifies the dropped items, then notifies.
    pub async fn on_drop(&self, event: &DragEvent) -> DropOutcome {
        if self.is_disabled() || !self.is_mounted() {
            return DropOutcome::Ignored;
        }
        self.session.lock_ignore_poison().on_drop();
        self.dialog.lock_ignore_poison().close();

        let (criteria, with_previews, concurrency) = {
            let settings = self.settings.lock_ignore_poison();
            (
                settings.criteria.clone(),
                !settings.config.disable_preview,
                settings.config.walk_concurrency,
            )
        };
        let coordinator =
            DropCoordinator::new(DirectoryWalker::new(concurrency)).with_previews(Arc::clone(&self.previews));
        let mut result = coordinator.process(event.items(), &criteria, with_previews).await;

        if !self.is_mounted() {
            log::debug!(
                "Discarding drop of {} items, target was torn down during expansion",
                result.len()
            );
            coordinator.discard_previews(&mut result);
            return DropOutcome::Discarded;
        }

        DropCoordinator::emit(self.handler.as_ref(), &result, event);
        DropOutcome::Completed(result)
    }

    // ========================================
    // File picker
    // ========================================

    /// Handles a picker selection exactly like a drop of the same files.
    pub async fn on_files_selected(&self, files: Vec<ItemDescriptor>) -> DropOutcome {
        let event = DragEvent::picker(files);
        self.on_drop(&event).await
    }

    /// Opens the picker unless clicks are disabled. Returns whether it was opened.
    pub fn on_click(&self) -> bool {
        if self.settings.lock_ignore_poison().config.disable_click {
            return false;
        }
        self.open()
    }

    /// Opens the picker. Returns false when disabled or no picker is attached.
    pub fn open(&self) -> bool {
        if self.is_disabled() {
            return false;
        }
        let Some(picker) = &self.picker else {
            log::debug!("No file picker attached, ignoring open request");
            return false;
        };
        let criteria = self.criteria();
        let request = PickerRequest {
            accept: criteria.accept_string(),
            multiple: !criteria.is_single(),
        };
        self.dialog.lock_ignore_poison().open();
        picker.open(&request);
        true
    }

    /// Checks for picker cancellation after the window regained focus.
    ///
    /// Waits for the settle delay, then notifies the handler if the picker session is still
    /// open and nothing was selected. Returns true if the cancel notification fired, which
    /// happens at most once per open.
    pub async fn on_window_focus(&self) -> bool {
        let generation = {
            let dialog = self.dialog.lock_ignore_poison();
            if !dialog.is_active() {
                return false;
            }
            dialog.generation()
        };
        let settle = self.settings.lock_ignore_poison().config.dialog_settle();
        tokio::time::sleep(settle).await;

        if !self.is_mounted() || !self.dialog.lock_ignore_poison().claim_close(generation) {
            return false;
        }
        let selected = self.picker.as_ref().map_or(0, |picker| picker.selected_count());
        if selected > 0 {
            return false;
        }
        log::debug!("File dialog closed without a selection");
        self.handler.on_file_dialog_cancel();
        true
    }

    // ========================================
    // Teardown
    // ========================================

    /// Unmounts the target. In-flight drops finish silently and later events are ignored.
    pub fn teardown(&self) {
        self.mounted.store(false, Ordering::Release);
        self.session.lock_ignore_poison().on_drop();
        self.dialog.lock_ignore_poison().close();
    }
}
