//! Native file picker integration.
//!
//! Pickers don't report cancellation. It's inferred the way browsers allow it: after the
//! picker was opened, the next window focus is followed by a settle delay, and if no file
//! was selected by then, the picker was cancelled.

/// What the host should show in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerRequest {
    /// Comma separated accept list, empty for any file
    pub accept: String,
    pub multiple: bool,
}

/// Host-side file picker.
pub trait FilePicker: Send + Sync {
    /// Shows the picker. Selections come back through `DropTarget::on_files_selected`.
    fn open(&self, request: &PickerRequest);

    /// Number of files selected in the most recent picker session.
    fn selected_count(&self) -> usize {
        0
    }
}

/// Picker lifecycle of one drop target.
#[derive(Debug, Default)]
pub(crate) struct FileDialogState {
    active: bool,
    /// Bumped on every open, so a late focus check can't cancel a newer session
    generation: u64,
}

impl FileDialogState {
    /// Marks the picker as open and returns the session number.
    pub(crate) fn open(&mut self) -> u64 {
        self.generation += 1;
        self.active = true;
        self.generation
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// A drop or selection ended the picker session.
    pub(crate) fn close(&mut self) {
        self.active = false;
    }

    /// Ends session `generation` if it's still the open one. True at most once per open.
    pub(crate) fn claim_close(&mut self, generation: u64) -> bool {
        if self.active && self.generation == generation {
            self.active = false;
            true
        } else {
            false
        }
    }
}
