//! Shared fixtures for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::dialog::{FilePicker, PickerRequest};
use crate::event::DragEvent;
use crate::handler::DropHandler;
use crate::ignore_poison::IgnorePoison;
use crate::item::ItemDescriptor;

/// Installs env_logger once so `RUST_LOG=debug cargo test` shows library logs.
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One PDF, the "non-image" fixture.
pub(crate) fn files() -> Vec<ItemDescriptor> {
    vec![ItemDescriptor::file("file1.pdf", 1111, "application/pdf")]
}

/// Two images, the "image" fixture.
pub(crate) fn images() -> Vec<ItemDescriptor> {
    vec![
        ItemDescriptor::file("cats.gif", 1234, "image/gif"),
        ItemDescriptor::file("dogs.jpg", 2345, "image/jpeg"),
    ]
}

pub(crate) fn names(items: &[ItemDescriptor]) -> Vec<&str> {
    items.iter().map(|item| item.name.as_str()).collect()
}

/// A notification received by [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Drop { accepted: Vec<String>, rejected: Vec<String> },
    DropAccepted(Vec<String>),
    DropRejected(Vec<String>),
    DragStart,
    DragEnter,
    DragOver,
    DragLeave,
    FileDialogCancel,
}

fn owned_names(items: &[ItemDescriptor]) -> Vec<String> {
    items.iter().map(|item| item.name.clone()).collect()
}

/// Records every notification in order.
#[derive(Default)]
pub(crate) struct RecordingHandler {
    calls: Mutex<Vec<Call>>,
    /// Stop propagation of drop events after handling them
    stop_drop_propagation: bool,
}

impl RecordingHandler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn stopping_drop_propagation() -> Self {
        Self {
            stop_drop_propagation: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock_ignore_poison().clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock_ignore_poison().iter().filter(|c| pred(c)).count()
    }

    fn push(&self, call: Call) {
        self.calls.lock_ignore_poison().push(call);
    }
}

impl DropHandler for RecordingHandler {
    fn on_drop(&self, accepted: &[ItemDescriptor], rejected: &[ItemDescriptor], event: &DragEvent) {
        self.push(Call::Drop {
            accepted: owned_names(accepted),
            rejected: owned_names(rejected),
        });
        if self.stop_drop_propagation {
            event.stop_propagation();
        }
    }

    fn on_drop_accepted(&self, accepted: &[ItemDescriptor], _event: &DragEvent) {
        self.push(Call::DropAccepted(owned_names(accepted)));
    }

    fn on_drop_rejected(&self, rejected: &[ItemDescriptor], _event: &DragEvent) {
        self.push(Call::DropRejected(owned_names(rejected)));
    }

    fn on_drag_start(&self, _event: &DragEvent) {
        self.push(Call::DragStart);
    }

    fn on_drag_enter(&self, _event: &DragEvent) {
        self.push(Call::DragEnter);
    }

    fn on_drag_over(&self, _event: &DragEvent) {
        self.push(Call::DragOver);
    }

    fn on_drag_leave(&self, _event: &DragEvent) {
        self.push(Call::DragLeave);
    }

    fn on_file_dialog_cancel(&self) {
        self.push(Call::FileDialogCancel);
    }
}

/// Picker that records open requests and reports a configurable selection count.
#[derive(Default)]
pub(crate) struct MockPicker {
    requests: Mutex<Vec<PickerRequest>>,
    selected: AtomicUsize,
}

impl MockPicker {
    pub(crate) fn requests(&self) -> Vec<PickerRequest> {
        self.requests.lock_ignore_poison().clone()
    }

    pub(crate) fn select(&self, count: usize) {
        self.selected.store(count, Ordering::Relaxed);
    }
}

impl FilePicker for MockPicker {
    fn open(&self, request: &PickerRequest) {
        self.requests.lock_ignore_poison().push(request.clone());
    }

    fn selected_count(&self) -> usize {
        self.selected.load(Ordering::Relaxed)
    }
}
