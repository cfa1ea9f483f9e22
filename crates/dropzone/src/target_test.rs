//! Tests for the drop target: drop scenarios, drag lifecycle, picker, and teardown.

use std::sync::Arc;
use std::time::Duration;

use crate::config::DropTargetConfig;
use crate::criteria::OverflowPolicy;
use crate::event::{DragEvent, DropEffect, StaticTransfer};
use crate::item::ItemDescriptor;
use crate::preview::PreviewRegistry;
use crate::session::DragState;
use crate::target::{DropOutcome, DropTarget};
use crate::test_support::{Call, MockPicker, RecordingHandler, files, images, init_logging, names};
use crate::walker::{LocalEntry, MemoryEntry};

fn image_config() -> DropTargetConfig {
    DropTargetConfig::default().with_accept("image/*")
}

fn target_with(config: DropTargetConfig) -> (DropTarget, Arc<RecordingHandler>) {
    let handler = Arc::new(RecordingHandler::new());
    let target = DropTarget::builder(config).handler(handler.clone()).build().unwrap();
    (target, handler)
}

fn completed(outcome: DropOutcome) -> crate::coordinator::DropResult {
    match outcome {
        DropOutcome::Completed(result) => result,
        other => panic!("Expected a completed drop, got {:?}", other),
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

// ========================================
// Drop scenarios
// ========================================

#[tokio::test]
async fn test_non_image_dropped_on_image_target_is_rejected() {
    let (target, handler) = target_with(image_config());
    let result = completed(target.on_drop(&DragEvent::from_files(files())).await);

    assert!(result.accepted.is_empty());
    assert_eq!(names(&result.rejected), ["file1.pdf"]);
    assert_eq!(
        handler.calls(),
        vec![
            Call::Drop {
                accepted: vec![],
                rejected: strings(&["file1.pdf"])
            },
            Call::DropRejected(strings(&["file1.pdf"])),
        ]
    );
}

#[tokio::test]
async fn test_images_dropped_on_image_target_are_accepted() {
    let (target, handler) = target_with(image_config());
    let result = completed(target.on_drop(&DragEvent::from_files(images())).await);

    assert_eq!(names(&result.accepted), ["cats.gif", "dogs.jpg"]);
    assert!(result.rejected.is_empty());
    assert_eq!(
        handler.calls(),
        vec![
            Call::Drop {
                accepted: strings(&["cats.gif", "dogs.jpg"]),
                rejected: vec![]
            },
            Call::DropAccepted(strings(&["cats.gif", "dogs.jpg"])),
        ]
    );
}

#[tokio::test]
async fn test_two_images_on_single_item_target_are_both_rejected() {
    let (target, handler) = target_with(image_config().with_multiple(false));
    let result = completed(target.on_drop(&DragEvent::from_files(images())).await);

    assert!(result.accepted.is_empty());
    assert_eq!(names(&result.rejected), ["cats.gif", "dogs.jpg"]);
    assert_eq!(handler.count(|c| matches!(c, Call::DropAccepted(_))), 0);
    assert_eq!(handler.count(|c| matches!(c, Call::DropRejected(_))), 1);
}

#[tokio::test]
async fn test_single_item_target_with_reject_excess_accepts_first() {
    let config = image_config()
        .with_multiple(false)
        .with_overflow(OverflowPolicy::RejectExcess);
    let (target, _) = target_with(config);
    let result = completed(target.on_drop(&DragEvent::from_files(images())).await);

    assert_eq!(names(&result.accepted), ["cats.gif"]);
    assert_eq!(names(&result.rejected), ["dogs.jpg"]);
}

#[tokio::test]
async fn test_min_size_rejects_smaller_files() {
    let (target, _) = target_with(DropTargetConfig::default().with_min_size(1112));
    let mut dropped = files();
    dropped.extend(images());
    let result = completed(target.on_drop(&DragEvent::from_files(dropped)).await);

    assert_eq!(names(&result.rejected), ["file1.pdf"]);
    assert_eq!(names(&result.accepted), ["cats.gif", "dogs.jpg"]);
}

#[tokio::test]
async fn test_max_size_rejects_larger_files() {
    let (target, _) = target_with(DropTargetConfig::default().with_max_size(1111));
    let mut dropped = files();
    dropped.extend(images());
    let result = completed(target.on_drop(&DragEvent::from_files(dropped)).await);

    assert_eq!(names(&result.accepted), ["file1.pdf"]);
    assert_eq!(names(&result.rejected), ["cats.gif", "dogs.jpg"]);
}

#[tokio::test]
async fn test_placeholder_mime_type_is_judged_by_extension() {
    let (target, _) = target_with(image_config());
    let bogus = vec![ItemDescriptor::file("bogus.gif", 1234, "application/x-moz-file")];
    let result = completed(target.on_drop(&DragEvent::from_files(bogus)).await);

    assert_eq!(names(&result.accepted), ["bogus.gif"]);
}

#[tokio::test]
async fn test_empty_drop_still_notifies() {
    let (target, handler) = target_with(image_config());
    let result = completed(target.on_drop(&DragEvent::from_files(vec![])).await);

    assert!(result.is_empty());
    assert_eq!(
        handler.calls(),
        vec![Call::Drop {
            accepted: vec![],
            rejected: vec![]
        }]
    );
}

#[tokio::test]
async fn test_dropped_directory_is_expanded() {
    let (target, _) = target_with(image_config());
    let folder = MemoryEntry::directory(
        "holiday",
        vec![
            MemoryEntry::file(ItemDescriptor::file("beach.jpg", 100, "image/jpeg")),
            MemoryEntry::directory(
                "docs",
                vec![MemoryEntry::file(ItemDescriptor::file("ticket.pdf", 50, "application/pdf"))],
            ),
            MemoryEntry::file(ItemDescriptor::file("sunset.png", 100, "image/png")),
        ],
    );
    let event = DragEvent::new(Arc::new(StaticTransfer::from_entries(vec![folder.into_handle()])));
    let result = completed(target.on_drop(&event).await);

    assert_eq!(names(&result.accepted), ["beach.jpg", "sunset.png"]);
    assert_eq!(names(&result.rejected), ["ticket.pdf"]);
}

#[tokio::test]
async fn test_previews_attached_unless_disabled() {
    let registry = Arc::new(PreviewRegistry::new());
    let target = DropTarget::builder(image_config())
        .previews(registry.clone())
        .build()
        .unwrap();
    let dropped = vec![ItemDescriptor::from_bytes("cats.gif", "image/gif", b"GIF89a".to_vec())];

    let result = completed(target.on_drop(&DragEvent::from_files(dropped.clone())).await);
    let preview = result.accepted[0].preview.clone().unwrap();
    assert_eq!(registry.resolve(&preview).as_deref(), Some(&b"GIF89a"[..]));

    target.set_config(image_config().with_disable_preview(true)).unwrap();
    let result = completed(target.on_drop(&DragEvent::from_files(dropped)).await);
    assert!(result.accepted[0].preview.is_none());
    assert_eq!(registry.len(), 1);
}

// ========================================
// Drag lifecycle
// ========================================

#[test]
fn test_nested_enter_leave_keeps_session_until_last_leave() {
    let (target, handler) = target_with(image_config());
    let event = DragEvent::from_files(images());

    target.on_drag_enter(&event);
    // Pointer moves onto a child: child enter arrives before the target's own leave
    target.on_drag_enter(&event);
    let state = target.on_drag_leave(&event);
    assert!(state.is_active);
    assert_eq!(handler.count(|c| *c == Call::DragLeave), 0);

    let state = target.on_drag_leave(&event);
    assert_eq!(state, DragState::default());
    assert_eq!(handler.count(|c| *c == Call::DragLeave), 1);
    assert_eq!(handler.count(|c| *c == Call::DragEnter), 2);
}

#[test]
fn test_drag_enter_classifies_candidates() {
    let (target, _) = target_with(image_config());

    let state = target.on_drag_enter(&DragEvent::from_files(images()));
    assert!(state.is_accept && !state.is_reject);

    let mut mixed = files();
    mixed.extend(images());
    let state = target.on_drag_enter(&DragEvent::from_files(mixed));
    assert!(!state.is_accept && state.is_reject);
}

#[tokio::test]
async fn test_local_file_drag_respects_min_size() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("big.gif");
    std::fs::write(&path, vec![0u8; 5000]).unwrap();
    let (target, _) = target_with(image_config().with_min_size(1112));

    let entry = LocalEntry::open(&path).await.unwrap().into_handle();
    let event = DragEvent::new(Arc::new(StaticTransfer::from_entries(vec![entry])));
    let state = target.on_drag_enter(&event);
    assert!(state.is_accept);
    assert!(!state.is_reject);

    let result = completed(target.on_drop(&event).await);
    assert_eq!(names(&result.accepted), ["big.gif"]);
}

#[test]
fn test_single_item_target_shows_accept_and_reject() {
    let (target, _) = target_with(image_config().with_multiple(false));
    let state = target.on_drag_enter(&DragEvent::from_files(images()));
    assert!(state.is_active);
    assert!(state.is_accept);
    assert!(state.is_reject);
}

#[tokio::test]
async fn test_drop_resets_drag_state() {
    let (target, _) = target_with(image_config());
    let event = DragEvent::from_files(images());
    target.on_drag_enter(&event);
    target.on_drag_enter(&event);
    target.on_drop(&event).await;

    assert_eq!(target.drag_state(), DragState::default());
    // A trailing leave after the drop must not go negative or notify
    target.on_drag_leave(&event);
    assert_eq!(target.drag_state(), DragState::default());
}

#[test]
fn test_drag_over_requests_copy_effect() {
    let (target, handler) = target_with(image_config());
    let transfer = Arc::new(StaticTransfer::from_files(images()));
    let event = DragEvent::new(transfer.clone());

    target.on_drag_over(&event);
    assert_eq!(transfer.drop_effect(), Some(DropEffect::Copy));
    assert_eq!(handler.count(|c| *c == Call::DragOver), 1);
}

#[test]
fn test_refused_drop_effect_is_swallowed() {
    init_logging();
    let (target, handler) = target_with(image_config());
    let transfer = Arc::new(StaticTransfer::from_files(images()).refusing_drop_effect());
    let event = DragEvent::new(transfer.clone());

    target.on_drag_enter(&event);
    let state = target.on_drag_over(&event);
    assert!(state.is_active);
    assert_eq!(transfer.drop_effect(), None);
    assert_eq!(handler.count(|c| *c == Call::DragOver), 1);
}

#[test]
fn test_drag_start_is_forwarded() {
    let (target, handler) = target_with(image_config());
    target.on_drag_start(&DragEvent::from_files(images()));
    assert_eq!(handler.calls(), vec![Call::DragStart]);
}

#[test]
fn test_criteria_change_mid_drag_reclassifies() {
    let (target, _) = target_with(image_config());
    target.on_drag_enter(&DragEvent::from_files(images()));
    assert!(target.drag_state().is_accept);

    let state = target.set_config(DropTargetConfig::default().with_accept(".pdf")).unwrap();
    assert!(state.is_active);
    assert!(!state.is_accept);
    assert!(state.is_reject);
}

#[test]
fn test_invalid_config_is_refused_and_kept() {
    let (target, _) = target_with(image_config());
    let invalid = DropTargetConfig::default().with_min_size(10).with_max_size(1);
    assert!(target.set_config(invalid).is_err());
    assert_eq!(target.config(), image_config());
}

#[tokio::test]
async fn test_disabled_target_ignores_everything() {
    let picker = Arc::new(MockPicker::default());
    let handler = Arc::new(RecordingHandler::new());
    let target = DropTarget::builder(image_config().with_disabled(true))
        .handler(handler.clone())
        .picker(picker.clone())
        .build()
        .unwrap();
    let event = DragEvent::from_files(images());

    target.on_drag_start(&event);
    assert_eq!(target.on_drag_enter(&event), DragState::default());
    target.on_drag_over(&event);
    target.on_drag_leave(&event);
    assert_eq!(target.on_drop(&event).await, DropOutcome::Ignored);
    assert!(!target.on_click());
    assert!(!target.open());

    assert!(handler.calls().is_empty());
    assert!(picker.requests().is_empty());
}

// ========================================
// File picker
// ========================================

fn target_with_picker(config: DropTargetConfig) -> (DropTarget, Arc<RecordingHandler>, Arc<MockPicker>) {
    let handler = Arc::new(RecordingHandler::new());
    let picker = Arc::new(MockPicker::default());
    let target = DropTarget::builder(config)
        .handler(handler.clone())
        .picker(picker.clone())
        .build()
        .unwrap();
    (target, handler, picker)
}

#[test]
fn test_click_opens_picker_with_criteria() {
    let config = DropTargetConfig::default()
        .with_accept("image/*,.PDF")
        .with_multiple(false);
    let (target, _, picker) = target_with_picker(config);
    assert!(target.on_click());
    assert!(target.is_file_dialog_active());

    let requests = picker.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].accept, "image/*,.pdf");
    assert!(!requests[0].multiple);
}

#[test]
fn test_disable_click_still_allows_open() {
    let (target, _, picker) = target_with_picker(image_config().with_disable_click(true));
    assert!(!target.on_click());
    assert!(picker.requests().is_empty());

    assert!(target.open());
    assert_eq!(picker.requests().len(), 1);
}

#[test]
fn test_open_without_picker_does_nothing() {
    let (target, _) = target_with(image_config());
    assert!(!target.open());
    assert!(!target.is_file_dialog_active());
}

#[tokio::test]
async fn test_picker_selection_matches_drop() {
    let (target, handler, _) = target_with_picker(image_config());
    let mut selected = files();
    selected.extend(images());

    let picked = completed(target.on_files_selected(selected.clone()).await);
    let dropped = completed(target.on_drop(&DragEvent::from_files(selected)).await);
    assert_eq!(picked, dropped);
    assert_eq!(handler.count(|c| matches!(c, Call::Drop { .. })), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dialog_cancel_fires_once_after_settle() {
    let (target, handler, _) = target_with_picker(image_config());
    assert!(target.open());

    let start = tokio::time::Instant::now();
    assert!(target.on_window_focus().await);
    assert!(start.elapsed() >= Duration::from_millis(300));
    assert_eq!(handler.calls(), vec![Call::FileDialogCancel]);

    // Focus without an open picker is not a cancel
    assert!(!target.on_window_focus().await);
    assert_eq!(handler.count(|c| *c == Call::FileDialogCancel), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dialog_with_selection_is_not_cancelled() {
    let (target, handler, picker) = target_with_picker(image_config());
    target.open();
    picker.select(2);

    assert!(!target.on_window_focus().await);
    assert!(!target.is_file_dialog_active());
    assert!(handler.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_selection_during_settle_prevents_cancel() {
    let (target, handler, _) = target_with_picker(image_config());
    target.open();

    let (cancelled, outcome) = tokio::join!(target.on_window_focus(), target.on_files_selected(images()));
    assert!(!cancelled);
    assert!(matches!(outcome, DropOutcome::Completed(_)));
    assert_eq!(handler.count(|c| *c == Call::FileDialogCancel), 0);
}

#[tokio::test(start_paused = true)]
async fn test_reopen_during_settle_only_cancels_latest_session() {
    let (target, handler, _) = target_with_picker(image_config());
    target.open();

    let reopen = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        target.open();
    };
    let (first, _) = tokio::join!(target.on_window_focus(), reopen);
    assert!(!first);
    assert!(target.is_file_dialog_active());

    assert!(target.on_window_focus().await);
    assert_eq!(handler.count(|c| *c == Call::FileDialogCancel), 1);
}

// ========================================
// Teardown
// ========================================

#[tokio::test(start_paused = true)]
async fn test_teardown_during_expansion_discards_result() {
    init_logging();
    let registry = Arc::new(PreviewRegistry::new());
    let handler = Arc::new(RecordingHandler::new());
    let target = DropTarget::builder(image_config())
        .handler(handler.clone())
        .previews(registry.clone())
        .build()
        .unwrap();

    let slow = MemoryEntry::directory(
        "slow",
        vec![MemoryEntry::file(ItemDescriptor::from_bytes("cats.gif", "image/gif", b"GIF89a".to_vec()))],
    )
    .with_latency(Duration::from_millis(500));
    let event = DragEvent::new(Arc::new(StaticTransfer::from_entries(vec![slow.into_handle()])));

    let unmount = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        target.teardown();
    };
    let (outcome, _) = tokio::join!(target.on_drop(&event), unmount);

    assert_eq!(outcome, DropOutcome::Discarded);
    assert!(handler.calls().is_empty());
    assert!(registry.is_empty());
    assert!(!target.is_mounted());
}

#[tokio::test]
async fn test_torn_down_target_ignores_drops() {
    let (target, handler) = target_with(image_config());
    target.teardown();
    assert_eq!(target.on_drop(&DragEvent::from_files(images())).await, DropOutcome::Ignored);
    assert!(handler.calls().is_empty());
}
