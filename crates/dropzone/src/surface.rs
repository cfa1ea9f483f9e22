//! The host-side tree of mounted drop targets.
//!
//! Targets can be nested. A drag event hitting an inner target bubbles through every
//! ancestor, innermost first, like a DOM event would, so each target keeps its own enter/leave
//! count for the same physical gesture. Events outside every target are answered at document
//! level, where stray drops are suppressed so the host doesn't navigate to the dropped file.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::SurfaceError;
use crate::event::DragEvent;
use crate::ignore_poison::IgnorePoison;
use crate::target::{DropOutcome, DropTarget};

/// Identifies a mounted target within its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the host should do with a document-level drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentDropAction {
    /// Suppress the host's default handling (opening the file)
    PreventDefault,
    /// Let the event through
    Allow,
}

struct Node {
    target: Arc<DropTarget>,
    parent: Option<TargetId>,
}

#[derive(Default)]
pub struct DropSurface {
    nodes: Mutex<HashMap<TargetId, Node>>,
    next_id: AtomicU64,
}

impl DropSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts `target`, nested inside `parent` if given.
    pub fn mount(&self, target: Arc<DropTarget>, parent: Option<TargetId>) -> Result<TargetId, SurfaceError> {
        if !target.is_mounted() {
            return Err(SurfaceError::TornDown);
        }
        let mut nodes = self.nodes.lock_ignore_poison();
        if let Some(parent) = parent
            && !nodes.contains_key(&parent)
        {
            return Err(SurfaceError::UnknownTarget(parent));
        }
        let id = TargetId(self.next_id.fetch_add(1, Ordering::Relaxed));
        nodes.insert(id, Node { target, parent });
        log::debug!("Mounted drop target {} (parent: {:?})", id, parent);
        Ok(id)
    }

    /// Unmounts a target and everything nested inside it, tearing each one down.
    pub fn unmount(&self, id: TargetId) -> Result<(), SurfaceError> {
        let removed = {
            let mut nodes = self.nodes.lock_ignore_poison();
            if !nodes.contains_key(&id) {
                return Err(SurfaceError::UnknownTarget(id));
            }
            let doomed: Vec<TargetId> = nodes
                .keys()
                .copied()
                .filter(|candidate| is_within(&nodes, *candidate, id))
                .collect();
            doomed
                .into_iter()
                .filter_map(|doomed_id| nodes.remove(&doomed_id))
                .map(|node| node.target)
                .collect::<Vec<_>>()
        };
        log::debug!("Unmounted drop target {} ({} targets torn down)", id, removed.len());
        for target in removed {
            target.teardown();
        }
        Ok(())
    }

    pub fn get(&self, id: TargetId) -> Option<Arc<DropTarget>> {
        self.nodes.lock_ignore_poison().get(&id).map(|node| Arc::clone(&node.target))
    }

    pub fn len(&self) -> usize {
        self.nodes.lock_ignore_poison().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The target and its ancestors, innermost first.
    fn chain(&self, id: TargetId) -> Result<Vec<Arc<DropTarget>>, SurfaceError> {
        let nodes = self.nodes.lock_ignore_poison();
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(current_id) = current {
            let node = nodes.get(&current_id).ok_or(SurfaceError::UnknownTarget(current_id))?;
            chain.push(Arc::clone(&node.target));
            current = node.parent;
        }
        Ok(chain)
    }

    // ========================================
    // Bubbling dispatch
    // ========================================
    //
    // Each dispatch visits the chain innermost first and stops once a handler stopped
    // propagation on the event.

    pub fn dispatch_drag_enter(&self, id: TargetId, event: &DragEvent) -> Result<(), SurfaceError> {
        for target in self.chain(id)? {
            target.on_drag_enter(event);
            if event.is_propagation_stopped() {
                break;
            }
        }
        Ok(())
    }

    pub fn dispatch_drag_over(&self, id: TargetId, event: &DragEvent) -> Result<(), SurfaceError> {
        for target in self.chain(id)? {
            target.on_drag_over(event);
            if event.is_propagation_stopped() {
                break;
            }
        }
        Ok(())
    }

    pub fn dispatch_drag_leave(&self, id: TargetId, event: &DragEvent) -> Result<(), SurfaceError> {
        for target in self.chain(id)? {
            target.on_drag_leave(event);
            if event.is_propagation_stopped() {
                break;
            }
        }
        Ok(())
    }

    /// Delivers a drop to the target and its ancestors. Returns one outcome per target reached.
    pub async fn dispatch_drop(&self, id: TargetId, event: &DragEvent) -> Result<Vec<DropOutcome>, SurfaceError> {
        let chain = self.chain(id)?;
        let mut outcomes = Vec::with_capacity(chain.len());
        for target in chain {
            outcomes.push(target.on_drop(event).await);
            if event.is_propagation_stopped() {
                break;
            }
        }
        Ok(outcomes)
    }

    // ========================================
    // Document level
    // ========================================

    fn any_prevents_document_drops(&self) -> bool {
        self.nodes
            .lock_ignore_poison()
            .values()
            .any(|node| node.target.prevents_document_drops())
    }

    /// A dragover anywhere in the document. Must be suppressed for the drop to be ours.
    pub fn on_document_drag_over(&self) -> DocumentDropAction {
        if self.any_prevents_document_drops() {
            DocumentDropAction::PreventDefault
        } else {
            DocumentDropAction::Allow
        }
    }

    /// A drop anywhere in the document; `inside` is the innermost target it landed in, if any.
    ///
    /// A stray drop ends the drag sessions of suppressing targets, which never saw it.
    pub fn on_document_drop(&self, inside: Option<TargetId>) -> DocumentDropAction {
        if let Some(id) = inside
            && self.get(id).is_some()
        {
            return DocumentDropAction::Allow;
        }

        let suppressing: Vec<Arc<DropTarget>> = self
            .nodes
            .lock_ignore_poison()
            .values()
            .filter(|node| node.target.prevents_document_drops())
            .map(|node| Arc::clone(&node.target))
            .collect();
        if suppressing.is_empty() {
            return DocumentDropAction::Allow;
        }
        log::debug!("Suppressing drop outside every drop target");
        for target in suppressing {
            target.reset_drag();
        }
        DocumentDropAction::PreventDefault
    }
}

/// Whether `candidate` is `ancestor` or nested anywhere inside it.
fn is_within(nodes: &HashMap<TargetId, Node>, candidate: TargetId, ancestor: TargetId) -> bool {
    let mut current = Some(candidate);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = nodes.get(&id).and_then(|node| node.parent);
    }
    false
}
