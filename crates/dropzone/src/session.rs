//! Drag session tracking for a single drop-target instance.
//!
//! Hosts deliver `dragenter`/`dragleave` for the target itself and, through bubbling, for
//! every descendant it contains. Moving the pointer from the target onto one of its children
//! fires enter(child) before leave(target), so a boolean "is dragging" flag flickers off.
//! A counter of enters minus leaves doesn't.

use serde::Serialize;

use crate::criteria::CriteriaSpec;
use crate::filter;
use crate::item::ItemDescriptor;

/// Externally visible drag flags, for rendering.
///
/// `is_accept` and `is_reject` may both be true for a mixed candidate set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragState {
    pub is_active: bool,
    pub is_accept: bool,
    pub is_reject: bool,
}

/// Per-instance drag session: enter depth, candidate items, and the derived flags.
#[derive(Debug, Default)]
pub struct DragSessionTracker {
    enter_depth: u32,
    candidates: Vec<ItemDescriptor>,
    state: DragState,
}

impl DragSessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn enter_depth(&self) -> u32 {
        self.enter_depth
    }

    pub fn candidates(&self) -> &[ItemDescriptor] {
        &self.candidates
    }

    pub fn is_dragging(&self) -> bool {
        self.enter_depth > 0
    }

    /// Counts an enter and re-derives the flags from `candidates` under `criteria`.
    pub fn on_enter(&mut self, candidates: Vec<ItemDescriptor>, criteria: &CriteriaSpec) -> DragState {
        self.enter_depth = self.enter_depth.saturating_add(1);
        self.candidates = candidates;
        self.classify(criteria);
        self.state
    }

    /// Counts a leave. Returns true when this leave ended the session.
    ///
    /// A leave at depth 0 is a no-op.
    pub fn on_leave(&mut self) -> bool {
        if self.enter_depth == 0 {
            return false;
        }
        self.enter_depth -= 1;
        if self.enter_depth > 0 {
            return false;
        }
        self.reset();
        true
    }

    /// Ends the session regardless of the counter.
    pub fn on_drop(&mut self) {
        self.reset();
    }

    /// Re-derives the flags of an active session after the criteria changed.
    pub fn reevaluate(&mut self, criteria: &CriteriaSpec) -> DragState {
        if self.is_dragging() {
            self.classify(criteria);
        }
        self.state
    }

    fn reset(&mut self) {
        self.enter_depth = 0;
        self.candidates.clear();
        self.state = DragState::default();
    }

    fn classify(&mut self, criteria: &CriteriaSpec) {
        // Directory entries can't be inspected before drop; only files take part.
        let all_pass = self
            .candidates
            .iter()
            .filter(|item| item.is_file())
            .all(|item| filter::passes(item, criteria));
        let too_many = criteria.exceeds_cardinality(self.candidates.len());

        self.state = DragState {
            is_active: true,
            is_accept: all_pass,
            is_reject: !all_pass || too_many,
        };
    }
}
