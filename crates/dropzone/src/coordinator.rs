//! Drop processing: expansion, partitioning, previews, and emission.

use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;

use crate::criteria::{CriteriaSpec, OverflowPolicy};
use crate::event::{DragEvent, TransferItem};
use crate::filter;
use crate::handler::DropHandler;
use crate::item::ItemDescriptor;
use crate::preview::PreviewFactory;
use crate::walker::DirectoryWalker;

/// The partition of a drop. Both lists keep the order of the expanded input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropResult {
    pub accepted: Vec<ItemDescriptor>,
    pub rejected: Vec<ItemDescriptor>,
}

impl DropResult {
    pub fn len(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns the raw items of a drop into a [`DropResult`].
#[derive(Clone)]
pub struct DropCoordinator {
    walker: DirectoryWalker,
    previews: Option<Arc<dyn PreviewFactory>>,
}

impl DropCoordinator {
    pub fn new(walker: DirectoryWalker) -> Self {
        Self { walker, previews: None }
    }

    pub fn with_previews(mut self, previews: Arc<dyn PreviewFactory>) -> Self {
        self.previews = Some(previews);
        self
    }

    pub fn walker(&self) -> &DirectoryWalker {
        &self.walker
    }

    /// Replaces every entry with the files it contains, in place.
    ///
    /// Entries are expanded concurrently but spliced in input order.
    pub async fn expand(&self, items: Vec<TransferItem>) -> Vec<ItemDescriptor> {
        let expanded: Vec<Vec<ItemDescriptor>> = stream::iter(items)
            .map(|item| async move {
                match item {
                    TransferItem::File(descriptor) if descriptor.is_file() => vec![descriptor],
                    TransferItem::File(descriptor) => {
                        // A directory descriptor without an entry handle can't be enumerated
                        log::warn!("Dropping directory {} that came without an entry", descriptor.name);
                        Vec::new()
                    }
                    TransferItem::Entry(entry) => self.walker.walk(Some(entry)).await,
                }
            })
            .buffered(self.walker.concurrency())
            .collect()
            .await;
        expanded.into_iter().flatten().collect()
    }

    /// Splits expanded items into accepted and rejected.
    ///
    /// Nothing is dropped: every input item lands in exactly one list.
    pub fn partition(items: Vec<ItemDescriptor>, criteria: &CriteriaSpec) -> DropResult {
        let mut result = DropResult::default();
        let over_limit = criteria.exceeds_cardinality(items.len());

        if over_limit && criteria.overflow == OverflowPolicy::RejectAll {
            log::debug!(
                "Rejecting all {} items, target allows {:?}",
                items.len(),
                criteria.max_items
            );
            result.rejected = items;
            return result;
        }

        let limit = criteria.max_items.map_or(usize::MAX, |max| max as usize);
        for (index, item) in items.into_iter().enumerate() {
            if index < limit && filter::passes(&item, criteria) {
                result.accepted.push(item);
            } else {
                result.rejected.push(item);
            }
        }
        result
    }

    /// Attaches a preview reference to each item. A failed preview leaves the item as it was.
    pub async fn attach_previews(&self, items: &mut [ItemDescriptor]) {
        let Some(previews) = &self.previews else {
            return;
        };
        for item in items.iter_mut() {
            let created = previews.create_preview(item).await;
            match created {
                Ok(preview) => item.preview = Some(preview),
                Err(e) => log::warn!("No preview for {}: {}", item.name, e),
            }
        }
    }

    /// Revokes previews attached to a result that will never be delivered.
    pub fn discard_previews(&self, result: &mut DropResult) {
        let Some(previews) = &self.previews else {
            return;
        };
        for item in result.accepted.iter_mut() {
            if let Some(preview) = item.preview.take() {
                previews.revoke_preview(&preview);
            }
        }
    }

    /// Expands, partitions, and (optionally) attaches previews to accepted items.
    pub async fn process(&self, items: Vec<TransferItem>, criteria: &CriteriaSpec, with_previews: bool) -> DropResult {
        let expanded = self.expand(items).await;
        let mut result = Self::partition(expanded, criteria);
        if with_previews {
            self.attach_previews(&mut result.accepted).await;
        }
        log::debug!(
            "Drop processed: {} accepted, {} rejected",
            result.accepted.len(),
            result.rejected.len()
        );
        result
    }

    /// Sends the drop notifications: `on_drop` always, the others only for non-empty lists.
    pub fn emit(handler: &dyn DropHandler, result: &DropResult, event: &DragEvent) {
        handler.on_drop(&result.accepted, &result.rejected, event);
        if !result.accepted.is_empty() {
            handler.on_drop_accepted(&result.accepted, event);
        }
        if !result.rejected.is_empty() {
            handler.on_drop_rejected(&result.rejected, event);
        }
    }
}
