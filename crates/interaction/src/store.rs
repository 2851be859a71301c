//! Outward notifications for an external state container.

use foundation::ids::RecordIndex;
use scene::selection::SelectionSet;
use tracing::info;

/// Receives the mediator's state changes.
///
/// Only called when the value actually changed.
pub trait StoreListener {
    fn selection_changed(&self, selection: &SelectionSet);
    fn hover_changed(&self, hovered: Option<RecordIndex>);
}

/// Listener that reports every change through `tracing`.
#[derive(Debug, Default)]
pub struct TracingStore;

impl StoreListener for TracingStore {
    fn selection_changed(&self, selection: &SelectionSet) {
        let ids: Vec<u32> = selection.iter().map(|i| i.get()).collect();
        info!(count = ids.len(), ?ids, "selection changed");
    }

    fn hover_changed(&self, hovered: Option<RecordIndex>) {
        info!(hovered = ?hovered.map(|i| i.get()), "hover changed");
    }
}
