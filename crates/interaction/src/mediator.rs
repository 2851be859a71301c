//! Single writer of the shared interaction state.
//!
//! Views report gestures through [`InteractionHandler`]; the mediator only
//! queues them, because the reporting view is still mutably borrowed at that
//! point. [`Mediator::flush`] applies the queue in order and pushes the
//! resulting state to every registered view, the originating one included.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use formats::dataset::Record;
use foundation::ids::RecordIndex;
use scene::selection::SelectionSet;
use tracing::{debug, warn};
use views::engine::{InteractionEvent, InteractionHandler, RenderEngine};

use crate::state::SharedInteractionState;
use crate::store::StoreListener;

pub type SharedView = Rc<RefCell<dyn RenderEngine>>;

struct Registration {
    id: u64,
    view: Weak<RefCell<dyn RenderEngine>>,
}

#[derive(Default)]
struct Inner {
    state: RefCell<SharedInteractionState>,
    pending: RefCell<VecDeque<InteractionEvent>>,
    views: RefCell<Vec<Registration>>,
    listeners: RefCell<Vec<Rc<dyn StoreListener>>>,
    next_id: Cell<u64>,
    broadcasts: Cell<u64>,
}

/// Cheap-to-clone handle; clones share one state.
#[derive(Clone, Default)]
pub struct Mediator {
    inner: Rc<Inner>,
}

/// Keeps a view registered with a [`Mediator`]. Dropping it unregisters.
#[must_use = "dropping a Subscription unregisters the view"]
pub struct Subscription {
    mediator: Weak<Inner>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.mediator.upgrade() {
            inner.views.borrow_mut().retain(|r| r.id != self.id);
        }
    }
}

impl Mediator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler to pass to `RenderEngine::render`.
    pub fn handler(&self) -> Rc<dyn InteractionHandler> {
        Rc::new(self.clone())
    }

    pub fn subscribe<V: RenderEngine + 'static>(&self, view: &Rc<RefCell<V>>) -> Subscription {
        let shared: SharedView = view.clone();
        self.subscribe_shared(&shared)
    }

    pub fn subscribe_shared(&self, view: &SharedView) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.views.borrow_mut().push(Registration {
            id,
            view: Rc::downgrade(view),
        });
        Subscription {
            mediator: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn add_store_listener(&self, listener: Rc<dyn StoreListener>) {
        self.inner.listeners.borrow_mut().push(listener);
    }

    /// Snapshot of the current shared state.
    pub fn state(&self) -> SharedInteractionState {
        self.inner.state.borrow().clone()
    }

    /// Registered views that are still alive.
    pub fn view_count(&self) -> usize {
        self.inner
            .views
            .borrow()
            .iter()
            .filter(|r| r.view.strong_count() > 0)
            .count()
    }

    pub fn pending(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    /// Number of state pushes to the views so far.
    pub fn broadcasts(&self) -> u64 {
        self.inner.broadcasts.get()
    }

    pub fn on_click(&self, record: &Record) {
        debug!(record = %record.index(), "click");
        self.set_selection(SelectionSet::single(record.index()));
    }

    pub fn on_hover_enter(&self, record: &Record) {
        debug!(record = %record.index(), "hover enter");
        self.set_hovered(Some(record.index()));
    }

    pub fn on_hover_leave(&self) {
        debug!("hover leave");
        self.set_hovered(None);
    }

    /// Replaces the selection with `records`; an empty slice clears it.
    pub fn on_brush_change(&self, records: &[Rc<Record>]) {
        debug!(count = records.len(), "brush change");
        self.set_selection(records.iter().map(|r| r.index()).collect());
    }

    /// Applies queued view events in arrival order. Returns how many ran.
    pub fn flush(&self) -> usize {
        let mut applied = 0;
        loop {
            let next = self.inner.pending.borrow_mut().pop_front();
            let Some(event) = next else { break };
            match event {
                InteractionEvent::Click(record) => self.on_click(&record),
                InteractionEvent::HoverEnter(record) => self.on_hover_enter(&record),
                InteractionEvent::HoverLeave => self.on_hover_leave(),
                InteractionEvent::Brush(records) => self.on_brush_change(&records),
            }
            applied += 1;
        }
        applied
    }

    fn set_selection(&self, selection: SelectionSet) {
        let changed = self.inner.state.borrow_mut().set_selected(selection);
        if changed {
            let state = self.state();
            for listener in self.listeners() {
                listener.selection_changed(state.selected());
            }
        }
        self.broadcast();
    }

    fn set_hovered(&self, hovered: Option<RecordIndex>) {
        let changed = self.inner.state.borrow_mut().set_hovered(hovered);
        if changed {
            for listener in self.listeners() {
                listener.hover_changed(hovered);
            }
        }
        self.broadcast();
    }

    fn listeners(&self) -> Vec<Rc<dyn StoreListener>> {
        self.inner.listeners.borrow().clone()
    }

    /// Pushes the state to every live view. Dead registrations are pruned.
    fn broadcast(&self) {
        let views: Vec<SharedView> = {
            let mut registrations = self.inner.views.borrow_mut();
            registrations.retain(|r| r.view.strong_count() > 0);
            registrations.iter().filter_map(|r| r.view.upgrade()).collect()
        };
        let state = self.state();
        for view in views {
            match view.try_borrow_mut() {
                Ok(mut view) => {
                    view.set_selection(state.selected());
                    view.set_hovered(state.hovered());
                }
                Err(_) => warn!("view busy during broadcast; call flush outside view callbacks"),
            }
        }
        self.inner.broadcasts.set(self.inner.broadcasts.get() + 1);
    }
}

impl InteractionHandler for Mediator {
    fn handle(&self, event: InteractionEvent) {
        self.inner.pending.borrow_mut().push_back(event);
    }
}
