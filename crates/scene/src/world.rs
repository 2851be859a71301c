use std::collections::BTreeMap;

use crate::entity::ElementKey;

/// Lifecycle of a retained element.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Live,
    /// Playing its exit transition; removed once that finishes.
    Exiting,
}

#[derive(Debug, Clone)]
struct Slot<E> {
    element: E,
    phase: Phase,
}

/// Retained visual elements of one view, keyed by [`ElementKey`].
///
/// Iteration is in key order, which is also paint order.
#[derive(Debug, Clone)]
pub struct World<E> {
    slots: BTreeMap<ElementKey, Slot<E>>,
}

impl<E> Default for World<E> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<E> World<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements, exiting ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn live_len(&self) -> usize {
        self.slots
            .values()
            .filter(|s| s.phase == Phase::Live)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, key: &ElementKey) -> bool {
        self.slots.contains_key(key)
    }

    pub fn phase(&self, key: &ElementKey) -> Option<Phase> {
        self.slots.get(key).map(|s| s.phase)
    }

    pub fn get(&self, key: &ElementKey) -> Option<&E> {
        self.slots.get(key).map(|s| &s.element)
    }

    pub fn get_mut(&mut self, key: &ElementKey) -> Option<&mut E> {
        self.slots.get_mut(key).map(|s| &mut s.element)
    }

    /// Inserts (or replaces) a live element.
    pub fn insert(&mut self, key: ElementKey, element: E) {
        self.slots.insert(
            key,
            Slot {
                element,
                phase: Phase::Live,
            },
        );
    }

    /// Flags an element as exiting. Returns `true` if it was live.
    pub fn mark_exiting(&mut self, key: &ElementKey) -> bool {
        match self.slots.get_mut(key) {
            Some(slot) if slot.phase == Phase::Live => {
                slot.phase = Phase::Exiting;
                true
            }
            _ => false,
        }
    }

    /// Cancels a pending exit. Returns `true` if the element was exiting.
    pub fn revive(&mut self, key: &ElementKey) -> bool {
        match self.slots.get_mut(key) {
            Some(slot) if slot.phase == Phase::Exiting => {
                slot.phase = Phase::Live;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, key: &ElementKey) -> Option<E> {
        self.slots.remove(key).map(|s| s.element)
    }

    /// Removes exiting elements for which `done` holds; returns their keys.
    pub fn sweep_exited(&mut self, mut done: impl FnMut(&E) -> bool) -> Vec<ElementKey> {
        let finished: Vec<ElementKey> = self
            .slots
            .iter()
            .filter(|(_, s)| s.phase == Phase::Exiting && done(&s.element))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &finished {
            self.slots.remove(key);
        }
        finished
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Every key, exiting elements included.
    pub fn keys(&self) -> impl Iterator<Item = &ElementKey> + '_ {
        self.slots.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ElementKey, &E, Phase)> + '_ {
        self.slots.iter().map(|(k, s)| (k, &s.element, s.phase))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ElementKey, &mut E, Phase)> + '_ {
        self.slots
            .iter_mut()
            .map(|(k, s)| (k, &mut s.element, s.phase))
    }

    pub fn live(&self) -> impl Iterator<Item = (&ElementKey, &E)> + '_ {
        self.slots
            .iter()
            .filter(|(_, s)| s.phase == Phase::Live)
            .map(|(k, s)| (k, &s.element))
    }
}
