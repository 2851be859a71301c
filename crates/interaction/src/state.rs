use foundation::ids::RecordIndex;
use scene::selection::SelectionSet;

/// Selection and hover shared by every linked view.
///
/// `hovered` need not be part of `selected`; views show both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedInteractionState {
    selected: SelectionSet,
    hovered: Option<RecordIndex>,
}

impl SharedInteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &SelectionSet {
        &self.selected
    }

    pub fn hovered(&self) -> Option<RecordIndex> {
        self.hovered
    }

    /// Returns `true` if the selection changed.
    pub(crate) fn set_selected(&mut self, selected: SelectionSet) -> bool {
        if self.selected == selected {
            return false;
        }
        self.selected = selected;
        true
    }

    /// Returns `true` if the hovered record changed.
    pub(crate) fn set_hovered(&mut self, hovered: Option<RecordIndex>) -> bool {
        if self.hovered == hovered {
            return false;
        }
        self.hovered = hovered;
        true
    }
}
