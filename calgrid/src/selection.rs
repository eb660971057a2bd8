use crate::ResourceKey;

/// An inclusive column range on one resource.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection<K> {
    pub resource_key: K,
    pub start_index: usize,
    pub end_index: usize,
}

impl<K: PartialEq> Selection<K> {
    pub fn contains(&self, key: &K, index: usize) -> bool {
        self.resource_key == *key && index >= self.start_index && index <= self.end_index
    }
}

/// Which cells may start or extend a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub allow_selection: bool,
    pub allow_select_in_past: bool,
}

impl SelectionPolicy {
    fn admits(&self, is_past: bool) -> bool {
        self.allow_selection && (self.allow_select_in_past || !is_past)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum DragState<K> {
    Idle,
    Dragging {
        selection: Selection<K>,
        anchor: usize,
    },
}

/// Drag-to-select state machine: `Idle -> Dragging -> Idle`.
///
/// At most one selection exists across the whole grid; starting a drag on another resource
/// replaces it.
#[derive(Clone, Debug)]
pub struct SelectionController<K> {
    state: DragState<K>,
}

impl<K> Default for SelectionController<K> {
    fn default() -> Self {
        Self {
            state: DragState::Idle,
        }
    }
}

impl<K: ResourceKey> SelectionController<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<&Selection<K>> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { selection, .. } => Some(selection),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn is_selected(&self, key: &K, index: usize) -> bool {
        self.selection().is_some_and(|s| s.contains(key, index))
    }

    /// Starts a selection on `(key, index)`. Returns `false` when the policy rejects the cell.
    pub fn drag_start(
        &mut self,
        key: K,
        index: usize,
        is_past: bool,
        policy: SelectionPolicy,
    ) -> bool {
        if !policy.admits(is_past) {
            return false;
        }
        self.state = DragState::Dragging {
            selection: Selection {
                resource_key: key,
                start_index: index,
                end_index: index,
            },
            anchor: index,
        };
        true
    }

    /// Moves the selection toward `index`.
    ///
    /// An index past either edge extends that edge. An index inside the selection pulls in the
    /// edge opposite the anchor. Cells on another resource, or rejected by the policy, are
    /// ignored. Returns `true` when the selection changed.
    pub fn drag_over(&mut self, key: &K, index: usize, is_past: bool, policy: SelectionPolicy) -> bool {
        let DragState::Dragging { selection, anchor } = &mut self.state else {
            return false;
        };
        if selection.resource_key != *key || !policy.admits(is_past) {
            return false;
        }

        let before = (selection.start_index, selection.end_index);
        if index < selection.start_index {
            selection.start_index = index;
        } else if index > selection.end_index {
            selection.end_index = index;
        } else if *anchor == selection.start_index {
            selection.end_index = index;
        } else {
            selection.start_index = index;
        }
        before != (selection.start_index, selection.end_index)
    }

    /// Ends the drag. Returns the committed selection, or `None` when nothing was selected.
    pub fn mouse_up(&mut self) -> Option<Selection<K>> {
        match core::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => None,
            DragState::Dragging { selection, .. } => Some(selection),
        }
    }

    /// Drops any active selection without committing it.
    pub fn clear(&mut self) -> bool {
        let had = self.is_dragging();
        self.state = DragState::Idle;
        had
    }
}
