//! Undo/redo history for tracking and reversing map mutations.
//!
//! Every mutating operation on a drawing records one [`UndoAction`] carrying
//! exactly the data its inverse needs. The history also owns the replay
//! guard: while an undo or redo is being applied, the mutators it calls still
//! run normally but their log attempts are dropped here in [`UndoHistory::push_action`],
//! so no mutator needs to special-case replay.

use crate::types::{HexIndex, TextStyle, VertexRef};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_UNDO_HISTORY;

/// Represents different kinds of map mutations that can be undone.
///
/// Element-removal inverses (`BoundaryAdded`, `PathAdded`, `TextAdded`) are
/// resolved by structural matching on the recorded fields rather than stored
/// handles, so the history stays plain serializable data and the same logical
/// element can be drawn and erased repeatedly across a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UndoAction {
    /// A single hex was repainted.
    FillChanged {
        /// The repainted cell.
        index: HexIndex,
        /// Fill before the change.
        old: String,
        /// Fill after the change.
        new: String,
    },
    /// The canvas background color was swapped, repainting matching hexes.
    CanvasRecolored {
        /// Background before the change.
        old: String,
        /// Background after the change.
        new: String,
    },
    /// The grid line color was changed.
    GridRecolored {
        /// Stroke before the change.
        old: String,
        /// Stroke after the change.
        new: String,
    },
    /// The grid line thickness was changed.
    GridThicknessChanged {
        /// Thickness before the change.
        old: f32,
        /// Thickness after the change.
        new: f32,
    },
    /// A connected region was flood-filled; one entry covers the whole region
    /// so one undo press reverses the entire fill.
    FloodFilled {
        /// Every cell the fill touched.
        indices: Vec<HexIndex>,
        /// The region's uniform fill before the change.
        old: String,
        /// Fill after the change.
        new: String,
    },
    /// A hex's stamped object was placed, replaced or cleared.
    StampChanged {
        /// The affected cell.
        index: HexIndex,
        /// Stamp before the change.
        old: Option<String>,
        /// Stamp after the change.
        new: Option<String>,
    },
    /// A boundary edge was drawn.
    BoundaryAdded {
        /// One endpoint.
        from: VertexRef,
        /// The other endpoint.
        to: VertexRef,
        /// Stroke color.
        color: String,
    },
    /// A boundary edge was removed by the eraser.
    BoundaryErased {
        /// One endpoint.
        from: VertexRef,
        /// The other endpoint.
        to: VertexRef,
        /// Stroke color.
        color: String,
    },
    /// A path segment was drawn.
    PathAdded {
        /// Starting hex.
        from: HexIndex,
        /// Ending hex.
        to: HexIndex,
        /// Dashed line color.
        line_color: String,
        /// Highlight color.
        highlight_color: String,
    },
    /// A path segment was removed by the eraser.
    PathErased {
        /// Starting hex.
        from: HexIndex,
        /// Ending hex.
        to: HexIndex,
        /// Dashed line color.
        line_color: String,
        /// Highlight color.
        highlight_color: String,
    },
    /// A text item was placed.
    TextAdded {
        /// Anchor position.
        pos: (f32, f32),
        /// Text content.
        content: String,
        /// Full styling, needed to recreate the item on redo of an erase.
        style: TextStyle,
    },
    /// A text item was removed by the eraser.
    TextErased {
        /// Anchor position.
        pos: (f32, f32),
        /// Text content.
        content: String,
        /// Full styling recorded so undo can recreate the item exactly.
        style: TextStyle,
    },
}

/// Manages undo/redo history for a drawing session.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UndoHistory {
    /// Stack of actions that can be undone
    #[serde(skip)]
    undo_stack: Vec<UndoAction>,
    /// Stack of actions that can be redone
    #[serde(skip)]
    redo_stack: Vec<UndoAction>,
    /// Guard flag: while set, `push_action` drops everything, so mutators
    /// replayed during undo/redo don't re-log themselves.
    #[serde(skip)]
    replaying: bool,
}

impl UndoHistory {
    /// Creates a new empty undo history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an action, unless a replay is in progress.
    ///
    /// A fresh action invalidates anything previously undone, so the redo
    /// stack is cleared. History is capped at [`MAX_UNDO_HISTORY`] entries.
    pub fn push_action(&mut self, action: UndoAction) {
        if self.replaying {
            return;
        }
        self.undo_stack.push(action);
        self.redo_stack.clear();

        // Limit undo history size
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Marks the start or end of an undo/redo replay. While marked, all
    /// `push_action` calls are dropped.
    pub fn set_replaying(&mut self, replaying: bool) {
        self.replaying = replaying;
    }

    /// Whether a replay is currently in progress.
    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Returns true if there are actions that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are actions that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of recorded undoable actions.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Pops the most recent action from the undo stack, or `None` if empty.
    pub fn pop_undo(&mut self) -> Option<UndoAction> {
        self.undo_stack.pop()
    }

    /// Pops the most recent action from the redo stack, or `None` if empty.
    pub fn pop_redo(&mut self) -> Option<UndoAction> {
        self.redo_stack.pop()
    }

    /// Pushes an undone action onto the redo stack.
    pub fn push_redo(&mut self, action: UndoAction) {
        self.redo_stack.push(action);
    }

    /// Pushes a redone action back onto the undo stack without clearing the
    /// redo stack (unlike `push_action`).
    pub fn push_undo(&mut self, action: UndoAction) {
        self.undo_stack.push(action);
    }

    /// Clears all undo and redo history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_action(n: i32) -> UndoAction {
        UndoAction::FillChanged {
            index: HexIndex::new(n, 0),
            old: "old".to_string(),
            new: "new".to_string(),
        }
    }

    #[test]
    fn test_push_and_pop() {
        let mut history = UndoHistory::new();
        assert!(!history.can_undo());

        history.push_action(fill_action(1));
        assert!(history.can_undo());
        assert_eq!(history.undo_depth(), 1);

        assert!(history.pop_undo().is_some());
        assert!(history.pop_undo().is_none());
    }

    #[test]
    fn test_push_is_dropped_while_replaying() {
        let mut history = UndoHistory::new();
        history.set_replaying(true);
        history.push_action(fill_action(1));
        assert!(!history.can_undo());

        history.set_replaying(false);
        history.push_action(fill_action(2));
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_fresh_action_clears_redo() {
        let mut history = UndoHistory::new();
        history.push_redo(fill_action(1));
        assert!(history.can_redo());

        history.push_action(fill_action(2));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_undo_preserves_redo() {
        let mut history = UndoHistory::new();
        history.push_redo(fill_action(1));
        history.push_undo(fill_action(2));
        assert!(history.can_redo());
        assert!(history.can_undo());
    }

    #[test]
    fn test_history_is_capped() {
        let mut history = UndoHistory::new();
        for i in 0..(MAX_UNDO_HISTORY as i32 + 10) {
            history.push_action(fill_action(i));
        }
        assert_eq!(history.undo_depth(), MAX_UNDO_HISTORY);

        // the oldest entries were the ones dropped
        let mut last = None;
        while let Some(action) = history.pop_undo() {
            last = Some(action);
        }
        match last {
            Some(UndoAction::FillChanged { index, .. }) => assert_eq!(index.col, 10),
            other => panic!("unexpected bottom of stack: {:?}", other),
        }
    }
}
