//! The drawing session: one open document plus everything needed to edit it.
//!
//! A [`DrawingSession`] owns the [`HexMap`], the undo/redo history, the
//! current layer/tool selection, the per-layer color and object choices, and
//! the in-progress gesture state for boundary and path drawing. UI event
//! handlers resolve pointer positions to hex indices and call the mutators
//! here; every externally visible mutation records exactly one undo action.
//!
//! Undo and redo replay inverses through these same mutators. The history's
//! replay guard (checked inside its `push_action`) keeps those replays from
//! logging themselves.

use crate::constants::*;
use crate::types::{HexIndex, HexMap, Orientation, TextStyle, VertexRef};
use crate::undo::{UndoAction, UndoHistory};
use serde::{Deserialize, Serialize};

/// Drawing layers, selected one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Layer {
    /// Grid settings: canvas color, grid color/thickness, orientation.
    Grid,
    /// Hex fill painting.
    #[default]
    Color,
    /// Emoji/object stamps on hexes.
    Object,
    /// Boundary lines along hex edges.
    Boundary,
    /// Paths between hex centers.
    Path,
    /// Free-floating text.
    Text,
}

impl Layer {
    /// All layers in display order.
    pub const ALL: [Layer; 6] = [
        Layer::Grid,
        Layer::Color,
        Layer::Object,
        Layer::Boundary,
        Layer::Path,
        Layer::Text,
    ];

    /// Human-readable name for toolbars.
    pub fn label(&self) -> &'static str {
        match self {
            Layer::Grid => "Grid",
            Layer::Color => "Color",
            Layer::Object => "Object",
            Layer::Boundary => "Boundary",
            Layer::Path => "Path",
            Layer::Text => "Text",
        }
    }

    /// Which tools make sense on this layer. The grid layer is driven
    /// entirely from its control panel, so it allows none.
    pub fn allowed_tools(&self) -> &'static [Tool] {
        match self {
            Layer::Grid => &[],
            Layer::Color => &[Tool::Brush, Tool::Fill, Tool::Eraser, Tool::Eyedropper],
            Layer::Object => &[Tool::Brush, Tool::Eraser, Tool::Eyedropper],
            Layer::Path => &[Tool::Brush, Tool::Eraser, Tool::Select],
            Layer::Boundary => &[Tool::Brush, Tool::Eraser],
            Layer::Text => &[Tool::Brush, Tool::Eraser, Tool::Select],
        }
    }
}

/// Editing tools. Availability depends on the active layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Tool {
    /// Select/move elements (paths and text).
    Select,
    /// Paint, stamp, or draw depending on the layer.
    #[default]
    Brush,
    /// Flood fill a connected same-color region.
    Fill,
    /// Pick a color or object from the map.
    Eyedropper,
    /// Remove elements under the cursor.
    Eraser,
}

impl Tool {
    /// Human-readable name for toolbars.
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Brush => "Brush",
            Tool::Fill => "Fill",
            Tool::Eyedropper => "Eyedropper",
            Tool::Eraser => "Eraser",
        }
    }
}

/// A primary/secondary color pair. Left-button actions use the primary,
/// right-button actions the secondary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorPair {
    /// Color used by left-button actions.
    pub primary: String,
    /// Color used by right-button actions.
    pub secondary: String,
}

impl ColorPair {
    fn new(primary: &str, secondary: &str) -> Self {
        Self {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        }
    }

    /// Picks one side of the pair.
    pub fn pick(&self, secondary: bool) -> &str {
        if secondary {
            &self.secondary
        } else {
            &self.primary
        }
    }
}

/// In-progress boundary-drawing gesture.
///
/// `Drawing` holds the corner the next segment will start from; pointer
/// release drops back to `Idle` and never commits a partial edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryGesture {
    /// No gesture active.
    #[default]
    Idle,
    /// Anchored at a corner, waiting for a legal next corner.
    Drawing {
        /// The anchored corner.
        last: VertexRef,
    },
}

/// In-progress path-drawing gesture, anchored at the last brushed hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathGesture {
    /// No gesture active.
    #[default]
    Idle,
    /// Anchored at a hex, waiting for a different hex to connect to.
    Drawing {
        /// The anchored hex.
        last: HexIndex,
    },
}

/// One open drawing and all editing state attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingSession {
    /// The document being edited.
    pub map: HexMap,
    /// Undo/redo history (stacks themselves are not persisted).
    pub undo: UndoHistory,
    /// Currently active layer.
    pub layer: Layer,
    /// Currently active tool.
    pub tool: Tool,
    /// Paint colors for the color layer.
    pub paint_colors: ColorPair,
    /// Stroke colors for the boundary layer.
    pub boundary_colors: ColorPair,
    /// Line/highlight colors for the path layer.
    pub path_colors: ColorPair,
    /// Fill colors for the text layer.
    pub text_colors: ColorPair,
    /// Primary stamp object.
    pub primary_object: String,
    /// Secondary stamp object.
    pub secondary_object: String,
    /// Style applied to newly placed text.
    pub text_style: TextStyle,
    /// Boundary gesture state; transient.
    #[serde(skip)]
    pub boundary_gesture: BoundaryGesture,
    /// Path gesture state; transient.
    #[serde(skip)]
    pub path_gesture: PathGesture,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self {
            map: HexMap::new(),
            undo: UndoHistory::new(),
            layer: Layer::Color,
            tool: Tool::Brush,
            paint_colors: ColorPair::new(DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR),
            boundary_colors: ColorPair::new(DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR),
            path_colors: ColorPair::new(DEFAULT_PATH_LINE_COLOR, DEFAULT_PATH_HIGHLIGHT_COLOR),
            text_colors: ColorPair::new(DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR),
            primary_object: DEFAULT_PRIMARY_OBJECT.to_string(),
            secondary_object: DEFAULT_SECONDARY_OBJECT.to_string(),
            text_style: TextStyle::default(),
            boundary_gesture: BoundaryGesture::Idle,
            path_gesture: PathGesture::Idle,
        }
    }
}

impl DrawingSession {
    /// Creates a session around a fresh default map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the open document (used by New and Open). Undo history is
    /// cleared since recorded indices may not resolve in the new document.
    pub fn load(&mut self, map: HexMap) {
        self.map = map;
        self.undo.clear();
        self.cancel_gestures();
    }

    /// Switches the active layer, resetting the tool to the layer's first
    /// available tool and cancelling any in-progress gesture.
    pub fn switch_layer(&mut self, layer: Layer) {
        self.layer = layer;
        self.tool = layer.allowed_tools().first().copied().unwrap_or(Tool::Brush);
        self.cancel_gestures();
    }

    /// Switches the active tool. Silently ignored when the tool isn't
    /// available on the current layer.
    pub fn switch_tool(&mut self, tool: Tool) {
        if self.layer.allowed_tools().contains(&tool) {
            self.tool = tool;
        }
    }

    /// Ends any in-progress drawing gesture without committing anything.
    /// Called on pointer release and on layer/tool switches.
    pub fn cancel_gestures(&mut self) {
        self.boundary_gesture = BoundaryGesture::Idle;
        self.path_gesture = PathGesture::Idle;
    }

    /// Sets the primary color for the active layer. On the grid layer the
    /// primary swatch drives the canvas background, so this is undoable
    /// there; for drawing layers it only updates the palette.
    pub fn set_primary_color(&mut self, color: &str) {
        match self.layer {
            Layer::Grid => self.set_canvas_color(color),
            Layer::Color => self.paint_colors.primary = color.to_string(),
            Layer::Object => {}
            Layer::Boundary => self.boundary_colors.primary = color.to_string(),
            Layer::Path => self.path_colors.primary = color.to_string(),
            Layer::Text => self.text_colors.primary = color.to_string(),
        }
    }

    /// Sets the secondary color for the active layer; on the grid layer the
    /// secondary swatch drives the grid line color.
    pub fn set_secondary_color(&mut self, color: &str) {
        match self.layer {
            Layer::Grid => self.set_grid_color(color),
            Layer::Color => self.paint_colors.secondary = color.to_string(),
            Layer::Object => {}
            Layer::Boundary => self.boundary_colors.secondary = color.to_string(),
            Layer::Path => self.path_colors.secondary = color.to_string(),
            Layer::Text => self.text_colors.secondary = color.to_string(),
        }
    }

    /// The active layer's primary/secondary color pair, if it has one.
    pub fn active_colors(&self) -> Option<(&str, &str)> {
        match self.layer {
            Layer::Grid => Some((&self.map.canvas_color, &self.map.grid_color)),
            Layer::Color => Some((&self.paint_colors.primary, &self.paint_colors.secondary)),
            Layer::Object => None,
            Layer::Boundary => Some((
                &self.boundary_colors.primary,
                &self.boundary_colors.secondary,
            )),
            Layer::Path => Some((&self.path_colors.primary, &self.path_colors.secondary)),
            Layer::Text => Some((&self.text_colors.primary, &self.text_colors.secondary)),
        }
    }

    // ---- color layer -----------------------------------------------------

    /// Paints one hex with the primary or secondary color. Returns whether
    /// the fill changed.
    pub fn paint_hex(&mut self, index: HexIndex, secondary: bool) -> bool {
        let color = self.paint_colors.pick(secondary).to_string();
        self.set_fill(index, &color)
    }

    /// Sets one hex's fill, recording an undo entry when it actually changed.
    pub fn set_fill(&mut self, index: HexIndex, color: &str) -> bool {
        match self.map.set_fill(index, color) {
            Some(old) => {
                self.undo.push_action(UndoAction::FillChanged {
                    index,
                    old,
                    new: color.to_string(),
                });
                true
            }
            None => false,
        }
    }

    /// Repaints one hex back to the canvas background color.
    pub fn erase_fill(&mut self, index: HexIndex) -> bool {
        let color = self.map.canvas_color.clone();
        self.set_fill(index, &color)
    }

    /// Flood fills the connected same-color region around `index` with the
    /// primary or secondary color, recording a single compound undo entry for
    /// the whole region.
    pub fn flood_fill(&mut self, index: HexIndex, secondary: bool) -> bool {
        let color = self.paint_colors.pick(secondary).to_string();
        let Some(record) = self.map.hex_at(index) else {
            return false;
        };
        let old = record.fill.clone();
        if old == color {
            return false;
        }
        let region = self.map.flood_region(index);
        for target in &region {
            self.map.set_fill(*target, &color);
        }
        self.undo.push_action(UndoAction::FloodFilled {
            indices: region,
            old,
            new: color,
        });
        true
    }

    /// Eyedropper: copies the fill under the cursor into the primary or
    /// secondary paint color. Never logs.
    pub fn pick_color(&mut self, index: HexIndex, secondary: bool) {
        if let Some(record) = self.map.hex_at(index) {
            let color = record.fill.clone();
            if secondary {
                self.paint_colors.secondary = color;
            } else {
                self.paint_colors.primary = color;
            }
        }
    }

    // ---- grid layer ------------------------------------------------------

    /// Swaps the canvas background color, repainting every hex still filled
    /// with the old background shade.
    pub fn set_canvas_color(&mut self, color: &str) {
        let old = self.map.canvas_color.clone();
        if old == color {
            return;
        }
        self.map.recolor_matching(&old, color);
        self.map.canvas_color = color.to_string();
        self.undo.push_action(UndoAction::CanvasRecolored {
            old,
            new: color.to_string(),
        });
    }

    /// Changes the grid line color.
    pub fn set_grid_color(&mut self, color: &str) {
        let old = self.map.grid_color.clone();
        if old == color {
            return;
        }
        self.map.grid_color = color.to_string();
        self.undo.push_action(UndoAction::GridRecolored {
            old,
            new: color.to_string(),
        });
    }

    /// Changes the grid line thickness.
    pub fn set_grid_thickness(&mut self, thickness: f32) {
        let old = self.map.grid_thickness;
        if old == thickness {
            return;
        }
        self.map.grid_thickness = thickness;
        self.undo.push_action(UndoAction::GridThicknessChanged {
            old,
            new: thickness,
        });
    }

    /// Switches the tiling orientation, repositioning everything. Not
    /// undoable; indices and corner refs stay valid across the change.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.map.set_orientation(orientation);
    }

    // ---- object layer ----------------------------------------------------

    /// Stamps the primary or secondary object onto a hex. Returns whether
    /// the stamp changed.
    pub fn stamp_hex(&mut self, index: HexIndex, secondary: bool) -> bool {
        let object = if secondary {
            self.secondary_object.clone()
        } else {
            self.primary_object.clone()
        };
        self.set_stamp(index, Some(&object))
    }

    /// Sets or clears one hex's stamp, recording an undo entry when changed.
    pub fn set_stamp(&mut self, index: HexIndex, stamp: Option<&str>) -> bool {
        match self.map.set_stamp(index, stamp) {
            Some(old) => {
                self.undo.push_action(UndoAction::StampChanged {
                    index,
                    old,
                    new: stamp.filter(|s| !s.is_empty()).map(str::to_string),
                });
                true
            }
            None => false,
        }
    }

    /// Clears the stamp on a hex.
    pub fn erase_stamp(&mut self, index: HexIndex) -> bool {
        self.set_stamp(index, None)
    }

    /// Eyedropper on the object layer: copies the stamp under the cursor
    /// into the primary or secondary slot. Never logs.
    pub fn pick_object(&mut self, index: HexIndex, secondary: bool) {
        if let Some(record) = self.map.hex_at(index) {
            let object = record.stamp.clone().unwrap_or_default();
            if secondary {
                self.secondary_object = object;
            } else {
                self.primary_object = object;
            }
        }
    }

    // ---- boundary layer --------------------------------------------------

    /// Starts a boundary gesture by anchoring the corner of `index` nearest
    /// to the pointer. Ignored if a gesture is already active.
    pub fn begin_boundary(&mut self, index: HexIndex, point: (f32, f32)) {
        if self.boundary_gesture != BoundaryGesture::Idle {
            return;
        }
        if let Some(anchor) = self.map.nearest_vertex(index, point) {
            self.boundary_gesture = BoundaryGesture::Drawing { last: anchor };
        }
    }

    /// Feeds a pointer sample into an active boundary gesture.
    ///
    /// `index` is the hex currently under the pointer. The sample snaps to
    /// that hex's nearest corner and commits a segment only when the anchor
    /// and the snapped corner span a real hex edge; everything else is
    /// silently skipped while the drag continues. Returns whether a segment
    /// was committed.
    pub fn continue_boundary(
        &mut self,
        index: HexIndex,
        point: (f32, f32),
        secondary: bool,
    ) -> bool {
        let BoundaryGesture::Drawing { last } = self.boundary_gesture else {
            return false;
        };
        // a legal edge can only involve the anchor hex or a direct neighbor;
        // skip far-away samples before doing any vertex math
        if (last.col - index.col).abs() > 1 || (last.row - index.row).abs() > 1 {
            return false;
        }
        let Some(next) = self.map.nearest_vertex(index, point) else {
            return false;
        };
        if !self.map.is_legal_edge(last, next) {
            return false;
        }
        let color = self.boundary_colors.pick(secondary).to_string();
        self.draw_boundary_edge(last, next, &color);
        self.boundary_gesture = BoundaryGesture::Drawing { last: next };
        true
    }

    /// Draws a boundary edge between two corners and logs it. Callers have
    /// already validated edge legality.
    pub fn draw_boundary_edge(&mut self, from: VertexRef, to: VertexRef, color: &str) {
        self.map.add_boundary(from, to, color);
        self.undo.push_action(UndoAction::BoundaryAdded {
            from,
            to,
            color: color.to_string(),
        });
    }

    /// Erases the boundary edge under the pointer, if any.
    pub fn erase_boundary_at(&mut self, point: (f32, f32)) -> bool {
        let Some(slot) = self.map.boundary_near(point, BOUNDARY_STROKE_WIDTH) else {
            return false;
        };
        let edge = self.map.boundaries.remove(slot);
        self.undo.push_action(UndoAction::BoundaryErased {
            from: edge.from,
            to: edge.to,
            color: edge.color,
        });
        true
    }

    // ---- path layer ------------------------------------------------------

    /// Feeds a brushed hex into the path gesture. The first hex anchors; each
    /// later distinct hex commits a segment from the anchor and re-anchors.
    /// Returns whether a segment was committed.
    pub fn path_brush(&mut self, index: HexIndex, secondary: bool) -> bool {
        if !self.map.in_bounds(index) {
            return false;
        }
        match self.path_gesture {
            PathGesture::Idle => {
                self.path_gesture = PathGesture::Drawing { last: index };
                false
            }
            PathGesture::Drawing { last } if last == index => false,
            PathGesture::Drawing { last } => {
                let (line, highlight) = if secondary {
                    (
                        self.path_colors.secondary.clone(),
                        self.path_colors.primary.clone(),
                    )
                } else {
                    (
                        self.path_colors.primary.clone(),
                        self.path_colors.secondary.clone(),
                    )
                };
                self.draw_path_segment(last, index, &line, &highlight);
                self.path_gesture = PathGesture::Drawing { last: index };
                true
            }
        }
    }

    /// Draws a path segment between two hex centers and logs it.
    pub fn draw_path_segment(
        &mut self,
        from: HexIndex,
        to: HexIndex,
        line_color: &str,
        highlight_color: &str,
    ) {
        self.map.add_path(from, to, line_color, highlight_color);
        self.undo.push_action(UndoAction::PathAdded {
            from,
            to,
            line_color: line_color.to_string(),
            highlight_color: highlight_color.to_string(),
        });
    }

    /// Erases the path segment under the pointer, if any.
    pub fn erase_path_at(&mut self, point: (f32, f32)) -> bool {
        let Some(slot) = self.map.path_near(point, PATH_HIGHLIGHT_STROKE_WIDTH) else {
            return false;
        };
        let segment = self.map.paths.remove(slot);
        self.undo.push_action(UndoAction::PathErased {
            from: segment.from,
            to: segment.to,
            line_color: segment.line_color,
            highlight_color: segment.highlight_color,
        });
        true
    }

    // ---- text layer ------------------------------------------------------

    /// Places text at a world-space point using the session's current text
    /// style. Empty content is a silent no-op.
    pub fn place_text(&mut self, pos: (f32, f32), content: &str, secondary: bool) -> bool {
        if content.is_empty() {
            return false;
        }
        let mut style = self.text_style.clone();
        style.color = self.text_colors.pick(secondary).to_string();
        self.place_text_with_style(pos, content, style);
        true
    }

    /// Places text with an explicit style and logs it.
    pub fn place_text_with_style(&mut self, pos: (f32, f32), content: &str, style: TextStyle) {
        self.map.add_text(pos, content, style.clone());
        self.undo.push_action(UndoAction::TextAdded {
            pos,
            content: content.to_string(),
            style,
        });
    }

    /// Erases the text item whose anchor is under the pointer, if any.
    pub fn erase_text_at(&mut self, point: (f32, f32)) -> bool {
        let Some(slot) = self.map.text_near(point, self.text_style.font_size) else {
            return false;
        };
        let item = self.map.texts.remove(slot);
        self.undo.push_action(UndoAction::TextErased {
            pos: item.pos,
            content: item.content,
            style: item.style,
        });
        true
    }

    // ---- undo/redo -------------------------------------------------------

    /// Undoes the most recent action; a no-op when the history is empty.
    pub fn undo(&mut self) {
        let Some(action) = self.undo.pop_undo() else {
            return;
        };
        // the guard must come back down on every path out of the replay, so
        // keep this straight-line: no early returns between set and unset
        self.undo.set_replaying(true);
        let reverse = self.apply_reverse(&action);
        self.undo.set_replaying(false);
        self.undo.push_redo(reverse);
    }

    /// Redoes the most recently undone action; a no-op when nothing has been
    /// undone since the last fresh mutation.
    pub fn redo(&mut self) {
        let Some(action) = self.undo.pop_redo() else {
            return;
        };
        self.undo.set_replaying(true);
        let reverse = self.apply_reverse(&action);
        self.undo.set_replaying(false);
        self.undo.push_undo(reverse);
    }

    /// Applies the inverse of `action` through the regular mutators (their
    /// log attempts are dropped by the replay guard) and returns the action
    /// that reverses the reversal, i.e. what goes onto the opposite stack.
    ///
    /// Targets that no longer resolve (the grid was resized out from under a
    /// stale entry) are skipped by the underlying bounds lookups.
    fn apply_reverse(&mut self, action: &UndoAction) -> UndoAction {
        match action {
            UndoAction::FillChanged { index, old, new } => {
                self.set_fill(*index, old);
                UndoAction::FillChanged {
                    index: *index,
                    old: new.clone(),
                    new: old.clone(),
                }
            }
            UndoAction::CanvasRecolored { old, new } => {
                self.map.recolor_matching(new, old);
                self.map.canvas_color = old.clone();
                UndoAction::CanvasRecolored {
                    old: new.clone(),
                    new: old.clone(),
                }
            }
            UndoAction::GridRecolored { old, new } => {
                self.map.grid_color = old.clone();
                UndoAction::GridRecolored {
                    old: new.clone(),
                    new: old.clone(),
                }
            }
            UndoAction::GridThicknessChanged { old, new } => {
                self.map.grid_thickness = *old;
                UndoAction::GridThicknessChanged {
                    old: *new,
                    new: *old,
                }
            }
            UndoAction::FloodFilled { indices, old, new } => {
                for index in indices {
                    self.map.set_fill(*index, old);
                }
                UndoAction::FloodFilled {
                    indices: indices.clone(),
                    old: new.clone(),
                    new: old.clone(),
                }
            }
            UndoAction::StampChanged { index, old, new } => {
                self.set_stamp(*index, old.as_deref());
                UndoAction::StampChanged {
                    index: *index,
                    old: new.clone(),
                    new: old.clone(),
                }
            }
            UndoAction::BoundaryAdded { from, to, color } => {
                self.map.remove_boundary(*from, *to, color);
                UndoAction::BoundaryErased {
                    from: *from,
                    to: *to,
                    color: color.clone(),
                }
            }
            UndoAction::BoundaryErased { from, to, color } => {
                self.draw_boundary_edge(*from, *to, color);
                UndoAction::BoundaryAdded {
                    from: *from,
                    to: *to,
                    color: color.clone(),
                }
            }
            UndoAction::PathAdded {
                from,
                to,
                line_color,
                highlight_color,
            } => {
                self.map
                    .remove_path_matching(*from, *to, line_color, highlight_color);
                UndoAction::PathErased {
                    from: *from,
                    to: *to,
                    line_color: line_color.clone(),
                    highlight_color: highlight_color.clone(),
                }
            }
            UndoAction::PathErased {
                from,
                to,
                line_color,
                highlight_color,
            } => {
                self.draw_path_segment(*from, *to, line_color, highlight_color);
                UndoAction::PathAdded {
                    from: *from,
                    to: *to,
                    line_color: line_color.clone(),
                    highlight_color: highlight_color.clone(),
                }
            }
            UndoAction::TextAdded {
                pos,
                content,
                style,
            } => {
                self.map.remove_text_matching(*pos, content, &style.color);
                UndoAction::TextErased {
                    pos: *pos,
                    content: content.clone(),
                    style: style.clone(),
                }
            }
            UndoAction::TextErased {
                pos,
                content,
                style,
            } => {
                self.place_text_with_style(*pos, content, style.clone());
                UndoAction::TextAdded {
                    pos: *pos,
                    content: content.clone(),
                    style: style.clone(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_3x3() -> DrawingSession {
        let mut session = DrawingSession::new();
        session.load(HexMap::with_size(3, 3));
        session
    }

    #[test]
    fn test_repeated_fill_logs_once_and_undo_reverts() {
        let mut session = session_3x3();
        let index = HexIndex::new(1, 1);

        session.set_fill(index, "red");
        session.set_fill(index, "red");
        assert_eq!(session.undo.undo_depth(), 1);

        session.undo();
        assert_eq!(
            session.map.hex_at(index).unwrap().fill,
            DEFAULT_CANVAS_COLOR
        );
        assert_eq!(session.undo.undo_depth(), 0);
    }

    #[test]
    fn test_undo_on_empty_history_is_a_noop() {
        let mut session = session_3x3();
        session.undo();
        assert_eq!(session.undo.undo_depth(), 0);
    }

    #[test]
    fn test_undo_never_grows_the_stack() {
        let mut session = session_3x3();
        session.set_fill(HexIndex::new(0, 0), "red");
        session.set_fill(HexIndex::new(1, 0), "blue");
        assert_eq!(session.undo.undo_depth(), 2);

        session.undo();
        assert_eq!(session.undo.undo_depth(), 1);
        session.undo();
        assert_eq!(session.undo.undo_depth(), 0);
    }

    #[test]
    fn test_redo_restores_an_undone_fill() {
        let mut session = session_3x3();
        let index = HexIndex::new(2, 2);
        session.set_fill(index, "red");

        session.undo();
        assert_eq!(
            session.map.hex_at(index).unwrap().fill,
            DEFAULT_CANVAS_COLOR
        );

        session.redo();
        assert_eq!(session.map.hex_at(index).unwrap().fill, "red");
        // and the redone action is undoable again
        session.undo();
        assert_eq!(
            session.map.hex_at(index).unwrap().fill,
            DEFAULT_CANVAS_COLOR
        );
    }

    #[test]
    fn test_fresh_mutation_clears_redo() {
        let mut session = session_3x3();
        session.set_fill(HexIndex::new(0, 0), "red");
        session.undo();
        assert!(session.undo.can_redo());

        session.set_fill(HexIndex::new(1, 1), "blue");
        assert!(!session.undo.can_redo());
    }

    #[test]
    fn test_flood_fill_paints_whole_region_with_one_entry() {
        let mut session = DrawingSession::new();
        session.load(HexMap::with_size(5, 5));
        session.paint_colors.primary = "red".to_string();

        session.flood_fill(HexIndex::new(0, 0), false);
        assert_eq!(session.undo.undo_depth(), 1);
        for c in 0..5 {
            for r in 0..5 {
                assert_eq!(session.map.hex_at(HexIndex::new(c, r)).unwrap().fill, "red");
            }
        }

        session.undo();
        for c in 0..5 {
            for r in 0..5 {
                assert_eq!(
                    session.map.hex_at(HexIndex::new(c, r)).unwrap().fill,
                    DEFAULT_CANVAS_COLOR
                );
            }
        }
    }

    #[test]
    fn test_flood_fill_with_current_color_is_a_noop() {
        let mut session = session_3x3();
        session.paint_colors.primary = DEFAULT_CANVAS_COLOR.to_string();
        session.flood_fill(HexIndex::new(0, 0), false);
        assert_eq!(session.undo.undo_depth(), 0);
    }

    #[test]
    fn test_stamp_change_and_undo() {
        let mut session = session_3x3();
        let index = HexIndex::new(0, 1);

        session.stamp_hex(index, false);
        assert_eq!(
            session.map.hex_at(index).unwrap().stamp.as_deref(),
            Some(DEFAULT_PRIMARY_OBJECT)
        );

        session.undo();
        assert_eq!(session.map.hex_at(index).unwrap().stamp, None);
    }

    #[test]
    fn test_boundary_gesture_commits_only_legal_edges() {
        let mut session = session_3x3();
        let start = HexIndex::new(0, 0);
        let corner = session.map.hex_at(start).unwrap().vertices[0];
        session.begin_boundary(start, corner);
        assert!(matches!(
            session.boundary_gesture,
            BoundaryGesture::Drawing { .. }
        ));

        // sampling the anchor corner itself: zero length, not an edge
        assert!(!session.continue_boundary(start, corner, false));
        assert!(session.map.boundaries.is_empty());

        // the next corner around the same hex is exactly one edge away
        let next = session.map.hex_at(start).unwrap().vertices[1];
        assert!(session.continue_boundary(start, next, false));
        assert_eq!(session.map.boundaries.len(), 1);
        assert_eq!(session.undo.undo_depth(), 1);

        // releasing the pointer commits nothing further
        session.cancel_gestures();
        assert_eq!(session.boundary_gesture, BoundaryGesture::Idle);
        assert_eq!(session.map.boundaries.len(), 1);
    }

    #[test]
    fn test_boundary_undo_removes_edge_and_empties_stack() {
        let mut session = session_3x3();
        let from = session.map.nearest_vertex(HexIndex::new(0, 0), (0.0, 0.0)).unwrap();
        let hex = session.map.hex_at(HexIndex::new(0, 0)).unwrap();
        let to_point = hex.vertices[(from.vertex as usize + 1) % 6];
        let to = session.map.nearest_vertex(HexIndex::new(0, 0), to_point).unwrap();
        assert!(session.map.is_legal_edge(from, to));

        session.draw_boundary_edge(from, to, "#123456");
        assert_eq!(session.map.boundaries.len(), 1);

        session.undo();
        assert!(session.map.boundaries.is_empty());
        assert_eq!(session.undo.undo_depth(), 0);
    }

    #[test]
    fn test_boundary_erase_and_undo_redraws() {
        let mut session = session_3x3();
        let hex = session.map.hex_at(HexIndex::new(1, 1)).unwrap();
        let (v0, v1) = (hex.vertices[0], hex.vertices[1]);
        let from = VertexRef::new(1, 1, 0);
        let to = VertexRef::new(1, 1, 1);
        session.draw_boundary_edge(from, to, "#123456");

        let midpoint = ((v0.0 + v1.0) / 2.0, (v0.1 + v1.1) / 2.0);
        assert!(session.erase_boundary_at(midpoint));
        assert!(session.map.boundaries.is_empty());

        session.undo();
        assert_eq!(session.map.boundaries.len(), 1);
        assert!(session.map.boundaries[0].connects(from, to));
    }

    #[test]
    fn test_path_brush_anchors_then_connects() {
        let mut session = session_3x3();
        let a = HexIndex::new(0, 0);
        let b = HexIndex::new(2, 1);

        assert!(!session.path_brush(a, false));
        // re-brushing the anchor hex does nothing
        assert!(!session.path_brush(a, false));
        assert!(session.map.paths.is_empty());

        assert!(session.path_brush(b, false));
        assert_eq!(session.map.paths.len(), 1);
        assert_eq!(session.map.paths[0].from, a);
        assert_eq!(session.map.paths[0].to, b);

        session.undo();
        assert!(session.map.paths.is_empty());
    }

    #[test]
    fn test_path_erase_and_undo_redraws() {
        let mut session = session_3x3();
        let a = HexIndex::new(0, 0);
        let b = HexIndex::new(1, 0);
        session.draw_path_segment(a, b, "#000000", "#ffffff");

        let ca = session.map.hex_at(a).unwrap().center;
        let cb = session.map.hex_at(b).unwrap().center;
        let midpoint = ((ca.0 + cb.0) / 2.0, (ca.1 + cb.1) / 2.0);
        assert!(session.erase_path_at(midpoint));
        assert!(session.map.paths.is_empty());

        session.undo();
        assert_eq!(session.map.paths.len(), 1);
        assert!(session.map.paths[0].matches(a, b, "#000000", "#ffffff"));
    }

    #[test]
    fn test_text_place_erase_undo_roundtrip() {
        let mut session = session_3x3();
        session.text_style.bold = true;

        assert!(!session.place_text((10.0, 10.0), "", false));
        assert!(session.place_text((10.0, 10.0), "River", false));
        assert_eq!(session.map.texts.len(), 1);

        assert!(session.erase_text_at((12.0, 11.0)));
        assert!(session.map.texts.is_empty());

        // undo the erase: the item comes back with its full style
        session.undo();
        assert_eq!(session.map.texts.len(), 1);
        assert!(session.map.texts[0].style.bold);

        // undo the placement too
        session.undo();
        assert!(session.map.texts.is_empty());
    }

    #[test]
    fn test_canvas_recolor_undo_restores_matching_hexes() {
        let mut session = session_3x3();
        session.set_fill(HexIndex::new(0, 0), "blue");

        session.set_canvas_color("#112233");
        assert_eq!(
            session.map.hex_at(HexIndex::new(1, 1)).unwrap().fill,
            "#112233"
        );
        assert_eq!(session.map.hex_at(HexIndex::new(0, 0)).unwrap().fill, "blue");

        session.undo();
        assert_eq!(session.map.canvas_color, DEFAULT_CANVAS_COLOR);
        assert_eq!(
            session.map.hex_at(HexIndex::new(1, 1)).unwrap().fill,
            DEFAULT_CANVAS_COLOR
        );
    }

    #[test]
    fn test_grid_controls_are_undoable() {
        let mut session = session_3x3();
        session.set_grid_color("#ff0000");
        session.set_grid_thickness(2.0);
        assert_eq!(session.undo.undo_depth(), 2);

        session.undo();
        assert_eq!(session.map.grid_thickness, DEFAULT_GRID_THICKNESS);
        session.undo();
        assert_eq!(session.map.grid_color, DEFAULT_GRID_COLOR);
    }

    #[test]
    fn test_switch_tool_rejects_incompatible_tools() {
        let mut session = session_3x3();
        session.switch_layer(Layer::Boundary);
        assert_eq!(session.tool, Tool::Brush);

        session.switch_tool(Tool::Fill); // fill isn't a boundary tool
        assert_eq!(session.tool, Tool::Brush);

        session.switch_tool(Tool::Eraser);
        assert_eq!(session.tool, Tool::Eraser);
    }

    #[test]
    fn test_switch_layer_cancels_gestures() {
        let mut session = session_3x3();
        session.switch_layer(Layer::Path);
        session.path_brush(HexIndex::new(0, 0), false);
        assert!(matches!(session.path_gesture, PathGesture::Drawing { .. }));

        session.switch_layer(Layer::Color);
        assert_eq!(session.path_gesture, PathGesture::Idle);
    }

    #[test]
    fn test_eyedropper_picks_without_logging() {
        let mut session = session_3x3();
        session.set_fill(HexIndex::new(1, 1), "#abcdef");
        let depth = session.undo.undo_depth();

        session.pick_color(HexIndex::new(1, 1), false);
        assert_eq!(session.paint_colors.primary, "#abcdef");
        assert_eq!(session.undo.undo_depth(), depth);

        session.pick_color(HexIndex::new(1, 1), true);
        assert_eq!(session.paint_colors.secondary, "#abcdef");
    }

    #[test]
    fn test_undo_entry_against_resized_grid_is_skipped() {
        let mut session = DrawingSession::new();
        session.load(HexMap::with_size(5, 5));
        session.set_fill(HexIndex::new(4, 4), "red");

        // loading a smaller document clears the history outright
        session.load(HexMap::with_size(2, 2));
        assert_eq!(session.undo.undo_depth(), 0);
        session.undo(); // still a no-op
        assert_eq!(session.map.hex_at(HexIndex::new(1, 1)).unwrap().fill, DEFAULT_CANVAS_COLOR);
    }

    #[test]
    fn test_replayed_mutators_do_not_relog() {
        let mut session = session_3x3();
        session.draw_path_segment(HexIndex::new(0, 0), HexIndex::new(1, 1), "#000000", "#ffffff");
        assert_eq!(session.undo.undo_depth(), 1);

        // the undo replays through draw-path machinery without logging
        session.undo();
        assert_eq!(session.undo.undo_depth(), 0);
        session.redo();
        assert_eq!(session.undo.undo_depth(), 1);
        assert_eq!(session.map.paths.len(), 1);
    }
}
