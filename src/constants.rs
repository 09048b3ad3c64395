//! Shared application-wide constants.
//! Centralizes tweakable values used across the document model, UI rendering
//! and interactions.

// Hex geometry
/// Circumradius of every hex, in world units (distance from center to corner).
pub const HEX_RADIUS: f32 = 35.0;
/// Squared radius, kept around so distance comparisons can skip the sqrt.
pub const HEX_RADIUS_SQUARED: f32 = HEX_RADIUS * HEX_RADIUS;
/// Allowed slack, in squared world units, when deciding whether two vertices
/// span a real hex edge. Wide enough to absorb the 2-decimal vertex rounding,
/// far smaller than the gap to the next-nearest vertex pair.
pub const EDGE_TOLERANCE: f32 = 5.0;

// Default document shape
/// Number of columns in a freshly created map.
pub const DEFAULT_COLS: u32 = 34;
/// Number of rows in a freshly created map.
pub const DEFAULT_ROWS: u32 = 20;
/// Default grid line thickness in world units.
pub const DEFAULT_GRID_THICKNESS: f32 = 5.0;
/// Default font size for placed text, in world units.
pub const DEFAULT_TEXT_FONT_SIZE: f32 = 40.0;

// Default palette (carried over from the browser ancestor of this tool)
/// Default canvas background color for unpainted hexes.
pub const DEFAULT_CANVAS_COLOR: &str = "#c4b9a5";
/// Default grid line color.
pub const DEFAULT_GRID_COLOR: &str = "#000000";
/// Default primary paint color.
pub const DEFAULT_PRIMARY_COLOR: &str = "#b8895f";
/// Default secondary paint color.
pub const DEFAULT_SECONDARY_COLOR: &str = "#7eaaad";
/// Default path line color.
pub const DEFAULT_PATH_LINE_COLOR: &str = "#000000";
/// Default path highlight color.
pub const DEFAULT_PATH_HIGHLIGHT_COLOR: &str = "#ffffff";
/// Default primary stamp object.
pub const DEFAULT_PRIMARY_OBJECT: &str = "🌽";
/// Default secondary stamp object.
pub const DEFAULT_SECONDARY_OBJECT: &str = "🌊";

// Stroke widths (world units)
/// Stroke width for boundary lines drawn along hex edges.
pub const BOUNDARY_STROKE_WIDTH: f32 = 9.0;
/// Stroke width for the dashed path line.
pub const PATH_STROKE_WIDTH: f32 = 3.0;
/// Stroke width for the translucent path highlight underneath the line.
pub const PATH_HIGHLIGHT_STROKE_WIDTH: f32 = 7.0;
/// Dash length for path lines.
pub const PATH_DASH_LENGTH: f32 = 10.0;

// Undo/redo
/// Maximum number of undo history entries to retain.
pub const MAX_UNDO_HISTORY: usize = 100;
