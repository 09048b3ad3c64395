//! # Hexmap Tool
//!
//! A hex-grid map editor for drawing fantasy maps, battle maps, and the like.
//! The map is a grid of hexes painted on a pannable, zoomable canvas, built
//! up in layers:
//! - **Color**: hex fills, with brush, flood fill, eyedropper and eraser
//! - **Object**: emoji stamps placed on hexes
//! - **Boundary**: lines snapped along real hex edges
//! - **Path**: dashed routes connecting hex centers
//! - **Text**: free-floating styled labels
//!
//! ## Features
//! - Horizontal and vertical grid orientations
//! - Full undo/redo across every drawing operation
//! - Canvas panning and zooming
//! - JSON save/load and SVG/PNG export

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod constants;
mod geometry;
mod session;
mod types;
mod ui;
mod undo;

// Re-export public types and functions
pub use geometry::{hex_center, hex_vertices, neighbors};
pub use session::*;
pub use types::*;
pub use undo::*;
use ui::HexMapApp;

/// Runs the hexmap application with default settings.
///
/// This function initializes the egui application window and starts the main
/// event loop.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an
/// `eframe::Error` if initialization fails.
///
/// # Example
///
/// ```no_run
/// use hexmap_tool::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Hexmap Tool",
        options,
        Box::new(|_cc| Ok(Box::new(HexMapApp::default()))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map() {
        let map = HexMap::default();
        assert_eq!(map.orientation, Orientation::Horizontal);
        assert!(map.boundaries.is_empty());
        assert!(map.paths.is_empty());
    }

    #[test]
    fn test_default_session_starts_on_the_color_layer() {
        let session = DrawingSession::new();
        assert_eq!(session.layer, Layer::Color);
        assert_eq!(session.tool, Tool::Brush);
        assert!(!session.undo.can_undo());
    }
}
