//! Canvas rendering for the hex grid and everything layered on it.
//!
//! All drawing here is a pure view of the document model: hexes first
//! (background), then stamps, boundary lines, paths and text on top, in the
//! same stacking order the layers use.

use super::state::HexMapApp;
use crate::constants::*;
use eframe::egui;

/// Parses a `#rrggbb` (or `#rrggbbaa`) color string into an egui color.
/// Unparseable strings come back as gray rather than failing a paint pass.
pub fn parse_hex_color(color: &str) -> egui::Color32 {
    let hex = color.trim_start_matches('#');
    let parse = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    match hex.len() {
        6 => match (parse(0..2), parse(2..4), parse(4..6)) {
            (Some(r), Some(g), Some(b)) => egui::Color32::from_rgb(r, g, b),
            _ => egui::Color32::GRAY,
        },
        8 => match (parse(0..2), parse(2..4), parse(4..6), parse(6..8)) {
            (Some(r), Some(g), Some(b), Some(a)) => {
                egui::Color32::from_rgba_unmultiplied(r, g, b, a)
            }
            _ => egui::Color32::GRAY,
        },
        _ => egui::Color32::GRAY,
    }
}

impl HexMapApp {
    /// Renders the whole map (hexes, stamps, boundaries, paths, text) on the
    /// canvas.
    ///
    /// # Arguments
    ///
    /// * `painter` - The egui painter for drawing operations
    /// * `canvas_rect` - The screen-space rectangle of the canvas area
    pub fn render_map_elements(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let zoom = self.canvas.zoom_factor;
        let map = &self.session.map;
        let grid_color = parse_hex_color(&map.grid_color);
        let grid_stroke = egui::Stroke::new(map.grid_thickness * zoom, grid_color);

        // Hex cells (background)
        for c in 0..map.cols as i32 {
            for r in 0..map.rows as i32 {
                let Some(record) = map.hex_at(crate::types::HexIndex::new(c, r)) else {
                    continue;
                };
                let points: Vec<egui::Pos2> = record
                    .vertices
                    .iter()
                    .map(|(x, y)| self.world_to_screen(egui::pos2(*x, *y)))
                    .collect();
                // skip cells entirely outside the viewport
                let bounds = egui::Rect::from_points(&points);
                if !canvas_rect.intersects(bounds) {
                    continue;
                }
                painter.add(egui::Shape::convex_polygon(
                    points,
                    parse_hex_color(&record.fill),
                    grid_stroke,
                ));
            }
        }

        // Stamped objects
        for c in 0..map.cols as i32 {
            for r in 0..map.rows as i32 {
                let Some(record) = map.hex_at(crate::types::HexIndex::new(c, r)) else {
                    continue;
                };
                if let Some(stamp) = &record.stamp {
                    let pos = self.world_to_screen(egui::pos2(record.center.0, record.center.1));
                    if !canvas_rect.contains(pos) {
                        continue;
                    }
                    painter.text(
                        pos,
                        egui::Align2::CENTER_CENTER,
                        stamp,
                        egui::FontId::proportional(HEX_RADIUS * zoom),
                        egui::Color32::WHITE,
                    );
                }
            }
        }

        // Boundary lines along hex edges
        for boundary in &map.boundaries {
            let (Some(from), Some(to)) = (
                map.vertex_point(boundary.from),
                map.vertex_point(boundary.to),
            ) else {
                continue;
            };
            painter.line_segment(
                [
                    self.world_to_screen(egui::pos2(from.0, from.1)),
                    self.world_to_screen(egui::pos2(to.0, to.1)),
                ],
                egui::Stroke::new(
                    BOUNDARY_STROKE_WIDTH * zoom,
                    parse_hex_color(&boundary.color),
                ),
            );
        }

        // Paths: translucent highlight first, dashed line on top
        for path in &map.paths {
            let (Some(from), Some(to)) = (map.hex_at(path.from), map.hex_at(path.to)) else {
                continue;
            };
            let a = self.world_to_screen(egui::pos2(from.center.0, from.center.1));
            let b = self.world_to_screen(egui::pos2(to.center.0, to.center.1));

            let highlight = parse_hex_color(&path.highlight_color);
            let highlight = egui::Color32::from_rgba_unmultiplied(
                highlight.r(),
                highlight.g(),
                highlight.b(),
                128,
            );
            painter.line_segment(
                [a, b],
                egui::Stroke::new(PATH_HIGHLIGHT_STROKE_WIDTH * zoom, highlight),
            );
            painter.extend(egui::Shape::dashed_line(
                &[a, b],
                egui::Stroke::new(PATH_STROKE_WIDTH * zoom, parse_hex_color(&path.line_color)),
                PATH_DASH_LENGTH * zoom,
                PATH_DASH_LENGTH * zoom,
            ));
        }

        // Text items
        for text in &map.texts {
            let pos = self.world_to_screen(egui::pos2(text.pos.0, text.pos.1));
            let color = parse_hex_color(&text.style.color);
            let font = egui::FontId::proportional(text.style.font_size * zoom);
            let rect = painter.text(pos, egui::Align2::LEFT_BOTTOM, &text.content, font, color);
            // faux bold: restroke the same glyphs a hair to the right
            if text.style.bold {
                painter.text(
                    pos + egui::vec2(0.5 * zoom, 0.0),
                    egui::Align2::LEFT_BOTTOM,
                    &text.content,
                    egui::FontId::proportional(text.style.font_size * zoom),
                    color,
                );
            }
            if text.style.underline {
                let y = rect.max.y + 2.0 * zoom;
                painter.line_segment(
                    [egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)],
                    egui::Stroke::new(1.5 * zoom, color),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff0000"), egui::Color32::from_rgb(255, 0, 0));
        assert_eq!(parse_hex_color("#00ff7f"), egui::Color32::from_rgb(0, 255, 127));
        assert_eq!(
            parse_hex_color("#11223344"),
            egui::Color32::from_rgba_unmultiplied(0x11, 0x22, 0x33, 0x44)
        );
        // nonsense falls back to gray instead of panicking mid-paint
        assert_eq!(parse_hex_color("teal-ish"), egui::Color32::GRAY);
        assert_eq!(parse_hex_color("#12"), egui::Color32::GRAY);
    }
}
