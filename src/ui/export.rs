//! Export utilities: render the current map to SVG and PNG.
//!
//! Notes:
//! - SVG export is supported on all targets (native + wasm).
//! - PNG export is supported on native targets only (wasm skipped).
//!
//! Exported SVG elements carry the same flat identifying attributes the
//! document model is keyed by (`c`/`r` on hexes and stamps, `from-crn`/
//! `to-crn` corner triples on boundaries, `c1 r1 c2 r2` on path lines) so
//! external tooling can reconstruct the drawing from attributes alone.

use crate::constants::*;
use crate::types::HexIndex;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

use super::state::HexMapApp;

/// Escapes text content for embedding in XML.
fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl HexMapApp {
    /// Export the map to SVG: open a save dialog (native) or trigger a
    /// download (wasm).
    pub fn export_svg(&mut self) {
        let (svg, _w, _h) = self.build_svg();

        #[cfg(target_arch = "wasm32")]
        {
            if let Err(e) = Self::trigger_download("hexmap.svg", &svg) {
                eprintln!("Failed to start SVG download: {}", e);
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            tokio::spawn(async move {
                if let Some(handle) = rfd::AsyncFileDialog::new()
                    .add_filter("SVG", &["svg"])
                    .set_file_name("hexmap.svg")
                    .save_file()
                    .await
                {
                    let path = handle.path();
                    if let Err(e) = std::fs::write(path, svg.as_bytes()) {
                        eprintln!("Failed to save SVG: {}", e);
                    }
                }
            });
        }
    }

    /// Export the map to PNG (native builds only).
    pub fn export_png(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let (svg, width, height) = self.build_svg();

            use tiny_skia::Pixmap;

            // Parse SVG
            let mut opt = usvg::Options::default();
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            opt.fontdb = Arc::new(db);

            let tree = match usvg::Tree::from_data(svg.as_bytes(), &opt) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Failed to parse SVG for PNG export: {}", e);
                    return;
                }
            };

            let mut pixmap = match Pixmap::new(width.max(1), height.max(1)) {
                Some(p) => p,
                None => {
                    eprintln!("Failed to create pixmap {}x{}", width, height);
                    return;
                }
            };

            let mut pmut = pixmap.as_mut();
            let _ = resvg::render(&tree, tiny_skia::Transform::identity(), &mut pmut);

            // Save via a dialog
            tokio::spawn(async move {
                if let Some(handle) = rfd::AsyncFileDialog::new()
                    .add_filter("PNG", &["png"])
                    .set_file_name("hexmap.png")
                    .save_file()
                    .await
                {
                    let path = handle.path();
                    if let Err(e) = pixmap.save_png(path) {
                        eprintln!("Failed to save PNG: {}", e);
                    }
                }
            });
        }
    }

    /// Build an SVG string for the whole map. Returns (svg, width, height).
    pub fn build_svg(&self) -> (String, u32, u32) {
        let map = &self.session.map;

        // World bounds over every cell corner, padded by the stroke width
        let margin = map.grid_thickness;
        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for c in 0..map.cols as i32 {
            for r in 0..map.rows as i32 {
                if let Some(record) = map.hex_at(HexIndex::new(c, r)) {
                    for (x, y) in record.vertices {
                        min_x = min_x.min(x);
                        max_x = max_x.max(x);
                        min_y = min_y.min(y);
                        max_y = max_y.max(y);
                    }
                }
            }
        }
        if !min_x.is_finite() {
            (min_x, max_x, min_y, max_y) = (0.0, 0.0, 0.0, 0.0);
        }
        min_x -= margin;
        min_y -= margin;
        max_x += margin;
        max_y += margin;
        let width = (max_x - min_x).ceil().max(1.0);
        let height = (max_y - min_y).ceil().max(1.0);

        let mut svg = String::new();
        svg.push_str("<?xml version=\"1.0\" standalone=\"no\"?>\r\n");
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{} {} {} {}\" \
             gridDirection=\"{}\" canvasColor=\"{}\" gridColor=\"{}\">\n",
            min_x,
            min_y,
            width,
            height,
            map.orientation.label(),
            map.canvas_color,
            map.grid_color,
        ));

        // Hex cells
        for c in 0..map.cols as i32 {
            for r in 0..map.rows as i32 {
                let Some(record) = map.hex_at(HexIndex::new(c, r)) else {
                    continue;
                };
                let points: Vec<String> = record
                    .vertices
                    .iter()
                    .map(|(x, y)| format!("{},{}", x, y))
                    .collect();
                svg.push_str(&format!(
                    "  <polygon class=\"hex\" c=\"{}\" r=\"{}\" points=\"{}\" \
                     fill=\"{}\" stroke=\"{}\" stroke-width=\"{}px\"/>\n",
                    c,
                    r,
                    points.join(" "),
                    record.fill,
                    map.grid_color,
                    map.grid_thickness,
                ));
            }
        }

        // Stamped objects
        for c in 0..map.cols as i32 {
            for r in 0..map.rows as i32 {
                let Some(record) = map.hex_at(HexIndex::new(c, r)) else {
                    continue;
                };
                if let Some(stamp) = &record.stamp {
                    svg.push_str(&format!(
                        "  <text class=\"hex-object\" c=\"{}\" r=\"{}\" x=\"{}\" y=\"{}\" \
                         text-anchor=\"middle\" dominant-baseline=\"central\" \
                         font-size=\"{}px\">{}</text>\n",
                        c,
                        r,
                        record.center.0,
                        record.center.1,
                        HEX_RADIUS,
                        xml_escape(stamp),
                    ));
                }
            }
        }

        // Boundary lines
        for boundary in &map.boundaries {
            let (Some(from), Some(to)) = (
                map.vertex_point(boundary.from),
                map.vertex_point(boundary.to),
            ) else {
                continue;
            };
            svg.push_str(&format!(
                "  <line class=\"boundary\" from-crn=\"{}\" to-crn=\"{}\" \
                 x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" \
                 stroke-width=\"{}\" stroke-linecap=\"round\"/>\n",
                boundary.from.to_attr(),
                boundary.to.to_attr(),
                from.0,
                from.1,
                to.0,
                to.1,
                boundary.color,
                BOUNDARY_STROKE_WIDTH,
            ));
        }

        // Paths: highlight under line, both carrying the endpoint indices
        for path in &map.paths {
            let (Some(from), Some(to)) = (map.hex_at(path.from), map.hex_at(path.to)) else {
                continue;
            };
            let coords = format!(
                "c1=\"{}\" r1=\"{}\" c2=\"{}\" r2=\"{}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"",
                path.from.col,
                path.from.row,
                path.to.col,
                path.to.row,
                from.center.0,
                from.center.1,
                to.center.0,
                to.center.1,
            );
            svg.push_str(&format!(
                "  <line class=\"path-highlight\" id=\"{}\" {} stroke=\"{}\" \
                 stroke-width=\"{}\" stroke-opacity=\"0.5\" stroke-linecap=\"round\"/>\n",
                path.id, coords, path.highlight_color, PATH_HIGHLIGHT_STROKE_WIDTH,
            ));
            svg.push_str(&format!(
                "  <line class=\"path\" id=\"path-{}\" {} stroke=\"{}\" stroke-width=\"{}\" \
                 stroke-dasharray=\"{}\" stroke-linecap=\"round\"/>\n",
                path.id, coords, path.line_color, PATH_STROKE_WIDTH, PATH_DASH_LENGTH,
            ));
        }

        // Text items
        for text in &map.texts {
            let mut style_attrs = String::new();
            if text.style.bold {
                style_attrs.push_str(" stroke-width=\"0.5\"");
            }
            if text.style.italic {
                style_attrs.push_str(" font-style=\"italic\"");
            }
            if text.style.underline {
                style_attrs.push_str(" text-decoration=\"underline\"");
            }
            svg.push_str(&format!(
                "  <text class=\"in-image-text\" x=\"{}\" y=\"{}\" font-size=\"{}\" \
                 fill=\"{}\"{}>{}</text>\n",
                text.pos.0,
                text.pos.1,
                text.style.font_size,
                text.style.color,
                style_attrs,
                xml_escape(&text.content),
            ));
        }

        svg.push_str("</svg>\n");
        (svg, width as u32, height as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TextStyle, VertexRef};

    #[test]
    fn test_svg_carries_flat_identifying_attributes() {
        let mut app = HexMapApp::default();
        app.session.load(crate::types::HexMap::with_size(3, 3));
        app.session.set_fill(HexIndex::new(1, 2), "#ff0000");
        app.session.set_stamp(HexIndex::new(0, 0), Some("🌽"));
        app.session
            .draw_boundary_edge(VertexRef::new(0, 0, 0), VertexRef::new(0, 0, 1), "#123456");
        app.session
            .draw_path_segment(HexIndex::new(0, 0), HexIndex::new(2, 2), "#000000", "#ffffff");
        app.session.place_text_with_style(
            (12.0, 34.0),
            "A < B & C",
            TextStyle {
                italic: true,
                underline: true,
                ..TextStyle::default()
            },
        );

        let (svg, width, height) = app.build_svg();
        assert!(width > 0 && height > 0);
        assert!(svg.contains("gridDirection=\"HORIZONTAL\""));
        assert!(svg.contains("canvasColor=\"#c4b9a5\""));
        assert!(svg.contains("c=\"1\" r=\"2\""));
        assert!(svg.contains("fill=\"#ff0000\""));
        assert!(svg.contains("from-crn=\"0,0,0\""));
        assert!(svg.contains("to-crn=\"0,0,1\""));
        assert!(svg.contains("c1=\"0\" r1=\"0\" c2=\"2\" r2=\"2\""));
        assert!(svg.contains("font-style=\"italic\""));
        assert!(svg.contains("text-decoration=\"underline\""));
        // content is escaped
        assert!(svg.contains("A &lt; B &amp; C"));
    }

    #[test]
    fn test_svg_has_one_polygon_per_hex() {
        let mut app = HexMapApp::default();
        app.session.load(crate::types::HexMap::with_size(4, 5));
        let (svg, _, _) = app.build_svg();
        assert_eq!(svg.matches("<polygon").count(), 20);
    }
}
