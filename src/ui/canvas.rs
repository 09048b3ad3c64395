//! Canvas interaction and navigation functionality.
//!
//! This module handles canvas panning, zooming, coordinate transformations
//! between screen and world space, and the routing of pointer events to the
//! drawing session's tools (brush, fill, eyedropper, eraser, boundary and
//! path gestures, text placement).

use super::state::HexMapApp;
use crate::session::{Layer, Tool};
use crate::types::HexIndex;
use eframe::egui;

impl HexMapApp {
    /// Converts screen coordinates to world coordinates accounting for zoom and pan.
    ///
    /// # Arguments
    ///
    /// * `screen_pos` - Position in screen space (pixels)
    ///
    /// # Returns
    ///
    /// The corresponding position in world space
    pub fn screen_to_world(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        (screen_pos - self.canvas.offset) / self.canvas.zoom_factor
    }

    /// Converts world coordinates to screen coordinates accounting for zoom and pan.
    ///
    /// # Arguments
    ///
    /// * `world_pos` - Position in world space
    ///
    /// # Returns
    ///
    /// The corresponding position in screen space (pixels)
    pub fn world_to_screen(&self, world_pos: egui::Pos2) -> egui::Pos2 {
        world_pos * self.canvas.zoom_factor + self.canvas.offset
    }

    /// Handles middle-click or Cmd/Ctrl+left-click canvas panning functionality.
    ///
    /// Uses Cmd on macOS and Ctrl on other platforms for modifier-based panning.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    /// * `response` - The response from the canvas widget
    pub fn handle_canvas_panning(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        // Check for middle mouse button OR Cmd/Ctrl+left mouse button
        // modifiers.command automatically uses Cmd on macOS and Ctrl elsewhere
        let should_pan = ui.input(|i| {
            i.pointer.middle_down() || (i.pointer.primary_down() && i.modifiers.command)
        });

        if should_pan {
            if let Some(current_pos) = response.interact_pointer_pos() {
                if !self.interaction.is_panning {
                    self.interaction.is_panning = true;
                    self.interaction.last_pan_pos = Some(current_pos);
                } else if let Some(last_pos) = self.interaction.last_pan_pos {
                    let delta = current_pos - last_pos;
                    self.canvas.offset += delta;
                    self.interaction.last_pan_pos = Some(current_pos);
                }
            }
        } else {
            self.interaction.is_panning = false;
            self.interaction.last_pan_pos = None;
        }
    }

    /// Handles scroll wheel zooming functionality.
    ///
    /// Zooms in/out while keeping the mouse cursor position fixed in world space.
    /// Zoom range is clamped between 0.25x and 5.0x.
    /// Only zooms if the cursor is over the canvas.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    /// * `response` - The response from the canvas widget
    pub fn handle_canvas_zoom(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);

        if scroll_delta != 0.0 {
            // Use hover position if available, otherwise use response position
            let mouse_pos = ui
                .input(|i| i.pointer.hover_pos())
                .or_else(|| response.interact_pointer_pos());

            if let Some(mouse_pos) = mouse_pos {
                // Only zoom if the cursor is over the canvas
                if !response.rect.contains(mouse_pos) {
                    return;
                }

                // Calculate the world position under the mouse cursor before zoom
                let world_pos_before_zoom = self.screen_to_world(mouse_pos);

                // Apply zoom change with smaller, more precise steps
                let zoom_delta = if scroll_delta > 0.0 { 0.025 } else { -0.025 };
                let old_zoom = self.canvas.zoom_factor;
                self.canvas.zoom_factor = (self.canvas.zoom_factor + zoom_delta).clamp(0.25, 5.0);

                // Only adjust offset if zoom actually changed
                if (self.canvas.zoom_factor - old_zoom).abs() > f32::EPSILON {
                    // Calculate where that world position should appear on screen after zoom
                    let world_pos_after_zoom = self.world_to_screen(world_pos_before_zoom);

                    // Adjust canvas offset to keep the world position under the mouse cursor
                    let offset_adjustment = mouse_pos - world_pos_after_zoom;
                    self.canvas.offset += offset_adjustment;
                }
            }
        }
    }

    /// Draws the canvas and processes pointer interactions on it.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let (response, painter) =
            ui.allocate_painter(available, egui::Sense::click_and_drag());

        self.handle_canvas_panning(ui, &response);
        self.handle_canvas_zoom(ui, &response);

        if !self.interaction.is_panning {
            self.handle_brush_input(ui, &response);
        }

        self.render_map_elements(&painter, response.rect);
    }

    /// Tracks press/hold/release of the brush buttons and feeds pointer
    /// samples to the active tool.
    fn handle_brush_input(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let (primary_down, secondary_down, primary_pressed, secondary_pressed) = ui.input(|i| {
            (
                i.pointer.primary_down(),
                i.pointer.secondary_down(),
                i.pointer.primary_pressed(),
                i.pointer.secondary_pressed(),
            )
        });

        let pointer_pos = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.hover_pos()));

        // Stroke start: remember which button is painting for its duration.
        // Presses landing outside the canvas (panel buttons) don't count.
        if primary_pressed || secondary_pressed {
            if pointer_pos.is_some_and(|pos| response.rect.contains(pos)) {
                self.interaction.brushing = true;
                self.interaction.using_secondary = secondary_pressed;
                self.interaction.last_brushed_hex = None;
            }
        }

        // Stroke end: gestures drop their anchors, nothing partial survives
        if self.interaction.brushing && !primary_down && !secondary_down {
            self.interaction.brushing = false;
            self.interaction.last_brushed_hex = None;
            self.session.cancel_gestures();
            return;
        }

        if !self.interaction.brushing {
            return;
        }
        let Some(screen_pos) = pointer_pos else { return };
        if !response.rect.contains(screen_pos) {
            return;
        }

        let world = self.screen_to_world(screen_pos);
        let world_point = (world.x, world.y);
        let is_press = primary_pressed || secondary_pressed;
        let secondary = self.interaction.using_secondary;

        let hex = self.session.map.hex_at_point(world_point);
        // skip per-hex tools when the pointer hasn't left the previous hex,
        // so holding the button doesn't spam identical samples
        let entered_new_hex = hex.is_some() && hex != self.interaction.last_brushed_hex;
        if let Some(index) = hex {
            if entered_new_hex {
                self.interaction.last_brushed_hex = hex;
            }
            let mutated = self.dispatch_hex_interaction(
                index,
                world_point,
                is_press,
                entered_new_hex,
                secondary,
            );
            if mutated {
                self.file.has_unsaved_changes = true;
            }
        }
    }

    /// Routes one pointer sample over a hex to the session method the current
    /// layer/tool combination calls for.
    ///
    /// # Returns
    ///
    /// Whether the document may have been mutated.
    fn dispatch_hex_interaction(
        &mut self,
        index: HexIndex,
        point: (f32, f32),
        is_press: bool,
        entered_new_hex: bool,
        secondary: bool,
    ) -> bool {
        match (self.session.layer, self.session.tool) {
            (Layer::Color, Tool::Brush) => {
                (is_press || entered_new_hex) && self.session.paint_hex(index, secondary)
            }
            (Layer::Color, Tool::Fill) => {
                // flood fill fires once per press, never per drag sample
                is_press && self.session.flood_fill(index, secondary)
            }
            (Layer::Color, Tool::Eraser) => {
                (is_press || entered_new_hex) && self.session.erase_fill(index)
            }
            (Layer::Color, Tool::Eyedropper) => {
                if is_press {
                    self.session.pick_color(index, secondary);
                }
                false
            }
            (Layer::Object, Tool::Brush) => {
                (is_press || entered_new_hex) && self.session.stamp_hex(index, secondary)
            }
            (Layer::Object, Tool::Eraser) => {
                (is_press || entered_new_hex) && self.session.erase_stamp(index)
            }
            (Layer::Object, Tool::Eyedropper) => {
                if is_press {
                    self.session.pick_object(index, secondary);
                }
                false
            }
            (Layer::Boundary, Tool::Brush) => {
                if is_press {
                    self.session.begin_boundary(index, point);
                    false
                } else {
                    self.session.continue_boundary(index, point, secondary)
                }
            }
            (Layer::Boundary, Tool::Eraser) => self.session.erase_boundary_at(point),
            (Layer::Path, Tool::Brush) => {
                if is_press || entered_new_hex {
                    self.session.path_brush(index, secondary)
                } else {
                    false
                }
            }
            (Layer::Path, Tool::Eraser) => self.session.erase_path_at(point),
            (Layer::Text, Tool::Brush) => {
                if is_press {
                    let content = self.interaction.text_input.clone();
                    self.session.place_text(point, &content, secondary)
                } else {
                    false
                }
            }
            (Layer::Text, Tool::Eraser) => self.session.erase_text_at(point),
            _ => false,
        }
    }
}
