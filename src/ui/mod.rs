//! User interface components and rendering logic for the hexmap tool.
//!
//! This module contains all the UI-related code including the main
//! application struct, the canvas, the layer/tool control panels, and file
//! dialog plumbing.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main HexMapApp
//! - `file_ops` - File save/load operations for native and WASM
//! - `canvas` - Canvas navigation, zooming, panning, and interaction
//! - `rendering` - Drawing hexes, boundaries, paths, text and stamps
//! - `export` - SVG and PNG export

mod canvas;
mod export;
mod file_ops;
mod rendering;
mod state;

pub use state::HexMapApp;

use self::state::PendingConfirmAction;
use crate::session::{Layer, Tool};
use crate::types::Orientation;
use eframe::egui;

/// Color swatches offered in the control panel. Left-click picks the primary
/// color, right-click the secondary.
const SWATCH_COLORS: &[&str] = &[
    "#c4b9a5", "#b8895f", "#7eaaad", "#000000", "#ffffff", "#6b8e23", "#2e8b57", "#8fbc8f",
    "#4682b4", "#5f9ea0", "#d2b48c", "#daa520", "#cd853f", "#a0522d", "#8b4513", "#696969",
    "#dc143c", "#4b0082",
];

/// Stampable objects offered on the object layer.
const OBJECT_CHOICES: &[&str] = &[
    "🌽", "🌊", "🌲", "🌳", "🏔", "🏰", "🛖", "⚓", "🐉", "💀", "⭐", "🔥", "⛺", "🗻", "🌾", "🦅",
];

impl eframe::App for HexMapApp {
    /// Persist entire app state between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => {
                storage.set_string("app_state", json);
            }
            Err(err) => {
                eprintln!("Failed to serialize app state: {err}");
            }
        }
    }

    /// Main update function called by egui for each frame.
    ///
    /// This method handles the overall UI layout, including the controls
    /// panel, toolbar, and main canvas area.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context
    /// * `frame` - The eframe frame
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme visuals
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        // Handle pending file operations
        self.handle_pending_operations(ctx);

        // Handle undo/redo keyboard shortcuts
        self.handle_undo_redo_keys(ctx);

        // Handle file-related keyboard shortcuts (New/Open/Save)
        self.handle_file_shortcuts(ctx);

        // Handle layer and tool selection keys
        self.handle_layer_tool_keys(ctx);

        // Intercept native window close requests (titlebar X)
        #[cfg(not(target_arch = "wasm32"))]
        {
            if ctx.input(|i| i.viewport().close_requested()) {
                if self.file.has_unsaved_changes && !self.file.allow_close_on_next_request {
                    // Abort close and show confirmation dialog
                    ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                    if !self.file.show_unsaved_dialog {
                        self.file.show_unsaved_dialog = true;
                        self.file.pending_confirm_action = Some(PendingConfirmAction::Quit);
                    }
                } else {
                    // Either no unsaved changes or user confirmed close; allow it and reset the one-shot flag
                    self.file.allow_close_on_next_request = false;
                }
            }
        }

        // Restore native window size once per session (desktop only)
        #[cfg(not(target_arch = "wasm32"))]
        {
            if !self.applied_viewport_restore {
                if let Some((w, h)) = self.window_inner_size {
                    ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(w, h)));
                }
                self.applied_viewport_restore = true;
            }
            // Capture current window inner size to persist on save
            let size = ctx.input(|i| i.screen_rect().size());
            self.window_inner_size = Some((size.x, size.y));
        }

        // Top toolbar occupies full width and is independent of the controls panel
        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        // Controls panel should only take space from the canvas area below the toolbar
        let viewport_width = ctx.input(|i| i.screen_rect().width());
        let clamped_width = self
            .controls_panel_width
            .clamp(180.0, (viewport_width * 0.9).max(180.0));

        egui::SidePanel::right("controls_panel")
            .resizable(true)
            .default_width(clamped_width)
            .show(ctx, |ui| {
                let current_width = ui.available_width();
                let max_allowed = (viewport_width * 0.9).max(180.0);
                self.controls_panel_width = current_width.clamp(180.0, max_allowed);
                self.draw_controls_panel(ui);
            });

        // Central canvas area (below the toolbar)
        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });

        // Unsaved changes confirmation dialog
        if self.file.show_unsaved_dialog {
            let title = match self.file.pending_confirm_action {
                Some(PendingConfirmAction::Quit) => "Unsaved changes — Quit?",
                Some(PendingConfirmAction::New) => "Unsaved changes — Create New?",
                Some(PendingConfirmAction::Open) => "Unsaved changes — Open File?",
                None => "Unsaved changes",
            };
            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label("You have unsaved changes. Are you sure you want to continue?");
                    ui.horizontal(|ui| {
                        let confirm_label = match self.file.pending_confirm_action {
                            Some(PendingConfirmAction::Quit) => "Discard and Quit",
                            Some(PendingConfirmAction::New) => "Discard and Create New",
                            Some(PendingConfirmAction::Open) => "Discard and Open",
                            None => "Discard",
                        };
                        if ui.button(confirm_label).clicked() {
                            match self.file.pending_confirm_action {
                                Some(PendingConfirmAction::New) => {
                                    self.new_map();
                                }
                                Some(PendingConfirmAction::Open) => {
                                    self.load_map();
                                }
                                Some(PendingConfirmAction::Quit) => {
                                    // Allow one close request to pass without interception
                                    self.file.allow_close_on_next_request = true;
                                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                                }
                                None => {}
                            }
                            self.file.show_unsaved_dialog = false;
                            self.file.pending_confirm_action = None;
                        }
                        if ui.button("Cancel").clicked() {
                            self.file.show_unsaved_dialog = false;
                            self.file.pending_confirm_action = None;
                        }
                    });
                });
        }
    }
}

impl HexMapApp {
    /// Draws the top toolbar: file operations, undo/redo, export, theme.
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            // File operations
            if ui.button("New").clicked() {
                if self.file.has_unsaved_changes {
                    self.file.show_unsaved_dialog = true;
                    self.file.pending_confirm_action = Some(PendingConfirmAction::New);
                } else {
                    self.new_map();
                }
            }
            if ui.button("Open").clicked() {
                if self.file.has_unsaved_changes {
                    self.file.show_unsaved_dialog = true;
                    self.file.pending_confirm_action = Some(PendingConfirmAction::Open);
                } else {
                    self.load_map();
                }
            }
            if ui.button("Save").clicked() {
                self.save_map();
            }
            if ui.button("Save As").clicked() {
                self.save_as_map();
            }

            ui.separator();

            // Undo/Redo operations
            ui.add_enabled_ui(self.session.undo.can_undo(), |ui| {
                if ui.button("⟲ Undo").clicked() {
                    self.perform_undo();
                }
            });
            ui.add_enabled_ui(self.session.undo.can_redo(), |ui| {
                if ui.button("⟳ Redo").clicked() {
                    self.perform_redo();
                }
            });

            ui.separator();

            // Export
            if ui.button("Export SVG").clicked() {
                self.export_svg();
            }
            #[cfg(not(target_arch = "wasm32"))]
            if ui.button("Export PNG").clicked() {
                self.export_png();
            }

            ui.separator();

            let theme_label = if self.dark_mode { "☀ Light" } else { "🌙 Dark" };
            if ui.button(theme_label).clicked() {
                self.dark_mode = !self.dark_mode;
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{:.0}%", self.canvas.zoom_factor * 100.0));
                ui.label("Zoom:");
            });
        });
    }

    /// Draws the right-hand controls panel: layer picker, tool picker, and
    /// the per-layer control sections.
    fn draw_controls_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Layers");
        ui.horizontal_wrapped(|ui| {
            for layer in Layer::ALL {
                let selected = self.session.layer == layer;
                if ui.selectable_label(selected, layer.label()).clicked() && !selected {
                    self.session.switch_layer(layer);
                }
            }
        });

        let tools = self.session.layer.allowed_tools();
        if !tools.is_empty() {
            ui.separator();
            ui.heading("Tools");
            ui.horizontal_wrapped(|ui| {
                for tool in tools {
                    let selected = self.session.tool == *tool;
                    if ui.selectable_label(selected, tool.label()).clicked() {
                        self.session.switch_tool(*tool);
                    }
                }
            });
        }

        ui.separator();
        match self.session.layer {
            Layer::Grid => self.draw_grid_controls(ui),
            Layer::Color | Layer::Boundary | Layer::Path => self.draw_color_controls(ui),
            Layer::Object => self.draw_object_controls(ui),
            Layer::Text => {
                self.draw_color_controls(ui);
                ui.separator();
                self.draw_text_controls(ui);
            }
        }
    }

    /// Swatch palette plus the current primary/secondary indicators.
    fn draw_color_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Colors");
        if let Some((primary, secondary)) = self.session.active_colors() {
            let (primary, secondary) = (primary.to_string(), secondary.to_string());
            ui.horizontal(|ui| {
                ui.label("Primary:");
                Self::color_chip(ui, &primary);
                ui.label("Secondary:");
                Self::color_chip(ui, &secondary);
            });
        }
        ui.label("Left-click a swatch for primary, right-click for secondary.");
        self.draw_swatches(ui);
    }

    /// A small non-interactive color square.
    fn color_chip(ui: &mut egui::Ui, color: &str) {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 18.0), egui::Sense::hover());
        ui.painter()
            .rect_filled(rect, 2.0, rendering::parse_hex_color(color));
    }

    /// The shared swatch grid; routes picks through the session so the grid
    /// layer's canvas/grid recolors stay undoable.
    fn draw_swatches(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for color in SWATCH_COLORS {
                let button = egui::Button::new("  ")
                    .fill(rendering::parse_hex_color(color))
                    .min_size(egui::vec2(22.0, 22.0));
                let response = ui.add(button);
                if response.clicked() {
                    self.session.set_primary_color(color);
                    self.file.has_unsaved_changes = true;
                }
                if response.secondary_clicked() {
                    self.session.set_secondary_color(color);
                    self.file.has_unsaved_changes = true;
                }
            }
        });
    }

    /// Grid layer controls: orientation, canvas color, grid color, thickness.
    fn draw_grid_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Grid");
        ui.horizontal(|ui| {
            ui.label("Orientation:");
            let current = self.session.map.orientation;
            if ui
                .selectable_label(current == Orientation::Horizontal, "Horizontal")
                .clicked()
            {
                self.session.set_orientation(Orientation::Horizontal);
                self.file.has_unsaved_changes = true;
            }
            if ui
                .selectable_label(current == Orientation::Vertical, "Vertical")
                .clicked()
            {
                self.session.set_orientation(Orientation::Vertical);
                self.file.has_unsaved_changes = true;
            }
        });

        let mut thickness = self.session.map.grid_thickness;
        let response = ui.add(
            egui::Slider::new(&mut thickness, 0.0..=12.0)
                .text("Line thickness")
                .clamping(egui::SliderClamping::Always),
        );
        if response.changed() {
            self.session.set_grid_thickness(thickness);
            self.file.has_unsaved_changes = true;
        }

        ui.separator();
        ui.label("Left-click recolors the canvas, right-click the grid lines.");
        self.draw_color_controls(ui);
    }

    /// Object layer controls: the emoji palette.
    fn draw_object_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Objects");
        ui.horizontal(|ui| {
            ui.label(format!("Primary: {}", self.session.primary_object));
            ui.label(format!("Secondary: {}", self.session.secondary_object));
        });
        ui.label("Left-click an object for primary, right-click for secondary.");
        ui.horizontal_wrapped(|ui| {
            for object in OBJECT_CHOICES {
                let response = ui.button(*object);
                if response.clicked() {
                    self.session.primary_object = object.to_string();
                }
                if response.secondary_clicked() {
                    self.session.secondary_object = object.to_string();
                }
            }
        });
    }

    /// Text layer controls: content, size and style flags.
    fn draw_text_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Text");
        ui.horizontal(|ui| {
            ui.label("Content:");
            ui.text_edit_singleline(&mut self.interaction.text_input);
        });
        ui.horizontal(|ui| {
            ui.label("Size:");
            ui.add(
                egui::DragValue::new(&mut self.session.text_style.font_size)
                    .range(6.0..=200.0)
                    .speed(1.0),
            );
        });
        ui.horizontal(|ui| {
            ui.toggle_value(&mut self.session.text_style.bold, "Bold");
            ui.toggle_value(&mut self.session.text_style.italic, "Italic");
            ui.toggle_value(&mut self.session.text_style.underline, "Underline");
        });
    }

    /// Handles undo/redo keyboard shortcuts.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context for checking input
    fn handle_undo_redo_keys(&mut self, ctx: &egui::Context) {
        // Check if any text edit widget wants keyboard focus - if so, don't handle undo/redo
        let is_editing_text = ctx.wants_keyboard_input();

        if !is_editing_text {
            // Ctrl+Z for undo
            if ctx
                .input(|i| i.key_pressed(egui::Key::Z) && i.modifiers.command && !i.modifiers.shift)
            {
                self.perform_undo();
            }
            // Ctrl+Shift+Z or Ctrl+Y for redo
            else if ctx.input(|i| {
                (i.key_pressed(egui::Key::Z) && i.modifiers.command && i.modifiers.shift)
                    || (i.key_pressed(egui::Key::Y) && i.modifiers.command)
            }) {
                self.perform_redo();
            }
        }
    }

    /// Handles file-related keyboard shortcuts (New/Open/Save/Save As).
    fn handle_file_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (save, save_as, open, new) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::S) && i.modifiers.command && !i.modifiers.shift,
                i.key_pressed(egui::Key::S) && i.modifiers.command && i.modifiers.shift,
                i.key_pressed(egui::Key::O) && i.modifiers.command,
                i.key_pressed(egui::Key::N) && i.modifiers.command,
            )
        });
        if save {
            self.save_map();
        } else if save_as {
            self.save_as_map();
        } else if open {
            if self.file.has_unsaved_changes {
                self.file.show_unsaved_dialog = true;
                self.file.pending_confirm_action = Some(PendingConfirmAction::Open);
            } else {
                self.load_map();
            }
        } else if new {
            if self.file.has_unsaved_changes {
                self.file.show_unsaved_dialog = true;
                self.file.pending_confirm_action = Some(PendingConfirmAction::New);
            } else {
                self.new_map();
            }
        }
    }

    /// Handles plain-key layer and tool selection (digits for layers, letter
    /// mnemonics for tools).
    fn handle_layer_tool_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let layer_keys = [
            (egui::Key::Num1, Layer::Grid),
            (egui::Key::Num2, Layer::Color),
            (egui::Key::Num3, Layer::Object),
            (egui::Key::Num4, Layer::Boundary),
            (egui::Key::Num5, Layer::Path),
            (egui::Key::Num6, Layer::Text),
        ];
        for (key, layer) in layer_keys {
            if ctx.input(|i| i.key_pressed(key) && !i.modifiers.command) {
                self.session.switch_layer(layer);
            }
        }
        let tool_keys = [
            (egui::Key::B, Tool::Brush),
            (egui::Key::G, Tool::Fill),
            (egui::Key::I, Tool::Eyedropper),
            (egui::Key::E, Tool::Eraser),
            (egui::Key::M, Tool::Select),
        ];
        for (key, tool) in tool_keys {
            if ctx.input(|i| i.key_pressed(key) && !i.modifiers.command) {
                self.session.switch_tool(tool);
            }
        }
    }

    /// Performs an undo operation.
    fn perform_undo(&mut self) {
        if self.session.undo.can_undo() {
            self.session.undo();
            self.file.has_unsaved_changes = true;
        }
    }

    /// Performs a redo operation.
    fn perform_redo(&mut self) {
        if self.session.undo.can_redo() {
            self.session.redo();
            self.file.has_unsaved_changes = true;
        }
    }
}

// Test module for headless egui-driven UI unit tests.
// Placed inside the `ui` module so tests can access private methods like
// `draw_canvas` and `handle_undo_redo_keys` without exposing them publicly.
#[cfg(test)]
mod tests;
