//! The controller: one owned aggregate holding the viewport, drag state,
//! variable registry, redraw scheduler, and the injected renderer and store.
//!
//! Every input handler takes `&mut self`, runs to completion, and leaves the
//! state consistent: a mutation and its bounds push / slot resync happen in
//! the same call. Handlers return the [`Action`]s the host page must apply
//! to its DOM (field texts, marker positions, the coordinates label, ...).
//! Rendering itself only ever goes through the [`RedrawScheduler`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, EngineConfig};
use crate::input::{Button, DragState, Key, Modifiers, WheelDelta};
use crate::redraw::{RedrawOutcome, RedrawScheduler};
use crate::registry::{
    EditOutcome, Field, PointDefaults, RegistryError, SliderDefaults, Variable, VariableId, VariableRegistry,
};
use crate::renderer::{Renderer, Style, clamp_intensity};
use crate::storage::{KeyValueStore, Theme, load_source, load_theme, save_source, save_theme};
use crate::transform::{Point, ScreenSize, format_coordinates, screen_to_plane};
use crate::viewport::{Bounds, ViewportState};

/// Shown when the renderer rejects source without saying why.
const FALLBACK_COMPILE_MESSAGE: &str = "compile failed";

/// DOM updates returned from handlers for the host to apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// New text for the cursor-coordinates label.
    CursorLabel { text: String },
    /// Move a point marker to a screen position.
    MarkerMoved { id: VariableId, x: f64, y: f64 },
    /// Overwrite the numeric fields of a point widget.
    PointFieldsChanged { id: VariableId, re: String, im: String },
    /// A slider's stored value and where its thumb should sit.
    SliderChanged { id: VariableId, value: f64, position: f64 },
    /// A variable widget should be appended to the menu.
    VariableAdded { variable: Variable },
    /// A variable widget (and marker, for points) should be removed.
    VariableRemoved { id: VariableId },
    /// The expression compiled; hide any error message.
    CompileSucceeded,
    /// The expression did not compile; show this message.
    CompileFailed { message: String },
    /// Put this text on the clipboard.
    CopyToClipboard { text: String },
    /// Apply this theme to the page.
    ThemeChanged { theme: Theme },
}

/// Core controller state, independent of the browser.
pub struct EngineCore<R: Renderer, S: KeyValueStore> {
    renderer: R,
    store: S,
    config: EngineConfig,
    viewport: ViewportState,
    size: Option<ScreenSize>,
    drag: DragState,
    cursor: Option<Point>,
    registry: VariableRegistry,
    scheduler: RedrawScheduler,
    style: Style,
    source: String,
    compile_error: Option<String>,
    theme: Theme,
}

impl<R: Renderer, S: KeyValueStore> EngineCore<R, S> {
    /// Build the controller around a renderer and a preference store.
    ///
    /// Loads the persisted source and theme but does not touch the renderer
    /// until [`EngineCore::start`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `config` fails validation.
    pub fn new(renderer: R, store: S, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let viewport = ViewportState::new(config.default_scale)
            .map_err(|_| ConfigError::Invalid { field: "default_scale", value: config.default_scale })?;
        let source = load_source(&store);
        let theme = load_theme(&store);
        Ok(Self {
            renderer,
            store,
            viewport,
            size: None,
            drag: DragState::Idle,
            cursor: None,
            registry: VariableRegistry::new(),
            scheduler: RedrawScheduler::new(config.auto_redraw),
            style: config.style,
            source,
            compile_error: None,
            theme,
            config,
        })
    }

    /// Push the initial style, size the surface, compile, and report the theme.
    pub fn start(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.style.apply(&mut self.renderer);
        let mut actions = vec![Action::ThemeChanged { theme: self.theme }];
        actions.extend(self.set_viewport(width, height));
        self.compile(true, &mut actions);
        actions
    }

    // --- Viewport ---

    /// The canvas was resized (CSS pixels). Offset and scale are kept.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        let size = match ScreenSize::new(width, height) {
            Ok(size) => size,
            Err(e) => {
                debug!(error = %e, "resize ignored");
                return Vec::new();
            }
        };
        self.size = Some(size);
        self.push_surface();
        let mut actions = Vec::new();
        self.view_changed(&mut actions);
        self.push_cursor_label(&mut actions);
        actions
    }

    /// Set the oversampling factor to `2^exponent` and resize the surface.
    pub fn set_resolution(&mut self, exponent: f64) -> Vec<Action> {
        if let Err(e) = self.viewport.set_resolution_multiplier(exponent.exp2()) {
            debug!(error = %e, "resolution change ignored");
            return Vec::new();
        }
        self.push_surface();
        let mut actions = Vec::new();
        self.view_changed(&mut actions);
        actions
    }

    /// Centre on the origin at the configured scale.
    pub fn reset_view(&mut self) -> Vec<Action> {
        if let Err(e) = self.viewport.reset(self.config.default_scale) {
            debug!(error = %e, "reset ignored");
            return Vec::new();
        }
        let mut actions = Vec::new();
        self.view_changed(&mut actions);
        self.push_cursor_label(&mut actions);
        actions
    }

    // --- Input events ---

    /// Start a gesture: drag the marker under the pointer, or pan the background.
    pub fn on_pointer_down(&mut self, screen: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.cursor = Some(screen);
        if button != Button::Primary {
            return Vec::new();
        }
        self.drag = match self.registry.marker_at(screen, self.config.marker_radius_px) {
            Some(id) => DragState::DraggingPoint { id },
            None => DragState::Panning { last_screen: screen },
        };
        debug!(state = ?self.drag, "drag started");
        Vec::new()
    }

    pub fn on_pointer_move(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        match self.drag {
            DragState::Idle => {}
            DragState::Panning { last_screen } => {
                self.drag = DragState::Panning { last_screen: screen };
                self.pan(Point::new(screen.x - last_screen.x, screen.y - last_screen.y), &mut actions);
            }
            DragState::DraggingPoint { id } => self.drag_point(id, screen, &mut actions),
        }
        self.cursor = Some(screen);
        self.push_cursor_label(&mut actions);
        actions
    }

    /// End any gesture. Safe to call without a matching pointer-down.
    pub fn on_pointer_up(&mut self, screen: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.cursor = Some(screen);
        self.end_drag();
        Vec::new()
    }

    /// The pointer left the canvas; drop any gesture so it cannot get stuck.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.end_drag();
        Vec::new()
    }

    /// Zoom about the cursor.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        self.cursor = Some(screen);
        let mut actions = Vec::new();
        let Some(size) = self.size else {
            return actions;
        };
        match self.viewport.zoom_at(screen, delta.dy, self.config.zoom_rate, size) {
            Ok(_) => self.view_changed(&mut actions),
            Err(e) => debug!(error = %e, "zoom rejected"),
        }
        self.push_cursor_label(&mut actions);
        actions
    }

    /// Ctrl+C copies the coordinates label. Nothing else is handled here.
    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.ctrl && key.is("c") {
            if let Some(text) = self.cursor_label() {
                return vec![Action::CopyToClipboard { text }];
            }
        }
        Vec::new()
    }

    // --- Expression ---

    /// Replace the editor text and persist it. Does not compile.
    pub fn set_source(&mut self, source: &str) {
        if self.source == source {
            return;
        }
        source.clone_into(&mut self.source);
        save_source(&mut self.store, source);
    }

    /// Compile the current source with the current variable names (the "graph" action).
    pub fn graph(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.compile(true, &mut actions);
        actions
    }

    /// Explicit user redraw.
    pub fn redraw(&mut self) -> RedrawOutcome {
        self.scheduler.redraw_now(&mut self.renderer)
    }

    pub fn set_auto_redraw(&mut self, enabled: bool) {
        self.scheduler.set_auto_redraw(enabled);
    }

    // --- Style ---

    pub fn set_shading_intensity(&mut self, value: f64) -> RedrawOutcome {
        self.style.shading_intensity = clamp_intensity(value);
        self.renderer.set_shading_intensity(self.style.shading_intensity);
        self.scheduler.request_redraw(&mut self.renderer)
    }

    pub fn set_contour_intensity(&mut self, value: f64) -> RedrawOutcome {
        self.style.contour_intensity = clamp_intensity(value);
        self.renderer.set_contour_intensity(self.style.contour_intensity);
        self.scheduler.request_redraw(&mut self.renderer)
    }

    pub fn set_decorations(&mut self, bitmask: u32) -> RedrawOutcome {
        self.style.decorations = bitmask;
        self.renderer.set_decorations(bitmask);
        self.scheduler.request_redraw(&mut self.renderer)
    }

    pub fn set_coloring(&mut self, mode: u32) -> RedrawOutcome {
        self.style.coloring = mode;
        self.renderer.set_coloring(mode);
        self.scheduler.request_redraw(&mut self.renderer)
    }

    pub fn set_grid_mode(&mut self, mode: u32) -> RedrawOutcome {
        self.style.grid_mode = mode;
        self.renderer.set_grid_mode(mode);
        self.scheduler.request_redraw(&mut self.renderer)
    }

    // --- Theme ---

    pub fn set_theme(&mut self, theme: Theme) -> Vec<Action> {
        self.theme = theme;
        save_theme(&mut self.store, theme);
        info!(theme = theme.as_str(), "theme changed");
        vec![Action::ThemeChanged { theme }]
    }

    pub fn toggle_theme(&mut self) -> Vec<Action> {
        self.set_theme(self.theme.toggled())
    }

    // --- Variables ---

    /// Append a slider unless all slots are taken.
    pub fn add_slider(&mut self, defaults: SliderDefaults) -> Vec<Action> {
        let Some(id) = self.registry.add_slider(defaults) else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        self.push_added(id, &mut actions);
        self.compile(false, &mut actions);
        actions
    }

    /// Append a point and its marker unless all slots are taken.
    pub fn add_point(&mut self, defaults: PointDefaults) -> Vec<Action> {
        let Some(id) = self.registry.add_point(defaults) else {
            return Vec::new();
        };
        self.registry.sync_markers(&self.viewport, self.size);
        let mut actions = Vec::new();
        self.push_added(id, &mut actions);
        self.push_marker(id, &mut actions);
        self.compile(false, &mut actions);
        actions
    }

    /// Delete a variable; later variables shift down one slot and everything is resent.
    pub fn remove_variable(&mut self, id: VariableId) -> Vec<Action> {
        if self.registry.remove(id).is_none() {
            return Vec::new();
        }
        if self.drag.dragged_point() == Some(id) {
            self.drag = DragState::Idle;
        }
        debug!(id = %id, "variable removed");
        let mut actions = vec![Action::VariableRemoved { id }];
        self.compile(false, &mut actions);
        actions
    }

    /// Text typed into one field of a variable widget.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] for an unknown id or a field the variable
    /// does not have; no state changes in that case.
    pub fn edit_variable(&mut self, id: VariableId, field: Field, text: &str) -> Result<Vec<Action>, RegistryError> {
        let outcome = self.registry.edit(id, field, text)?;
        let mut actions = Vec::new();
        match outcome {
            EditOutcome::NameChanged => self.compile(false, &mut actions),
            EditOutcome::ValueChanged => {
                self.registry.sync_markers(&self.viewport, self.size);
                self.push_marker(id, &mut actions);
                self.push_slider(id, &mut actions);
                self.registry.sync_to_renderer(&mut self.renderer);
                self.scheduler.request_redraw(&mut self.renderer);
            }
            EditOutcome::RangeChanged => self.push_slider(id, &mut actions),
        }
        Ok(actions)
    }

    /// Slider thumb moved to `raw`; the value is clamped to the slider range.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] for an unknown id or a point variable.
    pub fn slide_variable(&mut self, id: VariableId, raw: f64) -> Result<Vec<Action>, RegistryError> {
        self.registry.slide(id, raw)?;
        let mut actions = Vec::new();
        self.push_slider(id, &mut actions);
        self.registry.sync_to_renderer(&mut self.renderer);
        self.scheduler.request_redraw(&mut self.renderer);
        Ok(actions)
    }

    // --- Queries ---

    #[must_use]
    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    #[must_use]
    pub fn screen_size(&self) -> Option<ScreenSize> {
        self.size
    }

    /// Current plane bounds, once the canvas has a size.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.size.map(|size| self.viewport.compute_bounds(size))
    }

    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    #[must_use]
    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    #[must_use]
    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn style(&self) -> Style {
        self.style
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The message of the last failed compile, cleared by the next success.
    #[must_use]
    pub fn compile_error(&self) -> Option<&str> {
        self.compile_error.as_deref()
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The plane coordinate under the last pointer position, formatted for display.
    #[must_use]
    pub fn cursor_label(&self) -> Option<String> {
        let size = self.size?;
        let z = screen_to_plane(self.cursor?, &self.viewport, size);
        Some(format_coordinates(z, self.viewport.scale()))
    }

    // --- Internals ---

    fn end_drag(&mut self) {
        if !self.drag.is_idle() {
            debug!(state = ?self.drag, "drag ended");
        }
        self.drag = DragState::Idle;
    }

    fn pan(&mut self, delta: Point, actions: &mut Vec<Action>) {
        let Some(size) = self.size else {
            return;
        };
        match self.viewport.pan(delta, size) {
            Ok(()) => self.view_changed(actions),
            Err(e) => debug!(error = %e, "pan rejected"),
        }
    }

    fn drag_point(&mut self, id: VariableId, screen: Point, actions: &mut Vec<Action>) {
        let Some(size) = self.size else {
            return;
        };
        let z = screen_to_plane(screen, &self.viewport, size);
        if let Err(e) = self.registry.set_point(id, z, &self.viewport, Some(size)) {
            debug!(error = %e, "dragged point is gone");
            self.drag = DragState::Idle;
            return;
        }
        if let Some(widget) = self.registry.widget(id) {
            actions.push(Action::PointFieldsChanged {
                id,
                re: widget.re_text().to_owned(),
                im: widget.im_text().to_owned(),
            });
        }
        self.push_marker(id, actions);
        if let (Some(index), Some(variable)) = (self.registry.index_of(id), self.registry.get(id)) {
            let (re, im) = variable.slot_value();
            self.renderer.set_variable(index, re, im);
        }
        self.scheduler.request_redraw(&mut self.renderer);
    }

    /// Resize the render surface for the current size and multiplier.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn push_surface(&mut self) {
        let Some(size) = self.size else {
            return;
        };
        let multiplier = self.viewport.resolution_multiplier();
        let width = (size.width() * multiplier).round().max(1.0) as u32;
        let height = (size.height() * multiplier).round().max(1.0) as u32;
        self.renderer.resize(width, height);
        self.renderer.set_resolution_scale(multiplier);
    }

    /// Bounds, markers, and a redraw request after any offset/scale/size change.
    fn view_changed(&mut self, actions: &mut Vec<Action>) {
        let Some(size) = self.size else {
            return;
        };
        self.renderer.set_bounds(self.viewport.compute_bounds(size));
        self.registry.sync_markers(&self.viewport, self.size);
        let points: Vec<VariableId> = self.registry.iter().filter(|v| v.is_point()).map(|v| v.id).collect();
        for id in points {
            self.push_marker(id, actions);
        }
        self.scheduler.request_redraw(&mut self.renderer);
    }

    /// Resend slots and names, then compile. `explicit` is the user's "graph" action.
    fn compile(&mut self, explicit: bool, actions: &mut Vec<Action>) {
        self.registry.sync_to_renderer(&mut self.renderer);
        let names = self.registry.names();
        match self.renderer.load_shader(&self.source, &names) {
            Ok(()) => {
                info!(variables = names.len(), "expression compiled");
                self.compile_error = None;
                self.scheduler.compile_succeeded();
                actions.push(Action::CompileSucceeded);
                if explicit {
                    self.scheduler.redraw_now(&mut self.renderer);
                } else {
                    self.scheduler.request_redraw(&mut self.renderer);
                }
            }
            Err(e) => {
                warn!(error = %e, "expression failed to compile");
                let message = if e.message.trim().is_empty() { FALLBACK_COMPILE_MESSAGE.to_owned() } else { e.message };
                self.scheduler.compile_failed();
                self.compile_error = Some(message.clone());
                actions.push(Action::CompileFailed { message });
            }
        }
    }

    fn push_added(&self, id: VariableId, actions: &mut Vec<Action>) {
        if let Some(variable) = self.registry.get(id) {
            actions.push(Action::VariableAdded { variable: variable.clone() });
        }
    }

    fn push_marker(&self, id: VariableId, actions: &mut Vec<Action>) {
        if let Some(marker) = self.registry.widget(id).and_then(|w| w.marker()) {
            actions.push(Action::MarkerMoved { id, x: marker.x, y: marker.y });
        }
    }

    fn push_slider(&self, id: VariableId, actions: &mut Vec<Action>) {
        if let (Some(variable), Some(position)) = (self.registry.get(id), self.registry.slider_position(id)) {
            let (value, _) = variable.slot_value();
            actions.push(Action::SliderChanged { id, value, position });
        }
    }

    fn push_cursor_label(&self, actions: &mut Vec<Action>) {
        if let Some(text) = self.cursor_label() {
            actions.push(Action::CursorLabel { text });
        }
    }
}
