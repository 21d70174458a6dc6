//! Contract with the external rendering engine.
//!
//! The renderer compiles expression source into a shader program and draws
//! it for the current bounds, variable slots, and style. This crate never
//! rasterizes anything itself; it only drives an implementation of
//! [`Renderer`]. In the browser that implementation is a JS object (see
//! [`crate::web`]); in tests it is a recording double.

#[cfg(test)]
#[path = "renderer_test.rs"]
mod renderer_test;

use serde::Deserialize;

use crate::viewport::Bounds;

/// Malformed expression source. The message is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
}

impl CompileError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Operations the controller needs from the rendering engine.
pub trait Renderer {
    /// Reallocate the target surface, in device pixels.
    fn resize(&mut self, pixel_width: u32, pixel_height: u32);

    /// Oversampling factor for subsequent renders.
    fn set_resolution_scale(&mut self, multiplier: f64);

    /// Plane rectangle for the next render.
    fn set_bounds(&mut self, bounds: Bounds);

    /// Write positional variable slot `index` (always below [`crate::consts::MAX_VARIABLES`]).
    fn set_variable(&mut self, index: usize, re: f64, im: f64);

    /// Compile `source`, binding `variable_names` to slots by position.
    ///
    /// On failure the previously loaded program must stay active.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] when the source does not compile.
    fn load_shader(&mut self, source: &str, variable_names: &[String]) -> Result<(), CompileError>;

    /// Draw the current program with the current bounds and variables.
    fn redraw(&mut self);

    fn set_shading_intensity(&mut self, value: f64);

    fn set_contour_intensity(&mut self, value: f64);

    fn set_decorations(&mut self, bitmask: u32);

    fn set_coloring(&mut self, mode: u32);

    fn set_grid_mode(&mut self, mode: u32);
}

/// Cosmetic renderer settings. Each one is independent of the others.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Shading intensity in `[0, 1]`.
    pub shading_intensity: f64,
    /// Contour intensity in `[0, 1]`.
    pub contour_intensity: f64,
    /// Bitmask of enabled decorations.
    pub decorations: u32,
    /// Colouring mode index.
    pub coloring: u32,
    /// Grid mode index.
    pub grid_mode: u32,
}

impl Default for Style {
    fn default() -> Self {
        Self { shading_intensity: 0.01, contour_intensity: 0.0, decorations: 0, coloring: 1, grid_mode: 2 }
    }
}

/// Clamp an intensity into `[0, 1]`, mapping `NaN` to 0.
#[must_use]
pub fn clamp_intensity(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

impl Style {
    /// Push every setting to the renderer.
    pub fn apply(&self, renderer: &mut impl Renderer) {
        renderer.set_shading_intensity(clamp_intensity(self.shading_intensity));
        renderer.set_contour_intensity(clamp_intensity(self.contour_intensity));
        renderer.set_decorations(self.decorations);
        renderer.set_coloring(self.coloring);
        renderer.set_grid_mode(self.grid_mode);
    }
}
