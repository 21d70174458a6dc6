//! Test doubles shared by the unit tests.

use crate::renderer::{CompileError, Renderer};
use crate::storage::{KeyValueStore, StorageError};
use crate::viewport::Bounds;

/// One call made on a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Resize(u32, u32),
    ResolutionScale(f64),
    Bounds(Bounds),
    Variable(usize, f64, f64),
    LoadShader { source: String, names: Vec<String> },
    Redraw,
    ShadingIntensity(f64),
    ContourIntensity(f64),
    Decorations(u32),
    Coloring(u32),
    GridMode(u32),
}

/// Renderer that records every call.
///
/// Source with unbalanced parentheses fails to compile, like a real parser would.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<Call>,
    /// Source of the last successful compile.
    pub program: Option<String>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redraws(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Redraw).count()
    }

    pub fn last_bounds(&self) -> Option<Bounds> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::Bounds(b) => Some(*b),
            _ => None,
        })
    }

    pub fn last_variable(&self, index: usize) -> Option<(f64, f64)> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::Variable(i, re, im) if *i == index => Some((*re, *im)),
            _ => None,
        })
    }

    pub fn last_names(&self) -> Option<Vec<String>> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::LoadShader { names, .. } => Some(names.clone()),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

fn balanced(source: &str) -> bool {
    let mut depth: i64 = 0;
    for c in source.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

impl Renderer for RecordingRenderer {
    fn resize(&mut self, pixel_width: u32, pixel_height: u32) {
        self.calls.push(Call::Resize(pixel_width, pixel_height));
    }

    fn set_resolution_scale(&mut self, multiplier: f64) {
        self.calls.push(Call::ResolutionScale(multiplier));
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        self.calls.push(Call::Bounds(bounds));
    }

    fn set_variable(&mut self, index: usize, re: f64, im: f64) {
        self.calls.push(Call::Variable(index, re, im));
    }

    fn load_shader(&mut self, source: &str, variable_names: &[String]) -> Result<(), CompileError> {
        self.calls.push(Call::LoadShader { source: source.to_owned(), names: variable_names.to_vec() });
        if !balanced(source) {
            return Err(CompileError::new("unbalanced parentheses"));
        }
        self.program = Some(source.to_owned());
        Ok(())
    }

    fn redraw(&mut self) {
        self.calls.push(Call::Redraw);
    }

    fn set_shading_intensity(&mut self, value: f64) {
        self.calls.push(Call::ShadingIntensity(value));
    }

    fn set_contour_intensity(&mut self, value: f64) {
        self.calls.push(Call::ContourIntensity(value));
    }

    fn set_decorations(&mut self, bitmask: u32) {
        self.calls.push(Call::Decorations(bitmask));
    }

    fn set_coloring(&mut self, mode: u32) {
        self.calls.push(Call::Coloring(mode));
    }

    fn set_grid_mode(&mut self, mode: u32) {
        self.calls.push(Call::GridMode(mode));
    }
}

/// Store whose writes always fail, like `localStorage` in a locked-down browser.
#[derive(Debug, Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::WriteFailed { key: key.to_owned(), message: "quota exceeded".to_owned() })
    }
}
