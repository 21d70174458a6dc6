//! Ordered registry of user-defined variables.
//!
//! Variables come in two kinds: sliders (a real scalar with a range and a
//! step) and points (a complex value with a draggable marker). Registry
//! order is creation order, which is also the on-screen order of the
//! variable widgets and the positional slot index handed to the renderer.
//! At most [`MAX_VARIABLES`] entries are live at once; adding more is a
//! silent no-op.
//!
//! Ids come from a monotonic counter and are never reused, so they stay
//! valid across deletions that shift positions.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::consts::MAX_VARIABLES;
use crate::renderer::Renderer;
use crate::transform::{Complex, Point, ScreenSize};
use crate::viewport::ViewportState;
use crate::widget::{Part, PointWidget};

/// Stable identity of a variable, independent of its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VariableId(u32);

impl VariableId {
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for VariableId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind-specific payload of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VariableValue {
    /// A real scalar. `min`/`max`/`step` only shape the slider gesture.
    Slider { value: f64, min: f64, max: f64, step: f64 },
    /// A complex value bound to a draggable marker.
    Point { re: f64, im: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub id: VariableId,
    /// Free-form label used to bind the variable in the expression. May be empty.
    pub name: String,
    pub value: VariableValue,
}

impl Variable {
    /// The `(re, im)` pair written to the renderer slot.
    #[must_use]
    pub fn slot_value(&self) -> (f64, f64) {
        match self.value {
            VariableValue::Slider { value, .. } => (value, 0.0),
            VariableValue::Point { re, im } => (re, im),
        }
    }

    /// The complex value of a point variable.
    #[must_use]
    pub fn point(&self) -> Option<Complex> {
        match self.value {
            VariableValue::Point { re, im } => Some(Complex::new(re, im)),
            VariableValue::Slider { .. } => None,
        }
    }

    #[must_use]
    pub fn is_point(&self) -> bool {
        matches!(self.value, VariableValue::Point { .. })
    }
}

/// Initial values for a new slider.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderDefaults {
    pub name: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SliderDefaults {
    fn default() -> Self {
        Self { name: String::new(), value: 0.0, min: -1.0, max: 1.0, step: 0.01 }
    }
}

/// Initial values for a new point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointDefaults {
    pub name: String,
    pub re: f64,
    pub im: f64,
}

/// An editable field of a variable widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    /// Slider value (the number box, not the range gesture).
    Value,
    Min,
    Max,
    Step,
    /// Real part of a point.
    Re,
    /// Imaginary part of a point.
    Im,
}

/// What an edit changed, so the caller knows how much to resend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The name list changed; the expression must be recompiled.
    NameChanged,
    /// A slot value changed.
    ValueChanged,
    /// Only the slider range or step changed; the stored value is untouched.
    RangeChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No live variable has this id.
    #[error("unknown variable: {0}")]
    UnknownVariable(VariableId),
    /// The field does not exist on this kind of variable (e.g. `Re` on a slider).
    #[error("variable {id} has no field {field:?}")]
    FieldMismatch { id: VariableId, field: Field },
}

/// Parse numeric widget text. Anything that is not a finite number reads as 0.
#[must_use]
pub fn parse_number(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[derive(Debug, Clone)]
struct Entry {
    variable: Variable,
    widget: Option<PointWidget>,
}

#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    entries: Vec<Entry>,
    next_id: u32,
}

impl VariableRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_VARIABLES
    }

    /// Live variables in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.entries.iter().map(|e| &e.variable)
    }

    #[must_use]
    pub fn get(&self, id: VariableId) -> Option<&Variable> {
        self.entry(id).map(|e| &e.variable)
    }

    /// The widget of a point variable.
    #[must_use]
    pub fn widget(&self, id: VariableId) -> Option<&PointWidget> {
        self.entry(id).and_then(|e| e.widget.as_ref())
    }

    /// Slot index of a variable.
    #[must_use]
    pub fn index_of(&self, id: VariableId) -> Option<usize> {
        self.entries.iter().position(|e| e.variable.id == id)
    }

    /// Ordered names, as bound by the renderer at compile time.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.variable.name.clone()).collect()
    }

    /// Append a slider. Returns `None` when the registry is full.
    pub fn add_slider(&mut self, defaults: SliderDefaults) -> Option<VariableId> {
        let value = VariableValue::Slider {
            value: finite_or_zero(defaults.value),
            min: finite_or_zero(defaults.min),
            max: finite_or_zero(defaults.max),
            step: finite_or_zero(defaults.step),
        };
        self.push(defaults.name, value, None)
    }

    /// Append a point and its widget. Returns `None` when the registry is full.
    pub fn add_point(&mut self, defaults: PointDefaults) -> Option<VariableId> {
        let z = Complex::new(finite_or_zero(defaults.re), finite_or_zero(defaults.im));
        self.push(defaults.name, VariableValue::Point { re: z.re, im: z.im }, Some(PointWidget::new(z)))
    }

    fn push(&mut self, name: String, value: VariableValue, widget: Option<PointWidget>) -> Option<VariableId> {
        if self.is_full() {
            debug!(len = self.entries.len(), "variable capacity reached; add ignored");
            return None;
        }
        let id = VariableId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { variable: Variable { id, name, value }, widget });
        Some(id)
    }

    /// Delete a variable (and its widget). Later variables move up one slot.
    pub fn remove(&mut self, id: VariableId) -> Option<Variable> {
        let index = self.index_of(id)?;
        Some(self.entries.remove(index).variable)
    }

    /// Apply text typed into one field of a variable widget.
    ///
    /// Numeric fields coerce unparsable text to 0. Range fields never touch
    /// the stored slider value.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] for an unknown id or a field the variable
    /// does not have; nothing is modified in that case.
    pub fn edit(&mut self, id: VariableId, field: Field, text: &str) -> Result<EditOutcome, RegistryError> {
        let entry = self.entry_mut(id).ok_or(RegistryError::UnknownVariable(id))?;
        if field == Field::Name {
            text.clone_into(&mut entry.variable.name);
            return Ok(EditOutcome::NameChanged);
        }

        let number = parse_number(text);
        match (&mut entry.variable.value, field) {
            (VariableValue::Slider { value, .. }, Field::Value) => {
                *value = number;
                Ok(EditOutcome::ValueChanged)
            }
            (VariableValue::Slider { min, .. }, Field::Min) => {
                *min = number;
                Ok(EditOutcome::RangeChanged)
            }
            (VariableValue::Slider { max, .. }, Field::Max) => {
                *max = number;
                Ok(EditOutcome::RangeChanged)
            }
            (VariableValue::Slider { step, .. }, Field::Step) => {
                *step = number;
                Ok(EditOutcome::RangeChanged)
            }
            (VariableValue::Point { re, .. }, Field::Re) => {
                *re = number;
                if let Some(widget) = entry.widget.as_mut() {
                    widget.set_text(Part::Re, text);
                }
                Ok(EditOutcome::ValueChanged)
            }
            (VariableValue::Point { im, .. }, Field::Im) => {
                *im = number;
                if let Some(widget) = entry.widget.as_mut() {
                    widget.set_text(Part::Im, text);
                }
                Ok(EditOutcome::ValueChanged)
            }
            _ => Err(RegistryError::FieldMismatch { id, field }),
        }
    }

    /// Apply slider gesture input, clamped to the slider's range.
    ///
    /// Returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] for an unknown id or a point variable.
    pub fn slide(&mut self, id: VariableId, raw: f64) -> Result<f64, RegistryError> {
        let entry = self.entry_mut(id).ok_or(RegistryError::UnknownVariable(id))?;
        let VariableValue::Slider { value, min, max, .. } = &mut entry.variable.value else {
            return Err(RegistryError::FieldMismatch { id, field: Field::Value });
        };
        *value = clamp_to_range(finite_or_zero(raw), *min, *max);
        Ok(*value)
    }

    /// Where the slider thumb sits: the stored value clamped to the current range.
    #[must_use]
    pub fn slider_position(&self, id: VariableId) -> Option<f64> {
        match self.get(id)?.value {
            VariableValue::Slider { value, min, max, .. } => Some(clamp_to_range(value, min, max)),
            VariableValue::Point { .. } => None,
        }
    }

    /// Overwrite a point's value (from a drag) and re-sync its widget.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] for an unknown id or a slider variable.
    pub fn set_point(
        &mut self,
        id: VariableId,
        z: Complex,
        viewport: &ViewportState,
        size: Option<ScreenSize>,
    ) -> Result<(), RegistryError> {
        let entry = self.entry_mut(id).ok_or(RegistryError::UnknownVariable(id))?;
        let VariableValue::Point { re, im } = &mut entry.variable.value else {
            return Err(RegistryError::FieldMismatch { id, field: Field::Re });
        };
        *re = finite_or_zero(z.re);
        *im = finite_or_zero(z.im);
        let z = Complex::new(*re, *im);
        if let Some(widget) = entry.widget.as_mut() {
            widget.sync(z, viewport, size);
        }
        Ok(())
    }

    /// Move every marker to match the current view.
    pub fn sync_markers(&mut self, viewport: &ViewportState, size: Option<ScreenSize>) {
        for entry in &mut self.entries {
            if let (Some(z), Some(widget)) = (entry.variable.point(), entry.widget.as_mut()) {
                widget.sync_marker(z, viewport, size);
            }
        }
    }

    /// The topmost marker within `radius` pixels of `screen`.
    ///
    /// Later points are drawn above earlier ones, so they win ties.
    #[must_use]
    pub fn marker_at(&self, screen: Point, radius: f64) -> Option<VariableId> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.widget.as_ref().is_some_and(|w| w.hit(screen, radius)))
            .map(|e| e.variable.id)
    }

    /// Write every live variable into its positional renderer slot.
    pub fn sync_to_renderer(&self, renderer: &mut impl Renderer) {
        for (index, variable) in self.iter().enumerate() {
            let (re, im) = variable.slot_value();
            renderer.set_variable(index, re, im);
        }
    }

    fn entry(&self, id: VariableId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.variable.id == id)
    }

    fn entry_mut(&mut self, id: VariableId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.variable.id == id)
    }
}

/// Clamp without panicking when the user set `min > max`.
fn clamp_to_range(value: f64, min: f64, max: f64) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    value.max(lo).min(hi)
}
