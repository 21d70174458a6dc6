//! On-screen surfaces of a point variable: the numeric entry pair in the
//! variables menu and the draggable marker on the canvas.
//!
//! The variable is the source of truth. Text the user typed is kept as typed
//! (so a half-written `"1."` is not reformatted under the cursor), but a drag
//! or any other programmatic change rewrites both texts from the value.

#[cfg(test)]
#[path = "widget_test.rs"]
mod widget_test;

use crate::transform::{Complex, Point, ScreenSize, plane_to_screen};
use crate::viewport::ViewportState;

/// Which half of the numeric entry pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Re,
    Im,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointWidget {
    re_text: String,
    im_text: String,
    marker: Option<Point>,
}

/// Text shown in a numeric field for `value`.
#[must_use]
pub fn format_number(value: f64) -> String {
    format!("{}", value + 0.0)
}

impl PointWidget {
    #[must_use]
    pub fn new(value: Complex) -> Self {
        Self { re_text: format_number(value.re), im_text: format_number(value.im), marker: None }
    }

    #[must_use]
    pub fn re_text(&self) -> &str {
        &self.re_text
    }

    #[must_use]
    pub fn im_text(&self) -> &str {
        &self.im_text
    }

    /// Screen position of the marker; `None` until the canvas has a size.
    #[must_use]
    pub fn marker(&self) -> Option<Point> {
        self.marker
    }

    /// Keep user-typed text for one field.
    pub fn set_text(&mut self, part: Part, text: &str) {
        match part {
            Part::Re => text.clone_into(&mut self.re_text),
            Part::Im => text.clone_into(&mut self.im_text),
        }
    }

    /// Re-derive both texts and the marker from `value`.
    pub fn sync(&mut self, value: Complex, viewport: &ViewportState, size: Option<ScreenSize>) {
        self.re_text = format_number(value.re);
        self.im_text = format_number(value.im);
        self.sync_marker(value, viewport, size);
    }

    /// Move the marker to where `value` is drawn, leaving the texts alone.
    pub fn sync_marker(&mut self, value: Complex, viewport: &ViewportState, size: Option<ScreenSize>) {
        self.marker = size.map(|size| plane_to_screen(value, viewport, size));
    }

    /// Whether `screen` is within `radius` pixels of the marker.
    #[must_use]
    pub fn hit(&self, screen: Point, radius: f64) -> bool {
        self.marker.is_some_and(|m| {
            let dx = m.x - screen.x;
            let dy = m.y - screen.y;
            dx * dx + dy * dy <= radius * radius
        })
    }
}
