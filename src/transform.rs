//! Screen ↔ complex-plane coordinate mapping.
//!
//! Screen space is CSS pixels with the origin at the top-left corner and Y
//! growing downward. Plane space is the complex plane with the imaginary axis
//! growing upward. The mapping is affine: the view centre sits at
//! `(offset_re, offset_im)`, the vertical half-extent is `scale`, and the
//! horizontal half-extent is `scale` times the screen aspect ratio.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use serde::{Deserialize, Serialize};

use crate::viewport::{ViewportError, ViewportState};

/// A point in screen space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in the complex plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    #[must_use]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

/// Canvas dimensions in CSS pixels. Both sides are finite and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSize {
    width: f64,
    height: f64,
}

impl ScreenSize {
    /// Build a screen size, rejecting empty or non-finite dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::InvalidScreenSize`] if either side is not a
    /// finite number greater than zero.
    pub fn new(width: f64, height: f64) -> Result<Self, ViewportError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ViewportError::InvalidScreenSize { width, height });
        }
        Ok(Self { width, height })
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Width divided by height.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Screen-space centre of the canvas.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Map a screen point to the plane coordinate drawn under it.
#[must_use]
pub fn screen_to_plane(screen: Point, viewport: &ViewportState, size: ScreenSize) -> Complex {
    let half_w = viewport.scale() * size.aspect();
    let half_h = viewport.scale();
    Complex {
        re: viewport.offset_re() + (screen.x / size.width() * 2.0 - 1.0) * half_w,
        im: viewport.offset_im() - (screen.y / size.height() * 2.0 - 1.0) * half_h,
    }
}

/// Map a plane coordinate to the screen point where it is drawn.
#[must_use]
pub fn plane_to_screen(z: Complex, viewport: &ViewportState, size: ScreenSize) -> Point {
    let half_w = viewport.scale() * size.aspect();
    let half_h = viewport.scale();
    Point {
        x: ((z.re - viewport.offset_re()) / half_w + 1.0) * size.width() * 0.5,
        y: (1.0 - (z.im - viewport.offset_im()) / half_h) * size.height() * 0.5,
    }
}

/// Upper bound on label precision; beyond this `f64` has no digits left to show.
const MAX_LABEL_DIGITS: f64 = 17.0;

/// Format a plane coordinate for the cursor-position label.
///
/// The number of decimals grows as the view zooms in so that neighbouring
/// pixels stay distinguishable: `max(0, -floor(log10(scale / 1000)))`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_coordinates(z: Complex, scale: f64) -> String {
    let digits = (-(scale * 0.001).log10().floor()).clamp(0.0, MAX_LABEL_DIGITS) as usize;
    // Adding 0.0 folds -0.0 into 0.0 so the label never reads "-0.000".
    format!("{:.*} + {:.*}i", digits, z.re + 0.0, digits, z.im + 0.0)
}
