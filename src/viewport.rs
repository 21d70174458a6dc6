//! Viewport state: where the view is centred, how far it is zoomed, and the
//! plane rectangle ([`Bounds`]) that follows from those and the screen size.
//!
//! Every mutation computes its candidate values first and commits only when
//! they are finite and in range, so a rejected pan or zoom leaves the state
//! exactly as it was.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::Serialize;

use crate::consts::DEFAULT_SCALE;
use crate::transform::{Point, ScreenSize};

/// Error returned when a viewport mutation would break its invariants.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ViewportError {
    /// The canvas has a zero, negative, or non-finite dimension.
    #[error("invalid screen size: {width}x{height}")]
    InvalidScreenSize { width: f64, height: f64 },
    /// A zoom or reset would leave the scale non-positive or non-finite.
    #[error("invalid scale: {0}")]
    InvalidScale(f64),
    /// A pan or zoom would move the view centre off to infinity.
    #[error("invalid offset: ({re}, {im})")]
    InvalidOffset { re: f64, im: f64 },
    /// The resolution multiplier is non-positive or non-finite.
    #[error("invalid resolution multiplier: {0}")]
    InvalidResolution(f64),
}

/// The plane rectangle currently visible, handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Bounds {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Offset, scale, and oversampling factor of the view.
///
/// `scale` is the half-height of the view in plane units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    offset_re: f64,
    offset_im: f64,
    scale: f64,
    resolution_multiplier: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self { offset_re: 0.0, offset_im: 0.0, scale: DEFAULT_SCALE, resolution_multiplier: 1.0 }
    }
}

fn valid_scale(scale: f64) -> bool {
    scale.is_normal() && scale > 0.0
}

impl ViewportState {
    /// A view centred on the origin with the given half-height.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::InvalidScale`] if `scale` is not a normal positive number.
    pub fn new(scale: f64) -> Result<Self, ViewportError> {
        if !valid_scale(scale) {
            return Err(ViewportError::InvalidScale(scale));
        }
        Ok(Self { scale, ..Self::default() })
    }

    #[must_use]
    pub fn offset_re(&self) -> f64 {
        self.offset_re
    }

    #[must_use]
    pub fn offset_im(&self) -> f64 {
        self.offset_im
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn resolution_multiplier(&self) -> f64 {
        self.resolution_multiplier
    }

    /// The plane rectangle visible on a screen of the given size.
    #[must_use]
    pub fn compute_bounds(&self, size: ScreenSize) -> Bounds {
        let half_w = self.scale * size.aspect();
        Bounds {
            x_min: self.offset_re - half_w,
            y_min: self.offset_im - self.scale,
            x_max: self.offset_re + half_w,
            y_max: self.offset_im + self.scale,
        }
    }

    /// Centre the view on the origin with the given half-height.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::InvalidScale`] if `scale` is not a normal positive number.
    pub fn reset(&mut self, scale: f64) -> Result<(), ViewportError> {
        if !valid_scale(scale) {
            return Err(ViewportError::InvalidScale(scale));
        }
        self.offset_re = 0.0;
        self.offset_im = 0.0;
        self.scale = scale;
        Ok(())
    }

    /// Move the view so that content follows a pointer that moved by `delta` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::InvalidOffset`] if the new centre is not finite.
    pub fn pan(&mut self, delta: Point, size: ScreenSize) -> Result<(), ViewportError> {
        let (re, im) = self.panned_offset(delta, size);
        if !(re.is_finite() && im.is_finite()) {
            return Err(ViewportError::InvalidOffset { re, im });
        }
        self.offset_re = re;
        self.offset_im = im;
        Ok(())
    }

    fn panned_offset(&self, delta: Point, size: ScreenSize) -> (f64, f64) {
        let per_pixel = 2.0 * self.scale / size.height();
        (self.offset_re - per_pixel * delta.x, self.offset_im + per_pixel * delta.y)
    }

    /// Zoom by `exp(delta_y * rate)` keeping the plane point under `cursor` fixed.
    ///
    /// Returns the applied factor.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::InvalidScale`] or [`ViewportError::InvalidOffset`]
    /// when the zoomed view would not be representable; the state is unchanged.
    pub fn zoom_at(&mut self, cursor: Point, delta_y: f64, rate: f64, size: ScreenSize) -> Result<f64, ViewportError> {
        let factor = (delta_y * rate).exp();
        let scale = self.scale * factor;
        if !valid_scale(scale) {
            return Err(ViewportError::InvalidScale(scale));
        }

        // Pre-pan at the old scale by (1 - factor) of the centre-to-cursor offset.
        let center = size.center();
        let shift = Point::new((center.x - cursor.x) * (1.0 - factor), (center.y - cursor.y) * (1.0 - factor));
        let (re, im) = self.panned_offset(shift, size);
        if !(re.is_finite() && im.is_finite()) {
            return Err(ViewportError::InvalidOffset { re, im });
        }

        self.offset_re = re;
        self.offset_im = im;
        self.scale = scale;
        Ok(factor)
    }

    /// Set the device-pixel oversampling factor.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::InvalidResolution`] for non-positive or non-finite values.
    pub fn set_resolution_multiplier(&mut self, multiplier: f64) -> Result<(), ViewportError> {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(ViewportError::InvalidResolution(multiplier));
        }
        self.resolution_multiplier = multiplier;
        Ok(())
    }
}
