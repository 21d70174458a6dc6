//! Shared numeric and string constants for the controller.

// ── Viewport ────────────────────────────────────────────────────

/// Half-height of the view, in plane units, after a reset.
pub const DEFAULT_SCALE: f64 = 3.0;

/// Wheel zoom rate: `scale *= exp(delta_y * ZOOM_RATE)`.
pub const ZOOM_RATE: f64 = 0.0007;

// ── Variables ───────────────────────────────────────────────────

/// Number of positional variable slots the renderer exposes.
pub const MAX_VARIABLES: usize = 8;

/// Screen-space hit radius in pixels for point markers.
pub const MARKER_RADIUS_PX: f64 = 8.0;

// ── Persistence ─────────────────────────────────────────────────

/// Storage key for the expression source text.
pub const SOURCE_KEY: &str = "editor_content";

/// Storage key for the light/dark theme preference.
pub const THEME_KEY: &str = "theme";

/// Expression shown when nothing (or an empty string) was persisted.
pub const DEFAULT_SOURCE: &str = "f(z) = 6z^2 - 2i - 1\nplot(z) = f(1 + sin(z)) / 8";
