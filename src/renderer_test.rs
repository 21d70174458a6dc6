#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::testing::{Call, RecordingRenderer};

// --- Style ---

#[test]
fn default_style_matches_startup_settings() {
    let style = Style::default();
    assert_eq!(style.shading_intensity, 0.01);
    assert_eq!(style.contour_intensity, 0.0);
    assert_eq!(style.decorations, 0);
    assert_eq!(style.coloring, 1);
    assert_eq!(style.grid_mode, 2);
}

#[test]
fn apply_pushes_every_setting() {
    let mut renderer = RecordingRenderer::new();
    let style = Style { shading_intensity: 0.5, contour_intensity: 0.25, decorations: 5, coloring: 3, grid_mode: 0 };
    style.apply(&mut renderer);
    assert_eq!(
        renderer.calls,
        vec![
            Call::ShadingIntensity(0.5),
            Call::ContourIntensity(0.25),
            Call::Decorations(5),
            Call::Coloring(3),
            Call::GridMode(0),
        ]
    );
}

#[test]
fn apply_does_not_redraw() {
    let mut renderer = RecordingRenderer::new();
    Style::default().apply(&mut renderer);
    assert_eq!(renderer.redraws(), 0);
}

#[test]
fn apply_clamps_intensities() {
    let mut renderer = RecordingRenderer::new();
    let style = Style { shading_intensity: 4.0, contour_intensity: -1.0, ..Style::default() };
    style.apply(&mut renderer);
    assert_eq!(renderer.calls[0], Call::ShadingIntensity(1.0));
    assert_eq!(renderer.calls[1], Call::ContourIntensity(0.0));
}

#[test]
fn style_deserializes_partial_json() {
    let style: Style = serde_json::from_str(r#"{"coloring": 4}"#).unwrap();
    assert_eq!(style.coloring, 4);
    assert_eq!(style.grid_mode, 2);
}

// --- clamp_intensity ---

#[test]
fn clamp_intensity_bounds() {
    assert_eq!(clamp_intensity(0.3), 0.3);
    assert_eq!(clamp_intensity(1.5), 1.0);
    assert_eq!(clamp_intensity(-0.5), 0.0);
    assert_eq!(clamp_intensity(f64::NAN), 0.0);
}

// --- CompileError ---

#[test]
fn compile_error_displays_message_verbatim() {
    let e = CompileError::new("unexpected token ')' at 1:7");
    assert_eq!(e.to_string(), "unexpected token ')' at 1:7");
}

#[test]
fn failed_compile_leaves_previous_program() {
    let mut renderer = RecordingRenderer::new();
    renderer.load_shader("plot(z) = z", &[]).unwrap();
    assert!(renderer.load_shader("plot(z) = (z", &[]).is_err());
    assert_eq!(renderer.program.as_deref(), Some("plot(z) = z"));
}
