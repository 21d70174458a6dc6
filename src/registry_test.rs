#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::testing::RecordingRenderer;

fn size() -> ScreenSize {
    ScreenSize::new(800.0, 600.0).unwrap()
}

fn slider(name: &str) -> SliderDefaults {
    SliderDefaults { name: name.to_owned(), ..SliderDefaults::default() }
}

fn point(name: &str, re: f64, im: f64) -> PointDefaults {
    PointDefaults { name: name.to_owned(), re, im }
}

fn slider_value(registry: &VariableRegistry, id: VariableId) -> f64 {
    match registry.get(id).unwrap().value {
        VariableValue::Slider { value, .. } => value,
        VariableValue::Point { .. } => panic!("not a slider"),
    }
}

// =============================================================
// Adding and removing
// =============================================================

#[test]
fn new_registry_is_empty() {
    let registry = VariableRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
    assert!(registry.names().is_empty());
}

#[test]
fn add_preserves_creation_order() {
    let mut registry = VariableRegistry::new();
    let a = registry.add_slider(slider("a")).unwrap();
    let p = registry.add_point(point("p", 0.0, 0.0)).unwrap();
    let b = registry.add_slider(slider("b")).unwrap();
    assert_eq!(registry.names(), vec!["a", "p", "b"]);
    assert_eq!(registry.index_of(a), Some(0));
    assert_eq!(registry.index_of(p), Some(1));
    assert_eq!(registry.index_of(b), Some(2));
}

#[test]
fn slider_defaults() {
    let mut registry = VariableRegistry::new();
    let id = registry.add_slider(SliderDefaults::default()).unwrap();
    let v = registry.get(id).unwrap();
    assert_eq!(v.name, "");
    assert_eq!(v.value, VariableValue::Slider { value: 0.0, min: -1.0, max: 1.0, step: 0.01 });
    assert!(!v.is_point());
}

#[test]
fn point_has_widget_slider_does_not() {
    let mut registry = VariableRegistry::new();
    let s = registry.add_slider(slider("s")).unwrap();
    let p = registry.add_point(point("p", 1.0, 2.0)).unwrap();
    assert!(registry.widget(s).is_none());
    assert_eq!(registry.widget(p).unwrap().re_text(), "1");
}

#[test]
fn capacity_is_eight() {
    let mut registry = VariableRegistry::new();
    for i in 0..MAX_VARIABLES {
        assert!(registry.add_slider(slider(&format!("v{i}"))).is_some());
    }
    assert!(registry.is_full());
    assert_eq!(registry.add_slider(slider("extra")), None);
    assert_eq!(registry.add_point(point("extra", 0.0, 0.0)), None);
    assert_eq!(registry.len(), MAX_VARIABLES);
}

#[test]
fn remove_shifts_later_slots_down() {
    let mut registry = VariableRegistry::new();
    let a = registry.add_slider(slider("a")).unwrap();
    let b = registry.add_slider(slider("b")).unwrap();
    let c = registry.add_slider(slider("c")).unwrap();
    let removed = registry.remove(b).unwrap();
    assert_eq!(removed.name, "b");
    assert_eq!(registry.names(), vec!["a", "c"]);
    assert_eq!(registry.index_of(a), Some(0));
    assert_eq!(registry.index_of(c), Some(1));
    assert_eq!(registry.get(b), None);
}

#[test]
fn remove_unknown_is_none() {
    let mut registry = VariableRegistry::new();
    assert_eq!(registry.remove(VariableId::from(42)), None);
}

#[test]
fn ids_are_not_reused_after_removal() {
    let mut registry = VariableRegistry::new();
    let a = registry.add_slider(slider("a")).unwrap();
    registry.remove(a);
    let b = registry.add_slider(slider("b")).unwrap();
    assert_ne!(a, b);
}

#[test]
fn removal_frees_capacity() {
    let mut registry = VariableRegistry::new();
    let first = registry.add_slider(slider("0")).unwrap();
    for i in 1..MAX_VARIABLES {
        registry.add_slider(slider(&i.to_string()));
    }
    registry.remove(first);
    assert!(registry.add_point(point("p", 0.0, 0.0)).is_some());
}

// =============================================================
// Editing
// =============================================================

#[test]
fn edit_name_reports_name_change() {
    let mut registry = VariableRegistry::new();
    let id = registry.add_slider(slider("a")).unwrap();
    assert_eq!(registry.edit(id, Field::Name, "alpha"), Ok(EditOutcome::NameChanged));
    assert_eq!(registry.names(), vec!["alpha"]);
}

#[test]
fn edit_slider_value() {
    let mut registry = VariableRegistry::new();
    let id = registry.add_slider(slider("a")).unwrap();
    assert_eq!(registry.edit(id, Field::Value, " 0.25 "), Ok(EditOutcome::ValueChanged));
    assert_eq!(slider_value(&registry, id), 0.25);
}

#[test]
fn typed_value_is_not_clamped_to_range() {
    let mut registry = VariableRegistry::new();
    let id = registry.add_slider(slider("a")).unwrap();
    registry.edit(id, Field::Value, "5").unwrap();
    assert_eq!(slider_value(&registry, id), 5.0);
    assert_eq!(registry.slider_position(id), Some(1.0));
}

#[test]
fn unparsable_text_reads_as_zero() {
    let mut registry = VariableRegistry::new();
    let id = registry.add_point(point("p", 3.0, 4.0)).unwrap();
    registry.edit(id, Field::Re, "abc").unwrap();
    assert_eq!(registry.get(id).unwrap().slot_value(), (0.0, 4.0));
    assert_eq!(registry.widget(id).unwrap().re_text(), "abc");
}

#[test]
fn range_edit_keeps_value() {
    let mut registry = VariableRegistry::new();
    let id = registry.add_slider(slider("a")).unwrap();
    registry.edit(id, Field::Value, "0.5").unwrap();
    assert_eq!(registry.edit(id, Field::Max, "0.2"), Ok(EditOutcome::RangeChanged));
    assert_eq!(registry.edit(id, Field::Step, "0.1"), Ok(EditOutcome::RangeChanged));
    assert_eq!(slider_value(&registry, id), 0.5);
    assert_eq!(registry.slider_position(id), Some(0.2));
}

#[test]
fn edit_point_im_keeps_typed_text() {
    let mut registry = VariableRegistry::new();
    let id = registry.add_point(point("p", 0.0, 0.0)).unwrap();
    assert_eq!(registry.edit(id, Field::Im, "-1."), Ok(EditOutcome::ValueChanged));
    assert_eq!(registry.get(id).unwrap().point(), Some(Complex::new(0.0, -1.0)));
    assert_eq!(registry.widget(id).unwrap().im_text(), "-1.");
}

#[test]
fn edit_wrong_field_is_rejected_without_change() {
    let mut registry = VariableRegistry::new();
    let s = registry.add_slider(slider("s")).unwrap();
    let p = registry.add_point(point("p", 1.0, 1.0)).unwrap();
    assert_eq!(registry.edit(s, Field::Re, "2"), Err(RegistryError::FieldMismatch { id: s, field: Field::Re }));
    assert_eq!(registry.edit(p, Field::Min, "2"), Err(RegistryError::FieldMismatch { id: p, field: Field::Min }));
    assert_eq!(registry.get(p).unwrap().slot_value(), (1.0, 1.0));
}

#[test]
fn edit_unknown_variable() {
    let mut registry = VariableRegistry::new();
    let id = VariableId::from(9);
    assert_eq!(registry.edit(id, Field::Name, "x"), Err(RegistryError::UnknownVariable(id)));
}

// =============================================================
// Slider gesture
// =============================================================

#[test]
fn slide_clamps_to_range() {
    let mut registry = VariableRegistry::new();
    let id = registry.add_slider(slider("a")).unwrap();
    assert_eq!(registry.slide(id, 0.3), Ok(0.3));
    assert_eq!(registry.slide(id, 7.0), Ok(1.0));
    assert_eq!(registry.slide(id, -7.0), Ok(-1.0));
}

#[test]
fn slide_handles_inverted_range() {
    let mut registry = VariableRegistry::new();
    let id = registry.add_slider(slider("a")).unwrap();
    registry.edit(id, Field::Min, "2").unwrap();
    registry.edit(id, Field::Max, "-2").unwrap();
    assert_eq!(registry.slide(id, 5.0), Ok(2.0));
}

#[test]
fn slide_on_point_is_rejected() {
    let mut registry = VariableRegistry::new();
    let id = registry.add_point(point("p", 0.0, 0.0)).unwrap();
    assert!(registry.slide(id, 0.5).is_err());
    assert_eq!(registry.slider_position(id), None);
}

// =============================================================
// Points and markers
// =============================================================

#[test]
fn set_point_updates_value_and_widget() {
    let mut registry = VariableRegistry::new();
    let id = registry.add_point(point("p", 0.0, 0.0)).unwrap();
    registry.set_point(id, Complex::new(2.0, -0.5), &ViewportState::default(), Some(size())).unwrap();
    assert_eq!(registry.get(id).unwrap().slot_value(), (2.0, -0.5));
    let widget = registry.widget(id).unwrap();
    assert_eq!(widget.re_text(), "2");
    assert_eq!(widget.im_text(), "-0.5");
    assert!(widget.marker().is_some());
}

#[test]
fn set_point_on_slider_is_rejected() {
    let mut registry = VariableRegistry::new();
    let id = registry.add_slider(slider("s")).unwrap();
    assert!(registry.set_point(id, Complex::default(), &ViewportState::default(), Some(size())).is_err());
}

#[test]
fn marker_at_finds_synced_marker() {
    let mut registry = VariableRegistry::new();
    let id = registry.add_point(point("p", 0.0, 0.0)).unwrap();
    assert_eq!(registry.marker_at(Point::new(400.0, 300.0), 8.0), None);
    registry.sync_markers(&ViewportState::default(), Some(size()));
    assert_eq!(registry.marker_at(Point::new(403.0, 298.0), 8.0), Some(id));
    assert_eq!(registry.marker_at(Point::new(100.0, 100.0), 8.0), None);
}

#[test]
fn marker_at_prefers_topmost() {
    let mut registry = VariableRegistry::new();
    registry.add_point(point("under", 0.0, 0.0)).unwrap();
    let over = registry.add_point(point("over", 0.0, 0.0)).unwrap();
    registry.sync_markers(&ViewportState::default(), Some(size()));
    assert_eq!(registry.marker_at(Point::new(400.0, 300.0), 8.0), Some(over));
}

// =============================================================
// Renderer slots
// =============================================================

#[test]
fn sync_to_renderer_writes_positional_slots() {
    let mut registry = VariableRegistry::new();
    let s = registry.add_slider(slider("s")).unwrap();
    registry.add_point(point("p", 1.5, -2.0)).unwrap();
    registry.edit(s, Field::Value, "0.75").unwrap();
    let mut renderer = RecordingRenderer::new();
    registry.sync_to_renderer(&mut renderer);
    assert_eq!(renderer.last_variable(0), Some((0.75, 0.0)));
    assert_eq!(renderer.last_variable(1), Some((1.5, -2.0)));
    assert_eq!(renderer.last_variable(2), None);
}

#[test]
fn parse_number_coerces_garbage() {
    assert_eq!(parse_number("1e3"), 1000.0);
    assert_eq!(parse_number(""), 0.0);
    assert_eq!(parse_number("abc"), 0.0);
    assert_eq!(parse_number("inf"), 0.0);
    assert_eq!(parse_number("NaN"), 0.0);
}
