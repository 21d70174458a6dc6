//! Browser bindings: the JS renderer, `localStorage`, and the exported
//! [`GraphApp`] handle the page drives.
//!
//! Every exported method returns the resulting [`Action`]s as a JSON array
//! for the page to apply to its DOM.

use js_sys::Array;
use serde::Serialize;
use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Storage};

use crate::config::EngineConfig;
use crate::engine::{Action, EngineCore};
use crate::input::{Button, Key, Modifiers, WheelDelta};
use crate::registry::{Field, PointDefaults, SliderDefaults, VariableId};
use crate::renderer::{CompileError, Renderer};
use crate::storage::{KeyValueStore, StorageError, Theme};
use crate::transform::Point;
use crate::viewport::Bounds;

#[wasm_bindgen]
extern "C" {
    /// The page's WebGL plotter.
    pub type JsRenderer;

    #[wasm_bindgen(method, js_name = resize)]
    fn js_resize(this: &JsRenderer, width: u32, height: u32);

    #[wasm_bindgen(method, js_name = setResScale)]
    fn js_set_res_scale(this: &JsRenderer, multiplier: f64);

    #[wasm_bindgen(method, js_name = setBounds)]
    fn js_set_bounds(this: &JsRenderer, x_min: f64, y_min: f64, x_max: f64, y_max: f64);

    #[wasm_bindgen(method, js_name = setVariable)]
    fn js_set_variable(this: &JsRenderer, index: u32, re: f64, im: f64);

    #[wasm_bindgen(method, catch, js_name = loadShader)]
    fn js_load_shader(this: &JsRenderer, source: &str, names: &Array) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = redraw)]
    fn js_redraw(this: &JsRenderer);

    #[wasm_bindgen(method, js_name = setShadingIntensity)]
    fn js_set_shading_intensity(this: &JsRenderer, value: f64);

    #[wasm_bindgen(method, js_name = setContourIntensity)]
    fn js_set_contour_intensity(this: &JsRenderer, value: f64);

    #[wasm_bindgen(method, js_name = setDecorations)]
    fn js_set_decorations(this: &JsRenderer, bitmask: u32);

    #[wasm_bindgen(method, js_name = setColoring)]
    fn js_set_coloring(this: &JsRenderer, mode: u32);

    #[wasm_bindgen(method, js_name = setGridMode)]
    fn js_set_grid_mode(this: &JsRenderer, mode: u32);
}

/// Text of a thrown JS value: an `Error`'s message, a thrown string, or nothing.
fn thrown_message(error: &JsValue) -> String {
    match error.dyn_ref::<js_sys::Error>() {
        Some(error) => String::from(error.message()),
        None => error.as_string().unwrap_or_default(),
    }
}

impl Renderer for JsRenderer {
    fn resize(&mut self, pixel_width: u32, pixel_height: u32) {
        self.js_resize(pixel_width, pixel_height);
    }

    fn set_resolution_scale(&mut self, multiplier: f64) {
        self.js_set_res_scale(multiplier);
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        self.js_set_bounds(bounds.x_min, bounds.y_min, bounds.x_max, bounds.y_max);
    }

    fn set_variable(&mut self, index: usize, re: f64, im: f64) {
        match u32::try_from(index) {
            Ok(index) => self.js_set_variable(index, re, im),
            Err(e) => warn!(error = %e, index, "variable slot out of range"),
        }
    }

    fn load_shader(&mut self, source: &str, variable_names: &[String]) -> Result<(), CompileError> {
        let names: Array = variable_names.iter().map(|name| JsValue::from_str(name)).collect();
        self.js_load_shader(source, &names).map_err(|e| CompileError::new(thrown_message(&e)))
    }

    fn redraw(&mut self) {
        self.js_redraw();
    }

    fn set_shading_intensity(&mut self, value: f64) {
        self.js_set_shading_intensity(value);
    }

    fn set_contour_intensity(&mut self, value: f64) {
        self.js_set_contour_intensity(value);
    }

    fn set_decorations(&mut self, bitmask: u32) {
        self.js_set_decorations(bitmask);
    }

    fn set_coloring(&mut self, mode: u32) {
        self.js_set_coloring(mode);
    }

    fn set_grid_mode(&mut self, mode: u32) {
        self.js_set_grid_mode(mode);
    }
}

/// `window.localStorage`, when the browser allows it.
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    #[must_use]
    pub fn open() -> Self {
        let storage = match web_sys::window().map(|window| window.local_storage()) {
            Some(Ok(storage)) => storage,
            Some(Err(e)) => {
                warn!(error = %thrown_message(&e), "localStorage refused");
                None
            }
            None => None,
        };
        Self { storage }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.storage.as_ref()?.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %thrown_message(&e), "localStorage read failed");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::WriteFailed { key: key.to_owned(), message: thrown_message(&e) })
    }
}

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn to_json(actions: &[Action]) -> Result<String, JsValue> {
    serde_json::to_string(actions).map_err(to_js_error)
}

fn field_from_name(name: &str) -> Result<Field, JsValue> {
    match name {
        "name" => Ok(Field::Name),
        "value" => Ok(Field::Value),
        "min" => Ok(Field::Min),
        "max" => Ok(Field::Max),
        "step" => Ok(Field::Step),
        "re" => Ok(Field::Re),
        "im" => Ok(Field::Im),
        other => Err(JsValue::from_str(&format!("unknown field: {other}"))),
    }
}

/// Snapshot of queryable state for the page.
#[derive(Serialize)]
struct Status<'a> {
    bounds: Option<Bounds>,
    scale: f64,
    auto_redraw: bool,
    redraw_pending: bool,
    compile_error: Option<&'a str>,
    theme: Theme,
    source: &'a str,
}

/// The grapher as seen from JavaScript.
#[wasm_bindgen]
pub struct GraphApp {
    core: EngineCore<JsRenderer, LocalStore>,
    canvas: HtmlCanvasElement,
}

#[wasm_bindgen]
impl GraphApp {
    /// `config_json` may be empty for defaults.
    ///
    /// # Errors
    ///
    /// Fails when the config is malformed or out of range.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, renderer: JsRenderer, config_json: &str) -> Result<GraphApp, JsValue> {
        let config = EngineConfig::from_json(config_json).map_err(to_js_error)?;
        let core = EngineCore::new(renderer, LocalStore::open(), config).map_err(to_js_error)?;
        Ok(Self { core, canvas })
    }

    /// Initial size, style, and compile.
    ///
    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn start(&mut self) -> Result<String, JsValue> {
        let (width, height) = self.css_size();
        to_json(&self.core.start(width, height))
    }

    /// Call after the canvas element changes size.
    ///
    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn resize(&mut self) -> Result<String, JsValue> {
        let (width, height) = self.css_size();
        to_json(&self.core.set_viewport(width, height))
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    #[wasm_bindgen(js_name = setResolution)]
    pub fn set_resolution(&mut self, exponent: f64) -> Result<String, JsValue> {
        to_json(&self.core.set_resolution(exponent))
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) -> Result<String, JsValue> {
        to_json(&self.core.reset_view())
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16, modifiers: u8) -> Result<String, JsValue> {
        to_json(&self.core.on_pointer_down(Point::new(x, y), Button::from_dom(button), Modifiers::from_mask(modifiers)))
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64, modifiers: u8) -> Result<String, JsValue> {
        to_json(&self.core.on_pointer_move(Point::new(x, y), Modifiers::from_mask(modifiers)))
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64, button: i16, modifiers: u8) -> Result<String, JsValue> {
        to_json(&self.core.on_pointer_up(Point::new(x, y), Button::from_dom(button), Modifiers::from_mask(modifiers)))
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> Result<String, JsValue> {
        to_json(&self.core.on_pointer_leave())
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn wheel(&mut self, x: f64, y: f64, dx: f64, dy: f64, modifiers: u8) -> Result<String, JsValue> {
        to_json(&self.core.on_wheel(Point::new(x, y), WheelDelta { dx, dy }, Modifiers::from_mask(modifiers)))
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: String, modifiers: u8) -> Result<String, JsValue> {
        to_json(&self.core.on_key_down(Key(key), Modifiers::from_mask(modifiers)))
    }

    #[wasm_bindgen(js_name = setSource)]
    pub fn set_source(&mut self, source: &str) {
        self.core.set_source(source);
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn graph(&mut self) -> Result<String, JsValue> {
        to_json(&self.core.graph())
    }

    pub fn redraw(&mut self) {
        self.core.redraw();
    }

    #[wasm_bindgen(js_name = setAutoRedraw)]
    pub fn set_auto_redraw(&mut self, enabled: bool) {
        self.core.set_auto_redraw(enabled);
    }

    #[wasm_bindgen(js_name = setShadingIntensity)]
    pub fn set_shading_intensity(&mut self, value: f64) {
        self.core.set_shading_intensity(value);
    }

    #[wasm_bindgen(js_name = setContourIntensity)]
    pub fn set_contour_intensity(&mut self, value: f64) {
        self.core.set_contour_intensity(value);
    }

    #[wasm_bindgen(js_name = setDecorations)]
    pub fn set_decorations(&mut self, bitmask: u32) {
        self.core.set_decorations(bitmask);
    }

    #[wasm_bindgen(js_name = setColoring)]
    pub fn set_coloring(&mut self, mode: u32) {
        self.core.set_coloring(mode);
    }

    #[wasm_bindgen(js_name = setGridMode)]
    pub fn set_grid_mode(&mut self, mode: u32) {
        self.core.set_grid_mode(mode);
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&mut self) -> Result<String, JsValue> {
        to_json(&self.core.toggle_theme())
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    #[wasm_bindgen(js_name = addSlider)]
    pub fn add_slider(&mut self) -> Result<String, JsValue> {
        to_json(&self.core.add_slider(SliderDefaults::default()))
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    #[wasm_bindgen(js_name = addPoint)]
    pub fn add_point(&mut self) -> Result<String, JsValue> {
        to_json(&self.core.add_point(PointDefaults::default()))
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    #[wasm_bindgen(js_name = removeVariable)]
    pub fn remove_variable(&mut self, id: u32) -> Result<String, JsValue> {
        to_json(&self.core.remove_variable(VariableId::from(id)))
    }

    /// `field` is one of `name`, `value`, `min`, `max`, `step`, `re`, `im`.
    ///
    /// # Errors
    ///
    /// Fails for an unknown field name, an unknown variable, or a field the
    /// variable does not have.
    #[wasm_bindgen(js_name = editVariable)]
    pub fn edit_variable(&mut self, id: u32, field: &str, text: &str) -> Result<String, JsValue> {
        let field = field_from_name(field)?;
        let actions = self.core.edit_variable(VariableId::from(id), field, text).map_err(to_js_error)?;
        to_json(&actions)
    }

    /// # Errors
    ///
    /// Fails for an unknown variable or a point variable.
    #[wasm_bindgen(js_name = slideVariable)]
    pub fn slide_variable(&mut self, id: u32, value: f64) -> Result<String, JsValue> {
        let actions = self.core.slide_variable(VariableId::from(id), value).map_err(to_js_error)?;
        to_json(&actions)
    }

    /// # Errors
    ///
    /// Fails only if the status cannot be serialized.
    pub fn status(&self) -> Result<String, JsValue> {
        let status = Status {
            bounds: self.core.bounds(),
            scale: self.core.viewport().scale(),
            auto_redraw: self.core.scheduler().auto_redraw(),
            redraw_pending: self.core.scheduler().is_pending(),
            compile_error: self.core.compile_error(),
            theme: self.core.theme(),
            source: self.core.source(),
        };
        serde_json::to_string(&status).map_err(to_js_error)
    }

    /// # Errors
    ///
    /// Fails only if the variables cannot be serialized.
    pub fn variables(&self) -> Result<String, JsValue> {
        let variables: Vec<_> = self.core.registry().iter().collect();
        serde_json::to_string(&variables).map_err(to_js_error)
    }
}

impl GraphApp {
    fn css_size(&self) -> (f64, f64) {
        (f64::from(self.canvas.client_width()), f64::from(self.canvas.client_height()))
    }
}
