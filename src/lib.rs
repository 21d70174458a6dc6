//! Interactive control layer of a complex-function grapher.
//!
//! This crate is compiled to WebAssembly and runs in the browser next to a
//! WebGL plotter. It owns everything between raw DOM input and that plotter:
//! the screen ↔ plane mapping, pan/zoom viewport state, the drag gesture
//! state machine, user-defined variables and their point markers, the redraw
//! policy, and persisted preferences. Compiling and drawing the expression
//! is the plotter's job; the page applies the returned [`engine::Action`]s to
//! its DOM.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`]: owns all state, handles every event |
//! | [`web`] | `wasm-bindgen` exports, JS renderer binding, `localStorage` |
//! | [`transform`] | Screen ↔ plane conversions and the coordinates label |
//! | [`viewport`] | Offset/scale/resolution state and visible [`viewport::Bounds`] |
//! | [`input`] | Input event types and the drag state machine |
//! | [`registry`] | Ordered slider/point variables bound to renderer slots |
//! | [`widget`] | Point widget texts and marker position |
//! | [`redraw`] | When a state change actually reaches the renderer |
//! | [`renderer`] | The [`renderer::Renderer`] contract and style settings |
//! | [`storage`] | Persisted source text and theme |
//! | [`config`] | Host-supplied engine configuration |
//! | [`consts`] | Shared numeric and string constants |

pub mod config;
pub mod consts;
pub mod engine;
pub mod input;
pub mod redraw;
pub mod registry;
pub mod renderer;
pub mod storage;
pub mod transform;
pub mod viewport;
pub mod web;
pub mod widget;

#[cfg(test)]
mod testing;
