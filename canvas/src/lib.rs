//! Drawing engine for the inkpad freehand sketching app.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! drawing core: translating raw pointer input into strokes or pan/zoom,
//! smoothing pen input with a lazy brush, keeping an undoable stroke history,
//! rendering through the camera, and rasterizing the drawing for sharing. The
//! page script only wires DOM events and buttons to [`host::DrawingSurface`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine, command queue, and testable [`engine::EngineCore`] |
//! | [`host`] | `wasm-bindgen` adapter: DOM event normalization and the frame loop |
//! | [`gesture`] | Pointer-tracking gesture state machine |
//! | [`input`] | Pointer event types and gesture state |
//! | [`brush`] | Lazy-brush smoothing filter |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`geometry`] | Points, distances, angles, bounding boxes |
//! | [`doc`] | Strokes and the document store |
//! | [`history`] | Bounded undo/redo log |
//! | [`render`] | Stroke path algorithm and canvas drawing |
//! | [`export`] | PNG rasterization within a pixel budget |
//! | [`share`] | Sharing collaborator contract and outcome taxonomy |
//! | [`config`] | Engine tunables |
//! | [`consts`] | Default values for the tunables |

pub mod brush;
pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod export;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod host;
pub mod input;
pub mod render;
pub mod share;
