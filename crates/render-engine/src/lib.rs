//! Peeper Render Engine
//!
//! Applies gaze offsets and blink state to the two pupils.
//!
//! ```text
//! gaze offset ──┐
//!               ├── Renderer ── PupilStyle x2 ──► WidgetSurface
//! blink state ──┘        │
//!                        └── PupilFrame ──► observers / frames.jsonl
//! ```
//!
//! Easing between frames belongs to the surface; the renderer only hands
//! over target values plus transition hints.

pub mod renderer;
pub mod surface;
pub mod writer;

pub use renderer::*;
pub use surface::*;
