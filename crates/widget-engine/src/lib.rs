//! Peeper Widget Engine
//!
//! Mounts the eye widget on a host and owns everything it subscribes to.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                    EyeWidget                      │
//! │  ┌──────────────┐   ┌───────────┐                 │
//! │  │ InputTracker │──►│ GazeSink  │──┐              │
//! │  │ (capability, │   │ (solve)   │  │  ┌──────────┐│
//! │  │  caret)      │   └───────────┘  ├─►│ Renderer ││
//! │  └──────────────┘   ┌───────────┐  │  └────┬─────┘│
//! │                     │ Blink loop│──┘       │      │
//! │                     └───────────┘          ▼      │
//! │                                     WidgetSurface │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! Unmount (or reconfigure) releases every listener and the blink timer
//! exactly once.

pub mod widget;

pub use widget::*;
