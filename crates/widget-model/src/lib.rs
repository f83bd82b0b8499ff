//! Peeper Widget Model
//!
//! Defines the data contracts shared by every Peeper crate:
//! - **Events:** Host input events (pointer, click, key, focus, hover capability)
//! - **Geometry:** Screen points, rectangles, and pupil offsets
//! - **Metrics:** Size-proportional pupil dimensions and paint styles
//!
//! All coordinates are logical screen pixels. Nothing here is persisted;
//! every value is recomputed per event or per frame.

pub mod event;
pub mod geometry;
pub mod metrics;

pub use event::*;
pub use geometry::*;
pub use metrics::*;
