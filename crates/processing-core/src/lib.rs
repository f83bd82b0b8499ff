//! Peeper Processing Core
//!
//! The two computations behind the widget's motion:
//! - **Gaze:** target point to bounded, distance-damped pupil offset
//! - **Blink:** randomized blink cadence running for the widget's lifetime

pub mod blink;
pub mod gaze;
