//! Size-proportional pupil metrics and paint styles.
//!
//! Every dimension is derived from the single `size` parameter. The
//! ratios below are the visual contract hosts may rely on.

use serde::{Deserialize, Serialize};

use crate::geometry::EyeOffset;

/// Pupil width as a fraction of widget size.
pub const PUPIL_WIDTH_RATIO: f64 = 0.08;
/// Open pupil height as a fraction of widget size.
pub const PUPIL_OPEN_HEIGHT_RATIO: f64 = 0.15;
/// Blinking pupil height as a fraction of widget size.
pub const PUPIL_BLINK_HEIGHT_RATIO: f64 = 0.04;
/// Maximum gaze offset as a fraction of widget size.
pub const MAX_OFFSET_RATIO: f64 = 0.18;
/// Pupils never render smaller than one pixel.
pub const MIN_PUPIL_DIMENSION: f64 = 1.0;

/// Derived dimensions for a widget of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidgetMetrics {
    pub size: f64,
}

impl WidgetMetrics {
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    pub fn pupil_width(&self) -> f64 {
        (self.size * PUPIL_WIDTH_RATIO).max(MIN_PUPIL_DIMENSION)
    }

    pub fn pupil_height(&self, blink: BlinkState) -> f64 {
        let ratio = if blink.is_blinking {
            PUPIL_BLINK_HEIGHT_RATIO
        } else {
            PUPIL_OPEN_HEIGHT_RATIO
        };
        (self.size * ratio).max(MIN_PUPIL_DIMENSION)
    }

    /// Upper bound on `|offset|` for either pupil.
    pub fn max_offset(&self) -> f64 {
        self.size * MAX_OFFSET_RATIO
    }
}

/// Whether the eyes are currently closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlinkState {
    pub is_blinking: bool,
}

impl BlinkState {
    pub const OPEN: BlinkState = BlinkState { is_blinking: false };
    pub const CLOSED: BlinkState = BlinkState { is_blinking: true };
}

/// Observed platform trait: can the host hover a pointer?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityMode {
    pub pointer_capable: bool,
}

impl Default for CapabilityMode {
    /// Optimistic: assume a pointer until the host says otherwise.
    fn default() -> Self {
        Self {
            pointer_capable: true,
        }
    }
}

/// Which pupil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

    /// Resting center of the pupil as `(x, y)` fractions of the container.
    pub fn anchor(&self) -> (f64, f64) {
        match self {
            Eye::Left => (0.35, 0.45),
            Eye::Right => (0.65, 0.45),
        }
    }
}

/// Easing curve for presentation transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
}

/// A presentation-layer transition hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub duration_ms: u32,
    pub easing: Easing,
}

/// Everything a surface needs to paint one pupil.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PupilStyle {
    pub eye: Eye,
    /// Anchor inside the container, as fractions.
    pub anchor: (f64, f64),
    /// Translation from the anchor.
    pub translate: EyeOffset,
    pub width: f64,
    pub height: f64,
    pub transform_transition: Transition,
    pub height_transition: Transition,
}

/// Snapshot of both pupils after a paint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PupilFrame {
    /// Milliseconds since mount.
    #[serde(rename = "t")]
    pub t_ms: u64,
    pub size: f64,
    pub offset: EyeOffset,
    pub blink: BlinkState,
    pub left: PupilStyle,
    pub right: PupilStyle,
}
