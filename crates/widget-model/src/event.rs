//! Host input events observed by the widget.
//!
//! Events are the only inputs to the gaze pipeline. Each variant arrives
//! on its own [`Channel`]; the tracker subscribes per channel so that the
//! pointer path can be suspended without touching keyboard/focus tracking.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

/// Identifier of an element in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

/// Subscription channel on the host's event surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    PointerMove,
    Click,
    KeyUp,
    /// Focus gained anywhere in the document (capture phase).
    Focus,
    /// Focus lost anywhere in the document (capture phase).
    Blur,
    /// The host's hover-capability trait changed.
    HoverCapability,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::PointerMove,
        Channel::Click,
        Channel::KeyUp,
        Channel::Focus,
        Channel::Blur,
        Channel::HoverCapability,
    ];

    /// Channels that only make sense on hover-capable hosts.
    pub fn is_pointer_path(&self) -> bool {
        matches!(self, Channel::PointerMove | Channel::Click)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::PointerMove => "pointer_move",
            Channel::Click => "click",
            Channel::KeyUp => "key_up",
            Channel::Focus => "focus",
            Channel::Blur => "blur",
            Channel::HoverCapability => "hover_capability",
        }
    }
}

/// A single host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// Pointer moved; screen coordinates.
    PointerMove { x: f64, y: f64 },

    /// Primary click; screen coordinates.
    Click { x: f64, y: f64 },

    /// A key was released somewhere in the document.
    KeyUp {
        /// Key code (e.g., "KeyA", "ArrowLeft").
        code: String,
    },

    /// An element gained focus.
    Focus { target: ElementId },

    /// An element lost focus.
    Blur { target: ElementId },

    /// The host's hover capability changed.
    HoverChange { hover: bool },
}

impl HostEvent {
    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn click(x: f64, y: f64) -> Self {
        Self::Click { x, y }
    }

    pub fn key_up(code: impl Into<String>) -> Self {
        Self::KeyUp { code: code.into() }
    }

    /// The channel this event is delivered on.
    pub fn channel(&self) -> Channel {
        match self {
            Self::PointerMove { .. } => Channel::PointerMove,
            Self::Click { .. } => Channel::Click,
            Self::KeyUp { .. } => Channel::KeyUp,
            Self::Focus { .. } => Channel::Focus,
            Self::Blur { .. } => Channel::Blur,
            Self::HoverChange { .. } => Channel::HoverCapability,
        }
    }

    /// Extract the screen position if this event carries one.
    pub fn pointer_position(&self) -> Option<Point2D> {
        match self {
            Self::PointerMove { x, y } | Self::Click { x, y } => Some(Point2D::new(*x, *y)),
            _ => None,
        }
    }
}
