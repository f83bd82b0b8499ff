//! Peeper platform core contracts.
//!
//! This crate defines what the widget needs from its host without coupling
//! to a concrete display stack: an event surface to subscribe to, a
//! document to query for focus/selection/text metrics, and a paint surface
//! for the two pupils. Tests and tools plug in synthetic implementations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use peeper_common::error::PeeperResult;
use peeper_widget_model::{Channel, ElementId, Eye, HostEvent, PupilStyle, Rect};

/// Callback invoked for every event on a subscribed channel.
pub type Listener = Arc<dyn Fn(&HostEvent) + Send + Sync>;

/// Handle returned by [`EventSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Handle to a temporary text-measurement node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// The host's event-producing surface.
pub trait EventSource: Send + Sync {
    /// Register `listener` on `channel`.
    fn subscribe(&self, channel: Channel, listener: Listener) -> SubscriptionId;

    /// Remove a listener. Returns `false` if it was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Read access to the host document plus scratch measurement nodes.
pub trait Document: Send + Sync {
    /// The element that currently holds focus, if any.
    fn active_element(&self) -> Option<ElementInfo>;

    /// Look up an element by id. Layout is read live.
    fn element(&self, id: ElementId) -> Option<ElementInfo>;

    /// Bounding box of the primary range of the active selection.
    fn selection_range_rect(&self) -> Option<Rect>;

    /// Whether the host supports hover-style pointing; `None` if the host
    /// cannot answer.
    fn hover_capable(&self) -> Option<bool>;

    /// Create a hidden, absolutely positioned, whitespace-preserving node
    /// styled with `font`.
    fn create_measure_node(&self, font: &FontSpec) -> PeeperResult<NodeId>;

    /// Set the node's text and return its rendered width in pixels.
    fn measure_text(&self, node: NodeId, text: &str) -> PeeperResult<f64>;

    /// Detach and discard a measurement node.
    fn remove_node(&self, node: NodeId);
}

/// Where the widget is mounted and where its pupils are painted.
pub trait WidgetSurface: Send + Sync {
    /// Current bounding box of the widget container.
    fn container_rect(&self) -> Rect;

    /// Paint one pupil.
    fn apply_pupil(&self, eye: Eye, style: &PupilStyle);
}

/// The three host capabilities a mounted widget uses.
#[derive(Clone)]
pub struct Host {
    pub events: Arc<dyn EventSource>,
    pub document: Arc<dyn Document>,
    pub surface: Arc<dyn WidgetSurface>,
}

impl Host {
    pub fn new(
        events: Arc<dyn EventSource>,
        document: Arc<dyn Document>,
        surface: Arc<dyn WidgetSurface>,
    ) -> Self {
        Self {
            events,
            document,
            surface,
        }
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}

/// Resolved font of a text field, copied onto measurement nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f64,
    #[serde(default = "default_weight")]
    pub weight: u16,
}

fn default_weight() -> u16 {
    400
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size_px: 16.0,
            weight: default_weight(),
        }
    }
}

impl FontSpec {
    /// CSS shorthand form (`"400 16px sans-serif"`).
    pub fn shorthand(&self) -> String {
        format!("{} {}px {}", self.weight, self.size_px, self.family)
    }
}

/// What kind of element has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Single-line text field.
    TextInput,
    /// Multi-line text field.
    TextArea,
    /// Rich-text editable region.
    ContentEditable,
    /// Anything else (buttons, links, ...).
    Other,
}

impl ElementKind {
    /// Whether key presses in this element edit text.
    pub fn accepts_text(&self) -> bool {
        !matches!(self, ElementKind::Other)
    }
}

/// Snapshot of an element's layout and text state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub id: ElementId,
    pub kind: ElementKind,
    pub rect: Rect,
    /// Current value for text fields.
    #[serde(default)]
    pub value: String,
    /// Caret index in characters, if the field has a selection.
    #[serde(default)]
    pub selection_start: Option<usize>,
    #[serde(default)]
    pub font: FontSpec,
}

impl ElementInfo {
    pub fn new(id: ElementId, kind: ElementKind, rect: Rect) -> Self {
        Self {
            id,
            kind,
            rect,
            value: String::new(),
            selection_start: None,
            font: FontSpec::default(),
        }
    }

    pub fn with_text(mut self, value: impl Into<String>, caret: Option<usize>) -> Self {
        self.value = value.into();
        self.selection_start = caret;
        self
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    /// Text preceding the caret, clamped to the value's length.
    pub fn text_before_caret(&self) -> &str {
        let caret = self.selection_start.unwrap_or(0);
        match self.value.char_indices().nth(caret) {
            Some((byte, _)) => &self.value[..byte],
            None => &self.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(value: &str, caret: Option<usize>) -> ElementInfo {
        ElementInfo::new(
            ElementId(1),
            ElementKind::TextInput,
            Rect::new(0.0, 0.0, 200.0, 30.0),
        )
        .with_text(value, caret)
    }

    #[test]
    fn text_before_caret_respects_char_boundaries() {
        assert_eq!(field("héllo", Some(2)).text_before_caret(), "hé");
        assert_eq!(field("hello", Some(99)).text_before_caret(), "hello");
        assert_eq!(field("hello", None).text_before_caret(), "");
        assert_eq!(field("", Some(0)).text_before_caret(), "");
    }

    #[test]
    fn only_text_kinds_accept_text() {
        assert!(ElementKind::TextInput.accepts_text());
        assert!(ElementKind::TextArea.accepts_text());
        assert!(ElementKind::ContentEditable.accepts_text());
        assert!(!ElementKind::Other.accepts_text());
    }

    #[test]
    fn font_shorthand() {
        let font = FontSpec {
            family: "monospace".to_string(),
            size_px: 12.0,
            weight: 700,
        };
        assert_eq!(font.shorthand(), "700 12px monospace");
    }
}
