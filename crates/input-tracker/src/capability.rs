//! Hover-capability detection.

use peeper_platform_core::Document;
use peeper_widget_model::CapabilityMode;

/// Outcome of observing a capability change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityTransition {
    Unchanged,
    /// Hover pointing became available: resume the pointer path.
    BecamePointer,
    /// Host is now touch-only: recenter and suspend the pointer path.
    BecameTouch,
}

/// Tracks whether the host can hover a pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityDetector {
    mode: CapabilityMode,
}

impl CapabilityDetector {
    /// Query the host. Hosts that cannot answer are assumed pointer-capable.
    pub fn detect(document: &dyn Document) -> Self {
        let pointer_capable = match document.hover_capable() {
            Some(hover) => hover,
            None => {
                tracing::debug!("Host cannot report hover capability; assuming pointer");
                true
            }
        };
        Self {
            mode: CapabilityMode { pointer_capable },
        }
    }

    pub fn with_mode(mode: CapabilityMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> CapabilityMode {
        self.mode
    }

    pub fn pointer_capable(&self) -> bool {
        self.mode.pointer_capable
    }

    /// Record the host's latest hover trait.
    pub fn observe(&mut self, hover: bool) -> CapabilityTransition {
        if hover == self.mode.pointer_capable {
            return CapabilityTransition::Unchanged;
        }
        self.mode.pointer_capable = hover;
        if hover {
            CapabilityTransition::BecamePointer
        } else {
            CapabilityTransition::BecameTouch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::SyntheticDocument;

    #[test]
    fn test_detect_reads_host_trait() {
        let document = SyntheticDocument::new();
        document.set_hover_capable(Some(false));
        assert!(!CapabilityDetector::detect(&document).pointer_capable());

        document.set_hover_capable(Some(true));
        assert!(CapabilityDetector::detect(&document).pointer_capable());
    }

    #[test]
    fn test_unsupported_host_is_optimistic() {
        let document = SyntheticDocument::new();
        document.set_hover_capable(None);
        assert!(CapabilityDetector::detect(&document).pointer_capable());
    }

    #[test]
    fn test_observe_reports_transitions() {
        let mut detector = CapabilityDetector::default();
        assert_eq!(detector.observe(true), CapabilityTransition::Unchanged);
        assert_eq!(detector.observe(false), CapabilityTransition::BecameTouch);
        assert!(!detector.pointer_capable());
        assert_eq!(detector.observe(false), CapabilityTransition::Unchanged);
        assert_eq!(detector.observe(true), CapabilityTransition::BecamePointer);
    }
}
