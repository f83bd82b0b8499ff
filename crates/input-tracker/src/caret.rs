//! Caret position estimation for focused text elements.
//!
//! Text fields do not expose caret geometry, so the caret's x position is
//! estimated by measuring the text before the caret in a hidden node that
//! copies the field's font. Wrapped lines in multi-line fields are not
//! accounted for.

use peeper_common::error::PeeperResult;
use peeper_platform_core::{Document, ElementInfo, ElementKind, FontSpec, NodeId};
use peeper_widget_model::Point2D;

/// Screen position of the caret inside `element`.
///
/// Never fails: any measurement problem falls back to the element center.
pub fn compute_caret_point(document: &dyn Document, element: &ElementInfo) -> Point2D {
    match element.kind {
        ElementKind::ContentEditable => match document.selection_range_rect() {
            Some(range) => range.top_left(),
            None => element.rect.center(),
        },
        ElementKind::TextInput | ElementKind::TextArea => {
            match text_field_caret(document, element) {
                Ok(point) => point,
                Err(e) => {
                    tracing::warn!(
                        element = element.id.0,
                        error = %e,
                        "Caret measurement failed; using field center"
                    );
                    element.rect.center()
                }
            }
        }
        ElementKind::Other => element.rect.center(),
    }
}

fn text_field_caret(document: &dyn Document, element: &ElementInfo) -> PeeperResult<Point2D> {
    let rect = element.rect;
    let node = MeasureNode::acquire(document, &element.font)?;
    let width = node.measure(element.text_before_caret())?;

    Ok(Point2D::new(rect.left() + width, rect.top() + rect.height / 2.0))
}

/// A measurement node that is removed from the document when dropped.
struct MeasureNode<'a> {
    document: &'a dyn Document,
    id: NodeId,
}

impl<'a> MeasureNode<'a> {
    fn acquire(document: &'a dyn Document, font: &FontSpec) -> PeeperResult<Self> {
        let id = document.create_measure_node(font)?;
        Ok(Self { document, id })
    }

    fn measure(&self, text: &str) -> PeeperResult<f64> {
        self.document.measure_text(self.id, text)
    }
}

impl Drop for MeasureNode<'_> {
    fn drop(&mut self) {
        self.document.remove_node(self.id);
    }
}
