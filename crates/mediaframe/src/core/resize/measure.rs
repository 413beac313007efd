//! Content Height Measurement

use crate::core::host::LayoutMetrics;

/// Measures the height to report to the hosting frame.
///
/// Prefers the wrapper root's bounding height. Otherwise takes the minimum of
/// the positive whole-document heights so the frame can shrink; a maximum
/// would let a stale tall measurement stick. Falls back to `fallback` when
/// nothing positive was measured.
pub fn measure_content_height(metrics: &LayoutMetrics, fallback: f64) -> f64 {
    if is_positive(metrics.root_height) {
        return metrics.root_height;
    }

    [
        metrics.body_scroll_height,
        metrics.document_scroll_height,
        metrics.document_offset_height,
    ]
    .into_iter()
    .filter(|h| is_positive(*h))
    .reduce(f64::min)
    .unwrap_or(fallback)
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(root: f64, body: f64, doc_scroll: f64, doc_offset: f64) -> LayoutMetrics {
        LayoutMetrics {
            root_height: root,
            body_scroll_height: body,
            document_scroll_height: doc_scroll,
            document_offset_height: doc_offset,
            viewport_width: 800.0,
        }
    }

    #[test]
    fn test_root_height_preferred() {
        assert_eq!(measure_content_height(&metrics(420.5, 900.0, 900.0, 900.0), 600.0), 420.5);
    }

    #[test]
    fn test_minimum_of_document_heights() {
        assert_eq!(measure_content_height(&metrics(0.0, 700.0, 650.0, 900.0), 600.0), 650.0);
    }

    #[test]
    fn test_non_positive_document_heights_skipped() {
        assert_eq!(measure_content_height(&metrics(0.0, 0.0, 300.0, -1.0), 600.0), 300.0);
    }

    #[test]
    fn test_fallback_when_hidden() {
        assert_eq!(measure_content_height(&metrics(0.0, 0.0, 0.0, 0.0), 600.0), 600.0);
        assert_eq!(
            measure_content_height(&metrics(f64::NAN, f64::NAN, 0.0, 0.0), 250.0),
            250.0
        );
    }
}
