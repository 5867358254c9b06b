//! Viewport intersection geometry.

use invitation_core::surface::{Rect, Viewport};

/// Fraction of `rect` inside the viewport, in `[0, 1]`.
///
/// A zero-height element is fully intersecting when its top edge lies within
/// the viewport (edges included) and not at all otherwise.
#[must_use]
pub fn intersection_ratio(rect: Rect, viewport: &Viewport) -> f64 {
    let view_top = viewport.scroll_y;
    let view_bottom = viewport.bottom();

    if rect.height <= 0.0 {
        return if rect.top >= view_top && rect.top <= view_bottom {
            1.0
        } else {
            0.0
        };
    }

    let visible = rect.bottom().min(view_bottom) - rect.top.max(view_top);
    (visible / rect.height).clamp(0.0, 1.0)
}

/// Whether `rect` crosses `threshold`. A threshold of zero requires at least
/// touching the viewport.
#[must_use]
pub fn crosses(rect: Rect, viewport: &Viewport, threshold: f64) -> bool {
    let ratio = intersection_ratio(rect, viewport);
    if threshold <= 0.0 {
        return ratio > 0.0 || (rect.bottom() >= viewport.scroll_y && rect.top <= viewport.bottom());
    }
    ratio >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(scroll_y: f64) -> Viewport {
        Viewport {
            scroll_y,
            height: 800.0,
            document_height: 4000.0,
        }
    }

    #[test]
    fn test_fully_visible_element() {
        let ratio = intersection_ratio(Rect::new(100.0, 200.0), &viewport(0.0));
        assert!((ratio - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partially_visible_element() {
        // 700..1100 against 0..800: 100 of 400 visible.
        let ratio = intersection_ratio(Rect::new(700.0, 400.0), &viewport(0.0));
        assert!((ratio - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_element_below_viewport() {
        let ratio = intersection_ratio(Rect::new(900.0, 400.0), &viewport(0.0));
        assert!(ratio.abs() < f64::EPSILON);
        assert!(!crosses(Rect::new(900.0, 400.0), &viewport(0.0), 0.1));
    }

    #[test]
    fn test_element_above_viewport() {
        let ratio = intersection_ratio(Rect::new(0.0, 300.0), &viewport(1000.0));
        assert!(ratio.abs() < f64::EPSILON);
    }

    #[test]
    fn test_element_taller_than_viewport() {
        // 0..4000 against 1000..1800.
        let ratio = intersection_ratio(Rect::new(0.0, 4000.0), &viewport(1000.0));
        assert!((ratio - 0.2).abs() < 1e-9);
        assert!(crosses(Rect::new(0.0, 4000.0), &viewport(1000.0), 0.1));
    }

    #[test]
    fn test_threshold_boundary() {
        // Exactly 10% visible: 760..1160 against 0..800 → 40 / 400.
        assert!(crosses(Rect::new(760.0, 400.0), &viewport(0.0), 0.1));
        assert!(!crosses(Rect::new(761.0, 400.0), &viewport(0.0), 0.1));
    }

    #[test]
    fn test_zero_height_element() {
        assert!((intersection_ratio(Rect::new(400.0, 0.0), &viewport(0.0)) - 1.0).abs() < f64::EPSILON);
        assert!(intersection_ratio(Rect::new(801.0, 0.0), &viewport(0.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_threshold_accepts_touching_edge() {
        assert!(crosses(Rect::new(800.0, 100.0), &viewport(0.0), 0.0));
        assert!(!crosses(Rect::new(801.0, 100.0), &viewport(0.0), 0.0));
    }
}
