//! Scroll position snapshot.

use invitation_core::surface::Viewport;
use serde::Serialize;

/// Tunables for scroll tracking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollConfig {
    /// Scroll offset past which the scroll-to-top control shows.
    pub top_threshold: f64,
    /// Distance below the scroll offset at which a section counts as current.
    pub look_ahead: f64,
    /// Fraction of the scroll offset the hero background moves by.
    pub parallax_factor: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            top_threshold: 300.0,
            look_ahead: 100.0,
            parallax_factor: 0.5,
        }
    }
}

/// Derived scroll state. Recomputed on every scroll, never stored anywhere
/// else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollSnapshot {
    /// Scroll offset.
    pub scroll_y: f64,
    /// Progress through the scrollable distance, 0–100.
    pub progress: f64,
    /// Whether the scroll-to-top control should be visible.
    pub top_visible: bool,
    /// Index of the current section, if any qualifies.
    pub active_section: Option<usize>,
}

impl ScrollSnapshot {
    /// Computes the snapshot for `viewport` given section tops in document
    /// order.
    #[must_use]
    pub fn compute(viewport: &Viewport, section_tops: &[f64], config: &ScrollConfig) -> Self {
        Self {
            scroll_y: viewport.scroll_y,
            progress: progress(viewport),
            top_visible: viewport.scroll_y > config.top_threshold,
            active_section: active_section(viewport.scroll_y, section_tops, config.look_ahead),
        }
    }
}

/// Scroll progress as a percentage of the scrollable distance. Zero when the
/// page does not overflow.
#[must_use]
pub fn progress(viewport: &Viewport) -> f64 {
    let max = viewport.max_scroll();
    if max <= 0.0 || !viewport.scroll_y.is_finite() {
        return 0.0;
    }
    (viewport.scroll_y / max * 100.0).clamp(0.0, 100.0)
}

/// Index of the last section whose top is at or above
/// `scroll_y + look_ahead`. When ranges overlap, the later section wins.
#[must_use]
pub fn active_section(scroll_y: f64, section_tops: &[f64], look_ahead: f64) -> Option<usize> {
    let line = scroll_y + look_ahead;
    section_tops.iter().rposition(|top| *top <= line)
}
