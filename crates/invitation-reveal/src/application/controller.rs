//! Reveal controller bound to the rendering surface.

use invitation_core::error::PageError;
use invitation_core::surface::{ElementId, Surface, require_class};
use tracing::{debug, info, warn};

use crate::domain::intersection::crosses;

/// Marker class of elements to reveal.
pub const OBSERVED_CLASS: &str = "fade-in-up";
/// Class added once an element has been revealed.
pub const REVEALED_CLASS: &str = "revealed";
/// Default visible fraction needed to reveal an element.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
struct Observed {
    element: ElementId,
    revealed: bool,
}

/// Controller revealing elements as they scroll into view.
#[derive(Debug)]
pub struct RevealController {
    observed: Vec<Observed>,
    threshold: f64,
    pending: usize,
}

impl RevealController {
    /// Starts observing every element marked `fade-in-up` and immediately
    /// reveals those already in view.
    ///
    /// # Errors
    ///
    /// Returns `PageError::ElementNotFound` if nothing is marked, or
    /// `PageError::Configuration` if `threshold` is outside `[0, 1]`.
    pub fn install(surface: &mut dyn Surface, threshold: f64) -> Result<Self, PageError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PageError::Configuration(format!(
                "reveal threshold must be within [0, 1], got {threshold}"
            )));
        }
        let observed: Vec<Observed> = require_class(surface, OBSERVED_CLASS)?
            .into_iter()
            .map(|element| Observed {
                element,
                revealed: false,
            })
            .collect();
        let mut controller = Self {
            pending: observed.len(),
            observed,
            threshold,
        };
        let initially = controller.observe(surface)?;
        info!(
            observed = controller.observed.len(),
            initially_revealed = initially,
            "reveal controller installed"
        );
        Ok(controller)
    }

    /// Reveals every unrevealed element that now crosses the threshold.
    /// Returns how many were revealed by this call.
    ///
    /// # Errors
    ///
    /// Returns `PageError::StaleElement` if an element could not be marked.
    pub fn observe(&mut self, surface: &mut dyn Surface) -> Result<usize, PageError> {
        if self.pending == 0 {
            return Ok(0);
        }
        let viewport = surface.viewport();
        let mut newly = 0;
        for entry in self.observed.iter_mut().filter(|o| !o.revealed) {
            let Some(rect) = surface.layout(entry.element) else {
                // Removed from the page; it can never come into view.
                warn!(element = %entry.element, "observed element disappeared");
                entry.revealed = true;
                self.pending -= 1;
                continue;
            };
            if crosses(rect, &viewport, self.threshold) {
                surface.set_class(entry.element, REVEALED_CLASS, true)?;
                entry.revealed = true;
                self.pending -= 1;
                newly += 1;
                debug!(element = %entry.element, "revealed");
            }
        }
        Ok(newly)
    }

    /// Whether `element` has been revealed.
    #[must_use]
    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.observed
            .iter()
            .any(|o| o.element == element && o.revealed)
    }

    /// Number of observed elements still waiting to be revealed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
    }
}
