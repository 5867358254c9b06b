//! Countdown controller bound to the rendering surface.

use chrono::{DateTime, Utc};
use invitation_core::clock::Clock;
use invitation_core::error::PageError;
use invitation_core::surface::{ElementId, Surface, require_id};
use tracing::{debug, info};

use crate::domain::events::TickOutcome;
use crate::domain::state::{CountdownState, Field, Step};

/// Identifier of the element wrapping the four digit displays.
pub const CONTAINER_ID: &str = "countdown";
/// Class added to the container once the target has arrived.
pub const ARRIVED_CLASS: &str = "arrived";
/// Message shown when no other is configured.
pub const DEFAULT_ARRIVED_MESSAGE: &str = "🎉 We Are Married! 🎉";

/// Countdown configuration.
#[derive(Debug, Clone)]
pub struct CountdownConfig {
    /// Event instant.
    pub target: DateTime<Utc>,
    /// Text replacing the countdown once the target has passed.
    pub arrived_message: String,
}

/// Controller driving the four digit displays.
#[derive(Debug)]
pub struct CountdownController {
    container: ElementId,
    fields: [ElementId; 4],
    state: CountdownState,
    arrived_message: String,
}

impl CountdownController {
    /// Resolves the container and the four digit displays.
    ///
    /// # Errors
    ///
    /// Returns `PageError::ElementNotFound` if any of them is missing.
    pub fn install(surface: &dyn Surface, config: CountdownConfig) -> Result<Self, PageError> {
        let container = require_id(surface, CONTAINER_ID)?;
        let fields = [
            require_id(surface, Field::Days.element_id())?,
            require_id(surface, Field::Hours.element_id())?,
            require_id(surface, Field::Minutes.element_id())?,
            require_id(surface, Field::Seconds.element_id())?,
        ];
        info!(event_at = %config.target, "countdown controller installed");
        Ok(Self {
            container,
            fields,
            state: CountdownState::new(config.target),
            arrived_message: config.arrived_message,
        })
    }

    /// Recomputes the time left and refreshes the display.
    ///
    /// # Errors
    ///
    /// Returns `PageError::StaleElement` if a display element has been removed
    /// by someone else.
    pub fn tick(
        &mut self,
        surface: &mut dyn Surface,
        clock: &dyn Clock,
    ) -> Result<TickOutcome, PageError> {
        match self.state.tick(clock.now()) {
            Step::Update { remaining, updates } => {
                for (field, text) in &updates {
                    surface.set_text(self.field_element(*field), text)?;
                }
                if !updates.is_empty() {
                    debug!(?remaining, changed = updates.len(), "countdown refreshed");
                }
                Ok(TickOutcome::Running {
                    remaining,
                    changed: updates.len(),
                })
            }
            Step::Arrive => {
                surface.set_text(self.container, &self.arrived_message)?;
                surface.set_class(self.container, ARRIVED_CLASS, true)?;
                info!(event_at = %self.state.target(), "countdown target arrived");
                Ok(TickOutcome::Arrived)
            }
            Step::Idle => Ok(TickOutcome::AlreadyArrived),
        }
    }

    /// Whether the target has been reached.
    #[must_use]
    pub fn has_arrived(&self) -> bool {
        self.state.has_arrived()
    }

    fn field_element(&self, field: Field) -> ElementId {
        match field {
            Field::Days => self.fields[0],
            Field::Hours => self.fields[1],
            Field::Minutes => self.fields[2],
            Field::Seconds => self.fields[3],
        }
    }
}
