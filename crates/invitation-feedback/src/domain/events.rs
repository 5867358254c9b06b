//! Events emitted by the feedback controller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a burst was fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurstOrigin {
    /// The page finished loading.
    PageReady,
    /// The countdown reached the event.
    CountdownArrived,
    /// The visitor confirmed their RSVP.
    RsvpConfirmed,
}

impl BurstOrigin {
    /// Name used in logs and on particle elements.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PageReady => "page_ready",
            Self::CountdownArrived => "countdown_arrived",
            Self::RsvpConfirmed => "rsvp_confirmed",
        }
    }
}

/// Emitted after a burst has been put on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstFired {
    /// Correlation id shared by the burst's log lines.
    pub burst_id: Uuid,
    /// What triggered it.
    pub origin: BurstOrigin,
    /// Particles created.
    pub created: usize,
    /// When the last of them expires.
    pub clears_at: DateTime<Utc>,
}
