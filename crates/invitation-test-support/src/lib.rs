//! Shared test doubles and page fixtures for the invitation controllers.

mod clock;
mod fixtures;
mod preference;
mod rng;

pub use clock::{FixedClock, ManualClock};
pub use fixtures::{invitation_document, short_document};
pub use preference::{FailingPreferenceStore, MemoryPreferenceStore};
pub use rng::{MockRng, SequenceRng};
