//! Invitation page — countdown controller.
//!
//! Recomputes the time left until the event once per tick, writes only the
//! digits that changed, and switches once and for all to the arrived message
//! when the target instant is reached.

pub mod application;
pub mod domain;
