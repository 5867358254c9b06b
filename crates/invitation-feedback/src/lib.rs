//! Invitation page — ephemeral feedback controller.
//!
//! Confetti bursts whose particles remove themselves, the RSVP
//! acknowledgment, and the pointer-driven card tilt.

pub mod application;
pub mod domain;
