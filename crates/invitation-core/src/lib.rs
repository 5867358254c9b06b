//! Invitation Core — shared abstractions for the page controllers.
//!
//! This crate defines the traits and types every controller depends on:
//! time, randomness, the rendering surface, the preference store and the
//! timer primitives. It contains no controller logic.

pub mod clock;
pub mod document;
pub mod error;
pub mod preference;
pub mod rng;
pub mod schedule;
pub mod surface;
