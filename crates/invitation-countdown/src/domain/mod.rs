//! Domain layer for the countdown controller.

pub mod events;
pub mod remaining;
pub mod state;
