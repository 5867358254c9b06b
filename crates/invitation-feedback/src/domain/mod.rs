//! Domain layer for the feedback controller.

pub mod events;
pub mod particle;
pub mod tilt;
