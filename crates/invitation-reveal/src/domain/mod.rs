//! Domain layer for the reveal controller.

pub mod intersection;
