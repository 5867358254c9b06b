//! Domain layer for the navigation controller.

pub mod snapshot;
