//! Domain layer for the locale controller.

pub mod events;
pub mod locale;
