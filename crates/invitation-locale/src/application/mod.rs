//! Application layer for the locale controller.

pub mod controller;
