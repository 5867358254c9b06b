//! Application layer for the navigation controller.

pub mod controller;
