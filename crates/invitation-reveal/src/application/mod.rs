//! Application layer for the reveal controller.

pub mod controller;
