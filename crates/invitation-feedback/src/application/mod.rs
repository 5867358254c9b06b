//! Application layer for the feedback controller.

pub mod controller;
