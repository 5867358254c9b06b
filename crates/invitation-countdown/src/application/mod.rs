//! Application layer for the countdown controller.

pub mod controller;
