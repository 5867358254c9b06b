//! Invitation page — runtime and headless driver.
//!
//! Loads a page manifest into an in-memory document, installs every
//! controller that the page supports and routes page events, countdown ticks
//! and timer deadlines to them.

pub mod config;
pub mod error;
pub mod events;
pub mod manifest;
pub mod runtime;
