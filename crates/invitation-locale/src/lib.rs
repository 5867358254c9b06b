//! Invitation page — locale controller.
//!
//! Tracks the active display language, shows exactly one content block per
//! content group, marks exactly one language selector, and persists the
//! visitor's choice.

pub mod application;
pub mod domain;
