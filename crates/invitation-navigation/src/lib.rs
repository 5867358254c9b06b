//! Invitation page — navigation and scroll controller.
//!
//! Follows the scroll position to drive the progress bar, the scroll-to-top
//! control, the active navigation link and the hero parallax.

pub mod application;
pub mod domain;
