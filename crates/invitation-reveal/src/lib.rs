//! Invitation page — scroll reveal controller.
//!
//! Marks designated elements as revealed the first time enough of them is
//! inside the viewport. Reveals are one-shot: nothing is ever hidden again.

pub mod application;
pub mod domain;
