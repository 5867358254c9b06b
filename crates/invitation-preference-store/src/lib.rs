//! File-backed preference store for the invitation page.

pub mod file_preference_store;
