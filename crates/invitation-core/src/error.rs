//! Page error types.

use thiserror::Error;

use crate::surface::ElementId;

/// Top-level error type shared by every controller.
///
/// None of these are fatal to the page: the runtime logs them and carries on
/// without the controller that raised them.
#[derive(Debug, Error)]
pub enum PageError {
    /// A required element is absent from the rendering surface.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// A handle refers to an element that has since been removed.
    #[error("stale element handle: {0}")]
    StaleElement(ElementId),

    /// Invalid controller or page configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The preference store could not be read or written.
    #[error("preference store error: {0}")]
    Store(String),
}
