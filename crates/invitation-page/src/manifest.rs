//! Page manifests: JSON descriptions of the element tree and its geometry.

use std::path::Path;

use invitation_core::document::Document;
use invitation_core::error::PageError;
use invitation_core::surface::{ElementId, NewElement, Surface};
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;

/// The bundled invitation page.
pub const BUNDLED_MANIFEST: &str = include_str!("../assets/invitation.json");

/// A page: viewport height plus the top-level elements under `<body>`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageManifest {
    /// Viewport height in pixels.
    pub viewport_height: f64,
    /// Initial scroll offset.
    #[serde(default)]
    pub scroll_y: f64,
    /// Top-level elements, in document order.
    #[serde(default)]
    pub elements: Vec<ManifestElement>,
}

/// One element and its subtree.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestElement {
    /// The element itself.
    #[serde(flatten)]
    pub element: NewElement,
    /// Child elements, in document order.
    #[serde(default)]
    pub children: Vec<ManifestElement>,
}

impl PageManifest {
    /// Parses a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Manifest` if `json` is not a valid manifest.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads the manifest at `path`, or the bundled page when `path` is
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be read and
    /// `AppError::Manifest` if it is not a valid manifest.
    pub async fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => {
                let json = tokio::fs::read_to_string(path).await?;
                info!(path = %path.display(), "loading page manifest");
                Self::from_json(&json)
            }
            None => {
                info!("loading bundled page manifest");
                Self::from_json(BUNDLED_MANIFEST)
            }
        }
    }

    /// Builds the in-memory document the manifest describes.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Configuration` if the viewport height is not a
    /// positive number.
    pub fn into_document(self) -> Result<Document, PageError> {
        if !(self.viewport_height.is_finite() && self.viewport_height > 0.0) {
            return Err(PageError::Configuration(format!(
                "viewport height must be positive, got {}",
                self.viewport_height
            )));
        }
        let mut document = Document::new(self.viewport_height);
        let root = document.root();
        for element in self.elements {
            append(&mut document, root, element)?;
        }
        document.scroll_to(self.scroll_y);
        Ok(document)
    }
}

fn append(
    document: &mut Document,
    parent: ElementId,
    manifest: ManifestElement,
) -> Result<(), PageError> {
    let element = document.append_child(parent, manifest.element)?;
    for child in manifest.children {
        append(document, element, child)?;
    }
    Ok(())
}
