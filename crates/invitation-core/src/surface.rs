//! Rendering surface abstraction.
//!
//! Controllers never look elements up ambiently. They resolve the handles they
//! need once, at installation, through this trait and keep them; afterwards
//! they only read geometry and write presentation state (classes, styles,
//! text) through the same trait.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PageError;

/// Opaque handle to an element on the rendering surface.
///
/// A surface may reuse the storage of removed elements; the generation keeps
/// a handle to a removed element from reaching whatever replaced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId {
    index: u32,
    generation: u32,
}

impl ElementId {
    /// Creates a handle for storage slot `index` in its `generation`.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Storage slot of the element.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// How many times the slot had been reused when the element was created.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}.{}", self.index, self.generation)
    }
}

/// Vertical box of an element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Distance from the top of the document, in pixels.
    pub top: f64,
    /// Rendered height, in pixels.
    pub height: f64,
}

impl Rect {
    /// Creates a new rect.
    #[must_use]
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Bottom edge in document coordinates.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Snapshot of the scrollable document root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Current vertical scroll offset.
    pub scroll_y: f64,
    /// Height of the visible window.
    pub height: f64,
    /// Total height of the document.
    pub document_height: f64,
}

impl Viewport {
    /// Total scrollable distance. Zero when the page has no overflow.
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.height).max(0.0)
    }

    /// Bottom edge of the visible window in document coordinates.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.scroll_y + self.height
    }
}

/// Description of an element to be created on the surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewElement {
    /// Tag name (`div`, `span`, `section`, ...).
    pub tag: String,
    /// Stable identifier, if any.
    pub id: Option<String>,
    /// Class list in insertion order.
    pub classes: Vec<String>,
    /// Marker attributes such as `data-lang`.
    pub attributes: BTreeMap<String, String>,
    /// Inline style declarations.
    pub styles: BTreeMap<String, String>,
    /// Text content.
    pub text: String,
    /// Layout box; defaults to zero height at the top of the document.
    pub layout: Rect,
}

impl NewElement {
    /// Starts a description with the given tag.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            ..Self::default()
        }
    }

    /// Sets the stable identifier.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    /// Adds a class.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_owned());
        self
    }

    /// Adds a marker attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Adds an inline style declaration.
    #[must_use]
    pub fn with_style(mut self, property: &str, value: &str) -> Self {
        self.styles.insert(property.to_owned(), value.to_owned());
        self
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_owned();
        self
    }

    /// Sets the layout box.
    #[must_use]
    pub fn with_layout(mut self, top: f64, height: f64) -> Self {
        self.layout = Rect::new(top, height);
        self
    }
}

/// The rendering surface every controller reads from and writes to.
///
/// Queries on removed elements return `None`/`false`; writes on removed
/// elements return `PageError::StaleElement`.
pub trait Surface {
    /// Looks up an element by its stable identifier.
    fn element_by_id(&self, id: &str) -> Option<ElementId>;

    /// Returns every live element carrying `class`, in document order.
    fn elements_with_class(&self, class: &str) -> Vec<ElementId>;

    /// Stable identifier of an element, if it has one.
    fn identifier(&self, element: ElementId) -> Option<String>;

    /// Reads a marker attribute.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Whether the element currently carries `class`.
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Adds (`enabled = true`) or removes a class. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `PageError::StaleElement` if the element no longer exists.
    fn set_class(&mut self, element: ElementId, class: &str, enabled: bool)
    -> Result<(), PageError>;

    /// Reads the text content.
    fn text(&self, element: ElementId) -> Option<String>;

    /// Replaces the text content, discarding any child elements.
    ///
    /// # Errors
    ///
    /// Returns `PageError::StaleElement` if the element no longer exists.
    fn set_text(&mut self, element: ElementId, text: &str) -> Result<(), PageError>;

    /// Reads an inline style property.
    fn style(&self, element: ElementId, property: &str) -> Option<String>;

    /// Sets an inline style property.
    ///
    /// # Errors
    ///
    /// Returns `PageError::StaleElement` if the element no longer exists.
    fn set_style(&mut self, element: ElementId, property: &str, value: &str)
    -> Result<(), PageError>;

    /// Creates a new element as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns `PageError::StaleElement` if the parent no longer exists.
    fn append_child(&mut self, parent: ElementId, child: NewElement)
    -> Result<ElementId, PageError>;

    /// Removes an element and all of its descendants.
    ///
    /// # Errors
    ///
    /// Returns `PageError::StaleElement` if the element no longer exists.
    fn remove(&mut self, element: ElementId) -> Result<(), PageError>;

    /// Whether the handle still refers to a live element.
    fn contains(&self, element: ElementId) -> bool;

    /// Live children of an element, in order.
    fn children(&self, element: ElementId) -> Vec<ElementId>;

    /// Layout box of an element in document coordinates.
    fn layout(&self, element: ElementId) -> Option<Rect>;

    /// Current viewport snapshot.
    fn viewport(&self) -> Viewport;

    /// Scrolls the document root, clamped to the scrollable range.
    fn scroll_to(&mut self, top: f64);
}

/// Resolves a required element by identifier.
///
/// # Errors
///
/// Returns `PageError::ElementNotFound` if no element carries `id`.
pub fn require_id(surface: &dyn Surface, id: &str) -> Result<ElementId, PageError> {
    surface
        .element_by_id(id)
        .ok_or_else(|| PageError::ElementNotFound(format!("#{id}")))
}

/// Resolves a non-empty set of elements by class.
///
/// # Errors
///
/// Returns `PageError::ElementNotFound` if no element carries `class`.
pub fn require_class(surface: &dyn Surface, class: &str) -> Result<Vec<ElementId>, PageError> {
    let elements = surface.elements_with_class(class);
    if elements.is_empty() {
        return Err(PageError::ElementNotFound(format!(".{class}")));
    }
    Ok(elements)
}
