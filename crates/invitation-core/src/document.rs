//! In-memory rendering surface.
//!
//! `Document` is a minimal element tree with classes, attributes, inline
//! styles, text and a vertical layout box per element. The headless page
//! runtime renders into it, and every controller test uses it as the fake
//! surface.
//!
//! Nodes live in an arena whose slots are recycled once their element is
//! removed, so confetti churn does not grow it. Lookups walk the tree from
//! the root and only ever touch live elements.

use std::collections::BTreeMap;

use crate::error::PageError;
use crate::surface::{ElementId, NewElement, Rect, Surface, Viewport};

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    layout: Rect,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Node {
    fn new(element: NewElement, parent: Option<ElementId>) -> Self {
        let mut classes: Vec<String> = Vec::with_capacity(element.classes.len());
        for class in element.classes {
            if !classes.contains(&class) {
                classes.push(class);
            }
        }
        Self {
            tag: element.tag,
            id: element.id,
            classes,
            attributes: element.attributes,
            styles: element.styles,
            text: element.text,
            layout: element.layout,
            parent,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// In-memory element tree implementing [`Surface`].
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    scroll_y: f64,
    viewport_height: f64,
}

impl Document {
    /// Creates an empty document with a `body` root and the given viewport
    /// height.
    #[must_use]
    pub fn new(viewport_height: f64) -> Self {
        let body = Node::new(NewElement::new("body"), None);
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(body),
            }],
            free: Vec::new(),
            scroll_y: 0.0,
            viewport_height: viewport_height.max(0.0),
        }
    }

    /// Handle of the `body` root.
    #[must_use]
    pub fn root(&self) -> ElementId {
        ElementId::new(0, 0)
    }

    /// Number of live elements, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of arena slots, live or waiting for reuse. Never more than the
    /// largest number of elements that were alive at the same time.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    /// Whether only the root is left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Tag name of a live element.
    #[must_use]
    pub fn tag(&self, element: ElementId) -> Option<&str> {
        self.node(element).map(|n| n.tag.as_str())
    }

    /// Changes the viewport height, as a window resize would.
    pub fn resize_viewport(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
        self.scroll_y = self.scroll_y.min(self.viewport().max_scroll());
    }

    /// Moves an element's layout box, as a reflow would.
    ///
    /// # Errors
    ///
    /// Returns `PageError::StaleElement` if the element no longer exists.
    pub fn set_layout(&mut self, element: ElementId, layout: Rect) -> Result<(), PageError> {
        self.node_mut(element)?.layout = layout;
        Ok(())
    }

    fn slot(&self, element: ElementId) -> Option<&Slot> {
        self.slots
            .get(element.index() as usize)
            .filter(|slot| slot.generation == element.generation())
    }

    fn node(&self, element: ElementId) -> Option<&Node> {
        self.slot(element)?.node.as_ref()
    }

    fn node_mut(&mut self, element: ElementId) -> Result<&mut Node, PageError> {
        self.slots
            .get_mut(element.index() as usize)
            .filter(|slot| slot.generation == element.generation())
            .and_then(|slot| slot.node.as_mut())
            .ok_or(PageError::StaleElement(element))
    }

    fn allocate(&mut self, node: Node) -> Result<ElementId, PageError> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return Ok(ElementId::new(index, slot.generation));
        }
        let index = u32::try_from(self.slots.len())
            .map_err(|_| PageError::Configuration("document is full".to_owned()))?;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        Ok(ElementId::new(index, 0))
    }

    fn drop_subtree(&mut self, element: ElementId) {
        let mut pending = vec![element];
        while let Some(current) = pending.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index() as usize)
                .filter(|slot| slot.generation == current.generation())
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index());
                pending.extend(node.children);
            }
        }
    }

    /// Live elements in document order.
    fn live(&self) -> impl Iterator<Item = (ElementId, &Node)> {
        let mut pending = vec![self.root()];
        std::iter::from_fn(move || {
            while let Some(element) = pending.pop() {
                if let Some(node) = self.node(element) {
                    pending.extend(node.children.iter().rev().copied());
                    return Some((element, node));
                }
            }
            None
        })
    }
}

impl Surface for Document {
    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.live()
            .find(|(_, node)| node.id.as_deref() == Some(id))
            .map(|(element, _)| element)
    }

    fn elements_with_class(&self, class: &str) -> Vec<ElementId> {
        self.live()
            .filter(|(_, node)| node.classes.iter().any(|c| c == class))
            .map(|(element, _)| element)
            .collect()
    }

    fn identifier(&self, element: ElementId) -> Option<String> {
        self.node(element)?.id.clone()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.node(element)?.attributes.get(name).cloned()
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element)
            .is_some_and(|node| node.classes.iter().any(|c| c == class))
    }

    fn set_class(
        &mut self,
        element: ElementId,
        class: &str,
        enabled: bool,
    ) -> Result<(), PageError> {
        let node = self.node_mut(element)?;
        let present = node.classes.iter().position(|c| c == class);
        match (enabled, present) {
            (true, None) => node.classes.push(class.to_owned()),
            (false, Some(idx)) => {
                node.classes.remove(idx);
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&self, element: ElementId) -> Option<String> {
        self.node(element).map(|node| node.text.clone())
    }

    fn set_text(&mut self, element: ElementId, text: &str) -> Result<(), PageError> {
        let children = std::mem::take(&mut self.node_mut(element)?.children);
        for child in children {
            self.drop_subtree(child);
        }
        text.clone_into(&mut self.node_mut(element)?.text);
        Ok(())
    }

    fn style(&self, element: ElementId, property: &str) -> Option<String> {
        self.node(element)?.styles.get(property).cloned()
    }

    fn set_style(
        &mut self,
        element: ElementId,
        property: &str,
        value: &str,
    ) -> Result<(), PageError> {
        self.node_mut(element)?
            .styles
            .insert(property.to_owned(), value.to_owned());
        Ok(())
    }

    fn append_child(
        &mut self,
        parent: ElementId,
        child: NewElement,
    ) -> Result<ElementId, PageError> {
        self.node_mut(parent)?;
        let element = self.allocate(Node::new(child, Some(parent)))?;
        self.node_mut(parent)?.children.push(element);
        Ok(element)
    }

    fn remove(&mut self, element: ElementId) -> Result<(), PageError> {
        if element == self.root() {
            return Err(PageError::Configuration(
                "the document root cannot be removed".to_owned(),
            ));
        }
        let parent = self.node_mut(element)?.parent;
        if let Some(parent) = parent
            && let Ok(parent_node) = self.node_mut(parent)
        {
            parent_node.children.retain(|c| *c != element);
        }
        self.drop_subtree(element);
        Ok(())
    }

    fn contains(&self, element: ElementId) -> bool {
        self.node(element).is_some()
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.node(element)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn layout(&self, element: ElementId) -> Option<Rect> {
        self.node(element).map(|node| node.layout)
    }

    fn viewport(&self) -> Viewport {
        let content_bottom = self
            .live()
            .map(|(_, node)| node.layout.bottom())
            .fold(0.0_f64, f64::max);
        Viewport {
            scroll_y: self.scroll_y,
            height: self.viewport_height,
            document_height: content_bottom.max(self.viewport_height),
        }
    }

    fn scroll_to(&mut self, top: f64) {
        let max = self.viewport().max_scroll();
        self.scroll_y = if top.is_finite() {
            top.clamp(0.0, max)
        } else {
            0.0
        };
    }
}
