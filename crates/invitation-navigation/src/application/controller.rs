//! Navigation controller bound to the rendering surface.
//!
//! Runs on every scroll and resize, so each call is linear in the number of
//! sections and links and only writes what changed since the last call.

use invitation_core::error::PageError;
use invitation_core::surface::{ElementId, Surface};
use tracing::{debug, info, warn};

use crate::domain::snapshot::{ScrollConfig, ScrollSnapshot};

/// Identifier of the progress bar.
pub const PROGRESS_ID: &str = "scrollProgress";
/// Identifier of the scroll-to-top control.
pub const SCROLL_TOP_ID: &str = "scrollTop";
/// Identifier of the parallax hero background.
pub const HERO_ID: &str = "heroBackground";
/// Marker class of page sections.
pub const SECTION_CLASS: &str = "section";
/// Marker class of navigation links.
pub const LINK_CLASS: &str = "nav-link";
/// Attribute naming the section a link points to.
pub const SECTION_ATTRIBUTE: &str = "data-section";
/// Class shown on the scroll-to-top control past the threshold.
pub const VISIBLE_CLASS: &str = "visible";
/// Class marking the current section's link.
pub const ACTIVE_CLASS: &str = "active";

/// A scroll the page should perform on the visitor's behalf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    /// Destination offset.
    pub top: f64,
    /// Whether the scroll should be animated.
    pub smooth: bool,
}

#[derive(Debug, Clone)]
struct Section {
    element: ElementId,
    name: String,
}

#[derive(Debug, Clone)]
struct Link {
    element: ElementId,
    section: String,
}

/// Controller tracking the scroll position.
#[derive(Debug)]
pub struct NavigationController {
    progress_bar: Option<ElementId>,
    top_button: Option<ElementId>,
    hero: Option<ElementId>,
    sections: Vec<Section>,
    links: Vec<Link>,
    config: ScrollConfig,
    last: Option<ScrollSnapshot>,
}

impl NavigationController {
    /// Resolves whatever navigation elements the page has and renders the
    /// initial scroll state.
    ///
    /// # Errors
    ///
    /// Returns `PageError::ElementNotFound` if the page has none of them.
    pub fn install(surface: &mut dyn Surface, config: ScrollConfig) -> Result<Self, PageError> {
        let sections: Vec<Section> = surface
            .elements_with_class(SECTION_CLASS)
            .into_iter()
            .filter_map(|element| match surface.identifier(element) {
                Some(name) => Some(Section { element, name }),
                None => {
                    warn!(%element, "section without an identifier; ignoring");
                    None
                }
            })
            .collect();
        let links: Vec<Link> = surface
            .elements_with_class(LINK_CLASS)
            .into_iter()
            .filter_map(|element| {
                surface
                    .attribute(element, SECTION_ATTRIBUTE)
                    .map(|section| Link { element, section })
            })
            .collect();

        let mut controller = Self {
            progress_bar: surface.element_by_id(PROGRESS_ID),
            top_button: surface.element_by_id(SCROLL_TOP_ID),
            hero: surface.element_by_id(HERO_ID),
            sections,
            links,
            config,
            last: None,
        };
        if controller.progress_bar.is_none()
            && controller.top_button.is_none()
            && controller.hero.is_none()
            && controller.sections.is_empty()
        {
            return Err(PageError::ElementNotFound(format!(
                "#{PROGRESS_ID}, #{SCROLL_TOP_ID}, #{HERO_ID} or .{SECTION_CLASS}"
            )));
        }

        controller.on_scroll(surface)?;
        info!(
            sections = controller.sections.len(),
            links = controller.links.len(),
            progress_bar = controller.progress_bar.is_some(),
            top_button = controller.top_button.is_some(),
            parallax = controller.hero.is_some(),
            "navigation controller installed"
        );
        Ok(controller)
    }

    /// Recomputes the scroll snapshot and writes whatever changed.
    ///
    /// # Errors
    ///
    /// Returns `PageError::StaleElement` if a resolved element has been
    /// removed from the surface.
    pub fn on_scroll(&mut self, surface: &mut dyn Surface) -> Result<ScrollSnapshot, PageError> {
        let viewport = surface.viewport();
        let tops: Vec<f64> = self
            .sections
            .iter()
            .map(|s| surface.layout(s.element).map_or(f64::INFINITY, |r| r.top))
            .collect();
        let snapshot = ScrollSnapshot::compute(&viewport, &tops, &self.config);
        let last = self.last;

        if let Some(bar) = self.progress_bar
            && last.is_none_or(|l| (l.progress - snapshot.progress).abs() > f64::EPSILON)
        {
            surface.set_style(bar, "width", &format!("{:.2}%", snapshot.progress))?;
        }

        if let Some(button) = self.top_button
            && last.is_none_or(|l| l.top_visible != snapshot.top_visible)
        {
            surface.set_class(button, VISIBLE_CLASS, snapshot.top_visible)?;
        }

        if last.is_none_or(|l| l.active_section != snapshot.active_section) {
            let current = snapshot
                .active_section
                .and_then(|idx| self.sections.get(idx))
                .map(|s| s.name.as_str());
            for link in &self.links {
                surface.set_class(link.element, ACTIVE_CLASS, Some(link.section.as_str()) == current)?;
            }
            debug!(section = current.unwrap_or("-"), "active section changed");
        }

        if let Some(hero) = self.hero
            && last.is_none_or(|l| (l.scroll_y - snapshot.scroll_y).abs() > f64::EPSILON)
        {
            let offset = snapshot.scroll_y * self.config.parallax_factor;
            surface.set_style(hero, "transform", &format!("translateY({offset:.1}px)"))?;
        }

        self.last = Some(snapshot);
        Ok(snapshot)
    }

    /// Scroll requested by clicking `element`, if it is the scroll-to-top
    /// control or a navigation link.
    #[must_use]
    pub fn scroll_request(&self, element: ElementId, surface: &dyn Surface) -> Option<ScrollRequest> {
        if self.top_button == Some(element) {
            return Some(ScrollRequest {
                top: 0.0,
                smooth: true,
            });
        }
        let link = self.links.iter().find(|l| l.element == element)?;
        let section = self.sections.iter().find(|s| s.name == link.section)?;
        let top = surface.layout(section.element)?.top;
        Some(ScrollRequest {
            top: (top - self.config.look_ahead).max(0.0),
            smooth: true,
        })
    }

    /// Most recent snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<ScrollSnapshot> {
        self.last
    }
}
