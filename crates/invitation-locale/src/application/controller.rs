//! Locale controller bound to the rendering surface.
//!
//! Visibility is carried by the `active` class and is always moved
//! synchronously, hide first then show, so every content group has exactly
//! one active block at every observable moment. The fade is cosmetic: the
//! outgoing block gets `lang-leaving`, the incoming one `lang-entering`, and
//! both classes are dropped when the latest transition settles.

use chrono::TimeDelta;
use invitation_core::clock::Clock;
use invitation_core::error::PageError;
use invitation_core::preference::{LOCALE_PREFERENCE_KEY, PreferenceStore};
use invitation_core::surface::{ElementId, Surface, require_class};
use tracing::{debug, info, warn};

use crate::domain::events::LocaleSwitched;
use crate::domain::locale::Locale;

/// Class marking the visible block and the selected selector.
pub const ACTIVE_CLASS: &str = "active";
/// Class on a block fading out.
pub const LEAVING_CLASS: &str = "lang-leaving";
/// Class on a block fading in.
pub const ENTERING_CLASS: &str = "lang-entering";
/// Marker class of per-locale content blocks.
pub const CONTENT_CLASS: &str = "lang-content";
/// Marker class of locale selector controls.
pub const SELECTOR_CLASS: &str = "lang-btn";
/// Attribute carrying a block's or selector's locale code.
pub const LANG_ATTRIBUTE: &str = "data-lang";
/// Attribute naming the content group a block belongs to.
pub const GROUP_ATTRIBUTE: &str = "data-lang-group";

const DEFAULT_GROUP: &str = "default";

/// Default fade duration.
pub const DEFAULT_FADE: TimeDelta = TimeDelta::milliseconds(300);

/// One set of interchangeable blocks, one per locale.
#[derive(Debug, Clone)]
struct ContentGroup {
    name: String,
    blocks: Vec<(ElementId, Locale)>,
}

impl ContentGroup {
    /// The block to show for `locale`: its own block if the group has one,
    /// otherwise the default locale's, otherwise the first block.
    fn block_for(&self, locale: Locale) -> Option<ElementId> {
        self.blocks
            .iter()
            .find(|(_, l)| *l == locale)
            .or_else(|| self.blocks.iter().find(|(_, l)| *l == Locale::default()))
            .or_else(|| self.blocks.first())
            .map(|(element, _)| *element)
    }
}

/// Controller owning the current locale.
#[derive(Debug)]
pub struct LocaleController {
    selectors: Vec<(ElementId, Locale)>,
    groups: Vec<ContentGroup>,
    current: Locale,
    generation: u64,
    fade: TimeDelta,
}

impl LocaleController {
    /// Resolves selectors and content groups, reads the stored preference and
    /// shows it without a transition.
    ///
    /// # Errors
    ///
    /// Returns `PageError::ElementNotFound` if the page has no content block
    /// with a recognized locale.
    pub fn install(
        surface: &mut dyn Surface,
        store: &dyn PreferenceStore,
        fade: TimeDelta,
    ) -> Result<Self, PageError> {
        let mut groups: Vec<ContentGroup> = Vec::new();
        for element in require_class(surface, CONTENT_CLASS)? {
            let Some(locale) = Self::marked_locale(surface, element) else {
                warn!(%element, "content block without a recognized locale; ignoring");
                continue;
            };
            let name = surface
                .attribute(element, GROUP_ATTRIBUTE)
                .unwrap_or_else(|| DEFAULT_GROUP.to_owned());
            match groups.iter_mut().find(|g| g.name == name) {
                Some(group) => group.blocks.push((element, locale)),
                None => groups.push(ContentGroup {
                    name,
                    blocks: vec![(element, locale)],
                }),
            }
        }
        if groups.is_empty() {
            return Err(PageError::ElementNotFound(format!(
                ".{CONTENT_CLASS}[{LANG_ATTRIBUTE}]"
            )));
        }
        for group in &groups {
            for locale in Locale::ALL {
                if !group.blocks.iter().any(|(_, l)| *l == locale) {
                    warn!(group = %group.name, %locale, "content group has no block for locale");
                }
            }
        }

        let selectors = surface
            .elements_with_class(SELECTOR_CLASS)
            .into_iter()
            .filter_map(|element| {
                Self::marked_locale(surface, element).map(|locale| (element, locale))
            })
            .collect();

        let controller = Self {
            selectors,
            groups,
            current: initial_locale(store),
            generation: 0,
            fade,
        };
        controller.render(surface, false)?;
        info!(
            locale = %controller.current,
            groups = controller.groups.len(),
            selectors = controller.selectors.len(),
            "locale controller installed"
        );
        Ok(controller)
    }

    /// Switches to the locale named by `code`.
    ///
    /// Unrecognized codes are a no-op and return `Ok(None)`. A failed save is
    /// logged and does not undo the switch.
    ///
    /// # Errors
    ///
    /// Returns `PageError::StaleElement` if a resolved element has been
    /// removed from the surface.
    pub fn set_locale(
        &mut self,
        code: &str,
        surface: &mut dyn Surface,
        store: &mut dyn PreferenceStore,
        clock: &dyn Clock,
    ) -> Result<Option<LocaleSwitched>, PageError> {
        let Some(locale) = Locale::from_code(code) else {
            debug!(code, "ignoring unrecognized locale code");
            return Ok(None);
        };

        let previous = self.current;
        self.current = locale;
        self.generation += 1;
        self.render(surface, true)?;

        if let Err(err) = store.save(LOCALE_PREFERENCE_KEY, locale.code()) {
            warn!(error = %err, %locale, "could not persist locale preference");
        }
        info!(%previous, current = %locale, generation = self.generation, "locale switched");

        Ok(Some(LocaleSwitched {
            previous,
            current: locale,
            generation: self.generation,
            settle_at: clock.now() + self.fade,
        }))
    }

    /// Clears transition classes once the fade of `generation` is over.
    /// Settlements of superseded transitions are ignored.
    ///
    /// # Errors
    ///
    /// Returns `PageError::StaleElement` if a resolved element has been
    /// removed from the surface.
    pub fn settle(&self, generation: u64, surface: &mut dyn Surface) -> Result<bool, PageError> {
        if generation != self.generation {
            debug!(generation, latest = self.generation, "ignoring stale locale settlement");
            return Ok(false);
        }
        for (element, _) in self.groups.iter().flat_map(|g| g.blocks.iter()) {
            surface.set_class(*element, LEAVING_CLASS, false)?;
            surface.set_class(*element, ENTERING_CLASS, false)?;
        }
        Ok(true)
    }

    /// Locale activated by clicking `element`, if it is a selector.
    #[must_use]
    pub fn selector_locale(&self, element: ElementId) -> Option<Locale> {
        self.selectors
            .iter()
            .find(|(selector, _)| *selector == element)
            .map(|(_, locale)| *locale)
    }

    /// Locale currently shown.
    #[must_use]
    pub fn current(&self) -> Locale {
        self.current
    }

    /// Latest transition generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn marked_locale(surface: &dyn Surface, element: ElementId) -> Option<Locale> {
        surface
            .attribute(element, LANG_ATTRIBUTE)
            .as_deref()
            .and_then(Locale::from_code)
    }

    fn render(&self, surface: &mut dyn Surface, animate: bool) -> Result<(), PageError> {
        for group in &self.groups {
            let Some(target) = group.block_for(self.current) else {
                continue;
            };

            for (element, _) in &group.blocks {
                surface.set_class(*element, LEAVING_CLASS, false)?;
                surface.set_class(*element, ENTERING_CLASS, false)?;
            }

            // Hide every other block first, then show the target.
            let mut replaced = false;
            for (element, _) in group.blocks.iter().filter(|(e, _)| *e != target) {
                if surface.has_class(*element, ACTIVE_CLASS) {
                    replaced = true;
                    surface.set_class(*element, ACTIVE_CLASS, false)?;
                    if animate {
                        surface.set_class(*element, LEAVING_CLASS, true)?;
                    }
                }
            }
            surface.set_class(target, ACTIVE_CLASS, true)?;
            if animate && replaced {
                surface.set_class(target, ENTERING_CLASS, true)?;
            }
        }

        for (element, locale) in &self.selectors {
            surface.set_class(*element, ACTIVE_CLASS, *locale == self.current)?;
        }
        Ok(())
    }
}

/// Reads the persisted locale, falling back to the default when the value is
/// absent, unrecognized or unreadable.
pub fn initial_locale(store: &dyn PreferenceStore) -> Locale {
    match store.load(LOCALE_PREFERENCE_KEY) {
        Ok(Some(code)) => Locale::from_code(&code).unwrap_or_else(|| {
            warn!(code, "stored locale is not recognized; using default");
            Locale::default()
        }),
        Ok(None) => Locale::default(),
        Err(err) => {
            warn!(error = %err, "could not read locale preference; using default");
            Locale::default()
        }
    }
}
