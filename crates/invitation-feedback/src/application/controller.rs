//! Feedback controller bound to the rendering surface.
//!
//! Every particle gets its removal deadline the moment it is created; the
//! owner only has to call [`FeedbackController::expire`] whenever
//! [`FeedbackController::next_expiry`] has passed.

use chrono::{DateTime, Utc};
use invitation_core::clock::Clock;
use invitation_core::error::PageError;
use invitation_core::rng::DeterministicRng;
use invitation_core::schedule::TimerQueue;
use invitation_core::surface::{ElementId, Surface, require_id};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::events::{BurstFired, BurstOrigin};
use crate::domain::particle::ParticleSpec;
use crate::domain::tilt::{tilt_angles, tilt_transform};

/// Identifier of the layer particles are drawn into.
pub const LAYER_ID: &str = "confetti";
/// Identifier of the RSVP confirmation control.
pub const RSVP_BUTTON_ID: &str = "rsvpConfirm";
/// Identifier of the RSVP thank-you message.
pub const RSVP_THANKS_ID: &str = "rsvpThanks";
/// Class put on the RSVP control once used.
pub const CONFIRMED_CLASS: &str = "confirmed";
/// Class shown on the thank-you message.
pub const VISIBLE_CLASS: &str = "visible";
/// Marker class of cards that tilt under the pointer.
pub const TILT_CLASS: &str = "tilt-card";
/// Particles per burst when no other count is configured.
pub const DEFAULT_BURST_SIZE: usize = 50;
/// Attribute recording which burst a particle belongs to.
pub const BURST_ATTRIBUTE: &str = "data-burst";

#[derive(Debug, Clone, Copy)]
struct Rsvp {
    button: ElementId,
    thanks: ElementId,
}

/// Controller for confetti, the RSVP acknowledgment and card tilt.
#[derive(Debug)]
pub struct FeedbackController {
    layer: ElementId,
    rsvp: Option<Rsvp>,
    cards: Vec<ElementId>,
    expiries: TimerQueue<ElementId>,
}

impl FeedbackController {
    /// Resolves the particle layer and whatever RSVP and tilt elements exist.
    ///
    /// # Errors
    ///
    /// Returns `PageError::ElementNotFound` if there is no particle layer.
    pub fn install(surface: &dyn Surface) -> Result<Self, PageError> {
        let layer = require_id(surface, LAYER_ID)?;
        let rsvp = match (
            surface.element_by_id(RSVP_BUTTON_ID),
            surface.element_by_id(RSVP_THANKS_ID),
        ) {
            (Some(button), Some(thanks)) => Some(Rsvp { button, thanks }),
            (None, None) => None,
            _ => {
                warn!("RSVP control or message missing; acknowledgment disabled");
                None
            }
        };
        let cards = surface.elements_with_class(TILT_CLASS);
        info!(
            rsvp = rsvp.is_some(),
            tilt_cards = cards.len(),
            "feedback controller installed"
        );
        Ok(Self {
            layer,
            rsvp,
            cards,
            expiries: TimerQueue::new(),
        })
    }

    /// Adds `count` particles to the layer, each removing itself once its
    /// own animation has finished. Bursts are additive: particles already
    /// on screen are left alone.
    ///
    /// # Errors
    ///
    /// Returns `PageError::StaleElement` if the layer has been removed.
    pub fn burst(
        &mut self,
        origin: BurstOrigin,
        count: usize,
        surface: &mut dyn Surface,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> Result<BurstFired, PageError> {
        let burst_id = Uuid::new_v4();
        let now = clock.now();
        let mut clears_at = now;
        let tag = burst_id.to_string();
        for _ in 0..count {
            let spec = ParticleSpec::random(rng);
            let element = surface.append_child(
                self.layer,
                spec.to_element().with_attribute(BURST_ATTRIBUTE, &tag),
            )?;
            let due = now + spec.lifetime();
            self.expiries.schedule(due, element);
            clears_at = clears_at.max(due);
        }
        info!(
            %burst_id,
            origin = origin.as_str(),
            created = count,
            live = self.expiries.len(),
            "confetti burst"
        );
        Ok(BurstFired {
            burst_id,
            origin,
            created: count,
            clears_at,
        })
    }

    /// Removes every particle whose lifetime has ended by `now`. Returns how
    /// many were removed.
    pub fn expire(&mut self, now: DateTime<Utc>, surface: &mut dyn Surface) -> usize {
        let mut removed = 0;
        for element in self.expiries.pop_due(now) {
            if surface.remove(element).is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(removed, live = self.expiries.len(), "particles expired");
        }
        removed
    }

    /// Deadline of the next particle to expire.
    #[must_use]
    pub fn next_expiry(&self) -> Option<DateTime<Utc>> {
        self.expiries.next_due()
    }

    /// Particles created and not yet expired.
    #[must_use]
    pub fn live_particles(&self) -> usize {
        self.expiries.len()
    }

    /// Whether `element` is the RSVP confirmation control.
    #[must_use]
    pub fn is_rsvp_control(&self, element: ElementId) -> bool {
        self.rsvp.is_some_and(|r| r.button == element)
    }

    /// Shows the thank-you message and marks the control as used. Repeated
    /// confirmations are acknowledged again.
    ///
    /// # Errors
    ///
    /// Returns `PageError::ElementNotFound` if the page has no RSVP control,
    /// or `PageError::StaleElement` if it has been removed.
    pub fn confirm_rsvp(&self, surface: &mut dyn Surface) -> Result<(), PageError> {
        let rsvp = self.rsvp.ok_or_else(|| {
            PageError::ElementNotFound(format!("#{RSVP_BUTTON_ID} and #{RSVP_THANKS_ID}"))
        })?;
        surface.set_class(rsvp.thanks, VISIBLE_CLASS, true)?;
        surface.set_class(rsvp.button, CONFIRMED_CLASS, true)?;
        info!("RSVP acknowledged");
        Ok(())
    }

    /// Tilts `card` toward a pointer at (`x`, `y`), given as fractions of the
    /// card's size. Returns `false` if `card` is not a tilt card.
    ///
    /// # Errors
    ///
    /// Returns `PageError::StaleElement` if the card has been removed.
    pub fn tilt(
        &self,
        card: ElementId,
        x: f64,
        y: f64,
        surface: &mut dyn Surface,
    ) -> Result<bool, PageError> {
        if !self.cards.contains(&card) {
            return Ok(false);
        }
        let (rotate_x, rotate_y) = tilt_angles(x, y);
        surface.set_style(card, "transform", &tilt_transform(rotate_x, rotate_y))?;
        Ok(true)
    }

    /// Returns `card` to rest. Returns `false` if it is not a tilt card.
    ///
    /// # Errors
    ///
    /// Returns `PageError::StaleElement` if the card has been removed.
    pub fn reset_tilt(&self, card: ElementId, surface: &mut dyn Surface) -> Result<bool, PageError> {
        if !self.cards.contains(&card) {
            return Ok(false);
        }
        surface.set_style(card, "transform", &tilt_transform(0.0, 0.0))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use invitation_core::document::Document;
    use invitation_core::rng::StdRngSource;
    use invitation_core::surface::NewElement;
    use invitation_test_support::{FixedClock, ManualClock, MockRng, invitation_document};

    use crate::domain::particle::{PARTICLE_CLASS, max_lifetime};

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn layer_children(doc: &Document) -> usize {
        doc.children(doc.element_by_id(LAYER_ID).unwrap()).len()
    }

    #[test]
    fn test_burst_creates_particles_with_expiry() {
        let mut doc = invitation_document();
        let mut controller = FeedbackController::install(&doc).unwrap();
        let clock = fixed_clock();

        let fired = controller
            .burst(BurstOrigin::PageReady, 12, &mut doc, &clock, &mut MockRng)
            .unwrap();

        assert_eq!(fired.created, 12);
        assert_eq!(layer_children(&doc), 12);
        assert_eq!(controller.live_particles(), 12);
        assert_eq!(controller.next_expiry(), Some(clock.0 + TimeDelta::seconds(2)));
        assert_eq!(fired.clears_at, clock.0 + TimeDelta::seconds(2));
    }

    #[test]
    fn test_bursts_are_additive() {
        let mut doc = invitation_document();
        let mut controller = FeedbackController::install(&doc).unwrap();
        let clock = fixed_clock();
        let mut rng = StdRngSource::seeded(3);

        let first = controller
            .burst(BurstOrigin::PageReady, 10, &mut doc, &clock, &mut rng)
            .unwrap();
        let second = controller
            .burst(BurstOrigin::RsvpConfirmed, 15, &mut doc, &clock, &mut rng)
            .unwrap();

        assert_ne!(first.burst_id, second.burst_id);
        assert_eq!(layer_children(&doc), 25);
        assert_eq!(controller.live_particles(), 25);
    }

    #[test]
    fn test_every_particle_is_gone_after_max_lifetime() {
        let mut doc = invitation_document();
        let mut controller = FeedbackController::install(&doc).unwrap();
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let mut rng = StdRngSource::seeded(19);

        controller
            .burst(BurstOrigin::PageReady, 40, &mut doc, &clock, &mut rng)
            .unwrap();
        clock.advance(TimeDelta::milliseconds(1_000));
        controller
            .burst(BurstOrigin::RsvpConfirmed, 40, &mut doc, &clock, &mut rng)
            .unwrap();

        clock.advance(TimeDelta::milliseconds(1_500));
        let early = controller.expire(clock.now(), &mut doc);
        assert!(early < 80);

        clock.advance(max_lifetime());
        let rest = controller.expire(clock.now(), &mut doc);

        assert_eq!(early + rest, 80);
        assert_eq!(layer_children(&doc), 0);
        assert_eq!(controller.live_particles(), 0);
        assert_eq!(controller.next_expiry(), None);
    }

    #[test]
    fn test_repeated_bursts_do_not_grow_the_document() {
        let mut doc = invitation_document();
        let mut controller = FeedbackController::install(&doc).unwrap();
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let mut rng = StdRngSource::seeded(7);
        let live = doc.len();
        let allocated = doc.allocated();

        for _ in 0..1_000 {
            controller
                .burst(
                    BurstOrigin::RsvpConfirmed,
                    DEFAULT_BURST_SIZE,
                    &mut doc,
                    &clock,
                    &mut rng,
                )
                .unwrap();
            clock.advance(max_lifetime());
            assert_eq!(controller.expire(clock.now(), &mut doc), DEFAULT_BURST_SIZE);
        }

        assert_eq!(doc.len(), live);
        assert!(doc.allocated() <= allocated + DEFAULT_BURST_SIZE);
        assert_eq!(layer_children(&doc), 0);
        assert!(doc.elements_with_class(PARTICLE_CLASS).is_empty());
    }

    #[test]
    fn test_expire_before_deadline_removes_nothing() {
        let mut doc = invitation_document();
        let mut controller = FeedbackController::install(&doc).unwrap();
        let clock = fixed_clock();

        controller
            .burst(BurstOrigin::PageReady, 5, &mut doc, &clock, &mut MockRng)
            .unwrap();

        assert_eq!(controller.expire(clock.0 + TimeDelta::milliseconds(1_999), &mut doc), 0);
        assert_eq!(controller.expire(clock.0 + TimeDelta::seconds(2), &mut doc), 5);
    }

    #[test]
    fn test_particle_removed_elsewhere_is_skipped() {
        let mut doc = invitation_document();
        let mut controller = FeedbackController::install(&doc).unwrap();
        let clock = fixed_clock();
        controller
            .burst(BurstOrigin::PageReady, 3, &mut doc, &clock, &mut MockRng)
            .unwrap();
        let layer = doc.element_by_id(LAYER_ID).unwrap();
        let first = doc.children(layer)[0];
        doc.remove(first).unwrap();

        let removed = controller.expire(clock.0 + max_lifetime(), &mut doc);

        assert_eq!(removed, 2);
        assert_eq!(controller.live_particles(), 0);
    }

    #[test]
    fn test_rsvp_confirmation_is_repeatable() {
        let mut doc = invitation_document();
        let controller = FeedbackController::install(&doc).unwrap();
        let button = doc.element_by_id(RSVP_BUTTON_ID).unwrap();
        let thanks = doc.element_by_id(RSVP_THANKS_ID).unwrap();

        assert!(controller.is_rsvp_control(button));
        controller.confirm_rsvp(&mut doc).unwrap();
        controller.confirm_rsvp(&mut doc).unwrap();

        assert!(doc.has_class(thanks, VISIBLE_CLASS));
        assert!(doc.has_class(button, CONFIRMED_CLASS));
    }

    #[test]
    fn test_rsvp_without_controls_is_an_error() {
        let mut doc = Document::new(800.0);
        let root = doc.root();
        doc.append_child(root, NewElement::new("div").with_id(LAYER_ID))
            .unwrap();
        let controller = FeedbackController::install(&doc).unwrap();

        assert!(matches!(
            controller.confirm_rsvp(&mut doc),
            Err(PageError::ElementNotFound(_))
        ));
    }

    #[test]
    fn test_tilt_follows_pointer_and_resets() {
        let mut doc = invitation_document();
        let controller = FeedbackController::install(&doc).unwrap();
        let card = doc.element_by_id("card-0").unwrap();

        assert!(controller.tilt(card, 1.0, 0.0, &mut doc).unwrap());
        assert_eq!(
            doc.style(card, "transform").as_deref(),
            Some("perspective(1000px) rotateX(10.0deg) rotateY(10.0deg)")
        );

        assert!(controller.reset_tilt(card, &mut doc).unwrap());
        assert_eq!(
            doc.style(card, "transform").as_deref(),
            Some("perspective(1000px) rotateX(0.0deg) rotateY(0.0deg)")
        );
    }

    #[test]
    fn test_tilt_ignores_other_elements() {
        let mut doc = invitation_document();
        let controller = FeedbackController::install(&doc).unwrap();
        let story = doc.element_by_id("story").unwrap();

        assert!(!controller.tilt(story, 0.2, 0.2, &mut doc).unwrap());
        assert_eq!(doc.style(story, "transform"), None);
    }

    #[test]
    fn test_install_requires_layer() {
        let doc = Document::new(800.0);

        assert!(matches!(
            FeedbackController::install(&doc),
            Err(PageError::ElementNotFound(id)) if id == "#confetti"
        ));
    }
}
