//! The page runtime.
//!
//! Owns the document, every installed controller, the one-shot timer queue
//! and the countdown's recurring task. Controllers never see each other; the
//! runtime is the only place where one controller's outcome triggers another
//! controller's action.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use invitation_core::clock::Clock;
use invitation_core::document::Document;
use invitation_core::error::PageError;
use invitation_core::preference::PreferenceStore;
use invitation_core::rng::DeterministicRng;
use invitation_core::schedule::{RecurringTask, TimerQueue};
use invitation_core::surface::{ElementId, Surface};
use invitation_countdown::application::controller::{CountdownConfig, CountdownController};
use invitation_feedback::application::controller::{DEFAULT_BURST_SIZE, FeedbackController};
use invitation_feedback::domain::events::BurstOrigin;
use invitation_locale::application::controller::{DEFAULT_FADE, LocaleController};
use invitation_locale::domain::locale::Locale;
use invitation_navigation::application::controller::NavigationController;
use invitation_navigation::domain::snapshot::ScrollConfig;
use invitation_reveal::application::controller::{DEFAULT_THRESHOLD, RevealController};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use crate::config::PageConfig;
use crate::error::AppError;
use crate::events::{EventSource, PageEvent};

/// Tunables for the runtime and its controllers.
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    /// Countdown target and arrived message.
    pub countdown: CountdownConfig,
    /// Particles per confetti burst.
    pub burst_size: usize,
    /// Locale cross-fade duration.
    pub locale_fade: TimeDelta,
    /// Visible fraction that reveals an element.
    pub reveal_threshold: f64,
    /// Scroll thresholds and parallax factor.
    pub scroll: ScrollConfig,
    /// Countdown refresh period.
    pub tick_period: TimeDelta,
}

impl RuntimeSettings {
    /// Default settings for the given countdown.
    #[must_use]
    pub fn new(countdown: CountdownConfig) -> Self {
        Self {
            countdown,
            burst_size: DEFAULT_BURST_SIZE,
            locale_fade: DEFAULT_FADE,
            reveal_threshold: DEFAULT_THRESHOLD,
            scroll: ScrollConfig::default(),
            tick_period: TimeDelta::seconds(1),
        }
    }
}

impl From<&PageConfig> for RuntimeSettings {
    fn from(config: &PageConfig) -> Self {
        Self {
            burst_size: config.burst_size,
            ..Self::new(config.countdown())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageTask {
    SettleLocale { generation: u64 },
}

/// Runtime coordinating the controllers of one page.
pub struct PageRuntime {
    document: Document,
    clock: Arc<dyn Clock>,
    rng: Box<dyn DeterministicRng>,
    store: Box<dyn PreferenceStore>,
    locale: Option<LocaleController>,
    countdown: Option<CountdownController>,
    reveal: Option<RevealController>,
    navigation: Option<NavigationController>,
    feedback: Option<FeedbackController>,
    timers: TimerQueue<PageTask>,
    countdown_task: RecurringTask,
    burst_size: usize,
    ready: bool,
    bursts: Vec<BurstOrigin>,
}

impl fmt::Debug for PageRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRuntime")
            .field("elements", &self.document.len())
            .field("locale", &self.locale.is_some())
            .field("countdown", &self.countdown.is_some())
            .field("reveal", &self.reveal.is_some())
            .field("navigation", &self.navigation.is_some())
            .field("feedback", &self.feedback.is_some())
            .field("timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}

fn installed<T>(controller: &'static str, result: Result<T, PageError>) -> Option<T> {
    match result {
        Ok(installed) => Some(installed),
        Err(e) => {
            warn!(controller, error = %e, "controller unavailable; continuing without it");
            None
        }
    }
}

fn logged<T>(controller: &'static str, result: Result<T, PageError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(controller, error = %e, "controller update failed");
            None
        }
    }
}

impl PageRuntime {
    /// Installs every controller the page supports and renders the initial
    /// state, including the first countdown tick.
    ///
    /// A controller whose elements are missing is skipped with a warning;
    /// the others run as usual.
    pub fn new(
        mut document: Document,
        settings: RuntimeSettings,
        clock: Arc<dyn Clock>,
        rng: Box<dyn DeterministicRng>,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        let locale = installed(
            "locale",
            LocaleController::install(&mut document, &*store, settings.locale_fade),
        );
        let countdown = installed(
            "countdown",
            CountdownController::install(&document, settings.countdown),
        );
        let reveal = installed(
            "reveal",
            RevealController::install(&mut document, settings.reveal_threshold),
        );
        let navigation = installed(
            "navigation",
            NavigationController::install(&mut document, settings.scroll),
        );
        let feedback = installed("feedback", FeedbackController::install(&document));

        let now = clock.now();
        let mut countdown_task =
            RecurringTask::new("countdown", now + settings.tick_period, settings.tick_period);
        if countdown.is_none() {
            countdown_task.cancel();
        }

        let mut runtime = Self {
            document,
            clock,
            rng,
            store,
            locale,
            countdown,
            reveal,
            navigation,
            feedback,
            timers: TimerQueue::new(),
            countdown_task,
            burst_size: settings.burst_size,
            ready: false,
            bursts: Vec::new(),
        };
        runtime.tick_countdown();
        info!(?runtime, "page runtime started");
        runtime
    }

    /// Routes one page event to the controllers.
    #[instrument(skip(self))]
    pub fn dispatch(&mut self, event: PageEvent) {
        match event {
            PageEvent::Ready => self.on_ready(),
            PageEvent::Click { target } => {
                if let Some(element) = self.resolve(&target) {
                    self.click(element);
                }
            }
            PageEvent::Scroll { y } => {
                self.document.scroll_to(y);
                self.on_viewport_change();
            }
            PageEvent::Resize { height } => {
                if height.is_finite() && height > 0.0 {
                    self.document.resize_viewport(height);
                    self.on_viewport_change();
                } else {
                    warn!(height, "ignoring resize to a non-positive height");
                }
            }
            PageEvent::PointerMove { target, x, y } => {
                if let Some(element) = self.resolve(&target)
                    && let Some(feedback) = &self.feedback
                {
                    logged("feedback", feedback.tilt(element, x, y, &mut self.document));
                }
            }
            PageEvent::PointerLeave { target } => {
                if let Some(element) = self.resolve(&target)
                    && let Some(feedback) = &self.feedback
                {
                    logged("feedback", feedback.reset_tilt(element, &mut self.document));
                }
            }
        }
    }

    /// Handles a click on `element`.
    #[instrument(skip(self))]
    pub fn click(&mut self, element: ElementId) {
        if let Some(locale) = self.locale.as_ref().and_then(|c| c.selector_locale(element)) {
            self.switch_locale(locale.code());
            return;
        }

        if let Some(request) = self
            .navigation
            .as_ref()
            .and_then(|c| c.scroll_request(element, &self.document))
        {
            debug!(top = request.top, smooth = request.smooth, "scrolling on request");
            self.document.scroll_to(request.top);
            self.on_viewport_change();
            return;
        }

        if let Some(feedback) = &self.feedback
            && feedback.is_rsvp_control(element)
        {
            if logged("feedback", feedback.confirm_rsvp(&mut self.document)).is_some() {
                self.celebrate(BurstOrigin::RsvpConfirmed);
            }
            return;
        }

        debug!(%element, "click has no handler");
    }

    /// Switches the display language to `code`. Unrecognized codes are
    /// ignored.
    pub fn switch_locale(&mut self, code: &str) {
        let Some(controller) = self.locale.as_mut() else {
            debug!(code, "no locale controller; ignoring switch");
            return;
        };
        let switched = controller.set_locale(
            code,
            &mut self.document,
            &mut *self.store,
            self.clock.as_ref(),
        );
        if let Some(Some(switched)) = logged("locale", switched) {
            self.timers.schedule(
                switched.settle_at,
                PageTask::SettleLocale {
                    generation: switched.generation,
                },
            );
        }
    }

    /// Runs everything due at the current time: the countdown tick, locale
    /// settlements and particle expiry.
    pub fn run_due(&mut self) {
        let now = self.clock.now();
        if self.countdown_task.poll(now) {
            self.tick_countdown();
        }
        for task in self.timers.pop_due(now) {
            match task {
                PageTask::SettleLocale { generation } => {
                    if let Some(controller) = &self.locale {
                        logged("locale", controller.settle(generation, &mut self.document));
                    }
                }
            }
        }
        if let Some(feedback) = self.feedback.as_mut() {
            feedback.expire(now, &mut self.document);
        }
    }

    /// Earliest pending deadline, countdown ticks included.
    #[must_use]
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        [
            self.countdown_task.next_due(),
            self.timers.next_due(),
            self.feedback.as_ref().and_then(FeedbackController::next_expiry),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// The page as currently rendered.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Language shown, if the page is bilingual.
    #[must_use]
    pub fn current_locale(&self) -> Option<Locale> {
        self.locale.as_ref().map(LocaleController::current)
    }

    /// Whether the countdown has reached the event.
    #[must_use]
    pub fn has_arrived(&self) -> bool {
        self.countdown
            .as_ref()
            .is_some_and(CountdownController::has_arrived)
    }

    /// Confetti particles currently on screen.
    #[must_use]
    pub fn live_particles(&self) -> usize {
        self.feedback
            .as_ref()
            .map_or(0, FeedbackController::live_particles)
    }

    /// Origins of every burst fired so far, oldest first.
    #[must_use]
    pub fn bursts(&self) -> &[BurstOrigin] {
        &self.bursts
    }

    fn on_ready(&mut self) {
        if self.ready {
            debug!("page already ready");
            return;
        }
        self.ready = true;
        self.celebrate(BurstOrigin::PageReady);
    }

    fn on_viewport_change(&mut self) {
        if let Some(navigation) = self.navigation.as_mut() {
            logged("navigation", navigation.on_scroll(&mut self.document));
        }
        if let Some(reveal) = self.reveal.as_mut() {
            logged("reveal", reveal.observe(&mut self.document));
        }
    }

    fn tick_countdown(&mut self) {
        let Some(countdown) = self.countdown.as_mut() else {
            return;
        };
        let Some(outcome) = logged(
            "countdown",
            countdown.tick(&mut self.document, self.clock.as_ref()),
        ) else {
            return;
        };
        if outcome.just_arrived() {
            self.countdown_task.cancel();
            self.celebrate(BurstOrigin::CountdownArrived);
        }
    }

    fn celebrate(&mut self, origin: BurstOrigin) {
        let Some(feedback) = self.feedback.as_mut() else {
            debug!(origin = origin.as_str(), "no feedback controller; skipping burst");
            return;
        };
        let fired = feedback.burst(
            origin,
            self.burst_size,
            &mut self.document,
            self.clock.as_ref(),
            &mut *self.rng,
        );
        if logged("feedback", fired).is_some() {
            self.bursts.push(origin);
        }
    }

    fn resolve(&self, id: &str) -> Option<ElementId> {
        let element = self.document.element_by_id(id);
        if element.is_none() {
            debug!(id, "event target not found");
        }
        element
    }
}

/// Feeds events from `source` into `runtime` until the source ends, running
/// the countdown every `tick` and every other deadline as it falls due.
///
/// # Errors
///
/// Returns the source's error if reading events fails.
pub async fn drive(
    runtime: &mut PageRuntime,
    source: &mut dyn EventSource,
    tick: Duration,
) -> Result<(), AppError> {
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let wait = runtime.next_deadline().map(|due| {
            (due - runtime.clock.now())
                .to_std()
                .unwrap_or(Duration::ZERO)
        });
        tokio::select! {
            event = source.next_event() => match event? {
                Some(event) => runtime.dispatch(event),
                None => break,
            },
            _ = ticker.tick() => runtime.run_due(),
            () = sleep_for(wait) => runtime.run_due(),
        }
    }

    info!(
        locale = ?runtime.current_locale(),
        arrived = runtime.has_arrived(),
        live_particles = runtime.live_particles(),
        "event stream ended"
    );
    Ok(())
}

async fn sleep_for(wait: Option<Duration>) {
    match wait {
        Some(wait) => tokio::time::sleep(wait).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use invitation_countdown::application::controller::DEFAULT_ARRIVED_MESSAGE;
    use invitation_test_support::{FixedClock, MemoryPreferenceStore, MockRng, invitation_document};

    fn settings() -> RuntimeSettings {
        RuntimeSettings::new(CountdownConfig {
            target: Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap(),
            arrived_message: DEFAULT_ARRIVED_MESSAGE.to_owned(),
        })
    }

    fn runtime(document: Document) -> PageRuntime {
        PageRuntime::new(
            document,
            settings(),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())),
            Box::new(MockRng),
            Box::new(MemoryPreferenceStore::new()),
        )
    }

    #[test]
    fn test_new_renders_first_countdown_tick() {
        let runtime = runtime(invitation_document());

        let days = runtime.document().element_by_id("days").unwrap();
        assert_eq!(runtime.document().text(days).as_deref(), Some("25"));
        assert!(!runtime.has_arrived());
    }

    #[test]
    fn test_next_deadline_is_the_next_tick_when_idle() {
        let runtime = runtime(invitation_document());

        assert_eq!(
            runtime.next_deadline(),
            Some(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 1).unwrap())
        );
    }

    #[test]
    fn test_ready_bursts_only_once() {
        let mut runtime = runtime(invitation_document());

        runtime.dispatch(PageEvent::Ready);
        runtime.dispatch(PageEvent::Ready);

        assert_eq!(runtime.bursts(), &[BurstOrigin::PageReady]);
        assert_eq!(runtime.live_particles(), DEFAULT_BURST_SIZE);
    }

    #[test]
    fn test_unknown_click_target_is_ignored() {
        let mut runtime = runtime(invitation_document());

        runtime.dispatch(PageEvent::Click {
            target: "nowhere".into(),
        });

        assert!(runtime.bursts().is_empty());
        assert_eq!(runtime.current_locale(), Some(Locale::English));
    }

    #[test]
    fn test_invalid_resize_is_ignored() {
        let mut runtime = runtime(invitation_document());

        runtime.dispatch(PageEvent::Resize { height: -1.0 });

        assert!((runtime.document().viewport().height - 800.0).abs() < f64::EPSILON);
    }
}
