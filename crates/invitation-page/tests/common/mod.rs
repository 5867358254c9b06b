//! Shared helpers for page runtime integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use invitation_core::clock::Clock;
use invitation_core::document::Document;
use invitation_core::preference::PreferenceStore;
use invitation_core::rng::DeterministicRng;
use invitation_core::surface::{ElementId, Surface};
use invitation_countdown::application::controller::{CountdownConfig, DEFAULT_ARRIVED_MESSAGE};
use invitation_page::manifest::{BUNDLED_MANIFEST, PageManifest};
use invitation_page::runtime::{PageRuntime, RuntimeSettings};
use invitation_test_support::{ManualClock, MemoryPreferenceStore, MockRng};

/// Event instant used across all integration tests.
pub fn target() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap()
}

/// Wall-clock start used across all integration tests.
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// Runtime settings with the test target and a burst of ten particles.
pub fn settings() -> RuntimeSettings {
    RuntimeSettings {
        burst_size: 10,
        ..RuntimeSettings::new(CountdownConfig {
            target: target(),
            arrived_message: DEFAULT_ARRIVED_MESSAGE.to_owned(),
        })
    }
}

/// The bundled invitation page.
pub fn bundled_document() -> Document {
    PageManifest::from_json(BUNDLED_MANIFEST)
        .unwrap()
        .into_document()
        .unwrap()
}

/// Build a runtime over the bundled page with a manual clock, a `MockRng` and
/// an empty in-memory preference store.
pub fn build_runtime(clock: &Arc<ManualClock>) -> PageRuntime {
    build_runtime_with(
        clock,
        Box::new(MockRng),
        Box::new(MemoryPreferenceStore::new()),
    )
}

/// Build a runtime over the bundled page with a custom RNG and store.
pub fn build_runtime_with(
    clock: &Arc<ManualClock>,
    rng: Box<dyn DeterministicRng>,
    store: Box<dyn PreferenceStore>,
) -> PageRuntime {
    let clock: Arc<dyn Clock> = clock.clone();
    PageRuntime::new(bundled_document(), settings(), clock, rng, store)
}

/// Resolve `#id`, panicking if it is missing.
pub fn element(runtime: &PageRuntime, id: &str) -> ElementId {
    runtime
        .document()
        .element_by_id(id)
        .unwrap_or_else(|| panic!("#{id} missing"))
}

/// Whether `#id` carries `class`.
pub fn has_class(runtime: &PageRuntime, id: &str, class: &str) -> bool {
    runtime.document().has_class(element(runtime, id), class)
}

/// Content block of `group` in `lang`.
pub fn block(runtime: &PageRuntime, group: &str, lang: &str) -> ElementId {
    let doc = runtime.document();
    doc.elements_with_class("lang-content")
        .into_iter()
        .find(|e| {
            doc.attribute(*e, "data-lang-group").as_deref() == Some(group)
                && doc.attribute(*e, "data-lang").as_deref() == Some(lang)
        })
        .unwrap_or_else(|| panic!("no {lang} block in group {group}"))
}

/// Every element carrying `class`.
pub fn with_class(runtime: &PageRuntime, class: &str) -> Vec<ElementId> {
    runtime.document().elements_with_class(class)
}

/// Number of `lang-content` blocks per group carrying `active`, one entry per
/// group.
pub fn active_blocks_per_group(runtime: &PageRuntime) -> Vec<(String, usize)> {
    let doc = runtime.document();
    let mut groups: Vec<(String, usize)> = Vec::new();
    for block in doc.elements_with_class("lang-content") {
        let group = doc.attribute(block, "data-lang-group").unwrap_or_default();
        let active = usize::from(doc.has_class(block, "active"));
        match groups.iter_mut().find(|(name, _)| *name == group) {
            Some((_, count)) => *count += active,
            None => groups.push((group, active)),
        }
    }
    groups
}
