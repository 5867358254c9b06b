//! Integration tests for language switching through the page runtime.

mod common;

use std::sync::Arc;

use chrono::TimeDelta;
use invitation_core::surface::Surface;
use invitation_locale::domain::locale::Locale;
use invitation_page::events::PageEvent;
use invitation_preference_store::file_preference_store::FilePreferenceStore;
use invitation_test_support::{ManualClock, MockRng};
use tempfile::TempDir;

fn click(target: &str) -> PageEvent {
    PageEvent::Click {
        target: target.to_owned(),
    }
}

#[test]
fn test_page_starts_in_default_language() {
    let clock = Arc::new(ManualClock::new(common::start()));
    let runtime = common::build_runtime(&clock);

    assert_eq!(runtime.current_locale(), Some(Locale::English));
    assert!(common::has_class(&runtime, "lang-en", "active"));
    assert!(!common::has_class(&runtime, "lang-es", "active"));
    let hero_en = common::block(&runtime, "hero", "en");
    assert!(runtime.document().has_class(hero_en, "active"));
}

#[test]
fn test_selector_click_switches_and_settles_after_fade() {
    let clock = Arc::new(ManualClock::new(common::start()));
    let mut runtime = common::build_runtime(&clock);

    runtime.dispatch(click("lang-es"));

    let hero_en = common::block(&runtime, "hero", "en");
    let hero_es = common::block(&runtime, "hero", "es");
    let doc = runtime.document();
    assert_eq!(runtime.current_locale(), Some(Locale::Spanish));
    assert!(doc.has_class(hero_es, "active"));
    assert!(doc.has_class(hero_es, "lang-entering"));
    assert!(!doc.has_class(hero_en, "active"));
    assert!(doc.has_class(hero_en, "lang-leaving"));
    assert!(common::has_class(&runtime, "lang-es", "active"));
    assert!(!common::has_class(&runtime, "lang-en", "active"));

    clock.advance(TimeDelta::milliseconds(299));
    runtime.run_due();
    assert!(runtime.document().has_class(hero_es, "lang-entering"));

    clock.advance(TimeDelta::milliseconds(1));
    runtime.run_due();
    assert!(common::with_class(&runtime, "lang-entering").is_empty());
    assert!(common::with_class(&runtime, "lang-leaving").is_empty());
}

#[test]
fn test_rapid_switches_keep_one_active_block_per_group() {
    let clock = Arc::new(ManualClock::new(common::start()));
    let mut runtime = common::build_runtime(&clock);

    for lang in ["lang-es", "lang-en", "lang-es", "lang-es", "lang-en"] {
        runtime.dispatch(click(lang));
        clock.advance(TimeDelta::milliseconds(50));
        runtime.run_due();
        for (group, active) in common::active_blocks_per_group(&runtime) {
            assert_eq!(active, 1, "group {group} after {lang}");
        }
    }

    clock.advance(TimeDelta::milliseconds(300));
    runtime.run_due();
    assert_eq!(runtime.current_locale(), Some(Locale::English));
    assert!(common::with_class(&runtime, "lang-entering").is_empty());
    assert!(common::with_class(&runtime, "lang-leaving").is_empty());
}

#[test]
fn test_choice_survives_reload() {
    let dir = TempDir::new().unwrap();
    let prefs = dir.path().join("prefs.json");
    let clock = Arc::new(ManualClock::new(common::start()));

    let mut first = common::build_runtime_with(
        &clock,
        Box::new(MockRng),
        Box::new(FilePreferenceStore::open(&prefs)),
    );
    first.dispatch(click("lang-es"));
    drop(first);

    let second = common::build_runtime_with(
        &clock,
        Box::new(MockRng),
        Box::new(FilePreferenceStore::open(&prefs)),
    );

    assert_eq!(second.current_locale(), Some(Locale::Spanish));
    let story_es = common::block(&second, "story", "es");
    assert!(second.document().has_class(story_es, "active"));
    assert!(common::with_class(&second, "lang-entering").is_empty());
}

#[test]
fn test_corrupt_preference_file_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    let prefs = dir.path().join("prefs.json");
    std::fs::write(&prefs, "{{{").unwrap();
    let clock = Arc::new(ManualClock::new(common::start()));

    let runtime = common::build_runtime_with(
        &clock,
        Box::new(MockRng),
        Box::new(FilePreferenceStore::open(&prefs)),
    );

    assert_eq!(runtime.current_locale(), Some(Locale::English));
}

#[test]
fn test_unknown_locale_code_changes_nothing() {
    let clock = Arc::new(ManualClock::new(common::start()));
    let mut runtime = common::build_runtime(&clock);

    runtime.switch_locale("fr");

    assert_eq!(runtime.current_locale(), Some(Locale::English));
    assert!(common::with_class(&runtime, "lang-leaving").is_empty());
    assert_eq!(runtime.next_deadline(), Some(common::start() + TimeDelta::seconds(1)));
}
