//! Page fixtures — ready-made documents carrying every marker the
//! controllers look for.
//!
//! Geometry of `invitation_document` (viewport 800 px, document 4000 px):
//!
//! | element       | top  | height |
//! |---------------|------|--------|
//! | `#home`       | 0    | 900    |
//! | `#heroText`   | 200  | 300    |
//! | `#countdown`  | 600  | 120    |
//! | `#story`      | 900  | 800    |
//! | `#details`    | 1700 | 700    |
//! | `#rsvp`       | 2400 | 600    |
//! | `#gallery`    | 3000 | 1000   |

use invitation_core::document::Document;
use invitation_core::surface::{ElementId, NewElement, Surface};

fn add(doc: &mut Document, parent: ElementId, element: NewElement) -> ElementId {
    doc.append_child(parent, element)
        .expect("fixture parent is live")
}

fn lang_block(group: &str, lang: &str, text: &str, top: f64, height: f64) -> NewElement {
    NewElement::new("div")
        .with_class("lang-content")
        .with_attribute("data-lang", lang)
        .with_attribute("data-lang-group", group)
        .with_text(text)
        .with_layout(top, height)
}

/// The full invitation page.
///
/// # Panics
///
/// Never in practice; building into a fresh document cannot fail.
#[must_use]
pub fn invitation_document() -> Document {
    let mut doc = Document::new(800.0);
    let root = doc.root();

    add(
        &mut doc,
        root,
        NewElement::new("div").with_id("scrollProgress"),
    );
    add(&mut doc, root, NewElement::new("div").with_id("confetti"));

    let nav = add(
        &mut doc,
        root,
        NewElement::new("nav").with_layout(0.0, 60.0),
    );
    for section in ["home", "story", "details", "rsvp", "gallery"] {
        add(
            &mut doc,
            nav,
            NewElement::new("a")
                .with_class("nav-link")
                .with_attribute("data-section", section),
        );
    }
    for lang in ["en", "es"] {
        add(
            &mut doc,
            nav,
            NewElement::new("button")
                .with_id(&format!("lang-{lang}"))
                .with_class("lang-btn")
                .with_attribute("data-lang", lang),
        );
    }

    let home = add(
        &mut doc,
        root,
        NewElement::new("section")
            .with_id("home")
            .with_class("section")
            .with_layout(0.0, 900.0),
    );
    add(
        &mut doc,
        home,
        NewElement::new("div")
            .with_id("heroBackground")
            .with_layout(0.0, 900.0),
    );
    let hero_text = add(
        &mut doc,
        home,
        NewElement::new("div")
            .with_id("heroText")
            .with_class("fade-in-up")
            .with_layout(200.0, 300.0),
    );
    add(
        &mut doc,
        hero_text,
        lang_block("hero", "en", "We're getting married", 200.0, 100.0),
    );
    add(
        &mut doc,
        hero_text,
        lang_block("hero", "es", "Nos casamos", 200.0, 100.0),
    );
    let countdown = add(
        &mut doc,
        home,
        NewElement::new("div")
            .with_id("countdown")
            .with_layout(600.0, 120.0),
    );
    for unit in ["days", "hours", "minutes", "seconds"] {
        add(
            &mut doc,
            countdown,
            NewElement::new("span")
                .with_id(unit)
                .with_text("--")
                .with_layout(600.0, 120.0),
        );
    }

    let story = add(
        &mut doc,
        root,
        NewElement::new("section")
            .with_id("story")
            .with_class("section")
            .with_class("fade-in-up")
            .with_layout(900.0, 800.0),
    );
    add(
        &mut doc,
        story,
        lang_block("story", "en", "How we met", 950.0, 400.0),
    );
    add(
        &mut doc,
        story,
        lang_block("story", "es", "Cómo nos conocimos", 950.0, 400.0),
    );

    let details = add(
        &mut doc,
        root,
        NewElement::new("section")
            .with_id("details")
            .with_class("section")
            .with_class("fade-in-up")
            .with_layout(1700.0, 700.0),
    );
    for (idx, top) in [1750.0, 2050.0].into_iter().enumerate() {
        add(
            &mut doc,
            details,
            NewElement::new("div")
                .with_id(&format!("card-{idx}"))
                .with_class("tilt-card")
                .with_layout(top, 300.0),
        );
    }

    let rsvp = add(
        &mut doc,
        root,
        NewElement::new("section")
            .with_id("rsvp")
            .with_class("section")
            .with_class("fade-in-up")
            .with_layout(2400.0, 600.0),
    );
    add(
        &mut doc,
        rsvp,
        NewElement::new("button")
            .with_id("rsvpConfirm")
            .with_layout(2600.0, 50.0),
    );
    add(
        &mut doc,
        rsvp,
        NewElement::new("div")
            .with_id("rsvpThanks")
            .with_layout(2700.0, 100.0),
    );

    add(
        &mut doc,
        root,
        NewElement::new("section")
            .with_id("gallery")
            .with_class("section")
            .with_class("fade-in-up")
            .with_layout(3000.0, 1000.0),
    );

    add(&mut doc, root, NewElement::new("button").with_id("scrollTop"));

    doc
}

/// A page shorter than its viewport: one section, nothing to scroll.
///
/// # Panics
///
/// Never in practice; building into a fresh document cannot fail.
#[must_use]
pub fn short_document() -> Document {
    let mut doc = Document::new(1000.0);
    let root = doc.root();

    add(
        &mut doc,
        root,
        NewElement::new("div").with_id("scrollProgress"),
    );
    add(
        &mut doc,
        root,
        NewElement::new("a")
            .with_class("nav-link")
            .with_attribute("data-section", "only"),
    );
    add(
        &mut doc,
        root,
        NewElement::new("section")
            .with_id("only")
            .with_class("section")
            .with_class("fade-in-up")
            .with_layout(0.0, 400.0),
    );
    add(&mut doc, root, NewElement::new("button").with_id("scrollTop"));

    doc
}
