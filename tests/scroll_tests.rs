// Host-side tests for scroll trigger geometry and scrub smoothing.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}
mod scroll {
    include!("../src/core/scroll.rs");
}

use scroll::*;

#[test]
fn edges_parse_keywords_and_percentages() {
    let e: Edge = "top 80%".parse().expect("valid edge");
    assert_eq!(e.element, Position::Top);
    assert_eq!(e.viewport, Position::Fraction(0.8));

    let e: Edge = "bottom bottom".parse().expect("valid edge");
    assert_eq!(e.element.fraction(), 1.0);
    assert_eq!(e.viewport.fraction(), 1.0);

    let e: Edge = "center   top".parse().expect("extra whitespace is fine");
    assert_eq!(e.element, Position::Center);
}

#[test]
fn malformed_edges_are_rejected() {
    assert_eq!(
        "top".parse::<Edge>(),
        Err(EdgeParseError::Shape("top".into()))
    );
    assert!(matches!(
        "top top top".parse::<Edge>(),
        Err(EdgeParseError::Shape(_))
    ));
    assert_eq!(
        "middle top".parse::<Edge>(),
        Err(EdgeParseError::Position("middle".into()))
    );
    assert!("top 80".parse::<Edge>().is_err());
}

#[test]
fn card_range_resolves_against_viewport() {
    // Card at document y=2000, 300px tall, 1000px viewport
    let start: Edge = "top 80%".parse().unwrap();
    let end: Edge = "top 30%".parse().unwrap();
    let range = TriggerRange::resolve(2000.0, 300.0, 1000.0, start, end);
    assert_eq!(range.start, 1200.0);
    assert_eq!(range.end, 1700.0);

    assert_eq!(range.progress(0.0), 0.0);
    assert_eq!(range.progress(1450.0), 0.5);
    assert_eq!(range.progress(5000.0), 1.0);
}

#[test]
fn pinned_section_range_and_offset() {
    // Section 3000px tall at y=500, pinned from top-top to bottom-bottom
    let range = TriggerRange::resolve(
        500.0,
        3000.0,
        1000.0,
        "top top".parse().unwrap(),
        "bottom bottom".parse().unwrap(),
    );
    assert_eq!(range.start, 500.0);
    assert_eq!(range.end, 2500.0);

    assert_eq!(range.pin_offset(0.0), 0.0);
    assert_eq!(range.pin_offset(1500.0), 1000.0);
    // Held at the end once the range is passed
    assert_eq!(range.pin_offset(9000.0), 2000.0);
}

#[test]
fn degenerate_range_steps() {
    let range = TriggerRange {
        start: 100.0,
        end: 100.0,
    };
    assert_eq!(range.progress(99.0), 0.0);
    assert_eq!(range.progress(100.0), 1.0);
    assert_eq!(range.pin_offset(500.0), 0.0);

    let inverted = TriggerRange {
        start: 200.0,
        end: 100.0,
    };
    assert_eq!(inverted.progress(150.0), 0.0);
    assert_eq!(inverted.pin_offset(300.0), 0.0);
}

#[test]
fn easing_curves() {
    assert_eq!(Ease::Linear.apply(0.25), 0.25);
    assert_eq!(Ease::Power1Out.apply(0.0), 0.0);
    assert_eq!(Ease::Power1Out.apply(1.0), 1.0);
    assert_eq!(Ease::Power1Out.apply(0.5), 0.75);
    assert_eq!(Ease::Power1Out.apply(2.0), 1.0);
    assert_eq!(Ease::Linear.apply(-1.0), 0.0);
}

#[test]
fn instant_scrub_applies_immediately() {
    let mut s = ScrubState::new(Scrub::Instant);
    assert_eq!(s.set_target(0.4), Some(0.4));
    assert_eq!(s.current(), 0.4);
    // No change, nothing to apply
    assert_eq!(s.set_target(0.4), None);
    // Stepping never moves an instant binding
    assert_eq!(s.step(0.016), None);
}

#[test]
fn lagged_scrub_catches_up_over_about_a_second() {
    let mut s = ScrubState::new(Scrub::Lag(1.0));
    assert_eq!(s.set_target(1.0), None);
    assert_eq!(s.current(), 0.0);

    let first = s.step(0.016).expect("moves toward target");
    assert!(first > 0.0 && first < 0.1);

    let mut last = first;
    for _ in 0..62 {
        last = s.step(0.016).unwrap_or(last);
    }
    // ~1 s in: within 5% of the target
    assert!(last > 0.95 && last < 1.0, "{}", last);

    for _ in 0..600 {
        s.step(0.016);
    }
    assert_eq!(s.current(), 1.0);
    assert_eq!(s.step(0.016), None);
}

#[test]
fn snap_skips_the_lag() {
    let mut s = ScrubState::new(Scrub::Lag(1.0));
    assert_eq!(s.snap(0.7), 0.7);
    assert_eq!(s.current(), 0.7);
    assert_eq!(s.target(), 0.7);
    assert_eq!(s.step(0.016), None);
}

#[test]
fn zero_lag_settles_in_one_step() {
    let mut s = ScrubState::new(Scrub::Lag(0.0));
    s.set_target(0.3);
    assert_eq!(s.step(0.016), Some(0.3));
}

#[test]
fn reveal_style_moves_card_up_and_in() {
    let hidden = RevealStyle::at(0.0, Ease::Power1Out);
    assert_eq!(hidden.translate_y_px, 100.0);
    assert_eq!(hidden.opacity, 0.0);

    let shown = RevealStyle::at(1.0, Ease::Power1Out);
    assert_eq!(shown.translate_y_px, 0.0);
    assert_eq!(shown.opacity, 1.0);

    let half = RevealStyle::at(0.5, Ease::Power1Out);
    assert_eq!(half.opacity, 0.75);
    assert_eq!(half.translate_y_px, 25.0);
}

// A card that is both trigger and reveal target, re-measured every frame with
// the transform it applied to itself still in its bounding rect.
fn settle_card_reveal(subtract_own_offset: bool) -> f32 {
    let (layout_top, height, vh) = (2000.0, 200.0, 800.0);
    let start: Edge = "top 80%".parse().expect("valid edge");
    let end: Edge = "top 30%".parse().expect("valid edge");
    let scroll = 1560.0;

    let mut scrub = ScrubState::new(Scrub::Lag(1.0));
    let mut applied = RevealStyle::at(scrub.snap(0.0), Ease::Power1Out).translate_y_px as f64;
    for _ in 0..600 {
        let rect_top = layout_top + applied - scroll;
        let own = if subtract_own_offset { applied } else { 0.0 };
        let top = document_top(rect_top, scroll, own);
        let range = TriggerRange::resolve(top, height, vh, start, end);
        scrub.set_target(range.progress(scroll));
        if let Some(v) = scrub.step(1.0 / 60.0) {
            applied = RevealStyle::at(v, Ease::Power1Out).translate_y_px as f64;
        }
    }
    scrub.current()
}

#[test]
fn reveal_progress_ignores_the_cards_own_offset() {
    let settled = settle_card_reveal(true);
    assert!((settled - 0.5).abs() < 1e-3, "settled at {}", settled);
}

#[test]
fn measuring_through_the_offset_would_lag_behind_scroll() {
    assert!(settle_card_reveal(false) < 0.45);
}

#[test]
fn document_top_removes_only_the_own_offset() {
    assert_eq!(document_top(440.0, 1560.0, 0.0), 2000.0);
    assert_eq!(document_top(490.0, 1560.0, 50.0), 2000.0);

    let start: Edge = "top 80%".parse().expect("valid edge");
    let end: Edge = "top 30%".parse().expect("valid edge");
    let shifted = TriggerRange::resolve(document_top(540.0, 1560.0, 100.0), 200.0, 800.0, start, end);
    let at_rest = TriggerRange::resolve(document_top(440.0, 1560.0, 0.0), 200.0, 800.0, start, end);
    assert_eq!(shifted, at_rest);
    assert_eq!(at_rest.progress(1560.0), 0.5);
}
