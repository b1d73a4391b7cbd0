#![forbid(unsafe_code)]

//! Headless placement: JSON steps measured and placed against a `VirtualDom`.
//!
//! Run:
//!   cargo test -p wayfinder-web --test headless_placement

use pretty_assertions::assert_eq;
use wayfinder_core::{AnchorRule, DomHost, Point, Rect, Size};
use wayfinder_layout::{PlacementEngine, PlacementMode, Viewport, measure};
use wayfinder_web::{DeterministicClock, VirtualDom, parse_steps_json};

const STEPS: &str = r##"[
    { "selector": "#hero", "position": "bottom", "title": "Welcome" },
    { "selector": "#sidebar  .nav", "position": "right", "isFixed": true },
    { "title": "orphan" }
]"##;

fn page() -> VirtualDom {
    let dom = VirtualDom::new(Size::new(1280.0, 800.0));
    dom.set_document_height(3000.0);
    dom.insert("#hero", Rect::new(100.0, 200.0, 300.0, 50.0));
    dom.insert("#sidebar .nav", Rect::new(0.0, 120.0, 200.0, 400.0));
    dom
}

#[test]
fn parsed_steps_resolve_against_the_page() {
    let (registry, issues) = parse_steps_json(STEPS).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].0, 2);

    let dom = page();
    assert!(registry.resolve(0, &dom).is_some());
    // Inner whitespace is collapsed before querying.
    assert!(registry.resolve(1, &dom).is_some());
    assert_eq!(registry.get(0).unwrap().title.as_deref(), Some("Welcome"));
}

#[test]
fn measurement_follows_scroll_unless_fixed() {
    let (registry, _) = parse_steps_json(STEPS).unwrap();
    let dom = page();
    dom.set_scroll(Point::new(0.0, 500.0));

    let hero = registry.get(0).unwrap();
    let el = hero.resolve(&dom).unwrap();
    assert_eq!(
        measure(&dom, el, None, hero),
        Some(Rect::new(100.0, 700.0, 300.0, 50.0))
    );

    let nav = registry.get(1).unwrap();
    let el = nav.resolve(&dom).unwrap();
    assert_eq!(
        measure(&dom, el, None, nav),
        Some(Rect::new(0.0, 120.0, 200.0, 400.0))
    );
}

#[test]
fn offset_parent_rebases_measurement() {
    let dom = page();
    let panel = dom.insert("#panel", Rect::new(50.0, 150.0, 600.0, 400.0));
    let (registry, _) = parse_steps_json(STEPS).unwrap();
    let hero = registry.get(0).unwrap();
    let el = hero.resolve(&dom).unwrap();
    assert_eq!(
        measure(&dom, el, Some(panel), hero),
        Some(Rect::new(50.0, 50.0, 300.0, 50.0))
    );

    dom.remove(panel);
    assert_eq!(
        measure(&dom, el, Some(panel), hero),
        Some(Rect::new(100.0, 200.0, 300.0, 50.0))
    );
}

#[test]
fn popup_lands_below_hero() {
    let (registry, _) = parse_steps_json(STEPS).unwrap();
    let dom = page();
    let hero = registry.get(0).unwrap();
    let el = hero.resolve(&dom).unwrap();
    let rect = measure(&dom, el, None, hero).unwrap();

    let placement = PlacementEngine::default().compute(
        rect,
        hero.position,
        &Viewport::from_host(&dom),
        PlacementMode::Popup,
    );
    assert_eq!(placement.rule, AnchorRule::Bottom);
    assert_eq!(placement.position, Point::new(70.0, 265.0));
}

#[test]
fn side_rule_uses_minimum_layout_width() {
    let (registry, _) = parse_steps_json(STEPS).unwrap();
    let dom = page();
    dom.set_viewport(Size::new(500.0, 800.0));
    let nav = registry.get(1).unwrap();
    let el = nav.resolve(&dom).unwrap();
    let rect = measure(&dom, el, None, nav).unwrap();

    let placement = PlacementEngine::default().compute(
        rect,
        nav.position,
        &Viewport::from_host(&dom),
        PlacementMode::Popup,
    );
    assert_eq!(placement.rule, AnchorRule::Right);
    assert_eq!(dom.viewport_size(), Size::new(500.0, 800.0));
}

#[test]
fn clock_is_host_driven() {
    let mut clock = DeterministicClock::new();
    assert_eq!(clock.now().as_millis(), 0);
    clock.advance(core::time::Duration::from_millis(120));
    clock.advance(core::time::Duration::from_millis(80));
    assert_eq!(clock.now().as_millis(), 200);
}
