#![forbid(unsafe_code)]

//! Integration test: full tour lifecycle over a `VirtualDom` host.
//!
//! Exercises start/navigation event ordering, missing targets, standalone
//! popups preempting the main sequence, resize debouncing on host time,
//! keyboard and touch input, and listener teardown.
//!
//! Run:
//!   cargo test -p wayfinder-runtime --test integration_tour_lifecycle

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use wayfinder_core::{
    DomEventKind, ElementId, HostEvent, KeyCode, ListenTarget, Rect, Step, StepRegistry,
    TriggerEvent,
};
use wayfinder_runtime::{
    Action, DisplayMode, EventKind, Recovery, ResizeConfig, Tour, TourConfig, TourEvent,
    TourPhase,
};
use wayfinder_web::{DeterministicClock, VirtualDom};
use web_time::Duration;

// ── Helpers ───────────────────────────────────────────────────────────────

type Log = Rc<RefCell<Vec<TourEvent>>>;

fn dom() -> Rc<VirtualDom> {
    let dom = Rc::new(VirtualDom::default());
    dom.set_document_height(4000.0);
    dom
}

fn mount(dom: &VirtualDom, selector: &str, row: usize) -> ElementId {
    dom.insert(selector, Rect::new(300.0, 300.0 + 250.0 * row as f64, 160.0, 48.0))
}

fn steps(selectors: &[&str]) -> StepRegistry {
    StepRegistry::new(selectors.iter().map(|s| Step::new(*s)).collect())
}

fn continuous() -> TourConfig {
    TourConfig {
        mode: DisplayMode::Continuous,
        ..TourConfig::default()
    }
}

fn record(tour: &mut Tour<VirtualDom>) -> Log {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    tour.set_sink(move |event| sink.borrow_mut().push(event));
    log
}

fn kinds(log: &Log) -> Vec<(EventKind, Option<usize>)> {
    log.borrow().iter().map(|e| (e.kind, e.index)).collect()
}

fn drain(log: &Log) -> Vec<(EventKind, Option<usize>)> {
    let out = kinds(log);
    log.borrow_mut().clear();
    out
}

// ── Main sequence ─────────────────────────────────────────────────────────

#[test]
fn autorun_start_walks_to_finish() {
    let dom = dom();
    for (i, sel) in ["#a", "#b", "#c"].iter().enumerate() {
        mount(&dom, sel, i);
    }
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a", "#b", "#c"]), continuous());
    let log = record(&mut tour);

    tour.start(true, None, None);
    assert_eq!(
        drain(&log),
        vec![(EventKind::StepBefore, Some(0)), (EventKind::TooltipBefore, Some(0))]
    );
    assert_eq!(tour.phase(), TourPhase::RunningPopup);

    tour.next();
    assert_eq!(
        drain(&log),
        vec![
            (EventKind::StepAfter, Some(0)),
            (EventKind::StepBefore, Some(1)),
            (EventKind::TooltipBefore, Some(1)),
        ]
    );

    tour.next();
    drain(&log);
    tour.next();
    assert_eq!(
        drain(&log),
        vec![(EventKind::StepAfter, Some(2)), (EventKind::Finished, Some(3))]
    );
    assert_eq!(tour.phase(), TourPhase::Finished);
    assert!(!tour.is_running());
}

#[test]
fn missing_target_halts_and_jump_recovers() {
    let dom = dom();
    mount(&dom, "#a", 0);
    mount(&dom, "#c", 2);
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a", "#missing", "#c"]), continuous());
    let log = record(&mut tour);

    tour.start(true, None, None);
    drain(&log);

    tour.next();
    assert_eq!(
        drain(&log),
        vec![(EventKind::StepAfter, Some(0)), (EventKind::TargetNotFound, Some(1))]
    );
    assert!(!tour.is_running());
    assert_eq!(tour.index(), 1);

    let issues = tour.take_issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].recovery(), Recovery::HaltRunning);

    tour.jump_to(2);
    assert_eq!(
        drain(&log),
        vec![(EventKind::StepBefore, Some(2)), (EventKind::TooltipBefore, Some(2))]
    );
    assert!(tour.is_running());
    assert!(tour.shows_popup());
}

#[test]
fn start_with_missing_first_target_reports_immediately() {
    let dom = dom();
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#late"]), TourConfig::default());
    let log = record(&mut tour);
    tour.start(true, None, None);
    assert_eq!(drain(&log), vec![(EventKind::TargetNotFound, Some(0))]);
    assert_eq!(tour.phase(), TourPhase::Idle);
}

#[test]
fn vanished_target_is_reported_on_render() {
    let dom = dom();
    let a = mount(&dom, "#a", 0);
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a"]), TourConfig::default());
    let log = record(&mut tour);
    tour.start(true, None, None);
    assert!(tour.render().snapshot.is_some());
    drain(&log);

    dom.remove(a);
    let frame = tour.render();
    assert!(frame.snapshot.is_none());
    assert_eq!(drain(&log), vec![(EventKind::TargetNotFound, Some(0))]);
    assert!(!tour.is_running());
}

#[test]
fn skip_finishes_as_skipped() {
    let dom = dom();
    mount(&dom, "#a", 0);
    mount(&dom, "#b", 1);
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a", "#b"]), continuous());
    let log = record(&mut tour);
    tour.start(true, None, None);
    drain(&log);

    tour.skip();
    let events = log.borrow().clone();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::StepAfter);
    assert_eq!(events[1].kind, EventKind::Finished);
    assert!(events[1].skipped);
    assert_eq!(events[1].action, Action::Skip);
}

#[test]
fn single_mode_primary_closes_to_next_marker() {
    let dom = dom();
    mount(&dom, "#a", 0);
    mount(&dom, "#b", 1);
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a", "#b"]), TourConfig::default());
    let log = record(&mut tour);
    tour.start(true, None, None);
    drain(&log);

    tour.primary_click();
    assert_eq!(tour.phase(), TourPhase::RunningMarker);
    assert_eq!(tour.index(), 1);
    assert_eq!(
        drain(&log),
        vec![
            (EventKind::StepAfter, Some(0)),
            (EventKind::StepBefore, Some(1)),
            (EventKind::BeaconBefore, Some(1)),
        ]
    );
}

#[test]
fn reset_with_restart_starts_over() {
    let dom = dom();
    mount(&dom, "#a", 0);
    mount(&dom, "#b", 1);
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a", "#b"]), continuous());
    tour.start(true, None, None);
    tour.next();
    let log = record(&mut tour);

    tour.reset(true);
    assert_eq!(tour.index(), 0);
    assert!(tour.shows_popup());
    assert_eq!(
        drain(&log),
        vec![
            (EventKind::StepAfter, Some(1)),
            (EventKind::StepBefore, Some(0)),
            (EventKind::TooltipBefore, Some(0)),
        ]
    );
}

// ── Standalone popups ─────────────────────────────────────────────────────

#[test]
fn standalone_click_toggles_once() {
    let dom = dom();
    let help = mount(&dom, "#help", 0);
    let mut tour = Tour::new(Rc::clone(&dom), StepRegistry::default(), TourConfig::default());
    let log = record(&mut tour);
    let id = tour.register_standalone(Step::new("#help")).unwrap();

    let click = dom.fire(ListenTarget::Element(help), DomEventKind::Click).unwrap();
    tour.handle_event(click, Duration::ZERO);
    assert!(!tour.show_standalone(id));
    assert_eq!(drain(&log), vec![(EventKind::StandaloneBefore, None)]);
    assert_eq!(tour.phase(), TourPhase::StandalonePopup);

    tour.handle_event(click, Duration::ZERO);
    assert_eq!(drain(&log), vec![(EventKind::StandaloneAfter, None)]);
    assert_eq!(tour.phase(), TourPhase::Idle);
}

#[test]
fn standalone_preempts_and_resumes_main_sequence() {
    let dom = dom();
    mount(&dom, "#a", 0);
    mount(&dom, "#b", 1);
    mount(&dom, "#help", 2);
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a", "#b"]), continuous());
    tour.start(true, None, None);
    let log = record(&mut tour);
    let id = tour.register_standalone(Step::new("#help")).unwrap();

    assert!(tour.show_standalone(id));
    assert!(!tour.is_running());
    tour.next();
    assert_eq!(tour.index(), 0);
    assert_eq!(tour.take_issues()[0].recovery(), Recovery::PreferStandalone);

    let snap = tour.render().snapshot.unwrap();
    assert_eq!(snap.index, None);
    assert!(!snap.overlay);

    assert!(tour.hide_standalone());
    assert_eq!(tour.phase(), TourPhase::RunningPopup);
    assert_eq!(
        drain(&log),
        vec![
            (EventKind::StandaloneBefore, None),
            (EventKind::StandaloneAfter, None),
        ]
    );
}

#[test]
fn start_during_standalone_is_deferred() {
    let dom = dom();
    mount(&dom, "#a", 0);
    mount(&dom, "#help", 1);
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a"]), TourConfig::default());
    let log = record(&mut tour);
    let id = tour.register_standalone(Step::new("#help")).unwrap();
    tour.show_standalone(id);
    drain(&log);

    tour.start(true, None, None);
    assert!(!tour.is_running());
    assert!(log.borrow().is_empty());

    tour.primary_click();
    assert_eq!(
        drain(&log),
        vec![
            (EventKind::StandaloneAfter, None),
            (EventKind::StepBefore, Some(0)),
            (EventKind::TooltipBefore, Some(0)),
        ]
    );
    assert_eq!(tour.phase(), TourPhase::RunningPopup);
}

#[test]
fn register_standalone_rejects_unmounted_trigger() {
    let dom = dom();
    let mut tour = Tour::new(Rc::clone(&dom), StepRegistry::default(), TourConfig::default());
    let err = tour.register_standalone(Step::new("#nowhere")).unwrap_err();
    assert_eq!(err.recovery(), Recovery::HaltRunning);
    assert_eq!(dom.listener_count(), 0);
}

#[test]
fn hover_trigger_ignored_after_touch() {
    let dom = dom();
    let tip = mount(&dom, "#tip", 0);
    let mut tour = Tour::new(Rc::clone(&dom), StepRegistry::default(), TourConfig::default());
    tour.mount();
    tour.register_standalone(Step::new("#tip").trigger(TriggerEvent::Hover))
        .unwrap();

    tour.handle_event(HostEvent::touch_start(), Duration::ZERO);
    assert!(tour.touch().is_touch());
    tour.handle_event(HostEvent::mouse_enter(tip), Duration::ZERO);
    assert_eq!(tour.phase(), TourPhase::Idle);
}

// ── Host input ────────────────────────────────────────────────────────────

#[test]
fn resize_burst_recomputes_once() {
    let dom = dom();
    mount(&dom, "#a", 0);
    let config = TourConfig {
        resize: ResizeConfig {
            debounce: true,
            delay_ms: 200,
        },
        ..TourConfig::default()
    };
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a"]), config);
    tour.mount();
    tour.start(true, None, None);
    tour.render();
    assert_eq!(tour.placements_computed(), 1);

    let mut clock = DeterministicClock::new();
    for dt in [0, 50, 50] {
        let now = clock.advance(Duration::from_millis(dt));
        let event = dom.fire(ListenTarget::Window, DomEventKind::Resize).unwrap();
        tour.handle_event(event, now);
    }
    assert_eq!(tour.resize_debouncer().invalidated(), 2);

    tour.tick(clock.advance(Duration::from_millis(150)));
    tour.render();
    assert_eq!(tour.placements_computed(), 1);

    tour.tick(clock.advance(Duration::from_millis(50)));
    tour.render();
    assert_eq!(tour.placements_computed(), 2);

    tour.tick(clock.advance(Duration::from_millis(500)));
    tour.render();
    assert_eq!(tour.placements_computed(), 2);
    assert_eq!(tour.resize_debouncer().fired(), 1);
}

#[test]
fn resize_without_debounce_is_immediate() {
    let dom = dom();
    mount(&dom, "#a", 0);
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a"]), TourConfig::default());
    tour.mount();
    tour.start(true, None, None);
    tour.render();
    tour.handle_event(HostEvent::resize(), Duration::ZERO);
    tour.render();
    assert_eq!(tour.placements_computed(), 2);
}

#[test]
fn keyboard_ignored_outside_continuous_mode() {
    let dom = dom();
    mount(&dom, "#a", 0);
    mount(&dom, "#b", 1);
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a", "#b"]), TourConfig::default());
    tour.start(true, None, None);
    assert!(dom.fire_key(KeyCode::Enter).is_none());
    tour.handle_event(HostEvent::key(KeyCode::Enter), Duration::ZERO);
    assert_eq!(tour.index(), 0);
}

#[test]
fn keyboard_navigation_can_be_disabled() {
    let dom = dom();
    mount(&dom, "#a", 0);
    let config = TourConfig {
        keyboard_navigation: false,
        ..continuous()
    };
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a"]), config);
    tour.start(true, None, None);
    assert!(!dom.has_listener(ListenTarget::Window, DomEventKind::KeyDown));
}

// ── Teardown ──────────────────────────────────────────────────────────────

#[test]
fn teardown_removes_every_listener() {
    let dom = dom();
    mount(&dom, "#a", 0);
    mount(&dom, "#help", 1);
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a"]), continuous());
    tour.mount();
    tour.start(true, None, None);
    tour.register_standalone(Step::new("#help")).unwrap();
    assert_eq!(dom.listener_count(), 4);
    assert_eq!(tour.listener_count(), 4);

    let log = record(&mut tour);
    tour.teardown();
    assert_eq!(dom.listener_count(), 0);

    tour.next();
    tour.start(true, None, None);
    assert!(log.borrow().is_empty());
    assert!(tour.is_torn_down());
}

#[test]
fn drop_unbinds() {
    let dom = dom();
    mount(&dom, "#a", 0);
    {
        let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a"]), continuous());
        tour.mount();
        tour.start(true, None, None);
        assert!(dom.listener_count() > 0);
    }
    assert_eq!(dom.listener_count(), 0);
}

#[test]
fn mount_honours_run_flag() {
    let dom = dom();
    mount(&dom, "#a", 0);
    let config = TourConfig {
        run: true,
        autostart: true,
        ..TourConfig::default()
    };
    let mut tour = Tour::new(Rc::clone(&dom), steps(&["#a"]), config);
    assert_eq!(tour.phase(), TourPhase::Idle);
    tour.mount();
    assert_eq!(tour.phase(), TourPhase::RunningPopup);
}
