#![forbid(unsafe_code)]

//! Tour controller.
//!
//! [`Tour`] owns the [`TourState`] and is the only thing that mutates it.
//! Every operation follows the same shape:
//!
//! 1. Build a candidate state from the current one.
//! 2. Plan the lifecycle events for `current → candidate`.
//! 3. Emit them through the dispatcher.
//! 4. Commit the candidate.
//!
//! The controller is single-threaded and host-driven. The host delivers
//! [`HostEvent`]s (with a monotonic `now`) to [`Tour::handle_event`], calls
//! [`Tour::tick`] so the resize debouncer can fire, and asks for a
//! [`RenderFrame`] with [`Tour::render`] before painting.
//!
//! # Failure semantics
//!
//! Nothing is fatal. Unresolved targets halt running and fire
//! `error:target_not_found`; main-sequence commands issued while a standalone
//! popup is open are ignored; invalid configuration falls back to defaults.
//! Each case is kept in a bounded issue log (see [`Tour::take_issues`]).

use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;
use wayfinder_core::step::sanitize_selector;
use wayfinder_core::{
    AnchorRule, DomEventKind, DomHost, ElementId, HostEvent, KeyCode, ListenTarget, Point,
    Progress, Rect, Step, StepRegistry, TouchCapability, TriggerEvent,
};
use wayfinder_layout::{
    OFFSCREEN, PlacementEngine, PlacementMode, Viewport, measure, needs_scroll, page_origin,
    scroll_target,
};
use web_time::Duration;

use crate::config::{ConfigError, DisplayMode, TourConfig};
use crate::error::TourError;
use crate::lifecycle::{self, Dispatcher, EventKind, TourEvent, TransitionIntent};
use crate::listeners::ListenerRegistry;
use crate::resize_debounce::{ResizeDebouncer, ResizeSignal};
use crate::snapshot::{Buttons, RenderFrame, RenderSnapshot};
use crate::standalone::{TriggerDecision, TriggerManager};
use crate::state::{Action, PendingStart, StandaloneState, TourPhase, TourState};

/// Issues kept before the oldest is dropped.
pub const ISSUE_CAPACITY: usize = 16;

const RESIZE_KEY: &str = "resize";
const KEYBOARD_KEY: &str = "keyboard";
const TOUCH_KEY: &str = "touch";

#[derive(Debug, Clone, Copy, Default)]
struct FrameCache {
    target: Option<Rect>,
    anchor: Option<AnchorRule>,
    animate: bool,
}

/// Guided-tour state machine over a shared host.
pub struct Tour<H: DomHost> {
    host: Rc<H>,
    config: TourConfig,
    registry: StepRegistry,
    state: TourState,
    dispatcher: Dispatcher,
    engine: PlacementEngine,
    listeners: ListenerRegistry<H>,
    triggers: TriggerManager,
    debouncer: ResizeDebouncer,
    caps: TouchCapability,
    issues: VecDeque<TourError>,
    frame: FrameCache,
    placements: u64,
    torn_down: bool,
}

impl<H: DomHost> std::fmt::Debug for Tour<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tour")
            .field("state", &self.state)
            .field("steps", &self.registry.len())
            .field("listeners", &self.listeners.len())
            .field("issues", &self.issues.len())
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

impl<H: DomHost> Tour<H> {
    /// Create an idle tour. An invalid `config` is replaced by defaults and
    /// recorded as an issue.
    pub fn new(host: Rc<H>, registry: StepRegistry, config: TourConfig) -> Self {
        let mut issues = VecDeque::new();
        let errors = config.validate();
        let config = if errors.is_empty() {
            config
        } else {
            tracing::warn!(
                target: "wayfinder.controller",
                ?errors,
                "invalid tour config, using defaults"
            );
            issues.push_back(TourError::Config(ConfigError::Validation(errors)));
            TourConfig::default()
        };
        let caps = TouchCapability::new();
        Self {
            listeners: ListenerRegistry::new(Rc::clone(&host)),
            host,
            engine: PlacementEngine::new(config.placement),
            debouncer: ResizeDebouncer::new(
                config.resize.debounce,
                Duration::from_millis(config.resize.delay_ms),
            ),
            triggers: TriggerManager::new(caps.clone()),
            caps,
            config,
            registry,
            state: TourState::default(),
            dispatcher: Dispatcher::new(),
            issues,
            frame: FrameCache::default(),
            placements: 0,
            torn_down: false,
        }
    }

    /// Create from raw step records; invalid records become issues.
    pub fn from_value(host: Rc<H>, steps: &Value, config: TourConfig) -> Self {
        let (registry, rejected) = StepRegistry::from_value(steps);
        let mut tour = Self::new(host, registry, config);
        for (index, source) in rejected {
            tour.record(TourError::InvalidStep { index, source });
        }
        tour
    }

    /// Install the lifecycle sink.
    pub fn set_sink(&mut self, sink: impl FnMut(TourEvent) + 'static) {
        if !self.torn_down {
            self.dispatcher.set_sink(sink);
        }
    }

    pub fn clear_sink(&mut self) {
        self.dispatcher.clear_sink();
    }

    /// Bind window listeners and honour `config.run`.
    pub fn mount(&mut self) {
        if self.torn_down {
            return;
        }
        self.listeners
            .bind(RESIZE_KEY, ListenTarget::Window, DomEventKind::Resize);
        if !self.caps.is_touch() {
            self.listeners
                .bind(TOUCH_KEY, ListenTarget::Window, DomEventKind::TouchStart);
        }
        if self.config.run {
            self.start(self.config.autostart, None, None);
        }
    }

    // ── accessors ──────────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> &TourState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> TourPhase {
        self.state.phase(&self.registry)
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.state.index
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    #[must_use]
    pub fn shows_popup(&self) -> bool {
        self.state.show_popup
    }

    #[must_use]
    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    /// Shared touch capability.
    #[must_use]
    pub fn touch(&self) -> &TouchCapability {
        &self.caps
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.registry.progress(self.state.index)
    }

    #[must_use]
    pub fn resize_debouncer(&self) -> &ResizeDebouncer {
        &self.debouncer
    }

    /// Placements computed so far.
    #[must_use]
    pub const fn placements_computed(&self) -> u64 {
        self.placements
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Drain recorded issues, oldest first.
    pub fn take_issues(&mut self) -> Vec<TourError> {
        self.issues.drain(..).collect()
    }

    // ── main sequence ──────────────────────────────────────────────────

    /// Start the tour at `start_index` (default: `config.start_index`).
    ///
    /// Running begins only if the target resolves; `autorun` opens the popup
    /// straight away. While a standalone popup is open the start is deferred
    /// until it closes.
    pub fn start(&mut self, autorun: bool, steps: Option<StepRegistry>, start_index: Option<usize>) {
        if self.torn_down {
            return;
        }
        if let Some(steps) = steps {
            self.replace_steps(steps);
        }
        let index = start_index.unwrap_or(self.config.start_index);
        if self.state.standalone.is_some() {
            self.state.pending_start = Some(PendingStart { autorun, index });
            self.record(TourError::StateConflict {
                detail: "start deferred until the standalone popup closes".into(),
            });
            return;
        }
        self.start_at(autorun, index, Action::Start);
    }

    /// Stop running. Emits nothing; the caller can `start` again later.
    pub fn stop(&mut self) {
        if self.torn_down {
            return;
        }
        let mut next = self.state.clone();
        next.run_requested = false;
        next.is_running = false;
        next.show_popup = false;
        next.action = Action::Stop;
        next.pending_start = None;
        next.suspended_running = next.suspended_running.map(|_| false);
        self.commit(next, TransitionIntent::passive());
    }

    /// Return to the idle default state, optionally starting again.
    pub fn reset(&mut self, restart: bool) {
        if self.torn_down {
            return;
        }
        let autorun = self.state.autorun;
        let standalone = self.state.standalone.clone();
        let next = TourState {
            suspended_running: standalone.as_ref().map(|_| false),
            standalone,
            autorun,
            action: Action::Reset,
            ..TourState::default()
        };
        self.commit(next, TransitionIntent::passive());
        if restart {
            let index = self.config.start_index;
            if self.state.standalone.is_some() {
                self.state.pending_start = Some(PendingStart { autorun, index });
            } else {
                self.start_at(autorun, index, Action::Reset);
            }
        }
    }

    /// Advance one step, keeping popup/marker mode.
    pub fn next(&mut self) {
        if !self.accepts("next") {
            return;
        }
        let index = self.state.index + 1;
        let show = self.registry.get(index).is_some() && self.state.show_popup;
        self.transition_to(show, index, Action::Next);
    }

    /// Go back one step, keeping popup/marker mode. No-op at the first step.
    pub fn back(&mut self) {
        if !self.accepts("back") || self.state.index == 0 {
            return;
        }
        let index = self.state.index - 1;
        self.transition_to(self.state.show_popup, index, Action::Back);
    }

    /// Close the popup and move to the next step's marker.
    pub fn close(&mut self) {
        if self.accepts("close") {
            self.transition_to(false, self.state.index + 1, Action::Close);
        }
    }

    /// Finish the tour as skipped.
    pub fn skip(&mut self) {
        if !self.accepts("skip") {
            return;
        }
        let mut next = self.state.clone();
        next.skipped = true;
        next.index = self.registry.len();
        next.is_running = false;
        next.show_popup = false;
        next.run_requested = false;
        next.action = Action::Skip;
        next.position = OFFSCREEN;
        self.commit(next, TransitionIntent::passive());
    }

    /// Move directly to `index`. An idle or finished tour starts running
    /// there.
    pub fn jump_to(&mut self, index: usize) {
        if self.admits("jump") {
            let show = self.state.autorun || self.state.show_popup;
            self.request(show, index, Action::Jump);
        }
    }

    /// Central transition: resolve `index`, run or halt, reset placement.
    ///
    /// Works on an idle tour too; an unresolved target then reports
    /// `error:target_not_found` and leaves the tour halted at `index`.
    pub fn toggle_tooltip(&mut self, show: bool, index: usize, action: Action) {
        if self.admits(action.as_str()) {
            self.request(show, index, action);
        }
    }

    /// The render layer reports a marker activation.
    pub fn trigger_marker(&mut self, trigger: TriggerEvent) {
        if !self.accepts("trigger_marker") || !self.state.is_running || self.state.show_popup {
            return;
        }
        let index = self.state.index;
        let Some(step) = self.registry.get(index) else {
            return;
        };
        if step.trigger != trigger {
            tracing::debug!(
                target: "wayfinder.controller",
                index,
                "marker activation does not match step trigger"
            );
            return;
        }
        if trigger == TriggerEvent::Hover && self.caps.is_touch() {
            tracing::debug!(target: "wayfinder.controller", index, "hover ignored on touch device");
            return;
        }
        let action = match trigger {
            TriggerEvent::Click => Action::BeaconClick,
            TriggerEvent::Hover => Action::BeaconHover,
        };
        let mut annotated = self.state.clone();
        annotated.action = action;
        self.dispatcher.emit(TourEvent::for_step(
            EventKind::BeaconTrigger,
            index,
            &self.registry,
            &annotated,
        ));
        self.transition_to(true, index, action);
    }

    /// Click on the dimmed overlay.
    pub fn overlay_click(&mut self) {
        if self.torn_down {
            return;
        }
        if let Some(standalone) = &self.state.standalone {
            self.dispatcher
                .emit(TourEvent::for_standalone(EventKind::OverlayClick, standalone));
            if self.config.overlay.close_on_click {
                self.hide_standalone();
            }
            return;
        }
        if !(self.state.is_running && self.state.show_popup) {
            return;
        }
        let index = self.state.index;
        let mut annotated = self.state.clone();
        annotated.action = Action::Overlay;
        self.dispatcher.emit(TourEvent::for_step(
            EventKind::OverlayClick,
            index,
            &self.registry,
            &annotated,
        ));
        if self.config.overlay.close_on_click {
            let index = match self.config.mode {
                DisplayMode::Single => index + 1,
                DisplayMode::Continuous | DisplayMode::Guided => index,
            };
            self.transition_to(false, index, Action::Overlay);
        }
    }

    /// Click inside the spotlight hole.
    pub fn hole_click(&mut self) {
        if self.torn_down || !(self.state.is_running && self.state.show_popup) {
            return;
        }
        self.dispatcher.emit(TourEvent::for_step(
            EventKind::HoleClick,
            self.state.index,
            &self.registry,
            &self.state,
        ));
    }

    /// Primary popup button.
    pub fn primary_click(&mut self) {
        if self.state.standalone.is_some() {
            self.hide_standalone();
            return;
        }
        if !self.accepts("primary") || !(self.state.is_running && self.state.show_popup) {
            return;
        }
        match self.config.mode {
            DisplayMode::Single => self.close(),
            DisplayMode::Continuous => self.next(),
            DisplayMode::Guided => {
                self.transition_to(false, self.state.index + 1, Action::Next);
            }
        }
    }

    // ── standalone popups ──────────────────────────────────────────────

    /// Register an ad-hoc trigger element and bind its listeners.
    pub fn register_standalone(&mut self, step: Step) -> Result<usize, TourError> {
        if self.torn_down {
            return Err(TourError::TornDown);
        }
        let index = self.triggers.len();
        if let Err(source) = step.check() {
            return Err(TourError::InvalidStep { index, source });
        }
        let Some(element) = step.resolve(&*self.host) else {
            return Err(TourError::TargetNotFound {
                index,
                selector: step.selector.clone(),
            });
        };
        let id = self.triggers.register(step, element);
        if let Some(trigger) = self.triggers.get(id) {
            for &kind in trigger.listener_kinds() {
                self.listeners.bind(
                    format!("trigger:{id}:{}", kind.as_str()),
                    ListenTarget::Element(element),
                    kind,
                );
            }
        }
        Ok(id)
    }

    /// Remove a trigger, closing its popup if open.
    pub fn unregister_standalone(&mut self, id: usize) -> bool {
        if self.triggers.open() == Some(id) {
            self.hide_standalone();
        }
        self.listeners.unbind_prefix(&format!("trigger:{id}:"));
        self.triggers.unregister(id).is_some()
    }

    /// Open trigger `id`'s popup, suspending the main sequence.
    pub fn show_standalone(&mut self, id: usize) -> bool {
        if self.torn_down {
            return false;
        }
        let Some(trigger) = self.triggers.get(id) else {
            return false;
        };
        if self
            .state
            .standalone
            .as_ref()
            .is_some_and(|open| open.trigger == id)
        {
            return false;
        }
        let step = trigger.step.clone();
        let mut next = self.state.clone();
        if next.standalone.is_none() {
            next.suspended_running = Some(next.is_running);
        }
        next.is_running = false;
        next.standalone = Some(StandaloneState { trigger: id, step });
        next.position = OFFSCREEN;
        next.should_redraw = true;
        self.commit(next, TransitionIntent::passive());
        self.triggers.set_open(Some(id));
        true
    }

    /// Close the standalone popup and resume the main sequence.
    pub fn hide_standalone(&mut self) -> bool {
        if self.torn_down || self.state.standalone.is_none() {
            return false;
        }
        let mut next = self.state.clone();
        next.standalone = None;
        next.is_running = next.suspended_running.take().unwrap_or(false);
        next.position = OFFSCREEN;
        next.should_redraw = true;
        let pending = next.pending_start.take();
        self.commit(next, TransitionIntent::passive());
        self.triggers.set_open(None);
        if let Some(pending) = pending {
            self.start_at(pending.autorun, pending.index, Action::Start);
        }
        true
    }

    // ── host input ─────────────────────────────────────────────────────

    /// Deliver a host event observed at monotonic time `now`.
    ///
    /// Events for which no listener is bound are dropped.
    pub fn handle_event(&mut self, event: HostEvent, now: Duration) {
        if self.torn_down {
            return;
        }
        if !self.listeners.is_listening(event.target, event.kind) {
            tracing::trace!(
                target: "wayfinder.listeners",
                event = event.kind.as_str(),
                "no listener bound, dropping"
            );
            return;
        }
        match (event.kind, event.target) {
            (DomEventKind::Resize, _) => self.on_resize(now),
            (DomEventKind::TouchStart, _) => {
                if self.caps.mark_touch() {
                    tracing::debug!(target: "wayfinder.controller", "touch detected");
                }
                self.listeners.unbind(TOUCH_KEY);
            }
            (DomEventKind::KeyDown, _) => self.on_key(event.key.unwrap_or(KeyCode::Other)),
            (kind, ListenTarget::Element(element)) => self.on_trigger(element, kind),
            (_, ListenTarget::Window) => {}
        }
    }

    /// Advance host time; fires a due resize recomputation.
    pub fn tick(&mut self, now: Duration) {
        if self.debouncer.poll(now) {
            self.invalidate_placement();
        }
    }

    fn on_resize(&mut self, now: Duration) {
        match self.debouncer.signal(now) {
            ResizeSignal::Immediate => self.invalidate_placement(),
            ResizeSignal::Scheduled(deadline) => {
                tracing::trace!(
                    target: "wayfinder.controller",
                    deadline_ms = deadline.as_millis() as u64,
                    "resize recomputation scheduled"
                );
            }
        }
    }

    fn on_key(&mut self, key: KeyCode) {
        if !(self.state.is_running && self.state.show_popup) {
            return;
        }
        match key {
            KeyCode::Escape => {
                if self.accepts("esc") {
                    self.transition_to(false, self.state.index + 1, Action::Esc);
                }
            }
            KeyCode::Tab | KeyCode::Space | KeyCode::Enter => self.next(),
            KeyCode::Other => {}
        }
    }

    fn on_trigger(&mut self, element: ElementId, kind: DomEventKind) {
        match self.triggers.activate(element, kind) {
            TriggerDecision::Show(id) => {
                self.show_standalone(id);
            }
            TriggerDecision::Hide(_) => {
                self.hide_standalone();
            }
            TriggerDecision::Ignore => {}
        }
    }

    fn invalidate_placement(&mut self) {
        if self.state.is_running || self.state.standalone.is_some() {
            self.state.should_redraw = true;
            tracing::debug!(target: "wayfinder.controller", "placement invalidated");
        }
    }

    // ── rendering ──────────────────────────────────────────────────────

    /// Consult the document and produce the frame to paint.
    ///
    /// Recomputes placement when needed. A running step whose target has
    /// vanished halts the tour through the target-not-found path.
    pub fn render(&mut self) -> RenderFrame {
        if self.torn_down {
            return RenderFrame::default();
        }
        if let Some(standalone) = self.state.standalone.clone() {
            return self.render_standalone(&standalone.step);
        }
        if !self.state.is_running {
            return RenderFrame::default();
        }
        let index = self.state.index;
        let Some(step) = self.registry.get(index).cloned() else {
            return RenderFrame::default();
        };
        let parent = self.offset_parent();
        let Some(rect) = self.measure_step(&step, parent) else {
            self.on_target_vanished();
            return RenderFrame::default();
        };
        let mode = if self.state.show_popup {
            PlacementMode::Popup
        } else {
            PlacementMode::Marker
        };
        let first = self.state.is_unplaced();
        let mut scroll_to = None;
        if self.state.should_redraw || first {
            let viewport = Viewport::from_host(&*self.host);
            let (rule, position) = self.place(rect, step.position, &viewport, mode);
            if first && !step.is_fixed && self.config.scroll.policy.applies_to(index) {
                let origin = page_origin(&*self.host, parent);
                let y = scroll_target(
                    rule,
                    rect.translate(origin.x, origin.y),
                    Point::new(position.x + origin.x, position.y + origin.y),
                    self.config.scroll.offset,
                );
                if needs_scroll(viewport.scroll, y) {
                    scroll_to = Some(y);
                }
            }
        }
        self.frame.target = Some(rect);
        self.frame.animate = !first;
        RenderFrame {
            snapshot: self.snapshot(),
            scroll_to,
        }
    }

    fn render_standalone(&mut self, step: &Step) -> RenderFrame {
        let Some(rect) = self.measure_step(step, self.offset_parent()) else {
            tracing::warn!(
                target: "wayfinder.controller",
                selector = %step.selector,
                "standalone trigger vanished, closing popup"
            );
            self.hide_standalone();
            return self.render();
        };
        let first = self.state.is_unplaced();
        if self.state.should_redraw || first {
            let viewport = Viewport::from_host(&*self.host);
            self.place(rect, step.position, &viewport, PlacementMode::Popup);
        }
        self.frame.target = Some(rect);
        self.frame.animate = !first;
        RenderFrame {
            snapshot: self.snapshot(),
            scroll_to: None,
        }
    }

    fn place(
        &mut self,
        rect: Rect,
        rule: AnchorRule,
        viewport: &Viewport,
        mode: PlacementMode,
    ) -> (AnchorRule, Point) {
        let placement = self.engine.compute(rect, rule, viewport, mode);
        self.state.position = placement.position;
        self.state.should_redraw = false;
        self.frame.anchor = Some(placement.rule);
        self.placements += 1;
        (placement.rule, placement.position)
    }

    fn measure_step(&self, step: &Step, parent: Option<ElementId>) -> Option<Rect> {
        let element = step.resolve(&*self.host)?;
        measure(&*self.host, element, parent, step)
    }

    fn offset_parent(&self) -> Option<ElementId> {
        let selector = self.config.offset_parent.as_deref()?;
        let found = self.host.query_selector(&sanitize_selector(selector));
        if found.is_none() {
            tracing::warn!(
                target: "wayfinder.placement",
                selector,
                "offset parent not found, measuring against the body"
            );
        }
        found
    }

    fn on_target_vanished(&mut self) {
        let mut next = self.state.clone();
        next.is_running = false;
        next.show_popup = false;
        next.should_redraw = true;
        next.position = OFFSCREEN;
        self.commit(next, TransitionIntent::run(false));
    }

    /// Snapshot of what should currently be drawn, without consulting the
    /// document. Coordinates are [`OFFSCREEN`] until the first render.
    #[must_use]
    pub fn snapshot(&self) -> Option<RenderSnapshot> {
        if self.torn_down {
            return None;
        }
        if let Some(standalone) = &self.state.standalone {
            return Some(RenderSnapshot {
                mode: PlacementMode::Popup,
                index: None,
                step: standalone.step.clone(),
                x: self.state.position.x,
                y: self.state.position.y,
                target: self.frame.target,
                anchor: self.frame.anchor.unwrap_or(standalone.step.position),
                buttons: Buttons::standalone(&self.config),
                animate: self.frame.animate,
                overlay: false,
                hole: None,
                allow_clicks_thru_hole: false,
                progress: None,
            });
        }
        if !self.state.is_running {
            return None;
        }
        let index = self.state.index;
        let step = self.registry.get(index)?;
        let popup = self.state.show_popup;
        let overlay = popup && self.config.overlay.show;
        let hole = if overlay && step.position != AnchorRule::Virtual {
            self.frame
                .target
                .map(|t| t.outset(self.config.overlay.hole_padding))
        } else {
            None
        };
        Some(RenderSnapshot {
            mode: if popup {
                PlacementMode::Popup
            } else {
                PlacementMode::Marker
            },
            index: Some(index),
            step: step.clone(),
            x: self.state.position.x,
            y: self.state.position.y,
            target: self.frame.target,
            anchor: self.frame.anchor.unwrap_or(step.position),
            buttons: Buttons::for_step(&self.config, &self.registry, index),
            animate: self.frame.animate,
            overlay,
            hole,
            allow_clicks_thru_hole: self.config.overlay.allow_clicks_thru_hole
                || step.allow_clicks_thru_hole,
            progress: Some(self.registry.progress(index)),
        })
    }

    // ── teardown ───────────────────────────────────────────────────────

    /// Unbind every listener, cancel pending work and drop the sink.
    /// Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let removed = self.listeners.teardown();
        self.debouncer.cancel();
        self.dispatcher.clear_sink();
        self.triggers.clear();
        self.torn_down = true;
        tracing::debug!(target: "wayfinder.controller", removed, "torn down");
    }

    // ── internals ──────────────────────────────────────────────────────

    fn accepts(&mut self, command: &str) -> bool {
        if !self.admits(command) {
            return false;
        }
        if !self.state.run_requested {
            tracing::debug!(target: "wayfinder.controller", command, "ignored, tour not started");
            return false;
        }
        true
    }

    /// Torn-down and standalone-precedence guards shared by every command.
    fn admits(&mut self, command: &str) -> bool {
        if self.torn_down {
            return false;
        }
        if self.state.standalone.is_some() {
            tracing::debug!(
                target: "wayfinder.controller",
                command,
                "ignored while a standalone popup is open"
            );
            self.record(TourError::StateConflict {
                detail: format!("{command} ignored while a standalone popup is open"),
            });
            return false;
        }
        true
    }

    fn start_at(&mut self, autorun: bool, index: usize, action: Action) {
        if self.torn_down {
            return;
        }
        if !self.registry.is_empty() && self.registry.get(index).is_none() {
            tracing::warn!(
                target: "wayfinder.controller",
                index,
                len = self.registry.len(),
                "start index past the last step, ignored"
            );
            return;
        }
        let found = self.registry.resolve(index, &*self.host).is_some();
        let mut next = self.state.clone();
        next.autorun = autorun;
        next.run_requested = self.registry.get(index).is_some();
        next.skipped = false;
        next.action = action;
        next.index = index;
        next.is_running = found;
        next.show_popup = autorun && found;
        next.should_redraw = true;
        next.position = OFFSCREEN;
        next.pending_start = None;
        self.commit(next, TransitionIntent::run(found));
    }

    fn transition_to(&mut self, show: bool, index: usize, action: Action) {
        self.move_to(show, index, action, self.state.run_requested);
    }

    /// Caller-requested move that also starts an idle or finished tour.
    fn request(&mut self, show: bool, index: usize, action: Action) {
        if !self.state.run_requested && self.registry.get(index).is_none() {
            tracing::debug!(
                target: "wayfinder.controller",
                index,
                command = action.as_str(),
                "ignored, no step at index"
            );
            return;
        }
        self.move_to(show, index, action, true);
    }

    fn move_to(&mut self, show: bool, index: usize, action: Action, requested_run: bool) {
        let found = self.registry.resolve(index, &*self.host).is_some();
        let mut next = self.state.clone();
        if !self.state.run_requested {
            next.skipped = false;
        }
        next.index = index;
        next.action = action;
        next.is_running = found;
        next.show_popup = show && found;
        next.should_redraw = !show || !found;
        next.position = OFFSCREEN;
        next.run_requested = requested_run && self.registry.get(index).is_some();
        let intent = TransitionIntent {
            requested_run,
            target_found: found,
        };
        self.commit(next, intent);
    }

    /// Leave the current step against the outgoing registry, then swap.
    fn replace_steps(&mut self, steps: StepRegistry) {
        let suspended = self.state.suspended_running == Some(true);
        if self.state.is_running || suspended {
            let index = self.state.index;
            let mut leaving = self.state.clone();
            leaving.action = Action::Start;
            self.dispatcher.emit(TourEvent::for_step(
                EventKind::StepAfter,
                index,
                &self.registry,
                &leaving,
            ));
            let mut next = leaving;
            next.is_running = false;
            next.show_popup = false;
            next.suspended_running = next.suspended_running.map(|_| false);
            if next.standalone.is_none() {
                next.position = OFFSCREEN;
                next.should_redraw = true;
            }
            self.commit(next, TransitionIntent::passive());
        }
        self.registry = steps;
    }

    fn commit(&mut self, next: TourState, intent: TransitionIntent) {
        let events = lifecycle::plan(&self.state, &next, &self.registry, intent);
        if events.iter().any(|e| e.kind == EventKind::TargetNotFound) {
            let selector = self
                .registry
                .get(next.index)
                .map(|s| s.selector.clone())
                .unwrap_or_default();
            self.record(TourError::TargetNotFound {
                index: next.index,
                selector,
            });
        }
        tracing::debug!(
            target: "wayfinder.controller",
            from = ?self.state.phase(&self.registry),
            to = ?next.phase(&self.registry),
            index = next.index,
            action = next.action.as_str(),
            events = events.len(),
            "transition"
        );
        self.dispatcher.emit_all(events);
        if next.is_unplaced() {
            self.frame = FrameCache::default();
        }
        self.state = next;
        self.sync_keyboard();
    }

    fn sync_keyboard(&mut self) {
        let wanted = !self.torn_down
            && self.config.mode == DisplayMode::Continuous
            && self.config.keyboard_navigation
            && self.state.is_running
            && self.state.standalone.is_none();
        let bound = self.listeners.contains(KEYBOARD_KEY);
        if wanted && !bound {
            self.listeners
                .bind(KEYBOARD_KEY, ListenTarget::Window, DomEventKind::KeyDown);
        } else if !wanted && bound {
            self.listeners.unbind(KEYBOARD_KEY);
        }
    }

    fn record(&mut self, issue: TourError) {
        tracing::warn!(
            target: "wayfinder.controller",
            recovery = ?issue.recovery(),
            "{issue}"
        );
        if self.issues.len() == ISSUE_CAPACITY {
            self.issues.pop_front();
        }
        self.issues.push_back(issue);
    }
}

impl<H: DomHost> Drop for Tour<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
