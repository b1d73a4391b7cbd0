#![forbid(unsafe_code)]

//! In-memory document implementing [`DomHost`].
//!
//! Elements are registered under a selector with a viewport-relative rect.
//! A query returns the first live element registered under exactly that
//! selector, matching `querySelector`'s document-order semantics closely
//! enough for headless tours. Listeners are real records: [`VirtualDom::fire`]
//! only produces a [`HostEvent`] when something is listening, so tests can
//! verify that teardown actually unbinds.

use std::cell::RefCell;
use std::collections::BTreeMap;

use wayfinder_core::{
    DomEventKind, DomHost, ElementId, HostEvent, KeyCode, ListenTarget, ListenerHandle, Point,
    Rect, Size,
};

#[derive(Debug, Clone)]
struct Element {
    id: ElementId,
    selector: String,
    rect: Rect,
}

#[derive(Debug)]
struct DomState {
    next_element: u64,
    next_listener: u64,
    elements: Vec<Element>,
    listeners: BTreeMap<u64, (ListenTarget, DomEventKind)>,
    viewport: Size,
    document_height: f64,
    scroll: Point,
}

/// Headless document with mutable geometry and listener bookkeeping.
#[derive(Debug)]
pub struct VirtualDom {
    state: RefCell<DomState>,
}

impl Default for VirtualDom {
    fn default() -> Self {
        Self::new(Size::new(1280.0, 800.0))
    }
}

impl VirtualDom {
    /// Empty document with the given window size; document height starts
    /// equal to the window height.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            state: RefCell::new(DomState {
                next_element: 1,
                next_listener: 1,
                elements: Vec::new(),
                listeners: BTreeMap::new(),
                viewport,
                document_height: viewport.height,
                scroll: Point::ZERO,
            }),
        }
    }

    /// Mount an element matching `selector` at `rect`.
    pub fn insert(&self, selector: impl Into<String>, rect: Rect) -> ElementId {
        let mut state = self.state.borrow_mut();
        let id = ElementId(state.next_element);
        state.next_element += 1;
        state.elements.push(Element {
            id,
            selector: selector.into(),
            rect,
        });
        id
    }

    /// Unmount an element. Listeners bound to it are dropped with it.
    pub fn remove(&self, id: ElementId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.elements.len();
        state.elements.retain(|el| el.id != id);
        let removed = state.elements.len() != before;
        if removed {
            state
                .listeners
                .retain(|_, (target, _)| *target != ListenTarget::Element(id));
        }
        removed
    }

    /// Move or resize a mounted element.
    pub fn set_rect(&self, id: ElementId, rect: Rect) -> bool {
        let mut state = self.state.borrow_mut();
        match state.elements.iter_mut().find(|el| el.id == id) {
            Some(el) => {
                el.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Resize the window. The document is never shorter than the window.
    pub fn set_viewport(&self, size: Size) {
        let mut state = self.state.borrow_mut();
        state.viewport = size;
        state.document_height = state.document_height.max(size.height);
    }

    /// Set the full document height.
    pub fn set_document_height(&self, height: f64) {
        self.state.borrow_mut().document_height = height;
    }

    /// Scroll the window.
    pub fn set_scroll(&self, offset: Point) {
        self.state.borrow_mut().scroll = offset;
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Whether any listener of `kind` is bound on `target`.
    #[must_use]
    pub fn has_listener(&self, target: ListenTarget, kind: DomEventKind) -> bool {
        self.state
            .borrow()
            .listeners
            .values()
            .any(|&(t, k)| t == target && k == kind)
    }

    /// Build the event the host would deliver, or `None` when nothing listens.
    #[must_use]
    pub fn fire(&self, target: ListenTarget, kind: DomEventKind) -> Option<HostEvent> {
        self.has_listener(target, kind).then_some(HostEvent {
            target,
            kind,
            key: None,
        })
    }

    /// Build a window keydown event, or `None` when nothing listens.
    #[must_use]
    pub fn fire_key(&self, key: KeyCode) -> Option<HostEvent> {
        self.has_listener(ListenTarget::Window, DomEventKind::KeyDown)
            .then_some(HostEvent::key(key))
    }
}

impl DomHost for VirtualDom {
    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        self.state
            .borrow()
            .elements
            .iter()
            .find(|el| el.selector == selector)
            .map(|el| el.id)
    }

    fn client_rect(&self, element: ElementId) -> Option<Rect> {
        self.state
            .borrow()
            .elements
            .iter()
            .find(|el| el.id == element)
            .map(|el| el.rect)
    }

    fn viewport_size(&self) -> Size {
        self.state.borrow().viewport
    }

    fn document_height(&self) -> f64 {
        self.state.borrow().document_height
    }

    fn scroll_offset(&self) -> Point {
        self.state.borrow().scroll
    }

    fn add_listener(&self, target: ListenTarget, kind: DomEventKind) -> ListenerHandle {
        let mut state = self.state.borrow_mut();
        let handle = state.next_listener;
        state.next_listener += 1;
        state.listeners.insert(handle, (target, kind));
        tracing::trace!(
            target: "wayfinder.listeners",
            handle,
            event = kind.as_str(),
            "virtual listener added"
        );
        ListenerHandle(handle)
    }

    fn remove_listener(&self, handle: ListenerHandle) {
        self.state.borrow_mut().listeners.remove(&handle.0);
    }
}
