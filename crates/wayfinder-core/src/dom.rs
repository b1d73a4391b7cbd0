#![forbid(unsafe_code)]

//! Host document abstraction.
//!
//! The tour never touches a real DOM. Selector queries, bounding boxes,
//! viewport metrics and listener binding all go through [`DomHost`]. Methods
//! take `&self`: hosts (browser bindings, the in-memory `VirtualDom`) keep
//! their own interior mutability and are shared between the controller and
//! its listener registry.

use crate::geometry::{Point, Rect, Size};

/// Opaque handle to a live element owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl core::fmt::Display for ElementId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "element:{}", self.0)
    }
}

/// Handle returned by [`DomHost::add_listener`]; removal is keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenTarget {
    /// The window / document.
    Window,
    /// A specific element.
    Element(ElementId),
}

/// Host event kinds the tour can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEventKind {
    Click,
    MouseEnter,
    MouseLeave,
    TouchStart,
    KeyDown,
    Resize,
}

impl DomEventKind {
    /// DOM event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::TouchStart => "touchstart",
            Self::KeyDown => "keydown",
            Self::Resize => "resize",
        }
    }
}

/// Query and listener capability the tour consumes from its host.
pub trait DomHost {
    /// First element matching `selector`, if any is mounted.
    fn query_selector(&self, selector: &str) -> Option<ElementId>;

    /// Viewport-relative bounding box of `element`, or `None` once it is gone.
    fn client_rect(&self, element: ElementId) -> Option<Rect>;

    /// Inner size of the window.
    fn viewport_size(&self) -> Size;

    /// Full scrollable document height.
    fn document_height(&self) -> f64;

    /// Current window scroll offset.
    fn scroll_offset(&self) -> Point;

    /// Attach a listener; the returned handle is the removal key.
    fn add_listener(&self, target: ListenTarget, kind: DomEventKind) -> ListenerHandle;

    /// Detach a listener previously returned by [`add_listener`](Self::add_listener).
    fn remove_listener(&self, handle: ListenerHandle);
}

impl<H: DomHost + ?Sized> DomHost for std::rc::Rc<H> {
    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        (**self).query_selector(selector)
    }

    fn client_rect(&self, element: ElementId) -> Option<Rect> {
        (**self).client_rect(element)
    }

    fn viewport_size(&self) -> Size {
        (**self).viewport_size()
    }

    fn document_height(&self) -> f64 {
        (**self).document_height()
    }

    fn scroll_offset(&self) -> Point {
        (**self).scroll_offset()
    }

    fn add_listener(&self, target: ListenTarget, kind: DomEventKind) -> ListenerHandle {
        (**self).add_listener(target, kind)
    }

    fn remove_listener(&self, handle: ListenerHandle) {
        (**self).remove_listener(handle);
    }
}
