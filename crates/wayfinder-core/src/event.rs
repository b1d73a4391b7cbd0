#![forbid(unsafe_code)]

//! Canonical host input events.
//!
//! The host translates whatever its platform delivers (browser events, test
//! drivers) into [`HostEvent`] values and pushes them to the controller.

use crate::dom::{DomEventKind, ElementId, ListenTarget};

/// Keys the tour reacts to. Everything else collapses to [`KeyCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Tab,
    Space,
    Enter,
    Other,
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            " " | "Spacebar" => Self::Space,
            "Enter" => Self::Enter,
            _ => Self::Other,
        }
    }
}

/// A single input delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostEvent {
    /// Where the event was dispatched.
    pub target: ListenTarget,
    /// What happened.
    pub kind: DomEventKind,
    /// Key for [`DomEventKind::KeyDown`].
    pub key: Option<KeyCode>,
}

impl HostEvent {
    /// Click on an element.
    #[must_use]
    pub const fn click(element: ElementId) -> Self {
        Self {
            target: ListenTarget::Element(element),
            kind: DomEventKind::Click,
            key: None,
        }
    }

    /// Pointer entered an element.
    #[must_use]
    pub const fn mouse_enter(element: ElementId) -> Self {
        Self {
            target: ListenTarget::Element(element),
            kind: DomEventKind::MouseEnter,
            key: None,
        }
    }

    /// Pointer left an element.
    #[must_use]
    pub const fn mouse_leave(element: ElementId) -> Self {
        Self {
            target: ListenTarget::Element(element),
            kind: DomEventKind::MouseLeave,
            key: None,
        }
    }

    /// Window key press.
    #[must_use]
    pub const fn key(key: KeyCode) -> Self {
        Self {
            target: ListenTarget::Window,
            kind: DomEventKind::KeyDown,
            key: Some(key),
        }
    }

    /// Window resize.
    #[must_use]
    pub const fn resize() -> Self {
        Self {
            target: ListenTarget::Window,
            kind: DomEventKind::Resize,
            key: None,
        }
    }

    /// First touch on the window.
    #[must_use]
    pub const fn touch_start() -> Self {
        Self {
            target: ListenTarget::Window,
            kind: DomEventKind::TouchStart,
            key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_key_mapping() {
        assert_eq!(KeyCode::from_dom_key("Escape"), KeyCode::Escape);
        assert_eq!(KeyCode::from_dom_key("Esc"), KeyCode::Escape);
        assert_eq!(KeyCode::from_dom_key(" "), KeyCode::Space);
        assert_eq!(KeyCode::from_dom_key("Tab"), KeyCode::Tab);
        assert_eq!(KeyCode::from_dom_key("a"), KeyCode::Other);
    }

    #[test]
    fn constructors_target_expected_surfaces() {
        let e = HostEvent::click(ElementId(3));
        assert_eq!(e.target, ListenTarget::Element(ElementId(3)));
        assert_eq!(e.kind, DomEventKind::Click);
        let k = HostEvent::key(KeyCode::Enter);
        assert_eq!(k.target, ListenTarget::Window);
        assert_eq!(k.key, Some(KeyCode::Enter));
    }
}
