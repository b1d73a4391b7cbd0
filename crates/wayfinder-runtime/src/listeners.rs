#![forbid(unsafe_code)]

//! Keyed listener registry with symmetric teardown.
//!
//! Every listener the controller binds goes through [`ListenerRegistry::bind`]
//! under a string key (`"resize"`, `"keyboard"`, `"trigger:3:click"`). Removal
//! uses the handle recorded at bind time, so teardown is exact: every add has
//! exactly one matching remove. Dropping the registry unbinds whatever is
//! left.

use std::rc::Rc;

use ahash::AHashMap;
use wayfinder_core::{DomEventKind, DomHost, ListenTarget, ListenerHandle};

/// One bound listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerRecord {
    pub target: ListenTarget,
    pub kind: DomEventKind,
    pub handle: ListenerHandle,
}

/// Owned `key → listener` map over a shared host.
pub struct ListenerRegistry<H: DomHost> {
    host: Rc<H>,
    records: AHashMap<String, ListenerRecord>,
}

impl<H: DomHost> std::fmt::Debug for ListenerRegistry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("records", &self.records)
            .finish()
    }
}

impl<H: DomHost> ListenerRegistry<H> {
    #[must_use]
    pub fn new(host: Rc<H>) -> Self {
        Self {
            host,
            records: AHashMap::new(),
        }
    }

    /// Bind `kind` on `target` under `key`, replacing any listener already
    /// bound under that key.
    pub fn bind(
        &mut self,
        key: impl Into<String>,
        target: ListenTarget,
        kind: DomEventKind,
    ) -> ListenerHandle {
        let key = key.into();
        if let Some(old) = self.records.remove(&key) {
            self.host.remove_listener(old.handle);
        }
        let handle = self.host.add_listener(target, kind);
        tracing::trace!(
            target: "wayfinder.listeners",
            key = %key,
            event = kind.as_str(),
            handle = handle.0,
            "bind"
        );
        self.records.insert(
            key,
            ListenerRecord {
                target,
                kind,
                handle,
            },
        );
        handle
    }

    /// Unbind the listener under `key`.
    pub fn unbind(&mut self, key: &str) -> bool {
        match self.records.remove(key) {
            Some(record) => {
                self.host.remove_listener(record.handle);
                tracing::trace!(target: "wayfinder.listeners", key, "unbind");
                true
            }
            None => false,
        }
    }

    /// Unbind every listener whose key starts with `prefix`.
    pub fn unbind_prefix(&mut self, prefix: &str) -> usize {
        let keys: Vec<String> = self
            .records
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        for key in &keys {
            self.unbind(key);
        }
        keys.len()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Whether some bound listener would receive `kind` on `target`.
    #[must_use]
    pub fn is_listening(&self, target: ListenTarget, kind: DomEventKind) -> bool {
        self.records
            .values()
            .any(|r| r.target == target && r.kind == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Unbind everything. Idempotent; returns how many listeners were removed.
    pub fn teardown(&mut self) -> usize {
        let count = self.records.len();
        for (key, record) in self.records.drain() {
            self.host.remove_listener(record.handle);
            tracing::trace!(target: "wayfinder.listeners", key = %key, "unbind");
        }
        count
    }
}

impl<H: DomHost> Drop for ListenerRegistry<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
