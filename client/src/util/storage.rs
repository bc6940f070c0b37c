//! Key-value storage capability backing the persisted session.
//!
//! SYSTEM CONTEXT
//! ==============
//! The login flow and the session observer both go through
//! [`SessionStorage`] instead of reaching for `window.localStorage`, so the
//! observer can be driven by [`MemoryStorage`] in tests and during SSR.
//!
//! TRADE-OFFS
//! ==========
//! Browser storage writes can fail (quota, private mode). Writes are
//! best-effort: failures are logged and otherwise ignored, mirroring how the
//! rest of the client treats `localStorage`.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// String key-value store with `localStorage` semantics.
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

impl<T: SessionStorage + ?Sized> SessionStorage for Rc<T> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) {
        (**self).set_item(key, value);
    }

    fn remove_item(&self, key: &str) {
        (**self).remove_item(key);
    }
}

/// In-memory store. Shared by cloning an `Rc` around it.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// `window.localStorage`.
#[cfg(feature = "hydrate")]
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

#[cfg(feature = "hydrate")]
impl BrowserStorage {
    /// Returns `None` outside a window context or when storage is disabled.
    pub fn local() -> Option<Self> {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
        Some(Self { storage })
    }
}

#[cfg(feature = "hydrate")]
impl SessionStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) {
        if self.storage.set_item(key, value).is_err() {
            log::warn!("localStorage write failed for {key}");
        }
    }

    fn remove_item(&self, key: &str) {
        if self.storage.remove_item(key).is_err() {
            log::warn!("localStorage remove failed for {key}");
        }
    }
}
