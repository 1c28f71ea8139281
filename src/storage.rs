//! Key-value persistence for UI preferences.

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Browser `localStorage`. Unavailable storage (private mode, quota) is
/// treated as empty and writes are dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        if cfg!(not(target_arch = "wasm32")) {
            return None;
        }
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(store) = Self::storage() {
            let _ = store.set_item(key, value);
        }
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: std::cell::RefCell<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with(items: &[(&str, &str)]) -> Self {
        let store = Self::default();
        for (k, v) in items {
            store.set(k, v);
        }
        store
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let s = MemoryStore::with(&[("a", "1")]);
        assert_eq!(s.get("a").as_deref(), Some("1"));
        s.set("a", "2");
        assert_eq!(s.get("a").as_deref(), Some("2"));
        assert_eq!(s.get("b"), None);
    }

    #[test]
    fn local_store_is_empty_off_browser() {
        let s = LocalStore;
        s.set("k", "v");
        assert_eq!(s.get("k"), None);
    }
}
