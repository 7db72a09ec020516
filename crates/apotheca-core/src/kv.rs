//! # Key-Value Storage Capability
//!
//! The storefront keeps small per-user state (checkout form drafts) in
//! browser-local storage. That storage is modeled here as an injected
//! capability rather than a runtime global, so the logic runs unchanged
//! against the real store or an in-memory fake.

use std::collections::HashMap;

use crate::types::OrderFormState;

/// Injected string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

// =============================================================================
// Form Drafts
// =============================================================================

fn draft_key(user_id: &str) -> String {
    format!("checkout-draft:{user_id}")
}

/// Saves the checkout form under a per-user key.
///
/// A form that cannot serialize is silently not saved; drafts are a
/// convenience, never load-bearing.
pub fn save_form_draft(store: &mut dyn KeyValueStore, user_id: &str, form: &OrderFormState) {
    if let Ok(json) = serde_json::to_string(form) {
        store.set(&draft_key(user_id), &json);
    }
}

/// Loads a previously saved draft.
///
/// A missing or corrupt draft loads as `None`, never an error.
pub fn load_form_draft(store: &dyn KeyValueStore, user_id: &str) -> Option<OrderFormState> {
    let json = store.get(&draft_key(user_id))?;
    serde_json::from_str(&json).ok()
}

/// Discards a saved draft (called after successful order submission).
pub fn clear_form_draft(store: &mut dyn KeyValueStore, user_id: &str) {
    store.remove(&draft_key(user_id));
}

// =============================================================================
// Unit Tests
// =============================================================================
