use serde_json::Value;

use crate::keystore::KeyStore;
use crate::session::types::{FLASH_NEW_KEY, FLASH_OLD_KEY, FLASH_ONCE_KEY};

/// String entries of the list stored at `path`. Anything else reads as empty.
pub(super) fn key_list(store: &KeyStore, path: &str) -> Vec<String> {
    match store.get(path) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn set_key_list(store: &mut KeyStore, path: &str, keys: &[String]) {
    let items = keys.iter().cloned().map(Value::String).collect();
    store.set(path, Value::Array(items));
}

/// Registers `key` as flashed in this cycle. Flashing it again restarts its lifetime.
pub(super) fn record_flash(store: &mut KeyStore, key: &str) {
    let mut new_keys = key_list(store, FLASH_NEW_KEY);
    if !new_keys.iter().any(|k| k == key) {
        new_keys.push(key.to_string());
    }
    set_key_list(store, FLASH_NEW_KEY, &new_keys);

    let old_keys: Vec<String> = key_list(store, FLASH_OLD_KEY)
        .into_iter()
        .filter(|k| k != key)
        .collect();
    set_key_list(store, FLASH_OLD_KEY, &old_keys);
}

/// End of cycle bookkeeping, run by save before the payload is flushed.
pub(super) fn reconcile(store: &mut KeyStore, now_keys: &mut Vec<String>, once_keys: &[String]) {
    set_key_list(store, FLASH_ONCE_KEY, once_keys);

    for key in now_keys.drain(..) {
        store.delete(&key);
    }

    let old_keys = key_list(store, FLASH_OLD_KEY);
    for key in &old_keys {
        store.delete(key);
    }

    let new_keys = key_list(store, FLASH_NEW_KEY);
    set_key_list(store, FLASH_OLD_KEY, &new_keys);
    set_key_list(store, FLASH_NEW_KEY, &[]);

    tracing::debug!(
        purged = old_keys.len(),
        promoted = new_keys.len(),
        once = once_keys.len(),
        "Flash data reconciled"
    );
}
