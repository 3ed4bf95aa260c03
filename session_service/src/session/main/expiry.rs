use serde_json::Value;

use crate::keystore::KeyStore;
use crate::session::types::EXPIRES_KEY;

/// Checks the expiry mark against `now` (unix seconds).
///
/// A missing mark is initialized first. A mark not yet reached slides forward
/// to `now + max_lifetime`. A mark that is not an integer counts as expired.
pub(super) fn is_expired(store: &mut KeyStore, max_lifetime: u64, now: i64) -> bool {
    let renewed = now.saturating_add(i64::try_from(max_lifetime).unwrap_or(i64::MAX));

    if !store.has(EXPIRES_KEY) {
        store.set(EXPIRES_KEY, Value::from(renewed));
    }

    match store.get(EXPIRES_KEY).and_then(Value::as_i64) {
        Some(mark) if mark > now => {
            store.set(EXPIRES_KEY, Value::from(renewed));
            false
        }
        _ => true,
    }
}
