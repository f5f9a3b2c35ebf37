//! Recursive merge of JSON documents.

use serde_json::Value;

/// Merge `patch` into `base`.
///
/// Objects merge key by key; every other value, arrays included, replaces
/// the existing one wholesale.
pub fn deep_merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}
