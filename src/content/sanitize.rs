//! Removal of executable markup from operator-entered text.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("Invalid regex")
});
// Unterminated or self-closing script tags left after block removal.
static SCRIPT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?script\b[^>]*>").expect("Invalid regex"));
static EVENT_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).expect("Invalid regex")
});

/// Strip `<script>` elements and inline `on*=` handler attributes.
fn sanitize_text(text: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(text, "");
    let text = SCRIPT_TAG.replace_all(&text, "");
    EVENT_HANDLER.replace_all(&text, "").into_owned()
}

/// Sanitize every string in a JSON document, in place.
pub fn sanitize_value(value: &mut Value) {
    match value {
        Value::String(s) => {
            let cleaned = sanitize_text(s);
            if cleaned != *s {
                tracing::warn!("Removed script content from submitted text");
                *s = cleaned;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(sanitize_value),
        Value::Object(map) => map.values_mut().for_each(sanitize_value),
        _ => {}
    }
}
