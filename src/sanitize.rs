// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTML escaping for record store values that are rendered directly.

use serde_json::Value;
use std::borrow::Cow;

/// Escape `& < > " ' \`` in a single pass.
///
/// Borrows the input when there is nothing to escape.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(&['&', '<', '>', '"', '\'', '`'][..]) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '`' => out.push_str("&#x60;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Escape every string inside `value`, recursing through arrays and objects.
///
/// Object keys are left alone; numbers, booleans and nulls pass through.
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => match escape_html(&s) {
            Cow::Borrowed(_) => Value::String(s),
            Cow::Owned(escaped) => Value::String(escaped),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, sanitize_value(v)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string_is_untouched() {
        let s = "just a devlog about my game";
        assert!(matches!(escape_html(s), Cow::Borrowed(_)));
        assert_eq!(escape_html(&escape_html(s)), s);
    }

    #[test]
    fn test_escapes_full_set() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'`</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&#x60;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_single_pass_does_not_double_escape() {
        // `&` is replaced once, the `;` introduced by `&lt;` is not revisited
        assert_eq!(escape_html("<&"), "&lt;&amp;");
    }

    #[test]
    fn test_nested_values() {
        let input = json!({
            "description": "<script>",
            "tags": ["a&b", {"deep": "'q'"}],
            "likes": 3,
            "published": true,
            "extra": null
        });

        let out = sanitize_value(input);

        assert_eq!(
            out,
            json!({
                "description": "&lt;script&gt;",
                "tags": ["a&amp;b", {"deep": "&#x27;q&#x27;"}],
                "likes": 3,
                "published": true,
                "extra": null
            })
        );
    }
}
