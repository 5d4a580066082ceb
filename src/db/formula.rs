// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Structured record filters.
//!
//! Filters are built from typed parts and only turned into the store's formula
//! language at the edge, with every value rendered as an escaped string
//! literal. Callers never splice user input into formula text.

use serde_json::{Map, Value};

/// A record filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    /// `{field} = "value"`
    Eq { field: String, value: String },
    /// `LOWER({field}) = "value"`, value is lowercased on construction
    EqIgnoreCase { field: String, value: String },
    /// `{field} = 1`
    IsTrue { field: String },
    And(Vec<Formula>),
}

impl Formula {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Formula::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn eq_ignore_case(field: impl Into<String>, value: impl AsRef<str>) -> Self {
        Formula::EqIgnoreCase {
            field: field.into(),
            value: value.as_ref().to_lowercase(),
        }
    }

    pub fn is_true(field: impl Into<String>) -> Self {
        Formula::IsTrue {
            field: field.into(),
        }
    }

    /// Render as an Airtable `filterByFormula` expression.
    pub fn to_airtable(&self) -> String {
        match self {
            Formula::Eq { field, value } => {
                format!("{} = {}", field_ref(field), string_literal(value))
            }
            Formula::EqIgnoreCase { field, value } => {
                format!("LOWER({}) = {}", field_ref(field), string_literal(value))
            }
            Formula::IsTrue { field } => format!("{} = 1", field_ref(field)),
            Formula::And(parts) => {
                let rendered: Vec<String> = parts.iter().map(Formula::to_airtable).collect();
                format!("AND({})", rendered.join(", "))
            }
        }
    }

    /// Evaluate against a record's fields, the way the store would.
    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        match self {
            Formula::Eq { field, value } => {
                fields.get(field).map(display_value).unwrap_or_default() == *value
            }
            Formula::EqIgnoreCase { field, value } => {
                fields
                    .get(field)
                    .map(display_value)
                    .unwrap_or_default()
                    .to_lowercase()
                    == *value
            }
            Formula::IsTrue { field } => match fields.get(field) {
                Some(Value::Bool(b)) => *b,
                Some(Value::Number(n)) => n.as_f64() == Some(1.0),
                _ => false,
            },
            Formula::And(parts) => parts.iter().all(|p| p.matches(fields)),
        }
    }
}

/// Field names may not contain `}`; strip it rather than fail.
fn field_ref(field: &str) -> String {
    format!("{{{}}}", field.replace('}', ""))
}

fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// String form of a field value as a formula comparison would see it.
/// Linked-record and lookup arrays compare as their comma-joined contents.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_renders_eq() {
        assert_eq!(
            Formula::eq("token", "abc123def456").to_airtable(),
            r#"{token} = "abc123def456""#
        );
    }

    #[test]
    fn test_injection_is_escaped() {
        let f = Formula::eq("name", r#"x" , TRUE()) & "\"#);
        assert_eq!(f.to_airtable(), r#"{name} = "x\" , TRUE()) & \"\\""#);
    }

    #[test]
    fn test_renders_compound() {
        let f = Formula::And(vec![
            Formula::is_true("isHacktendo"),
            Formula::eq_ignore_case("Email", "A@B.CO"),
        ]);
        assert_eq!(
            f.to_airtable(),
            r#"AND({isHacktendo} = 1, LOWER({Email}) = "a@b.co")"#
        );
    }

    #[test]
    fn test_matches() {
        let record = fields(json!({
            "token": "abc123def456",
            "Email": "Orpheus@HackClub.com",
            "isHacktendo": true
        }));

        assert!(Formula::eq("token", "abc123def456").matches(&record));
        assert!(!Formula::eq("token", "nope").matches(&record));
        assert!(Formula::eq_ignore_case("Email", "orpheus@hackclub.com").matches(&record));
        assert!(Formula::is_true("isHacktendo").matches(&record));
        assert!(!Formula::is_true("missing").matches(&record));
    }
}
