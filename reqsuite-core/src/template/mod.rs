use std::collections::BTreeMap;

use crate::error::TemplateError;

/// The environment the placeholder resolver is bound to: a flat mapping from
/// identifier to string value, provided by the loader.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Environment {
    values: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Substitutes non-overlapping `{{identifier}}` tokens with environment
/// values. Single braces are literal; this avoids swallowing JSON objects in
/// templated payload strings. Resolution is fail-fast: an unbound identifier
/// is an error, not a literal pass-through.
pub fn resolve_string(input: &str, env: &Environment) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '{' || chars.peek() != Some(&'{') {
            out.push(ch);
            continue;
        }
        chars.next();

        // Find the matching `}}` (no nesting support).
        let mut inner = String::new();
        let mut closed = false;
        while let Some(c) = chars.next() {
            if c == '}' && chars.peek() == Some(&'}') {
                chars.next();
                closed = true;
                break;
            }
            inner.push(c);
        }
        if !closed {
            return Err(TemplateError::UnclosedPlaceholder);
        }

        let name = inner.trim();
        match env.get(name) {
            Some(value) => out.push_str(value),
            None => return Err(TemplateError::UnresolvedPlaceholder(name.to_string())),
        }
    }

    Ok(out)
}

/// Recursively resolves placeholders in every string leaf of a JSON value.
/// Used for `json` body content and GraphQL variables.
pub fn resolve_value(
    value: &serde_json::Value,
    env: &Environment,
) -> Result<serde_json::Value, TemplateError> {
    use serde_json::Value;

    Ok(match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
        Value::String(s) => Value::String(resolve_string(s, env)?),
        Value::Array(arr) => Value::Array(
            arr.iter()
                .map(|v| resolve_value(v, env))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), resolve_value(v, env)?);
            }
            Value::Object(out)
        }
    })
}
