//! Parameter Map
//!
//! Scalar key/value sets used both as outgoing request bodies and as the
//! signed subset of a response. The canonical query string is the HMAC input:
//!
//! ```text
//! key1=value1&key2=value2   (keys sorted by codepoint, values unescaped)
//! ```

use crate::error::GatewayError;
use crate::Result;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Ordered map of request or response fields.
///
/// Serializes as a plain JSON object, which is what goes on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterMap(BTreeMap<String, Value>);

impl ParameterMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert a field, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Wire form: an ordinary JSON object, not the canonical string
    pub fn to_json(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    /// Pick `fields` out of a JSON object. Absent fields are kept as `null`
    /// so they still take part in the canonical string.
    pub fn from_fields(body: &Map<String, Value>, fields: &[&str]) -> Self {
        fields
            .iter()
            .map(|field| {
                let value = body.get(*field).cloned().unwrap_or(Value::Null);
                (field.to_string(), value)
            })
            .collect()
    }

    /// Sorted `key=value` pairs joined by `&`
    pub fn canonical_query_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", k, canonical_value(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Reject values the canonical form cannot represent unambiguously.
    ///
    /// The gateway does not escape values, so an `&` or `=` inside a signed
    /// value would shift the boundary between fields.
    pub fn ensure_unambiguous(&self) -> Result<()> {
        for (key, value) in &self.0 {
            if key.contains('&') || key.contains('=') {
                return Err(GatewayError::InvalidParameter {
                    key: key.clone(),
                    reason: "key must not contain '&' or '='".to_string(),
                });
            }
            let rendered = canonical_value(value);
            if rendered.contains('&') || rendered.contains('=') {
                return Err(GatewayError::InvalidParameter {
                    key: key.clone(),
                    reason: "value must not contain '&' or '='".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<(String, Value)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Map<String, Value>> for ParameterMap {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

/// Render one value the way the gateway does when building its signature input
pub fn canonical_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => canonical_number(n),
        Value::String(s) => s.clone(),
        // Not expected in signed sets; rendered as compact JSON so they at
        // least hash deterministically.
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn canonical_number(n: &Number) -> String {
    if let Some(u) = n.as_u64() {
        u.to_string()
    } else if let Some(i) = n.as_i64() {
        i.to_string()
    } else {
        n.as_f64().map(canonical_float).unwrap_or_default()
    }
}

/// Shortest round-trip digits, with the gateway's switch to exponent form
/// outside `[1e-6, 1e21)`: `100.0` -> `100`, `1e21` -> `1e+21`, `1e-7` -> `1e-7`.
fn canonical_float(f: f64) -> String {
    let magnitude = f.abs();
    if magnitude >= 1e21 || (magnitude != 0.0 && magnitude < 1e-6) {
        let rendered = format!("{:e}", f);
        match rendered.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => rendered,
        }
    } else {
        f.to_string()
    }
}
