//! Value coercion: everything the store holds is a string.
//!
//! `set` accepts any JSON value and the load path accepts files whose values
//! are arbitrary JSON, but both funnel through [`coerce`] so that memory and
//! disk always agree on a flat string→string shape.

use serde_json::Value;

/// Convert an arbitrary JSON value to the string the store keeps.
///
/// Strings pass through unquoted; everything else becomes its compact JSON
/// text (`42`, `true`, `null`, `[1,2]`, `{"a":1}`).
pub fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
