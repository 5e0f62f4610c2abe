//! Primary key representation.

use serde_json::Value;
use std::fmt;

/// A primary key: an integer or a string.
///
/// Keys are totally ordered — integers numerically, strings
/// lexicographically, and every integer sorts before every string. Store
/// iteration (`get_all`) follows this order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// An integer key.
    Int(i64),
    /// A string key.
    Text(String),
}

impl Key {
    /// Converts a JSON value into a key, if it has a supported type.
    ///
    /// Integers and strings are accepted; floats, booleans, nulls, arrays
    /// and objects are not usable as keys.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Key::Int),
            Value::String(s) => Some(Key::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{n}"),
            Key::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Int(i64::from(n))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Text(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_accepts_integers_and_strings() {
        assert_eq!(Key::from_value(&json!(7)), Some(Key::Int(7)));
        assert_eq!(
            Key::from_value(&json!("note1")),
            Some(Key::Text("note1".to_string()))
        );
    }

    #[test]
    fn from_value_rejects_other_types() {
        assert_eq!(Key::from_value(&json!(1.5)), None);
        assert_eq!(Key::from_value(&json!(true)), None);
        assert_eq!(Key::from_value(&json!(null)), None);
        assert_eq!(Key::from_value(&json!([1, 2])), None);
    }

    #[test]
    fn integers_sort_before_strings() {
        assert!(Key::Int(i64::MAX) < Key::Text("a".to_string()));
        assert!(Key::Int(1) < Key::Int(2));
        assert!(Key::Text("a".to_string()) < Key::Text("b".to_string()));
    }

    #[test]
    fn display() {
        assert_eq!(Key::Int(42).to_string(), "42");
        assert_eq!(Key::Text("x".to_string()).to_string(), "\"x\"");
    }
}
