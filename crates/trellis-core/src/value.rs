//! Dynamic value type for widget options, arguments, state and payloads.
//!
//! Widget definitions exchange loosely typed data: default options merged
//! across an extension chain, per-element attribute overrides, operation
//! arguments and event payloads. [`Value`] is the single currency for all
//! of these.

use std::fmt;

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A string.
    Str(String),
    /// An ordered list of values.
    List(Vec<Value>),
}

impl Value {
    /// Parse a declaration-attribute string into a value.
    ///
    /// `"true"`/`"false"` become [`Value::Bool`], integer strings become
    /// [`Value::Int`], everything else stays a [`Value::Str`].
    pub fn parse_attr(raw: &str) -> Value {
        match raw.trim() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            trimmed => match trimmed.parse::<i64>() {
                Ok(n) => Value::Int(n),
                Err(_) => Value::Str(trimmed.to_string()),
            },
        }
    }

    /// Build a list value from a set of indices.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Value {
        Value::List(indices.into_iter().map(|i| Value::Int(i as i64)).collect())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Interpret this value as a non-negative index.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Value::Int(n) if *n >= 0 => Some(*n as usize),
            _ => None,
        }
    }

    /// Interpret this value as a list of indices.
    pub fn indices(&self) -> Option<Vec<usize>> {
        self.as_list()
            .map(|items| items.iter().filter_map(Value::as_index).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render this value as a declaration-attribute string.
    ///
    /// Lists are space separated, matching the whitespace-separated list
    /// convention of the declaration attributes.
    pub fn to_attr(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Str(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::to_attr)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_attr())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attr_bool() {
        assert_eq!(Value::parse_attr("true"), Value::Bool(true));
        assert_eq!(Value::parse_attr("false"), Value::Bool(false));
    }

    #[test]
    fn test_parse_attr_int() {
        assert_eq!(Value::parse_attr("42"), Value::Int(42));
        assert_eq!(Value::parse_attr("-3"), Value::Int(-3));
    }

    #[test]
    fn test_parse_attr_str() {
        assert_eq!(
            Value::parse_attr("horizontal"),
            Value::Str("horizontal".to_string())
        );
        // Whitespace is trimmed before classification
        assert_eq!(Value::parse_attr(" 7 "), Value::Int(7));
    }

    #[test]
    fn test_indices_roundtrip() {
        let v = Value::from_indices([0, 2, 5]);
        assert_eq!(v.indices(), Some(vec![0, 2, 5]));
    }

    #[test]
    fn test_as_index_rejects_negative() {
        assert_eq!(Value::Int(-1).as_index(), None);
        assert_eq!(Value::Int(3).as_index(), Some(3));
    }

    #[test]
    fn test_to_attr() {
        assert_eq!(Value::Bool(true).to_attr(), "true");
        assert_eq!(Value::from_indices([1, 3]).to_attr(), "1 3");
        assert_eq!(Value::Null.to_attr(), "");
    }
}
