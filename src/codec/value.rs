// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

/// A decoded struct field.
///
/// Serialized untagged, so a record maps onto plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Pad bytes carry no value
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let value = Value::List(vec![Value::Int(1), Value::Null, Value::Text("ab".into())]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"[1,null,"ab"]"#);

        let parsed: Value = serde_json::from_str(r#"[1, 2.5, true, "x", null]"#).unwrap();
        assert_eq!(
            parsed,
            Value::List(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::Bool(true),
                Value::Text("x".into()),
                Value::Null,
            ])
        );
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(vec![1i64, 2]), Value::List(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(Value::Bool(true).as_i64(), Some(1));
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Int(0).as_bool(), Some(false));
        assert_eq!(Value::Text("a".into()).as_i64(), None);
    }

    #[test]
    fn test_display() {
        let value = Value::List(vec![Value::Int(-1), Value::Text("hi".into())]);
        assert_eq!(value.to_string(), r#"[-1, "hi"]"#);
    }
}
