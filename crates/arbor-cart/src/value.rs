use std::fmt;

/// A single cell of a training or prediction row.
///
/// Integers and floats both map to [`Value::Number`]; anything else is a
/// [`Value::Category`]. The variant decides how a split on the value behaves,
/// see [`SplitKind::for_value`](crate::SplitKind::for_value).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A numeric cell, split by threshold comparison.
    Number(f64),
    /// A categorical cell, split by equality.
    Category(String),
}

/// Feature values followed by the class label in the last position.
pub type Row = Vec<Value>;

impl Value {
    /// Return the numeric payload, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            Value::Category(_) => None,
        }
    }

    /// Return the categorical payload, if this is a category.
    #[must_use]
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::Category(s) => Some(s),
        }
    }

    /// Return `true` if this is a number.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(x) => write!(f, "{x}"),
            Value::Category(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Value::Number(f64::from(x))
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Number(x as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Category(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Category(s)
    }
}
