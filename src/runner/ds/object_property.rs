use std::fmt;
use std::fmt::{Display, Formatter};

use crate::runner::ds::operations::type_conversion::{
    canonical_numeric_index_string, number_to_string,
};
use crate::runner::ds::value::Value;

lazy_static! {
    pub static ref LENGTH_PROP: PropertyKey = PropertyKey::Str("length".to_string());
}

/// Local part of a property reference: a name, or a numeric index for
/// indexed receivers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Str(String),
    Int(usize),
}
impl PropertyKey {
    /// Index view of this key. Canonical numeric strings count as indices.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PropertyKey::Int(i) => Some(*i),
            PropertyKey::Str(s) => canonical_numeric_index_string(s),
        }
    }

    /// True when the key looks like a number but is not a valid index, e.g.
    /// `-1` or `1.5`.
    pub fn is_invalid_numeric(&self) -> bool {
        match self {
            PropertyKey::Int(_) => false,
            PropertyKey::Str(s) => {
                canonical_numeric_index_string(s).is_none() && s.trim().parse::<f64>().is_ok()
            }
        }
    }

    pub fn local_name(&self) -> String {
        match self {
            PropertyKey::Str(s) => s.clone(),
            PropertyKey::Int(i) => i.to_string(),
        }
    }

    pub fn from_value(v: &Value) -> Self {
        match v {
            Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && n.is_finite() => {
                PropertyKey::Int(*n as usize)
            }
            Value::Number(n) => PropertyKey::Str(number_to_string(*n)),
            Value::String(s) => PropertyKey::Str(s.clone()),
            other => PropertyKey::Str(crate::runner::ds::operations::type_conversion::to_string(other)),
        }
    }
}
impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::Str(s.to_string())
    }
}
impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey::Str(s)
    }
}
impl From<usize> for PropertyKey {
    fn from(i: usize) -> Self {
        PropertyKey::Int(i)
    }
}
impl From<i32> for PropertyKey {
    fn from(i: i32) -> Self {
        if i >= 0 {
            PropertyKey::Int(i as usize)
        } else {
            PropertyKey::Str(i.to_string())
        }
    }
}
impl Display for PropertyKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Str(s) => write!(f, "{}", s),
            PropertyKey::Int(i) => write!(f, "{}", i),
        }
    }
}
