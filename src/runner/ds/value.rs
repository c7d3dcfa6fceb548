use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::runner::ds::class::ClassRef;
use crate::runner::ds::function::FunctionRef;
use crate::runner::ds::namespace::Namespace;
use crate::runner::ds::object::ObjectRef;
use crate::runner::ds::operations::type_conversion::{
    number_to_string, TYPE_STR_NULL, TYPE_STR_UNDEFINED,
};
use crate::runner::ds::vector::VectorRef;
use crate::runner::ds::xml::{XmlListRef, XmlRef};

#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Namespace(Namespace),
    Object(ObjectRef),
    Class(ClassRef),
    Function(FunctionRef),
    Xml(XmlRef),
    XmlList(XmlListRef),
    Vector(VectorRef),
}
impl Value {
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}
impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
impl From<Namespace> for Value {
    fn from(ns: Namespace) -> Self {
        Value::Namespace(ns)
    }
}
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "{}", TYPE_STR_UNDEFINED),
            Value::Null => write!(f, "{}", TYPE_STR_NULL),
            Value::Boolean(b) => write!(f, "bool({})", b),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Number(n) => write!(f, "{}", number_to_string(*n)),
            Value::Namespace(ns) => write!(f, "[Namespace {}]", ns),
            Value::Object(o) => write!(f, "[object {}]", o.borrow().class().name().local_name()),
            Value::Class(c) => write!(f, "[class {}]", c.name().local_name()),
            Value::Function(_) => write!(f, "function Function() {{}}"),
            Value::Xml(x) => write!(f, "{}", x.to_xml_string(false, 0)),
            Value::XmlList(l) => write!(f, "[XMLList length={}]", l.len()),
            Value::Vector(v) => write!(f, "[Vector length={}]", v.borrow().len()),
        }
    }
}
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Value::Undefined"),
            Value::Null => write!(f, "Value::Null"),
            Value::Boolean(b) => write!(f, "Value::Boolean({})", b),
            Value::String(s) => write!(f, "Value::String({:?})", s),
            Value::Number(n) => write!(f, "Value::Number({:?})", n),
            Value::Namespace(ns) => write!(f, "Value::Namespace({:?})", ns.uri()),
            Value::Object(_) => write!(f, "Value::Object(...)"),
            Value::Class(c) => write!(f, "Value::Class({})", c.name()),
            Value::Function(_) => write!(f, "Value::Function(...)"),
            Value::Xml(x) => write!(f, "Value::Xml({})", x.node_kind().as_str()),
            Value::XmlList(l) => write!(f, "Value::XmlList(len={})", l.len()),
            Value::Vector(v) => write!(f, "Value::Vector(len={})", v.borrow().len()),
        }
    }
}
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Namespace(a), Value::Namespace(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Xml(a), Value::Xml(b)) => a == b,
            (Value::XmlList(a), Value::XmlList(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
