//! Homogeneous, dense, typed sequence.
//!
//! Writes coerce to the element type. Indices are contiguous from zero: a
//! write at `length` appends, a write past it is a range error.

use std::cell::RefCell;
use std::rc::Rc;

use crate::runner::ds::error::ErrorType;
use crate::runner::ds::operations::type_conversion::{to_int_32, to_number, to_string, to_uint_32};
use crate::runner::ds::value::Value;

pub type VectorRef = Rc<RefCell<VectorObject>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Number,
    Int,
    Uint,
    String,
    Any,
}
impl ElementType {
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementType::Number => "Number",
            ElementType::Int => "int",
            ElementType::Uint => "uint",
            ElementType::String => "String",
            ElementType::Any => "*",
        }
    }

    pub fn default_value(&self) -> Value {
        match self {
            ElementType::Number | ElementType::Int | ElementType::Uint => Value::Number(0.0),
            ElementType::String | ElementType::Any => Value::Null,
        }
    }

    pub fn coerce(&self, v: Value) -> Value {
        match self {
            ElementType::Number => Value::Number(to_number(&v)),
            ElementType::Int => Value::Number(to_int_32(&v) as f64),
            ElementType::Uint => Value::Number(to_uint_32(&v) as f64),
            ElementType::String => {
                if v.is_nullish() {
                    Value::Null
                } else {
                    Value::String(to_string(&v))
                }
            }
            ElementType::Any => v,
        }
    }
}

pub struct VectorObject {
    element_type: ElementType,
    items: Vec<Value>,
    fixed: bool,
}
impl VectorObject {
    pub fn new(element_type: ElementType) -> Self {
        VectorObject {
            element_type,
            items: Vec::new(),
            fixed: false,
        }
    }

    pub fn with_length(element_type: ElementType, length: usize, fixed: bool) -> Self {
        VectorObject {
            element_type,
            items: vec![element_type.default_value(); length],
            fixed,
        }
    }

    pub fn new_ref(element_type: ElementType) -> VectorRef {
        Rc::new(RefCell::new(VectorObject::new(element_type)))
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Result<Value, ErrorType> {
        self.items.get(index).cloned().ok_or_else(|| {
            ErrorType::RangeError(format!(
                "Index {} is out of range {}",
                index,
                self.items.len()
            ))
        })
    }

    /// Overwrites below `length`, appends at `length`.
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), ErrorType> {
        let len = self.items.len();
        let value = self.element_type.coerce(value);
        if index < len {
            self.items[index] = value;
            Ok(())
        } else if index == len {
            self.check_growable()?;
            self.items.push(value);
            tracing::debug!(length = len + 1, "vector grew by index write");
            Ok(())
        } else {
            Err(ErrorType::RangeError(format!(
                "Index {} is out of range {}",
                index, len
            )))
        }
    }

    pub fn push(&mut self, values: Vec<Value>) -> Result<usize, ErrorType> {
        if !values.is_empty() {
            self.check_growable()?;
        }
        for v in values {
            let v = self.element_type.coerce(v);
            self.items.push(v);
        }
        Ok(self.items.len())
    }

    pub fn pop(&mut self) -> Result<Value, ErrorType> {
        self.check_growable()?;
        Ok(self
            .items
            .pop()
            .unwrap_or_else(|| self.element_type.default_value()))
    }

    pub fn shift(&mut self) -> Result<Value, ErrorType> {
        self.check_growable()?;
        if self.items.is_empty() {
            Ok(self.element_type.default_value())
        } else {
            Ok(self.items.remove(0))
        }
    }

    pub fn unshift(&mut self, values: Vec<Value>) -> Result<usize, ErrorType> {
        if !values.is_empty() {
            self.check_growable()?;
        }
        let coerced: Vec<Value> = values
            .into_iter()
            .map(|v| self.element_type.coerce(v))
            .collect();
        self.items.splice(0..0, coerced);
        Ok(self.items.len())
    }

    /// Truncates, or extends with the element type's default.
    pub fn set_length(&mut self, length: usize) -> Result<(), ErrorType> {
        if length != self.items.len() {
            self.check_growable()?;
        }
        let default = self.element_type.default_value();
        self.items.resize(length, default);
        Ok(())
    }

    pub fn index_of(&self, search: &Value, from: usize) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, v)| *v == search)
            .map(|(i, _)| i)
    }

    pub fn reverse(&mut self) {
        self.items.reverse();
    }

    pub fn join(&self, separator: &str) -> String {
        self.items
            .iter()
            .map(|v| if v.is_nullish() { String::new() } else { to_string(v) })
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn check_growable(&self) -> Result<(), ErrorType> {
        if self.fixed {
            Err(ErrorType::RangeError(
                "Cannot change the length of a fixed Vector".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}
