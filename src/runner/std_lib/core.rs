//! Core built-ins registration.

use crate::runner::ds::error::ErrorType;
use crate::runner::ds::realm::Intrinsics;
use crate::runner::ds::value::Value;
use crate::runner::ds::vector::ElementType;

use super::namespace;
use super::string;
use super::vector;
use super::xml;
use super::xml_list;

/// Define every built-in class.
pub fn create_intrinsics() -> Result<Intrinsics, ErrorType> {
    Ok(Intrinsics {
        xml: xml::define()?,
        xml_list: xml_list::define()?,
        string: string::define()?,
        namespace: namespace::define()?,
        vector_number: vector::define(ElementType::Number)?,
        vector_int: vector::define(ElementType::Int)?,
        vector_uint: vector::define(ElementType::Uint)?,
        vector_string: vector::define(ElementType::String)?,
        vector_any: vector::define(ElementType::Any)?,
    })
}

/// Argument at `index`, or `undefined` when absent.
pub fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

/// True when the argument was passed and is not `undefined`.
pub fn has_arg(args: &[Value], index: usize) -> bool {
    !matches!(args.get(index), None | Some(Value::Undefined))
}
