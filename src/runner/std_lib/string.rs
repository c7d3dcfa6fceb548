//! String built-in class.

use crate::runner::context::EvalContext;
use crate::runner::ds::class::{Class, ClassDefinition, ClassRef, InstanceKind};
use crate::runner::ds::error::ErrorType;
use crate::runner::ds::function::MethodFn;
use crate::runner::ds::namespace::{QualifiedName, PUBLIC_NS};
use crate::runner::ds::operations::type_conversion::{to_number, to_string};
use crate::runner::ds::value::Value;

use super::core::{arg, has_arg};

pub fn define() -> Result<ClassRef, ErrorType> {
    Class::define(
        ClassDefinition::new(QualifiedName::new(PUBLIC_NS.clone(), "String"))
            .with_instance_kind(InstanceKind::String)
            .with_constructor(MethodFn::Native(string_construct))
            .add_native_getter(&PUBLIC_NS, "length", string_length)
            .add_native_method(&PUBLIC_NS, "toString", string_to_string)
            .add_native_method(&PUBLIC_NS, "charAt", string_char_at)
            .add_native_method(&PUBLIC_NS, "toUpperCase", string_to_upper_case)
            .add_native_method(&PUBLIC_NS, "toLowerCase", string_to_lower_case)
            .add_native_method(&PUBLIC_NS, "indexOf", string_index_of),
    )
}

fn string_construct(
    _ctx: &mut EvalContext,
    _this: Value,
    args: Vec<Value>,
) -> Result<Value, ErrorType> {
    if has_arg(&args, 0) {
        Ok(Value::String(to_string(&args[0])))
    } else {
        Ok(Value::String(String::new()))
    }
}

fn string_length(_ctx: &mut EvalContext, this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
    Ok(Value::Number(to_string(&this).chars().count() as f64))
}

fn string_to_string(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(Value::String(to_string(&this)))
}

/// String.charAt
fn string_char_at(_ctx: &mut EvalContext, this: Value, args: Vec<Value>) -> Result<Value, ErrorType> {
    let s = to_string(&this);
    let index = to_number(&arg(&args, 0));
    let index = if index.is_nan() { 0.0 } else { index.trunc() };
    if index < 0.0 {
        return Ok(Value::String(String::new()));
    }
    Ok(Value::String(
        s.chars()
            .nth(index as usize)
            .map(|c| c.to_string())
            .unwrap_or_default(),
    ))
}

fn string_to_upper_case(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(Value::String(to_string(&this).to_uppercase()))
}

fn string_to_lower_case(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(Value::String(to_string(&this).to_lowercase()))
}

/// String.indexOf, counting in characters.
fn string_index_of(_ctx: &mut EvalContext, this: Value, args: Vec<Value>) -> Result<Value, ErrorType> {
    let s: Vec<char> = to_string(&this).chars().collect();
    if !has_arg(&args, 0) {
        return Ok(Value::Number(-1.0));
    }
    let search: Vec<char> = to_string(&args[0]).chars().collect();
    let from = to_number(&arg(&args, 1));
    let from = if from.is_nan() || from < 0.0 {
        0
    } else {
        (from as usize).min(s.len())
    };
    if search.is_empty() {
        return Ok(Value::Number(from as f64));
    }
    let found = (from..s.len())
        .find(|&i| s[i..].starts_with(&search))
        .map_or(-1.0, |i| i as f64);
    Ok(Value::Number(found))
}
