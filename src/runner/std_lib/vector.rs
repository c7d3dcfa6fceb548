//! `Vector.<T>` built-in classes, one per element type.

use std::cell::RefCell;
use std::rc::Rc;

use crate::runner::context::EvalContext;
use crate::runner::ds::class::{Class, ClassDefinition, ClassRef, InstanceKind};
use crate::runner::ds::error::ErrorType;
use crate::runner::ds::function::MethodFn;
use crate::runner::ds::namespace::{QualifiedName, PUBLIC_NS, VECTOR_NS};
use crate::runner::ds::operations::type_conversion::{get_type, to_boolean, to_number, to_string};
use crate::runner::ds::traits::TraitDescriptor;
use crate::runner::ds::value::Value;
use crate::runner::ds::vector::{ElementType, VectorObject, VectorRef};

use super::core::{arg, has_arg};

pub fn define(element_type: ElementType) -> Result<ClassRef, ErrorType> {
    let name = format!("Vector.<{}>", element_type.type_name());
    Class::define(
        ClassDefinition::new(QualifiedName::new(VECTOR_NS.clone(), name))
            .with_instance_kind(InstanceKind::Vector(element_type))
            .with_constructor(MethodFn::new(move |_ctx, _this, args| {
                vector_construct(element_type, args)
            }))
            .add_trait(
                QualifiedName::new(PUBLIC_NS.clone(), "length"),
                TraitDescriptor::Accessor {
                    getter: Some(MethodFn::Native(vector_get_length)),
                    setter: Some(MethodFn::Native(vector_set_length)),
                },
            )
            .add_trait(
                QualifiedName::new(PUBLIC_NS.clone(), "fixed"),
                TraitDescriptor::Accessor {
                    getter: Some(MethodFn::Native(vector_get_fixed)),
                    setter: Some(MethodFn::Native(vector_set_fixed)),
                },
            )
            .add_native_method(&PUBLIC_NS, "push", vector_push)
            .add_native_method(&PUBLIC_NS, "pop", vector_pop)
            .add_native_method(&PUBLIC_NS, "shift", vector_shift)
            .add_native_method(&PUBLIC_NS, "unshift", vector_unshift)
            .add_native_method(&PUBLIC_NS, "indexOf", vector_index_of)
            .add_native_method(&PUBLIC_NS, "join", vector_join)
            .add_native_method(&PUBLIC_NS, "reverse", vector_reverse)
            .add_native_method(&PUBLIC_NS, "toString", vector_to_string),
    )
}

/// `new Vector.<T>(length = 0, fixed = false)`.
fn vector_construct(element_type: ElementType, args: Vec<Value>) -> Result<Value, ErrorType> {
    let length = if has_arg(&args, 0) {
        to_length(&args[0])?
    } else {
        0
    };
    let fixed = to_boolean(&arg(&args, 1));
    Ok(Value::Vector(Rc::new(RefCell::new(VectorObject::with_length(
        element_type,
        length,
        fixed,
    )))))
}

fn to_length(v: &Value) -> Result<usize, ErrorType> {
    let n = to_number(v);
    if n.is_nan() || n < 0.0 || n.fract() != 0.0 || n > u32::MAX as f64 {
        return Err(ErrorType::RangeError(format!(
            "Vector length {} is invalid",
            to_string(v)
        )));
    }
    Ok(n as usize)
}

fn this_vector(this: &Value) -> Result<&VectorRef, ErrorType> {
    match this {
        Value::Vector(v) => Ok(v),
        other => Err(ErrorType::TypeError(format!(
            "Receiver is not a Vector: {}",
            get_type(other)
        ))),
    }
}

fn vector_get_length(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(Value::Number(this_vector(&this)?.borrow().len() as f64))
}

fn vector_set_length(
    _ctx: &mut EvalContext,
    this: Value,
    args: Vec<Value>,
) -> Result<Value, ErrorType> {
    let length = to_length(&arg(&args, 0))?;
    this_vector(&this)?.borrow_mut().set_length(length)?;
    Ok(Value::Undefined)
}

fn vector_get_fixed(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(Value::Boolean(this_vector(&this)?.borrow().is_fixed()))
}

fn vector_set_fixed(
    _ctx: &mut EvalContext,
    this: Value,
    args: Vec<Value>,
) -> Result<Value, ErrorType> {
    this_vector(&this)?
        .borrow_mut()
        .set_fixed(to_boolean(&arg(&args, 0)));
    Ok(Value::Undefined)
}

/// Vector.push, returning the new length.
fn vector_push(_ctx: &mut EvalContext, this: Value, args: Vec<Value>) -> Result<Value, ErrorType> {
    let length = this_vector(&this)?.borrow_mut().push(args)?;
    Ok(Value::Number(length as f64))
}

fn vector_pop(_ctx: &mut EvalContext, this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
    this_vector(&this)?.borrow_mut().pop()
}

fn vector_shift(_ctx: &mut EvalContext, this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
    this_vector(&this)?.borrow_mut().shift()
}

fn vector_unshift(
    _ctx: &mut EvalContext,
    this: Value,
    args: Vec<Value>,
) -> Result<Value, ErrorType> {
    let length = this_vector(&this)?.borrow_mut().unshift(args)?;
    Ok(Value::Number(length as f64))
}

/// Vector.indexOf, comparing coerced values.
fn vector_index_of(
    _ctx: &mut EvalContext,
    this: Value,
    args: Vec<Value>,
) -> Result<Value, ErrorType> {
    let vector = this_vector(&this)?.borrow();
    let search = vector.element_type().coerce(arg(&args, 0));
    let from = to_number(&arg(&args, 1));
    let from = if from.is_nan() {
        0
    } else if from < 0.0 {
        (vector.len() as f64 + from).max(0.0) as usize
    } else {
        from as usize
    };
    Ok(Value::Number(
        vector.index_of(&search, from).map_or(-1.0, |i| i as f64),
    ))
}

fn vector_join(_ctx: &mut EvalContext, this: Value, args: Vec<Value>) -> Result<Value, ErrorType> {
    let separator = if has_arg(&args, 0) {
        to_string(&args[0])
    } else {
        ",".to_string()
    };
    Ok(Value::String(this_vector(&this)?.borrow().join(&separator)))
}

fn vector_reverse(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    this_vector(&this)?.borrow_mut().reverse();
    Ok(this)
}

fn vector_to_string(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(Value::String(this_vector(&this)?.borrow().join(",")))
}
