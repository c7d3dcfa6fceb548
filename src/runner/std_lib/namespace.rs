//! Namespace built-in class.
//!
//! `new Namespace(uri)` and `new Namespace(prefix, uri)` produce explicit
//! namespaces usable as lookup filters. An empty uri is the unnamed public
//! namespace.

use crate::runner::context::EvalContext;
use crate::runner::ds::class::{Class, ClassDefinition, ClassRef, InstanceKind};
use crate::runner::ds::error::ErrorType;
use crate::runner::ds::function::MethodFn;
use crate::runner::ds::namespace::{Namespace, QualifiedName, PUBLIC_NS};
use crate::runner::ds::operations::type_conversion::{get_type, to_string};
use crate::runner::ds::value::Value;

use super::core::has_arg;

pub fn define() -> Result<ClassRef, ErrorType> {
    Class::define(
        ClassDefinition::new(QualifiedName::new(PUBLIC_NS.clone(), "Namespace"))
            .with_instance_kind(InstanceKind::Namespace)
            .with_constructor(MethodFn::Native(namespace_construct))
            .add_native_getter(&PUBLIC_NS, "uri", namespace_uri)
            .add_native_getter(&PUBLIC_NS, "prefix", namespace_prefix)
            .add_native_method(&PUBLIC_NS, "toString", namespace_to_string),
    )
}

fn namespace_construct(
    _ctx: &mut EvalContext,
    _this: Value,
    args: Vec<Value>,
) -> Result<Value, ErrorType> {
    let ns = match (has_arg(&args, 0), has_arg(&args, 1)) {
        (false, false) => PUBLIC_NS.clone(),
        (true, false) => match &args[0] {
            Value::Namespace(ns) => ns.clone(),
            uri => Namespace::xml(&to_string(uri)),
        },
        (_, true) => {
            let uri = match &args[1] {
                Value::Namespace(ns) => ns.uri().to_string(),
                other => to_string(other),
            };
            let ns = Namespace::xml(&uri);
            match args.get(0) {
                Some(p) if !p.is_nullish() => {
                    let prefix = to_string(p);
                    if uri.is_empty() && !prefix.is_empty() {
                        return Err(ErrorType::TypeError(format!(
                            "Prefix {} cannot be bound to the empty namespace",
                            prefix
                        )));
                    }
                    ns.with_prefix(prefix)
                }
                _ => ns,
            }
        }
    };
    Ok(Value::Namespace(ns))
}

fn this_namespace(this: &Value) -> Result<&Namespace, ErrorType> {
    match this {
        Value::Namespace(ns) => Ok(ns),
        other => Err(ErrorType::TypeError(format!(
            "Receiver is not a Namespace: {}",
            get_type(other)
        ))),
    }
}

fn namespace_uri(_ctx: &mut EvalContext, this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
    Ok(Value::String(this_namespace(&this)?.uri().to_string()))
}

fn namespace_prefix(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(this_namespace(&this)?
        .prefix()
        .map_or(Value::Undefined, Value::from))
}

fn namespace_to_string(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(Value::String(this_namespace(&this)?.uri().to_string()))
}
