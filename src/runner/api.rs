//! Stable entry points for hosts: namespaces, names, class definition,
//! construction, and property access.
//!
//! Arguments are evaluated by the caller in receiver, filter, name order;
//! each function then resolves exactly once.

use crate::runner::context::EvalContext;
use crate::runner::ds::class::{call_constructor, Class, ClassDefinition, ClassRef, InstanceKind};
use crate::runner::ds::error::ErrorType;
use crate::runner::ds::function::{MethodFn, NativeFn};
use crate::runner::ds::namespace::{Namespace, QualifiedName};
use crate::runner::ds::object::ScriptObject;
use crate::runner::ds::object_property::PropertyKey;
use crate::runner::ds::operations::property;
use crate::runner::ds::traits::TraitDescriptor;
use crate::runner::ds::value::Value;

/// Public namespace of a package.
pub fn package_ns(uri: &str) -> Namespace {
    Namespace::package(uri)
}

/// User-declared namespace.
pub fn user_ns(uri: &str) -> Namespace {
    Namespace::explicit(uri)
}

/// A namespace no other namespace equals.
pub fn private_ns() -> Namespace {
    Namespace::private()
}

pub fn name(namespace: &Namespace, local_name: &str) -> QualifiedName {
    QualifiedName::new(namespace.clone(), local_name)
}

pub fn method(func: NativeFn) -> TraitDescriptor {
    TraitDescriptor::Method(MethodFn::Native(func))
}

pub fn closure_method<F>(func: F) -> TraitDescriptor
where
    F: Fn(&mut EvalContext, Value, Vec<Value>) -> Result<Value, ErrorType> + 'static,
{
    TraitDescriptor::Method(MethodFn::new(func))
}

pub fn variable(default: Value) -> TraitDescriptor {
    TraitDescriptor::Variable {
        default,
        read_only: false,
    }
}

pub fn constant(value: Value) -> TraitDescriptor {
    TraitDescriptor::Variable {
        default: value,
        read_only: true,
    }
}

pub fn accessor(getter: Option<MethodFn>, setter: Option<MethodFn>) -> TraitDescriptor {
    TraitDescriptor::Accessor { getter, setter }
}

/// Defines a class. Fails with a `DefinitionError` on a duplicate qualified
/// name, an empty name, or an incompatible override.
pub fn define_class(
    name: QualifiedName,
    constructor: Option<MethodFn>,
    traits: Vec<(QualifiedName, TraitDescriptor)>,
    superclass: Option<&ClassRef>,
) -> Result<ClassRef, ErrorType> {
    let mut def = ClassDefinition::new(name).add_traits(traits);
    if let Some(s) = superclass {
        def = def.extends(s);
    }
    if let Some(c) = constructor {
        def = def.with_constructor(c);
    }
    Class::define(def)
}

/// Creates an instance. Ordinary classes get fresh slot storage filled with
/// each variable's default before the constructor runs; built-in classes
/// build their value in the constructor.
pub fn construct(ctx: &mut EvalContext, class: &ClassRef, args: Vec<Value>) -> Result<Value, ErrorType> {
    match class.instance_kind() {
        InstanceKind::Ordinary => {
            let object = ScriptObject::new_ref(class);
            let this = Value::Object(object);
            call_constructor(ctx, class, this.clone(), args)?;
            Ok(this)
        }
        _ => match class.constructor() {
            Some(ctor) => ctor.call(ctx, Value::Undefined, args),
            None => Err(ErrorType::TypeError(format!(
                "Class {} cannot be instantiated",
                class.name()
            ))),
        },
    }
}

/// True when `value`'s class is `class` or one of its subclasses.
pub fn instance_of(ctx: &EvalContext, value: &Value, class: &ClassRef) -> bool {
    ctx.class_of(value)
        .map_or(false, |c| c.is_subclass_of(class))
}

pub fn get_property(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    key: impl Into<PropertyKey>,
) -> Result<Value, ErrorType> {
    property::get_property(ctx, receiver, filter, &key.into())
}

pub fn set_property(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    key: impl Into<PropertyKey>,
    value: Value,
) -> Result<(), ErrorType> {
    property::set_property(ctx, receiver, filter, &key.into(), value)
}

pub fn call_property(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    key: impl Into<PropertyKey>,
    args: Vec<Value>,
) -> Result<Value, ErrorType> {
    property::call_property(ctx, receiver, filter, &key.into(), args)
}

pub fn delete_property(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    key: impl Into<PropertyKey>,
) -> Result<bool, ErrorType> {
    property::delete_property(ctx, receiver, filter, &key.into())
}

pub fn get_attribute(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    local_name: &str,
) -> Result<Value, ErrorType> {
    property::get_attribute(ctx, receiver, filter, local_name)
}

pub fn set_attribute(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    local_name: &str,
    value: &Value,
) -> Result<(), ErrorType> {
    property::set_attribute(ctx, receiver, filter, local_name, value)
}

/// `receiver.name++`: returns the old value as a number.
pub fn post_increment_property(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    key: impl Into<PropertyKey>,
) -> Result<Value, ErrorType> {
    property::post_increment(ctx, receiver, filter, &key.into())
}

/// `receiver.name--`: returns the old value as a number.
pub fn post_decrement_property(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    key: impl Into<PropertyKey>,
) -> Result<Value, ErrorType> {
    property::post_decrement(ctx, receiver, filter, &key.into())
}
