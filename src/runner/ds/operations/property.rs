//! Property resolution.
//!
//! Every access goes through [`resolve`], which maps a receiver, an optional
//! namespace filter and a local name to a [`PropertyRef`]. The reference is
//! then read, written, called or deleted. Compound operators resolve once
//! and reuse the same reference for the read and the write.

use std::rc::Rc;

use crate::runner::context::EvalContext;
use crate::runner::ds::class::ClassRef;
use crate::runner::ds::error::ErrorType;
use crate::runner::ds::function::BoundMethod;
use crate::runner::ds::namespace::Namespace;
use crate::runner::ds::object::ObjectRef;
use crate::runner::ds::object_property::PropertyKey;
use crate::runner::ds::operations::type_conversion::{get_type, to_number, to_string};
use crate::runner::ds::traits::TraitKind;
use crate::runner::ds::value::Value;
use crate::runner::ds::vector::VectorRef;
use crate::runner::ds::xml::{XmlList, XmlListRef, XmlRef};

/// What the caller intends to do with the resolved property. XML receivers
/// answer calls from their class's methods and everything else from their
/// children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Get,
    Set,
    Call,
    Delete,
}

/// A resolved property, bound to its receiver.
#[derive(Clone)]
pub enum PropertyRef {
    /// A fixed trait of the receiver's class, by position in its table.
    Trait {
        receiver: Value,
        class: ClassRef,
        index: usize,
    },
    /// Ad hoc property of a dynamic object.
    Dynamic { object: ObjectRef, name: String },
    VectorIndex { vector: VectorRef, index: usize },
    /// Index 0 of a single XML value is the value itself.
    XmlSelf { node: XmlRef },
    XmlChildren {
        node: XmlRef,
        filter: Option<Namespace>,
        local_name: String,
    },
    XmlListIndex { list: XmlListRef, index: usize },
    XmlListChildren {
        list: XmlListRef,
        filter: Option<Namespace>,
        local_name: String,
    },
}

fn display_name(filter: Option<&Namespace>, local_name: &str) -> String {
    match filter {
        Some(ns) if !ns.is_unnamed_public() => format!("{}::{}", ns.uri(), local_name),
        _ => local_name.to_string(),
    }
}

fn allows_dynamic(filter: Option<&Namespace>) -> bool {
    filter.map_or(true, |ns| ns.is_unnamed_public())
}

fn trait_ref(
    class: &ClassRef,
    receiver: &Value,
    filter: Option<&Namespace>,
    local_name: &str,
) -> Result<Option<PropertyRef>, ErrorType> {
    Ok(class
        .traits()
        .resolve_index(filter, local_name)?
        .map(|index| PropertyRef::Trait {
            receiver: receiver.clone(),
            class: class.clone(),
            index,
        }))
}

fn not_found(filter: Option<&Namespace>, local_name: &str, owner: &str) -> ErrorType {
    ErrorType::ReferenceError(format!(
        "Property {} not found on {} and there is no default value",
        display_name(filter, local_name),
        owner
    ))
}

/// Element indices of vectors and XML values live in the unnamed public
/// namespace only.
fn check_index_filter(
    filter: Option<&Namespace>,
    key: &PropertyKey,
    owner: &str,
) -> Result<(), ErrorType> {
    if !allows_dynamic(filter) && (key.as_index().is_some() || key.is_invalid_numeric()) {
        return Err(not_found(filter, &key.local_name(), owner));
    }
    Ok(())
}

/// Resolves `key` on `receiver` under the namespace filter. A `None` filter
/// matches every namespace and fails on ambiguity. Numeric keys index
/// vectors and XML values and are rejected under any other filter.
pub fn resolve(
    ctx: &EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    key: &PropertyKey,
    access: AccessKind,
) -> Result<PropertyRef, ErrorType> {
    let local_name = key.local_name();
    let resolved = match receiver {
        Value::Undefined | Value::Null => {
            return Err(ErrorType::TypeError(format!(
                "Cannot access property {} of {}",
                display_name(filter, &local_name),
                get_type(receiver)
            )))
        }
        Value::Object(o) => {
            let class = o.borrow().class().clone();
            match trait_ref(&class, receiver, filter, &local_name)? {
                Some(r) => r,
                None if class.is_dynamic() && allows_dynamic(filter) => {
                    tracing::trace!(name = %local_name, class = %class.name(), "dynamic fallback");
                    return Ok(PropertyRef::Dynamic {
                        object: o.clone(),
                        name: local_name,
                    });
                }
                None => {
                    return Err(not_found(
                        filter,
                        &local_name,
                        &class.name().to_string(),
                    ))
                }
            }
        }
        Value::Vector(v) => {
            let class = ctx.vector_class(v.borrow().element_type());
            check_index_filter(filter, key, &class.name().to_string())?;
            if let Some(index) = key.as_index() {
                tracing::trace!(index, "vector index");
                return Ok(PropertyRef::VectorIndex {
                    vector: v.clone(),
                    index,
                });
            }
            if key.is_invalid_numeric() {
                return Err(ErrorType::RangeError(format!(
                    "Index {} is out of range {}",
                    local_name,
                    v.borrow().len()
                )));
            }
            trait_ref(&class, receiver, filter, &local_name)?.ok_or_else(|| {
                not_found(filter, &local_name, &class.name().to_string())
            })?
        }
        Value::Xml(x) => {
            if access == AccessKind::Call {
                let class = ctx.xml_class();
                trait_ref(&class, receiver, filter, &local_name)?
                    .ok_or_else(|| not_found(filter, &local_name, "XML"))?
            } else if let Some(index) = key.as_index() {
                check_index_filter(filter, key, "XML")?;
                if index == 0 {
                    PropertyRef::XmlSelf { node: x.clone() }
                } else {
                    return Err(ErrorType::RangeError(format!(
                        "Index {} is out of range 1",
                        index
                    )));
                }
            } else {
                PropertyRef::XmlChildren {
                    node: x.clone(),
                    filter: filter.cloned(),
                    local_name,
                }
            }
        }
        Value::XmlList(l) => {
            if access == AccessKind::Call {
                let class = ctx.xml_list_class();
                trait_ref(&class, receiver, filter, &local_name)?
                    .ok_or_else(|| not_found(filter, &local_name, "XMLList"))?
            } else if let Some(index) = key.as_index() {
                check_index_filter(filter, key, "XMLList")?;
                PropertyRef::XmlListIndex {
                    list: l.clone(),
                    index,
                }
            } else {
                PropertyRef::XmlListChildren {
                    list: l.clone(),
                    filter: filter.cloned(),
                    local_name,
                }
            }
        }
        Value::String(_) | Value::Namespace(_) => {
            let class = match receiver {
                Value::String(_) => ctx.string_class(),
                _ => ctx.namespace_class(),
            };
            trait_ref(&class, receiver, filter, &local_name)?.ok_or_else(|| {
                not_found(filter, &local_name, &class.name().to_string())
            })?
        }
        Value::Boolean(_) | Value::Number(_) | Value::Class(_) | Value::Function(_) => {
            return Err(not_found(filter, &local_name, get_type(receiver)))
        }
    };
    tracing::trace!(name = %key, ?access, "resolved property");
    Ok(resolved)
}

fn slot_owner(receiver: &Value) -> Result<&ObjectRef, ErrorType> {
    match receiver {
        Value::Object(o) => Ok(o),
        other => Err(ErrorType::TypeError(format!(
            "A {} value has no slot storage",
            get_type(other)
        ))),
    }
}

impl PropertyRef {
    pub fn get(&self, ctx: &mut EvalContext) -> Result<Value, ErrorType> {
        match self {
            PropertyRef::Trait {
                receiver,
                class,
                index,
            } => {
                let t = match class.traits().get_index(*index) {
                    Some(t) => t,
                    None => {
                        return Err(ErrorType::ReferenceError(format!(
                            "Trait {} is missing from {}",
                            index,
                            class.name()
                        )))
                    }
                };
                match t.kind() {
                    TraitKind::Method(m) => Ok(Value::Function(Rc::new(BoundMethod::new(
                        receiver.clone(),
                        m.clone(),
                    )))),
                    TraitKind::Variable { slot, .. } => slot_owner(receiver)?.borrow().get_slot(*slot),
                    TraitKind::Accessor {
                        getter: Some(g), ..
                    } => g.call(ctx, receiver.clone(), vec![]),
                    TraitKind::Accessor { getter: None, .. } => Err(ErrorType::ReferenceError(
                        format!("Property {} is write-only", t.name()),
                    )),
                }
            }
            PropertyRef::Dynamic { object, name } => Ok(object
                .borrow()
                .get_dynamic(name)
                .cloned()
                .unwrap_or(Value::Undefined)),
            PropertyRef::VectorIndex { vector, index } => vector.borrow().get(*index),
            PropertyRef::XmlSelf { node } => Ok(Value::Xml(node.clone())),
            PropertyRef::XmlChildren {
                node,
                filter,
                local_name,
            } => Ok(Value::XmlList(Rc::new(XmlList::new(
                node.child_elements(filter.as_ref(), local_name),
            )))),
            PropertyRef::XmlListIndex { list, index } => list.get(*index).map(Value::Xml),
            PropertyRef::XmlListChildren {
                list,
                filter,
                local_name,
            } => Ok(Value::XmlList(Rc::new(
                list.child_elements(filter.as_ref(), local_name),
            ))),
        }
    }

    pub fn set(&self, ctx: &mut EvalContext, value: Value) -> Result<(), ErrorType> {
        match self {
            PropertyRef::Trait {
                receiver,
                class,
                index,
            } => {
                let t = match class.traits().get_index(*index) {
                    Some(t) => t,
                    None => {
                        return Err(ErrorType::ReferenceError(format!(
                            "Trait {} is missing from {}",
                            index,
                            class.name()
                        )))
                    }
                };
                match t.kind() {
                    TraitKind::Method(_) => Err(ErrorType::TypeError(format!(
                        "Cannot assign to a method {} on {}",
                        t.name(),
                        class.name()
                    ))),
                    TraitKind::Variable {
                        read_only: true, ..
                    } => Err(ErrorType::ReferenceError(format!(
                        "Illegal write to read-only property {} on {}",
                        t.name(),
                        class.name()
                    ))),
                    TraitKind::Variable { slot, .. } => {
                        slot_owner(receiver)?.borrow_mut().set_slot(*slot, value)
                    }
                    TraitKind::Accessor {
                        setter: Some(s), ..
                    } => s.call(ctx, receiver.clone(), vec![value]).map(|_| ()),
                    TraitKind::Accessor { setter: None, .. } => Err(ErrorType::ReferenceError(
                        format!("Illegal write to read-only property {} on {}", t.name(), class.name()),
                    )),
                }
            }
            PropertyRef::Dynamic { object, name } => {
                object.borrow_mut().set_dynamic(name.clone(), value);
                Ok(())
            }
            PropertyRef::VectorIndex { vector, index } => vector.borrow_mut().set(*index, value),
            PropertyRef::XmlSelf { .. } | PropertyRef::XmlListIndex { .. } => Err(
                ErrorType::TypeError("XML nodes cannot be replaced by index".to_string()),
            ),
            PropertyRef::XmlChildren {
                node,
                filter,
                local_name,
            } => node.set_children(filter.as_ref(), local_name, &value),
            PropertyRef::XmlListChildren {
                list,
                filter,
                local_name,
            } => match list.items() {
                [single] => single.set_children(filter.as_ref(), local_name, &value),
                items => Err(ErrorType::TypeError(format!(
                    "Cannot assign {} on an XMLList of length {}",
                    local_name,
                    items.len()
                ))),
            },
        }
    }

    /// Calls the property. Method traits are invoked directly on the
    /// receiver; anything else must hold a function value.
    pub fn call(&self, ctx: &mut EvalContext, args: Vec<Value>) -> Result<Value, ErrorType> {
        if let PropertyRef::Trait {
            receiver,
            class,
            index,
        } = self
        {
            if let Some(t) = class.traits().get_index(*index) {
                if let TraitKind::Method(m) = t.kind() {
                    return m.call(ctx, receiver.clone(), args);
                }
            }
        }
        match self.get(ctx)? {
            Value::Function(f) => f.call(ctx, args),
            other => Err(ErrorType::TypeError(format!(
                "Value is not a function: {}",
                get_type(&other)
            ))),
        }
    }

    /// Returns whether something was removed. Fixed traits are never removed.
    pub fn delete(&self) -> Result<bool, ErrorType> {
        match self {
            PropertyRef::Trait { .. } | PropertyRef::VectorIndex { .. } => Ok(false),
            PropertyRef::Dynamic { object, name } => Ok(object.borrow_mut().delete_dynamic(name)),
            PropertyRef::XmlSelf { .. } | PropertyRef::XmlListIndex { .. } => Ok(false),
            PropertyRef::XmlChildren {
                node,
                filter,
                local_name,
            } => Ok(node.remove_children(filter.as_ref(), local_name) > 0),
            PropertyRef::XmlListChildren {
                list,
                filter,
                local_name,
            } => {
                let removed: usize = list
                    .items()
                    .iter()
                    .map(|x| x.remove_children(filter.as_ref(), local_name))
                    .sum();
                Ok(removed > 0)
            }
        }
    }
}

pub fn get_property(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    key: &PropertyKey,
) -> Result<Value, ErrorType> {
    resolve(ctx, receiver, filter, key, AccessKind::Get)?.get(ctx)
}

pub fn set_property(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    key: &PropertyKey,
    value: Value,
) -> Result<(), ErrorType> {
    resolve(ctx, receiver, filter, key, AccessKind::Set)?.set(ctx, value)
}

pub fn call_property(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    key: &PropertyKey,
    args: Vec<Value>,
) -> Result<Value, ErrorType> {
    resolve(ctx, receiver, filter, key, AccessKind::Call)?.call(ctx, args)
}

pub fn delete_property(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    key: &PropertyKey,
) -> Result<bool, ErrorType> {
    resolve(ctx, receiver, filter, key, AccessKind::Delete)?.delete()
}

/// Resolve once, read, write `old + delta` through the same reference, and
/// return the old value as a number.
fn read_modify_write(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    key: &PropertyKey,
    delta: f64,
) -> Result<Value, ErrorType> {
    let property = resolve(ctx, receiver, filter, key, AccessKind::Set)?;
    let old = to_number(&property.get(ctx)?);
    property.set(ctx, Value::Number(old + delta))?;
    Ok(Value::Number(old))
}

pub fn post_increment(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    key: &PropertyKey,
) -> Result<Value, ErrorType> {
    read_modify_write(ctx, receiver, filter, key, 1.0)
}

pub fn post_decrement(
    ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    key: &PropertyKey,
) -> Result<Value, ErrorType> {
    read_modify_write(ctx, receiver, filter, key, -1.0)
}

/// Attribute lookup on XML values. A single match yields the attribute
/// node; no match yields an empty list. The `*` local name collects every
/// attribute that passes the filter.
pub fn get_attribute(
    _ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    local_name: &str,
) -> Result<Value, ErrorType> {
    let nodes: Vec<XmlRef> = match receiver {
        Value::Xml(x) => vec![x.clone()],
        Value::XmlList(l) => l.items().to_vec(),
        other => {
            return Err(ErrorType::TypeError(format!(
                "Attributes are only defined on XML, not on {}",
                get_type(other)
            )))
        }
    };
    let mut found = Vec::new();
    for node in &nodes {
        if local_name == "*" {
            found.extend(
                node.attributes()
                    .into_iter()
                    .filter(|a| a.name().map_or(false, |n| n.matches(filter, "*"))),
            );
        } else if let Some(a) = node.find_attribute(filter, local_name)? {
            found.push(a);
        }
    }
    tracing::trace!(name = %local_name, matches = found.len(), "resolved attribute");
    match (receiver, found.len()) {
        (Value::Xml(_), 1) if local_name != "*" => Ok(Value::Xml(found.remove(0))),
        _ => Ok(Value::XmlList(Rc::new(XmlList::new(found)))),
    }
}

pub fn set_attribute(
    _ctx: &mut EvalContext,
    receiver: &Value,
    filter: Option<&Namespace>,
    local_name: &str,
    value: &Value,
) -> Result<(), ErrorType> {
    let target = match receiver {
        Value::Xml(x) => x.clone(),
        Value::XmlList(l) if l.len() == 1 => l.get(0)?,
        other => {
            return Err(ErrorType::TypeError(format!(
                "Cannot set attribute {} on {}",
                local_name,
                get_type(other)
            )))
        }
    };
    if local_name == "*" {
        return Err(ErrorType::TypeError(
            "Cannot assign to every attribute at once".to_string(),
        ));
    }
    target.set_attribute(filter, local_name, to_string(value))
}
