//! XML built-in class.
//!
//! Constructing XML from markup yields the document node; its element
//! children are reached with ordinary property access.

use std::rc::Rc;

use crate::runner::context::EvalContext;
use crate::runner::ds::class::{Class, ClassDefinition, ClassRef, InstanceKind};
use crate::runner::ds::error::ErrorType;
use crate::runner::ds::function::MethodFn;
use crate::runner::ds::namespace::{Namespace, QualifiedName, PUBLIC_NS};
use crate::runner::ds::operations::property::get_attribute;
use crate::runner::ds::operations::type_conversion::{get_type, to_string};
use crate::runner::ds::value::Value;
use crate::runner::ds::xml::{XmlList, XmlNodeData, XmlNodeKind, XmlRef};
use crate::runner::ds::xml_build::{parse_document, parse_fragment};

use super::core::{arg, has_arg};

pub fn define() -> Result<ClassRef, ErrorType> {
    Class::define(
        ClassDefinition::new(QualifiedName::new(PUBLIC_NS.clone(), "XML"))
            .with_instance_kind(InstanceKind::Xml)
            .with_constructor(MethodFn::Native(xml_construct))
            .add_native_method(&PUBLIC_NS, "nodeKind", xml_node_kind)
            .add_native_method(&PUBLIC_NS, "localName", xml_local_name)
            .add_native_method(&PUBLIC_NS, "name", xml_name)
            .add_native_method(&PUBLIC_NS, "namespace", xml_namespace)
            .add_native_method(&PUBLIC_NS, "children", xml_children)
            .add_native_method(&PUBLIC_NS, "elements", xml_elements)
            .add_native_method(&PUBLIC_NS, "attributes", xml_attributes)
            .add_native_method(&PUBLIC_NS, "attribute", xml_attribute)
            .add_native_method(&PUBLIC_NS, "text", xml_text)
            .add_native_method(&PUBLIC_NS, "parent", xml_parent)
            .add_native_method(&PUBLIC_NS, "childIndex", xml_child_index)
            .add_native_method(&PUBLIC_NS, "appendChild", xml_append_child)
            .add_native_method(&PUBLIC_NS, "length", xml_length)
            .add_native_method(&PUBLIC_NS, "copy", xml_copy)
            .add_native_method(&PUBLIC_NS, "hasSimpleContent", xml_has_simple_content)
            .add_native_method(&PUBLIC_NS, "hasComplexContent", xml_has_complex_content)
            .add_native_method(&PUBLIC_NS, "toString", xml_to_string)
            .add_native_method(&PUBLIC_NS, "toXMLString", xml_to_xml_string),
    )
}

fn empty_text() -> XmlRef {
    XmlRef::new_node(XmlNodeData::with_value(XmlNodeKind::Text, ""))
}

/// `new XML(value)`: markup is parsed as a document, XML values are copied,
/// and anything else becomes a text node.
fn xml_construct(ctx: &mut EvalContext, _this: Value, args: Vec<Value>) -> Result<Value, ErrorType> {
    let source = arg(&args, 0);
    let node = match &source {
        Value::Undefined | Value::Null => empty_text(),
        Value::Xml(x) => x.copy(),
        Value::XmlList(l) => match l.items() {
            [single] => single.copy(),
            items => {
                return Err(ErrorType::TypeError(format!(
                    "Cannot convert an XMLList of length {} to XML",
                    items.len()
                )))
            }
        },
        other => {
            let text = to_string(other);
            let markup = text.trim_start();
            if markup.is_empty() {
                empty_text()
            } else if markup.starts_with('<') {
                parse_document(markup, ctx.xml_settings())?
            } else {
                XmlRef::new_node(XmlNodeData::with_value(XmlNodeKind::Text, text))
            }
        }
    };
    Ok(Value::Xml(node))
}

pub(crate) fn this_xml(this: &Value) -> Result<&XmlRef, ErrorType> {
    match this {
        Value::Xml(x) => Ok(x),
        other => Err(ErrorType::TypeError(format!(
            "Receiver is not XML: {}",
            get_type(other)
        ))),
    }
}

pub(crate) fn list_value(items: Vec<XmlRef>) -> Value {
    Value::XmlList(Rc::new(XmlList::new(items)))
}

/// Local-name argument of `elements()`; absent means every element.
pub(crate) fn name_arg(args: &[Value]) -> String {
    if has_arg(args, 0) {
        to_string(&args[0])
    } else {
        "*".to_string()
    }
}

fn xml_node_kind(_ctx: &mut EvalContext, this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
    Ok(Value::from(this_xml(&this)?.node_kind().as_str()))
}

fn xml_local_name(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(this_xml(&this)?
        .name()
        .map_or(Value::Null, |n| Value::from(n.local_name())))
}

fn xml_name(_ctx: &mut EvalContext, this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
    Ok(this_xml(&this)?
        .name()
        .map_or(Value::Null, |n| Value::String(n.to_string())))
}

/// XML.namespace: the node's own namespace, or the one bound to a prefix in scope.
fn xml_namespace(_ctx: &mut EvalContext, this: Value, args: Vec<Value>) -> Result<Value, ErrorType> {
    let node = this_xml(&this)?;
    if has_arg(&args, 0) {
        let prefix = to_string(&args[0]);
        let lookup = if prefix.is_empty() {
            node.lookup_namespace(None)
        } else {
            node.lookup_namespace(Some(&prefix))
        };
        return Ok(match lookup {
            Some(uri) if prefix.is_empty() => Value::Namespace(Namespace::xml(&uri)),
            Some(uri) => Value::Namespace(Namespace::xml(&uri).with_prefix(prefix)),
            None => Value::Undefined,
        });
    }
    Ok(match node.name() {
        Some(name) => {
            let ns = name.namespace().clone();
            Value::Namespace(match node.prefix() {
                Some(p) => ns.with_prefix(p),
                None => ns,
            })
        }
        None => Value::Null,
    })
}

fn xml_children(_ctx: &mut EvalContext, this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
    Ok(list_value(this_xml(&this)?.children()))
}

fn xml_elements(_ctx: &mut EvalContext, this: Value, args: Vec<Value>) -> Result<Value, ErrorType> {
    Ok(list_value(
        this_xml(&this)?.child_elements(None, &name_arg(&args)),
    ))
}

fn xml_attributes(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(list_value(this_xml(&this)?.attributes()))
}

fn xml_attribute(ctx: &mut EvalContext, this: Value, args: Vec<Value>) -> Result<Value, ErrorType> {
    this_xml(&this)?;
    get_attribute(ctx, &this, None, &to_string(&arg(&args, 0)))
}

fn xml_text(_ctx: &mut EvalContext, this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
    Ok(list_value(
        this_xml(&this)?
            .children()
            .into_iter()
            .filter(|c| c.node_kind() == XmlNodeKind::Text)
            .collect(),
    ))
}

fn xml_parent(_ctx: &mut EvalContext, this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
    Ok(this_xml(&this)?.parent().map_or(Value::Undefined, Value::Xml))
}

fn xml_child_index(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(Value::Number(
        this_xml(&this)?.child_index().map_or(-1.0, |i| i as f64),
    ))
}

/// XML.appendChild. Markup strings are parsed; other values become text.
fn xml_append_child(
    ctx: &mut EvalContext,
    this: Value,
    args: Vec<Value>,
) -> Result<Value, ErrorType> {
    let node = this_xml(&this)?;
    let child = match arg(&args, 0) {
        Value::String(s) if s.trim_start().starts_with('<') => {
            Value::XmlList(Rc::new(parse_fragment(&s, ctx.xml_settings())?))
        }
        other => other,
    };
    node.append_value(&child)?;
    Ok(this)
}

fn xml_length(_ctx: &mut EvalContext, this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
    this_xml(&this)?;
    Ok(Value::Number(1.0))
}

fn xml_copy(_ctx: &mut EvalContext, this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
    Ok(Value::Xml(this_xml(&this)?.copy()))
}

fn xml_has_simple_content(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(Value::Boolean(this_xml(&this)?.has_simple_content()))
}

fn xml_has_complex_content(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    let node = this_xml(&this)?;
    let complex = match node.node_kind() {
        XmlNodeKind::Element | XmlNodeKind::Document => !node.has_simple_content(),
        _ => false,
    };
    Ok(Value::Boolean(complex))
}

fn xml_to_string(_ctx: &mut EvalContext, this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
    Ok(Value::String(this_xml(&this)?.to_string_value()))
}

fn xml_to_xml_string(
    ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    let settings = ctx.xml_settings();
    Ok(Value::String(
        this_xml(&this)?.to_xml_string(settings.pretty_printing, settings.pretty_indent),
    ))
}
