//! XMLList built-in class.

use std::rc::Rc;

use crate::runner::context::EvalContext;
use crate::runner::ds::class::{Class, ClassDefinition, ClassRef, InstanceKind};
use crate::runner::ds::error::ErrorType;
use crate::runner::ds::function::MethodFn;
use crate::runner::ds::namespace::{QualifiedName, PUBLIC_NS};
use crate::runner::ds::operations::type_conversion::{get_type, to_string};
use crate::runner::ds::value::Value;
use crate::runner::ds::xml::{XmlList, XmlListRef, XmlNodeKind};
use crate::runner::ds::xml_build::parse_fragment;

use super::core::arg;
use super::xml::{list_value, name_arg};

pub fn define() -> Result<ClassRef, ErrorType> {
    Class::define(
        ClassDefinition::new(QualifiedName::new(PUBLIC_NS.clone(), "XMLList"))
            .with_instance_kind(InstanceKind::XmlList)
            .with_constructor(MethodFn::Native(xml_list_construct))
            .add_native_method(&PUBLIC_NS, "length", xml_list_length)
            .add_native_method(&PUBLIC_NS, "children", xml_list_children)
            .add_native_method(&PUBLIC_NS, "elements", xml_list_elements)
            .add_native_method(&PUBLIC_NS, "attributes", xml_list_attributes)
            .add_native_method(&PUBLIC_NS, "text", xml_list_text)
            .add_native_method(&PUBLIC_NS, "toString", xml_list_to_string)
            .add_native_method(&PUBLIC_NS, "toXMLString", xml_list_to_xml_string),
    )
}

fn xml_list_construct(
    ctx: &mut EvalContext,
    _this: Value,
    args: Vec<Value>,
) -> Result<Value, ErrorType> {
    let list = match arg(&args, 0) {
        Value::Undefined | Value::Null => XmlList::default(),
        Value::Xml(x) => XmlList::new(vec![x]),
        Value::XmlList(l) => XmlList::new(l.items().to_vec()),
        other => {
            let text = to_string(&other);
            if text.trim().is_empty() {
                XmlList::default()
            } else {
                parse_fragment(&text, ctx.xml_settings())?
            }
        }
    };
    Ok(Value::XmlList(Rc::new(list)))
}

fn this_list(this: &Value) -> Result<&XmlListRef, ErrorType> {
    match this {
        Value::XmlList(l) => Ok(l),
        other => Err(ErrorType::TypeError(format!(
            "Receiver is not an XMLList: {}",
            get_type(other)
        ))),
    }
}

fn xml_list_length(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(Value::Number(this_list(&this)?.len() as f64))
}

fn xml_list_children(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(list_value(
        this_list(&this)?
            .items()
            .iter()
            .flat_map(|x| x.children())
            .collect(),
    ))
}

fn xml_list_elements(
    _ctx: &mut EvalContext,
    this: Value,
    args: Vec<Value>,
) -> Result<Value, ErrorType> {
    let list = this_list(&this)?.child_elements(None, &name_arg(&args));
    Ok(Value::XmlList(Rc::new(list)))
}

fn xml_list_attributes(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(list_value(
        this_list(&this)?
            .items()
            .iter()
            .flat_map(|x| x.attributes())
            .collect(),
    ))
}

fn xml_list_text(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(list_value(
        this_list(&this)?
            .items()
            .iter()
            .flat_map(|x| x.children())
            .filter(|c| c.node_kind() == XmlNodeKind::Text)
            .collect(),
    ))
}

fn xml_list_to_string(
    _ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    Ok(Value::String(this_list(&this)?.to_string_value()))
}

fn xml_list_to_xml_string(
    ctx: &mut EvalContext,
    this: Value,
    _args: Vec<Value>,
) -> Result<Value, ErrorType> {
    let settings = ctx.xml_settings();
    Ok(Value::String(
        this_list(&this)?.to_xml_string(settings.pretty_printing, settings.pretty_indent),
    ))
}
