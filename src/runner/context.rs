//! Evaluation context.
//!
//! The context is the handle every operation receives. It owns the runtime
//! configuration and one instance of each built-in class; classes created
//! by one context are usable with any other.

use crate::runner::config::{RuntimeConfig, XmlSettings};
use crate::runner::ds::class::ClassRef;
use crate::runner::ds::error::ErrorType;
use crate::runner::ds::realm::Intrinsics;
use crate::runner::ds::value::Value;
use crate::runner::ds::vector::ElementType;
use crate::runner::std_lib::create_intrinsics;

pub struct EvalContext {
    config: RuntimeConfig,
    intrinsics: Intrinsics,
}

impl EvalContext {
    /// Create a context with the default configuration.
    pub fn new() -> Result<Self, ErrorType> {
        EvalContext::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Result<Self, ErrorType> {
        let intrinsics = create_intrinsics()?;
        tracing::debug!(?config, "created evaluation context");
        Ok(EvalContext { config, intrinsics })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn xml_settings(&self) -> &XmlSettings {
        &self.config.xml
    }

    pub fn xml_class(&self) -> ClassRef {
        self.intrinsics.xml.clone()
    }

    pub fn xml_list_class(&self) -> ClassRef {
        self.intrinsics.xml_list.clone()
    }

    pub fn string_class(&self) -> ClassRef {
        self.intrinsics.string.clone()
    }

    pub fn namespace_class(&self) -> ClassRef {
        self.intrinsics.namespace.clone()
    }

    pub fn vector_class(&self, element_type: ElementType) -> ClassRef {
        self.intrinsics.vector(element_type).clone()
    }

    /// `Vector.<Number>`.
    pub fn vector_float_class(&self) -> ClassRef {
        self.vector_class(ElementType::Number)
    }

    /// Class whose traits answer property lookups on `value`, if any.
    pub fn class_of(&self, value: &Value) -> Option<ClassRef> {
        match value {
            Value::Object(o) => Some(o.borrow().class().clone()),
            Value::Xml(_) => Some(self.xml_class()),
            Value::XmlList(_) => Some(self.xml_list_class()),
            Value::String(_) => Some(self.string_class()),
            Value::Namespace(_) => Some(self.namespace_class()),
            Value::Vector(v) => Some(self.vector_class(v.borrow().element_type())),
            _ => None,
        }
    }
}
