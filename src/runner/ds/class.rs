//! Class definitions.
//!
//! A class's trait table is linearized once when the class is defined: the
//! superclass's table is copied and the class's own traits are overlaid on
//! it. Lookups never walk the inheritance chain.

use std::collections::HashSet;
use std::rc::Rc;

use crate::runner::context::EvalContext;
use crate::runner::ds::error::ErrorType;
use crate::runner::ds::function::{MethodFn, NativeFn};
use crate::runner::ds::namespace::{Namespace, QualifiedName};
use crate::runner::ds::traits::{Trait, TraitDescriptor, TraitKind, TraitTable};
use crate::runner::ds::value::Value;
use crate::runner::ds::vector::ElementType;

pub type ClassRef = Rc<Class>;

/// Storage a class allocates for its instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceKind {
    Ordinary,
    Xml,
    XmlList,
    Vector(ElementType),
    String,
    Namespace,
}

pub struct Class {
    name: QualifiedName,
    superclass: Option<ClassRef>,
    traits: TraitTable,
    slot_defaults: Vec<Value>,
    constructor: Option<MethodFn>,
    instance_kind: InstanceKind,
    dynamic: bool,
}
impl Class {
    /// Seals a class definition. Fails with a `DefinitionError` when the
    /// definition declares one qualified name twice, uses an empty local
    /// name, or overrides an inherited trait with an incompatible kind.
    pub fn define(def: ClassDefinition) -> Result<ClassRef, ErrorType> {
        if def.name.local_name().is_empty() {
            return Err(ErrorType::DefinitionError(
                "Class name must not be empty".to_string(),
            ));
        }
        let (mut traits, mut slot_defaults) = match &def.superclass {
            Some(s) => (s.traits.clone(), s.slot_defaults.clone()),
            None => (TraitTable::new(), Vec::new()),
        };
        let mut declared = HashSet::new();
        let mut overrides = 0;
        for (name, descriptor) in def.traits {
            if name.local_name().is_empty() {
                return Err(ErrorType::DefinitionError(format!(
                    "Trait name must not be empty in class {}",
                    def.name
                )));
            }
            if !declared.insert(name.clone()) {
                return Err(ErrorType::DefinitionError(format!(
                    "Duplicate definition of {} in class {}",
                    name, def.name
                )));
            }
            let kind = match traits.get(&name) {
                Some(inherited) => {
                    overrides += 1;
                    override_kind(&def.name, inherited, descriptor)?
                }
                None => match descriptor {
                    TraitDescriptor::Method(m) => TraitKind::Method(m),
                    TraitDescriptor::Variable { default, read_only } => {
                        slot_defaults.push(default);
                        TraitKind::Variable {
                            slot: slot_defaults.len() - 1,
                            read_only,
                        }
                    }
                    TraitDescriptor::Accessor { getter, setter } => {
                        TraitKind::Accessor { getter, setter }
                    }
                },
            };
            traits.insert(Trait::new(name, kind, def.name.clone()));
        }

        let instance_kind = def
            .instance_kind
            .or_else(|| def.superclass.as_ref().map(|s| s.instance_kind))
            .unwrap_or(InstanceKind::Ordinary);
        let constructor = def
            .constructor
            .or_else(|| def.superclass.as_ref().and_then(|s| s.constructor.clone()));

        tracing::debug!(
            class = %def.name,
            traits = traits.len(),
            slots = slot_defaults.len(),
            overrides,
            "defined class"
        );
        Ok(Rc::new(Class {
            name: def.name,
            superclass: def.superclass,
            traits,
            slot_defaults,
            constructor,
            instance_kind,
            dynamic: def.dynamic,
        }))
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn superclass(&self) -> Option<&ClassRef> {
        self.superclass.as_ref()
    }

    pub fn traits(&self) -> &TraitTable {
        &self.traits
    }

    pub fn slot_count(&self) -> usize {
        self.slot_defaults.len()
    }

    pub fn slot_defaults(&self) -> &[Value] {
        &self.slot_defaults
    }

    pub fn constructor(&self) -> Option<&MethodFn> {
        self.constructor.as_ref()
    }

    pub fn instance_kind(&self) -> InstanceKind {
        self.instance_kind
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// True when `self` is `other` or inherits from it.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        let mut current = Some(self);
        while let Some(c) = current {
            if std::ptr::eq(c, other) {
                return true;
            }
            current = c.superclass.as_deref();
        }
        false
    }
}

fn override_kind(
    class_name: &QualifiedName,
    inherited: &Trait,
    descriptor: TraitDescriptor,
) -> Result<TraitKind, ErrorType> {
    match (inherited.kind(), descriptor) {
        (TraitKind::Method(_), TraitDescriptor::Method(m)) => Ok(TraitKind::Method(m)),
        (
            TraitKind::Accessor {
                getter: inherited_getter,
                setter: inherited_setter,
            },
            TraitDescriptor::Accessor { getter, setter },
        ) => Ok(TraitKind::Accessor {
            getter: getter.or_else(|| inherited_getter.clone()),
            setter: setter.or_else(|| inherited_setter.clone()),
        }),
        (kind, descriptor) => Err(ErrorType::DefinitionError(format!(
            "Incompatible override of {} in class {}: {} cannot replace inherited {} from {}",
            inherited.name(),
            class_name,
            descriptor.kind_name(),
            kind.kind_name(),
            inherited.declared_by()
        ))),
    }
}

/// Builder for a class definition request.
pub struct ClassDefinition {
    name: QualifiedName,
    superclass: Option<ClassRef>,
    constructor: Option<MethodFn>,
    traits: Vec<(QualifiedName, TraitDescriptor)>,
    instance_kind: Option<InstanceKind>,
    dynamic: bool,
}
impl ClassDefinition {
    pub fn new(name: QualifiedName) -> Self {
        ClassDefinition {
            name,
            superclass: None,
            constructor: None,
            traits: Vec::new(),
            instance_kind: None,
            dynamic: false,
        }
    }

    pub fn extends(mut self, superclass: &ClassRef) -> Self {
        self.superclass = Some(superclass.clone());
        self
    }

    pub fn with_constructor(mut self, constructor: MethodFn) -> Self {
        self.constructor = Some(constructor);
        self
    }

    pub fn add_trait(mut self, name: QualifiedName, descriptor: TraitDescriptor) -> Self {
        self.traits.push((name, descriptor));
        self
    }

    pub fn add_traits(mut self, traits: Vec<(QualifiedName, TraitDescriptor)>) -> Self {
        self.traits.extend(traits);
        self
    }

    /// Add a native method in the given namespace.
    pub fn add_native_method(self, ns: &Namespace, name: &str, func: NativeFn) -> Self {
        self.add_trait(
            QualifiedName::new(ns.clone(), name),
            TraitDescriptor::Method(MethodFn::Native(func)),
        )
    }

    /// Add a native read-only accessor in the given namespace.
    pub fn add_native_getter(self, ns: &Namespace, name: &str, func: NativeFn) -> Self {
        self.add_trait(
            QualifiedName::new(ns.clone(), name),
            TraitDescriptor::Accessor {
                getter: Some(MethodFn::Native(func)),
                setter: None,
            },
        )
    }

    pub fn with_instance_kind(mut self, kind: InstanceKind) -> Self {
        self.instance_kind = Some(kind);
        self
    }

    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }
}

/// Runs `class`'s constructor (own or inherited) against an already
/// allocated receiver. Constructors use this to chain to their superclass.
pub fn call_constructor(
    ctx: &mut EvalContext,
    class: &Class,
    this: Value,
    args: Vec<Value>,
) -> Result<(), ErrorType> {
    if let Some(ctor) = class.constructor() {
        ctor.call(ctx, this, args)?;
    }
    Ok(())
}
