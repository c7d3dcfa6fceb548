//! Trait descriptors and per-class trait tables.
//!
//! A trait table is keyed by the full qualified name, so one local name may
//! carry a distinct trait per namespace. A secondary index by local name
//! keeps wildcard lookups independent of table size and inheritance depth.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::runner::ds::error::ErrorType;
use crate::runner::ds::function::MethodFn;
use crate::runner::ds::namespace::{Namespace, QualifiedName};
use crate::runner::ds::value::Value;

/// What a class definition declares for one qualified name.
#[derive(Clone)]
pub enum TraitDescriptor {
    Method(MethodFn),
    Variable {
        default: Value,
        read_only: bool,
    },
    Accessor {
        getter: Option<MethodFn>,
        setter: Option<MethodFn>,
    },
}
impl TraitDescriptor {
    pub fn kind_name(&self) -> &'static str {
        match self {
            TraitDescriptor::Method(_) => "method",
            TraitDescriptor::Variable { .. } => "variable",
            TraitDescriptor::Accessor { .. } => "accessor",
        }
    }
}

/// Sealed form of a descriptor inside a class's table.
#[derive(Clone, PartialEq)]
pub enum TraitKind {
    Method(MethodFn),
    Variable {
        slot: usize,
        read_only: bool,
    },
    Accessor {
        getter: Option<MethodFn>,
        setter: Option<MethodFn>,
    },
}
impl TraitKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            TraitKind::Method(_) => "method",
            TraitKind::Variable { .. } => "variable",
            TraitKind::Accessor { .. } => "accessor",
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct Trait {
    name: QualifiedName,
    kind: TraitKind,
    /// Class that declared (or last overrode) this trait.
    declared_by: QualifiedName,
}
impl Trait {
    pub fn new(name: QualifiedName, kind: TraitKind, declared_by: QualifiedName) -> Self {
        Trait {
            name,
            kind,
            declared_by,
        }
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn kind(&self) -> &TraitKind {
        &self.kind
    }

    pub fn declared_by(&self) -> &QualifiedName {
        &self.declared_by
    }
}

#[derive(Clone, Default)]
pub struct TraitTable {
    entries: IndexMap<QualifiedName, Trait>,
    by_local_name: HashMap<String, Vec<usize>>,
}
impl TraitTable {
    pub fn new() -> Self {
        TraitTable::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&Trait> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trait> {
        self.entries.values()
    }

    /// Inserts or replaces the trait stored under its exact qualified name.
    /// A replaced trait keeps its position in declaration order.
    pub fn insert(&mut self, t: Trait) {
        let (index, previous) = self.entries.insert_full(t.name.clone(), t);
        if previous.is_none() {
            let local = self.entries[index].name.local_name().to_string();
            self.by_local_name.entry(local).or_default().push(index);
        }
    }

    fn indices(&self, local_name: &str) -> &[usize] {
        self.by_local_name
            .get(local_name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Candidates for `local_name` under the namespace filter, in declaration order.
    pub fn candidates(&self, filter: Option<&Namespace>, local_name: &str) -> Vec<&Trait> {
        self.indices(local_name)
            .iter()
            .map(|&i| &self.entries[i])
            .filter(|t| filter.map_or(true, |ns| t.name.namespace() == ns))
            .collect()
    }

    pub fn get_index(&self, index: usize) -> Option<&Trait> {
        self.entries.get_index(index).map(|(_, t)| t)
    }

    /// Position of the single trait matching the filter and local name.
    ///
    /// Returns `Ok(None)` when nothing matches. A wildcard filter that
    /// matches traits in two or more namespaces is ambiguous.
    pub fn resolve_index(
        &self,
        filter: Option<&Namespace>,
        local_name: &str,
    ) -> Result<Option<usize>, ErrorType> {
        let mut found: Option<usize> = None;
        for &i in self.indices(local_name) {
            let t = &self.entries[i];
            if !filter.map_or(true, |ns| t.name.namespace() == ns) {
                continue;
            }
            if let Some(first) = found {
                return Err(ErrorType::AmbiguousReferenceError(format!(
                    "Ambiguous reference to {}: declared as {} and {}",
                    local_name,
                    self.entries[first].name(),
                    t.name()
                )));
            }
            found = Some(i);
        }
        Ok(found)
    }

    pub fn resolve(
        &self,
        filter: Option<&Namespace>,
        local_name: &str,
    ) -> Result<Option<&Trait>, ErrorType> {
        Ok(self
            .resolve_index(filter, local_name)?
            .map(|i| &self.entries[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::namespace::PUBLIC_NS;

    fn var_trait(ns: &Namespace, local: &str, slot: usize) -> Trait {
        Trait::new(
            QualifiedName::new(ns.clone(), local),
            TraitKind::Variable {
                slot,
                read_only: false,
            },
            QualifiedName::new(PUBLIC_NS.clone(), "Owner"),
        )
    }

    #[test]
    fn test_same_local_name_in_two_namespaces() {
        let other = Namespace::explicit("urn:other");
        let mut table = TraitTable::new();
        table.insert(var_trait(&PUBLIC_NS, "x", 0));
        table.insert(var_trait(&other, "x", 1));
        assert_eq!(table.len(), 2);
        assert_eq!(table.candidates(None, "x").len(), 2);

        let t = table.resolve(Some(&other), "x").unwrap().unwrap();
        assert!(t.kind() == &TraitKind::Variable { slot: 1, read_only: false });

        match table.resolve(None, "x") {
            Err(ErrorType::AmbiguousReferenceError(_)) => {}
            _ => panic!("expected ambiguity"),
        }
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut table = TraitTable::new();
        table.insert(var_trait(&PUBLIC_NS, "a", 0));
        table.insert(var_trait(&PUBLIC_NS, "b", 1));
        table.insert(var_trait(&PUBLIC_NS, "a", 7));
        assert_eq!(table.len(), 2);
        let names: Vec<_> = table.iter().map(|t| t.name().local_name().to_string()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(table.candidates(None, "a").len(), 1);
        assert!(
            table.resolve(None, "a").unwrap().unwrap().kind()
                == &TraitKind::Variable { slot: 7, read_only: false }
        );
    }

    #[test]
    fn test_resolve_missing() {
        let table = TraitTable::new();
        assert!(table.resolve(None, "nothing").unwrap().is_none());
    }
}
