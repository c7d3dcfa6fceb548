//! E4X data model.
//!
//! Nodes of one XML tree live in an arena (`XmlTree`) and refer to each
//! other by index. Children are owned through their parent's child list;
//! the parent link is a plain index used for lookups only. A value handle
//! (`XmlRef`) pairs the shared store with a node index. Slots of detached
//! subtrees that no handle can reach any more are recycled.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use crate::parser::util::{escape_attribute, escape_text, spaces};
use crate::runner::ds::error::ErrorType;
use crate::runner::ds::namespace::{Namespace, QualifiedName, PUBLIC_NS, XML_NAMESPACE_URI};
use crate::runner::ds::operations::type_conversion::to_string;
use crate::runner::ds::value::Value;

pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlNodeKind {
    Document,
    Element,
    Text,
    Attribute,
    Comment,
    ProcessingInstruction,
}
impl XmlNodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            XmlNodeKind::Document => "document",
            XmlNodeKind::Element => "element",
            XmlNodeKind::Text => "text",
            XmlNodeKind::Attribute => "attribute",
            XmlNodeKind::Comment => "comment",
            XmlNodeKind::ProcessingInstruction => "processing-instruction",
        }
    }
}

/// `xmlns="uri"` (prefix `None`) or `xmlns:prefix="uri"`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDeclaration {
    pub prefix: Option<String>,
    pub uri: String,
}

#[derive(Debug, Clone)]
pub struct XmlNodeData {
    kind: XmlNodeKind,
    name: Option<QualifiedName>,
    /// Prefix as written, used when serializing.
    prefix: Option<String>,
    /// Character data of text, comment and attribute nodes; data of a
    /// processing instruction.
    value: String,
    children: Vec<NodeId>,
    attributes: Vec<NodeId>,
    declarations: Vec<NamespaceDeclaration>,
    parent: Option<NodeId>,
}
impl XmlNodeData {
    pub fn new(kind: XmlNodeKind) -> Self {
        XmlNodeData {
            kind,
            name: None,
            prefix: None,
            value: String::new(),
            children: Vec::new(),
            attributes: Vec::new(),
            declarations: Vec::new(),
            parent: None,
        }
    }

    pub fn named(kind: XmlNodeKind, name: QualifiedName, prefix: Option<String>) -> Self {
        XmlNodeData {
            name: Some(name),
            prefix,
            ..XmlNodeData::new(kind)
        }
    }

    pub fn with_value(kind: XmlNodeKind, value: impl Into<String>) -> Self {
        XmlNodeData {
            value: value.into(),
            ..XmlNodeData::new(kind)
        }
    }

    pub fn set_name(&mut self, name: QualifiedName, prefix: Option<String>) {
        self.name = Some(name);
        self.prefix = prefix;
    }

    pub fn set_value(&mut self, value: String) {
        self.value = value;
    }

    pub fn kind(&self) -> XmlNodeKind {
        self.kind
    }

    pub fn name(&self) -> Option<&QualifiedName> {
        self.name.as_ref()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn attributes(&self) -> &[NodeId] {
        &self.attributes
    }

    pub fn declarations(&self) -> &[NamespaceDeclaration] {
        &self.declarations
    }

    fn qualified_tag(&self) -> String {
        let local = self.name.as_ref().map(|n| n.local_name()).unwrap_or("");
        match &self.prefix {
            Some(p) => format!("{}:{}", p, local),
            None => local.to_string(),
        }
    }

    fn is_element_named(&self, filter: Option<&Namespace>, local_name: &str) -> bool {
        self.kind == XmlNodeKind::Element
            && self
                .name
                .as_ref()
                .map_or(false, |n| n.matches(filter, local_name))
    }
}

#[derive(Debug, Clone, Default)]
pub struct XmlTree {
    nodes: Vec<XmlNodeData>,
    free: Vec<NodeId>,
}
impl XmlTree {
    pub fn new() -> Self {
        XmlTree::default()
    }

    /// Number of arena slots, in use or waiting for reuse.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Slots currently holding a node.
    pub fn live_len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn alloc(&mut self, data: XmlNodeData) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = data;
                id
            }
            None => {
                self.nodes.push(data);
                self.nodes.len() - 1
            }
        }
    }

    /// Topmost ancestor of `id`.
    fn component_root(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(p) = self.nodes[current].parent {
            current = p;
        }
        current
    }

    /// `id` and everything below it, attributes included.
    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            let node = &self.nodes[n];
            stack.extend(node.attributes.iter().copied());
            stack.extend(node.children.iter().copied());
        }
        out
    }

    fn free_nodes(&mut self, ids: Vec<NodeId>) {
        for id in ids {
            self.nodes[id] = XmlNodeData::new(XmlNodeKind::Text);
            self.free.push(id);
        }
    }

    pub fn node(&self, id: NodeId) -> &XmlNodeData {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut XmlNodeData {
        &mut self.nodes[id]
    }

    pub fn declare(&mut self, id: NodeId, declaration: NamespaceDeclaration) {
        self.nodes[id].declarations.push(declaration);
    }

    /// Namespace uri bound to `prefix` (`None` for the default namespace) at
    /// `id`, searching outward through ancestors. The nearest declaration wins.
    pub fn lookup_namespace(&self, id: NodeId, prefix: Option<&str>) -> Option<&str> {
        if prefix == Some("xml") {
            return Some(XML_NAMESPACE_URI);
        }
        let mut current = Some(id);
        while let Some(n) = current {
            let node = &self.nodes[n];
            if let Some(d) = node
                .declarations
                .iter()
                .find(|d| d.prefix.as_deref() == prefix)
            {
                return Some(&d.uri);
            }
            current = node.parent;
        }
        None
    }

    /// Prefix in scope at `id` that is bound to `uri`, if any. The outer
    /// option is absent when no prefix (and no default) maps to `uri`.
    pub fn lookup_prefix(&self, id: NodeId, uri: &str) -> Option<Option<String>> {
        let mut current = Some(id);
        while let Some(n) = current {
            let node = &self.nodes[n];
            for d in &node.declarations {
                if d.uri == uri && self.lookup_namespace(id, d.prefix.as_deref()) == Some(uri) {
                    return Some(d.prefix.clone());
                }
            }
            current = node.parent;
        }
        None
    }

    /// Every declaration visible at `id`, nearest first, one per prefix.
    pub fn in_scope_declarations(&self, id: NodeId) -> Vec<NamespaceDeclaration> {
        let mut seen: Vec<NamespaceDeclaration> = Vec::new();
        let mut current = Some(id);
        while let Some(n) = current {
            let node = &self.nodes[n];
            for d in &node.declarations {
                if !seen.iter().any(|s| s.prefix == d.prefix) {
                    seen.push(d.clone());
                }
            }
            current = node.parent;
        }
        seen
    }

    /// True when `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.nodes[n].parent;
        }
        false
    }

    pub fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child].parent.take() {
            let p = &mut self.nodes[parent];
            p.children.retain(|&c| c != child);
            p.attributes.retain(|&c| c != child);
        }
    }

    /// Moves `child` under `parent` at `index` (or at the end).
    pub fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        let children = &mut self.nodes[parent].children;
        match index {
            Some(i) if i < children.len() => children.insert(i, child),
            _ => children.push(child),
        }
    }

    pub fn attach_attribute(&mut self, element: NodeId, attribute: NodeId) {
        self.detach(attribute);
        self.nodes[attribute].parent = Some(element);
        self.nodes[element].attributes.push(attribute);
    }

    fn copy_into(&self, dest: &mut XmlTree, id: NodeId, parent: Option<NodeId>) -> NodeId {
        let src = &self.nodes[id];
        let new_id = dest.alloc(XmlNodeData {
            kind: src.kind,
            name: src.name.clone(),
            prefix: src.prefix.clone(),
            value: src.value.clone(),
            children: Vec::new(),
            attributes: Vec::new(),
            declarations: src.declarations.clone(),
            parent,
        });
        for &a in &src.attributes {
            let c = self.copy_into(dest, a, Some(new_id));
            dest.nodes[new_id].attributes.push(c);
        }
        for &ch in &src.children {
            let c = self.copy_into(dest, ch, Some(new_id));
            dest.nodes[new_id].children.push(c);
        }
        new_id
    }

    /// Standalone deep copy of the subtree at `id`, rooted at index 0. The
    /// copy's root carries every namespace declaration in scope at `id`.
    pub fn copy_subtree(&self, id: NodeId) -> XmlTree {
        let mut tree = XmlTree::new();
        let root = self.copy_into(&mut tree, id, None);
        if self.nodes[id].kind == XmlNodeKind::Element {
            tree.nodes[root].declarations = self.in_scope_declarations(id);
        }
        tree
    }

    /// Deep-copies `src`'s subtree at `src_id` into this arena, detached.
    pub fn graft(&mut self, src: &XmlTree, src_id: NodeId) -> NodeId {
        src.copy_into(self, src_id, None)
    }

    /// Drops declarations on `id` that repeat what its parent already has in scope.
    fn prune_redundant_declarations(&mut self, id: NodeId) {
        let parent = match self.nodes[id].parent {
            Some(p) => p,
            None => return,
        };
        let declarations = std::mem::take(&mut self.nodes[id].declarations);
        let kept = declarations
            .into_iter()
            .filter(|d| self.lookup_namespace(parent, d.prefix.as_deref()) != Some(d.uri.as_str()))
            .collect();
        self.nodes[id].declarations = kept;
    }

    pub fn has_simple_content(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        match node.kind {
            XmlNodeKind::Comment | XmlNodeKind::ProcessingInstruction => false,
            XmlNodeKind::Document => false,
            XmlNodeKind::Element => !node
                .children
                .iter()
                .any(|&c| self.nodes[c].kind == XmlNodeKind::Element),
            _ => true,
        }
    }

    /// E4X string value: character data for simple content, markup otherwise.
    pub fn string_value(&self, id: NodeId) -> String {
        let node = &self.nodes[id];
        match node.kind {
            XmlNodeKind::Text | XmlNodeKind::Attribute => node.value.clone(),
            XmlNodeKind::Element if self.has_simple_content(id) => node
                .children
                .iter()
                .filter(|&&c| self.nodes[c].kind == XmlNodeKind::Text)
                .map(|&c| self.nodes[c].value.as_str())
                .collect(),
            _ => {
                let mut out = String::new();
                self.serialize(id, false, 0, 0, &mut out);
                out
            }
        }
    }

    pub fn serialize(&self, id: NodeId, pretty: bool, indent: usize, level: usize, out: &mut String) {
        let node = &self.nodes[id];
        match node.kind {
            XmlNodeKind::Text => {
                if pretty {
                    out.push_str(&escape_text(node.value.trim()));
                } else {
                    out.push_str(&escape_text(&node.value));
                }
            }
            XmlNodeKind::Attribute => out.push_str(&escape_attribute(&node.value)),
            XmlNodeKind::Comment => {
                out.push_str("<!--");
                out.push_str(&node.value);
                out.push_str("-->");
            }
            XmlNodeKind::ProcessingInstruction => {
                out.push_str("<?");
                out.push_str(node.name.as_ref().map(|n| n.local_name()).unwrap_or(""));
                if !node.value.is_empty() {
                    out.push(' ');
                    out.push_str(&node.value);
                }
                out.push_str("?>");
            }
            XmlNodeKind::Document => {
                let mut first = true;
                for &c in &node.children {
                    if !first && pretty {
                        out.push('\n');
                    }
                    first = false;
                    self.serialize(c, pretty, indent, level, out);
                }
            }
            XmlNodeKind::Element => self.serialize_element(id, pretty, indent, level, out),
        }
    }

    fn serialize_element(&self, id: NodeId, pretty: bool, indent: usize, level: usize, out: &mut String) {
        let node = &self.nodes[id];
        let tag = node.qualified_tag();
        out.push('<');
        out.push_str(&tag);
        for d in &node.declarations {
            match &d.prefix {
                Some(p) => out.push_str(&format!(" xmlns:{}=\"{}\"", p, escape_attribute(&d.uri))),
                None => out.push_str(&format!(" xmlns=\"{}\"", escape_attribute(&d.uri))),
            }
        }
        for &a in &node.attributes {
            let attr = &self.nodes[a];
            out.push_str(&format!(
                " {}=\"{}\"",
                attr.qualified_tag(),
                escape_attribute(&attr.value)
            ));
        }
        let children: Vec<NodeId> = node
            .children
            .iter()
            .copied()
            .filter(|&c| {
                !(pretty
                    && self.nodes[c].kind == XmlNodeKind::Text
                    && self.nodes[c].value.trim().is_empty())
            })
            .collect();
        if children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        let inline = !pretty
            || children
                .iter()
                .all(|&c| self.nodes[c].kind == XmlNodeKind::Text);
        if inline {
            for &c in &children {
                self.serialize(c, pretty, indent, level + 1, out);
            }
        } else {
            for &c in &children {
                out.push('\n');
                out.push_str(&spaces((level + 1) * indent));
                self.serialize(c, pretty, indent, level + 1, out);
            }
            out.push('\n');
            out.push_str(&spaces(level * indent));
        }
        out.push_str("</");
        out.push_str(&tag);
        out.push('>');
    }
}

/// An arena shared by handles, with a count of live handles per node.
///
/// Every node a script can still reach is reachable from some handle, so a
/// parentless subtree without any handle into it is garbage.
#[derive(Debug, Default)]
pub struct XmlStore {
    tree: RefCell<XmlTree>,
    handles: RefCell<HashMap<NodeId, usize>>,
}
impl XmlStore {
    pub fn new(tree: XmlTree) -> Rc<XmlStore> {
        Rc::new(XmlStore {
            tree: RefCell::new(tree),
            handles: RefCell::new(HashMap::new()),
        })
    }

    pub fn borrow(&self) -> Ref<'_, XmlTree> {
        self.tree.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, XmlTree> {
        self.tree.borrow_mut()
    }

    fn retain(&self, id: NodeId) {
        *self.handles.borrow_mut().entry(id).or_insert(0) += 1;
    }

    /// Drops one handle to `id`. True when it was the last one.
    fn release(&self, id: NodeId) -> bool {
        let mut handles = self.handles.borrow_mut();
        match handles.get_mut(&id) {
            Some(n) if *n > 1 => {
                *n -= 1;
                false
            }
            Some(_) => {
                handles.remove(&id);
                true
            }
            None => false,
        }
    }

    /// Recycles the subtree containing `id` once it is detached and no
    /// handle points into it. Skipped while the arena is borrowed.
    pub fn reclaim(&self, id: NodeId) {
        let mut tree = match self.tree.try_borrow_mut() {
            Ok(tree) => tree,
            Err(_) => return,
        };
        let root = tree.component_root(id);
        if self.handles.borrow().contains_key(&root) {
            return;
        }
        let members = tree.subtree(root);
        if members
            .iter()
            .any(|m| self.handles.borrow().contains_key(m))
        {
            return;
        }
        tracing::trace!(freed = members.len(), "reclaimed detached XML nodes");
        tree.free_nodes(members);
    }
}

/// Handle to one node of a shared XML tree.
pub struct XmlRef {
    tree: Rc<XmlStore>,
    id: NodeId,
}
impl Clone for XmlRef {
    fn clone(&self) -> Self {
        XmlRef::new(self.tree.clone(), self.id)
    }
}
impl Drop for XmlRef {
    fn drop(&mut self) {
        if self.tree.release(self.id) {
            self.tree.reclaim(self.id);
        }
    }
}
impl PartialEq for XmlRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
    }
}
impl XmlRef {
    pub fn new(tree: Rc<XmlStore>, id: NodeId) -> Self {
        tree.retain(id);
        XmlRef { tree, id }
    }

    /// Single-node tree.
    pub fn new_node(data: XmlNodeData) -> Self {
        let mut tree = XmlTree::new();
        let id = tree.alloc(data);
        XmlRef::new(XmlStore::new(tree), id)
    }

    pub fn tree(&self) -> &Rc<XmlStore> {
        &self.tree
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    fn handle(&self, id: NodeId) -> XmlRef {
        XmlRef::new(self.tree.clone(), id)
    }

    pub fn node_kind(&self) -> XmlNodeKind {
        self.tree.borrow().node(self.id).kind
    }

    pub fn name(&self) -> Option<QualifiedName> {
        self.tree.borrow().node(self.id).name.clone()
    }

    pub fn value(&self) -> String {
        self.tree.borrow().node(self.id).value.clone()
    }

    /// Prefix the name was written with, if any.
    pub fn prefix(&self) -> Option<String> {
        self.tree.borrow().node(self.id).prefix.clone()
    }

    pub fn parent(&self) -> Option<XmlRef> {
        let parent = self.tree.borrow().node(self.id).parent;
        parent.map(|p| self.handle(p))
    }

    pub fn children(&self) -> Vec<XmlRef> {
        let ids = self.tree.borrow().node(self.id).children.clone();
        ids.into_iter().map(|c| self.handle(c)).collect()
    }

    pub fn attributes(&self) -> Vec<XmlRef> {
        let ids = self.tree.borrow().node(self.id).attributes.clone();
        ids.into_iter().map(|c| self.handle(c)).collect()
    }

    /// Direct element children whose name matches, in document order.
    pub fn child_elements(&self, filter: Option<&Namespace>, local_name: &str) -> Vec<XmlRef> {
        let tree = self.tree.borrow();
        tree.node(self.id)
            .children
            .iter()
            .copied()
            .filter(|&c| tree.node(c).is_element_named(filter, local_name))
            .map(|c| self.handle(c))
            .collect()
    }

    /// Attribute matching the filter and local name. A wildcard filter that
    /// matches attributes in two or more namespaces is ambiguous.
    pub fn find_attribute(
        &self,
        filter: Option<&Namespace>,
        local_name: &str,
    ) -> Result<Option<XmlRef>, ErrorType> {
        let tree = self.tree.borrow();
        let mut found: Option<NodeId> = None;
        for &a in &tree.node(self.id).attributes {
            let matches = tree
                .node(a)
                .name
                .as_ref()
                .map_or(false, |n| n.matches(filter, local_name));
            if !matches {
                continue;
            }
            if let Some(first) = found {
                return Err(ErrorType::AmbiguousReferenceError(format!(
                    "Ambiguous reference to attribute {}: declared as {} and {}",
                    local_name,
                    tree.node(first).qualified_tag(),
                    tree.node(a).qualified_tag()
                )));
            }
            found = Some(a);
        }
        Ok(found.map(|a| self.handle(a)))
    }

    pub fn child_index(&self) -> Option<usize> {
        let tree = self.tree.borrow();
        let parent = tree.node(self.id).parent?;
        tree.node(parent).children.iter().position(|&c| c == self.id)
    }

    pub fn has_simple_content(&self) -> bool {
        self.tree.borrow().has_simple_content(self.id)
    }

    pub fn to_string_value(&self) -> String {
        self.tree.borrow().string_value(self.id)
    }

    pub fn to_xml_string(&self, pretty: bool, indent: usize) -> String {
        let mut out = String::new();
        self.tree.borrow().serialize(self.id, pretty, indent, 0, &mut out);
        out
    }

    pub fn lookup_namespace(&self, prefix: Option<&str>) -> Option<String> {
        self.tree
            .borrow()
            .lookup_namespace(self.id, prefix)
            .map(|s| s.to_string())
    }

    /// Deep copy into a fresh tree.
    pub fn copy(&self) -> XmlRef {
        let tree = self.tree.borrow().copy_subtree(self.id);
        XmlRef::new(XmlStore::new(tree), 0)
    }

    fn check_container(&self) -> Result<(), ErrorType> {
        match self.node_kind() {
            XmlNodeKind::Element | XmlNodeKind::Document => Ok(()),
            k => Err(ErrorType::TypeError(format!(
                "Cannot add children to a node of kind {}",
                k.as_str()
            ))),
        }
    }

    /// Inserts `child` at `index` (or appends). A node of this same tree is
    /// re-parented; a node of another tree is deep-copied in.
    pub fn insert_child(&self, child: &XmlRef, index: Option<usize>) -> Result<(), ErrorType> {
        self.check_container()?;
        match child.node_kind() {
            XmlNodeKind::Attribute => {
                return Err(ErrorType::TypeError(
                    "An attribute cannot be added as a child".to_string(),
                ))
            }
            XmlNodeKind::Document => {
                let mut at = index;
                for c in child.children() {
                    self.insert_child(&c, at)?;
                    at = at.map(|i| i + 1);
                }
                return Ok(());
            }
            _ => {}
        }
        let id = if Rc::ptr_eq(&self.tree, &child.tree) {
            if self.tree.borrow().is_ancestor_or_self(child.id, self.id) {
                return Err(ErrorType::TypeError(
                    "A node cannot be added to its own subtree".to_string(),
                ));
            }
            child.id
        } else {
            let snapshot = child.tree.borrow().copy_subtree(child.id);
            self.tree.borrow_mut().graft(&snapshot, 0)
        };
        let mut tree = self.tree.borrow_mut();
        tree.attach(self.id, id, index);
        tree.prune_redundant_declarations(id);
        Ok(())
    }

    pub fn append_value(&self, value: &Value) -> Result<(), ErrorType> {
        match value {
            Value::Xml(x) => self.insert_child(x, None),
            Value::XmlList(l) => {
                for item in l.items() {
                    self.insert_child(item, None)?;
                }
                Ok(())
            }
            other => {
                self.check_container()?;
                let text = to_string(other);
                let mut tree = self.tree.borrow_mut();
                let id = tree.alloc(XmlNodeData::with_value(XmlNodeKind::Text, text));
                tree.attach(self.id, id, None);
                Ok(())
            }
        }
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&self, text: String) -> Result<(), ErrorType> {
        self.check_container()?;
        let old = {
            let mut tree = self.tree.borrow_mut();
            let old = tree.node(self.id).children.clone();
            for &c in &old {
                tree.detach(c);
            }
            old
        };
        for c in old {
            self.tree.reclaim(c);
        }
        if !text.is_empty() {
            let mut tree = self.tree.borrow_mut();
            let id = tree.alloc(XmlNodeData::with_value(XmlNodeKind::Text, text));
            tree.attach(self.id, id, None);
        }
        Ok(())
    }

    /// Detaches element children matching the name. Returns how many went.
    pub fn remove_children(&self, filter: Option<&Namespace>, local_name: &str) -> usize {
        let matches = self.child_elements(filter, local_name);
        let mut tree = self.tree.borrow_mut();
        for m in &matches {
            tree.detach(m.id);
        }
        matches.len()
    }

    /// Name for a node created under this element: the given namespace (or,
    /// without one, the unnamed public namespace for elements and the default
    /// namespace in scope for attributes) with a prefix or declaration that
    /// keeps the serialized form faithful.
    ///
    /// An attribute in no namespace under a non-empty default stays
    /// unprefixed, so it reads back in the default namespace once reparsed.
    fn name_for_new_node(
        &self,
        filter: Option<&Namespace>,
        local_name: &str,
        is_attribute: bool,
    ) -> (QualifiedName, Option<String>, Option<NamespaceDeclaration>) {
        let tree = self.tree.borrow();
        let default = tree.lookup_namespace(self.id, None).unwrap_or("");
        let ns = match filter {
            Some(ns) => Namespace::xml(ns.uri()),
            None if is_attribute => Namespace::xml(default),
            None => PUBLIC_NS.clone(),
        };
        let name = QualifiedName::new(ns.clone(), local_name);
        if ns.uri().is_empty() {
            let decl = if !is_attribute && !default.is_empty() {
                Some(NamespaceDeclaration {
                    prefix: None,
                    uri: String::new(),
                })
            } else {
                None
            };
            return (name, None, decl);
        }
        match tree.lookup_prefix(self.id, ns.uri()) {
            Some(Some(p)) => (name, Some(p), None),
            Some(None) => (name, None, None),
            _ => {
                if is_attribute {
                    let mut n = 0;
                    let prefix = loop {
                        let candidate = format!("ns{}", n);
                        if tree.lookup_namespace(self.id, Some(&candidate)).is_none() {
                            break candidate;
                        }
                        n += 1;
                    };
                    let decl = NamespaceDeclaration {
                        prefix: Some(prefix.clone()),
                        uri: ns.uri().to_string(),
                    };
                    (name, Some(prefix), Some(decl))
                } else {
                    let decl = NamespaceDeclaration {
                        prefix: None,
                        uri: ns.uri().to_string(),
                    };
                    (name, None, Some(decl))
                }
            }
        }
    }

    /// E4X child assignment: the first matching element takes the value, the
    /// other matches are removed; with no match a new child is appended.
    pub fn set_children(
        &self,
        filter: Option<&Namespace>,
        local_name: &str,
        value: &Value,
    ) -> Result<(), ErrorType> {
        if self.node_kind() != XmlNodeKind::Element {
            return Err(ErrorType::TypeError(format!(
                "Cannot assign child {} of a {} node",
                local_name,
                self.node_kind().as_str()
            )));
        }
        if local_name == "*" {
            return Err(ErrorType::TypeError(
                "Cannot assign to every child at once".to_string(),
            ));
        }
        let matches = self.child_elements(filter, local_name);
        match matches.split_first() {
            None => match value {
                Value::Xml(_) | Value::XmlList(_) => self.append_value(value),
                other => {
                    let (name, prefix, decl) = self.name_for_new_node(filter, local_name, false);
                    let element = {
                        let mut tree = self.tree.borrow_mut();
                        let id = tree.alloc(XmlNodeData::named(XmlNodeKind::Element, name, prefix));
                        if let Some(d) = decl {
                            tree.declare(id, d);
                        }
                        tree.attach(self.id, id, None);
                        self.handle(id)
                    };
                    element.set_text(to_string(other))
                }
            },
            Some((first, rest)) => {
                {
                    let mut tree = self.tree.borrow_mut();
                    for r in rest {
                        tree.detach(r.id);
                    }
                }
                match value {
                    Value::Xml(_) | Value::XmlList(_) => {
                        let index = first.child_index();
                        self.tree.borrow_mut().detach(first.id);
                        match value {
                            Value::Xml(x) => self.insert_child(x, index),
                            Value::XmlList(l) => {
                                let mut at = index;
                                for item in l.items() {
                                    self.insert_child(item, at)?;
                                    at = at.map(|i| i + 1);
                                }
                                Ok(())
                            }
                            _ => Ok(()),
                        }
                    }
                    other => first.set_text(to_string(other)),
                }
            }
        }
    }

    /// Updates the matching attribute or adds a new one.
    pub fn set_attribute(
        &self,
        filter: Option<&Namespace>,
        local_name: &str,
        value: String,
    ) -> Result<(), ErrorType> {
        if self.node_kind() != XmlNodeKind::Element {
            return Err(ErrorType::TypeError(format!(
                "Cannot set attribute {} on a {} node",
                local_name,
                self.node_kind().as_str()
            )));
        }
        if let Some(existing) = self.find_attribute(filter, local_name)? {
            self.tree.borrow_mut().node_mut(existing.id).value = value;
            return Ok(());
        }
        let (name, prefix, decl) = self.name_for_new_node(filter, local_name, true);
        let mut tree = self.tree.borrow_mut();
        if let Some(d) = decl {
            tree.declare(self.id, d);
        }
        let mut data = XmlNodeData::named(XmlNodeKind::Attribute, name, prefix);
        data.value = value;
        data.parent = Some(self.id);
        let id = tree.alloc(data);
        tree.node_mut(self.id).attributes.push(id);
        Ok(())
    }
}

/// Ordered result of a multi-match query.
#[derive(Clone, PartialEq, Default)]
pub struct XmlList {
    items: Vec<XmlRef>,
}
impl XmlList {
    pub fn new(items: Vec<XmlRef>) -> Self {
        XmlList { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[XmlRef] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Result<XmlRef, ErrorType> {
        self.items.get(index).cloned().ok_or_else(|| {
            ErrorType::RangeError(format!(
                "Index {} is out of range {}",
                index,
                self.items.len()
            ))
        })
    }

    /// Matching element children of every item, concatenated in order.
    pub fn child_elements(&self, filter: Option<&Namespace>, local_name: &str) -> XmlList {
        XmlList::new(
            self.items
                .iter()
                .flat_map(|x| x.child_elements(filter, local_name))
                .collect(),
        )
    }

    pub fn has_simple_content(&self) -> bool {
        match self.items.len() {
            0 => true,
            1 => self.items[0].has_simple_content(),
            _ => !self
                .items
                .iter()
                .any(|x| x.node_kind() == XmlNodeKind::Element),
        }
    }

    pub fn to_string_value(&self) -> String {
        if self.has_simple_content() {
            self.items
                .iter()
                .filter(|x| {
                    !matches!(
                        x.node_kind(),
                        XmlNodeKind::Comment | XmlNodeKind::ProcessingInstruction
                    )
                })
                .map(|x| x.to_string_value())
                .collect()
        } else {
            self.to_xml_string(false, 0)
        }
    }

    pub fn to_xml_string(&self, pretty: bool, indent: usize) -> String {
        self.items
            .iter()
            .map(|x| x.to_xml_string(pretty, indent))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub type XmlListRef = Rc<XmlList>;
