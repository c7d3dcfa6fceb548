//! Builds XML trees out of parsed markup, resolving prefixes against the
//! declarations in scope and applying the XML class settings.

use crate::parser::ast::{ElementData, MarkupNode, RawName};
use crate::parser::{describe_error, XmlParser};
use crate::runner::config::XmlSettings;
use crate::runner::ds::error::ErrorType;
use crate::runner::ds::namespace::{Namespace, QualifiedName, PUBLIC_NS};
use crate::runner::ds::xml::{
    NamespaceDeclaration, NodeId, XmlList, XmlNodeData, XmlNodeKind, XmlRef, XmlStore, XmlTree,
};

struct TreeBuilder<'s> {
    tree: XmlTree,
    settings: &'s XmlSettings,
}

impl<'s> TreeBuilder<'s> {
    fn new(settings: &'s XmlSettings) -> Self {
        TreeBuilder {
            tree: XmlTree::new(),
            settings,
        }
    }

    /// Prefixed names use the nearest binding of the prefix; unprefixed element
    /// and attribute names alike take the nearest default declaration.
    fn resolve(&self, scope: NodeId, name: &RawName) -> Result<Namespace, ErrorType> {
        match name.prefix.as_deref() {
            Some("xmlns") => Err(ErrorType::SyntaxError(format!(
                "Reserved prefix xmlns used in {}",
                name
            ))),
            Some(prefix) => match self.tree.lookup_namespace(scope, Some(prefix)) {
                Some(uri) => Ok(Namespace::xml(uri)),
                None => Err(ErrorType::SyntaxError(format!(
                    "Unbound namespace prefix {} in {}",
                    prefix, name
                ))),
            },
            None => Ok(Namespace::xml(
                self.tree.lookup_namespace(scope, None).unwrap_or(""),
            )),
        }
    }

    /// Adds `node` under `parent` (or as a detached top-level node).
    /// Returns the new node, or `None` when the settings drop it.
    fn add(&mut self, parent: Option<NodeId>, node: &MarkupNode) -> Result<Option<NodeId>, ErrorType> {
        let data = match node {
            MarkupNode::Element(e) => return self.add_element(parent, e).map(Some),
            MarkupNode::Text(t) => {
                let text = if self.settings.ignore_whitespace {
                    t.trim()
                } else {
                    t.as_str()
                };
                if text.is_empty() {
                    return Ok(None);
                }
                XmlNodeData::with_value(XmlNodeKind::Text, text)
            }
            MarkupNode::CData(t) => XmlNodeData::with_value(XmlNodeKind::Text, t.as_str()),
            MarkupNode::Comment(c) => {
                if self.settings.ignore_comments {
                    return Ok(None);
                }
                XmlNodeData::with_value(XmlNodeKind::Comment, c.as_str())
            }
            MarkupNode::ProcessingInstruction { target, data } => {
                if self.settings.ignore_processing_instructions {
                    return Ok(None);
                }
                let mut pi = XmlNodeData::named(
                    XmlNodeKind::ProcessingInstruction,
                    QualifiedName::new(PUBLIC_NS.clone(), target.as_str()),
                    None,
                );
                pi.set_value(data.clone());
                pi
            }
        };
        let id = self.tree.alloc(data);
        if let Some(p) = parent {
            self.tree.attach(p, id, None);
        }
        Ok(Some(id))
    }

    fn add_element(&mut self, parent: Option<NodeId>, e: &ElementData) -> Result<NodeId, ErrorType> {
        let id = self.tree.alloc(XmlNodeData::new(XmlNodeKind::Element));
        if let Some(p) = parent {
            self.tree.attach(p, id, None);
        }
        // Declarations first: they are in scope for the element's own name.
        for a in &e.attributes {
            if let Some(prefix) = a.name.as_namespace_declaration() {
                if prefix.is_some() && a.value.is_empty() {
                    return Err(ErrorType::SyntaxError(format!(
                        "Namespace prefix {} cannot be bound to an empty uri",
                        a.name.local
                    )));
                }
                self.tree.declare(
                    id,
                    NamespaceDeclaration {
                        prefix: prefix.map(|p| p.to_string()),
                        uri: a.value.clone(),
                    },
                );
            }
        }
        let ns = self.resolve(id, &e.name)?;
        self.tree.node_mut(id).set_name(
            QualifiedName::new(ns, e.name.local.as_str()),
            e.name.prefix.clone(),
        );

        let mut seen: Vec<QualifiedName> = Vec::new();
        for a in &e.attributes {
            if a.name.as_namespace_declaration().is_some() {
                continue;
            }
            let ns = self.resolve(id, &a.name)?;
            let name = QualifiedName::new(ns, a.name.local.as_str());
            if seen.contains(&name) {
                return Err(ErrorType::SyntaxError(format!(
                    "Attribute {} is specified twice on {}",
                    a.name, e.name
                )));
            }
            seen.push(name.clone());
            let mut data = XmlNodeData::named(XmlNodeKind::Attribute, name, a.name.prefix.clone());
            data.set_value(a.value.clone());
            let attr = self.tree.alloc(data);
            self.tree.attach_attribute(id, attr);
        }
        for child in &e.children {
            self.add(Some(id), child)?;
        }
        Ok(id)
    }
}

fn syntax_error(e: pest_consume::Error<crate::parser::Rule>) -> ErrorType {
    ErrorType::SyntaxError(describe_error(&e))
}

/// Parses a whole document into a tree rooted at a document node.
pub fn parse_document(text: &str, settings: &XmlSettings) -> Result<XmlRef, ErrorType> {
    let doc = XmlParser::parse_document(text).map_err(syntax_error)?;
    let mut builder = TreeBuilder::new(settings);
    let root = builder.tree.alloc(XmlNodeData::new(XmlNodeKind::Document));
    for node in &doc.nodes {
        builder.add(Some(root), node)?;
    }
    tracing::debug!(nodes = builder.tree.len(), "parsed XML document");
    Ok(XmlRef::new(XmlStore::new(builder.tree), root))
}

/// Parses a sequence of sibling nodes. They share one tree and have no parent.
pub fn parse_fragment(text: &str, settings: &XmlSettings) -> Result<XmlList, ErrorType> {
    let nodes = XmlParser::parse_fragment(text).map_err(syntax_error)?;
    let mut builder = TreeBuilder::new(settings);
    let mut top = Vec::new();
    for node in &nodes {
        if let Some(id) = builder.add(None, node)? {
            top.push(id);
        }
    }
    tracing::debug!(nodes = builder.tree.len(), top_level = top.len(), "parsed XML fragment");
    let tree = XmlStore::new(builder.tree);
    Ok(XmlList::new(
        top.into_iter().map(|id| XmlRef::new(tree.clone(), id)).collect(),
    ))
}
