//! Raw markup tree produced by the XML parser.
//!
//! Names are kept as written (`prefix:local`); namespace resolution is the
//! runtime's job. Character and entity references are already decoded.

#[derive(Debug, Clone, PartialEq)]
pub struct RawName {
    pub prefix: Option<String>,
    pub local: String,
}
impl RawName {
    pub fn new(prefix: Option<&str>, local: &str) -> Self {
        RawName {
            prefix: prefix.map(|p| p.to_string()),
            local: local.to_string(),
        }
    }

    /// `xmlns` or `xmlns:p` declaration. Returns the declared prefix
    /// (`None` for the default namespace).
    pub fn as_namespace_declaration(&self) -> Option<Option<&str>> {
        match &self.prefix {
            None if self.local == "xmlns" => Some(None),
            Some(p) if p == "xmlns" => Some(Some(self.local.as_str())),
            _ => None,
        }
    }
}
impl std::fmt::Display for RawName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.prefix {
            Some(p) => write!(f, "{}:{}", p, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawAttribute {
    pub name: RawName,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub name: RawName,
    pub attributes: Vec<RawAttribute>,
    pub children: Vec<MarkupNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Element(ElementData),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction { target: String, data: String },
}

/// A whole document: the root element plus the comments and processing
/// instructions around it, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentData {
    pub nodes: Vec<MarkupNode>,
}
impl DocumentData {
    pub fn root(&self) -> Option<&ElementData> {
        self.nodes.iter().find_map(|n| match n {
            MarkupNode::Element(e) => Some(e),
            _ => None,
        })
    }
}
