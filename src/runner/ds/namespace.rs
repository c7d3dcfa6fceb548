use std::fmt;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const XML_NAMESPACE_URI: &str = "http://www.w3.org/XML/1998/namespace";

lazy_static! {
    /// The public namespace of the top-level package.
    pub static ref PUBLIC_NS: Namespace = Namespace::package("");
    /// Built-in vector classes live here.
    pub static ref VECTOR_NS: Namespace = Namespace::package("__AS3__.vec");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceKind {
    Public,
    Private,
    Protected,
    Internal,
    Explicit,
}
impl NamespaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamespaceKind::Public => "public",
            NamespaceKind::Private => "private",
            NamespaceKind::Protected => "protected",
            NamespaceKind::Internal => "internal",
            NamespaceKind::Explicit => "namespace",
        }
    }
}

/// A resolution domain. Equality is structural over kind and uri; the
/// display prefix does not take part in identity.
#[derive(Debug, Clone)]
pub struct Namespace {
    kind: NamespaceKind,
    uri: String,
    prefix: Option<String>,
}
impl Namespace {
    pub fn new(kind: NamespaceKind, uri: impl Into<String>) -> Self {
        Namespace {
            kind,
            uri: uri.into(),
            prefix: None,
        }
    }

    pub fn package(uri: impl Into<String>) -> Self {
        Namespace::new(NamespaceKind::Public, uri)
    }

    pub fn explicit(uri: impl Into<String>) -> Self {
        Namespace::new(NamespaceKind::Explicit, uri)
    }

    pub fn internal(package: impl Into<String>) -> Self {
        Namespace::new(NamespaceKind::Internal, package)
    }

    pub fn protected(class_name: impl Into<String>) -> Self {
        Namespace::new(NamespaceKind::Protected, class_name)
    }

    /// Mints a fresh private namespace that equals no other namespace.
    pub fn private() -> Self {
        Namespace::new(
            NamespaceKind::Private,
            Uuid::new_v4().to_hyphenated().to_string(),
        )
    }

    /// Namespace of an XML name with the given uri. The empty uri is the
    /// public namespace of the top-level package.
    pub fn xml(uri: &str) -> Self {
        if uri.is_empty() {
            PUBLIC_NS.clone()
        } else {
            Namespace::explicit(uri)
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn kind(&self) -> NamespaceKind {
        self.kind
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn is_public(&self) -> bool {
        self.kind == NamespaceKind::Public
    }

    /// Public namespace of the top-level package, where dynamic properties live.
    pub fn is_unnamed_public(&self) -> bool {
        self.is_public() && self.uri.is_empty()
    }
}
impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.uri == other.uri
    }
}
impl Eq for Namespace {}
impl std::hash::Hash for Namespace {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.uri.hash(state);
    }
}
impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            NamespaceKind::Public | NamespaceKind::Explicit => write!(f, "{}", self.uri),
            _ => write!(f, "{}({})", self.kind.as_str(), self.uri),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    namespace: Namespace,
    local_name: String,
}
impl QualifiedName {
    pub fn new(namespace: Namespace, local_name: impl Into<String>) -> Self {
        QualifiedName {
            namespace,
            local_name: local_name.into(),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Matches this name against an optional namespace filter and a local
    /// name, where `*` stands for any local name.
    pub fn matches(&self, filter: Option<&Namespace>, local_name: &str) -> bool {
        (local_name == "*" || self.local_name == local_name)
            && filter.map_or(true, |ns| *ns == self.namespace)
    }
}
impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.namespace.is_unnamed_public() {
            write!(f, "{}", self.local_name)
        } else {
            write!(f, "{}::{}", self.namespace, self.local_name)
        }
    }
}
