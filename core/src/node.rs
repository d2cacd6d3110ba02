use std::fmt::{Display, Formatter};

/// An XML namespace prefix as written in a qualified name. Prefixes are
/// compared literally, they are never resolved to a namespace URI.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Default, Ord, PartialOrd)]
pub enum Prefix {
    #[default]
    Default,
    Named(String),
}

/// A qualified name consisting of an optional namespace prefix and a local
/// name (e.g. `gml:Envelope`)
#[derive(PartialEq, Eq, Hash, Clone, Debug, Default)]
pub struct Name {
    /// The name's prefix
    pub prefix: Prefix,

    /// The local part of the name
    pub local: String,
}

impl Name {
    /// Creates a name without a prefix
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            prefix: Prefix::Default,
            local: local.into(),
        }
    }

    /// Creates a name with the given prefix
    pub fn with_prefix(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefix: Prefix::Named(prefix.into()),
            local: local.into(),
        }
    }

    pub fn local_name(&self) -> &str {
        &self.local
    }

    /// Returns the prefix or [`None`] if the name does not have one
    pub fn prefix(&self) -> Option<&str> {
        match &self.prefix {
            Prefix::Default => None,
            Prefix::Named(p) => Some(p),
        }
    }

    /// Returns the fully qualified name (`prefix:local` or just `local`)
    pub fn fqn(&self) -> String {
        self.to_string()
    }

    /// A name is valid if its local part is not empty. Text, CDATA and
    /// comment nodes carry an invalid (empty) name.
    pub fn is_valid(&self) -> bool {
        !self.local.is_empty()
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.prefix {
            Prefix::Default => write!(f, "{}", self.local),
            Prefix::Named(p) => write!(f, "{}:{}", p, self.local),
        }
    }
}

/// An attribute of an element or a processing instruction. The value has
/// its entities decoded and is trimmed.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Attribute {
    pub name: Name,
    pub value: String,
}

impl Attribute {
    pub fn new(name: Name, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}=\"{}\"", self.name, self.value)
    }
}

/// The type of a [`Node`]
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum NodeType {
    ProcInst,
    BeginElement,
    EndElement,
    Text,
    CData,
    Comment,
}

impl Display for NodeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NodeType::ProcInst => "processing-instruction",
            NodeType::BeginElement => "begin-element",
            NodeType::EndElement => "end-element",
            NodeType::Text => "text",
            NodeType::CData => "cdata",
            NodeType::Comment => "comment",
        };
        f.write_str(s)
    }
}

/// A token produced by one scan step
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Node {
    /// The node's type
    pub kind: NodeType,

    /// The name of an element or the target of a processing instruction.
    /// Empty for all other node types.
    pub name: Name,

    /// Attributes of an element or a processing instruction in source order
    pub attrs: Vec<Attribute>,

    /// Decoded and trimmed payload of text, CDATA and comment nodes
    pub content: String,

    /// `true` for empty-element tags, processing instructions, CDATA
    /// sections and comments
    pub self_closing: bool,
}

impl Node {
    pub(crate) fn new(kind: NodeType) -> Self {
        Self {
            kind,
            name: Name::default(),
            attrs: Vec::new(),
            content: String::new(),
            self_closing: false,
        }
    }

    /// Returns the value of the attribute with the given name
    pub fn attr(&self, name: &Name) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == *name)
            .map(|a| a.value.as_str())
    }

    /// `true` if this node opens an element that will be closed by a
    /// subsequent end-element node
    pub fn opens_element(&self) -> bool {
        self.kind == NodeType::BeginElement && !self.self_closing
    }
}

#[cfg(test)]
mod tests {
    use assertor::{assert_that, BooleanAssertion, EqualityAssertion, OptionAssertion};

    use super::{Attribute, Name, Node, NodeType, Prefix};

    #[test]
    fn display() {
        assert_that!(Name::new("root").to_string()).is_equal_to("root".to_string());
        assert_that!(Name::with_prefix("gml", "Envelope").fqn())
            .is_equal_to("gml:Envelope".to_string());
        assert_that!(NodeType::ProcInst.to_string())
            .is_equal_to("processing-instruction".to_string());
        assert_that!(Attribute::new(Name::new("a"), "b").to_string())
            .is_equal_to("a=\"b\"".to_string());
    }

    #[test]
    fn equality_is_literal() {
        let a = Name::with_prefix("p", "item");
        assert_that!(a == Name::with_prefix("p", "item")).is_true();
        assert_that!(a == Name::with_prefix("q", "item")).is_false();
        assert_that!(a == Name::new("item")).is_false();
        assert_that!(a.prefix()).has_value("p");
        assert_that!(Name::new("item").prefix).is_equal_to(Prefix::Default);
    }

    #[test]
    fn validity() {
        assert_that!(Name::default().is_valid()).is_false();
        assert_that!(Name::new("x").is_valid()).is_true();
    }

    #[test]
    fn attribute_lookup() {
        let mut n = Node::new(NodeType::BeginElement);
        n.attrs.push(Attribute::new(Name::new("id"), "1"));
        n.attrs.push(Attribute::new(Name::with_prefix("xml", "lang"), "en"));
        assert_that!(n.attr(&Name::with_prefix("xml", "lang"))).has_value("en");
        assert_that!(n.attr(&Name::new("lang"))).is_none();
        assert_that!(n.opens_element()).is_true();
    }
}
