//! Abstract syntax tree
//!
//! Nodes own their children. Upward lookups such as variable scoping are done
//! with an explicit scope chain while walking, so nodes carry no parent links.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use super::error::Location;
use super::keywords::Keyword;

/// Script AST node
#[derive(Debug, Clone, PartialEq)]
pub enum AbstractNode {
    /// Leaf value
    Atom(AtomNode),
    /// `class [name] [values] [: base] { ... }`
    Object(ObjectNode),
    /// `name values...`
    Property(PropertyNode),
    /// `import target from source`
    Import(ImportNode),
    /// `$name`
    VariableAccess(VariableAccessNode),
}

impl AbstractNode {
    /// Source position
    pub fn location(&self) -> &Location {
        match self {
            Self::Atom(node) => &node.location,
            Self::Object(node) => &node.location,
            Self::Property(node) => &node.location,
            Self::Import(node) => &node.location,
            Self::VariableAccess(node) => &node.location,
        }
    }

    /// Atom payload
    pub fn as_atom(&self) -> Option<&AtomNode> {
        match self {
            Self::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    /// Object payload
    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Mutable object payload
    pub fn as_object_mut(&mut self) -> Option<&mut ObjectNode> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Rough script spelling, used in diagnostics
    pub fn text(&self) -> String {
        match self {
            Self::Atom(atom) => atom.value.clone(),
            Self::Object(object) => format!("{} {}", object.cls, object.name).trim_end().to_string(),
            Self::Property(property) => property.name.clone(),
            Self::Import(import) => format!("import {} from {}", import.target, import.source),
            Self::VariableAccess(access) => format!("${}", access.name),
        }
    }
}

/// Leaf value with a lazily parsed numeric form
#[derive(Debug, Clone, PartialEq)]
pub struct AtomNode {
    /// Raw text
    pub value: String,
    /// Interned id, [`Keyword::Unknown`] for quoted or unmapped text
    pub id: Keyword,
    /// Written in quotes
    pub quoted: bool,
    /// Source position
    pub location: Location,
    number: OnceCell<Option<f32>>,
}

impl AtomNode {
    /// Create an atom, interning bare words
    pub fn new(value: impl Into<String>, quoted: bool, location: Location) -> Self {
        let value = value.into();
        let id = if quoted { Keyword::Unknown } else { Keyword::from_word(&value) };
        Self {
            value,
            id,
            quoted,
            location,
            number: OnceCell::new(),
        }
    }

    /// True when the text is a numeric literal
    pub fn is_number(&self) -> bool {
        self.number().is_some()
    }

    /// Numeric value, parsed once on first access
    pub fn number(&self) -> Option<f32> {
        *self.number.get_or_init(|| parse_number(&self.value))
    }
}

/// Optional sign, digits with an optional decimal point, optional exponent
fn parse_number(text: &str) -> Option<f32> {
    let bytes = text.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let mut digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == start {
            return None;
        }
    }
    if i != bytes.len() {
        return None;
    }
    text.parse().ok()
}

/// Block object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    /// Class word, e.g. `material`
    pub cls: String,
    /// Interned class id
    pub id: Keyword,
    /// Instance name, empty when absent
    pub name: String,
    /// Inheritance target
    pub base: Option<String>,
    /// Only usable as a base
    pub is_abstract: bool,
    /// Values between the name and the body
    pub values: Vec<AbstractNode>,
    /// Body nodes in order
    pub children: Vec<AbstractNode>,
    /// Variables set in this body
    pub env: BTreeMap<String, String>,
    /// Source position
    pub location: Location,
    pub(crate) base_resolved: bool,
}

impl ObjectNode {
    /// Create an empty object
    pub fn new(cls: impl Into<String>, location: Location) -> Self {
        let cls = cls.into();
        Self {
            id: Keyword::from_word(&cls),
            cls,
            name: String::new(),
            base: None,
            is_abstract: false,
            values: Vec::new(),
            children: Vec::new(),
            env: BTreeMap::new(),
            location,
            base_resolved: false,
        }
    }

    /// Child objects in order
    pub fn objects(&self) -> impl Iterator<Item = &ObjectNode> {
        self.children.iter().filter_map(AbstractNode::as_object)
    }

    /// Child properties in order
    pub fn properties(&self) -> impl Iterator<Item = &PropertyNode> {
        self.children.iter().filter_map(|child| match child {
            AbstractNode::Property(property) => Some(property),
            _ => None,
        })
    }

    /// Last property with this id
    pub fn property(&self, id: Keyword) -> Option<&PropertyNode> {
        self.properties().filter(|p| p.id == id).last()
    }
}

/// `name values...` line
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode {
    /// Property word
    pub name: String,
    /// Interned id
    pub id: Keyword,
    /// Values in order
    pub values: Vec<AbstractNode>,
    /// Source position
    pub location: Location,
}

impl PropertyNode {
    /// Create a property without values
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        let name = name.into();
        Self {
            id: Keyword::from_word(&name),
            name,
            values: Vec::new(),
            location,
        }
    }
}

/// Import request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportNode {
    /// Object name or `*`
    pub target: String,
    /// Script to load
    pub source: String,
    /// Source position
    pub location: Location,
}

/// Unresolved variable reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableAccessNode {
    /// Name without the `$`
    pub name: String,
    /// Source position
    pub location: Location,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn atom(text: &str) -> AtomNode {
        AtomNode::new(text, false, Location::new(Arc::from("t"), 1))
    }

    #[test]
    fn test_number_grammar() {
        assert_relative_eq!(atom("0.2").number().unwrap(), 0.2);
        assert_relative_eq!(atom("-1").number().unwrap(), -1.0);
        assert_relative_eq!(atom(".5").number().unwrap(), 0.5);
        assert_relative_eq!(atom("1e-2").number().unwrap(), 0.01);
        for text in ["wall.jpg", "inf", "nan", "1.2.3", "-", "1e", "2d", ""] {
            assert!(!atom(text).is_number(), "{text} is not a number");
        }
    }

    #[test]
    fn test_atoms_intern_words_but_not_quotes() {
        assert_eq!(atom("on").id, Keyword::On);
        let quoted = AtomNode::new("on", true, Location::new(Arc::from("t"), 1));
        assert_eq!(quoted.id, Keyword::Unknown);
    }

    #[test]
    fn test_property_lookup_prefers_last() {
        let location = Location::new(Arc::from("t"), 1);
        let mut object = ObjectNode::new("pass", location.clone());
        let mut first = PropertyNode::new("lighting", location.clone());
        first.values.push(AbstractNode::Atom(atom("on")));
        let mut second = PropertyNode::new("lighting", location);
        second.values.push(AbstractNode::Atom(atom("off")));
        object.children.push(AbstractNode::Property(first));
        object.children.push(AbstractNode::Property(second));

        let found = object.property(Keyword::Lighting).unwrap();
        assert_eq!(found.values[0].as_atom().unwrap().id, Keyword::Off);
    }
}
