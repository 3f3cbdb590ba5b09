//! Path element and field name types.

use std::fmt;

/// PathElement represents one level of path navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathElement {
    /// Schema field name.
    FieldName(String),
    /// Key of a map entry, taken verbatim from the data.
    Key(String),
    /// Position in an ordered collection.
    Index(usize),
}

impl PathElement {
    /// Creates a new field name path element.
    pub fn field_name(name: impl Into<String>) -> Self {
        PathElement::FieldName(name.into())
    }

    /// Creates a new map key path element.
    pub fn key(key: impl Into<String>) -> Self {
        PathElement::Key(key.into())
    }

    /// Creates a new index path element.
    pub fn index(i: usize) -> Self {
        PathElement::Index(i)
    }

    /// Returns the field name if this is a field name element.
    pub fn as_field_name(&self) -> Option<&str> {
        match self {
            PathElement::FieldName(name) => Some(name),
            _ => None,
        }
    }
}

/// FieldName is the path of a field from the resource root.
///
/// Builders return a new value so a parent path can be shared by every
/// child field of a nested object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldName {
    elements: Vec<PathElement>,
}

impl FieldName {
    /// Creates the empty (resource root) path.
    pub fn new() -> Self {
        FieldName {
            elements: Vec::new(),
        }
    }

    /// Returns a child path one field deeper.
    pub fn add_nest(&self, name: impl Into<String>) -> Self {
        self.with(PathElement::field_name(name))
    }

    /// Returns a child path addressing the entry `key` of this map.
    pub fn add_key(&self, key: impl Into<String>) -> Self {
        self.with(PathElement::key(key))
    }

    /// Returns a child path addressing element `i` of this collection.
    pub fn add_index(&self, i: usize) -> Self {
        self.with(PathElement::index(i))
    }

    fn with(&self, element: PathElement) -> Self {
        let mut elements = self.elements.clone();
        elements.push(element);
        FieldName { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.elements.iter()
    }

    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last()
    }
}

impl FromIterator<PathElement> for FieldName {
    fn from_iter<T: IntoIterator<Item = PathElement>>(iter: T) -> Self {
        FieldName {
            elements: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                PathElement::FieldName(name) if i == 0 => write!(f, "{}", name)?,
                PathElement::FieldName(name) => write!(f, ".{}", name)?,
                PathElement::Key(key) => write!(f, "[{:?}]", key)?,
                PathElement::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}
