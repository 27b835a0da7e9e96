//! Runtime type descriptors.
//!
//! A descriptor names a data type by its qualified name and carries just
//! enough structure for mapping decisions:
//! 1. **Category**: value type or reference type
//! 2. **Ancestors**: the single-inheritance base chain
//! 3. **Element**: the element type of an array type
//!
//! The qualified name is the identity. Two descriptors describe the same
//! type iff their [`TypeKey`]s are equal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Qualified names of types the resolver treats specially.
pub mod well_known {
    pub const STRING: &str = "System.String";
    pub const BYTE: &str = "System.Byte";
    pub const BYTES: &str = "System.Byte[]";

    /// Marker type of the NetTopologySuite geometry family.
    pub const GEOMETRY_MARKER: &str = "NetTopologySuite.Geometries.Geometry";
}

/// Stable identity of a type: its qualified name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(pub String);

impl TypeKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether values of a type are copied (value) or shared (reference).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    Value,
    Reference,
}

#[derive(Debug)]
struct TypeNode {
    key: TypeKey,
    category: TypeCategory,
    base: Option<TypeDescriptor>,
    element: Option<TypeDescriptor>,
}

/// Shared handle to a runtime type.
///
/// Cloning is an `Arc` bump, so descriptors can be passed around freely
/// while the model is being built.
#[derive(Debug, Clone)]
pub struct TypeDescriptor(Arc<TypeNode>);

impl TypeDescriptor {
    fn from_node(node: TypeNode) -> Self {
        Self(Arc::new(node))
    }

    /// A value type (integers, booleans, dates, user structs, ...).
    pub fn value(name: impl Into<TypeKey>) -> Self {
        Self::from_node(TypeNode {
            key: name.into(),
            category: TypeCategory::Value,
            base: None,
            element: None,
        })
    }

    /// A reference type with no base type.
    pub fn reference(name: impl Into<TypeKey>) -> Self {
        Self::from_node(TypeNode {
            key: name.into(),
            category: TypeCategory::Reference,
            base: None,
            element: None,
        })
    }

    /// A reference type deriving from `base`.
    pub fn extends(name: impl Into<TypeKey>, base: &TypeDescriptor) -> Self {
        Self::from_node(TypeNode {
            key: name.into(),
            category: TypeCategory::Reference,
            base: Some(base.clone()),
            element: None,
        })
    }

    /// The array type `{element}[]`.
    pub fn array_of(element: &TypeDescriptor) -> Self {
        Self::from_node(TypeNode {
            key: TypeKey(format!("{}[]", element.key())),
            category: TypeCategory::Reference,
            base: None,
            element: Some(element.clone()),
        })
    }

    pub fn string() -> Self {
        Self::reference(well_known::STRING)
    }

    pub fn byte() -> Self {
        Self::value(well_known::BYTE)
    }

    /// The binary blob type, `System.Byte[]`.
    pub fn bytes() -> Self {
        Self::array_of(&Self::byte())
    }

    pub fn key(&self) -> &TypeKey {
        &self.0.key
    }

    pub fn qualified_name(&self) -> &str {
        self.0.key.as_str()
    }

    pub fn category(&self) -> TypeCategory {
        self.0.category
    }

    pub fn is_value_type(&self) -> bool {
        self.0.category == TypeCategory::Value
    }

    pub fn base(&self) -> Option<&TypeDescriptor> {
        self.0.base.as_ref()
    }

    pub fn element_type(&self) -> Option<&TypeDescriptor> {
        self.0.element.as_ref()
    }

    /// Base, base of base, ... up to the root. Excludes `self`.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: self.base(),
        }
    }

    /// Whether this type is `key` or derives from it.
    pub fn is_or_derives_from(&self, key: &TypeKey) -> bool {
        self.key() == key || self.ancestors().any(|ancestor| ancestor.key() == key)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TypeDescriptor {}

impl std::hash::Hash for TypeDescriptor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Iterator over a descriptor's ancestor chain.
pub struct Ancestors<'a> {
    next: Option<&'a TypeDescriptor>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a TypeDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.base();
        Some(current)
    }
}
