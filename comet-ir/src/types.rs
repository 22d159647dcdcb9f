//! Type handles and the compilation's type table.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Method;

/// Fully qualified name of the root marker type.
///
/// A type is a marker (attribute) type when its base chain reaches this type.
pub const ATTRIBUTE_BASE: &str = "System.Attribute";

/// A resolved handle to a type declared in (or known to) the compilation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(String);

impl TypeId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Handle of the root marker type.
    pub fn attribute() -> Self {
        Self(ATTRIBUTE_BASE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The unqualified type name (the segment after the last `.`).
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// The type's handle.
    pub id: TypeId,
    /// Direct base type, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<TypeId>,
    /// Methods declared on the type, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<Method>,
}

impl TypeDecl {
    pub fn new(id: impl Into<TypeId>) -> Self {
        Self {
            id: id.into(),
            base: None,
            methods: Vec::new(),
        }
    }

    /// Set the direct base type.
    pub fn extends(mut self, base: impl Into<TypeId>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Declare a marker type deriving directly from [`ATTRIBUTE_BASE`].
    pub fn attribute(id: impl Into<TypeId>) -> Self {
        Self::new(id).extends(TypeId::attribute())
    }

    /// Add a method.
    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }
}

/// Ordered table of the types declared by a compilation.
///
/// Declaration order is preserved so that every traversal is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TypeDecl>", into = "Vec<TypeDecl>")]
pub struct TypeTable {
    types: IndexMap<TypeId, TypeDecl>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration, replacing any previous declaration with the same id.
    pub fn insert(&mut self, decl: TypeDecl) {
        self.types.insert(decl.id.clone(), decl);
    }

    pub fn get(&self, id: &TypeId) -> Option<&TypeDecl> {
        self.types.get(id)
    }

    pub fn contains(&self, id: &TypeId) -> bool {
        id.as_str() == ATTRIBUTE_BASE || self.types.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate declarations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.values()
    }

    /// Whether `ty` is `base` or transitively derives from it.
    ///
    /// Walks declared base chains only; a cyclic chain yields `false`.
    pub fn is_subtype_of(&self, ty: &TypeId, base: &TypeId) -> bool {
        let mut current = Some(ty);
        let mut steps = 0;
        while let Some(id) = current {
            if id == base {
                return true;
            }
            if steps > self.types.len() {
                return false;
            }
            steps += 1;
            current = self.types.get(id).and_then(|decl| decl.base.as_ref());
        }
        false
    }

    /// Whether `ty` is a marker type: the root marker type itself, or a
    /// declared type deriving from it.
    pub fn is_attribute(&self, ty: &TypeId) -> bool {
        ty.as_str() == ATTRIBUTE_BASE
            || (self.types.contains_key(ty) && self.is_subtype_of(ty, &TypeId::attribute()))
    }

    /// Rebuild the table applying `f` to every method of every type.
    pub(crate) fn map_methods(self, mut f: impl FnMut(&TypeId, Method) -> Method) -> Self {
        let types = self
            .types
            .into_iter()
            .map(|(id, mut decl)| {
                decl.methods = std::mem::take(&mut decl.methods)
                    .into_iter()
                    .map(|method| f(&id, method))
                    .collect();
                (id, decl)
            })
            .collect();
        Self { types }
    }
}

impl From<Vec<TypeDecl>> for TypeTable {
    fn from(decls: Vec<TypeDecl>) -> Self {
        decls.into_iter().collect()
    }
}

impl From<TypeTable> for Vec<TypeDecl> {
    fn from(table: TypeTable) -> Self {
        table.types.into_values().collect()
    }
}

impl FromIterator<TypeDecl> for TypeTable {
    fn from_iter<I: IntoIterator<Item = TypeDecl>>(iter: I) -> Self {
        let mut table = Self::new();
        for decl in iter {
            table.insert(decl);
        }
        table
    }
}
