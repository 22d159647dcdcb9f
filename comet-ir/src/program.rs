//! Program snapshot types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{TypeDecl, TypeId, TypeTable};

/// Immutable snapshot of a compilation unit.
///
/// Editors never mutate a program in place: a rewrite consumes the current
/// snapshot and returns the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Name of the unit under compilation (assembly name).
    pub name: String,
    /// Compilation-level markers, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<MarkerDecl>,
    /// Declared types, in declaration order.
    #[serde(default)]
    pub types: TypeTable,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            markers: Vec::new(),
            types: TypeTable::new(),
        }
    }

    /// Add a type declaration.
    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.types.insert(decl);
        self
    }

    /// Add a compilation-level marker.
    pub fn with_marker(mut self, marker: MarkerDecl) -> Self {
        self.markers.push(marker);
        self
    }

    /// Iterate every method together with its declaring type, in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = (&TypeId, &Method)> {
        self.types
            .iter()
            .flat_map(|decl| decl.methods.iter().map(move |m| (&decl.id, m)))
    }

    /// Find a method by declaring type and name.
    pub fn method(&self, owner: &TypeId, name: &str) -> Option<&Method> {
        self.types
            .get(owner)?
            .methods
            .iter()
            .find(|m| m.name == name)
    }

    /// Produce the next snapshot by applying `f` to every method.
    pub fn map_methods(self, f: impl FnMut(&TypeId, Method) -> Method) -> Self {
        Self {
            types: self.types.map_methods(f),
            ..self
        }
    }
}

/// A marker declared on the whole compilation, as written by the producer.
///
/// The payload is unvalidated here; the pipeline's marker registry turns it
/// into a validated marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerDecl {
    /// Which extension the marker requests.
    pub kind: String,
    /// Extension-specific configuration.
    #[serde(default)]
    pub args: serde_json::Value,
}

impl MarkerDecl {
    pub fn new(kind: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            args,
        }
    }
}

/// A marker applied to a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub ty: TypeId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Attribute {
    pub fn new(ty: impl Into<TypeId>) -> Self {
        Self {
            ty: ty.into(),
            args: Vec::new(),
        }
    }
}

/// Compiler intrinsics an editor may insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intrinsic {
    /// Break into an attached debugger.
    DebuggerBreak,
}

/// A statement in a method body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    /// An opaque expression statement, kept verbatim.
    Expr(String),
    /// A return, with an optional opaque value.
    Return(Option<String>),
    /// A call to a compiler intrinsic.
    Intrinsic(Intrinsic),
}

/// A method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub body: Vec<Stmt>,
    /// Synthetic sentinels left by editors.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            body: Vec::new(),
            tags: BTreeSet::new(),
        }
    }

    /// Decorate the method with a marker.
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Append a statement to the body.
    pub fn stmt(mut self, stmt: Stmt) -> Self {
        self.body.push(stmt);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Whether any applied marker's type is in `types`.
    pub fn is_decorated_with(&self, mut types: impl FnMut(&TypeId) -> bool) -> bool {
        self.attributes.iter().any(|attr| types(&attr.ty))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn program() -> Program {
        Program::new("Demo")
            .with_type(TypeDecl::attribute("Demo.TraceAttribute"))
            .with_type(
                TypeDecl::new("Demo.Service")
                    .method(
                        Method::new("Foo")
                            .attribute(Attribute::new("Demo.TraceAttribute"))
                            .stmt(Stmt::Return(None)),
                    )
                    .method(Method::new("Bar").stmt(Stmt::Return(None))),
            )
    }

    #[test]
    fn test_methods_in_declaration_order() {
        let program = program();
        let names: Vec<_> = program.methods().map(|(_, m)| m.name.as_str()).collect();
        assert_eq!(names, ["Foo", "Bar"]);
    }

    #[test]
    fn test_map_methods_produces_new_snapshot() {
        let original = program();
        let edited = original.clone().map_methods(|_, mut m| {
            m.body.insert(0, Stmt::Intrinsic(Intrinsic::DebuggerBreak));
            m
        });

        let owner = TypeId::new("Demo.Service");
        assert_eq!(original.method(&owner, "Foo").unwrap().body.len(), 1);
        assert_eq!(edited.method(&owner, "Foo").unwrap().body.len(), 2);
    }

    #[test]
    fn test_decorated_with() {
        let program = program();
        let owner = TypeId::new("Demo.Service");
        let trace = TypeId::new("Demo.TraceAttribute");
        assert!(program.method(&owner, "Foo").unwrap().is_decorated_with(|t| *t == trace));
        assert!(!program.method(&owner, "Bar").unwrap().is_decorated_with(|t| *t == trace));
    }

    #[test]
    fn test_deserialize_program() {
        let program: Program = serde_json::from_value(json!({
            "name": "Demo",
            "markers": [{ "kind": "break-on", "args": { "types": ["Demo.TraceAttribute"] } }],
            "types": [
                { "id": "Demo.TraceAttribute", "base": "System.Attribute" },
                {
                    "id": "Demo.Service",
                    "methods": [{
                        "name": "Foo",
                        "attributes": [{ "type": "Demo.TraceAttribute" }],
                        "body": [{ "expr": "Console.WriteLine(\"foo\")" }, { "return": null }]
                    }]
                }
            ]
        }))
        .unwrap();

        assert_eq!(program.markers.len(), 1);
        assert_eq!(program.markers[0].kind, "break-on");
        assert!(program.types.is_attribute(&"Demo.TraceAttribute".into()));
        assert_eq!(program.methods().count(), 1);
    }
}
