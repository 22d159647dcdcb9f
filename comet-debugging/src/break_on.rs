//! The `break-on` marker.

use comet_ir::{MarkerDecl, TypeId, TypeTable};
use comet_pipeline::{Editor, Marker, ValidationError};
use eyre::Result;

use crate::BreakingEditor;

/// Requests debugger breaks in every method decorated with one of
/// `attribute_types`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakOn {
    attribute_types: Vec<TypeId>,
}

impl BreakOn {
    pub const KIND: &'static str = "break-on";
    const FIELD: &'static str = "types";

    /// Create the marker, checking that every type is a declared marker type.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::Empty`] if `attribute_types` is empty
    /// - [`ValidationError::UnknownType`] if a type is not declared
    /// - [`ValidationError::NotAMarkerType`] if a type is neither the root
    ///   marker type nor derives from it
    pub fn new(attribute_types: Vec<TypeId>, types: &TypeTable) -> Result<Self, ValidationError> {
        if attribute_types.is_empty() {
            return Err(ValidationError::Empty {
                kind: Self::KIND.to_string(),
                field: "marker type",
            });
        }

        for (index, ty) in attribute_types.iter().enumerate() {
            if !types.contains(ty) {
                return Err(ValidationError::UnknownType {
                    kind: Self::KIND.to_string(),
                    field: Self::FIELD,
                    index,
                    ty: ty.clone(),
                });
            }
            if !types.is_attribute(ty) {
                return Err(ValidationError::NotAMarkerType {
                    kind: Self::KIND.to_string(),
                    field: Self::FIELD,
                    index,
                    ty: ty.clone(),
                });
            }
        }

        Ok(Self { attribute_types })
    }

    /// Registry factory: reads `args.types` as a list of type identifiers.
    pub fn from_decl(decl: &MarkerDecl, types: &TypeTable) -> Result<Box<dyn Marker>, ValidationError> {
        let invalid = |message: &str| ValidationError::InvalidPayload {
            kind: Self::KIND.to_string(),
            message: message.to_string(),
        };

        let list = match decl.args.get(Self::FIELD) {
            None | Some(serde_json::Value::Null) => {
                return Err(ValidationError::MissingPayload {
                    kind: Self::KIND.to_string(),
                    field: Self::FIELD,
                });
            }
            Some(value) => value
                .as_array()
                .ok_or_else(|| invalid("'types' must be an array of type names"))?,
        };

        let attribute_types = list
            .iter()
            .map(|v| {
                v.as_str()
                    .map(TypeId::from)
                    .ok_or_else(|| invalid("'types' entries must be strings"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Box::new(Self::new(attribute_types, types)?))
    }

    pub fn attribute_types(&self) -> &[TypeId] {
        &self.attribute_types
    }
}

impl Marker for BreakOn {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn initialize(&self) -> Result<Vec<Box<dyn Editor>>> {
        Ok(vec![Box::new(BreakingEditor::new(
            self.attribute_types.iter().cloned(),
        ))])
    }
}

#[cfg(test)]
mod tests {
    use comet_ir::TypeDecl;
    use serde_json::json;

    use super::*;

    fn types() -> TypeTable {
        TypeTable::from(vec![
            TypeDecl::attribute("Demo.TraceAttribute"),
            TypeDecl::new("Demo.Service"),
        ])
    }

    #[test]
    fn test_accepts_marker_types() {
        let marker = BreakOn::new(vec!["Demo.TraceAttribute".into()], &types()).unwrap();
        assert_eq!(marker.attribute_types(), [TypeId::from("Demo.TraceAttribute")]);
        assert_eq!(marker.initialize().unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_non_marker_type() {
        let err = BreakOn::new(
            vec!["Demo.TraceAttribute".into(), "Demo.Service".into()],
            &types(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::NotAMarkerType { index: 1, .. }));
    }

    #[test]
    fn test_accepts_root_marker_type() {
        let root = vec![TypeId::attribute()];
        assert!(BreakOn::new(root.clone(), &types()).is_ok());

        let mut declared = types();
        declared.insert(TypeDecl::new(comet_ir::ATTRIBUTE_BASE));
        assert!(BreakOn::new(root, &declared).is_ok());
    }

    #[test]
    fn test_rejects_unknown_type() {
        let err = BreakOn::new(vec!["Demo.Nope".into()], &types()).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownType { index: 0, .. }));
    }

    #[test]
    fn test_rejects_empty_set() {
        let err = BreakOn::new(Vec::new(), &types()).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn test_from_decl_missing_types() {
        let decl = MarkerDecl::new(BreakOn::KIND, json!({ "types": null }));
        let err = BreakOn::from_decl(&decl, &types()).unwrap_err();
        assert!(matches!(err, ValidationError::MissingPayload { field: "types", .. }));
    }

    #[test]
    fn test_from_decl_wrong_shape() {
        let decl = MarkerDecl::new(BreakOn::KIND, json!({ "types": "Demo.TraceAttribute" }));
        let err = BreakOn::from_decl(&decl, &types()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPayload { .. }));
    }

    #[test]
    fn test_from_decl() {
        let decl = MarkerDecl::new(BreakOn::KIND, json!({ "types": ["Demo.TraceAttribute"] }));
        let marker = BreakOn::from_decl(&decl, &types()).unwrap();
        assert_eq!(marker.kind(), "break-on");
    }
}
