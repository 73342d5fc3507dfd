//! Extracted entity records.
//!
//! Every declaration or statement pulled out of a syntax tree becomes one
//! variant of the closed [`Entity`] enum. Records of the same shape share a
//! struct (classes, interfaces, enums and annotations are all
//! [`TypeDefinition`]s), and the variant carries the kind. Common properties
//! are reachable through [`Entity`]'s accessors regardless of variant.

use serde::Serialize;
use uuid::Uuid;

/// A (row, column) position in the original text, both 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Point {
    /// Line number (0-based).
    pub row: usize,
    /// Column in bytes (0-based).
    pub column: usize,
}

impl From<tree_sitter::Point> for Point {
    fn from(point: tree_sitter::Point) -> Self {
        Point {
            row: point.row,
            column: point.column,
        }
    }
}

/// `package com.example;`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageStatement {
    /// Stable identifier.
    pub id: Uuid,
    /// Declared package name.
    pub name: String,
    /// Start position.
    pub start_point: Point,
    /// End position.
    pub end_point: Point,
    /// Exact text of the statement.
    pub source_code: String,
    /// Owning file (absolute path).
    pub file_path: String,
    /// Preceding doc comment.
    pub comment: Option<String>,
}

/// One imported name.
///
/// `name` and `module` diverge for member and wildcard imports: the member
/// (or `*`) lands in `name`, the path it comes from in `module`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportStatement {
    /// Stable identifier.
    pub id: Uuid,
    /// Imported name.
    pub name: String,
    /// Module or package the name is imported from.
    pub module: String,
    /// Start position.
    pub start_point: Point,
    /// End position.
    pub end_point: Point,
    /// Exact text of the whole import statement.
    pub source_code: String,
    /// Owning file (absolute path).
    pub file_path: String,
    /// Preceding doc comment.
    pub comment: Option<String>,
}

/// A class, interface, enum or annotation type declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDefinition {
    /// Stable identifier.
    pub id: Uuid,
    /// Declared name.
    pub name: String,
    /// Start position.
    pub start_point: Point,
    /// End position.
    pub end_point: Point,
    /// Exact text of the whole declaration.
    pub source_code: String,
    /// Owning file (absolute path).
    pub file_path: String,
    /// Preceding doc comment (or docstring).
    pub comment: Option<String>,
    /// Text of the body, braces included.
    pub body: Option<String>,
}

/// A named, typed parameter of a callable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type, as written.
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Parameter {
    /// Build a parameter from its name and declared type.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A function, method or constructor declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallableDefinition {
    /// Stable identifier.
    pub id: Uuid,
    /// Declared name.
    pub name: String,
    /// Start position.
    pub start_point: Point,
    /// End position.
    pub end_point: Point,
    /// Exact text of the whole declaration.
    pub source_code: String,
    /// Owning file (absolute path).
    pub file_path: String,
    /// Preceding doc comment (or docstring).
    pub comment: Option<String>,
    /// Parameters that declare both a name and a type, in order.
    pub parameters: Vec<Parameter>,
    /// Declared return type. Always `None` for constructors.
    pub return_type: Option<String>,
    /// Body text. `None` for abstract and interface methods.
    pub body: Option<String>,
}

/// A field, or an enum constant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefinition {
    /// Stable identifier.
    pub id: Uuid,
    /// Variable name.
    pub name: String,
    /// Declared type.
    pub field_type: Option<String>,
    /// Start position of the variable declarator.
    pub start_point: Point,
    /// End position of the variable declarator.
    pub end_point: Point,
    /// Text of the variable declarator (`x = 42`), not the whole statement.
    pub source_code: String,
    /// Owning file (absolute path).
    pub file_path: String,
    /// Doc comment of the enclosing declaration statement.
    pub comment: Option<String>,
}

/// Kinds of extracted entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Package statement.
    Package,
    /// Import statement.
    Import,
    /// Class declaration.
    Class,
    /// Interface declaration.
    Interface,
    /// Enum declaration.
    Enum,
    /// Annotation type declaration (`@interface`).
    Annotation,
    /// Free function (Python functions, including those in class bodies).
    Function,
    /// Method declaration.
    Method,
    /// Constructor declaration.
    Constructor,
    /// Field or enum constant.
    Field,
}

/// One extracted entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Entity {
    /// Package statement.
    #[serde(rename = "PackageStatement")]
    Package(PackageStatement),
    /// Import statement.
    #[serde(rename = "ImportStatement")]
    Import(ImportStatement),
    /// Class declaration.
    #[serde(rename = "ClassDefinition")]
    Class(TypeDefinition),
    /// Interface declaration.
    #[serde(rename = "InterfaceDefinition")]
    Interface(TypeDefinition),
    /// Enum declaration.
    #[serde(rename = "EnumDefinition")]
    Enum(TypeDefinition),
    /// Annotation type declaration.
    #[serde(rename = "AnnotationDefinition")]
    Annotation(TypeDefinition),
    /// Function definition.
    #[serde(rename = "FunctionDefinition")]
    Function(CallableDefinition),
    /// Method definition.
    #[serde(rename = "MethodDefinition")]
    Method(CallableDefinition),
    /// Constructor definition.
    #[serde(rename = "ConstructorDefinition")]
    Constructor(CallableDefinition),
    /// Field definition.
    #[serde(rename = "FieldDefinition")]
    Field(FieldDefinition),
}

/// Run `$body` with `$rec` bound to the record inside any variant.
macro_rules! with_record {
    ($entity:expr, $rec:ident => $body:expr) => {
        match $entity {
            Entity::Package($rec) => $body,
            Entity::Import($rec) => $body,
            Entity::Class($rec)
            | Entity::Interface($rec)
            | Entity::Enum($rec)
            | Entity::Annotation($rec) => $body,
            Entity::Function($rec) | Entity::Method($rec) | Entity::Constructor($rec) => $body,
            Entity::Field($rec) => $body,
        }
    };
}

impl Entity {
    /// The entity's kind tag.
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Package(_) => EntityKind::Package,
            Entity::Import(_) => EntityKind::Import,
            Entity::Class(_) => EntityKind::Class,
            Entity::Interface(_) => EntityKind::Interface,
            Entity::Enum(_) => EntityKind::Enum,
            Entity::Annotation(_) => EntityKind::Annotation,
            Entity::Function(_) => EntityKind::Function,
            Entity::Method(_) => EntityKind::Method,
            Entity::Constructor(_) => EntityKind::Constructor,
            Entity::Field(_) => EntityKind::Field,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> Uuid {
        with_record!(self, r => r.id)
    }

    /// Declared name.
    pub fn name(&self) -> &str {
        with_record!(self, r => r.name.as_str())
    }

    /// Start position.
    pub fn start_point(&self) -> Point {
        with_record!(self, r => r.start_point)
    }

    /// End position.
    pub fn end_point(&self) -> Point {
        with_record!(self, r => r.end_point)
    }

    /// Exact source text of the entity's span.
    pub fn source_code(&self) -> &str {
        with_record!(self, r => r.source_code.as_str())
    }

    /// Owning file path.
    pub fn file_path(&self) -> &str {
        with_record!(self, r => r.file_path.as_str())
    }

    /// Attached doc comment.
    pub fn comment(&self) -> Option<&str> {
        with_record!(self, r => r.comment.as_deref())
    }

    /// Overwrite the owning file path.
    pub fn set_file_path(&mut self, file_path: &str) {
        with_record!(self, r => {
            if r.file_path != file_path {
                r.file_path = file_path.to_string();
            }
        })
    }

    /// Borrow as a type definition (class, interface, enum or annotation).
    pub fn as_type(&self) -> Option<&TypeDefinition> {
        match self {
            Entity::Class(t) | Entity::Interface(t) | Entity::Enum(t) | Entity::Annotation(t) => {
                Some(t)
            }
            _ => None,
        }
    }

    /// Borrow as a callable (function, method or constructor).
    pub fn as_callable(&self) -> Option<&CallableDefinition> {
        match self {
            Entity::Function(c) | Entity::Method(c) | Entity::Constructor(c) => Some(c),
            _ => None,
        }
    }

    /// Borrow as a field.
    pub fn as_field(&self) -> Option<&FieldDefinition> {
        match self {
            Entity::Field(f) => Some(f),
            _ => None,
        }
    }

    /// Borrow as an import.
    pub fn as_import(&self) -> Option<&ImportStatement> {
        match self {
            Entity::Import(i) => Some(i),
            _ => None,
        }
    }

    /// Borrow as a package statement.
    pub fn as_package(&self) -> Option<&PackageStatement> {
        match self {
            Entity::Package(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Entity {
        Entity::Field(FieldDefinition {
            id: Uuid::nil(),
            name: name.to_string(),
            field_type: Some("int".to_string()),
            start_point: Point { row: 3, column: 4 },
            end_point: Point { row: 3, column: 9 },
            source_code: name.to_string(),
            file_path: "/repo/A.java".to_string(),
            comment: None,
        })
    }

    #[test]
    fn test_common_accessors() {
        let entity = field("count");
        assert_eq!(entity.kind(), EntityKind::Field);
        assert_eq!(entity.name(), "count");
        assert_eq!(entity.start_point(), Point { row: 3, column: 4 });
        assert_eq!(entity.file_path(), "/repo/A.java");
        assert!(entity.comment().is_none());
        assert!(entity.as_field().is_some());
        assert!(entity.as_callable().is_none());
    }

    #[test]
    fn test_set_file_path() {
        let mut entity = field("count");
        entity.set_file_path("/other/B.java");
        assert_eq!(entity.file_path(), "/other/B.java");
    }

    #[test]
    fn test_serialized_type_tag() {
        let json = serde_json::to_value(field("count")).unwrap();
        assert_eq!(json["type"], "FieldDefinition");
        assert_eq!(json["name"], "count");
        assert_eq!(json["field_type"], "int");
    }

    #[test]
    fn test_parameter_serializes_type_key() {
        let json = serde_json::to_value(Parameter::new("count", "int")).unwrap();
        assert_eq!(json, serde_json::json!({"name": "count", "type": "int"}));
    }

    #[test]
    fn test_annotation_is_a_type_definition() {
        let entity = Entity::Annotation(TypeDefinition {
            id: Uuid::nil(),
            name: "Marker".to_string(),
            start_point: Point { row: 0, column: 0 },
            end_point: Point { row: 2, column: 1 },
            source_code: "@interface Marker {}".to_string(),
            file_path: "/repo/Marker.java".to_string(),
            comment: None,
            body: Some("{}".to_string()),
        });
        assert_eq!(entity.kind(), EntityKind::Annotation);
        assert_eq!(entity.as_type().map(|t| t.name.as_str()), Some("Marker"));

        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "AnnotationDefinition");
        assert_eq!(serde_json::to_value(EntityKind::Annotation).unwrap(), "annotation");
    }
}
