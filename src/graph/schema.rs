//! Relationship schema for file aggregates.
//!
//! A file owns its entities through named relationships. Which relationship
//! an entity lands in is decided here, by one table, and nowhere else.

use crate::symbol::EntityKind;
use serde::Serialize;

/// A relationship from a file aggregate to the entities it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    /// File imports a module or member.
    DependsOn,
    /// File declares a package.
    ProvidesPackageStatement,
    /// File defines a class.
    ProvidesClassDefinition,
    /// File defines an interface.
    ProvidesInterfaceDefinition,
    /// File defines an enum.
    ProvidesEnumDefinition,
    /// File defines an annotation type.
    ProvidesAnnotationDefinition,
    /// File defines a function.
    ProvidesFunctionDefinition,
    /// File defines a method or constructor.
    ProvidesMethodDefinition,
    /// File defines a field.
    ProvidesFieldDefinition,
}

/// Look up the relationship that owns entities of `kind`.
///
/// This match is the kind → relationship table; every kind has one row.
pub fn relationship_for(kind: EntityKind) -> Relationship {
    match kind {
        EntityKind::Package => Relationship::ProvidesPackageStatement,
        EntityKind::Import => Relationship::DependsOn,
        EntityKind::Class => Relationship::ProvidesClassDefinition,
        EntityKind::Interface => Relationship::ProvidesInterfaceDefinition,
        EntityKind::Enum => Relationship::ProvidesEnumDefinition,
        EntityKind::Annotation => Relationship::ProvidesAnnotationDefinition,
        EntityKind::Function => Relationship::ProvidesFunctionDefinition,
        EntityKind::Method | EntityKind::Constructor => Relationship::ProvidesMethodDefinition,
        EntityKind::Field => Relationship::ProvidesFieldDefinition,
    }
}
