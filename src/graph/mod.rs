//! Graph nodes emitted by the extraction engine.
//!
//! One [`Repository`] per run, one [`CodeFile`] aggregate per analyzed file.
//! Entities live inside their file's relationship lists; the graph is flat
//! per file with no parent-declaration links.

pub mod schema;

use crate::symbol::{Entity, EntityKind};
use schema::{relationship_for, Relationship};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// Deterministic identifier for a discriminating string.
///
/// UUID v5 in the OID namespace, so re-extracting the same path yields the
/// same id.
pub fn node_id(discriminator: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, discriminator.as_bytes())
}

/// Root node of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Stable identifier derived from `path`.
    pub id: Uuid,
    /// Repository root path, as given.
    pub path: String,
}

impl Repository {
    /// Create the repository node for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id: node_id(&path),
            path,
        }
    }
}

/// Aggregate node for one source file.
#[derive(Debug, Clone, Serialize)]
pub struct CodeFile {
    /// Stable identifier derived from `file_path`.
    pub id: Uuid,
    /// Path relative to the repository root.
    pub name: String,
    /// Absolute path.
    pub file_path: String,
    /// Full source text. Only set by shallow extraction.
    pub source_code: Option<String>,
    /// Owning repository, assigned by the orchestrator.
    pub part_of: Option<Repository>,
    /// Owned entities, grouped by relationship.
    pub relationships: BTreeMap<Relationship, Vec<Entity>>,
    #[serde(skip)]
    entity_ids: HashSet<Uuid>,
}

impl CodeFile {
    /// Create an empty aggregate for `file_path` named `name`.
    pub fn new(name: impl Into<String>, file_path: impl Into<String>) -> Self {
        let file_path = file_path.into();
        Self {
            id: node_id(&file_path),
            name: name.into(),
            file_path,
            source_code: None,
            part_of: None,
            relationships: BTreeMap::new(),
            entity_ids: HashSet::new(),
        }
    }

    /// Attach the full source text.
    pub fn with_source_code(mut self, source_code: impl Into<String>) -> Self {
        self.source_code = Some(source_code.into());
        self
    }

    /// Classify `entity` into its relationship and take ownership of it.
    ///
    /// The entity is stamped with this file's path first. Returns false if an
    /// entity with the same id is already owned.
    pub fn insert(&mut self, mut entity: Entity) -> bool {
        if !self.entity_ids.insert(entity.id()) {
            return false;
        }
        entity.set_file_path(&self.file_path);
        self.relationships
            .entry(relationship_for(entity.kind()))
            .or_default()
            .push(entity);
        true
    }

    /// Entities owned through `relationship`.
    pub fn entities(&self, relationship: Relationship) -> &[Entity] {
        self.relationships
            .get(&relationship)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every owned entity, in relationship order.
    pub fn all_entities(&self) -> impl Iterator<Item = &Entity> {
        self.relationships.values().flatten()
    }

    /// Number of owned entities of exactly `kind`.
    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.entities(relationship_for(kind))
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }

    /// Total number of owned entities.
    pub fn entity_count(&self) -> usize {
        self.relationships.values().map(Vec::len).sum()
    }

    /// Imports (`depends_on`).
    pub fn imports(&self) -> &[Entity] {
        self.entities(Relationship::DependsOn)
    }

    /// Package statements.
    pub fn packages(&self) -> &[Entity] {
        self.entities(Relationship::ProvidesPackageStatement)
    }

    /// Class definitions.
    pub fn classes(&self) -> &[Entity] {
        self.entities(Relationship::ProvidesClassDefinition)
    }

    /// Interface definitions.
    pub fn interfaces(&self) -> &[Entity] {
        self.entities(Relationship::ProvidesInterfaceDefinition)
    }

    /// Enum definitions.
    pub fn enums(&self) -> &[Entity] {
        self.entities(Relationship::ProvidesEnumDefinition)
    }

    /// Annotation type definitions.
    pub fn annotations(&self) -> &[Entity] {
        self.entities(Relationship::ProvidesAnnotationDefinition)
    }

    /// Function definitions.
    pub fn functions(&self) -> &[Entity] {
        self.entities(Relationship::ProvidesFunctionDefinition)
    }

    /// Method and constructor definitions.
    pub fn methods(&self) -> &[Entity] {
        self.entities(Relationship::ProvidesMethodDefinition)
    }

    /// Field definitions.
    pub fn fields(&self) -> &[Entity] {
        self.entities(Relationship::ProvidesFieldDefinition)
    }
}

/// One item of the extraction output stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum GraphNode {
    /// The run's repository root, always emitted first.
    Repository(Repository),
    /// One file aggregate.
    #[serde(rename = "CodeFile")]
    File(Box<CodeFile>),
}

impl GraphNode {
    /// Node identifier.
    pub fn id(&self) -> Uuid {
        match self {
            GraphNode::Repository(repo) => repo.id,
            GraphNode::File(file) => file.id,
        }
    }

    /// Borrow as a file aggregate.
    pub fn as_file(&self) -> Option<&CodeFile> {
        match self {
            GraphNode::File(file) => Some(file),
            GraphNode::Repository(_) => None,
        }
    }

    /// Borrow as the repository node.
    pub fn as_repository(&self) -> Option<&Repository> {
        match self {
            GraphNode::Repository(repo) => Some(repo),
            GraphNode::File(_) => None,
        }
    }
}
