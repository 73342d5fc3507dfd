//! Per-file extraction state.
//!
//! One [`ExtractionContext`] is owned by one top-level extraction call and
//! borrowed by every recursive step of it. It is never shared between files.

use crate::graph::node_id;
use std::collections::HashSet;
use uuid::Uuid;

/// Declaration kinds as far as deduplication is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// `package` statement.
    Package,
    /// Whole-module import (`import os`). Keyed without a line.
    ModuleImport,
    /// Member, type or wildcard import.
    MemberImport,
    /// Class declaration.
    Class,
    /// Interface declaration.
    Interface,
    /// Enum declaration.
    Enum,
    /// Annotation type declaration.
    Annotation,
    /// Function definition.
    Function,
    /// Method declaration.
    Method,
    /// Constructor declaration.
    Constructor,
    /// Field or enum constant.
    Field,
}

impl KeyKind {
    /// Convert to string for id derivation.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyKind::Package => "package",
            KeyKind::ModuleImport => "module_import",
            KeyKind::MemberImport => "import",
            KeyKind::Class => "class",
            KeyKind::Interface => "interface",
            KeyKind::Enum => "enum",
            KeyKind::Annotation => "annotation",
            KeyKind::Function => "function",
            KeyKind::Method => "method",
            KeyKind::Constructor => "constructor",
            KeyKind::Field => "field",
        }
    }
}

/// Composite key identifying one declaration instance within a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    /// Declaration kind.
    pub kind: KeyKind,
    /// Declared name (`module:member` for member imports).
    pub name: String,
    /// Start row (0-based); `None` only for whole-module imports.
    pub line: Option<usize>,
}

impl DedupKey {
    /// Key for a declaration starting at `line`.
    pub fn at(kind: KeyKind, name: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            line: Some(line),
        }
    }

    /// Key for a whole-module import.
    pub fn module_import(module: impl Into<String>) -> Self {
        Self {
            kind: KeyKind::ModuleImport,
            name: module.into(),
            line: None,
        }
    }

    /// Key for a member import of `name` from `module` at `line`.
    pub fn member_import(module: &str, name: &str, line: usize) -> Self {
        Self::at(KeyKind::MemberImport, format!("{}:{}", module, name), line)
    }

    /// String the entity id is derived from.
    pub fn discriminator(&self, file_path: &str) -> String {
        match self.line {
            Some(line) => format!("{}:{}:{}:{}", file_path, self.kind.as_str(), self.name, line),
            None => format!("{}:{}:{}", file_path, self.kind.as_str(), self.name),
        }
    }
}

/// Deduplication table for one file's extraction.
#[derive(Debug)]
pub struct ExtractionContext {
    file_path: String,
    seen: HashSet<DedupKey>,
}

impl ExtractionContext {
    /// Start a fresh context for `file_path`.
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            seen: HashSet::new(),
        }
    }

    /// The file every entity in this context belongs to.
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Record `key`, returning the new entity's id the first time only.
    ///
    /// A second claim of the same key returns `None`: the declaration was
    /// already emitted through another traversal path.
    pub fn claim(&mut self, key: DedupKey) -> Option<Uuid> {
        let id = node_id(&key.discriminator(&self.file_path));
        self.seen.insert(key).then_some(id)
    }

    /// Number of distinct declarations claimed so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been claimed yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_once() {
        let mut ctx = ExtractionContext::new("/repo/A.java");
        let key = DedupKey::at(KeyKind::Method, "run", 4);
        let id = ctx.claim(key.clone()).expect("first claim succeeds");
        assert_eq!(ctx.claim(key.clone()), None);
        assert_eq!(id, node_id(&key.discriminator("/repo/A.java")));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_same_name_different_line_is_distinct() {
        let mut ctx = ExtractionContext::new("/repo/A.java");
        assert!(ctx.claim(DedupKey::at(KeyKind::Method, "run", 4)).is_some());
        assert!(ctx.claim(DedupKey::at(KeyKind::Method, "run", 9)).is_some());
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_same_name_different_kind_is_distinct() {
        let mut ctx = ExtractionContext::new("/repo/Foo.java");
        assert!(ctx.claim(DedupKey::at(KeyKind::Class, "Foo", 1)).is_some());
        assert!(ctx.claim(DedupKey::at(KeyKind::Constructor, "Foo", 1)).is_some());
    }

    #[test]
    fn test_module_import_ignores_line() {
        let mut ctx = ExtractionContext::new("/repo/a.py");
        assert!(ctx.claim(DedupKey::module_import("os")).is_some());
        assert!(ctx.claim(DedupKey::module_import("os")).is_none());
    }

    #[test]
    fn test_ids_are_stable_across_contexts() {
        let key = DedupKey::at(KeyKind::Field, "count", 2);
        let first = ExtractionContext::new("/repo/A.java").claim(key.clone());
        let second = ExtractionContext::new("/repo/A.java").claim(key.clone());
        let other_file = ExtractionContext::new("/repo/B.java").claim(key);
        assert_eq!(first, second);
        assert_ne!(first, other_file);
    }

    #[test]
    fn test_discriminator_format() {
        let key = DedupKey::member_import("java.util", "List", 2);
        assert_eq!(key.discriminator("/r/A.java"), "/r/A.java:import:java.util:List:2");
        let key = DedupKey::module_import("os");
        assert_eq!(key.discriminator("/r/a.py"), "/r/a.py:module_import:os");
    }
}
