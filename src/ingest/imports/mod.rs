//! Import statement parsing.
//!
//! Each language module turns one import node into [`ImportFact`]s; the
//! facts are then claimed and emitted as import entities by [`emit_imports`].
//! - Java: `import` and `import static`
//! - Python: `import` and `from ... import`

pub mod java;
pub mod python;

use crate::ingest::context::{DedupKey, ExtractionContext};
use crate::ingest::dispatch::{Located, Visit};
use crate::symbol::{Entity, ImportStatement};
use tree_sitter::Node;

/// One imported name, as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFact {
    /// Imported name (`*` for wildcard imports).
    pub name: String,

    /// Module or package the name comes from.
    pub module: String,

    /// Whether this fact stands for the whole module (`import os`).
    pub whole_module: bool,
}

impl ImportFact {
    /// Fact for a whole-module import.
    pub fn module(module: impl Into<String>) -> Self {
        let module = module.into();
        Self {
            name: module.clone(),
            module,
            whole_module: true,
        }
    }

    /// Fact for `name` imported from `module`.
    pub fn member(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            whole_module: false,
        }
    }

    /// Deduplication key of this fact when found at `line`.
    pub fn key(&self, line: usize) -> DedupKey {
        if self.whole_module {
            DedupKey::module_import(&self.module)
        } else {
            DedupKey::member_import(&self.module, &self.name, line)
        }
    }
}

/// Claim and emit one import entity per fact.
///
/// Every entity spans the whole import statement `node`.
pub fn emit_imports(
    node: Node<'_>,
    facts: Vec<ImportFact>,
    source: &[u8],
    comment: Option<String>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'_>,
) {
    let Some(located) = Located::of(node, source) else {
        return;
    };

    for fact in facts {
        let Some(id) = ctx.claim(fact.key(located.line())) else {
            continue;
        };
        visit.emit(Entity::Import(ImportStatement {
            id,
            name: fact.name,
            module: fact.module,
            start_point: located.start_point,
            end_point: located.end_point,
            source_code: located.source_code.clone(),
            file_path: ctx.file_path().to_string(),
            comment: comment.clone(),
        }));
    }
}
