//! Python entity extraction.
//!
//! Top-level and class-level definitions only: function bodies and
//! compound statements (`if`, `try`, ...) are not walked.

use crate::ingest::context::{DedupKey, ExtractionContext, KeyKind};
use crate::ingest::detect::Language;
use crate::ingest::dispatch::{
    field_text, text_of, LanguageExtractor, Located, NodeHandler, Scope, Visit,
};
use crate::ingest::imports::{
    emit_imports,
    python::{parse_import_from_statement, parse_import_statement},
};
use crate::symbol::{CallableDefinition, Entity, Parameter, TypeDefinition};
use tree_sitter::Node;

/// Python [`LanguageExtractor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonExtractor;

const HANDLERS: &[(&str, NodeHandler)] = &[
    ("import_statement", handle_import),
    ("import_from_statement", handle_import_from),
    ("function_definition", handle_function),
    ("class_definition", handle_class),
    ("decorated_definition", handle_decorated),
];

impl LanguageExtractor for PythonExtractor {
    fn language(&self) -> Language {
        Language::Python
    }

    fn handlers(&self) -> &'static [(&'static str, NodeHandler)] {
        HANDLERS
    }
}

fn handle_import<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    let facts = parse_import_statement(node, scope.source);
    emit_imports(node, facts, scope.source, None, ctx, visit);
}

fn handle_import_from<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    let facts = parse_import_from_statement(node, scope.source);
    emit_imports(node, facts, scope.source, None, ctx, visit);
}

fn handle_function<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    let Some(name) = field_text(node, "name", scope.source) else {
        return;
    };
    let Some(located) = Located::of(node, scope.source) else {
        return;
    };
    let Some(id) = ctx.claim(DedupKey::at(KeyKind::Function, &name, located.line())) else {
        return;
    };
    let body = node.child_by_field_name("body");

    visit.emit(Entity::Function(CallableDefinition {
        id,
        name,
        start_point: located.start_point,
        end_point: located.end_point,
        source_code: located.source_code,
        file_path: ctx.file_path().to_string(),
        comment: body.and_then(|b| docstring(b, scope.source)),
        parameters: extract_parameters(node, scope.source),
        return_type: field_text(node, "return_type", scope.source),
        body: body.and_then(|b| text_of(b, scope.source)),
    }));
}

fn handle_class<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    let Some(name) = field_text(node, "name", scope.source) else {
        return;
    };
    let Some(located) = Located::of(node, scope.source) else {
        return;
    };
    let body = node.child_by_field_name("body");

    if let Some(id) = ctx.claim(DedupKey::at(KeyKind::Class, &name, located.line())) {
        visit.emit(Entity::Class(TypeDefinition {
            id,
            name: name.clone(),
            start_point: located.start_point,
            end_point: located.end_point,
            source_code: located.source_code,
            file_path: ctx.file_path().to_string(),
            comment: body.and_then(|b| docstring(b, scope.source)),
            body: body.and_then(|b| text_of(b, scope.source)),
        }));
    }

    if let Some(body) = body {
        visit.descend(body, Some(name));
    }
}

fn handle_decorated<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    _ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    visit.descend(node, scope.owner.map(str::to_string));
}

/// Leading string literal of a block, verbatim.
fn docstring(body: Node<'_>, source: &[u8]) -> Option<String> {
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let literal = first.named_child(0)?;
    if literal.kind() != "string" {
        return None;
    }
    text_of(literal, source)
}

/// Annotated parameters only; bare names carry no type.
fn extract_parameters(node: Node<'_>, source: &[u8]) -> Vec<Parameter> {
    let Some(params) = node.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut parameters = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        let parsed = match param.kind() {
            "typed_parameter" => typed_parameter(param, source),
            "typed_default_parameter" => field_text(param, "name", source)
                .zip(field_text(param, "type", source))
                .map(|(name, type_name)| Parameter::new(name, type_name)),
            _ => None,
        };
        if let Some(parameter) = parsed {
            parameters.push(parameter);
        }
    }
    parameters
}

/// `x: int`, `*args: str`, `**kw: Any`. The name has no field of its own.
///
/// Splat markers are not part of the name: `*args: str` is `args` of `str`.
fn typed_parameter(param: Node<'_>, source: &[u8]) -> Option<Parameter> {
    let type_node = param.child_by_field_name("type")?;
    let name_node = param.named_child(0)?;
    if name_node.id() == type_node.id() {
        return None;
    }
    let name = text_of(name_node, source)?;
    Some(Parameter::new(
        name.trim_start_matches('*'),
        text_of(type_node, source)?,
    ))
}
