//! Java entity extraction.
//!
//! Handles packages, imports, classes, records, interfaces, enums, annotation
//! types, enum constants, methods, constructors and fields. Declarations
//! nested in type bodies, enum constant bodies and method bodies are found by
//! descending into those containers.

use crate::ingest::context::{DedupKey, ExtractionContext, KeyKind};
use crate::ingest::detect::Language;
use crate::ingest::dispatch::{
    field_text, preceding_doc_comment, text_of, LanguageExtractor, Located, NodeHandler, Scope,
    Visit,
};
use crate::ingest::imports::{emit_imports, java::parse_import_declaration};
use crate::symbol::{
    CallableDefinition, Entity, FieldDefinition, PackageStatement, Parameter, TypeDefinition,
};
use tree_sitter::Node;

/// Javadoc marker.
pub const DOC_MARKER: &str = "/**";

/// Java [`LanguageExtractor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaExtractor;

const HANDLERS: &[(&str, NodeHandler)] = &[
    ("package_declaration", handle_package),
    ("import_declaration", handle_import),
    ("class_declaration", handle_class),
    ("record_declaration", handle_class),
    ("interface_declaration", handle_interface),
    ("enum_declaration", handle_enum),
    ("annotation_type_declaration", handle_annotation),
    ("enum_body_declarations", handle_transparent),
    ("enum_constant", handle_enum_constant),
    ("method_declaration", handle_method),
    ("constructor_declaration", handle_constructor),
    ("field_declaration", handle_field),
    ("constant_declaration", handle_field),
];

impl LanguageExtractor for JavaExtractor {
    fn language(&self) -> Language {
        Language::Java
    }

    fn handlers(&self) -> &'static [(&'static str, NodeHandler)] {
        HANDLERS
    }
}

fn handle_package<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    let mut cursor = node.walk();
    let Some(name) = node
        .named_children(&mut cursor)
        .find(|child| matches!(child.kind(), "scoped_identifier" | "identifier"))
        .and_then(|child| text_of(child, scope.source))
    else {
        return;
    };
    let Some(located) = Located::of(node, scope.source) else {
        return;
    };
    let Some(id) = ctx.claim(DedupKey::at(KeyKind::Package, &name, located.line())) else {
        return;
    };

    visit.emit(Entity::Package(PackageStatement {
        id,
        name,
        start_point: located.start_point,
        end_point: located.end_point,
        source_code: located.source_code,
        file_path: ctx.file_path().to_string(),
        comment: preceding_doc_comment(node, scope.source, DOC_MARKER),
    }));
}

fn handle_import<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    if let Some(fact) = parse_import_declaration(node, scope.source) {
        let comment = preceding_doc_comment(node, scope.source, DOC_MARKER);
        emit_imports(node, vec![fact], scope.source, comment, ctx, visit);
    }
}

fn handle_class<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    type_declaration(node, scope, ctx, visit, KeyKind::Class, Entity::Class);
}

fn handle_interface<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    type_declaration(node, scope, ctx, visit, KeyKind::Interface, Entity::Interface);
}

fn handle_enum<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    type_declaration(node, scope, ctx, visit, KeyKind::Enum, Entity::Enum);
}

/// `@interface` types. Element declarations (`String value();`) are not
/// entities; constants and nested types in the body are.
fn handle_annotation<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    type_declaration(node, scope, ctx, visit, KeyKind::Annotation, Entity::Annotation);
}

fn type_declaration<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
    kind: KeyKind,
    wrap: fn(TypeDefinition) -> Entity,
) {
    let Some(name) = field_text(node, "name", scope.source) else {
        return;
    };
    let Some(located) = Located::of(node, scope.source) else {
        return;
    };
    let body = node.child_by_field_name("body");

    if let Some(id) = ctx.claim(DedupKey::at(kind, &name, located.line())) {
        visit.emit(wrap(TypeDefinition {
            id,
            name: name.clone(),
            start_point: located.start_point,
            end_point: located.end_point,
            source_code: located.source_code,
            file_path: ctx.file_path().to_string(),
            comment: preceding_doc_comment(node, scope.source, DOC_MARKER),
            body: body.and_then(|b| text_of(b, scope.source)),
        }));
    }

    // Members are keyed on their own, so walking the body again is harmless.
    if let Some(body) = body {
        visit.descend(body, Some(name));
    }
}

fn handle_transparent<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    _ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    visit.descend(node, scope.owner.map(str::to_string));
}

fn handle_enum_constant<'t>(
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

    if let Some(id) = ctx.claim(DedupKey::at(KeyKind::Field, &name, located.line())) {
        visit.emit(Entity::Field(FieldDefinition {
            id,
            name,
            field_type: scope.owner.map(str::to_string),
            start_point: located.start_point,
            end_point: located.end_point,
            source_code: located.source_code,
            file_path: ctx.file_path().to_string(),
            comment: preceding_doc_comment(node, scope.source, DOC_MARKER),
        }));
    }

    if let Some(body) = node.child_by_field_name("body") {
        visit.descend(body, scope.owner.map(str::to_string));
    }
}

fn handle_method<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    let return_type = field_text(node, "type", scope.source);
    callable_declaration(node, scope, ctx, visit, KeyKind::Method, return_type, Entity::Method);
}

fn handle_constructor<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    callable_declaration(node, scope, ctx, visit, KeyKind::Constructor, None, Entity::Constructor);
}

fn callable_declaration<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
    kind: KeyKind,
    return_type: Option<String>,
    wrap: fn(CallableDefinition) -> Entity,
) {
    let Some(name) = field_text(node, "name", scope.source) else {
        return;
    };
    let Some(located) = Located::of(node, scope.source) else {
        return;
    };
    let body = node.child_by_field_name("body");

    if let Some(id) = ctx.claim(DedupKey::at(kind, &name, located.line())) {
        visit.emit(wrap(CallableDefinition {
            id,
            name,
            start_point: located.start_point,
            end_point: located.end_point,
            source_code: located.source_code,
            file_path: ctx.file_path().to_string(),
            comment: preceding_doc_comment(node, scope.source, DOC_MARKER),
            parameters: extract_parameters(node, scope.source),
            return_type,
            body: body.and_then(|b| text_of(b, scope.source)),
        }));
    }

    // Local classes live in method bodies.
    if let Some(body) = body {
        visit.descend(body, scope.owner.map(str::to_string));
    }
}

/// Parameters with both a type and a name, in declaration order.
fn extract_parameters(node: Node<'_>, source: &[u8]) -> Vec<Parameter> {
    let Some(params) = node.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut parameters = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        let parsed = match param.kind() {
            "formal_parameter" => formal_parameter(param, source),
            "spread_parameter" => spread_parameter(param, source),
            _ => None,
        };
        if let Some(parameter) = parsed {
            parameters.push(parameter);
        }
    }
    parameters
}

fn formal_parameter(param: Node<'_>, source: &[u8]) -> Option<Parameter> {
    let type_name = field_text(param, "type", source)?;
    let name = field_text(param, "name", source)?;
    Some(Parameter::new(name, type_name))
}

/// `String... args`: the grammar gives no field names here.
fn spread_parameter(param: Node<'_>, source: &[u8]) -> Option<Parameter> {
    let mut cursor = param.walk();
    let mut type_name = None;
    let mut name = None;
    for child in param.named_children(&mut cursor) {
        match child.kind() {
            "modifiers" | "annotation" | "marker_annotation" => {}
            "variable_declarator" => name = field_text(child, "name", source),
            "identifier" if type_name.is_some() => name = text_of(child, source),
            _ if type_name.is_none() => type_name = text_of(child, source),
            _ => {}
        }
    }
    Some(Parameter::new(name?, format!("{}...", type_name?)))
}

fn handle_field<'t>(
    node: Node<'t>,
    scope: &Scope<'_>,
    ctx: &mut ExtractionContext,
    visit: &mut Visit<'t>,
) {
    let field_type = field_text(node, "type", scope.source);
    let comment = preceding_doc_comment(node, scope.source, DOC_MARKER);

    let mut cursor = node.walk();
    for declarator in node.children_by_field_name("declarator", &mut cursor) {
        let Some(name) = field_text(declarator, "name", scope.source) else {
            continue;
        };
        let Some(located) = Located::of(declarator, scope.source) else {
            continue;
        };
        let Some(id) = ctx.claim(DedupKey::at(KeyKind::Field, &name, located.line())) else {
            continue;
        };

        visit.emit(Entity::Field(FieldDefinition {
            id,
            name,
            field_type: field_type.clone(),
            start_point: located.start_point,
            end_point: located.end_point,
            source_code: located.source_code,
            file_path: ctx.file_path().to_string(),
            comment: comment.clone(),
        }));
    }
}
