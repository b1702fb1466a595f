//! Parser AST types.
//!
//! The output of [`parser`](super::parser): type system definitions as they
//! appear in the document, before extensions are merged and names resolved.
//! Names keep their source span for diagnostics.

use schemascope_core::schema::{FieldKind, NodeKind, TypeRef};

use crate::span::{Span, Spanned};

/// A parsed schema document.
#[derive(Debug, Clone, Default)]
pub struct Document<'a> {
    pub definitions: Vec<Definition<'a>>,
}

/// A top-level definition or extension.
#[derive(Debug, Clone)]
pub enum Definition<'a> {
    Schema(SchemaDefinition<'a>),
    Type(TypeDefinition<'a>),
    Directive(DirectiveDefinition<'a>),
}

/// `schema { query: Query ... }` or `extend schema ...`.
#[derive(Debug, Clone)]
pub struct SchemaDefinition<'a> {
    pub extend: bool,
    pub description: Option<String>,
    pub directives: Vec<String>,
    pub operations: Vec<(Spanned<&'a str>, Spanned<&'a str>)>,
    pub span: Span,
}

/// Any named type definition or extension.
#[derive(Debug, Clone)]
pub struct TypeDefinition<'a> {
    pub extend: bool,
    pub kind: NodeKind,
    pub name: Spanned<&'a str>,
    pub description: Option<String>,
    pub interfaces: Vec<Spanned<&'a str>>,
    pub directives: Vec<String>,
    pub fields: Vec<FieldDefinition<'a>>,
}

/// A field, input value, enum value or union member.
#[derive(Debug, Clone)]
pub struct FieldDefinition<'a> {
    pub kind: FieldKind,
    pub name: Spanned<&'a str>,
    pub description: Option<String>,
    pub ty: Option<Spanned<TypeRef>>,
    pub arguments: Vec<FieldDefinition<'a>>,
    pub default_value: Option<String>,
    pub directives: Vec<String>,
}

impl<'a> FieldDefinition<'a> {
    pub fn new(kind: FieldKind, name: Spanned<&'a str>) -> Self {
        Self {
            kind,
            name,
            description: None,
            ty: None,
            arguments: Vec::new(),
            default_value: None,
            directives: Vec::new(),
        }
    }
}

/// `directive @name(args) repeatable on LOCATION | ...`.
#[derive(Debug, Clone)]
pub struct DirectiveDefinition<'a> {
    pub name: Spanned<&'a str>,
    pub description: Option<String>,
    pub arguments: Vec<FieldDefinition<'a>>,
    pub repeatable: bool,
    pub locations: Vec<Spanned<&'a str>>,
}
