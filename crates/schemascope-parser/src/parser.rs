//! Parser for SDL tokens.
//!
//! Transforms the token stream from the [`lexer`](super::lexer) into the AST
//! defined in [`parser_types`](super::parser_types). The public entry point is
//! [`build_document`].
//!
//! The parser is a recursive descent over the token slice. When a definition
//! fails to parse, the error is recorded and parsing resumes at the next token
//! that looks like the start of a definition, so one pass reports every
//! broken definition.

use log::trace;

use schemascope_core::schema::{FieldKind, NodeKind, TypeRef};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError, Result},
    parser_types as types,
    printer::quote,
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Keywords that may begin a type definition, mapped to their node kind.
const TYPE_KEYWORDS: [(&str, NodeKind); 6] = [
    ("type", NodeKind::Object),
    ("interface", NodeKind::Interface),
    ("input", NodeKind::Input),
    ("enum", NodeKind::Enum),
    ("scalar", NodeKind::Scalar),
    ("union", NodeKind::Union),
];

fn type_keyword(name: &str) -> Option<NodeKind> {
    TYPE_KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == name)
        .map(|(_, kind)| *kind)
}

/// Cursor over the positioned tokens of one document.
struct Parser<'t, 'a> {
    tokens: &'t [PositionedToken<'a>],
    pos: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(tokens: &'t [PositionedToken<'a>]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&'t PositionedToken<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&'t PositionedToken<'a>> {
        self.tokens.get(self.pos + n)
    }

    fn at(&self, token: &Token<'_>) -> bool {
        self.peek().is_some_and(|t| t.token == *token)
    }

    fn at_name(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|t| t.token.is_name(keyword))
    }

    fn bump(&mut self) -> Option<&'t PositionedToken<'a>> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consumes `token` if it is next, returning its span.
    fn eat(&mut self, token: &Token<'_>) -> Option<Span> {
        if self.at(token) {
            self.bump().map(|t| t.span)
        } else {
            None
        }
    }

    fn expect(&mut self, token: &Token<'_>, expected: &str) -> Result<Span> {
        self.eat(token).ok_or_else(|| self.unexpected(expected))
    }

    fn expect_name(&mut self, expected: &str) -> Result<Spanned<&'a str>> {
        match self.peek() {
            Some(PositionedToken {
                token: Token::Name(name),
                span,
            }) => {
                self.pos += 1;
                Ok(Spanned::new(*name, *span))
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<Span> {
        if self.at_name(keyword) {
            Ok(self.bump().map(|t| t.span).unwrap_or_default())
        } else {
            Err(self.unexpected(&format!("`{keyword}`")))
        }
    }

    /// Span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or_default()
    }

    /// Builds the diagnostic for an unexpected token at the cursor.
    fn unexpected(&self, expected: &str) -> Diagnostic {
        match self.peek() {
            Some(found) => Diagnostic::error(format!("expected {expected}, found {}", found.token))
                .with_code(ErrorCode::E100)
                .with_label(found.span, ErrorCode::E100.description()),
            None => {
                let end = self.previous_span().end();
                Diagnostic::error(format!("unexpected end of input, expected {expected}"))
                    .with_code(ErrorCode::E101)
                    .with_label(Span::new(end..end), ErrorCode::E101.description())
                    .with_help("the document ends in the middle of a definition")
            }
        }
    }

    /// Optional description string preceding a definition, field or value.
    fn description(&mut self) -> Option<String> {
        match self.peek().map(|t| &t.token) {
            Some(Token::String(text) | Token::BlockString(text)) => {
                self.pos += 1;
                Some(text.clone())
            }
            _ => None,
        }
    }

    /// Returns true if the cursor looks like the start of a top-level definition.
    fn at_definition_start(&self) -> bool {
        let offset = match self.peek().map(|t| &t.token) {
            Some(Token::String(_) | Token::BlockString(_)) => 1,
            _ => 0,
        };
        let (Some(first), Some(next)) = (self.peek_nth(offset), self.peek_nth(offset + 1)) else {
            return false;
        };
        let Token::Name(keyword) = first.token else {
            return false;
        };
        match keyword {
            "schema" => matches!(next.token, Token::LeftBrace | Token::At),
            "directive" => next.token == Token::At,
            "extend" => matches!(next.token, Token::Name(_)),
            other => type_keyword(other).is_some() && matches!(next.token, Token::Name(_)),
        }
    }

    /// Skips tokens after an error until the next plausible definition.
    fn recover(&mut self) {
        self.bump();
        while !self.is_eof() && !self.at_definition_start() {
            self.pos += 1;
        }
    }

    fn document(&mut self, diagnostics: &mut DiagnosticCollector) -> types::Document<'a> {
        let mut document = types::Document::default();
        while !self.is_eof() {
            let start = self.pos;
            match self.definition() {
                Ok(definition) => document.definitions.push(definition),
                Err(diagnostic) => {
                    diagnostics.emit(diagnostic);
                    self.pos = start;
                    self.recover();
                }
            }
        }
        document
    }

    fn definition(&mut self) -> Result<types::Definition<'a>> {
        let description = self.description();

        let extend = self.at_name("extend");
        if extend {
            self.bump();
        }

        let keyword = match self.peek() {
            Some(PositionedToken {
                token: Token::Name(keyword),
                ..
            }) => *keyword,
            Some(found) => {
                return Err(Diagnostic::error(format!(
                    "expected a type system definition, found {}",
                    found.token
                ))
                .with_code(ErrorCode::E102)
                .with_label(found.span, ErrorCode::E102.description())
                .with_help("schema documents may only contain type, directive and schema definitions"));
            }
            None => return Err(self.unexpected("a definition")),
        };

        if keyword == "schema" {
            return self
                .schema_definition(extend, description)
                .map(types::Definition::Schema);
        }
        if keyword == "directive" && !extend {
            return self
                .directive_definition(description)
                .map(types::Definition::Directive);
        }
        if let Some(kind) = type_keyword(keyword) {
            return self
                .type_definition(kind, extend, description)
                .map(types::Definition::Type);
        }

        let span = self.peek().map(|t| t.span).unwrap_or_default();
        Err(
            Diagnostic::error(format!("unknown definition `{keyword}`"))
                .with_code(ErrorCode::E102)
                .with_label(span, ErrorCode::E102.description())
                .with_help(
                    "expected one of `type`, `interface`, `input`, `enum`, `scalar`, `union`, `directive` or `schema`",
                ),
        )
    }

    fn schema_definition(
        &mut self,
        extend: bool,
        description: Option<String>,
    ) -> Result<types::SchemaDefinition<'a>> {
        let start = self.expect_keyword("schema")?;
        let directives = self.directives()?;

        let mut operations = Vec::new();
        let has_body = self.at(&Token::LeftBrace);
        if has_body || !extend {
            self.expect(&Token::LeftBrace, "`{`")?;
            while self.eat(&Token::RightBrace).is_none() {
                let operation = self.expect_name("an operation type")?;
                self.expect(&Token::Colon, "`:`")?;
                let ty = self.expect_name("a type name")?;
                operations.push((operation, ty));
            }
        }

        Ok(types::SchemaDefinition {
            extend,
            description,
            directives,
            operations,
            span: start.union(self.previous_span()),
        })
    }

    fn type_definition(
        &mut self,
        kind: NodeKind,
        extend: bool,
        description: Option<String>,
    ) -> Result<types::TypeDefinition<'a>> {
        self.bump();
        let name = self.expect_name("a type name")?;
        trace!(name = *name.inner(), extend; "Parsing type definition");

        let interfaces = if matches!(kind, NodeKind::Object | NodeKind::Interface) {
            self.implements_interfaces()?
        } else {
            Vec::new()
        };
        let directives = self.directives()?;

        let fields = match kind {
            NodeKind::Object | NodeKind::Interface if self.at(&Token::LeftBrace) => {
                self.braced(Self::field_definition)?
            }
            NodeKind::Input if self.at(&Token::LeftBrace) => self.braced(Self::input_value)?,
            NodeKind::Enum if self.at(&Token::LeftBrace) => self.braced(Self::enum_value)?,
            NodeKind::Union if self.eat(&Token::Equals).is_some() => self.union_members()?,
            _ => Vec::new(),
        };

        Ok(types::TypeDefinition {
            extend,
            kind,
            name,
            description,
            interfaces,
            directives,
            fields,
        })
    }

    fn implements_interfaces(&mut self) -> Result<Vec<Spanned<&'a str>>> {
        let mut interfaces = Vec::new();
        if !self.at_name("implements") {
            return Ok(interfaces);
        }
        self.bump();
        self.eat(&Token::Amp);
        interfaces.push(self.expect_name("an interface name")?);
        while self.eat(&Token::Amp).is_some() {
            interfaces.push(self.expect_name("an interface name")?);
        }
        Ok(interfaces)
    }

    fn union_members(&mut self) -> Result<Vec<types::FieldDefinition<'a>>> {
        self.eat(&Token::Pipe);
        let mut members = vec![self.union_member()?];
        while self.eat(&Token::Pipe).is_some() {
            members.push(self.union_member()?);
        }
        Ok(members)
    }

    fn union_member(&mut self) -> Result<types::FieldDefinition<'a>> {
        let name = self.expect_name("a union member type")?;
        let mut member = types::FieldDefinition::new(FieldKind::UnionMember, name.clone());
        member.ty = Some(Spanned::new(TypeRef::named(name.inner()), name.span()));
        Ok(member)
    }

    /// Parses `{ item* }` with the given item parser.
    fn braced<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        self.expect(&Token::LeftBrace, "`{`")?;
        let mut items = Vec::new();
        while self.eat(&Token::RightBrace).is_none() {
            items.push(item(self)?);
        }
        Ok(items)
    }

    fn field_definition(&mut self) -> Result<types::FieldDefinition<'a>> {
        let description = self.description();
        let name = self.expect_name("a field name")?;
        let mut field = types::FieldDefinition::new(FieldKind::Field, name);
        field.description = description;
        field.arguments = self.arguments_definition()?;
        self.expect(&Token::Colon, "`:`")?;
        field.ty = Some(self.type_ref()?);
        field.directives = self.directives()?;
        Ok(field)
    }

    fn arguments_definition(&mut self) -> Result<Vec<types::FieldDefinition<'a>>> {
        if self.eat(&Token::LeftParen).is_none() {
            return Ok(Vec::new());
        }
        let mut arguments = Vec::new();
        while self.eat(&Token::RightParen).is_none() {
            arguments.push(self.input_value()?);
        }
        Ok(arguments)
    }

    fn input_value(&mut self) -> Result<types::FieldDefinition<'a>> {
        let description = self.description();
        let name = self.expect_name("an input value name")?;
        let mut value = types::FieldDefinition::new(FieldKind::InputValue, name);
        value.description = description;
        self.expect(&Token::Colon, "`:`")?;
        value.ty = Some(self.type_ref()?);
        if self.eat(&Token::Equals).is_some() {
            value.default_value = Some(self.value()?);
        }
        value.directives = self.directives()?;
        Ok(value)
    }

    fn enum_value(&mut self) -> Result<types::FieldDefinition<'a>> {
        let description = self.description();
        let name = self.expect_name("an enum value")?;
        let mut value = types::FieldDefinition::new(FieldKind::EnumValue, name);
        value.description = description;
        value.directives = self.directives()?;
        Ok(value)
    }

    /// Parses a type reference such as `String`, `[Post!]` or `[[Int]!]!`.
    fn type_ref(&mut self) -> Result<Spanned<TypeRef>> {
        let (ty, span) = if let Some(open) = self.eat(&Token::LeftBracket) {
            let inner = self.type_ref()?;
            let close = self.expect(&Token::RightBracket, "`]`")?;
            (inner.into_inner().list(), open.union(close))
        } else {
            let name = self.expect_name("a type")?;
            (TypeRef::named(name.inner()), name.span())
        };

        match self.eat(&Token::Bang) {
            Some(bang) => Ok(Spanned::new(ty.non_null(), span.union(bang))),
            None => Ok(Spanned::new(ty, span)),
        }
    }

    /// Parses a constant value and renders it back to normalized SDL text.
    fn value(&mut self) -> Result<String> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected("a value"));
        };
        match &token.token {
            Token::Name(name) => {
                self.pos += 1;
                Ok((*name).to_string())
            }
            Token::Number(number) => {
                self.pos += 1;
                Ok((*number).to_string())
            }
            Token::String(text) | Token::BlockString(text) => {
                self.pos += 1;
                Ok(quote(text))
            }
            Token::LeftBracket => {
                self.pos += 1;
                let mut items = Vec::new();
                while self.eat(&Token::RightBracket).is_none() {
                    items.push(self.value()?);
                }
                Ok(format!("[{}]", items.join(", ")))
            }
            Token::LeftBrace => {
                self.pos += 1;
                let mut entries = Vec::new();
                while self.eat(&Token::RightBrace).is_none() {
                    let key = self.expect_name("an object field name")?;
                    self.expect(&Token::Colon, "`:`")?;
                    entries.push(format!("{}: {}", key.inner(), self.value()?));
                }
                Ok(format!("{{{}}}", entries.join(", ")))
            }
            _ => Err(self.unexpected("a value")),
        }
    }

    /// Parses applied directives and renders each as SDL, e.g. `@deprecated(reason: "old")`.
    fn directives(&mut self) -> Result<Vec<String>> {
        let mut directives = Vec::new();
        while self.eat(&Token::At).is_some() {
            let name = self.expect_name("a directive name")?;
            let mut rendered = format!("@{}", name.inner());
            if self.eat(&Token::LeftParen).is_some() {
                let mut arguments = Vec::new();
                while self.eat(&Token::RightParen).is_none() {
                    let key = self.expect_name("an argument name")?;
                    self.expect(&Token::Colon, "`:`")?;
                    arguments.push(format!("{}: {}", key.inner(), self.value()?));
                }
                rendered.push_str(&format!("({})", arguments.join(", ")));
            }
            directives.push(rendered);
        }
        Ok(directives)
    }

    fn directive_definition(
        &mut self,
        description: Option<String>,
    ) -> Result<types::DirectiveDefinition<'a>> {
        self.expect_keyword("directive")?;
        self.expect(&Token::At, "`@`")?;
        let name = self.expect_name("a directive name")?;
        let arguments = self.arguments_definition()?;

        let repeatable = self.at_name("repeatable");
        if repeatable {
            self.bump();
        }

        self.expect_keyword("on")?;
        self.eat(&Token::Pipe);
        let mut locations = vec![self.expect_name("a directive location")?];
        while self.eat(&Token::Pipe).is_some() {
            locations.push(self.expect_name("a directive location")?);
        }

        Ok(types::DirectiveDefinition {
            name,
            description,
            arguments,
            repeatable,
            locations,
        })
    }
}

/// Parses a token stream into a document, collecting every syntax error.
pub fn build_document<'a>(
    tokens: &[PositionedToken<'a>],
) -> std::result::Result<types::Document<'a>, ParseError> {
    let mut diagnostics = DiagnosticCollector::new();
    let document = Parser::new(tokens).document(&mut diagnostics);
    diagnostics.finish().map(|_| document)
}
