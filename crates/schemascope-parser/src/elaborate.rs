//! Elaboration phase.
//!
//! Turns the parsed [`Document`](crate::parser_types::Document) into a
//! [`Schema`]: base definitions become nodes in document order, `extend`
//! definitions are merged into their base, operation roots are resolved and
//! every type name is checked against the known types.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use schemascope_core::{
    identifier::Id,
    schema::{Field, FieldKind, NodeKind, OperationRoots, Schema, SchemaNode, is_builtin_scalar},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    parser_types as types,
    span::{Span, Spanned},
};

/// Configuration for parsing one schema document.
///
/// # Example
///
/// ```
/// # use schemascope_parser::{parse, ParseConfig};
/// // Types defined in a shared library are known to the main schema
/// let config = ParseConfig::schema().with_external_types(["DateTime"]);
/// let schema = parse("type Event { at: DateTime }", &config).unwrap();
/// assert_eq!(schema.origin(), "schema");
/// ```
#[derive(Debug, Clone)]
pub struct ParseConfig {
    origin: String,
    external_types: HashSet<String>,
}

impl ParseConfig {
    /// Creates a configuration scoping node identifiers under `origin`.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            external_types: HashSet::new(),
        }
    }

    /// Configuration for the main schema tree.
    pub fn schema() -> Self {
        Self::new("schema")
    }

    /// Configuration for the library tree.
    pub fn library() -> Self {
        Self::new("library")
    }

    /// Declares type names defined elsewhere; references to them are not reported.
    pub fn with_external_types<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.external_types.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn is_external(&self, name: &str) -> bool {
        self.external_types.contains(name)
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::schema()
    }
}

/// Per-node bookkeeping kept while merging definitions.
struct NodeEntry<'a> {
    node: SchemaNode,
    span: Span,
    field_spans: HashMap<&'a str, Span>,
}

pub(crate) struct Builder<'c, 'a> {
    config: &'c ParseConfig,
    diagnostics: DiagnosticCollector,
    entries: Vec<NodeEntry<'a>>,
    type_index: HashMap<&'a str, usize>,
    directive_index: HashMap<&'a str, usize>,
    schema_span: Option<Span>,
    schema_description: Option<String>,
    schema_directives: Vec<String>,
    operations: Vec<(Spanned<&'a str>, Spanned<&'a str>)>,
    known_types: HashSet<&'a str>,
}

impl<'c, 'a> Builder<'c, 'a> {
    pub(crate) fn new(config: &'c ParseConfig) -> Self {
        Self {
            config,
            diagnostics: DiagnosticCollector::new(),
            entries: Vec::new(),
            type_index: HashMap::new(),
            directive_index: HashMap::new(),
            schema_span: None,
            schema_description: None,
            schema_directives: Vec::new(),
            operations: Vec::new(),
            known_types: HashSet::new(),
        }
    }

    /// Elaborates the document, returning the schema and any warnings.
    pub(crate) fn build(
        mut self,
        document: types::Document<'a>,
    ) -> Result<(Schema, Vec<Diagnostic>), ParseError> {
        debug!(origin = self.config.origin(); "Elaborating schema document");

        self.known_types = document
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                types::Definition::Type(ty) if !ty.extend => Some(*ty.name.inner()),
                _ => None,
            })
            .collect();

        let mut extensions = Vec::new();
        for definition in document.definitions {
            match definition {
                types::Definition::Type(ty) if ty.extend => extensions.push(ty),
                types::Definition::Type(ty) => self.add_type(ty),
                types::Definition::Directive(directive) => self.add_directive(directive),
                types::Definition::Schema(schema) => self.add_schema(schema),
            }
        }
        for extension in extensions {
            self.apply_extension(extension);
        }

        let operations = self.resolve_operations();

        let mut schema = Schema::new(self.config.origin());
        schema.set_operations(operations);
        schema.set_schema_definition(self.schema_description, self.schema_directives);
        for entry in self.entries {
            schema.push(entry.node);
        }
        trace!(nodes = schema.len(); "Elaborated schema");

        let warnings = self.diagnostics.finish()?;
        Ok((schema, warnings))
    }

    fn add_type(&mut self, ty: types::TypeDefinition<'a>) {
        let name = *ty.name.inner();
        if let Some(&index) = self.type_index.get(name) {
            let first = self.entries[index].span;
            self.diagnostics.emit(
                Diagnostic::error(format!("type `{name}` is defined multiple times"))
                    .with_code(ErrorCode::E200)
                    .with_label(ty.name.span(), "duplicate definition")
                    .with_secondary_label(first, "first defined here")
                    .with_help(format!(
                        "use `extend {} {name}` to add to the existing definition",
                        ty.kind.keyword()
                    )),
            );
            return;
        }

        self.check_interfaces(&ty.interfaces);
        let origin = Id::new(self.config.origin());
        let mut node = SchemaNode::new(origin, name, ty.kind)
            .with_interfaces(ty.interfaces.iter().map(|i| Id::new(i.inner())).collect())
            .with_directives(ty.directives);
        if let Some(description) = ty.description {
            node = node.with_description(description);
        }

        let mut entry = NodeEntry {
            node,
            span: ty.name.span(),
            field_spans: HashMap::new(),
        };
        let fields = self.convert_fields(&mut entry, &ty.fields);
        entry.node = entry.node.with_fields(fields);

        self.type_index.insert(name, self.entries.len());
        self.entries.push(entry);
    }

    fn add_directive(&mut self, directive: types::DirectiveDefinition<'a>) {
        let name = *directive.name.inner();
        if let Some(&index) = self.directive_index.get(name) {
            let first = self.entries[index].span;
            self.diagnostics.emit(
                Diagnostic::error(format!("directive `@{name}` is defined multiple times"))
                    .with_code(ErrorCode::E200)
                    .with_label(directive.name.span(), "duplicate definition")
                    .with_secondary_label(first, "first defined here"),
            );
            return;
        }

        let origin = Id::new(self.config.origin());
        let mut node = SchemaNode::new(origin, &format!("@{name}"), NodeKind::Directive)
            .with_repeatable(directive.repeatable)
            .with_locations(
                directive
                    .locations
                    .iter()
                    .map(|l| (*l.inner()).to_string())
                    .collect(),
            );
        if let Some(description) = directive.description {
            node = node.with_description(description);
        }

        let mut entry = NodeEntry {
            node,
            span: directive.name.span(),
            field_spans: HashMap::new(),
        };
        let arguments = self.convert_fields(&mut entry, &directive.arguments);
        entry.node = entry.node.with_fields(arguments);

        self.directive_index.insert(name, self.entries.len());
        self.entries.push(entry);
    }

    fn add_schema(&mut self, schema: types::SchemaDefinition<'a>) {
        if schema.extend {
            self.schema_directives.extend(schema.directives);
            self.operations.extend(schema.operations);
            return;
        }
        if let Some(first) = self.schema_span {
            self.diagnostics.emit(
                Diagnostic::error("the schema definition appears multiple times")
                    .with_code(ErrorCode::E204)
                    .with_label(schema.span, "duplicate schema definition")
                    .with_secondary_label(first, "first defined here")
                    .with_help("use `extend schema` to add operation types"),
            );
            return;
        }
        self.schema_span = Some(schema.span);
        self.schema_description = schema.description;
        self.schema_directives.splice(0..0, schema.directives);
        self.operations.extend(schema.operations);
    }

    fn apply_extension(&mut self, extension: types::TypeDefinition<'a>) {
        let name = *extension.name.inner();
        let Some(&index) = self.type_index.get(name) else {
            self.diagnostics.emit(
                Diagnostic::error(format!("cannot extend undefined type `{name}`"))
                    .with_code(ErrorCode::E201)
                    .with_label(extension.name.span(), "not defined in this document")
                    .with_help(format!("define `{name}` before extending it")),
            );
            return;
        };

        let base_kind = self.entries[index].node.kind();
        if base_kind != extension.kind {
            let first = self.entries[index].span;
            self.diagnostics.emit(
                Diagnostic::error(format!(
                    "cannot apply `extend {}` to {} `{name}`",
                    extension.kind.keyword(),
                    base_kind.keyword()
                ))
                .with_code(ErrorCode::E202)
                .with_label(extension.name.span(), "extension kind differs")
                .with_secondary_label(first, "defined here")
                .with_help(format!("use `extend {} {name}`", base_kind.keyword())),
            );
            return;
        }

        self.check_interfaces(&extension.interfaces);

        let mut entry = NodeEntry {
            node: SchemaNode::new(Id::new(self.config.origin()), name, base_kind)
                .with_interfaces(extension.interfaces.iter().map(|i| Id::new(i.inner())).collect())
                .with_directives(extension.directives),
            span: extension.name.span(),
            field_spans: std::mem::take(&mut self.entries[index].field_spans),
        };
        let fields = self.convert_fields(&mut entry, &extension.fields);
        let NodeEntry {
            node: extension_node,
            field_spans,
            ..
        } = entry;

        let base = &mut self.entries[index];
        base.field_spans = field_spans;
        base.node.absorb_extension(extension_node.with_fields(fields));
    }

    /// Converts parsed entries, reporting duplicates against `entry.field_spans`.
    fn convert_fields(
        &mut self,
        entry: &mut NodeEntry<'a>,
        definitions: &[types::FieldDefinition<'a>],
    ) -> Vec<Field> {
        let mut fields = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let name = *definition.name.inner();
            if let Some(first) = entry.field_spans.get(name) {
                self.diagnostics.emit(
                    Diagnostic::error(format!(
                        "`{name}` appears more than once in `{}`",
                        entry.node.name()
                    ))
                    .with_code(ErrorCode::E203)
                    .with_label(definition.name.span(), "duplicate field")
                    .with_secondary_label(*first, "first declared here"),
                );
                continue;
            }
            entry.field_spans.insert(name, definition.name.span());
            fields.push(self.convert_field(definition));
        }
        fields
    }

    fn convert_field(&mut self, definition: &types::FieldDefinition<'a>) -> Field {
        let name = *definition.name.inner();
        if let Some(ty) = &definition.ty {
            self.check_type_reference(ty.inner().name(), ty.span());
        }

        let mut field = match (definition.kind, &definition.ty) {
            (FieldKind::Field, Some(ty)) => Field::new(name, ty.inner().clone()),
            (FieldKind::InputValue, Some(ty)) => Field::input_value(name, ty.inner().clone()),
            (FieldKind::UnionMember, _) => Field::union_member(name),
            _ => Field::enum_value(name),
        };

        let arguments: Vec<Field> = definition
            .arguments
            .iter()
            .map(|argument| self.convert_field(argument))
            .collect();
        field = field
            .with_arguments(arguments)
            .with_directives(definition.directives.clone());
        if let Some(default) = &definition.default_value {
            field = field.with_default_value(default.clone());
        }
        if let Some(description) = &definition.description {
            field = field.with_description(description.clone());
        }
        field
    }

    fn check_interfaces(&mut self, interfaces: &[Spanned<&'a str>]) {
        for interface in interfaces {
            self.check_type_reference(Id::new(interface.inner()), interface.span());
        }
    }

    /// Warns when `name` is neither built in, defined here nor declared external.
    fn check_type_reference(&mut self, name: Id, span: Span) {
        let text = name.to_string();
        if is_builtin_scalar(name)
            || self.known_types.contains(text.as_str())
            || self.config.is_external(&text)
        {
            return;
        }
        self.diagnostics.emit(
            Diagnostic::warning(format!("unknown type `{text}`"))
                .with_code(ErrorCode::E300)
                .with_label(span, ErrorCode::E300.description())
                .with_help(format!("define `{text}` or load the schema that declares it")),
        );
    }

    /// Resolves `schema { ... }` entries, falling back to the conventional root names.
    fn resolve_operations(&mut self) -> OperationRoots {
        let mut roots = OperationRoots::default();

        if self.operations.is_empty() {
            let conventional = |name: &str, index: &HashMap<&'a str, usize>, entries: &[NodeEntry<'a>]| {
                index
                    .get(name)
                    .filter(|&&i| entries[i].node.kind() == NodeKind::Object)
                    .map(|_| Id::new(name))
            };
            roots.query = conventional("Query", &self.type_index, &self.entries);
            roots.mutation = conventional("Mutation", &self.type_index, &self.entries);
            roots.subscription = conventional("Subscription", &self.type_index, &self.entries);
            return roots;
        }

        for (operation, ty) in std::mem::take(&mut self.operations) {
            let target = Id::new(ty.inner());
            let slot = match *operation.inner() {
                "query" => &mut roots.query,
                "mutation" => &mut roots.mutation,
                "subscription" => &mut roots.subscription,
                other => {
                    self.diagnostics.emit(
                        Diagnostic::error(format!("unknown operation type `{other}`"))
                            .with_code(ErrorCode::E100)
                            .with_label(operation.span(), ErrorCode::E100.description())
                            .with_help("expected `query`, `mutation` or `subscription`"),
                    );
                    continue;
                }
            };
            if !self.type_index.contains_key(ty.inner()) {
                self.check_type_reference(target, ty.span());
            }
            *slot = Some(target);
        }
        roots
    }
}

#[cfg(test)]
mod tests {
    use crate::{ParseConfig, error::ErrorCode, parse, parse_with_warnings};
    use schemascope_core::{identifier::Id, schema::NodeKind};

    fn codes(source: &str) -> Vec<ErrorCode> {
        parse(source, &ParseConfig::schema())
            .expect_err("schema should be rejected")
            .diagnostics()
            .iter()
            .filter_map(|d| d.code())
            .collect()
    }

    #[test]
    fn test_nodes_keep_document_order() {
        let schema = parse(
            "type B { a: A } type A { b: B } enum C { X }",
            &ParseConfig::schema(),
        )
        .unwrap();
        let names: Vec<String> = schema.nodes().iter().map(|n| n.name().to_string()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(schema.nodes()[0].id(), "schema::B");
    }

    #[test]
    fn test_library_origin() {
        let schema = parse("scalar DateTime", &ParseConfig::library()).unwrap();
        assert_eq!(schema.nodes()[0].id(), "library::DateTime");
    }

    #[test]
    fn test_extension_merged_into_base() {
        let schema = parse(
            "extend type Query { posts: [Post] } type Query { me: User } type User { id: ID } type Post { id: ID }",
            &ParseConfig::schema(),
        )
        .unwrap();
        let query = schema.node_by_name(Id::new("Query")).unwrap();
        let fields: Vec<&str> = query.fields().iter().map(|f| f.name()).collect();
        assert_eq!(fields, vec!["me", "posts"]);
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_conventional_operation_roots() {
        let schema = parse(
            "type Query { ok: Boolean } type Mutation { ok: Boolean }",
            &ParseConfig::schema(),
        )
        .unwrap();
        let roots = schema.operations();
        assert_eq!(roots.query, Some(Id::new("Query")));
        assert_eq!(roots.mutation, Some(Id::new("Mutation")));
        assert_eq!(roots.subscription, None);
    }

    #[test]
    fn test_explicit_operation_roots() {
        let schema = parse(
            "schema { query: Root } type Root { ok: Boolean } type Query { ignored: Boolean }",
            &ParseConfig::schema(),
        )
        .unwrap();
        assert_eq!(schema.operations().query, Some(Id::new("Root")));
    }

    #[test]
    fn test_schema_definition_description_and_directives() {
        let schema = parse(
            "extend schema @b\n\"Roots\" schema @a { query: Q } type Q { ok: Boolean }",
            &ParseConfig::schema(),
        )
        .unwrap();
        assert_eq!(schema.description(), Some("Roots"));
        assert_eq!(schema.directives(), &["@a".to_string(), "@b".to_string()]);
        assert_eq!(schema.operations().query, Some(Id::new("Q")));
    }

    #[test]
    fn test_directive_nodes() {
        let schema = parse(
            "directive @auth(role: String) on FIELD_DEFINITION",
            &ParseConfig::schema(),
        )
        .unwrap();
        let directive = &schema.nodes()[0];
        assert_eq!(directive.kind(), NodeKind::Directive);
        assert_eq!(directive.name(), "@auth");
        assert_eq!(directive.fields()[0].name(), "role");
        assert_eq!(directive.locations(), &["FIELD_DEFINITION".to_string()]);
    }

    #[test]
    fn test_duplicate_type() {
        assert_eq!(codes("type A { x: Int } type A { y: Int }"), vec![ErrorCode::E200]);
    }

    #[test]
    fn test_duplicate_field_across_extension() {
        assert_eq!(
            codes("type A { x: Int } extend type A { x: String }"),
            vec![ErrorCode::E203]
        );
    }

    #[test]
    fn test_extend_undefined_and_mismatched() {
        assert_eq!(codes("extend type Ghost { x: Int }"), vec![ErrorCode::E201]);
        assert_eq!(
            codes("interface A { x: Int } extend type A { y: Int }"),
            vec![ErrorCode::E202]
        );
    }

    #[test]
    fn test_duplicate_schema_definition() {
        assert_eq!(
            codes("schema { query: Q } schema { query: Q } type Q { ok: Boolean }"),
            vec![ErrorCode::E204]
        );
    }

    #[test]
    fn test_unknown_types_are_warnings() {
        let (schema, warnings) = parse_with_warnings(
            "type Post implements Node { author: User tags: [Tag!] }",
            &ParseConfig::schema(),
        )
        .unwrap();
        assert_eq!(schema.len(), 1);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message()).collect();
        assert_eq!(
            messages,
            vec!["unknown type `Node`", "unknown type `User`", "unknown type `Tag`"]
        );
        assert!(warnings.iter().all(|w| w.severity().is_warning()));
    }

    #[test]
    fn test_external_types_are_known() {
        let config = ParseConfig::schema().with_external_types(["User"]);
        let (_, warnings) = parse_with_warnings("type Post { author: User }", &config).unwrap();
        assert!(warnings.is_empty());
    }
}
