//! The GraphQL schema node model.
//!
//! A [`Schema`] is an ordered collection of [`SchemaNode`]s plus the operation
//! roots declared by its `schema { ... }` block. Every node owns an ordered list
//! of [`Field`]s; for object, interface and input types these are the declared
//! fields, for enums the values, for unions the member types and for directive
//! definitions the arguments. Relation queries only ever look at the type a
//! field points to, resolved through [`TypeRef::name`].

use std::fmt;

use thiserror::Error;

use crate::identifier::Id;

/// Names of the scalars every GraphQL schema has without declaring them.
pub const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Returns true if `name` is one of the built-in scalars.
pub fn is_builtin_scalar(name: Id) -> bool {
    BUILTIN_SCALARS.iter().any(|scalar| name == *scalar)
}

/// Errors raised when mutating a schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unknown schema node `{0}`")]
    UnknownNode(String),
}

/// The definition kind of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Object,
    Interface,
    Input,
    Enum,
    Scalar,
    Union,
    Directive,
}

impl NodeKind {
    /// All kinds in the order navigation lists present them.
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Object,
        NodeKind::Interface,
        NodeKind::Input,
        NodeKind::Enum,
        NodeKind::Scalar,
        NodeKind::Union,
        NodeKind::Directive,
    ];

    /// The SDL keyword introducing a definition of this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Object => "type",
            Self::Interface => "interface",
            Self::Input => "input",
            Self::Enum => "enum",
            Self::Scalar => "scalar",
            Self::Union => "union",
            Self::Directive => "directive",
        }
    }

    /// Plural title used for grouped node lists.
    pub fn title(self) -> &'static str {
        match self {
            Self::Object => "Types",
            Self::Interface => "Interfaces",
            Self::Input => "Inputs",
            Self::Enum => "Enums",
            Self::Scalar => "Scalars",
            Self::Union => "Unions",
            Self::Directive => "Directives",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A reference to a type as written in a field declaration, e.g. `[Post!]!`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(Id),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Shorthand for a named type reference.
    pub fn named(name: &str) -> Self {
        Self::Named(Id::new(name))
    }

    /// Wraps this reference in a list.
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Wraps this reference in a non-null marker.
    pub fn non_null(self) -> Self {
        Self::NonNull(Box::new(self))
    }

    /// The innermost named type, stripped of list and non-null wrappers.
    pub fn name(&self) -> Id {
        match self {
            Self::Named(name) => *name,
            Self::List(inner) | Self::NonNull(inner) => inner.name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// What a field entry represents inside its owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// An output field of an object or interface type.
    Field,
    /// An input field, a field argument or a directive argument.
    InputValue,
    /// A value of an enum.
    EnumValue,
    /// A member type of a union.
    UnionMember,
}

/// A single entry of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    kind: FieldKind,
    ty: Option<TypeRef>,
    arguments: Vec<Field>,
    default_value: Option<String>,
    description: Option<String>,
    directives: Vec<String>,
}

impl Field {
    /// Creates an output field with the given type.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self::with_kind(name, FieldKind::Field, Some(ty))
    }

    /// Creates an input value (input field or argument).
    pub fn input_value(name: impl Into<String>, ty: TypeRef) -> Self {
        Self::with_kind(name, FieldKind::InputValue, Some(ty))
    }

    /// Creates an enum value. Enum values do not reference any type.
    pub fn enum_value(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::EnumValue, None)
    }

    /// Creates a union member entry pointing at `member`.
    pub fn union_member(member: &str) -> Self {
        Self::with_kind(member, FieldKind::UnionMember, Some(TypeRef::named(member)))
    }

    fn with_kind(name: impl Into<String>, kind: FieldKind, ty: Option<TypeRef>) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            arguments: Vec::new(),
            default_value: None,
            description: None,
            directives: Vec::new(),
        }
    }

    /// Sets the field arguments (builder style).
    pub fn with_arguments(mut self, arguments: Vec<Field>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Sets the default value as written in SDL (builder style).
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets the description (builder style).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the applied directives, each in SDL form such as `@deprecated(reason: "x")`.
    pub fn with_directives(mut self, directives: Vec<String>) -> Self {
        self.directives = directives;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn ty(&self) -> Option<&TypeRef> {
        self.ty.as_ref()
    }

    /// The named type this field points to, if any.
    pub fn type_name(&self) -> Option<Id> {
        self.ty.as_ref().map(TypeRef::name)
    }

    pub fn arguments(&self) -> &[Field] {
        &self.arguments
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn directives(&self) -> &[String] {
        &self.directives
    }

    /// Case-insensitive substring match of the field name against `filter`.
    ///
    /// An empty filter matches every field.
    pub fn matches_filter(&self, filter: &str) -> bool {
        filter.is_empty() || self.name.to_lowercase().contains(&filter.to_lowercase())
    }
}

/// A top-level definition of a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    id: Id,
    name: Id,
    kind: NodeKind,
    fields: Vec<Field>,
    description: Option<String>,
    interfaces: Vec<Id>,
    directives: Vec<String>,
    locations: Vec<String>,
    repeatable: bool,
}

impl SchemaNode {
    /// Creates a node scoped under `origin` (e.g. `schema` or `library`).
    ///
    /// The node identifier is `origin::name`, so the same type name may appear
    /// once per tree.
    pub fn new(origin: Id, name: &str, kind: NodeKind) -> Self {
        let name = Id::new(name);
        Self {
            id: origin.create_nested(name),
            name,
            kind,
            fields: Vec::new(),
            description: None,
            interfaces: Vec::new(),
            directives: Vec::new(),
            locations: Vec::new(),
            repeatable: false,
        }
    }

    /// Sets the node entries (builder style).
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    /// Sets the description (builder style).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the implemented interfaces (builder style).
    pub fn with_interfaces(mut self, interfaces: Vec<Id>) -> Self {
        self.interfaces = interfaces;
        self
    }

    /// Sets the applied directives (builder style).
    pub fn with_directives(mut self, directives: Vec<String>) -> Self {
        self.directives = directives;
        self
    }

    /// Sets the locations of a directive definition (builder style).
    pub fn with_locations(mut self, locations: Vec<String>) -> Self {
        self.locations = locations;
        self
    }

    /// Marks a directive definition as `repeatable` (builder style).
    pub fn with_repeatable(mut self, repeatable: bool) -> Self {
        self.repeatable = repeatable;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn interfaces(&self) -> &[Id] {
        &self.interfaces
    }

    pub fn directives(&self) -> &[String] {
        &self.directives
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    /// Replaces the description; an empty string clears it.
    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        self.description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
    }

    /// Appends the entries, interfaces and directives of an extension.
    pub fn absorb_extension(&mut self, extension: SchemaNode) {
        self.fields.extend(extension.fields);
        for interface in extension.interfaces {
            if !self.interfaces.contains(&interface) {
                self.interfaces.push(interface);
            }
        }
        self.directives.extend(extension.directives);
    }

    /// Returns a copy of this node keeping only the entries accepted by `keep`.
    pub fn retain_fields(&self, mut keep: impl FnMut(&Field) -> bool) -> SchemaNode {
        SchemaNode {
            fields: self.fields.iter().filter(|f| keep(f)).cloned().collect(),
            ..self.clone()
        }
    }

    /// Iterates the named types referenced by this node's entries, in declaration order.
    pub fn referenced_types(&self) -> impl Iterator<Item = Id> + '_ {
        self.fields.iter().filter_map(Field::type_name)
    }

    /// Returns true if any entry of this node points at the type `name`.
    pub fn references(&self, name: Id) -> bool {
        self.referenced_types().any(|ty| ty == name)
    }
}

/// The root operation types declared by a schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationRoots {
    pub query: Option<Id>,
    pub mutation: Option<Id>,
    pub subscription: Option<Id>,
}

/// An ordered collection of schema nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    origin: Id,
    nodes: Vec<SchemaNode>,
    operations: OperationRoots,
    description: Option<String>,
    directives: Vec<String>,
}

impl Schema {
    /// Creates an empty schema whose nodes will be scoped under `origin`.
    pub fn new(origin: &str) -> Self {
        Self {
            origin: Id::new(origin),
            nodes: Vec::new(),
            operations: OperationRoots::default(),
            description: None,
            directives: Vec::new(),
        }
    }

    /// The scope every node identifier of this schema is nested under.
    pub fn origin(&self) -> Id {
        self.origin
    }

    pub fn nodes(&self) -> &[SchemaNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn operations(&self) -> OperationRoots {
        self.operations
    }

    pub fn set_operations(&mut self, operations: OperationRoots) {
        self.operations = operations;
    }

    /// Description of the `schema` definition itself.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Directives applied to the `schema` definition, as written.
    pub fn directives(&self) -> &[String] {
        &self.directives
    }

    pub fn set_schema_definition(&mut self, description: Option<String>, directives: Vec<String>) {
        self.description = description;
        self.directives = directives;
    }

    /// Appends a node created through [`SchemaNode::new`] with this schema's origin.
    pub fn push(&mut self, node: SchemaNode) {
        self.nodes.push(node);
    }

    /// Creates and appends a node scoped under this schema's origin.
    pub fn add_node(&mut self, name: &str, kind: NodeKind) -> &mut SchemaNode {
        self.nodes.push(SchemaNode::new(self.origin, name, kind));
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    pub fn node(&self, id: Id) -> Option<&SchemaNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_mut(&mut self, id: Id) -> Option<&mut SchemaNode> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    /// First node with the given name.
    pub fn node_by_name(&self, name: Id) -> Option<&SchemaNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn node_by_name_mut(&mut self, name: Id) -> Option<&mut SchemaNode> {
        self.nodes.iter_mut().find(|node| node.name == name)
    }

    /// Returns true if a node with the given name exists.
    pub fn contains_name(&self, name: Id) -> bool {
        self.node_by_name(name).is_some()
    }

    /// Writes a new description into the node `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownNode`] if the schema has no such node.
    pub fn set_description(
        &mut self,
        id: Id,
        description: impl Into<String>,
    ) -> Result<(), SchemaError> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| SchemaError::UnknownNode(id.to_string()))?;
        node.set_description(description);
        Ok(())
    }
}
