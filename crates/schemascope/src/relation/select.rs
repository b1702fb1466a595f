//! Selection of the nodes shown around a selected node.

use std::collections::{HashMap, HashSet};

use log::debug;

use schemascope_core::{
    identifier::Id,
    schema::{Field, NodeKind, SchemaNode, is_builtin_scalar},
};

use super::sort::sort_by_connections;

/// Display flags of a relation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationOptions {
    show_related_to: bool,
    base_types_on: bool,
    self_loops: bool,
    library_only: bool,
}

impl Default for RelationOptions {
    fn default() -> Self {
        Self {
            show_related_to: true,
            base_types_on: false,
            self_loops: false,
            library_only: false,
        }
    }
}

impl RelationOptions {
    /// Include the nodes that reference the selected node.
    pub fn with_show_related_to(mut self, show_related_to: bool) -> Self {
        self.show_related_to = show_related_to;
        self
    }

    /// Keep scalar-typed entries when comparing and rendering nodes.
    pub fn with_base_types_on(mut self, base_types_on: bool) -> Self {
        self.base_types_on = base_types_on;
        self
    }

    /// Emit links for entries that point back at their own node.
    pub fn with_self_loops(mut self, self_loops: bool) -> Self {
        self.self_loops = self_loops;
        self
    }

    /// Only render the cards of library nodes.
    pub fn with_library_only(mut self, library_only: bool) -> Self {
        self.library_only = library_only;
        self
    }

    pub fn show_related_to(&self) -> bool {
        self.show_related_to
    }

    pub fn base_types_on(&self) -> bool {
        self.base_types_on
    }

    pub fn self_loops(&self) -> bool {
        self.self_loops
    }

    pub fn library_only(&self) -> bool {
        self.library_only
    }
}

/// Per-node text filters narrowing the entries a card shows.
///
/// A filter is a lowercase substring matched against entry names. Nodes
/// without a filter keep all their entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFilters {
    filters: HashMap<Id, String>,
}

impl FieldFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter of node `id`; an empty query removes it.
    pub fn set(&mut self, id: Id, query: &str) {
        if query.is_empty() {
            self.filters.remove(&id);
        } else {
            self.filters.insert(id, query.to_lowercase());
        }
    }

    /// Sets a filter (builder style).
    pub fn with(mut self, id: Id, query: &str) -> Self {
        self.set(id, query);
        self
    }

    /// The filter of node `id`, empty if none is set.
    pub fn get(&self, id: Id) -> &str {
        self.filters.get(&id).map(String::as_str).unwrap_or("")
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns true if `field` of `node` passes the node's filter.
    pub fn keeps(&self, node: &SchemaNode, field: &Field) -> bool {
        field.matches_filter(self.get(node.id()))
    }

    /// Iterates the entries of `node` passing its filter, in declaration order.
    pub fn visible_fields<'n>(&self, node: &'n SchemaNode) -> impl Iterator<Item = &'n Field> {
        let filter = self.get(node.id()).to_string();
        node.fields()
            .iter()
            .filter(move |field| field.matches_filter(&filter))
    }
}

/// The ordered nodes of a relation view.
///
/// Layout: the nodes referencing the selected node, the selected node, then
/// the nodes it references. Both outer groups are sorted by connectivity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationSequence {
    nodes: Vec<SchemaNode>,
    selected: Option<usize>,
}

impl RelationSequence {
    /// A sequence with no nodes, produced when nothing is selected.
    pub fn empty() -> Self {
        Self::default()
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

    /// Index of the selected node, the boundary between both groups.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&SchemaNode> {
        self.selected.map(|index| &self.nodes[index])
    }

    /// Nodes referencing the selected node.
    pub fn reverse_related(&self) -> &[SchemaNode] {
        match self.selected {
            Some(index) => &self.nodes[..index],
            None => &[],
        }
    }

    /// Nodes referenced by the selected node.
    pub fn related(&self) -> &[SchemaNode] {
        match self.selected {
            Some(index) => &self.nodes[index + 1..],
            None => &[],
        }
    }

    /// Position of the first node named `name`.
    pub fn position(&self, name: Id) -> Option<usize> {
        self.nodes.iter().position(|node| node.name() == name)
    }

    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.nodes.iter().map(SchemaNode::id)
    }
}

/// Computes the relation sequence of node `selected` within `nodes`.
///
/// Unless scalars are enabled, entries typed as a built-in scalar or as a
/// declared `scalar` node are stripped from every node first. The selected
/// node's own entries are additionally narrowed by its text filter before
/// they decide which nodes are related.
///
/// A node never relates to itself, and a node referenced by the selected node
/// is not listed again among the nodes referencing it. A `selected` id that
/// is not in `nodes` yields an empty sequence.
///
/// # Example
///
/// ```
/// # use schemascope::relation::{select, FieldFilters, RelationOptions};
/// # use schemascope::schema::{Field, NodeKind, Schema, SchemaNode, TypeRef};
/// let mut schema = Schema::new("schema");
/// let origin = schema.origin();
/// schema.push(
///     SchemaNode::new(origin, "User", NodeKind::Object)
///         .with_fields(vec![Field::new("friend", TypeRef::named("User"))]),
/// );
/// schema.push(
///     SchemaNode::new(origin, "Post", NodeKind::Object)
///         .with_fields(vec![Field::new("author", TypeRef::named("User"))]),
/// );
///
/// let nodes: Vec<_> = schema.nodes().iter().collect();
/// let user = schema.nodes()[0].id();
/// let sequence = select(&nodes, user, RelationOptions::default(), &FieldFilters::new());
///
/// let names: Vec<String> = sequence.nodes().iter().map(|n| n.name().to_string()).collect();
/// assert_eq!(names, ["Post", "User"]);
/// ```
pub fn select(
    nodes: &[&SchemaNode],
    selected: Id,
    options: RelationOptions,
    filters: &FieldFilters,
) -> RelationSequence {
    let scalars: HashSet<Id> = nodes
        .iter()
        .filter(|node| node.kind() == NodeKind::Scalar)
        .map(|node| node.name())
        .collect();
    let is_scalar = |field: &Field| {
        field
            .type_name()
            .is_some_and(|ty| is_builtin_scalar(ty) || scalars.contains(&ty))
    };

    let based: Vec<SchemaNode> = nodes
        .iter()
        .map(|node| {
            if options.base_types_on {
                (*node).clone()
            } else {
                node.retain_fields(|field| !is_scalar(field))
            }
        })
        .collect();

    let Some(selected_node) = based.iter().find(|node| node.id() == selected) else {
        debug!(selected:% = selected; "Selected node is not in the collection");
        return RelationSequence::empty();
    };
    let selected_name = selected_node.name();
    let compare = selected_node.retain_fields(|field| filters.keeps(selected_node, field));

    let related: Vec<SchemaNode> = based
        .iter()
        .filter(|node| node.name() != selected_name && compare.references(node.name()))
        .cloned()
        .collect();
    let related_names: HashSet<Id> = related.iter().map(SchemaNode::name).collect();

    let reverse_related: Vec<SchemaNode> = if options.show_related_to {
        based
            .iter()
            .filter(|node| node.name() != selected_name)
            .filter(|node| node.references(selected_name))
            .filter(|node| !related_names.contains(&node.name()))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    debug!(
        selected:% = selected_name,
        related = related.len(),
        reverse_related = reverse_related.len();
        "Relation sequence selected"
    );

    let mut sequence = sort_by_connections(reverse_related);
    let selected_index = sequence.len();
    sequence.push(selected_node.clone());
    sequence.extend(sort_by_connections(related));

    RelationSequence {
        nodes: sequence,
        selected: Some(selected_index),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use schemascope_core::schema::{Schema, TypeRef};

    use super::*;

    fn schema() -> Schema {
        let mut schema = Schema::new("schema");
        let origin = schema.origin();
        schema.push(SchemaNode::new(origin, "User", NodeKind::Object).with_fields(vec![
            Field::new("id", TypeRef::named("ID").non_null()),
            Field::new("friend", TypeRef::named("User")),
            Field::new("avatar", TypeRef::named("Image")),
            Field::new("joined", TypeRef::named("DateTime")),
            Field::new("role", TypeRef::named("Role")),
        ]));
        schema.push(SchemaNode::new(origin, "Post", NodeKind::Object).with_fields(vec![
            Field::new("title", TypeRef::named("String")),
            Field::new("author", TypeRef::named("User").non_null()),
        ]));
        schema.push(SchemaNode::new(origin, "Image", NodeKind::Object).with_fields(vec![
            Field::new("url", TypeRef::named("String")),
            Field::new("owner", TypeRef::named("User")),
        ]));
        schema.push(SchemaNode::new(origin, "Role", NodeKind::Enum).with_fields(vec![
            Field::enum_value("ADMIN"),
            Field::enum_value("MEMBER"),
        ]));
        schema.push(SchemaNode::new(origin, "DateTime", NodeKind::Scalar));
        schema.push(SchemaNode::new(origin, "Unrelated", NodeKind::Object).with_fields(vec![
            Field::new("name", TypeRef::named("String")),
        ]));
        schema
    }

    fn id_of(schema: &Schema, name: &str) -> Id {
        schema
            .node_by_name(Id::new(name))
            .map(SchemaNode::id)
            .unwrap()
    }

    fn names(sequence: &RelationSequence) -> Vec<String> {
        sequence
            .nodes()
            .iter()
            .map(|node| node.name().to_string())
            .collect()
    }

    #[test]
    fn test_user_post_example() {
        let mut schema = Schema::new("schema");
        let origin = schema.origin();
        schema.push(
            SchemaNode::new(origin, "User", NodeKind::Object)
                .with_fields(vec![Field::new("friend", TypeRef::named("User"))]),
        );
        schema.push(
            SchemaNode::new(origin, "Post", NodeKind::Object)
                .with_fields(vec![Field::new("author", TypeRef::named("User"))]),
        );
        let nodes: Vec<&SchemaNode> = schema.nodes().iter().collect();

        let sequence = select(
            &nodes,
            id_of(&schema, "User"),
            RelationOptions::default(),
            &FieldFilters::new(),
        );

        assert_eq!(names(&sequence), ["Post", "User"]);
        assert_eq!(sequence.selected_index(), Some(1));
        assert!(sequence.related().is_empty());
        assert_eq!(sequence.reverse_related().len(), 1);
    }

    #[test]
    fn test_related_and_reverse_related_do_not_overlap() {
        let schema = schema();
        let nodes: Vec<&SchemaNode> = schema.nodes().iter().collect();

        let sequence = select(
            &nodes,
            id_of(&schema, "User"),
            RelationOptions::default(),
            &FieldFilters::new(),
        );

        // Image is both referenced by and referencing User; it is only related.
        assert_eq!(names(&sequence), ["Post", "User", "Image", "Role"]);
        assert_eq!(sequence.selected().unwrap().name(), "User");
    }

    #[test]
    fn test_scalars_are_stripped_by_default() {
        let schema = schema();
        let nodes: Vec<&SchemaNode> = schema.nodes().iter().collect();

        let sequence = select(
            &nodes,
            id_of(&schema, "User"),
            RelationOptions::default(),
            &FieldFilters::new(),
        );

        let selected = sequence.selected().unwrap();
        let fields: Vec<&str> = selected.fields().iter().map(Field::name).collect();
        assert_eq!(fields, ["friend", "avatar", "role"]);
        assert!(sequence.position(Id::new("DateTime")).is_none());
    }

    #[test]
    fn test_scalars_relate_when_enabled() {
        let schema = schema();
        let nodes: Vec<&SchemaNode> = schema.nodes().iter().collect();

        let sequence = select(
            &nodes,
            id_of(&schema, "User"),
            RelationOptions::default().with_base_types_on(true),
            &FieldFilters::new(),
        );

        assert!(sequence.position(Id::new("DateTime")).is_some());
        assert_eq!(sequence.selected().unwrap().fields().len(), 5);
    }

    #[test]
    fn test_without_related_to_only_referenced_nodes_remain() {
        let schema = schema();
        let nodes: Vec<&SchemaNode> = schema.nodes().iter().collect();

        let sequence = select(
            &nodes,
            id_of(&schema, "User"),
            RelationOptions::default().with_show_related_to(false),
            &FieldFilters::new(),
        );

        assert!(sequence.reverse_related().is_empty());
        assert_eq!(names(&sequence), ["User", "Image", "Role"]);
    }

    #[test]
    fn test_filter_narrows_related_nodes() {
        let schema = schema();
        let nodes: Vec<&SchemaNode> = schema.nodes().iter().collect();
        let user = id_of(&schema, "User");
        let filters = FieldFilters::new().with(user, "AVA");

        let sequence = select(&nodes, user, RelationOptions::default(), &filters);

        assert_eq!(names(&sequence), ["Post", "User", "Image"]);
        // The selected node keeps its unfiltered entries.
        assert_eq!(sequence.selected().unwrap().fields().len(), 3);
    }

    #[test]
    fn test_node_without_relations_is_alone() {
        let schema = schema();
        let nodes: Vec<&SchemaNode> = schema.nodes().iter().collect();

        let sequence = select(
            &nodes,
            id_of(&schema, "Unrelated"),
            RelationOptions::default(),
            &FieldFilters::new(),
        );

        assert_eq!(names(&sequence), ["Unrelated"]);
        assert_eq!(sequence.selected_index(), Some(0));
    }

    #[test]
    fn test_unknown_selection_is_empty() {
        let schema = schema();
        let nodes: Vec<&SchemaNode> = schema.nodes().iter().collect();

        let sequence = select(
            &nodes,
            Id::new("schema::Missing"),
            RelationOptions::default(),
            &FieldFilters::new(),
        );

        assert!(sequence.is_empty());
        assert_eq!(sequence.selected_index(), None);
    }

    #[test]
    fn test_filters_are_lowercased_and_cleared() {
        let id = Id::new("schema::User");
        let mut filters = FieldFilters::new();
        filters.set(id, "Name");
        assert_eq!(filters.get(id), "name");
        filters.set(id, "");
        assert!(filters.is_empty());
    }

    fn arbitrary_nodes() -> impl Strategy<Value = Vec<SchemaNode>> {
        let names = ["A", "B", "C", "D", "E", "S"];
        let type_names = ["A", "B", "C", "D", "E", "S", "String", "Int"];
        prop::collection::vec(prop::collection::vec(0..type_names.len(), 0..5), names.len())
            .prop_map(move |fields_per_node| {
                let origin = Id::new("schema");
                fields_per_node
                    .into_iter()
                    .enumerate()
                    .map(|(i, fields)| {
                        // `S` is a declared scalar and has no fields.
                        if names[i] == "S" {
                            return SchemaNode::new(origin, names[i], NodeKind::Scalar);
                        }
                        let fields = fields
                            .into_iter()
                            .enumerate()
                            .map(|(f, t)| Field::new(format!("f{f}"), TypeRef::named(type_names[t])))
                            .collect();
                        SchemaNode::new(origin, names[i], NodeKind::Object).with_fields(fields)
                    })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn prop_selection_invariants(
            nodes in arbitrary_nodes(),
            selected in 0usize..6,
            show_related_to in any::<bool>(),
            base_types_on in any::<bool>(),
        ) {
            let refs: Vec<&SchemaNode> = nodes.iter().collect();
            let selected_node = &nodes[selected];
            let options = RelationOptions::default()
                .with_show_related_to(show_related_to)
                .with_base_types_on(base_types_on);

            let sequence = select(&refs, selected_node.id(), options, &FieldFilters::new());

            let index = sequence.selected_index().unwrap();
            prop_assert_eq!(sequence.nodes()[index].id(), selected_node.id());
            prop_assert_eq!(
                sequence.len(),
                sequence.reverse_related().len() + 1 + sequence.related().len()
            );
            let related_excludes_selected =
                sequence.related().iter().all(|n| n.name() != selected_node.name());
            prop_assert!(related_excludes_selected);
            let reverse_excludes_selected =
                sequence.reverse_related().iter().all(|n| n.name() != selected_node.name());
            prop_assert!(reverse_excludes_selected);
            if !show_related_to {
                prop_assert!(sequence.reverse_related().is_empty());
            }
            if !base_types_on && selected_node.name() != "S" {
                prop_assert!(sequence.position(Id::new("S")).is_none());
                for node in sequence.nodes() {
                    let only_object_fields = node
                        .fields()
                        .iter()
                        .all(|f| f.type_name().is_some_and(|t| !is_builtin_scalar(t) && t != "S"));
                    prop_assert!(only_object_fields);
                }
            }
        }
    }
}
