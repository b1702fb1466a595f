//! Node navigation: the sidebar listing every node grouped by kind.
//!
//! Lists can be expanded and collapsed, filtered with a search query and
//! individual nodes can be hidden from the relation view.

use std::collections::HashSet;

use log::debug;

use schemascope_core::{
    identifier::Id,
    schema::{NodeKind, SchemaNode},
};

use crate::trees::SchemaTrees;

/// A node as listed in the navigation.
#[derive(Debug, Clone, Copy)]
pub struct NavEntry<'a> {
    node: &'a SchemaNode,
    hidden: bool,
    library: bool,
}

impl<'a> NavEntry<'a> {
    pub fn node(&self) -> &'a SchemaNode {
        self.node
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_library(&self) -> bool {
        self.library
    }
}

/// All listed nodes of one kind.
#[derive(Debug, Clone)]
pub struct NodeList<'a> {
    kind: NodeKind,
    entries: Vec<NavEntry<'a>>,
    open: bool,
}

impl<'a> NodeList<'a> {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Heading of the list, e.g. `Types`.
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn entries(&self) -> &[NavEntry<'a>] {
        &self.entries
    }

    /// Empty lists render disabled and cannot be toggled open.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

/// The root operation types of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationEntry {
    operation: &'static str,
    node: Option<Id>,
}

impl OperationEntry {
    /// `query`, `mutation` or `subscription`.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// The node implementing the operation, if declared and defined.
    pub fn node(&self) -> Option<Id> {
        self.node
    }
}

/// Sidebar state: expanded lists, search query and hidden nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeNavigation {
    expanded: HashSet<NodeKind>,
    hidden: HashSet<Id>,
    search: String,
}

impl NodeNavigation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the list of `kind` between open and closed.
    pub fn toggle_expanded(&mut self, kind: NodeKind) {
        if !self.expanded.remove(&kind) {
            self.expanded.insert(kind);
        }
    }

    pub fn is_expanded(&self, kind: NodeKind) -> bool {
        self.expanded.contains(&kind)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_lowercase();
    }

    /// Hides or shows node `id` in the relation view. Returns the new hidden state.
    pub fn toggle_hidden(&mut self, id: Id) -> bool {
        let hidden = if self.hidden.remove(&id) {
            false
        } else {
            self.hidden.insert(id);
            true
        };
        debug!(node:% = id, hidden; "Node visibility toggled");
        hidden
    }

    pub fn is_hidden(&self, id: Id) -> bool {
        self.hidden.contains(&id)
    }

    pub fn hidden(&self) -> &HashSet<Id> {
        &self.hidden
    }

    pub fn show_all(&mut self) {
        self.hidden.clear();
    }

    /// Case-insensitive match of `node` against the search query, by name or
    /// kind keyword.
    pub fn matches(&self, node: &SchemaNode) -> bool {
        if self.search.is_empty() {
            return true;
        }
        node.name().to_string().to_lowercase().contains(&self.search)
            || node.kind().keyword().contains(&self.search)
    }

    /// One list per node kind, in [`NodeKind::ALL`] order.
    ///
    /// While a search is active every list is open.
    pub fn lists<'a>(&self, trees: &'a SchemaTrees) -> Vec<NodeList<'a>> {
        let searching = !self.search.is_empty();
        let nodes = trees.nodes();

        NodeKind::ALL
            .iter()
            .map(|&kind| {
                let entries = nodes
                    .iter()
                    .filter(|node| node.kind() == kind && self.matches(node))
                    .map(|&node| NavEntry {
                        node,
                        hidden: self.is_hidden(node.id()),
                        library: trees.schema().node(node.id()).is_none(),
                    })
                    .collect();
                NodeList {
                    kind,
                    entries,
                    open: searching || self.is_expanded(kind),
                }
            })
            .collect()
    }

    /// The schema's query, mutation and subscription roots.
    pub fn operations(&self, trees: &SchemaTrees) -> Vec<OperationEntry> {
        let roots = trees.schema().operations();
        [
            ("query", roots.query),
            ("mutation", roots.mutation),
            ("subscription", roots.subscription),
        ]
        .into_iter()
        .map(|(operation, name)| OperationEntry {
            operation,
            node: name
                .and_then(|name| trees.node_by_name(name))
                .map(SchemaNode::id),
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use schemascope_core::schema::{OperationRoots, Schema};

    use super::*;

    fn trees() -> SchemaTrees {
        let mut schema = Schema::new("schema");
        schema.add_node("Query", NodeKind::Object);
        schema.add_node("User", NodeKind::Object);
        schema.add_node("Role", NodeKind::Enum);
        schema.add_node("UserInput", NodeKind::Input);
        schema.set_operations(OperationRoots {
            query: Some(Id::new("Query")),
            mutation: Some(Id::new("Mutation")),
            subscription: None,
        });
        let mut library = Schema::new("library");
        library.add_node("PageInfo", NodeKind::Object);
        SchemaTrees::new(schema).with_library(library)
    }

    fn list<'a>(lists: &'a [NodeList<'a>], kind: NodeKind) -> &'a NodeList<'a> {
        lists.iter().find(|list| list.kind() == kind).unwrap()
    }

    #[test]
    fn test_lists_grouped_by_kind() {
        let trees = trees();
        let navigation = NodeNavigation::new();
        let lists = navigation.lists(&trees);

        assert_eq!(lists.len(), NodeKind::ALL.len());
        let objects = list(&lists, NodeKind::Object);
        let names: Vec<String> = objects
            .entries()
            .iter()
            .map(|entry| entry.node().name().to_string())
            .collect();
        assert_eq!(names, ["Query", "User", "PageInfo"]);
        assert!(objects.entries()[2].is_library());
        assert!(!objects.is_open());
        assert!(list(&lists, NodeKind::Union).is_empty());
    }

    #[test]
    fn test_toggle_expanded() {
        let trees = trees();
        let mut navigation = NodeNavigation::new();
        navigation.toggle_expanded(NodeKind::Enum);
        assert!(list(&navigation.lists(&trees), NodeKind::Enum).is_open());
        navigation.toggle_expanded(NodeKind::Enum);
        assert!(!list(&navigation.lists(&trees), NodeKind::Enum).is_open());
    }

    #[test]
    fn test_search_by_name_or_keyword() {
        let trees = trees();
        let mut navigation = NodeNavigation::new();

        navigation.set_search("USER");
        let lists = navigation.lists(&trees);
        assert_eq!(list(&lists, NodeKind::Object).entries().len(), 1);
        assert_eq!(list(&lists, NodeKind::Input).entries().len(), 1);
        assert!(list(&lists, NodeKind::Enum).is_empty());
        assert!(lists.iter().all(NodeList::is_open));

        navigation.set_search("enum");
        let lists = navigation.lists(&trees);
        assert_eq!(list(&lists, NodeKind::Enum).entries().len(), 1);
        assert!(list(&lists, NodeKind::Object).is_empty());
    }

    #[test]
    fn test_hidden_toggle() {
        let trees = trees();
        let mut navigation = NodeNavigation::new();
        let user = Id::new("schema::User");

        assert!(navigation.toggle_hidden(user));
        let lists = navigation.lists(&trees);
        assert!(list(&lists, NodeKind::Object).entries()[1].is_hidden());
        assert!(!navigation.toggle_hidden(user));

        navigation.toggle_hidden(user);
        navigation.show_all();
        assert!(navigation.hidden().is_empty());
    }

    #[test]
    fn test_operations() {
        let trees = trees();
        let operations = NodeNavigation::new().operations(&trees);
        assert_eq!(operations[0].operation(), "query");
        assert_eq!(operations[0].node(), Some(Id::new("schema::Query")));
        // Declared but undefined.
        assert_eq!(operations[1].node(), None);
        assert_eq!(operations[2].operation(), "subscription");
        assert_eq!(operations[2].node(), None);
    }
}
