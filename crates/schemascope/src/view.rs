//! The relation view: selection state plus the memoized relation pass.

use std::collections::HashSet;

use log::{debug, trace};

use schemascope_core::{identifier::Id, schema::SchemaNode};

use crate::{
    relation::{
        ElementRegistry, FieldFilters, RelationLink, RelationOptions, RelationSequence,
        resolve_links, select,
    },
    trees::SchemaTrees,
};

/// Everything a relation pass depends on.
#[derive(Debug, Clone, PartialEq)]
struct PassInputs {
    selected: Option<Id>,
    options: RelationOptions,
    filters: FieldFilters,
    hidden: HashSet<Id>,
    generation: u64,
}

/// Selected node, display options and per-node filters of the relation view.
///
/// [`refresh`](Self::refresh) reruns the selector only when one of its inputs
/// changed since the previous pass, and then re-arms the element registry for
/// the cards about to be rendered.
#[derive(Debug, Clone)]
pub struct RelationView {
    options: RelationOptions,
    filters: FieldFilters,
    selected: Option<Id>,
    last: Option<PassInputs>,
    sequence: RelationSequence,
    visible: Vec<Id>,
    registry: ElementRegistry,
}

impl Default for RelationView {
    fn default() -> Self {
        Self::new(RelationOptions::default())
    }
}

impl RelationView {
    pub fn new(options: RelationOptions) -> Self {
        Self {
            options,
            filters: FieldFilters::new(),
            selected: None,
            last: None,
            sequence: RelationSequence::empty(),
            visible: Vec::new(),
            registry: ElementRegistry::new(),
        }
    }

    pub fn options(&self) -> RelationOptions {
        self.options
    }

    pub fn set_options(&mut self, options: RelationOptions) {
        self.options = options;
    }

    pub fn filters(&self) -> &FieldFilters {
        &self.filters
    }

    /// Sets the text filter of node `id`.
    pub fn set_filter(&mut self, id: Id, query: &str) {
        self.filters.set(id, query);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn selected(&self) -> Option<Id> {
        self.selected
    }

    pub fn select(&mut self, id: Option<Id>) {
        self.selected = id;
    }

    /// Recomputes the relation sequence if any input changed.
    ///
    /// Nodes in `hidden` are dropped from the candidates, except for the
    /// selected node. Returns true if a new pass was started.
    pub fn refresh(&mut self, trees: &SchemaTrees, hidden: &HashSet<Id>) -> bool {
        let inputs = PassInputs {
            selected: self.selected,
            options: self.options,
            filters: self.filters.clone(),
            hidden: hidden.clone(),
            generation: trees.generation(),
        };
        if self.last.as_ref() == Some(&inputs) {
            trace!("Relation inputs unchanged");
            return false;
        }

        self.sequence = match self.selected {
            Some(selected) => {
                let candidates: Vec<&SchemaNode> = trees
                    .nodes()
                    .into_iter()
                    .filter(|node| node.id() == selected || !hidden.contains(&node.id()))
                    .collect();
                select(&candidates, selected, self.options, &self.filters)
            }
            None => RelationSequence::empty(),
        };

        let library_only = self.options.library_only();
        self.visible = self
            .sequence
            .nodes()
            .iter()
            .filter(|node| {
                !library_only
                    || Some(node.id()) == self.selected
                    || trees.is_library_name(node.name())
            })
            .map(SchemaNode::id)
            .collect();
        self.registry.reset(self.visible.iter().copied());
        self.last = Some(inputs);

        debug!(
            sequence = self.sequence.len(),
            visible = self.visible.len();
            "Relation pass started"
        );
        true
    }

    /// The relation sequence of the last pass.
    pub fn sequence(&self) -> &RelationSequence {
        &self.sequence
    }

    /// Nodes of the sequence that get a card, in sequence order.
    pub fn visible_nodes(&self) -> Vec<&SchemaNode> {
        self.sequence
            .nodes()
            .iter()
            .filter(|node| self.visible.contains(&node.id()))
            .collect()
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ElementRegistry {
        &mut self.registry
    }

    /// Links of the current pass, once every visible card reported its bounds.
    pub fn links(&self) -> Option<Vec<RelationLink<'_>>> {
        resolve_links(&self.sequence, &self.registry, &self.filters, self.options)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use schemascope_core::{
        geometry::{Bounds, Point, Size},
        schema::{Field, NodeKind, Schema, TypeRef},
    };

    use super::*;
    use crate::relation::READY_DEBOUNCE;

    fn trees() -> SchemaTrees {
        let mut schema = Schema::new("schema");
        let origin = schema.origin();
        schema.push(SchemaNode::new(origin, "User", NodeKind::Object).with_fields(vec![
            Field::new("name", TypeRef::named("String")),
            Field::new("page", TypeRef::named("PageInfo")),
        ]));
        schema.push(
            SchemaNode::new(origin, "Post", NodeKind::Object)
                .with_fields(vec![Field::new("author", TypeRef::named("User"))]),
        );
        let mut library = Schema::new("library");
        library.add_node("PageInfo", NodeKind::Object);
        SchemaTrees::new(schema).with_library(library)
    }

    fn names(nodes: &[&SchemaNode]) -> Vec<String> {
        nodes.iter().map(|node| node.name().to_string()).collect()
    }

    #[test]
    fn test_refresh_is_memoized() {
        let trees = trees();
        let hidden = HashSet::new();
        let mut view = RelationView::default();
        view.select(Some(Id::new("schema::User")));

        assert!(view.refresh(&trees, &hidden));
        assert!(!view.refresh(&trees, &hidden));
        assert_eq!(names(&view.visible_nodes()), ["Post", "User", "PageInfo"]);

        view.set_filter(Id::new("schema::User"), "nam");
        assert!(view.refresh(&trees, &hidden));
        assert_eq!(names(&view.visible_nodes()), ["Post", "User"]);
    }

    #[test]
    fn test_description_commit_triggers_pass() {
        let mut trees = trees();
        let hidden = HashSet::new();
        let mut view = RelationView::default();
        view.select(Some(Id::new("schema::Post")));
        view.refresh(&trees, &hidden);

        trees
            .set_description(Id::new("schema::Post"), "An article")
            .unwrap();
        assert!(view.refresh(&trees, &hidden));
    }

    #[test]
    fn test_swapped_trees_trigger_pass() {
        let hidden = HashSet::new();
        let mut view = RelationView::default();
        view.select(Some(Id::new("schema::User")));

        let mut schema = Schema::new("schema");
        schema.add_node("User", NodeKind::Object);
        let first = SchemaTrees::new(schema);
        assert!(view.refresh(&first, &hidden));
        assert_eq!(names(&view.visible_nodes()), ["User"]);

        let mut schema = Schema::new("schema");
        let origin = schema.origin();
        schema.add_node("User", NodeKind::Object);
        schema.push(
            SchemaNode::new(origin, "Post", NodeKind::Object)
                .with_fields(vec![Field::new("author", TypeRef::named("User"))]),
        );
        let second = SchemaTrees::new(schema);
        assert_eq!(first.revision(), second.revision());

        assert!(view.refresh(&second, &hidden));
        assert_eq!(names(&view.visible_nodes()), ["Post", "User"]);
    }

    #[test]
    fn test_hidden_nodes_are_dropped_but_selection_kept() {
        let trees = trees();
        let mut view = RelationView::default();
        view.select(Some(Id::new("schema::User")));

        let hidden: HashSet<Id> = [Id::new("schema::Post"), Id::new("schema::User")].into();
        view.refresh(&trees, &hidden);
        assert_eq!(names(&view.visible_nodes()), ["User", "PageInfo"]);
    }

    #[test]
    fn test_library_only_keeps_selection() {
        let trees = trees();
        let mut view = RelationView::new(RelationOptions::default().with_library_only(true));
        view.select(Some(Id::new("schema::User")));
        view.refresh(&trees, &HashSet::new());

        assert_eq!(view.sequence().len(), 3);
        assert_eq!(names(&view.visible_nodes()), ["User", "PageInfo"]);
        assert_eq!(view.registry().expected().len(), 2);
    }

    #[test]
    fn test_no_selection_is_empty() {
        let trees = trees();
        let mut view = RelationView::default();
        view.refresh(&trees, &HashSet::new());
        assert!(view.sequence().is_empty());
        assert!(view.visible_nodes().is_empty());
        assert!(view.links().is_none());
    }

    #[test]
    fn test_links_after_registration() {
        let trees = trees();
        let mut view = RelationView::default();
        view.select(Some(Id::new("schema::User")));
        view.refresh(&trees, &HashSet::new());

        let ids: Vec<Id> = view.visible_nodes().iter().map(|node| node.id()).collect();
        assert!(view.links().is_none());

        let now = Instant::now();
        for (index, id) in ids.into_iter().enumerate() {
            let bounds = Bounds::new_from_top_left(
                Point::new(index as f32 * 300.0, 0.0),
                Size::new(200.0, 60.0),
            );
            view.registry_mut().register(id, bounds, now);
        }
        view.registry_mut().poll(now + READY_DEBOUNCE);

        let links = view.links().unwrap();
        let targets: Vec<String> = links
            .iter()
            .map(|link| link.to().node().name().to_string())
            .collect();
        assert_eq!(targets, ["Post", "User"]);
    }
}
