//! A laid-out relation view ready for export.

use std::time::Instant;

use log::{debug, warn};

use crate::{
    layout::{FlowLayout, RelationLayout},
    relation::{Connector, READY_DEBOUNCE, route_connectors},
    trees::SchemaTrees,
    view::RelationView,
};

/// Positioned cards and the connectors between them.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationDiagram {
    layout: RelationLayout,
    connectors: Vec<Connector>,
}

impl RelationDiagram {
    /// Lays out the visible nodes of `view` and routes their connectors.
    ///
    /// The layout stands in for the rendered page: every card reports its
    /// bounds at `now` and the registry is polled once the debounce elapsed.
    pub fn build(
        view: &mut RelationView,
        trees: &SchemaTrees,
        flow: &FlowLayout<'_>,
        now: Instant,
    ) -> Self {
        let layout = {
            let nodes = view.visible_nodes();
            flow.layout(&nodes, view.filters(), view.selected(), |node| {
                trees.is_library_name(node.name())
            })
        };

        layout.register(view.registry_mut(), now);
        view.registry_mut().poll(now + READY_DEBOUNCE);

        let connectors = match view.links() {
            Some(links) => route_connectors(&links, layout.metrics()),
            None => {
                if !layout.cards().is_empty() {
                    warn!(pending = view.registry().pending(); "Element registry not ready");
                }
                Vec::new()
            }
        };

        debug!(
            cards = layout.cards().len(),
            connectors = connectors.len();
            "Relation diagram built"
        );

        Self { layout, connectors }
    }

    pub fn layout(&self) -> &RelationLayout {
        &self.layout
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn is_empty(&self) -> bool {
        self.layout.cards().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use schemascope_core::{
        identifier::Id,
        schema::{Field, NodeKind, Schema, SchemaNode, TypeRef},
        text::FixedWidthMeasure,
    };

    use super::*;
    use crate::config::LayoutConfig;

    #[test]
    fn test_build_routes_connectors() {
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
        let trees = SchemaTrees::new(schema);

        let mut view = RelationView::default();
        view.select(Some(Id::new("schema::User")));
        view.refresh(&trees, &HashSet::new());

        let config = LayoutConfig::default();
        let measure = FixedWidthMeasure::default();
        let flow = FlowLayout::new(&config, &measure);
        let diagram = RelationDiagram::build(&mut view, &trees, &flow, Instant::now());

        assert_eq!(diagram.layout().cards().len(), 2);
        // Post.author -> User; the User self reference is dropped.
        assert_eq!(diagram.connectors().len(), 1);
        let connector = &diagram.connectors()[0];
        assert_eq!(connector.source(), Id::new("schema::User"));
        assert_eq!(connector.target(), Id::new("schema::Post"));
    }

    #[test]
    fn test_empty_view_builds_empty_diagram() {
        let trees = SchemaTrees::new(Schema::new("schema"));
        let mut view = RelationView::default();
        view.refresh(&trees, &HashSet::new());

        let config = LayoutConfig::default();
        let measure = FixedWidthMeasure::default();
        let flow = FlowLayout::new(&config, &measure);
        let diagram = RelationDiagram::build(&mut view, &trees, &flow, Instant::now());
        assert!(diagram.is_empty());
        assert!(diagram.connectors().is_empty());
    }
}
