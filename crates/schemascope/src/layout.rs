//! Flow layout of node cards.
//!
//! Cards are sized from their text and placed left to right in rows, wrapping
//! when a row would exceed the configured width. Rows are top aligned. The
//! resulting bounds stand in for measured element positions and feed the
//! [`ElementRegistry`].

use std::time::Instant;

use log::debug;

use schemascope_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    schema::{Field, NodeKind, SchemaNode},
    text::{TextMeasure, TextStyle},
};

use crate::{
    config::LayoutConfig,
    relation::{ElementRegistry, FieldFilters, RowMetrics},
};

/// One visible entry of a card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRow {
    name: String,
    type_label: Option<String>,
}

impl CardRow {
    fn from_field(field: &Field) -> Self {
        Self {
            name: field.name().to_string(),
            type_label: field.ty().map(ToString::to_string),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rendered type, e.g. `[Post!]!`; absent for enum values.
    pub fn type_label(&self) -> Option<&str> {
        self.type_label.as_deref()
    }

    /// The row as displayed: `name: Type`.
    pub fn label(&self) -> String {
        match &self.type_label {
            Some(ty) => format!("{}: {ty}", self.name),
            None => self.name.clone(),
        }
    }
}

/// A positioned node card.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeCard {
    id: Id,
    name: Id,
    kind: NodeKind,
    rows: Vec<CardRow>,
    bounds: Bounds,
    selected: bool,
    library: bool,
}

impl NodeCard {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn rows(&self) -> &[CardRow] {
        &self.rows
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// True for cards of nodes defined by the library schema.
    pub fn is_library(&self) -> bool {
        self.library
    }
}

/// Cards of one relation pass with their shared row metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationLayout {
    cards: Vec<NodeCard>,
    metrics: RowMetrics,
    bounds: Bounds,
}

impl RelationLayout {
    pub fn cards(&self) -> &[NodeCard] {
        &self.cards
    }

    pub fn metrics(&self) -> RowMetrics {
        self.metrics
    }

    /// Bounds of all cards including the outer padding.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn card(&self, id: Id) -> Option<&NodeCard> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// Reports every card's bounds to `registry`, as rendered at `now`.
    pub fn register(&self, registry: &mut ElementRegistry, now: Instant) {
        for card in &self.cards {
            registry.register(card.id, card.bounds, now);
        }
    }
}

/// Wrapping row layout driven by [`LayoutConfig`].
pub struct FlowLayout<'a> {
    config: &'a LayoutConfig,
    measure: &'a dyn TextMeasure,
}

impl<'a> FlowLayout<'a> {
    pub fn new(config: &'a LayoutConfig, measure: &'a dyn TextMeasure) -> Self {
        Self { config, measure }
    }

    pub fn header_style(&self) -> TextStyle {
        TextStyle::new(self.config.font_family(), self.config.header_font_size())
    }

    pub fn field_style(&self) -> TextStyle {
        TextStyle::new(self.config.font_family(), self.config.field_font_size())
    }

    pub fn metrics(&self) -> RowMetrics {
        let padding = self.config.card_padding();
        RowMetrics::new(
            self.header_style().line_height() + padding,
            self.field_style().line_height() + padding / 2.0,
        )
    }

    fn card_size(&self, node: &SchemaNode, rows: &[CardRow]) -> Size {
        let metrics = self.metrics();
        let header = format!("{}  {}", node.name(), node.kind().keyword());
        let header_width = self.measure.measure(&header, &self.header_style()).width();

        let field_style = self.field_style();
        let rows_width = rows
            .iter()
            .map(|row| self.measure.measure(&row.label(), &field_style).width())
            .fold(0.0_f32, f32::max);

        let width = (header_width.max(rows_width) + 2.0 * self.config.card_padding())
            .max(self.config.min_card_width());
        let height = metrics.header_height() + metrics.row_height() * rows.len() as f32;
        Size::new(width, height)
    }

    /// Lays out one card per node, in order.
    ///
    /// Cards show the entries passing `filters`; `selected` marks the selected
    /// card and `is_library` flags library cards.
    pub fn layout(
        &self,
        nodes: &[&SchemaNode],
        filters: &FieldFilters,
        selected: Option<Id>,
        is_library: impl Fn(&SchemaNode) -> bool,
    ) -> RelationLayout {
        let padding = self.config.padding();
        let gap = self.config.gap();
        let max_row_width = self.config.max_row_width();

        let mut cards = Vec::with_capacity(nodes.len());
        let mut x = padding;
        let mut y = padding;
        let mut row_height: f32 = 0.0;
        let mut content_width: f32 = 0.0;

        for &node in nodes {
            let rows: Vec<CardRow> = filters
                .visible_fields(node)
                .map(CardRow::from_field)
                .collect();
            let size = self.card_size(node, &rows);

            if x > padding && x + size.width() > max_row_width - padding {
                x = padding;
                y += row_height + gap;
                row_height = 0.0;
            }

            let bounds = Bounds::new_from_top_left(Point::new(x, y), size);
            content_width = content_width.max(bounds.max_x());
            row_height = row_height.max(size.height());
            x += size.width() + gap;

            cards.push(NodeCard {
                id: node.id(),
                name: node.name(),
                kind: node.kind(),
                rows,
                bounds,
                selected: selected == Some(node.id()),
                library: is_library(node),
            });
        }

        let bounds = if cards.is_empty() {
            Bounds::default()
        } else {
            Bounds::new_from_top_left(
                Point::default(),
                Size::new(content_width + padding, y + row_height + padding),
            )
        };

        debug!(
            cards = cards.len(),
            width = bounds.width(),
            height = bounds.height();
            "Cards laid out"
        );

        RelationLayout {
            cards,
            metrics: self.metrics(),
            bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use schemascope_core::{schema::TypeRef, text::FixedWidthMeasure};

    use super::*;

    fn node(name: &str, fields: &[(&str, &str)]) -> SchemaNode {
        SchemaNode::new(Id::new("schema"), name, NodeKind::Object).with_fields(
            fields
                .iter()
                .map(|(name, ty)| Field::new(*name, TypeRef::named(ty)))
                .collect(),
        )
    }

    #[test]
    fn test_rows_follow_filters() {
        let config = LayoutConfig::default();
        let measure = FixedWidthMeasure::default();
        let layout = FlowLayout::new(&config, &measure);
        let user = node("User", &[("name", "String"), ("friends", "User")]);
        let filters = FieldFilters::new().with(user.id(), "fri");

        let result = layout.layout(&[&user], &filters, Some(user.id()), |_| false);

        let card = result.card(user.id()).unwrap();
        assert_eq!(card.rows().len(), 1);
        assert_eq!(card.rows()[0].label(), "friends: User");
        assert!(card.is_selected());
        assert!(!card.is_library());

        let metrics = result.metrics();
        assert_approx_eq!(
            f32,
            card.bounds().height(),
            metrics.header_height() + metrics.row_height()
        );
    }

    #[test]
    fn test_cards_wrap_into_rows() {
        let config = LayoutConfig::default().with_max_row_width(500.0);
        let measure = FixedWidthMeasure::default();
        let layout = FlowLayout::new(&config, &measure);
        let nodes = [node("A", &[]), node("B", &[]), node("C", &[])];
        let refs: Vec<&SchemaNode> = nodes.iter().collect();

        let result = layout.layout(&refs, &FieldFilters::new(), None, |_| false);
        let cards = result.cards();

        // Minimum width 160 plus gap 80: two cards fit in 500, the third wraps.
        assert_approx_eq!(f32, cards[0].bounds().min_x(), 20.0);
        assert_approx_eq!(f32, cards[1].bounds().min_x(), 260.0);
        assert_approx_eq!(f32, cards[2].bounds().min_x(), 20.0);
        assert_approx_eq!(
            f32,
            cards[2].bounds().min_y(),
            20.0 + cards[0].bounds().height() + 80.0
        );
        assert!(result.bounds().max_y() >= cards[2].bounds().max_y());
    }

    #[test]
    fn test_wide_card_grows_with_text() {
        let config = LayoutConfig::default();
        let measure = FixedWidthMeasure::default();
        let layout = FlowLayout::new(&config, &measure);
        let wide = node("Wide", &[("aVeryLongFieldNameThatNeedsSpace", "SomeLongTypeName")]);

        let result = layout.layout(&[&wide], &FieldFilters::new(), None, |_| true);
        let card = &result.cards()[0];
        assert!(card.bounds().width() > config.min_card_width());
        assert!(card.is_library());
    }

    #[test]
    fn test_register_fills_registry() {
        let config = LayoutConfig::default();
        let measure = FixedWidthMeasure::default();
        let layout = FlowLayout::new(&config, &measure);
        let nodes = [node("A", &[]), node("B", &[])];
        let refs: Vec<&SchemaNode> = nodes.iter().collect();
        let result = layout.layout(&refs, &FieldFilters::new(), None, |_| false);

        let mut registry = ElementRegistry::new();
        registry.reset(nodes.iter().map(SchemaNode::id));
        let now = Instant::now();
        result.register(&mut registry, now);

        assert_eq!(registry.pending(), 0);
        assert!(registry.poll(now + crate::relation::READY_DEBOUNCE));
        assert_eq!(registry.bounds(nodes[1].id()), Some(result.cards()[1].bounds()));
    }
}
