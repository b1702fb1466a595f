//! Connector lines derived from resolved links.
//!
//! A connector starts on the side of the referenced card that faces the
//! referencing card and ends next to the referencing entry's row, so lines to
//! one card fan out by row.

use schemascope_core::{
    geometry::{Bounds, Point},
    identifier::Id,
};

use super::RelationLink;

/// Minimum horizontal reach of a connector's control points.
const MIN_CURVE_REACH: f32 = 40.0;

/// Vertical metrics shared by every card of a layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowMetrics {
    header_height: f32,
    row_height: f32,
}

impl RowMetrics {
    pub fn new(header_height: f32, row_height: f32) -> Self {
        Self {
            header_height,
            row_height,
        }
    }

    pub fn header_height(&self) -> f32 {
        self.header_height
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Vertical centre of row `index` of a card occupying `bounds`.
    ///
    /// Rows beyond the card are clamped to its bottom edge.
    pub fn row_center(&self, bounds: Bounds, index: usize) -> f32 {
        let y = bounds.min_y()
            + self.header_height
            + self.row_height * index as f32
            + self.row_height / 2.0;
        y.min(bounds.max_y())
    }

    /// Vertical centre of the header of a card occupying `bounds`.
    pub fn header_center(&self, bounds: Bounds) -> f32 {
        bounds.min_y() + self.header_height / 2.0
    }
}

/// Which vertical edge of a card a connector attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn x(self, bounds: Bounds) -> f32 {
        match self {
            Self::Left => bounds.min_x(),
            Self::Right => bounds.max_x(),
        }
    }

    /// Direction a line leaves this side in.
    fn direction(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// A concrete line between two cards.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    source: Id,
    target: Id,
    field_index: usize,
    start: Point,
    start_side: Side,
    end: Point,
    end_side: Side,
}

impl Connector {
    /// Node the referencing entry points at.
    pub fn source(&self) -> Id {
        self.source
    }

    /// Node owning the referencing entry.
    pub fn target(&self) -> Id {
        self.target
    }

    /// Row of the referencing entry within the target card.
    pub fn field_index(&self) -> usize {
        self.field_index
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn start_side(&self) -> Side {
        self.start_side
    }

    pub fn end_side(&self) -> Side {
        self.end_side
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// SVG path data of the connector as a cubic bezier curve.
    ///
    /// Control points extend horizontally out of the attached sides so the
    /// line leaves and enters each card perpendicular to its edge.
    pub fn path_data(&self) -> String {
        let reach = ((self.end.x() - self.start.x()).abs() / 2.0).max(MIN_CURVE_REACH);
        let ctrl1_x = self.start.x() + self.start_side.direction() * reach;
        let ctrl2_x = self.end.x() + self.end_side.direction() * reach;

        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x(),
            self.start.y(),
            ctrl1_x,
            self.start.y(),
            ctrl2_x,
            self.end.y(),
            self.end.x(),
            self.end.y()
        )
    }
}

/// Picks the facing sides of two cards.
///
/// Cards overlapping horizontally (stacked in the same column) both attach on
/// their right side so the curve stays outside of them.
fn facing_sides(source: Bounds, target: Bounds) -> (Side, Side) {
    let overlapping = source.min_x() < target.max_x() && target.min_x() < source.max_x();
    if overlapping {
        (Side::Right, Side::Right)
    } else if source.center().x() <= target.center().x() {
        (Side::Right, Side::Left)
    } else {
        (Side::Left, Side::Right)
    }
}

/// Converts resolved links into connectors, one per endpoint.
pub fn route_connectors(links: &[RelationLink<'_>], metrics: RowMetrics) -> Vec<Connector> {
    let mut connectors = Vec::new();
    for link in links {
        let target = link.to();
        let target_bounds = target.bounds();

        for endpoint in link.from() {
            let source = endpoint.entry();
            let source_bounds = source.bounds();
            let end_y = metrics.row_center(target_bounds, endpoint.index());

            let (start_side, end_side) = if source.node().id() == target.node().id() {
                (Side::Right, Side::Right)
            } else {
                facing_sides(source_bounds, target_bounds)
            };

            let start_y = if source.node().id() == target.node().id() {
                metrics.header_center(source_bounds)
            } else {
                source_bounds.center().y()
            };

            connectors.push(Connector {
                source: source.node().id(),
                target: target.node().id(),
                field_index: endpoint.index(),
                start: Point::new(start_side.x(source_bounds), start_y),
                start_side,
                end: Point::new(end_side.x(target_bounds), end_y),
                end_side,
            });
        }
    }
    connectors
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use float_cmp::assert_approx_eq;
    use schemascope_core::{
        geometry::Size,
        schema::{Field, NodeKind, SchemaNode, TypeRef},
    };

    use super::*;
    use crate::relation::{
        ElementRegistry, FieldFilters, READY_DEBOUNCE, RelationOptions, resolve_links, select,
    };

    fn metrics() -> RowMetrics {
        RowMetrics::new(30.0, 20.0)
    }

    #[test]
    fn test_row_center() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 100.0), Size::new(100.0, 90.0));
        assert_approx_eq!(f32, metrics().row_center(bounds, 0), 140.0);
        assert_approx_eq!(f32, metrics().row_center(bounds, 2), 180.0);
        // Clamped to the bottom edge.
        assert_approx_eq!(f32, metrics().row_center(bounds, 10), 190.0);
    }

    #[test]
    fn test_facing_sides() {
        let left = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 50.0));
        let right = Bounds::new_from_top_left(Point::new(200.0, 0.0), Size::new(100.0, 50.0));
        let below = Bounds::new_from_top_left(Point::new(50.0, 200.0), Size::new(100.0, 50.0));

        assert_eq!(facing_sides(left, right), (Side::Right, Side::Left));
        assert_eq!(facing_sides(right, left), (Side::Left, Side::Right));
        assert_eq!(facing_sides(left, below), (Side::Right, Side::Right));
    }

    #[test]
    fn test_path_data_is_cubic() {
        let connector = Connector {
            source: Id::new("schema::A"),
            target: Id::new("schema::B"),
            field_index: 0,
            start: Point::new(100.0, 25.0),
            start_side: Side::Right,
            end: Point::new(300.0, 45.0),
            end_side: Side::Left,
        };
        assert_eq!(
            connector.path_data(),
            "M 100 25 C 200 25, 200 45, 300 45"
        );
    }

    #[test]
    fn test_route_fans_out_by_row() {
        let origin = Id::new("schema");
        let nodes = vec![
            SchemaNode::new(origin, "Post", NodeKind::Object).with_fields(vec![
                Field::new("author", TypeRef::named("User")),
                Field::new("editor", TypeRef::named("User")),
            ]),
            SchemaNode::new(origin, "User", NodeKind::Object),
        ];
        let refs: Vec<&SchemaNode> = nodes.iter().collect();
        let options = RelationOptions::default();
        let sequence = select(&refs, nodes[0].id(), options, &FieldFilters::new());

        let now = Instant::now();
        let mut registry = ElementRegistry::new();
        registry.reset(sequence.ids());
        let post = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 70.0));
        let user = Bounds::new_from_top_left(Point::new(200.0, 0.0), Size::new(100.0, 30.0));
        registry.register(nodes[0].id(), post, now);
        registry.register(nodes[1].id(), user, now);
        registry.poll(now + READY_DEBOUNCE);

        let links = resolve_links(&sequence, &registry, &FieldFilters::new(), options).unwrap();
        let connectors = route_connectors(&links, metrics());

        assert_eq!(connectors.len(), 2);
        for (index, connector) in connectors.iter().enumerate() {
            assert_eq!(connector.source(), nodes[1].id());
            assert_eq!(connector.target(), nodes[0].id());
            assert_eq!(connector.field_index(), index);
            // User sits right of Post: leave User on the left, enter Post on the right.
            assert_approx_eq!(f32, connector.start().x(), 200.0);
            assert_approx_eq!(f32, connector.end().x(), 100.0);
        }
        assert_approx_eq!(f32, connectors[0].end().y(), 40.0);
        assert_approx_eq!(f32, connectors[1].end().y(), 60.0);
    }
}
