//! Integration tests for the DiagramBuilder API
//!
//! These tests verify that the public API works and is usable.

use schemascope::{
    DiagramBuilder, SchemascopeError,
    config::{AppConfig, RelationConfig},
    text::FixedWidthMeasure,
};

const BLOG: &str = r#"
    "A registered person"
    type User {
        id: ID!
        name: String
        friends: [User!]!
    }

    type Post {
        title: String!
        author: User!
        tags: [Tag!]
    }

    enum Tag {
        NEWS
        OPINION
    }

    type Query {
        user(id: ID!): User
        posts: [Post!]!
    }
"#;

fn builder() -> DiagramBuilder {
    DiagramBuilder::default().with_text_measure(FixedWidthMeasure::default())
}

fn card_names(builder: &DiagramBuilder, source: &str, selected: &str) -> Vec<String> {
    let trees = builder.load(source, None).expect("Failed to parse schema");
    let diagram = builder
        .diagram(&trees, selected)
        .expect("Failed to build diagram");
    diagram
        .layout()
        .cards()
        .iter()
        .map(|card| card.name().to_string())
        .collect()
}

#[test]
fn test_builder_api_exists() {
    let _builder = DiagramBuilder::default();
}

#[test]
fn test_parse_simple_schema() {
    let schema = builder().parse(BLOG).expect("Should parse valid schema");
    assert_eq!(schema.len(), 4);
}

#[test]
fn test_relation_cards_of_user() {
    let names = card_names(&builder(), BLOG, "User");
    assert_eq!(names, ["Post", "Query", "User"]);
}

#[test]
fn test_relation_cards_of_post() {
    let names = card_names(&builder(), BLOG, "Post");
    assert_eq!(names, ["Query", "Post", "User", "Tag"]);
}

#[test]
fn test_related_to_can_be_disabled() {
    let config =
        AppConfig::default().with_relation(RelationConfig::new(false, false, false, false));
    let builder = DiagramBuilder::new(config).with_text_measure(FixedWidthMeasure::default());
    let names = card_names(&builder, BLOG, "User");
    assert_eq!(names, ["User"]);
}

#[test]
fn test_render_simple_diagram() {
    let builder = builder();
    let trees = builder.load(BLOG, None).expect("Failed to parse schema");
    let diagram = builder.diagram(&trees, "Post").expect("Unknown node");
    let result = builder.render_svg(&diagram);

    if let Ok(svg) = result {
        assert!(svg.contains("<svg"), "Output should contain SVG tag");
        assert!(svg.contains("</svg>"), "Output should be complete SVG");
        assert!(svg.contains("author: User!"));
    } else {
        panic!("Failed to render: {:?}", result.err());
    }
}

#[test]
fn test_connectors_follow_references() {
    let builder = builder();
    let trees = builder.load(BLOG, None).expect("Failed to parse schema");
    let diagram = builder.diagram(&trees, "Post").expect("Unknown node");

    // Query.user, Query.posts, Post.author and Post.tags; User.friends points
    // back at its own card and is not drawn.
    assert_eq!(diagram.connectors().len(), 4);
}

#[test]
fn test_library_nodes_are_flagged() {
    let library = "type PageInfo { hasNextPage: Boolean! }";
    let source = "type UserConnection { pageInfo: PageInfo! count: Int }";

    let builder = builder();
    let trees = builder
        .load(source, Some(library))
        .expect("Failed to parse schemas");
    let diagram = builder
        .diagram(&trees, "UserConnection")
        .expect("Unknown node");

    let cards = diagram.layout().cards();
    assert_eq!(cards.len(), 2);
    assert!(!cards[0].is_library());
    assert!(cards[1].is_library());
    assert_eq!(cards[1].name(), "PageInfo");
}

#[test]
fn test_unknown_node_is_an_error() {
    let builder = builder();
    let trees = builder.load(BLOG, None).expect("Failed to parse schema");
    let result = builder.diagram(&trees, "Comment");
    assert!(matches!(result, Err(SchemascopeError::UnknownNode(name)) if name == "Comment"));
}

#[test]
fn test_parse_invalid_syntax_returns_error() {
    let invalid_source = "type User {";

    let result = builder().parse(invalid_source);
    assert!(matches!(result, Err(SchemascopeError::Parse { .. })));
}

#[test]
fn test_builder_reusability() {
    let builder = builder();

    let first = builder.load("type A { b: B } type B { a: A }", None).unwrap();
    let second = builder.load("type C { name: String }", None).unwrap();

    let svg1 = builder
        .render_svg(&builder.diagram(&first, "A").unwrap())
        .expect("Failed to render first diagram");
    let svg2 = builder
        .render_svg(&builder.diagram(&second, "C").unwrap())
        .expect("Failed to render second diagram");

    assert_ne!(svg1, svg2);
}
