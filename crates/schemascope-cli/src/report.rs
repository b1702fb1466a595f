//! Plain-text reports printed instead of, or next to, the rendered diagram.

use schemascope::{
    SchemaTrees,
    docs::{DocsPage, NO_DESCRIPTION},
    navigation::NodeNavigation,
};

/// Renders the navigation listing: operation roots first, then one section
/// per non-empty node kind.
pub fn listing(navigation: &NodeNavigation, trees: &SchemaTrees) -> String {
    let mut out = String::new();

    for entry in navigation.operations(trees) {
        if let Some(node) = entry.node().and_then(|id| trees.node(id)) {
            out.push_str(&format!("{}: {}\n", entry.operation(), node.name()));
        }
    }

    for list in navigation.lists(trees) {
        if list.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("{}\n", list.title()));
        for entry in list.entries() {
            let marker = if entry.is_library() { " (library)" } else { "" };
            out.push_str(&format!("  {}{marker}\n", entry.node().name()));
        }
    }

    out
}

/// Renders a docs page as text.
pub fn docs(page: &DocsPage) -> String {
    let mut out = String::new();

    out.push_str(&format!("{} {}", page.kind_label(), page.name()));
    if !page.interfaces().is_empty() {
        let interfaces: Vec<String> = page.interfaces().iter().map(ToString::to_string).collect();
        out.push_str(&format!(" implements {}", interfaces.join(" & ")));
    }
    out.push('\n');
    if !page.is_editable() {
        out.push_str("(library, read-only)\n");
    }

    out.push_str(&format!("\n{}\n", page.description().unwrap_or(NO_DESCRIPTION)));

    if page.has_fields() {
        out.push('\n');
    }
    for field in page.fields() {
        out.push_str(&format!("  {}", field.name()));
        if !field.arguments().is_empty() {
            out.push_str(&format!("({})", field.arguments().join(", ")));
        }
        if let Some(ty) = field.type_label() {
            out.push_str(&format!(": {ty}"));
        }
        if let Some(description) = field.description() {
            out.push_str(&format!("  # {description}"));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use schemascope::{DiagramBuilder, docs::CommonMarkRenderer, identifier::Id};

    use super::*;

    const SOURCE: &str = r#"
        interface Node { id: ID! }

        "A person"
        type User implements Node {
            id: ID!
            "Display name"
            name: String
            posts(first: Int): [Post!]!
        }

        type Post { author: User }

        type Query { me: User }
    "#;

    fn trees() -> SchemaTrees {
        DiagramBuilder::default()
            .load(SOURCE, Some("type PageInfo { hasNextPage: Boolean! }"))
            .unwrap()
    }

    #[test]
    fn test_listing_groups_by_kind() {
        let trees = trees();
        let text = listing(&NodeNavigation::new(), &trees);

        assert!(text.starts_with("query: Query\n"));
        assert!(text.contains("Types\n"));
        assert!(text.contains("  User\n"));
        assert!(text.contains("  PageInfo (library)\n"));
        assert!(text.contains("Interfaces\n  Node\n"));
        assert!(!text.contains("Enums"));
    }

    #[test]
    fn test_listing_respects_search() {
        let trees = trees();
        let mut navigation = NodeNavigation::new();
        navigation.set_search("post");
        let text = listing(&navigation, &trees);

        assert!(text.contains("  Post\n"));
        assert!(!text.contains("  User\n"));
    }

    #[test]
    fn test_docs_page_text() {
        let trees = trees();
        let user = trees.node_by_name(Id::new("User")).unwrap().id();
        let page = DocsPage::build(&trees, user, &CommonMarkRenderer).unwrap();
        let text = docs(&page);

        assert!(text.starts_with("type User implements Node\n"));
        assert!(text.contains("A person"));
        assert!(text.contains("  name: String  # Display name\n"));
        assert!(text.contains("  posts(first: Int): [Post!]!\n"));
        assert!(!text.contains("read-only"));
    }

    #[test]
    fn test_library_docs_are_read_only() {
        let trees = trees();
        let info = trees.node_by_name(Id::new("PageInfo")).unwrap().id();
        let page = DocsPage::build(&trees, info, &CommonMarkRenderer).unwrap();
        let text = docs(&page);

        assert!(text.contains("(library, read-only)"));
        assert!(text.contains(NO_DESCRIPTION));
    }
}
