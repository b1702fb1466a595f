//! Documentation page of a schema node.
//!
//! A [`DocsPage`] is the model behind the docs panel: the node's name and
//! kind, the interfaces it implements, its description rendered from
//! Markdown and its entries with their rendered types. Entry types and
//! interfaces that name another node are navigable.

use log::debug;
use pulldown_cmark::{Event, Options, Parser, html};

use schemascope_core::{
    identifier::Id,
    schema::{Field, SchemaNode},
};

use crate::trees::SchemaTrees;

/// Shown in place of a missing or empty description.
pub const NO_DESCRIPTION: &str = "No description";

/// Converts description Markdown into HTML.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// CommonMark renderer backed by `pulldown-cmark`.
///
/// Raw HTML in the source is escaped and shown as text.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommonMarkRenderer;

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        let events = Parser::new_ext(markdown, options).map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });

        let mut output = String::new();
        html::push_html(&mut output, events);
        output
    }
}

/// One entry of a docs page.
#[derive(Debug, Clone, PartialEq)]
pub struct DocsField {
    name: String,
    type_label: Option<String>,
    target: Option<Id>,
    arguments: Vec<String>,
    description: Option<String>,
}

impl DocsField {
    fn new(field: &Field, trees: &SchemaTrees) -> Self {
        let target = field
            .type_name()
            .filter(|name| trees.node_by_name(*name).is_some());
        Self {
            name: field.name().to_string(),
            type_label: field.ty().map(ToString::to_string),
            target,
            arguments: field
                .arguments()
                .iter()
                .map(|argument| match argument.ty() {
                    Some(ty) => format!("{}: {ty}", argument.name()),
                    None => argument.name().to_string(),
                })
                .collect(),
            description: field.description().map(str::to_string),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_label(&self) -> Option<&str> {
        self.type_label.as_deref()
    }

    /// Name of the node this entry's type points at, if that node exists.
    pub fn target(&self) -> Option<Id> {
        self.target
    }

    /// Arguments rendered as `name: Type`.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// The docs panel model of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct DocsPage {
    id: Id,
    name: Id,
    kind_label: &'static str,
    interfaces: Vec<Id>,
    description: Option<String>,
    description_html: String,
    fields: Vec<DocsField>,
    editable: bool,
}

impl DocsPage {
    /// Builds the page of node `id`, or `None` if no such node exists.
    pub fn build(trees: &SchemaTrees, id: Id, renderer: &dyn MarkdownRenderer) -> Option<Self> {
        let node = trees.node(id)?;
        Some(Self::from_node(node, trees, renderer))
    }

    fn from_node(node: &SchemaNode, trees: &SchemaTrees, renderer: &dyn MarkdownRenderer) -> Self {
        let description = node
            .description()
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string);
        let description_html = match &description {
            Some(text) => renderer.render(text),
            None => NO_DESCRIPTION.to_string(),
        };

        debug!(node:% = node.id(), fields = node.fields().len(); "Docs page built");

        Self {
            id: node.id(),
            name: node.name(),
            kind_label: node.kind().keyword(),
            interfaces: node.interfaces().to_vec(),
            description,
            description_html,
            fields: node
                .fields()
                .iter()
                .map(|field| DocsField::new(field, trees))
                .collect(),
            editable: trees.schema().node(node.id()).is_some(),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> Id {
        self.name
    }

    /// SDL keyword of the node kind, e.g. `type` or `enum`.
    pub fn kind_label(&self) -> &'static str {
        self.kind_label
    }

    pub fn interfaces(&self) -> &[Id] {
        &self.interfaces
    }

    /// The raw Markdown description, used as the edit field's initial value.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Rendered description, or [`NO_DESCRIPTION`].
    pub fn description_html(&self) -> &str {
        &self.description_html
    }

    pub fn fields(&self) -> &[DocsField] {
        &self.fields
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Library nodes are shown but cannot be edited.
    pub fn is_editable(&self) -> bool {
        self.editable
    }
}

/// Resolves a node name clicked on a docs page to the node to select.
///
/// Schema nodes win over library nodes of the same name.
pub fn navigate(trees: &SchemaTrees, name: Id) -> Option<Id> {
    trees.node_by_name(name).map(SchemaNode::id)
}
