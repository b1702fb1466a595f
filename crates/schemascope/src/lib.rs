//! Schemascope - relation diagrams for GraphQL schemas.
//!
//! Given a schema and a selected node, Schemascope computes the node's
//! relation view: the nodes it references, the nodes referencing it, and the
//! connector lines between their cards. It also carries the interaction state
//! of the canvas hosting the view, the docs page and node navigation models,
//! and an SVG exporter.
//!
//! [`DiagramBuilder`] runs the whole pipeline; the individual stages live in
//! [`relation`], [`layout`], [`view`] and [`export`].

pub mod canvas;
pub mod config;
pub mod diagram;
pub mod docs;
pub mod export;
pub mod layout;
pub mod navigation;
pub mod relation;
pub mod view;

mod error;
mod trees;

pub use schemascope_core::{color, geometry, identifier, schema, text};

pub use error::SchemascopeError;
pub use trees::SchemaTrees;

use std::{collections::HashSet, time::Instant};

use log::{debug, info, trace};

use schemascope_core::{
    identifier::Id,
    schema::Schema,
    text::{ShapedTextMeasure, TextMeasure},
};
use schemascope_parser::ParseConfig;

use config::AppConfig;
use diagram::RelationDiagram;
use export::{Exporter, svg::SvgBuilder};
use layout::FlowLayout;
use view::RelationView;

/// Builder for parsing schemas and rendering relation diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use schemascope::{DiagramBuilder, config::AppConfig};
///
/// let source = "type User { friend: User } type Post { author: User }";
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let trees = builder.load(source, None).expect("Failed to parse");
///
/// let diagram = builder.diagram(&trees, "User").expect("Unknown node");
/// let svg = builder.render_svg(&diagram).expect("Failed to render");
/// ```
pub struct DiagramBuilder {
    config: AppConfig,
    measure: Box<dyn TextMeasure>,
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// Card sizes are measured by shaping text with the system fonts.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            measure: Box::new(ShapedTextMeasure),
        }
    }

    /// Replaces the text measurement used to size cards.
    pub fn with_text_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a schema document.
    ///
    /// # Errors
    ///
    /// Returns `SchemascopeError::Parse` for syntax and validation errors.
    pub fn parse(&self, source: &str) -> Result<Schema, SchemascopeError> {
        self.parse_with(source, &ParseConfig::schema())
    }

    /// Parse a library schema document.
    ///
    /// # Errors
    ///
    /// Returns `SchemascopeError::Parse` for syntax and validation errors.
    pub fn parse_library(&self, source: &str) -> Result<Schema, SchemascopeError> {
        self.parse_with(source, &ParseConfig::library())
    }

    fn parse_with(&self, source: &str, config: &ParseConfig) -> Result<Schema, SchemascopeError> {
        info!(origin = config.origin(); "Parsing schema");

        let schema = schemascope_parser::parse(source, config)
            .map_err(|err| SchemascopeError::new_parse_error(err, source))?;

        debug!(nodes = schema.len(); "Schema parsed successfully");
        trace!(schema:?; "Parsed schema");

        Ok(schema)
    }

    /// Parse a schema and an optional library into [`SchemaTrees`].
    ///
    /// Types defined by the library may be referenced from the schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemascopeError::Parse` if either document fails to parse.
    pub fn load(
        &self,
        source: &str,
        library: Option<&str>,
    ) -> Result<SchemaTrees, SchemascopeError> {
        let Some(library_source) = library else {
            return Ok(SchemaTrees::new(self.parse(source)?));
        };

        let library = self.parse_library(library_source)?;
        let external = library.nodes().iter().map(|node| node.name().to_string());
        let config = ParseConfig::schema().with_external_types(external);
        let schema = self.parse_with(source, &config)?;

        Ok(SchemaTrees::new(schema).with_library(library))
    }

    /// Resolves a node name to the node identifier, preferring schema nodes.
    ///
    /// # Errors
    ///
    /// Returns `SchemascopeError::UnknownNode` if neither tree defines `name`.
    pub fn resolve_node(&self, trees: &SchemaTrees, name: &str) -> Result<Id, SchemascopeError> {
        trees
            .node_by_name(Id::new(name))
            .map(|node| node.id())
            .ok_or_else(|| SchemascopeError::UnknownNode(name.to_string()))
    }

    /// Creates a relation view with node `name` selected and its pass computed.
    ///
    /// # Errors
    ///
    /// Returns `SchemascopeError::UnknownNode` if `name` is not defined.
    pub fn view(&self, trees: &SchemaTrees, name: &str) -> Result<RelationView, SchemascopeError> {
        let selected = self.resolve_node(trees, name)?;

        let mut view = RelationView::new(self.config.relation().options());
        view.select(Some(selected));
        view.refresh(trees, &HashSet::new());
        Ok(view)
    }

    /// Lays out the relation view of node `name`.
    ///
    /// # Errors
    ///
    /// Returns `SchemascopeError::UnknownNode` if `name` is not defined.
    pub fn diagram(
        &self,
        trees: &SchemaTrees,
        name: &str,
    ) -> Result<RelationDiagram, SchemascopeError> {
        let mut view = self.view(trees, name)?;
        Ok(self.layout_view(&mut view, trees))
    }

    /// Lays out an existing relation view.
    pub fn layout_view(&self, view: &mut RelationView, trees: &SchemaTrees) -> RelationDiagram {
        info!(selected:? = view.selected(); "Building relation diagram");
        let flow = FlowLayout::new(self.config.layout(), self.measure.as_ref());
        RelationDiagram::build(view, trees, &flow, Instant::now())
    }

    /// Render a relation diagram to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns `SchemascopeError::Export` if the configured style is invalid.
    pub fn render_svg(&self, diagram: &RelationDiagram) -> Result<String, SchemascopeError> {
        let svg = SvgBuilder::new("")
            .with_style(self.config.style())
            .with_layout(self.config.layout())
            .build()?;

        let document = svg.render_document(diagram).to_string();
        info!("SVG rendered successfully");
        Ok(document)
    }

    /// Render a relation diagram into the SVG file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `SchemascopeError::Export` for invalid styles and I/O failures.
    pub fn write_svg(&self, diagram: &RelationDiagram, path: &str) -> Result<(), SchemascopeError> {
        let mut svg = SvgBuilder::new(path)
            .with_style(self.config.style())
            .with_layout(self.config.layout())
            .build()?;

        svg.export_diagram(diagram)?;
        Ok(())
    }
}
