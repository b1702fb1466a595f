//! SVG rendering of relation diagrams.

use std::{fs::File, io::Write};

use log::{debug, error, info};
use svg::{Document, node::element as svg_element};

use schemascope_core::{
    color::Color,
    geometry::{Bounds, Size},
};

use crate::{
    config::{LayoutConfig, StyleConfig},
    diagram::RelationDiagram,
    export,
    layout::NodeCard,
    relation::{Connector, RowMetrics},
};

/// Margin added around the diagram content on every side.
const DOCUMENT_MARGIN: f32 = 50.0;

const ARROW_MARKER_ID: &str = "connector-arrow";

/// Builder for [`Svg`] exporters.
#[derive(Debug, Clone)]
pub struct SvgBuilder {
    file_name: String,
    style: StyleConfig,
    layout: LayoutConfig,
}

impl SvgBuilder {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            style: StyleConfig::default(),
            layout: LayoutConfig::default(),
        }
    }

    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    /// Fonts and card padding must match the ones used to lay the diagram out.
    pub fn with_layout(mut self, layout: &LayoutConfig) -> Self {
        self.layout = layout.clone();
        self
    }

    /// Resolves the configured colors.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if a configured color is invalid.
    pub fn build(self) -> Result<Svg, export::Error> {
        let background = self
            .style
            .background_color()
            .map_err(export::Error::Render)?;
        let card = resolve(self.style.card_color(), "white")?;
        let line = resolve(self.style.line_color(), "#6b7280")?;
        let accent = resolve(self.style.accent_color(), "#d6336c")?;

        Ok(Svg {
            file_name: self.file_name,
            background,
            card,
            line,
            accent,
            layout: self.layout,
        })
    }
}

fn resolve(
    configured: Result<Option<Color>, String>,
    fallback: &str,
) -> Result<Color, export::Error> {
    match configured.map_err(export::Error::Render)? {
        Some(color) => Ok(color),
        None => Color::new(fallback).map_err(export::Error::Render),
    }
}

/// SVG exporter for relation diagrams.
#[derive(Debug, Clone)]
pub struct Svg {
    file_name: String,
    background: Option<Color>,
    card: Color,
    line: Color,
    accent: Color,
    layout: LayoutConfig,
}

impl Svg {
    /// Renders the complete diagram to an SVG document.
    pub fn render_document(&self, diagram: &RelationDiagram) -> Document {
        let layout = diagram.layout();
        let content_bounds = layout.bounds();
        let content_size = content_bounds.to_size();

        let svg_size = self.calculate_svg_dimensions(content_size);

        let doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", svg_size.width(), svg_size.height()),
            )
            .set("width", svg_size.width())
            .set("height", svg_size.height());

        let mut doc = self.add_background(doc, svg_size);
        doc = doc.add(self.create_marker_definitions());

        let margin_x = (svg_size.width() - content_size.width()) / 2.0;
        let margin_y = (svg_size.height() - content_size.height()) / 2.0;

        let mut main_group = svg_element::Group::new().set(
            "transform",
            format!(
                "translate({}, {})",
                margin_x - content_bounds.min_x(),
                margin_y - content_bounds.min_y()
            ),
        );

        for card in layout.cards() {
            main_group = main_group.add(self.render_card(card, layout.metrics()));
        }
        for connector in diagram.connectors() {
            main_group = main_group.add(self.render_connector(connector));
        }

        doc.add(main_group)
    }

    /// Calculates the document size for the given content, margins included.
    fn calculate_svg_dimensions(&self, content_size: Size) -> Size {
        let width = DOCUMENT_MARGIN.mul_add(2.0, content_size.width());
        let height = DOCUMENT_MARGIN.mul_add(2.0, content_size.height());

        debug!(width, height; "Final SVG dimensions");

        Size::new(width, height)
    }

    fn add_background(&self, doc: Document, size: Size) -> Document {
        let Some(color) = &self.background else {
            return doc;
        };
        let background = svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", size.width())
            .set("height", size.height())
            .set("fill", color.to_string());
        doc.add(background)
    }

    fn create_marker_definitions(&self) -> svg_element::Definitions {
        let arrow = svg_element::Marker::new()
            .set("id", ARROW_MARKER_ID)
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 6)
            .set("markerHeight", 6)
            .set("orient", "auto")
            .add(
                svg_element::Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", self.line.to_string()),
            );
        svg_element::Definitions::new().add(arrow)
    }

    fn text(
        &self,
        content: impl Into<String>,
        x: f32,
        y: f32,
        font_size: u16,
    ) -> svg_element::Text {
        svg_element::Text::new(content)
            .set("x", x)
            .set("y", y)
            .set("dominant-baseline", "middle")
            .set("font-family", self.layout.font_family())
            .set("font-size", font_size)
    }

    fn render_card(&self, card: &NodeCard, metrics: RowMetrics) -> svg_element::Group {
        let bounds: Bounds = card.bounds();
        let padding = self.layout.card_padding();
        let (stroke, stroke_width) = if card.is_selected() {
            (&self.accent, 2.0)
        } else {
            (&self.line, 1.0)
        };

        let mut frame = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", 4.0)
            .set("fill", self.card.to_string())
            .set("stroke", stroke.to_string())
            .set("stroke-width", stroke_width);
        if card.is_library() {
            frame = frame.set("stroke-dasharray", "4 3");
        }

        let header_y = metrics.header_center(bounds);
        let title = self
            .text(
                card.name().to_string(),
                bounds.min_x() + padding,
                header_y,
                self.layout.header_font_size(),
            )
            .set("font-weight", "bold");
        let keyword = self
            .text(
                card.kind().keyword(),
                bounds.max_x() - padding,
                header_y,
                self.layout.field_font_size(),
            )
            .set("text-anchor", "end")
            .set("fill", stroke.to_string());

        let mut group = svg_element::Group::new()
            .set("class", "node-card")
            .set("data-node", card.id().to_string())
            .add(frame)
            .add(title)
            .add(keyword);

        if !card.rows().is_empty() {
            let separator_y = bounds.min_y() + metrics.header_height();
            group = group.add(
                svg_element::Line::new()
                    .set("x1", bounds.min_x())
                    .set("y1", separator_y)
                    .set("x2", bounds.max_x())
                    .set("y2", separator_y)
                    .set("stroke", self.line.to_string()),
            );
        }

        for (index, row) in card.rows().iter().enumerate() {
            group = group.add(self.text(
                row.label(),
                bounds.min_x() + padding,
                metrics.row_center(bounds, index),
                self.layout.field_font_size(),
            ));
        }

        group
    }

    fn render_connector(&self, connector: &Connector) -> svg_element::Path {
        svg_element::Path::new()
            .set("class", "connector")
            .set("d", connector.path_data())
            .set("fill", "none")
            .set("stroke", self.line.to_string())
            .set("stroke-width", 1.5)
            .set("marker-end", format!("url(#{ARROW_MARKER_ID})"))
    }

    /// Writes an SVG document to the exporter's file.
    pub fn write_document(&self, doc: Document) -> Result<(), export::Error> {
        info!(file_name = self.file_name; "Creating SVG file");
        let f = match File::create(&self.file_name) {
            Ok(file) => file,
            Err(err) => {
                error!(file_name = self.file_name, err:err; "Failed to create SVG file");
                return Err(export::Error::Io(err));
            }
        };

        if let Err(err) = write!(&f, "{doc}") {
            error!(file_name = self.file_name, err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }
}

impl export::Exporter for Svg {
    fn export_diagram(&mut self, diagram: &RelationDiagram) -> Result<(), export::Error> {
        let doc = self.render_document(diagram);
        debug!("SVG document rendered");

        self.write_document(doc)
    }
}
