//! Configuration types for Schemascope relation views.
//!
//! This module provides configuration structures that control which nodes a
//! relation view shows, how node cards are laid out, how the canvas reacts to
//! input and how the exported diagram is styled. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration combining every section.
//! - [`RelationConfig`] - Display flags of the relation selector.
//! - [`LayoutConfig`] - Card flow layout and text sizes.
//! - [`CanvasConfig`] - Zoom bounds, zoom steps and animation durations.
//! - [`StyleConfig`] - Visual styling options such as background color.
//!
//! # Example
//!
//! ```
//! # use schemascope::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! assert!(config.style().background_color().is_ok());
//! assert!(config.relation().show_related_to());
//! ```

use std::time::Duration;

use serde::Deserialize;

use schemascope_core::color::Color;

use crate::relation::RelationOptions;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Relation selector section.
    #[serde(default)]
    relation: RelationConfig,

    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Canvas interaction section.
    #[serde(default)]
    canvas: CanvasConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        relation: RelationConfig,
        layout: LayoutConfig,
        canvas: CanvasConfig,
        style: StyleConfig,
    ) -> Self {
        Self {
            relation,
            layout,
            canvas,
            style,
        }
    }

    /// Returns the relation configuration.
    pub fn relation(&self) -> &RelationConfig {
        &self.relation
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the canvas configuration.
    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Replaces the relation section, keeping the others.
    pub fn with_relation(mut self, relation: RelationConfig) -> Self {
        self.relation = relation;
        self
    }

    /// Checks values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        self.layout.validate()?;
        self.canvas.validate()?;
        self.style.validate()
    }
}

/// Display flags of the relation selector.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RelationConfig {
    /// Also show the nodes that reference the selected node.
    show_related_to: bool,

    /// Let scalar-typed fields take part in relations.
    base_types_on: bool,

    /// Draw a connector for fields that point back at their own node.
    self_loops: bool,

    /// Render only the cards of library nodes.
    library_only: bool,
}

impl Default for RelationConfig {
    fn default() -> Self {
        Self {
            show_related_to: true,
            base_types_on: false,
            self_loops: false,
            library_only: false,
        }
    }
}

impl RelationConfig {
    /// Creates a relation configuration from explicit flags.
    pub fn new(
        show_related_to: bool,
        base_types_on: bool,
        self_loops: bool,
        library_only: bool,
    ) -> Self {
        Self {
            show_related_to,
            base_types_on,
            self_loops,
            library_only,
        }
    }

    pub fn show_related_to(&self) -> bool {
        self.show_related_to
    }

    pub fn base_types_on(&self) -> bool {
        self.base_types_on
    }

    pub fn self_loops(&self) -> bool {
        self.self_loops
    }

    pub fn library_only(&self) -> bool {
        self.library_only
    }

    /// The selector options described by this section.
    pub fn options(&self) -> RelationOptions {
        RelationOptions::default()
            .with_show_related_to(self.show_related_to)
            .with_base_types_on(self.base_types_on)
            .with_self_loops(self.self_loops)
            .with_library_only(self.library_only)
    }
}

/// Flow layout of node cards.
///
/// Cards are placed left to right in rows separated by `gap`, wrapping once a
/// row would exceed `max_row_width`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    padding: f32,
    gap: f32,
    max_row_width: f32,
    min_card_width: f32,
    card_padding: f32,
    font_family: String,
    header_font_size: u16,
    field_font_size: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 20.0,
            gap: 80.0,
            max_row_width: 1600.0,
            min_card_width: 160.0,
            card_padding: 10.0,
            font_family: "sans-serif".to_string(),
            header_font_size: 14,
            field_font_size: 12,
        }
    }
}

impl LayoutConfig {
    /// Space between the canvas edge and the outermost cards.
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Space between neighbouring cards, both within and across rows.
    pub fn gap(&self) -> f32 {
        self.gap
    }

    pub fn max_row_width(&self) -> f32 {
        self.max_row_width
    }

    pub fn min_card_width(&self) -> f32 {
        self.min_card_width
    }

    /// Horizontal padding inside a card around its text.
    pub fn card_padding(&self) -> f32 {
        self.card_padding
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn header_font_size(&self) -> u16 {
        self.header_font_size
    }

    pub fn field_font_size(&self) -> u16 {
        self.field_font_size
    }

    /// Sets the maximum row width (builder style).
    pub fn with_max_row_width(mut self, max_row_width: f32) -> Self {
        self.max_row_width = max_row_width;
        self
    }

    fn validate(&self) -> Result<(), String> {
        if self.max_row_width <= 0.0 {
            return Err(format!(
                "layout.max_row_width must be positive, got {}",
                self.max_row_width
            ));
        }
        if self.header_font_size == 0 || self.field_font_size == 0 {
            return Err("layout font sizes must be positive".to_string());
        }
        Ok(())
    }
}

/// Smallest zoom scale the canvas ever shows.
pub const MIN_SCALE_LIMIT: f32 = 0.1;

/// Largest zoom scale the canvas ever shows.
pub const MAX_SCALE_LIMIT: f32 = 1.5;

/// Zoom bounds, zoom steps and animation timings of the relation canvas.
///
/// The configured scale bounds must lie within
/// [`MIN_SCALE_LIMIT`]..=[`MAX_SCALE_LIMIT`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    min_scale: f32,
    max_scale: f32,
    zoom_step: f32,
    double_click_step: f32,
    wheel_step: f32,
    focus_height_ratio: f32,
    min_focus_scale: f32,
    pan_animation_ms: u64,
    focus_animation_ms: u64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE_LIMIT,
            max_scale: MAX_SCALE_LIMIT,
            zoom_step: 0.2,
            double_click_step: 0.7,
            wheel_step: 0.002,
            focus_height_ratio: 1.2,
            min_focus_scale: 0.3,
            pan_animation_ms: 300,
            focus_animation_ms: 300,
        }
    }
}

impl CanvasConfig {
    /// Narrows the zoom range (builder style).
    pub fn with_scale_bounds(mut self, min_scale: f32, max_scale: f32) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self
    }

    pub fn min_scale(&self) -> f32 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f32 {
        self.max_scale
    }

    /// Exponent of the zoom-in/zoom-out buttons.
    pub fn zoom_step(&self) -> f32 {
        self.zoom_step
    }

    /// Scale added by a double click.
    pub fn double_click_step(&self) -> f32 {
        self.double_click_step
    }

    /// Exponent per wheel delta unit in zoom mode.
    pub fn wheel_step(&self) -> f32 {
        self.wheel_step
    }

    /// A focused node taller than `viewport_height / focus_height_ratio` is scaled down.
    pub fn focus_height_ratio(&self) -> f32 {
        self.focus_height_ratio
    }

    pub fn min_focus_scale(&self) -> f32 {
        self.min_focus_scale
    }

    pub fn pan_animation(&self) -> Duration {
        Duration::from_millis(self.pan_animation_ms)
    }

    pub fn focus_animation(&self) -> Duration {
        Duration::from_millis(self.focus_animation_ms)
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(format!(
                "canvas scale bounds must satisfy 0 < min_scale <= max_scale, got [{}, {}]",
                self.min_scale, self.max_scale
            ));
        }
        if self.min_scale < MIN_SCALE_LIMIT || self.max_scale > MAX_SCALE_LIMIT {
            return Err(format!(
                "canvas scale bounds must lie within [{MIN_SCALE_LIMIT}, {MAX_SCALE_LIMIT}], got [{}, {}]",
                self.min_scale, self.max_scale
            ));
        }
        if self.focus_height_ratio <= 0.0 {
            return Err(format!(
                "canvas.focus_height_ratio must be positive, got {}",
                self.focus_height_ratio
            ));
        }
        Ok(())
    }
}

/// Visual styling configuration for exported diagrams.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] of the diagram, as a color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Fill [`Color`] of node cards.
    #[serde(default)]
    card_color: Option<String>,

    /// Stroke [`Color`] of connector lines.
    #[serde(default)]
    line_color: Option<String>,

    /// Header [`Color`] of the selected node's card.
    #[serde(default)]
    accent_color: Option<String>,
}

fn parse_color(value: Option<&String>, key: &str) -> Result<Option<Color>, String> {
    value
        .map(|color| Color::new(color))
        .transpose()
        .map_err(|err| format!("Invalid {key} in config: {err}"))
}

impl StyleConfig {
    /// Sets the background color string (builder style).
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Sets the connector color string (builder style).
    pub fn with_line_color(mut self, color: impl Into<String>) -> Self {
        self.line_color = Some(color.into());
        self
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.background_color.as_ref(), "background color")
    }

    /// Returns the parsed card fill [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is invalid.
    pub fn card_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.card_color.as_ref(), "card color")
    }

    /// Returns the parsed connector [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is invalid.
    pub fn line_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.line_color.as_ref(), "line color")
    }

    /// Returns the parsed accent [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is invalid.
    pub fn accent_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.accent_color.as_ref(), "accent color")
    }

    fn validate(&self) -> Result<(), String> {
        self.background_color()?;
        self.card_color()?;
        self.line_color()?;
        self.accent_color()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.canvas().min_scale(), 0.1);
        assert_eq!(config.canvas().max_scale(), 1.5);
        assert_eq!(config.layout().gap(), 80.0);
        assert_eq!(config.canvas().focus_animation(), Duration::from_millis(300));
    }

    #[test]
    fn test_relation_options_follow_flags() {
        let options = RelationConfig::new(false, true, true, false).options();
        assert!(!options.show_related_to());
        assert!(options.base_types_on());
        assert!(options.self_loops());
        assert!(!options.library_only());
    }

    #[test]
    fn test_invalid_color_is_reported() {
        let style = StyleConfig {
            line_color: Some("not-a-color".to_string()),
            ..StyleConfig::default()
        };
        let err = style.line_color().unwrap_err();
        assert!(err.contains("line color"));
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_inverted_scale_bounds_are_rejected() {
        let canvas = CanvasConfig {
            min_scale: 2.0,
            ..CanvasConfig::default()
        };
        assert!(canvas.validate().is_err());
    }

    #[test]
    fn test_scale_bounds_outside_limits_are_rejected() {
        let wide = CanvasConfig {
            min_scale: 0.01,
            max_scale: 8.0,
            ..CanvasConfig::default()
        };
        assert!(wide.validate().unwrap_err().contains("must lie within"));

        let too_large = CanvasConfig {
            max_scale: 1.6,
            ..CanvasConfig::default()
        };
        assert!(too_large.validate().is_err());

        let narrowed = CanvasConfig::default().with_scale_bounds(0.5, 1.0);
        assert!(narrowed.validate().is_ok());
    }
}
