//! Text styling and measurement.
//!
//! Node cards are sized from the text they display, so layout needs a way to
//! measure a label before anything is drawn. [`TextMeasure`] is that seam:
//!
//! - [`ShapedTextMeasure`] shapes text with cosmic-text against the system fonts
//! - [`FixedWidthMeasure`] assumes every character has the same advance, which
//!   makes layouts reproducible across machines (tests, headless exports)

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use crate::geometry::Size;

/// Font family and size of a piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    font_family: String,
    font_size: u16,
}

impl TextStyle {
    pub fn new(font_family: impl Into<String>, font_size: u16) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
        }
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Font size in points.
    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    /// Font size converted to pixels (roughly 1.33x at standard DPI).
    pub fn font_size_px(&self) -> f32 {
        self.font_size as f32 * 1.33
    }

    /// Height of a single line in pixels.
    pub fn line_height(&self) -> f32 {
        self.font_size_px() * 1.15
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new("sans-serif", 12)
    }
}

/// Measures the rendered size of text.
pub trait TextMeasure {
    /// Returns the width and height `text` occupies when drawn with `style`.
    ///
    /// Empty text measures as [`Size::default`].
    fn measure(&self, text: &str, style: &TextStyle) -> Size;
}

/// Measures text by shaping it with cosmic-text.
///
/// The font system is loaded once per process and shared by all instances.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShapedTextMeasure;

static FONT_SYSTEM: OnceLock<Mutex<FontSystem>> = OnceLock::new();

impl TextMeasure for ShapedTextMeasure {
    fn measure(&self, text: &str, style: &TextStyle) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = FONT_SYSTEM
            .get_or_init(|| {
                info!("Initializing FontSystem");
                Mutex::new(FontSystem::new())
            })
            .lock()
            .expect("failed to lock FontSystem");

        let font_size_px = style.font_size_px();
        let metrics = Metrics::new(font_size_px, style.line_height());

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(style.font_family()));
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        let layout_runs: Vec<_> = buffer.layout_runs().collect();
        if layout_runs.is_empty() {
            max_width = text.chars().count() as f32 * (font_size_px * 0.55);
            total_height = metrics.line_height;
        } else {
            for run in &layout_runs {
                if let Some(last) = run.glyphs.last() {
                    max_width = max_width.max(last.x + last.w);
                }
                total_height += metrics.line_height;
            }
        }

        Size::new(max_width, total_height)
    }
}

/// Measures text assuming a constant advance per character.
#[derive(Debug, Clone, Copy)]
pub struct FixedWidthMeasure {
    advance_ratio: f32,
}

impl FixedWidthMeasure {
    /// `advance_ratio` is the character advance as a fraction of the pixel font size.
    pub fn new(advance_ratio: f32) -> Self {
        Self { advance_ratio }
    }
}

impl Default for FixedWidthMeasure {
    fn default() -> Self {
        Self::new(0.55)
    }
}

impl TextMeasure for FixedWidthMeasure {
    fn measure(&self, text: &str, style: &TextStyle) -> Size {
        if text.is_empty() {
            return Size::default();
        }
        let lines: Vec<&str> = text.lines().collect();
        let widest = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        Size::new(
            widest as f32 * style.font_size_px() * self.advance_ratio,
            lines.len().max(1) as f32 * style.line_height(),
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_style_pixel_metrics() {
        let style = TextStyle::new("monospace", 10);
        assert_approx_eq!(f32, style.font_size_px(), 13.3);
        assert_approx_eq!(f32, style.line_height(), 13.3 * 1.15);
    }

    #[test]
    fn test_fixed_width_single_line() {
        let style = TextStyle::new("monospace", 10);
        let size = FixedWidthMeasure::new(0.5).measure("abcd", &style);
        assert_approx_eq!(f32, size.width(), 4.0 * 13.3 * 0.5, epsilon = 1e-4);
        assert_approx_eq!(f32, size.height(), style.line_height());
    }

    #[test]
    fn test_fixed_width_multiline_uses_widest_line() {
        let style = TextStyle::default();
        let measure = FixedWidthMeasure::default();
        let one = measure.measure("longest", &style);
        let two = measure.measure("a\nlongest", &style);
        assert_approx_eq!(f32, one.width(), two.width());
        assert_approx_eq!(f32, two.height(), 2.0 * style.line_height());
    }

    #[test]
    fn test_empty_text_is_zero() {
        let style = TextStyle::default();
        assert!(FixedWidthMeasure::default().measure("", &style).is_zero());
        assert!(ShapedTextMeasure.measure("", &style).is_zero());
    }

    #[test]
    fn test_shaped_measure_grows_with_text() {
        let style = TextStyle::default();
        let short = ShapedTextMeasure.measure("id", &style);
        let long = ShapedTextMeasure.measure("identifierWithManyCharacters", &style);
        assert!(long.width() > short.width());
        assert!(short.height() > 0.0);
    }
}
