//! Label measurement for railroad boxes.

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use trestle_core::geometry::Size;

use crate::config::TextMeasure;

/// Convert font size from points to pixels (roughly 1.33x multiplier for standard DPI)
const POINTS_TO_PIXELS: f32 = 1.33;
const LINE_HEIGHT_FACTOR: f32 = 1.15;
/// Advance of one character relative to the font size, for monospace estimates.
const ESTIMATED_ADVANCE: f32 = 0.6;

/// Measures label text with a fixed font.
#[derive(Debug, Clone)]
pub(super) struct TextMetrics {
    measure: TextMeasure,
    font_family: String,
    font_size: u16,
}

impl TextMetrics {
    pub(super) fn new(measure: TextMeasure, font_family: &str, font_size: u16) -> Self {
        Self {
            measure,
            font_family: font_family.to_string(),
            font_size,
        }
    }

    fn font_size_px(&self) -> f32 {
        f32::from(self.font_size) * POINTS_TO_PIXELS
    }

    /// Size of `text` on a single line, without padding.
    pub(super) fn label_size(&self, text: &str) -> Size {
        if text.is_empty() {
            return Size::default();
        }
        match self.measure {
            TextMeasure::Estimate => self.estimate(text),
            TextMeasure::Shaped => TEXT_MANAGER
                .get_or_init(TextManager::new)
                .calculate_text_size(text, &self.font_family, self.font_size_px())
                .unwrap_or_else(|| self.estimate(text)),
        }
    }

    fn estimate(&self, text: &str) -> Size {
        let font_size_px = self.font_size_px();
        Size::new(
            text.chars().count() as f32 * font_size_px * ESTIMATED_ADVANCE,
            font_size_px * LINE_HEIGHT_FACTOR,
        )
    }
}

/// TextManager handles text measurement and font operations
/// It maintains a reusable FontSystem instance to avoid expensive recreation
struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Shapes `text` and returns its rendered size, or `None` when no font
    /// produced any layout run.
    fn calculate_text_size(&self, text: &str, font_family: &str, font_size_px: f32) -> Option<Size> {
        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let metrics = Metrics::new(font_size_px, font_size_px * LINE_HEIGHT_FACTOR);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(font_family));

        // Unlimited size lets the label flow on one line
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
        }

        (max_width > 0.0).then(|| Size::new(max_width, total_height))
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_estimate_scales_with_length() {
        let metrics = TextMetrics::new(TextMeasure::Estimate, "monospace", 10);

        let short = metrics.label_size("ab");
        let long = metrics.label_size("abcd");

        assert_approx_eq!(f32, long.width(), short.width() * 2.0);
        assert_approx_eq!(f32, long.height(), short.height());
        assert_approx_eq!(f32, short.width(), 2.0 * 10.0 * 1.33 * 0.6, epsilon = 0.001);
    }

    #[test]
    fn test_empty_label_has_no_size() {
        let metrics = TextMetrics::new(TextMeasure::Estimate, "monospace", 10);
        let size = metrics.label_size("");
        assert_approx_eq!(f32, size.width(), 0.0);
        assert_approx_eq!(f32, size.height(), 0.0);
    }

    #[test]
    fn test_shaped_label_is_positive() {
        let metrics = TextMetrics::new(TextMeasure::Shaped, "monospace", 14);
        let size = metrics.label_size("identifier");
        assert!(size.width() > 0.0);
        assert!(size.height() > 0.0);
    }
}
