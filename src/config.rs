// ============================================================================
// CONFIGURATION TYPES
// ============================================================================

use std::path::PathBuf;

use bon::Builder;

use crate::colormap::{Color, Gradient, VALUE_LIMIT};
use crate::interpolate::EdgeMode;
use crate::layout::{Layout, Margins};
use crate::renderer::CurveRenderer;

/// Everything that shapes the chart window; every field has a default.
#[derive(Debug, Clone, Builder)]
pub struct CurveConfig {
    #[builder(default = "Interactive Emotion Curve".to_string())]
    pub title: String,

    // Window configuration
    #[builder(default = 960)]
    pub window_width: usize,
    #[builder(default = 600)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Curve configuration
    #[builder(default = 231)]
    pub samples: usize,
    #[builder(default)]
    pub edge_mode: EdgeMode,
    #[builder(default = (-3.0, 3.0))]
    pub offset_range: (f64, f64),
    #[builder(default = 0.1)]
    pub offset_step: f64,
    #[builder(default = 0.6)]
    pub max_fill_alpha: f64,
    #[builder(default = 2.5)]
    pub line_thickness: f32,

    // Chrome
    #[builder(default = 4.0)]
    pub marker_radius: f32,
    #[builder(default = 7.0)]
    pub active_marker_radius: f32,
    #[builder(default = true)]
    pub show_control_points: bool,
    #[builder(default = 2)]
    pub tick_every_hours: usize,
    #[builder(default = vec![(-2.0, "Sad".to_string()), (0.0, "Neutral".to_string()), (2.0, "Happy".to_string())])]
    pub mood_ticks: Vec<(f64, String)>,
    #[builder(default = 24)]
    pub icon_size: u32,

    // Font configuration
    pub font_path: Option<PathBuf>,
    #[builder(default = 22.0)]
    pub title_font_size: f32,
    #[builder(default = 15.0)]
    pub tick_font_size: f32,
    #[builder(default = 14.0)]
    pub label_font_size: f32,

    // Colors
    #[builder(default = Color::new(0xff, 0xff, 0xff))]
    pub background_color: Color,
    #[builder(default = Color::new(0xd3, 0xd3, 0xd3))]
    pub baseline_color: Color,
    #[builder(default = Color::new(0x33, 0x33, 0x33))]
    pub text_color: Color,
    #[builder(default = Color::new(0x4a, 0x90, 0xe2))]
    pub slider_color: Color,
    #[builder(default = Color::new(0xe0, 0x6c, 0x2b))]
    pub label_color: Color,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CurveConfig {
    /// The value range is fixed, so every config shares one gradient.
    pub fn gradient(&self) -> Gradient {
        Gradient::default()
    }

    pub fn renderer(&self) -> CurveRenderer {
        CurveRenderer::new(self.samples, self.edge_mode, self.gradient(), self.max_fill_alpha)
    }

    pub fn layout(&self, width: usize, height: usize) -> Layout {
        Layout::new(width, height, Margins::default(), VALUE_LIMIT, self.offset_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = CurveConfig::default();
        assert_eq!(config.samples, 231);
        assert_eq!(config.edge_mode, EdgeMode::Pinned);
        assert_eq!(config.mood_ticks.len(), 3);
        assert!(config.font_path.is_none());
    }

    #[test]
    fn builder_overrides() {
        let config = CurveConfig::builder()
            .title("Monday".to_string())
            .samples(500)
            .edge_mode(EdgeMode::ThreePoint)
            .font_path(PathBuf::from("font.ttf"))
            .build();
        assert_eq!(config.title, "Monday");
        assert_eq!(config.samples, 500);
        assert_eq!(config.font_path, Some(PathBuf::from("font.ttf")));
        assert_eq!(config.gradient().limit, 3.0);
    }

    #[test]
    fn value_range_is_fixed() {
        let config = CurveConfig::default();
        let layout = config.layout(960, 600);
        assert_eq!(layout.plot.y_range, (-VALUE_LIMIT, VALUE_LIMIT));
        assert_eq!(config.gradient().limit, VALUE_LIMIT);
    }
}
