// ============================================================================
// PLOT GEOMETRY
// ============================================================================

use crate::colormap::sanitize_limit;
use crate::series::{TimeSeries, HOURS};

/// Space reserved around the plot for ticks, title and the offset slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 90.0,
            right: 90.0,
            top: 60.0,
            bottom: 60.0,
        }
    }
}

/// Pixel rectangle of the chart and its data ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl PlotArea {
    pub fn new(width: usize, height: usize, margins: Margins, value_limit: f64) -> Self {
        let value_limit = sanitize_limit(value_limit);
        let left = margins.left.min(width as f64 / 2.0 - 1.0).max(0.0);
        let top = margins.top.min(height as f64 / 2.0 - 1.0).max(0.0);
        let right = (width as f64 - margins.right).max(left + 1.0);
        let bottom = (height as f64 - margins.bottom).max(top + 1.0);
        Self {
            left,
            top,
            right,
            bottom,
            x_range: (-0.5, HOURS as f64 - 0.5),
            y_range: (-value_limit, value_limit),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        (self.left..=self.right).contains(&px) && (self.top..=self.bottom).contains(&py)
    }

    pub fn x_to_pixel(&self, x: f64) -> f64 {
        self.left + (x - self.x_range.0) / (self.x_range.1 - self.x_range.0) * self.width()
    }

    /// Values beyond the y range are pinned to the plot edge.
    pub fn y_to_pixel(&self, y: f64) -> f64 {
        let y = y.clamp(self.y_range.0, self.y_range.1);
        self.bottom - (y - self.y_range.0) / (self.y_range.1 - self.y_range.0) * self.height()
    }

    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (self.x_to_pixel(x), self.y_to_pixel(y))
    }

    /// Data coordinates under a pixel, `None` outside the plot.
    pub fn to_data(&self, px: f64, py: f64) -> Option<(f64, f64)> {
        if !self.contains(px, py) {
            return None;
        }
        let x = self.x_range.0 + (px - self.left) / self.width() * (self.x_range.1 - self.x_range.0);
        let y = self.y_range.0 + (self.bottom - py) / self.height() * (self.y_range.1 - self.y_range.0);
        Some((x, y))
    }

    pub fn hour_at(&self, px: f64, py: f64) -> Option<usize> {
        self.to_data(px, py)
            .and_then(|(x, _)| TimeSeries::nearest_hour(x))
    }
}

// ============================================================================
// OFFSET SLIDER
// ============================================================================

/// Vertical slider controlling the view offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    pub x: f64,
    pub top: f64,
    pub bottom: f64,
    pub range: (f64, f64),
    pub grab_radius: f64,
}

impl Slider {
    pub fn hit(&self, px: f64, py: f64) -> bool {
        (px - self.x).abs() <= self.grab_radius
            && py >= self.top - self.grab_radius
            && py <= self.bottom + self.grab_radius
    }

    /// Offset for a pointer height; the top of the track is the maximum.
    pub fn value_at(&self, py: f64) -> f64 {
        let t = ((self.bottom - py) / (self.bottom - self.top)).clamp(0.0, 1.0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    pub fn pixel_for(&self, value: f64) -> f64 {
        let t = ((value - self.range.0) / (self.range.1 - self.range.0)).clamp(0.0, 1.0);
        self.bottom - t * (self.bottom - self.top)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: usize,
    pub height: usize,
    pub plot: PlotArea,
    pub slider: Slider,
}

impl Layout {
    pub fn new(
        width: usize,
        height: usize,
        margins: Margins,
        value_limit: f64,
        offset_range: (f64, f64),
    ) -> Self {
        let plot = PlotArea::new(width, height, margins, value_limit);
        let slider = Slider {
            x: (plot.right + margins.right / 2.0).min(width as f64 - 1.0),
            top: plot.top,
            bottom: plot.bottom,
            range: offset_range,
            grab_radius: 14.0,
        };
        Self {
            width,
            height,
            plot,
            slider,
        }
    }
}
