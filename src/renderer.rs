// ============================================================================
// CURVE RENDERER
// ============================================================================

use crate::colormap::{Color, Gradient};
use crate::interpolate::{EdgeMode, Pchip};
use crate::series::TimeSeries;

/// One point of the dense curve with its line color and fill alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub x: f64,
    pub value: f64,
    pub color: Color,
    /// Opacity of the fill between this sample and the baseline.
    pub fill_alpha: f64,
}

/// Output of one render pass, ready to be rasterized.
#[derive(Debug, Clone)]
pub struct CurveFrame {
    pub samples: Vec<CurveSample>,
    /// All displayed values are zero: draw a plain gray line and no fill.
    pub flat: bool,
    interpolant: Pchip,
}

impl CurveFrame {
    /// Interpolated value at an arbitrary hour.
    pub fn value_at(&self, x: f64) -> f64 {
        self.interpolant.evaluate(x)
    }

    pub fn sample_at(&self, x: f64) -> Option<&CurveSample> {
        self.samples.iter().find(|s| s.x == x)
    }

    pub fn has_fill(&self) -> bool {
        !self.flat && self.samples.iter().any(|s| s.fill_alpha > 0.0)
    }
}

// ============================================================================
// RENDER PASS
// ============================================================================

/// Turns 24 hourly amplitudes into a smooth, colored curve.
#[derive(Debug, Clone)]
pub struct CurveRenderer {
    samples: usize,
    edge: EdgeMode,
    gradient: Gradient,
    max_fill_alpha: f64,
}

impl Default for CurveRenderer {
    fn default() -> Self {
        Self::new(231, EdgeMode::Pinned, Gradient::default(), 0.6)
    }
}

impl CurveRenderer {
    pub fn new(samples: usize, edge: EdgeMode, gradient: Gradient, max_fill_alpha: f64) -> Self {
        Self {
            samples: samples.max(2),
            edge,
            gradient,
            max_fill_alpha: max_fill_alpha.clamp(0.0, 1.0),
        }
    }

    pub fn render(&self, series: &TimeSeries, offset: f64) -> CurveFrame {
        let values = series.shifted(offset);
        let interpolant = Pchip::new(&TimeSeries::hours(), &values, self.edge);
        let flat = values.iter().all(|v| *v == 0.0);

        let samples = interpolant
            .sample(self.samples)
            .into_iter()
            .map(|(x, value)| {
                if flat {
                    CurveSample {
                        x,
                        value,
                        color: self.gradient.neutral,
                        fill_alpha: 0.0,
                    }
                } else {
                    CurveSample {
                        x,
                        value,
                        color: self.gradient.color(value),
                        fill_alpha: self.max_fill_alpha * self.gradient.magnitude(value),
                    }
                }
            })
            .collect();

        CurveFrame {
            samples,
            flat,
            interpolant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_is_flat_gray_without_fill() {
        let frame = CurveRenderer::default().render(&TimeSeries::default(), 0.0);
        assert!(frame.flat);
        assert!(!frame.has_fill());
        assert!(frame.samples.iter().all(|s| s.color == Color::GRAY));
    }

    #[test]
    fn single_peak_is_green_and_filled() {
        let mut series = TimeSeries::default();
        series.set(12, 2.0).unwrap();
        let frame = CurveRenderer::default().render(&series, 0.0);

        assert!(!frame.flat);
        let peak = frame.sample_at(12.0).expect("hour 12 is sampled");
        assert_eq!(peak.value, 2.0);
        assert!(peak.color.g > Color::GRAY.g);
        assert!(peak.color.b < Color::GRAY.b);
        assert!((peak.fill_alpha - 0.6 * 2.0 / 3.0).abs() < 1e-12);

        let shoulder = frame.sample_at(11.5).unwrap();
        assert!(shoulder.fill_alpha > 0.0 && shoulder.fill_alpha < peak.fill_alpha);
        assert_eq!(frame.sample_at(3.0).unwrap().fill_alpha, 0.0);
    }

    #[test]
    fn offset_shifts_without_touching_series() {
        let series = TimeSeries::default();
        let frame = CurveRenderer::default().render(&series, -1.0);
        assert!(!frame.flat);
        assert!(frame.samples.iter().all(|s| (s.value + 1.0).abs() < 1e-12));
        assert!(frame.samples.iter().all(|s| s.color.b > s.color.g));
        assert_eq!(series, TimeSeries::default());
    }

    #[test]
    fn sample_count_is_respected() {
        let renderer = CurveRenderer::new(200, EdgeMode::Pinned, Gradient::default(), 0.6);
        let frame = renderer.render(&TimeSeries::default(), 0.0);
        assert_eq!(frame.samples.len(), 200);
        assert_eq!(frame.samples.first().unwrap().x, 0.0);
        assert_eq!(frame.samples.last().unwrap().x, 23.0);
    }
}
