// ============================================================================
// HOURLY TIME SERIES
// ============================================================================

use crate::error::{CurveError, Result};

/// Number of control points, one per hour of the day.
pub const HOURS: usize = 24;

/// Hourly amplitudes. Hours are implicit in the index and never change.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    amplitudes: [f64; HOURS],
}

impl Default for TimeSeries {
    fn default() -> Self {
        Self {
            amplitudes: [0.0; HOURS],
        }
    }
}

impl TimeSeries {
    /// Every amplitude must be finite.
    pub fn new(amplitudes: [f64; HOURS]) -> Result<Self> {
        if let Some((hour, value)) = amplitudes.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(CurveError::NonFiniteAmplitude { hour, value: *value });
        }
        Ok(Self { amplitudes })
    }

    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let amplitudes: [f64; HOURS] = values
            .try_into()
            .map_err(|_| CurveError::SeriesLength(values.len()))?;
        Self::new(amplitudes)
    }

    /// Parses a comma separated list such as `0,0,1.5,...`.
    pub fn parse(list: &str) -> Result<Self> {
        let values = list
            .split(',')
            .map(|item| {
                item.trim()
                    .parse::<f64>()
                    .map_err(|e| CurveError::InvalidAmplitudes(format!("{item:?}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(CurveError::InvalidAmplitudes(format!("{bad} is not finite")));
        }
        Self::from_slice(&values)
    }

    pub fn hours() -> [f64; HOURS] {
        std::array::from_fn(|hour| hour as f64)
    }

    pub fn amplitudes(&self) -> &[f64; HOURS] {
        &self.amplitudes
    }

    pub fn get(&self, hour: usize) -> Option<f64> {
        self.amplitudes.get(hour).copied()
    }

    pub fn set(&mut self, hour: usize, amplitude: f64) -> Result<()> {
        let slot = self
            .amplitudes
            .get_mut(hour)
            .ok_or(CurveError::HourOutOfRange(hour))?;
        if !amplitude.is_finite() {
            return Err(CurveError::NonFiniteAmplitude {
                hour,
                value: amplitude,
            });
        }
        *slot = amplitude;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.amplitudes = [0.0; HOURS];
    }

    /// Amplitudes as displayed, i.e. shifted by `offset`.
    pub fn shifted(&self, offset: f64) -> [f64; HOURS] {
        self.amplitudes.map(|a| a + offset)
    }

    /// Index of the hour closest to `x`, lowest index on ties.
    pub fn nearest_hour(x: f64) -> Option<usize> {
        if !x.is_finite() {
            return None;
        }
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for hour in 0..HOURS {
            let dist = (hour as f64 - x).abs();
            if dist < best_dist {
                best = hour;
                best_dist = dist;
            }
        }
        Some(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_rejects_wrong_length() {
        let err = TimeSeries::from_slice(&[1.0; 23]).unwrap_err();
        assert!(matches!(err, CurveError::SeriesLength(23)));
    }

    #[test]
    fn set_out_of_range_hour_fails() {
        let mut series = TimeSeries::default();
        assert!(matches!(
            series.set(24, 1.0),
            Err(CurveError::HourOutOfRange(24))
        ));
        series.set(23, 1.5).unwrap();
        assert_eq!(series.get(23), Some(1.5));
    }

    #[test]
    fn non_finite_amplitudes_are_rejected() {
        let mut series = TimeSeries::default();
        series.set(5, 1.0).unwrap();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                series.set(5, bad),
                Err(CurveError::NonFiniteAmplitude { hour: 5, .. })
            ));
        }
        assert_eq!(series.get(5), Some(1.0));

        let mut values = [0.0; HOURS];
        values[9] = f64::NAN;
        assert!(matches!(
            TimeSeries::new(values),
            Err(CurveError::NonFiniteAmplitude { hour: 9, .. })
        ));
        assert!(TimeSeries::from_slice(&values).is_err());
    }

    #[test]
    fn parse_comma_list() {
        let list = (0..24).map(|h| h.to_string()).collect::<Vec<_>>().join(", ");
        let series = TimeSeries::parse(&list).unwrap();
        assert_eq!(series.get(7), Some(7.0));
        assert!(TimeSeries::parse("1,2,x").is_err());
        assert!(TimeSeries::parse("1,2,3").is_err());
    }

    #[test]
    fn shifted_leaves_amplitudes_untouched() {
        let mut series = TimeSeries::default();
        series.set(3, 1.0).unwrap();
        let shifted = series.shifted(0.5);
        assert_eq!(shifted[3], 1.5);
        assert_eq!(shifted[0], 0.5);
        assert_eq!(series.get(3), Some(1.0));
    }

    #[test]
    fn nearest_hour_prefers_lowest_on_tie() {
        assert_eq!(TimeSeries::nearest_hour(4.5), Some(4));
        assert_eq!(TimeSeries::nearest_hour(4.51), Some(5));
        assert_eq!(TimeSeries::nearest_hour(-3.0), Some(0));
        assert_eq!(TimeSeries::nearest_hour(40.0), Some(23));
        assert_eq!(TimeSeries::nearest_hour(f64::NAN), None);
    }
}
