//! Accumulated prediction points held by a client.

use crate::{PredictionPoint, Provider};
use strum::IntoEnumIterator;

/// Points for one provider, ready to plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSeries {
    /// Source of the points
    pub provider: Provider,
    /// `(rainfall, yield)` pairs in ascending rainfall order
    pub points: Vec<(f64, f64)>,
}

/// Axis ranges covering every plottable point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    /// Rainfall axis `[min, max]`
    pub rainfall: [f64; 2],
    /// Yield axis `[min, max]`
    pub yield_tons: [f64; 2],
}

/// Client-side prediction history.
///
/// Points are unique per `(rainfall, provider)`: recording a point whose key
/// already exists replaces the old one. The list stays sorted by ascending
/// rainfall. Nothing here is shared or persisted.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use rainyield_core::{PredictionHistory, PredictionPoint, Provider};
///
/// let mut history = PredictionHistory::new();
/// history.record(PredictionPoint::new(900.0, 3.1, Provider::OpenAi, Utc::now(), None));
/// history.record(PredictionPoint::new(400.0, 1.2, Provider::OpenAi, Utc::now(), None));
/// history.record(PredictionPoint::new(900.0, 3.3, Provider::OpenAi, Utc::now(), None));
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(*history.points()[0].rainfall(), 400.0);
/// assert_eq!(*history.points()[1].yield_tons(), 3.3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionHistory {
    points: Vec<PredictionPoint>,
}

impl PredictionHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a point, replacing any point with the same rainfall and provider.
    pub fn record(&mut self, point: PredictionPoint) {
        self.insert(point);
        self.sort();
    }

    /// Adds many points, with the same replacement rule as [`record`](Self::record).
    pub fn extend(&mut self, points: impl IntoIterator<Item = PredictionPoint>) {
        for point in points {
            self.insert(point);
        }
        self.sort();
    }

    fn insert(&mut self, point: PredictionPoint) {
        match self.points.iter_mut().find(|existing| {
            existing.provider() == point.provider()
                && same_rainfall(*existing.rainfall(), *point.rainfall())
        }) {
            Some(existing) => *existing = point,
            None => self.points.push(point),
        }
    }

    fn sort(&mut self) {
        self.points
            .sort_by(|a, b| a.rainfall().total_cmp(b.rainfall()));
    }

    /// All points in ascending rainfall order.
    pub fn points(&self) -> &[PredictionPoint] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drops every point.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Plottable points grouped by provider, skipping providers with none.
    pub fn series(&self) -> Vec<ProviderSeries> {
        Provider::iter()
            .filter_map(|provider| {
                let points: Vec<(f64, f64)> = self
                    .points
                    .iter()
                    .filter(|p| *p.provider() == provider && p.is_plottable())
                    .map(|p| (*p.rainfall(), *p.yield_tons()))
                    .collect();
                (!points.is_empty()).then_some(ProviderSeries { provider, points })
            })
            .collect()
    }

    /// Axis ranges over plottable points, or `None` when nothing is plottable.
    pub fn chart_bounds(&self) -> Option<ChartBounds> {
        let mut plottable = self.points.iter().filter(|p| p.is_plottable());
        let first = plottable.next()?;
        let init = ChartBounds {
            rainfall: [*first.rainfall(), *first.rainfall()],
            yield_tons: [*first.yield_tons(), *first.yield_tons()],
        };
        Some(plottable.fold(init, |acc, p| ChartBounds {
            rainfall: [
                acc.rainfall[0].min(*p.rainfall()),
                acc.rainfall[1].max(*p.rainfall()),
            ],
            yield_tons: [
                acc.yield_tons[0].min(*p.yield_tons()),
                acc.yield_tons[1].max(*p.yield_tons()),
            ],
        }))
    }
}

/// Rainfall equality for dedup. Unparsed (NaN) rainfalls match each other.
fn same_rainfall(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn point(rainfall: f64, yield_tons: f64, provider: Provider) -> PredictionPoint {
        PredictionPoint::new(rainfall, yield_tons, provider, Utc::now(), None)
    }

    #[test]
    fn test_same_rainfall_different_provider_kept() {
        let mut history = PredictionHistory::new();
        history.record(point(900.0, 3.1, Provider::OpenAi));
        history.record(point(900.0, 2.9, Provider::Anthropic));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_extend_sorts_and_dedups() {
        let mut history = PredictionHistory::new();
        history.extend(vec![
            point(1500.0, 3.4, Provider::Historical),
            point(800.0, 2.1, Provider::Historical),
            point(1500.0, 3.6, Provider::Historical),
        ]);
        let rainfalls: Vec<f64> = history.points().iter().map(|p| *p.rainfall()).collect();
        assert_eq!(rainfalls, vec![800.0, 1500.0]);
        assert_eq!(*history.points()[1].yield_tons(), 3.6);
    }

    #[test]
    fn test_unparsed_rainfall_rows_replace_each_other() {
        let mut history = PredictionHistory::new();
        let upload = || {
            vec![
                point(f64::NAN, 2.0, Provider::Historical),
                point(700.0, 2.5, Provider::Historical),
            ]
        };
        history.extend(upload());
        history.extend(upload());
        assert_eq!(history.len(), 2);

        history.record(point(0.0, 1.0, Provider::OpenAi));
        history.record(point(-0.0, 1.2, Provider::OpenAi));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_series_skips_unplottable_and_groups() {
        let mut history = PredictionHistory::new();
        history.extend(vec![
            point(800.0, 2.1, Provider::Historical),
            point(1000.0, f64::NAN, Provider::Historical),
            point(900.0, 3.0, Provider::Llama),
        ]);
        let series = history.series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].provider, Provider::Llama);
        assert_eq!(series[1].provider, Provider::Historical);
        assert_eq!(series[1].points, vec![(800.0, 2.1)]);
    }

    #[test]
    fn test_chart_bounds() {
        let mut history = PredictionHistory::new();
        assert_eq!(history.chart_bounds(), None);
        history.extend(vec![
            point(800.0, 2.1, Provider::Historical),
            point(1500.0, 3.4, Provider::Historical),
            point(1200.0, 4.0, Provider::Deepseek),
        ]);
        let bounds = history.chart_bounds().unwrap();
        assert_eq!(bounds.rainfall, [800.0, 1500.0]);
        assert_eq!(bounds.yield_tons, [2.1, 4.0]);
    }

    #[test]
    fn test_clear() {
        let mut history = PredictionHistory::new();
        history.record(point(1.0, 1.0, Provider::OpenAi));
        history.clear();
        assert!(history.is_empty());
    }
}
