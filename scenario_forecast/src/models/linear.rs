//! Linear trend model

use crate::data::HistoricalSeries;
use crate::error::Result;
use crate::models::{clamp_confidence, validate_input, ForecastModel, ModelKind, ModelOutput};
use forecast_math::linear_regression;
use rand::RngCore;

/// Least-squares line extrapolated past the last observation
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrend;

impl ForecastModel for LinearTrend {
    fn kind(&self) -> ModelKind {
        ModelKind::Linear
    }

    fn forecast(
        &self,
        history: &HistoricalSeries,
        periods: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<ModelOutput> {
        let y = validate_input(history, periods)?;
        let n = y.len();
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();

        let (slope, intercept) = linear_regression(&x, &y)?;

        let values = (0..periods)
            .map(|i| (slope * (n + i) as f64 + intercept).max(0.0))
            .collect();

        // Confidence from the fit residuals relative to the mean level
        let mse = x
            .iter()
            .zip(&y)
            .map(|(&xi, &yi)| (yi - (slope * xi + intercept)).powi(2))
            .sum::<f64>()
            / n as f64;
        let mean = y.iter().sum::<f64>() / n as f64;
        let confidence = if mean > 0.0 {
            clamp_confidence(1.0 - mse.sqrt() / mean, 0.5, 0.95)
        } else {
            0.5
        };

        Ok(ModelOutput::new(values, confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_perfect_line_extrapolates_exactly() {
        let history = HistoricalSeries::from_values(&[100.0, 200.0, 300.0, 400.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let output = LinearTrend.forecast(&history, 3, &mut rng).unwrap();

        assert_abs_diff_eq!(output.values[0], 500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(output.values[1], 600.0, epsilon = 1e-9);
        assert_abs_diff_eq!(output.values[2], 700.0, epsilon = 1e-9);
        assert_abs_diff_eq!(output.confidence, 0.95, epsilon = 1e-12);
    }

    #[test]
    fn test_declining_line_is_floored_at_zero() {
        let history = HistoricalSeries::from_values(&[30.0, 20.0, 10.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let output = LinearTrend.forecast(&history, 3, &mut rng).unwrap();
        assert_abs_diff_eq!(output.values[0], 0.0, epsilon = 1e-9);
        assert_eq!(output.values[1], 0.0);
        assert_eq!(output.values[2], 0.0);
    }

    #[test]
    fn test_noisy_history_lowers_confidence() {
        let history = HistoricalSeries::from_values(&[10.0, 40.0, 5.0, 50.0, 8.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let output = LinearTrend.forecast(&history, 2, &mut rng).unwrap();
        assert_eq!(output.confidence, 0.5);
    }

    #[test]
    fn test_all_zero_history() {
        let history = HistoricalSeries::from_values(&[0.0, 0.0, 0.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let output = LinearTrend.forecast(&history, 2, &mut rng).unwrap();
        assert_eq!(output.values, vec![0.0, 0.0]);
        assert_eq!(output.confidence, 0.5);
    }
}
