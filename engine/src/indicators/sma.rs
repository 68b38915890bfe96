// Simple Moving Average (SMA) indicator implementation
use super::window::RollingWindow;
use super::{ensure_finite, IndicatorCalculator, IndicatorOutput, Series};
use crate::error::{DataError, EngineResult};
use serde_json::Value;
use shared::models::{IndicatorField, IndicatorKind};

/// Rolling arithmetic mean over the trailing `period` values.
///
/// The first value lands at index `period - 1`. A `period` of 0 yields an all-null series.
pub fn sma(values: &[f64], period: usize) -> Result<Series, DataError> {
    ensure_finite(values)?;
    let mut results = vec![None; values.len()];
    if period == 0 {
        return Ok(results);
    }

    let mut window = RollingWindow::new(period);
    for (i, &value) in values.iter().enumerate() {
        window.push(value);
        if window.is_full() {
            results[i] = Some(window.sum() / period as f64);
        }
    }
    Ok(results)
}

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Sma
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, closes: &[f64]) -> EngineResult<IndicatorOutput> {
        Ok(IndicatorOutput::Line {
            field: IndicatorField::Sma,
            values: sma(closes, self.period)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_series_eq(actual: &[Option<f64>], expected: &[Option<f64>]) {
        assert_eq!(actual.len(), expected.len(), "Series differ in length");
        for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            match (a, e) {
                (None, None) => {}
                (Some(a), Some(e)) => {
                    assert!((a - e).abs() < 1e-9, "Mismatch at index {}: {} != {}", i, a, e)
                }
                _ => panic!("Mismatch at index {}: {:?} != {:?}", i, a, e),
            }
        }
    }

    #[test]
    fn test_sma_calculation() {
        let results = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        // expected: -, -, (1+2+3)/3=2.0, (2+3+4)/3=3.0, (3+4+5)/3=4.0
        assert_series_eq(&results, &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_sma_one_to_ten_period_three() {
        let closes: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        let results = sma(&closes, 3).unwrap();
        assert_eq!(results[0], None);
        assert_eq!(results[1], None);
        assert_eq!(results[2], Some(2.0));
        assert_eq!(results[9], Some(9.0));
        // Each value is the middle of its 3-wide window.
        for i in 2..10 {
            assert_eq!(results[i], Some(closes[i - 1]));
        }
    }

    #[test]
    fn test_sma_insufficient_data() {
        let results = sma(&[1.0, 2.0], 3).unwrap();
        assert_series_eq(&results, &[None, None]);
    }

    #[test]
    fn test_sma_period_one() {
        // SMA(1) is just the close price
        let results = sma(&[1.0, 2.0, 3.0], 1).unwrap();
        assert_series_eq(&results, &[Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_sma_empty_data() {
        assert!(sma(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn test_sma_period_zero_is_all_null() {
        assert_eq!(sma(&[1.0, 2.0, 3.0], 0).unwrap(), vec![None, None, None]);
    }

    #[test]
    fn test_sma_rejects_nan() {
        assert_eq!(
            sma(&[1.0, 2.0, f64::NAN, 4.0], 2),
            Err(DataError::NonFinite { index: 2 })
        );
    }

    #[test]
    fn test_sma_calculator() {
        let calc = Sma::new(2);
        assert_eq!(calc.name(), "SMA(2)");
        assert_eq!(calc.parameters(), serde_json::json!({ "period": 2 }));
        match calc.calculate(&[2.0, 4.0]).unwrap() {
            IndicatorOutput::Line { field, values } => {
                assert_eq!(field, IndicatorField::Sma);
                assert_eq!(values, vec![None, Some(3.0)]);
            }
            other => panic!("unexpected output {:?}", other),
        }
    }
}
