// Exponential Moving Average (EMA) indicator implementation
use super::{ensure_finite, IndicatorCalculator, IndicatorOutput, Series};
use crate::error::{DataError, EngineResult};
use serde_json::Value;
use shared::models::{IndicatorField, IndicatorKind};

/// EMA with smoothing constant `k = 2 / (period + 1)`.
///
/// Seeded at index `period - 1` with the mean of the first `period` values, then
/// `ema[i] = close[i] * k + ema[i - 1] * (1 - k)`. A `period` of 0 yields an all-null series.
pub fn ema(values: &[f64], period: usize) -> Result<Series, DataError> {
    ensure_finite(values)?;
    Ok(ema_unchecked(values, period))
}

// Callers must have checked `values` for non-finite entries.
pub(crate) fn ema_unchecked(values: &[f64], period: usize) -> Series {
    let mut results = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return results;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    results[period - 1] = Some(seed);

    let mut previous = seed;
    for (i, &close) in values.iter().enumerate().skip(period) {
        let current = close * k + previous * (1.0 - k);
        results[i] = Some(current);
        previous = current;
    }
    results
}

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("EMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Ema
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, closes: &[f64]) -> EngineResult<IndicatorOutput> {
        Ok(IndicatorOutput::Line {
            field: IndicatorField::Ema,
            values: ema(closes, self.period)?,
        })
    }
}
