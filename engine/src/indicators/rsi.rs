// Relative Strength Index (RSI) indicator implementation
use super::{ensure_finite, IndicatorCalculator, IndicatorOutput, Series};
use crate::error::{DataError, EngineResult};
use serde_json::Value;
use shared::models::{IndicatorField, IndicatorKind};

/// Wilder-smoothed RSI.
///
/// The first value is emitted at index `period` from plain averages of the first
/// `period` price changes; later values use `avg = (avg * (period - 1) + x) / period`.
/// Whenever the average loss is exactly zero the value is 100, including a perfectly
/// flat series. Periods below 2 yield an all-null series.
pub fn rsi(values: &[f64], period: usize) -> Result<Series, DataError> {
    ensure_finite(values)?;
    let mut results = vec![None; values.len()];
    if period < 2 || values.len() <= period {
        return Ok(results);
    }

    let mut gains = 0.0;
    let mut losses = 0.0;

    // Calculate initial average gain and loss
    for i in 1..=period {
        let change = values[i] - values[i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change; // losses are positive values
        }
    }

    let mut avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;
    results[period] = Some(strength_index(avg_gain, avg_loss));

    // Calculate subsequent RSI values
    for i in (period + 1)..values.len() {
        let change = values[i] - values[i - 1];
        let (current_gain, current_loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };

        avg_gain = (avg_gain * (period - 1) as f64 + current_gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + current_loss) / period as f64;
        results[i] = Some(strength_index(avg_gain, avg_loss));
    }
    Ok(results)
}

fn strength_index(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Rsi {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Rsi
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, closes: &[f64]) -> EngineResult<IndicatorOutput> {
        Ok(IndicatorOutput::Line {
            field: IndicatorField::Rsi,
            values: rsi(closes, self.period)?,
        })
    }
}
