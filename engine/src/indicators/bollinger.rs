// Bollinger Bands indicator implementation
//
// Middle = rolling mean over `period`
// Upper  = middle + std_dev * sd
// Lower  = middle - std_dev * sd
// where sd is the population standard deviation of the window.
use super::window::RollingWindow;
use super::{ensure_finite, IndicatorCalculator, IndicatorOutput, Series};
use crate::error::{DataError, EngineResult};
use serde_json::Value;
use shared::models::IndicatorKind;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerOutput {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

/// Periods below 2 yield all-null bands.
pub fn bollinger(values: &[f64], period: usize, std_dev: f64) -> Result<BollingerOutput, DataError> {
    ensure_finite(values)?;
    let n = values.len();
    let mut out = BollingerOutput {
        upper: vec![None; n],
        middle: vec![None; n],
        lower: vec![None; n],
    };
    if period < 2 {
        return Ok(out);
    }

    let mut window = RollingWindow::new(period);
    for (i, &value) in values.iter().enumerate() {
        window.push(value);
        if !window.is_full() {
            continue;
        }
        if let (Some(mean), Some(variance)) = (window.mean(), window.population_variance()) {
            let width = std_dev * variance.sqrt();
            out.upper[i] = Some(mean + width);
            out.middle[i] = Some(mean);
            out.lower[i] = Some(mean - width);
        }
    }
    Ok(out)
}

pub struct BollingerBands {
    name: String,
    period: usize,
    std_dev: f64,
}

impl BollingerBands {
    pub fn new(period: usize, std_dev: f64) -> Self {
        Self {
            name: format!("BB({},{})", period, std_dev),
            period,
            std_dev,
        }
    }
}

impl IndicatorCalculator for BollingerBands {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Bb
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period, "stdDev": self.std_dev })
    }

    fn calculate(&self, closes: &[f64]) -> EngineResult<IndicatorOutput> {
        Ok(IndicatorOutput::Bands(bollinger(closes, self.period, self.std_dev)?))
    }
}
