// Technical indicators module
//
// Every routine maps a close-price series of length n to nullable series of length n.
// Entries inside the warm-up period are `None`; a non-finite input aborts the routine
// with `DataError::NonFinite`.
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod window;

pub use bollinger::{bollinger, BollingerBands, BollingerOutput};
pub use ema::{ema, Ema};
pub use macd::{macd, Macd, MacdOutput};
pub use rsi::{rsi, Rsi};
pub use sma::{sma, Sma};

use crate::error::{DataError, EngineResult};
use serde_json::Value;
use shared::models::{IndicatorConfig, IndicatorField, IndicatorKind};

/// Nullable output series, index-aligned with the input.
pub type Series = Vec<Option<f64>>;

/// What a calculator produced, column by column.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorOutput {
    Line { field: IndicatorField, values: Series },
    Macd(MacdOutput),
    Bands(BollingerOutput),
}

impl IndicatorOutput {
    /// Columns to write onto enriched bars, in field order.
    pub fn columns(&self) -> Vec<(IndicatorField, &[Option<f64>])> {
        match self {
            IndicatorOutput::Line { field, values } => vec![(*field, values.as_slice())],
            IndicatorOutput::Macd(out) => vec![
                (IndicatorField::Macd, out.macd.as_slice()),
                (IndicatorField::MacdSignal, out.signal.as_slice()),
                (IndicatorField::MacdHist, out.histogram.as_slice()),
            ],
            IndicatorOutput::Bands(out) => vec![
                (IndicatorField::BbUpper, out.upper.as_slice()),
                (IndicatorField::BbLower, out.lower.as_slice()),
            ],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            IndicatorOutput::Line { values, .. } => values.len(),
            IndicatorOutput::Macd(out) => out.macd.len(),
            IndicatorOutput::Bands(out) => out.upper.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First computed value that overflowed to infinity or NaN, if any.
    pub fn first_non_finite(&self) -> Option<(IndicatorField, usize)> {
        self.columns().into_iter().find_map(|(field, values)| {
            values
                .iter()
                .position(|v| matches!(v, Some(x) if !x.is_finite()))
                .map(|index| (field, index))
        })
    }
}

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn kind(&self) -> IndicatorKind;
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, closes: &[f64]) -> EngineResult<IndicatorOutput>;
}

/// Builds the calculator for `kind` from the parameters in `config`.
/// Does not validate; see `pipeline::validate`.
pub fn calculator_for(kind: IndicatorKind, config: &IndicatorConfig) -> Box<dyn IndicatorCalculator> {
    match kind {
        IndicatorKind::Sma => Box::new(Sma::new(config.sma.period)),
        IndicatorKind::Ema => Box::new(Ema::new(config.ema.period)),
        IndicatorKind::Rsi => Box::new(Rsi::new(config.rsi.period)),
        IndicatorKind::Macd => Box::new(Macd::new(config.macd.fast, config.macd.slow, config.macd.signal)),
        IndicatorKind::Bb => Box::new(BollingerBands::new(config.bb.period, config.bb.std_dev)),
    }
}

/// Fails on the first NaN or infinite value.
pub(crate) fn ensure_finite(values: &[f64]) -> Result<(), DataError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(DataError::NonFinite { index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_finite_reports_first_bad_index() {
        assert!(ensure_finite(&[1.0, 2.0]).is_ok());
        assert_eq!(
            ensure_finite(&[1.0, f64::NAN, f64::INFINITY]),
            Err(DataError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn test_calculator_for_uses_config_parameters() {
        let config = IndicatorConfig::default();
        let macd = calculator_for(IndicatorKind::Macd, &config);
        assert_eq!(macd.name(), "MACD(12,26,9)");
        assert_eq!(macd.parameters()["slow"], 26);
        let bb = calculator_for(IndicatorKind::Bb, &config);
        assert_eq!(bb.kind(), IndicatorKind::Bb);
        assert_eq!(bb.parameters()["stdDev"], 2.0);
    }

    #[test]
    fn test_output_columns_follow_field_order() {
        let out = IndicatorOutput::Macd(MacdOutput {
            macd: vec![None],
            signal: vec![None],
            histogram: vec![None],
        });
        let fields: Vec<IndicatorField> = out.columns().into_iter().map(|(f, _)| f).collect();
        assert_eq!(
            fields,
            vec![IndicatorField::Macd, IndicatorField::MacdSignal, IndicatorField::MacdHist]
        );
        assert_eq!(out.len(), 1);
    }
}
