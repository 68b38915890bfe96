// Moving Average Convergence/Divergence (MACD) indicator implementation
//
// MACD line   = EMA(fast) - EMA(slow), where both are defined
// Signal line = EMA(signal) of the MACD line
// Histogram   = MACD line - signal line, where both are defined
//
// The signal EMA is seeded from the first `signal` *defined* MACD values only; the
// undefined warm-up of the MACD line is skipped, never fed in as zeros. The first
// signal value therefore sits `signal - 1` bars after the first MACD value.
use super::ema::ema_unchecked;
use super::{ensure_finite, IndicatorCalculator, IndicatorOutput, Series};
use crate::error::{DataError, EngineResult};
use serde_json::Value;
use shared::models::IndicatorKind;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> Result<MacdOutput, DataError> {
    ensure_finite(values)?;
    let n = values.len();

    let fast_ema = ema_unchecked(values, fast);
    let slow_ema = ema_unchecked(values, slow);
    let macd_line: Series = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let mut signal_line = vec![None; n];
    // Both EMAs are contiguous once defined, so the MACD line is too.
    if let Some(first) = macd_line.iter().position(Option::is_some) {
        let defined: Vec<f64> = macd_line[first..].iter().flatten().copied().collect();
        for (offset, value) in ema_unchecked(&defined, signal).into_iter().enumerate() {
            signal_line[first + offset] = value;
        }
    }

    let histogram = macd_line
        .iter()
        .zip(signal_line.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    Ok(MacdOutput {
        macd: macd_line,
        signal: signal_line,
        histogram,
    })
}

pub struct Macd {
    name: String,
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            name: format!("MACD({},{},{})", fast, slow, signal),
            fast,
            slow,
            signal,
        }
    }
}

impl IndicatorCalculator for Macd {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Macd
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "fast": self.fast, "slow": self.slow, "signal": self.signal })
    }

    fn calculate(&self, closes: &[f64]) -> EngineResult<IndicatorOutput> {
        Ok(IndicatorOutput::Macd(macd(closes, self.fast, self.slow, self.signal)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::ema::ema;

    fn zigzag(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 50.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn test_macd_warm_up_boundaries() {
        let closes = zigzag(40);
        let out = macd(&closes, 3, 6, 4).unwrap();
        assert_eq!(out.macd.len(), 40);
        // MACD defined from slow - 1 = 5.
        assert!(out.macd[4].is_none());
        assert!(out.macd[5].is_some());
        // Signal defined from 5 + 4 - 1 = 8.
        assert!(out.signal[7].is_none());
        assert!(out.signal[8].is_some());
        assert!(out.histogram[7].is_none());
        assert!(out.histogram[8].is_some());
    }

    #[test]
    fn test_macd_line_is_difference_of_emas() {
        let closes = zigzag(30);
        let out = macd(&closes, 4, 9, 3).unwrap();
        let fast = ema(&closes, 4).unwrap();
        let slow = ema(&closes, 9).unwrap();
        for i in 8..30 {
            assert_eq!(out.macd[i], Some(fast[i].unwrap() - slow[i].unwrap()));
        }
    }

    #[test]
    fn test_signal_seed_ignores_warm_up() {
        let closes = zigzag(30);
        let out = macd(&closes, 2, 5, 3).unwrap();
        // Seed is the plain mean of the first three defined MACD values (indices 4..=6).
        let seed = (out.macd[4].unwrap() + out.macd[5].unwrap() + out.macd[6].unwrap()) / 3.0;
        assert!((out.signal[6].unwrap() - seed).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_is_macd_minus_signal() {
        let out = macd(&zigzag(60), 12, 26, 9).unwrap();
        for i in 0..60 {
            match (out.macd[i], out.signal[i], out.histogram[i]) {
                (Some(m), Some(s), Some(h)) => assert_eq!(h, m - s),
                (_, _, None) => {}
                other => panic!("histogram defined without both inputs at {}: {:?}", i, other),
            }
        }
    }

    #[test]
    fn test_signal_null_wherever_macd_null() {
        let out = macd(&zigzag(20), 12, 26, 9).unwrap();
        assert!(out.macd.iter().all(Option::is_none));
        assert!(out.signal.iter().all(Option::is_none));
        assert!(out.histogram.iter().all(Option::is_none));
    }

    #[test]
    fn test_constant_series_has_zero_macd() {
        let out = macd(&[7.0; 20], 3, 5, 2).unwrap();
        assert_eq!(out.macd[4], Some(0.0));
        assert!(out.histogram[19].unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_macd_rejects_nan() {
        assert_eq!(
            macd(&[1.0, 2.0, f64::NAN], 1, 2, 1),
            Err(DataError::NonFinite { index: 2 })
        );
    }
}
