// Property-based tests for the indicator routines and the enrichment pipeline.

use chrono::NaiveDate;
use proptest::prelude::*;

use indicator_engine::indicators::{bollinger, ema, macd, rsi, sma};
use indicator_engine::EnrichmentPipeline;
use shared::models::{Bar, IndicatorConfig};

// ==================== Test Data Generators ====================

/// Generate a random price series (all positive values)
fn arb_price_series(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0_f64, min_len..=max_len)
}

fn to_bars(closes: &[f64]) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1,
        })
        .collect()
}

// ==================== Warm-up ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Shorter-than-period input is all null for every windowed routine
    #[test]
    fn prop_short_input_all_null(period in 2usize..30, data in arb_price_series(0, 29)) {
        prop_assume!(data.len() < period);
        prop_assert!(sma(&data, period).unwrap().iter().all(Option::is_none));
        prop_assert!(ema(&data, period).unwrap().iter().all(Option::is_none));
        prop_assert!(rsi(&data, period).unwrap().iter().all(Option::is_none));
        let bands = bollinger(&data, period, 2.0).unwrap();
        prop_assert!(bands.upper.iter().all(Option::is_none));
        prop_assert!(bands.lower.iter().all(Option::is_none));
    }

    /// Every routine returns exactly one entry per input
    #[test]
    fn prop_output_length(data in arb_price_series(0, 120), period in 1usize..=20) {
        prop_assert_eq!(sma(&data, period).unwrap().len(), data.len());
        prop_assert_eq!(ema(&data, period).unwrap().len(), data.len());
        prop_assert_eq!(rsi(&data, period).unwrap().len(), data.len());
        prop_assert_eq!(bollinger(&data, period, 2.0).unwrap().upper.len(), data.len());
        prop_assert_eq!(macd(&data, period, period + 1, 3).unwrap().histogram.len(), data.len());
    }
}

// ==================== SMA / EMA ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// SMA equals the mean of the trailing window
    #[test]
    fn prop_sma_is_window_mean(data in arb_price_series(1, 100), period in 1usize..=15) {
        let result = sma(&data, period).unwrap();
        for i in 0..data.len() {
            if i + 1 < period {
                prop_assert!(result[i].is_none());
            } else {
                let window = &data[i + 1 - period..=i];
                let mean = window.iter().sum::<f64>() / period as f64;
                let got = result[i].unwrap();
                prop_assert!((got - mean).abs() <= 1e-9 * mean.abs().max(1.0), "index {}: {} vs {}", i, got, mean);
            }
        }
    }

    /// EMA's first value equals SMA at the same index
    #[test]
    fn prop_ema_seed_equals_sma(data in arb_price_series(1, 100), period in 1usize..=15) {
        prop_assume!(data.len() >= period);
        let e = ema(&data, period).unwrap();
        let s = sma(&data, period).unwrap();
        let first = e.iter().position(Option::is_some).unwrap();
        prop_assert_eq!(first, period - 1);
        let (ev, sv) = (e[first].unwrap(), s[first].unwrap());
        prop_assert!((ev - sv).abs() <= 1e-9 * sv.abs().max(1.0));
    }
}

// ==================== RSI / MACD / Bollinger ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// RSI stays within [0, 100]
    #[test]
    fn prop_rsi_bounded(data in arb_price_series(2, 150), period in 2usize..=30) {
        for value in rsi(&data, period).unwrap().into_iter().flatten() {
            prop_assert!((0.0..=100.0).contains(&value), "RSI {} out of range", value);
        }
    }

    /// Histogram is MACD minus signal wherever both exist, and null elsewhere
    #[test]
    fn prop_macd_histogram(data in arb_price_series(1, 150), fast in 1usize..10, extra in 1usize..20, signal in 1usize..10) {
        let out = macd(&data, fast, fast + extra, signal).unwrap();
        for i in 0..data.len() {
            match (out.macd[i], out.signal[i]) {
                (Some(m), Some(s)) => prop_assert_eq!(out.histogram[i], Some(m - s)),
                _ => prop_assert!(out.histogram[i].is_none()),
            }
            if out.macd[i].is_none() {
                prop_assert!(out.signal[i].is_none());
            }
        }
    }

    /// Upper band never sits below the lower band
    #[test]
    fn prop_bollinger_ordered(data in arb_price_series(2, 150), period in 2usize..=25, k in 0.5..5.0_f64) {
        let out = bollinger(&data, period, k).unwrap();
        for (u, l) in out.upper.iter().zip(out.lower.iter()) {
            if let (Some(u), Some(l)) = (u, l) {
                prop_assert!(u >= l);
            }
        }
    }
}

// ==================== Pipeline ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Same bars and config give identical output, and values are never NaN
    #[test]
    fn prop_pipeline_idempotent(data in arb_price_series(0, 200)) {
        let bars = to_bars(&data);
        let mut config = IndicatorConfig::default();
        config.ema.enabled = true;
        config.bb.enabled = true;

        let pipeline = EnrichmentPipeline::default();
        let first = pipeline.enrich(&bars, &config).unwrap();
        let second = pipeline.enrich(&bars, &config).unwrap();
        prop_assert!(first.is_complete());
        prop_assert_eq!(&first.bars, &second.bars);
        prop_assert_eq!(first.bars.len(), bars.len());
        for bar in &first.bars {
            for value in bar.values.values().flatten() {
                prop_assert!(value.is_finite());
            }
        }
    }
}
