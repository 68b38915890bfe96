// Enrichment pipeline: runs every enabled indicator over the close prices of a bar
// sequence and merges the results back onto the bars.
//
// Indicators are independent. One failing (bad parameters, non-finite closes or
// results) leaves its fields null on every bar and is reported in `Enrichment::failures`.
// `enrich_strict` turns the first failure into an error instead.

pub mod merge;
pub mod validate;

use rayon::prelude::*;
use shared::models::{Bar, EnrichedBar, IndicatorConfig, IndicatorKind};

use crate::config::EngineSettings;
use crate::data::normalizer::{closes, SeriesNormalizer};
use crate::error::{EngineError, EngineResult};
use crate::indicators::{calculator_for, IndicatorOutput};

pub use merge::{merge_by_date, merge_positional};
pub use validate::validate;

/// An indicator that could not be computed, and why.
#[derive(Debug)]
pub struct IndicatorFailure {
    pub indicator: IndicatorKind,
    pub error: EngineError,
}

/// Result of a lenient enrichment run.
#[derive(Debug)]
pub struct Enrichment {
    pub bars: Vec<EnrichedBar>,
    pub failures: Vec<IndicatorFailure>,
}

impl Enrichment {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EnrichmentPipeline {
    parallel: bool,
}

impl Default for EnrichmentPipeline {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl EnrichmentPipeline {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(settings.parallel)
    }

    /// Enriches `bars` with every indicator enabled in `config`.
    ///
    /// Returns an error only when the bars themselves are out of order or repeat a
    /// date, since no indicator can be trusted then. Zero bars give an empty result.
    pub fn enrich(&self, bars: &[Bar], config: &IndicatorConfig) -> EngineResult<Enrichment> {
        if bars.is_empty() {
            return Ok(Enrichment {
                bars: Vec::new(),
                failures: Vec::new(),
            });
        }
        SeriesNormalizer::validate(bars)?;

        let closes = closes(bars);
        let kinds = config.enabled_kinds();
        tracing::debug!(bars = bars.len(), indicators = ?kinds, parallel = self.parallel, "Running enrichment");

        // Collecting preserves the fixed indicator order, so the merge below is
        // deterministic whichever thread finished first.
        let results: Vec<(IndicatorKind, EngineResult<IndicatorOutput>)> = if self.parallel {
            kinds
                .par_iter()
                .map(|&kind| (kind, compute(kind, config, &closes)))
                .collect()
        } else {
            kinds
                .iter()
                .map(|&kind| (kind, compute(kind, config, &closes)))
                .collect()
        };

        let mut enriched: Vec<EnrichedBar> = bars.iter().cloned().map(EnrichedBar::from_bar).collect();
        let mut failures = Vec::new();
        for (kind, result) in results {
            let merged = result.and_then(|output| merge_positional(&mut enriched, &output));
            if let Err(error) = merged {
                tracing::warn!(indicator = %kind, error = %error, "Indicator computation failed");
                merge::fill_null(&mut enriched, kind);
                failures.push(IndicatorFailure { indicator: kind, error });
            }
        }

        Ok(Enrichment {
            bars: enriched,
            failures,
        })
    }

    /// Like [`enrich`](Self::enrich) but fails on the first indicator error, in
    /// indicator order (sma, ema, rsi, macd, bb).
    pub fn enrich_strict(&self, bars: &[Bar], config: &IndicatorConfig) -> EngineResult<Vec<EnrichedBar>> {
        let enrichment = self.enrich(bars, config)?;
        match enrichment.failures.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(enrichment.bars),
        }
    }
}

/// Enriches with the default (parallel, lenient) pipeline.
pub fn enrich(bars: &[Bar], config: &IndicatorConfig) -> EngineResult<Enrichment> {
    EnrichmentPipeline::default().enrich(bars, config)
}

fn compute(kind: IndicatorKind, config: &IndicatorConfig, closes: &[f64]) -> EngineResult<IndicatorOutput> {
    validate(kind, config)?;
    let calculator = calculator_for(kind, config);
    let output = calculator.calculate(closes)?;
    tracing::trace!(indicator = calculator.name(), parameters = %calculator.parameters(), "Computed indicator");
    Ok(output)
}
