// Writing computed series back onto bars, either by position or by date.
use std::collections::HashMap;

use anyhow::anyhow;
use chrono::NaiveDate;
use shared::models::{DatedValue, EnrichedBar, IndicatorField, IndicatorKind};

use crate::error::{DataError, EngineResult};
use crate::indicators::IndicatorOutput;

/// Copies every column of `output` onto the bar at the same index.
/// `output` must have been computed from exactly these bars. Nothing is written when
/// any computed value is non-finite.
pub fn merge_positional(bars: &mut [EnrichedBar], output: &IndicatorOutput) -> EngineResult<()> {
    if output.len() != bars.len() {
        return Err(anyhow!(
            "indicator output has {} values for {} bars",
            output.len(),
            bars.len()
        )
        .into());
    }
    if let Some((field, index)) = output.first_non_finite() {
        return Err(DataError::NonFiniteOutput { field, index }.into());
    }
    for (field, values) in output.columns() {
        for (bar, value) in bars.iter_mut().zip(values.iter()) {
            bar.set(field, *value);
        }
    }
    Ok(())
}

/// Marks every field of `kind` as null, used when the indicator failed to compute.
pub fn fill_null(bars: &mut [EnrichedBar], kind: IndicatorKind) {
    for bar in bars.iter_mut() {
        for field in kind.fields() {
            bar.set(*field, None);
        }
    }
}

/// Joins a date-stamped series onto `bars` by date.
///
/// Neither side has to be sorted. Bars without a matching date get null, dates that
/// match no bar are ignored, and non-finite values are stored as null. When the series
/// carries a date twice the first entry wins.
pub fn merge_by_date(bars: &mut [EnrichedBar], field: IndicatorField, series: &[DatedValue]) {
    let mut by_date: HashMap<NaiveDate, Option<f64>> = HashMap::with_capacity(series.len());
    for point in series {
        by_date
            .entry(point.date)
            .or_insert(point.value.filter(|v| v.is_finite()));
    }

    let mut matched = 0usize;
    for bar in bars.iter_mut() {
        let value = match by_date.get(&bar.date()) {
            Some(value) => {
                matched += 1;
                *value
            }
            None => None,
        };
        bar.set(field, value);
    }
    tracing::debug!(%field, matched, bars = bars.len(), points = series.len(), "Merged dated series");
}
