// Turns provider records into the canonical bar sequence the engine works on:
// ascending by date, one bar per date, every price finite.
use serde::Deserialize;
use shared::models::Bar;
use shared::utils::parse_trading_day;

use crate::error::{DataError, EngineResult};

/// A field as providers send it: Alpha Vantage and CSV exports use strings, cached
/// JSON arrays use plain numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
}

impl RawField {
    fn as_f64(&self) -> Option<f64> {
        match self {
            RawField::Number(v) => Some(*v),
            RawField::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl From<&str> for RawField {
    fn from(s: &str) -> Self {
        RawField::Text(s.to_string())
    }
}

impl From<f64> for RawField {
    fn from(v: f64) -> Self {
        RawField::Number(v)
    }
}

/// One unvalidated provider record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawBar {
    pub date: String,
    pub open: RawField,
    pub high: RawField,
    pub low: RawField,
    pub close: RawField,
    pub volume: RawField,
}

pub struct SeriesNormalizer;

impl SeriesNormalizer {
    /// Parses, sorts and de-duplicates `records`.
    ///
    /// Records sharing a date collapse to the first one in input order. A record whose
    /// date or prices cannot be parsed, or whose prices are not finite, fails the whole
    /// call with `DataError::InvalidRecord` naming its zero-based position.
    pub fn normalize(records: Vec<RawBar>) -> EngineResult<Vec<Bar>> {
        let total = records.len();
        let mut bars = records
            .iter()
            .enumerate()
            .map(|(row, raw)| Self::parse_record(row, raw))
            .collect::<Result<Vec<_>, _>>()?;

        // Stable sort keeps input order among equal dates, so dedup keeps the first.
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);

        let dropped = total - bars.len();
        if dropped > 0 {
            tracing::warn!(dropped, kept = bars.len(), "Dropped bars with duplicate dates during normalization");
        }
        tracing::debug!(bars = bars.len(), "Normalized provider records");
        Ok(bars)
    }

    /// Checks that `bars` is strictly ascending by date.
    pub fn validate(bars: &[Bar]) -> Result<(), DataError> {
        for (i, pair) in bars.windows(2).enumerate() {
            if pair[1].date == pair[0].date {
                return Err(DataError::DuplicateDate { date: pair[1].date });
            }
            if pair[1].date < pair[0].date {
                return Err(DataError::Unsorted { index: i + 1 });
            }
        }
        Ok(())
    }

    fn parse_record(row: usize, raw: &RawBar) -> Result<Bar, DataError> {
        let invalid = |reason: String| DataError::InvalidRecord { row, reason };

        let date = parse_trading_day(&raw.date).map_err(|e| invalid(e.to_string()))?;
        let price = |name: &str, field: &RawField| -> Result<f64, DataError> {
            match field.as_f64() {
                Some(v) if v.is_finite() => Ok(v),
                Some(_) => Err(invalid(format!("non-finite {} value", name))),
                None => Err(invalid(format!("unparseable {} value {:?}", name, field))),
            }
        };

        let open = price("open", &raw.open)?;
        let high = price("high", &raw.high)?;
        let low = price("low", &raw.low)?;
        let close = price("close", &raw.close)?;
        let volume = price("volume", &raw.volume)?;
        if volume < 0.0 {
            return Err(invalid(format!("negative volume {}", volume)));
        }

        Ok(Bar {
            date,
            open,
            high,
            low,
            close,
            volume: volume.trunc() as u64,
        })
    }
}

/// Close prices of `bars`, in order.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
