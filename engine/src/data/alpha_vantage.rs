// Parser for Alpha Vantage TIME_SERIES_DAILY / TIME_SERIES_DAILY_ADJUSTED payloads.
//
// The series arrives as a dictionary keyed by date, newest first:
//   { "Meta Data": {...},
//     "Time Series (Daily)": { "2024-05-01": { "1. open": "169.58", ..., "6. volume": "50383147" } } }
// The plain daily endpoint puts volume under "5. volume"; the adjusted one uses
// "5. adjusted close" and "6. volume".
use serde_json::{Map, Value};

use super::normalizer::{RawBar, RawField};
use crate::error::{DataError, EngineError, EngineResult};

const ERROR_KEYS: [&str; 3] = ["Error Message", "Note", "Information"];

pub fn parse_daily_series(json: &str) -> EngineResult<Vec<RawBar>> {
    let payload: Value = serde_json::from_str(json)?;
    parse_daily_value(&payload)
}

pub fn parse_daily_value(payload: &Value) -> EngineResult<Vec<RawBar>> {
    let object = payload
        .as_object()
        .ok_or_else(|| EngineError::ProviderError("Payload is not a JSON object".to_string()))?;

    // Rate limits and unknown symbols come back as 200 OK with one of these keys.
    for key in ERROR_KEYS {
        if let Some(message) = object.get(key).and_then(Value::as_str) {
            tracing::warn!(key, message, "Provider returned an error payload");
            return Err(EngineError::ProviderError(message.to_string()));
        }
    }

    let series = object
        .iter()
        .find(|(key, _)| key.starts_with("Time Series"))
        .and_then(|(_, value)| value.as_object())
        .ok_or_else(|| EngineError::NoData("No time series in payload".to_string()))?;

    series
        .iter()
        .enumerate()
        .map(|(row, (date, entry))| parse_entry(row, date, entry))
        .collect::<Result<Vec<_>, _>>()
        .map_err(EngineError::from)
}

fn parse_entry(row: usize, date: &str, entry: &Value) -> Result<RawBar, DataError> {
    let fields = entry.as_object().ok_or_else(|| DataError::InvalidRecord {
        row,
        reason: format!("entry for {} is not an object", date),
    })?;

    let volume_key = if fields.contains_key("6. volume") {
        "6. volume"
    } else {
        "5. volume"
    };

    Ok(RawBar {
        date: date.to_string(),
        open: field(fields, "1. open", row)?,
        high: field(fields, "2. high", row)?,
        low: field(fields, "3. low", row)?,
        close: field(fields, "4. close", row)?,
        volume: field(fields, volume_key, row)?,
    })
}

fn field(fields: &Map<String, Value>, key: &str, row: usize) -> Result<RawField, DataError> {
    match fields.get(key) {
        Some(Value::String(s)) => Ok(RawField::Text(s.clone())),
        Some(Value::Number(n)) => n.as_f64().map(RawField::Number).ok_or_else(|| DataError::InvalidRecord {
            row,
            reason: format!("'{}' is not representable as f64", key),
        }),
        _ => Err(DataError::InvalidRecord {
            row,
            reason: format!("missing '{}' field", key),
        }),
    }
}
