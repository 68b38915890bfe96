// Date helpers shared by the engine's provider adapters and any other consumer of bar data.
use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parses the calendar day of a provider date string.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339 timestamps such as the
/// ISO strings the dashboard keeps in its cache. Only the day survives; intraday
/// time and offset are dropped.
pub fn parse_trading_day(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", s, e))
}
