use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::normalizer::{RawBar, RawField};
use crate::error::{DataError, EngineResult};

/// Reader for daily bar exports in the provider's CSV layout.
pub struct CsvBarParser;

impl CsvBarParser {
    // CSV Header: timestamp,open,high,low,close,volume
    // Example Row: 2024-05-01,169.58,172.71,169.11,169.30,50383147
    // Header names are matched case-insensitively, extra columns (adjusted_close,
    // dividend_amount, ...) are ignored and `date` is accepted in place of `timestamp`.
    pub fn load_from_path(file_path: impl AsRef<Path>) -> EngineResult<Vec<RawBar>> {
        let path = file_path.as_ref();
        let file = File::open(path)?;
        tracing::debug!(path = %path.display(), "Reading bars from CSV file");
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> EngineResult<Vec<RawBar>> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut records = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2; // header is line 1

            let date = Self::get_field(&record, &headers, &["timestamp", "date"], line)?;
            let open = Self::get_field(&record, &headers, &["open"], line)?;
            let high = Self::get_field(&record, &headers, &["high"], line)?;
            let low = Self::get_field(&record, &headers, &["low"], line)?;
            let close = Self::get_field(&record, &headers, &["close"], line)?;
            let volume = Self::get_field(&record, &headers, &["volume"], line)?;

            records.push(RawBar {
                date: date.to_string(),
                open: RawField::from(open),
                high: RawField::from(high),
                low: RawField::from(low),
                close: RawField::from(close),
                volume: RawField::from(volume),
            });
        }
        Ok(records)
    }

    // Looks a column up by any of its accepted header names.
    fn get_field<'a>(
        record: &'a StringRecord,
        headers: &StringRecord,
        names: &[&str],
        line: usize,
    ) -> Result<&'a str, DataError> {
        headers
            .iter()
            .position(|header| names.iter().any(|name| header.eq_ignore_ascii_case(name)))
            .and_then(|pos| record.get(pos))
            .ok_or_else(|| DataError::InvalidRecord {
                row: line,
                reason: format!("missing '{}' field", names[0]),
            })
    }
}
