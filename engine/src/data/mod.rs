// Provider adapters and the normalizer that turns their records into bars.
pub mod alpha_vantage;
pub mod csv_parser;
pub mod normalizer;

use std::path::Path;

use shared::models::Bar;

use crate::error::EngineResult;
use csv_parser::CsvBarParser;
use normalizer::SeriesNormalizer;

/// Loads a saved provider response from disk and normalizes it.
/// `.json` files are read as Alpha Vantage daily payloads, anything else as CSV.
pub fn load_bars(path: impl AsRef<Path>) -> EngineResult<Vec<Bar>> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    let records = if is_json {
        let json = std::fs::read_to_string(path)?;
        alpha_vantage::parse_daily_series(&json)?
    } else {
        CsvBarParser::load_from_path(path)?
    };
    tracing::info!(path = %path.display(), records = records.len(), "Loaded provider records");
    SeriesNormalizer::normalize(records)
}
