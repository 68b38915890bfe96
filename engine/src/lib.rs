// Indicator engine library root
//
// Bars come in through `data` (provider adapters + normalizer), indicators are
// computed by `indicators`, and `pipeline` merges them back onto the bars for the
// rendering layer.

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod pipeline;

pub use config::EngineSettings;
pub use data::normalizer::{RawBar, RawField, SeriesNormalizer};
pub use error::{DataError, EngineError, EngineResult, ErrorClass};
pub use pipeline::{enrich, Enrichment, EnrichmentPipeline, IndicatorFailure};
