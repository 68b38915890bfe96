use chrono::NaiveDate;
use shared::models::{IndicatorField, IndicatorKind};
use thiserror::Error;

/// Faults in the bar data itself. Any of these makes the affected indicator untrustworthy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("bars are not in ascending date order at index {index}")]
    Unsorted { index: usize },

    #[error("duplicate bar for date {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("non-finite close value at index {index}")]
    NonFinite { index: usize },

    #[error("{field} overflowed to a non-finite value at index {index}")]
    NonFiniteOutput { field: IndicatorField, index: usize },

    #[error("invalid record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error for {indicator}: {reason}")]
    ConfigError {
        indicator: IndicatorKind,
        reason: String,
    },

    #[error("Data error: {0}")]
    DataError(#[from] DataError),

    // Payload-level failures reported by the market-data provider (rate limit notes,
    // unknown symbol, missing series).
    #[error("Provider error: {0}")]
    ProviderError(String),

    // The provider answered, but there is no series to chart for the instrument.
    #[error("No data: {0}")]
    NoData(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Coarse buckets the boundary layer uses to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Nothing to chart for this instrument.
    NoData,
    /// The data arrived but an indicator could not be computed from it.
    Computation,
    /// The provider could not be reached or refused the request.
    ProviderUnavailable,
}

impl EngineError {
    pub fn config(indicator: IndicatorKind, reason: impl Into<String>) -> Self {
        EngineError::ConfigError {
            indicator,
            reason: reason.into(),
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.class() == ErrorClass::NoData
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            EngineError::NoData(_) => ErrorClass::NoData,
            EngineError::ProviderError(_) | EngineError::IoError { .. } => ErrorClass::ProviderUnavailable,
            EngineError::ConfigError { .. }
            | EngineError::DataError(_)
            | EngineError::CsvSystemError { .. }
            | EngineError::JsonError { .. }
            | EngineError::AnyhowError(_) => ErrorClass::Computation,
        }
    }
}
