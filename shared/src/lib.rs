// Plain data shared between the indicator engine and its consumers (rendering layer,
// preference store, provider adapters).
pub mod models;
pub mod utils;

pub use models::{
    Bar, BollingerParams, DatedValue, EnrichedBar, IndicatorConfig, IndicatorField, IndicatorKind,
    MacdParams, MovingAverageParams, RangeWindow, RsiParams, TickerSummary,
};
