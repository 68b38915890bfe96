use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Columns an indicator can add to an enriched bar.
/// Declaration order is the order fields appear in serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndicatorField {
    Sma,
    Ema,
    Rsi,
    Macd,
    MacdSignal,
    MacdHist,
    BbUpper,
    BbLower,
}

impl IndicatorField {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorField::Sma => "sma",
            IndicatorField::Ema => "ema",
            IndicatorField::Rsi => "rsi",
            IndicatorField::Macd => "macd",
            IndicatorField::MacdSignal => "macdSignal",
            IndicatorField::MacdHist => "macdHist",
            IndicatorField::BbUpper => "bbUpper",
            IndicatorField::BbLower => "bbLower",
        }
    }
}

impl fmt::Display for IndicatorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five indicators the dashboard knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    Bb,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 5] = [
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::Bb,
    ];

    /// Fields this indicator writes onto every enriched bar when enabled.
    pub fn fields(&self) -> &'static [IndicatorField] {
        match self {
            IndicatorKind::Sma => &[IndicatorField::Sma],
            IndicatorKind::Ema => &[IndicatorField::Ema],
            IndicatorKind::Rsi => &[IndicatorField::Rsi],
            IndicatorKind::Macd => &[
                IndicatorField::Macd,
                IndicatorField::MacdSignal,
                IndicatorField::MacdHist,
            ],
            IndicatorKind::Bb => &[IndicatorField::BbUpper, IndicatorField::BbLower],
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndicatorKind::Sma => "sma",
            IndicatorKind::Ema => "ema",
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Macd => "macd",
            IndicatorKind::Bb => "bb",
        };
        f.write_str(name)
    }
}

/// A bar plus whatever indicator columns were requested.
///
/// A field that is absent from `values` belongs to a disabled indicator; a field
/// present with `None` is inside that indicator's warm-up period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBar {
    #[serde(flatten)]
    pub bar: Bar,
    #[serde(flatten)]
    pub values: BTreeMap<IndicatorField, Option<f64>>,
}

impl EnrichedBar {
    pub fn from_bar(bar: Bar) -> Self {
        Self {
            bar,
            values: BTreeMap::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }

    /// Value of `field`, `None` when the field is null or was never requested.
    pub fn get(&self, field: IndicatorField) -> Option<f64> {
        self.values.get(&field).copied().flatten()
    }

    pub fn has_field(&self, field: IndicatorField) -> bool {
        self.values.contains_key(&field)
    }

    pub fn set(&mut self, field: IndicatorField, value: Option<f64>) {
        self.values.insert(field, value);
    }
}

/// An indicator value stamped with its own date, used when a series has to be
/// joined back onto bars by date instead of by position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

// ---- Indicator configuration -------------------------------------------------
// Mirrors the JSON blob the dashboard persists in its preferences, e.g.
// {"sma":{"enabled":true,"period":20}, ..., "bb":{"enabled":false,"period":20,"stdDev":2}}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovingAverageParams {
    pub enabled: bool,
    pub period: usize,
}

impl Default for MovingAverageParams {
    fn default() -> Self {
        Self {
            enabled: false,
            period: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiParams {
    pub enabled: bool,
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            enabled: false,
            period: 14,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub enabled: bool,
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            enabled: false,
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BollingerParams {
    pub enabled: bool,
    pub period: usize,
    pub std_dev: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            enabled: false,
            period: 20,
            std_dev: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma: MovingAverageParams,
    pub ema: MovingAverageParams,
    pub rsi: RsiParams,
    pub macd: MacdParams,
    pub bb: BollingerParams,
}

impl IndicatorConfig {
    /// Everything switched off, default parameters kept.
    pub fn disabled() -> Self {
        Self {
            sma: MovingAverageParams::default(),
            ema: MovingAverageParams::default(),
            rsi: RsiParams::default(),
            macd: MacdParams::default(),
            bb: BollingerParams::default(),
        }
    }

    pub fn is_enabled(&self, kind: IndicatorKind) -> bool {
        match kind {
            IndicatorKind::Sma => self.sma.enabled,
            IndicatorKind::Ema => self.ema.enabled,
            IndicatorKind::Rsi => self.rsi.enabled,
            IndicatorKind::Macd => self.macd.enabled,
            IndicatorKind::Bb => self.bb.enabled,
        }
    }

    /// Enabled indicators in their fixed evaluation order.
    pub fn enabled_kinds(&self) -> Vec<IndicatorKind> {
        IndicatorKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }
}

impl Default for IndicatorConfig {
    // Dashboard defaults: SMA, RSI and MACD on; EMA and Bollinger off.
    fn default() -> Self {
        Self {
            sma: MovingAverageParams {
                enabled: true,
                period: 20,
            },
            ema: MovingAverageParams::default(),
            rsi: RsiParams {
                enabled: true,
                period: 14,
            },
            macd: MacdParams {
                enabled: true,
                ..MacdParams::default()
            },
            bb: BollingerParams::default(),
        }
    }
}

// ---- Range selection and ticker summary ----------------------------------------

/// Trailing window of trading days shown on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RangeWindow {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[default]
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "MAX")]
    Max,
}

impl RangeWindow {
    /// Number of trading days in the window, `None` for the full history.
    pub fn trading_days(&self) -> Option<usize> {
        match self {
            RangeWindow::OneMonth => Some(22),
            RangeWindow::ThreeMonths => Some(66),
            RangeWindow::SixMonths => Some(132),
            RangeWindow::OneYear => Some(264),
            RangeWindow::FiveYears => Some(1320),
            RangeWindow::Max => None,
        }
    }

    /// Trailing slice of `bars` covered by this window.
    pub fn apply<'a>(&self, bars: &'a [Bar]) -> &'a [Bar] {
        match self.trading_days() {
            Some(days) if days < bars.len() => &bars[bars.len() - days..],
            _ => bars,
        }
    }
}

impl fmt::Display for RangeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            RangeWindow::OneMonth => "1M",
            RangeWindow::ThreeMonths => "3M",
            RangeWindow::SixMonths => "6M",
            RangeWindow::OneYear => "1Y",
            RangeWindow::FiveYears => "5Y",
            RangeWindow::Max => "MAX",
        };
        f.write_str(key)
    }
}

impl FromStr for RangeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1M" => Ok(RangeWindow::OneMonth),
            "3M" => Ok(RangeWindow::ThreeMonths),
            "6M" => Ok(RangeWindow::SixMonths),
            "1Y" => Ok(RangeWindow::OneYear),
            "5Y" => Ok(RangeWindow::FiveYears),
            "MAX" => Ok(RangeWindow::Max),
            other => Err(format!("unknown range '{}'", other)),
        }
    }
}

/// Headline numbers for the ticker card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSummary {
    pub last_close: f64,
    pub change: f64,
    pub change_pct: f64,
    pub as_of: NaiveDate,
    pub volume: u64,
}

impl TickerSummary {
    /// Compares the last bar with the one before it. A lone bar is compared with itself.
    pub fn from_bars(bars: &[Bar]) -> Option<Self> {
        let last = bars.last()?;
        let prev = if bars.len() >= 2 { &bars[bars.len() - 2] } else { last };
        let change = last.close - prev.close;
        let change_pct = if prev.close != 0.0 {
            change / prev.close * 100.0
        } else {
            0.0
        };
        Some(Self {
            last_close: last.close,
            change,
            change_pct,
            as_of: last.date,
            volume: last.volume,
        })
    }
}
