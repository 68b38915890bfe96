// Parameter checks run before an indicator is computed. A failing check becomes a
// `ConfigError` for that indicator only.
use shared::models::{IndicatorConfig, IndicatorKind};

use crate::error::{EngineError, EngineResult};

pub const MIN_STD_DEV: f64 = 0.5;
pub const MAX_STD_DEV: f64 = 5.0;

pub fn validate(kind: IndicatorKind, config: &IndicatorConfig) -> EngineResult<()> {
    match kind {
        IndicatorKind::Sma => at_least(kind, "period", config.sma.period, 1),
        IndicatorKind::Ema => at_least(kind, "period", config.ema.period, 1),
        IndicatorKind::Rsi => at_least(kind, "period", config.rsi.period, 2),
        IndicatorKind::Macd => {
            let macd = &config.macd;
            at_least(kind, "fast", macd.fast, 1)?;
            at_least(kind, "slow", macd.slow, 2)?;
            at_least(kind, "signal", macd.signal, 1)?;
            if macd.slow <= macd.fast {
                return Err(EngineError::config(
                    kind,
                    format!("slow period {} must be greater than fast period {}", macd.slow, macd.fast),
                ));
            }
            Ok(())
        }
        IndicatorKind::Bb => {
            at_least(kind, "period", config.bb.period, 2)?;
            let std_dev = config.bb.std_dev;
            if !(MIN_STD_DEV..=MAX_STD_DEV).contains(&std_dev) {
                return Err(EngineError::config(
                    kind,
                    format!("stdDev {} outside [{}, {}]", std_dev, MIN_STD_DEV, MAX_STD_DEV),
                ));
            }
            Ok(())
        }
    }
}

fn at_least(kind: IndicatorKind, name: &str, value: usize, min: usize) -> EngineResult<()> {
    if value < min {
        Err(EngineError::config(kind, format!("{} must be at least {}, got {}", name, min, value)))
    } else {
        Ok(())
    }
}
