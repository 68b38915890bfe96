// Engine settings, loaded from a JSON file or falling back to defaults
use serde::Deserialize;
use shared::models::{IndicatorConfig, RangeWindow};
use std::path::Path;

use crate::error::EngineResult;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Evaluate enabled indicators on the rayon pool instead of one after another.
    pub parallel: bool,
    /// Abort enrichment on the first indicator failure instead of returning partial results.
    pub strict: bool,
    /// Trailing window applied to loaded bars before enrichment.
    pub range: RangeWindow,
    pub indicators: IndicatorConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            parallel: true,
            strict: false,
            range: RangeWindow::default(),
            indicators: IndicatorConfig::default(),
        }
    }
}

impl EngineSettings {
    /// Missing keys take their default values.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), ?settings, "Loaded engine settings");
        Ok(settings)
    }
}
