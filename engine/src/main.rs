// Local harness: load a saved provider response, enrich it and print the bars as JSON.
//
//   indicator-engine <bars.csv|bars.json> [--range 6M] [--config settings.json] [--strict]
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicator_engine::data::load_bars;
use indicator_engine::{EngineSettings, EnrichmentPipeline};
use shared::models::{RangeWindow, TickerSummary};
use tracing::{info, warn};

/// Enrich a saved daily bar series with chart indicators
#[derive(Parser, Debug)]
#[command(name = "indicator-engine")]
#[command(version, about = "Enrich daily bars with SMA, EMA, RSI, MACD and Bollinger Bands")]
struct Args {
    /// Provider response to read (.csv export or .json daily series)
    input: PathBuf,

    /// Trailing window to keep: 1M, 3M, 6M, 1Y, 5Y or MAX
    #[arg(long)]
    range: Option<RangeWindow>,

    /// Engine settings file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail on the first indicator error instead of nulling its fields
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean JSON.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    let mut settings = match &args.config {
        Some(path) => EngineSettings::load(path).with_context(|| format!("loading settings from {}", path.display()))?,
        None => EngineSettings::default(),
    };
    if let Some(range) = args.range {
        settings.range = range;
    }
    settings.strict |= args.strict;

    let bars = load_bars(&args.input).with_context(|| format!("loading bars from {}", args.input.display()))?;
    let ranged = settings.range.apply(&bars);
    info!(loaded = bars.len(), shown = ranged.len(), range = %settings.range, "Bars ready");

    if let Some(summary) = TickerSummary::from_bars(ranged) {
        info!(
            last_close = summary.last_close,
            change = summary.change,
            change_pct = summary.change_pct,
            as_of = %summary.as_of,
            "Ticker summary"
        );
    } else {
        warn!("No bars for this instrument");
    }

    let pipeline = EnrichmentPipeline::from_settings(&settings);
    let enriched = if settings.strict {
        pipeline.enrich_strict(ranged, &settings.indicators)?
    } else {
        let enrichment = pipeline.enrich(ranged, &settings.indicators)?;
        for failure in &enrichment.failures {
            warn!(indicator = %failure.indicator, class = ?failure.error.class(), "{}", failure.error);
        }
        enrichment.bars
    };

    println!("{}", serde_json::to_string_pretty(&enriched)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_all_options() {
        let args = Args::try_parse_from([
            "indicator-engine",
            "bars.json",
            "--range",
            "1y",
            "--config",
            "settings.json",
            "--strict",
        ])
        .unwrap();
        assert_eq!(args.input, PathBuf::from("bars.json"));
        assert_eq!(args.range, Some(RangeWindow::OneYear));
        assert_eq!(args.config, Some(PathBuf::from("settings.json")));
        assert!(args.strict);
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["indicator-engine", "bars.csv"]).unwrap();
        assert_eq!(args.range, None);
        assert_eq!(args.config, None);
        assert!(!args.strict);
    }

    #[test]
    fn test_rejects_unknown_range_and_flags() {
        assert!(Args::try_parse_from(["indicator-engine", "bars.csv", "--range", "2W"]).is_err());
        assert!(Args::try_parse_from(["indicator-engine", "bars.csv", "--verbose"]).is_err());
        assert!(Args::try_parse_from(["indicator-engine"]).is_err());
    }
}
