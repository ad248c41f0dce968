// ============================================================================
// CLI ENTRY POINT
// ============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum, ValueHint};
use emotion_curve::{ConsolePrompter, CurveConfig, EdgeMode, EmotionCurve, NoPrompter, TimeSeries};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sketch a 24-hour emotion curve", long_about = None)]
struct Cli {
    /// Window title
    #[arg(long, default_value = "Interactive Emotion Curve")]
    title: String,

    #[arg(long, default_value_t = 960)]
    width: usize,

    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Dense samples drawn across the day
    #[arg(long, default_value_t = 231)]
    samples: usize,

    /// Initial view offset added to every hour
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset: f64,

    /// Fill opacity at the extremes of the value range
    #[arg(long, default_value_t = 0.6)]
    fill_alpha: f64,

    #[arg(long, value_enum, default_value_t = EdgeArg::Pinned)]
    edge_mode: EdgeArg,

    /// 24 comma separated starting amplitudes
    #[arg(long, allow_hyphen_values = true)]
    amplitudes: Option<String>,

    /// TrueType font for chart text (system fonts are tried otherwise)
    #[arg(long, value_hint = ValueHint::FilePath)]
    font: Option<PathBuf>,

    #[arg(long, default_value_t = 60.0)]
    max_framerate: f64,

    /// Disable label editing prompts on the terminal
    #[arg(long)]
    no_prompts: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EdgeArg {
    /// Flat tangents at 0h and 23h
    Pinned,
    /// Three point end slopes
    ThreePoint,
}

impl From<EdgeArg> for EdgeMode {
    fn from(arg: EdgeArg) -> Self {
        match arg {
            EdgeArg::Pinned => EdgeMode::Pinned,
            EdgeArg::ThreePoint => EdgeMode::ThreePoint,
        }
    }
}

// ============================================================================
// STARTUP
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let series = match &cli.amplitudes {
        Some(list) => TimeSeries::parse(list).context("parsing --amplitudes")?,
        None => TimeSeries::default(),
    };

    let config = CurveConfig::builder()
        .title(cli.title)
        .window_width(cli.width)
        .window_height(cli.height)
        .samples(cli.samples)
        .max_fill_alpha(cli.fill_alpha)
        .edge_mode(cli.edge_mode.into())
        .max_framerate(cli.max_framerate)
        .maybe_font_path(cli.font)
        .build();

    info!(
        offset = cli.offset,
        prompts = !cli.no_prompts,
        "starting emotion curve"
    );

    let mut curve = EmotionCurve::new(config)
        .with_series(series)
        .with_offset(cli.offset);
    curve = if cli.no_prompts {
        curve.with_prompter(Box::new(NoPrompter))
    } else {
        curve.with_prompter(Box::new(ConsolePrompter::stdio()))
    };

    curve.show().context("running the chart window")?;
    Ok(())
}
