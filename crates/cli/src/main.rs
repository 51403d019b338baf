//! streamgraph CLI - Render CSV time series as wiggle-offset streamgraphs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

mod error;
mod html;
mod inspect;
mod output;
mod sample;

use streamgraph_core::{
    parse_from_file, Chart, ChartConfig, HoverState, Pointer, PointerEvent, StackOffset, Tooltip,
};

/// streamgraph: stacked area charts from CSV time series
#[derive(Parser, Debug)]
#[command(name = "streamgraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a CSV file as SVG, HTML or scene JSON
    Render(RenderArgs),
    /// Summarize a CSV file after stacking
    Inspect(InspectArgs),
    /// Print the tooltip shown for a pointer over a layer
    Hover(HoverArgs),
    /// Write a sample CSV in the expected format
    Sample(SampleArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Svg,
    Html,
    Json,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "svg")]
    format: OutputFormat,

    /// JSON chart configuration
    #[arg(long, value_name = "FILE", env = "STREAMGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Baseline: wiggle or zero
    #[arg(long)]
    offset: Option<StackOffset>,

    #[arg(long)]
    width: Option<f64>,

    #[arg(long)]
    height: Option<f64>,

    /// Page title for HTML output
    #[arg(long, default_value = "Streamgraph")]
    title: String,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[arg(long, value_name = "FILE", env = "STREAMGRAPH_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct HoverArgs {
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[arg(long, value_name = "FILE", env = "STREAMGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Series key of the hovered layer
    #[arg(short, long)]
    layer: String,

    /// Pointer x in chart pixels
    #[arg(short, long, allow_negative_numbers = true)]
    x: f64,

    /// Pointer y in chart pixels
    #[arg(short, long, allow_negative_numbers = true)]
    y: f64,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[arg(long, default_value = "12")]
    months: usize,

    #[arg(long, default_value_t = sample::DEFAULT_SEED)]
    seed: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match cli.command {
        Commands::Render(args) => render_command(args),
        Commands::Inspect(args) => inspect_command(args),
        Commands::Hover(args) => hover_command(args),
        Commands::Sample(args) => sample_command(args),
    }
}

/// Config from file (or defaults) with command-line overrides applied
fn load_config(
    path: Option<&Path>,
    offset: Option<StackOffset>,
    width: Option<f64>,
    height: Option<f64>,
) -> Result<ChartConfig> {
    let mut config = match path {
        Some(path) => ChartConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config: {:?}", path))?,
        None => ChartConfig::default(),
    };

    if let Some(offset) = offset {
        config.offset = offset;
    }
    if let Some(width) = width {
        config.width = width;
    }
    if let Some(height) = height {
        config.height = height;
    }

    config.validate().context("Invalid chart configuration")?;
    Ok(config)
}

fn load_chart(input: &Path, config: &ChartConfig) -> Result<Chart> {
    info!("Reading {:?}", input);
    let records = parse_from_file(input)
        .with_context(|| format!("Failed to read CSV file: {:?}", input))?;

    let chart = Chart::build(records, config);
    info!(
        "Stacked {} records into {} layers",
        chart.records.len(),
        chart.layers.len()
    );
    Ok(chart)
}

fn render_command(args: RenderArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), args.offset, args.width, args.height)?;
    let chart = load_chart(&args.input, &config)?;

    let content = render(&chart, args.format, &args.title)?;
    output::write_output(args.output.as_deref(), &content)
        .with_context(|| "Failed to write rendered chart")?;

    if let Some(path) = &args.output {
        info!("Wrote {:?} chart to {:?}", args.format, path);
    }
    Ok(())
}

fn render(chart: &Chart, format: OutputFormat, title: &str) -> error::Result<String> {
    debug!("Rendering {} scene elements", chart.scene.element_count());
    match format {
        OutputFormat::Svg => Ok(chart.scene.to_svg()),
        OutputFormat::Html => html::render_page(chart, title),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&chart.scene)?),
    }
}

fn inspect_command(args: InspectArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), None, None, None)?;
    let chart = load_chart(&args.input, &config)?;

    println!("{}", inspect::summary(&chart));
    Ok(())
}

fn hover_command(args: HoverArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), None, None, None)?;
    let chart = load_chart(&args.input, &config)?;

    let tooltip = hover(&chart, &config, &args.layer, Pointer { x: args.x, y: args.y })?;
    println!("{}", serde_json::to_string_pretty(&tooltip)?);
    Ok(())
}

/// Tooltip for a pointer entering the layer named `key`
fn hover(
    chart: &Chart,
    config: &ChartConfig,
    key: &str,
    pointer: Pointer,
) -> error::Result<Tooltip> {
    let layer = chart
        .layer_index(key)
        .ok_or_else(|| error::Error::UnknownLayer {
            key: key.to_string(),
            known: config.catalog.keys().join(", "),
        })?;

    let mut state = HoverState::new();
    state.handle(PointerEvent::Enter { layer, pointer });
    debug!("Hover state: {:?}", state);

    chart
        .tooltip(&state, config)
        .ok_or_else(|| error::Error::Other(format!("No tooltip for layer '{}'", key)))
}

fn sample_command(args: SampleArgs) -> Result<()> {
    let catalog = ChartConfig::default().catalog;
    let text = sample::generate(&catalog, args.months, args.seed)
        .with_context(|| "Failed to generate sample data")?;

    output::write_output(args.output.as_deref(), &text)
        .with_context(|| "Failed to write sample data")?;

    if let Some(path) = &args.output {
        info!("Wrote {} months of sample data to {:?}", args.months, path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TWO_ROWS: &str = "Date,LLaMA-3.1,Claude,PaLM-2,Gemini,GPT-4\n\
                            2024-01-01,10,5,3,8,12\n\
                            2024-02-01,12,6,4,9,14\n";

    fn write_input(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("scores.csv");
        fs::write(&path, TWO_ROWS).unwrap();
        path
    }

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from([
            "streamgraph",
            "render",
            "data.csv",
            "--format",
            "html",
            "--offset",
            "zero",
            "-o",
            "out.html",
        ])
        .unwrap();

        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.format, OutputFormat::Html);
                assert_eq!(args.offset, Some(StackOffset::Zero));
                assert_eq!(args.output, Some(PathBuf::from("out.html")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_render_command_writes_svg() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir);
        let output = dir.path().join("out/chart.svg");

        render_command(RenderArgs {
            input,
            output: Some(output.clone()),
            format: OutputFormat::Svg,
            config: None,
            offset: None,
            width: Some(600.0),
            height: None,
            title: "Streamgraph".to_string(),
        })
        .unwrap();

        let svg = fs::read_to_string(output).unwrap();
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="600""#));
        assert_eq!(svg.matches(r#"<path class="layer""#).count(), 5);
    }

    #[test]
    fn test_render_json_is_scene() {
        let config = ChartConfig::default();
        let chart = Chart::from_csv(TWO_ROWS, &config).unwrap();

        let json = render(&chart, OutputFormat::Json, "").unwrap();
        let scene: streamgraph_core::Scene = serde_json::from_str(&json).unwrap();
        assert_eq!(scene, chart.scene);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = load_chart(&dir.path().join("missing.csv"), &ChartConfig::default());

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Failed to read CSV file"));
    }

    #[test]
    fn test_config_file_and_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "width": 700, "offset": "zero" }"#).unwrap();

        let config =
            load_config(Some(&path), Some(StackOffset::Wiggle), None, Some(400.0)).unwrap();
        assert_eq!(config.width, 700.0);
        assert_eq!(config.height, 400.0);
        assert_eq!(config.offset, StackOffset::Wiggle);
    }

    #[test]
    fn test_override_that_breaks_layout_is_rejected() {
        assert!(load_config(None, None, Some(10.0), None).is_err());
    }

    #[test]
    fn test_hover_reports_layer_and_readout() {
        let config = ChartConfig::default();
        let chart = Chart::from_csv(TWO_ROWS, &config).unwrap();

        let tooltip = hover(&chart, &config, "GPT-4", Pointer { x: 60.0, y: 100.0 }).unwrap();
        assert_eq!(tooltip.key, "GPT-4");
        assert_eq!(tooltip.chart.bars.len(), 2);
        assert_eq!(tooltip.readout.map(|r| r.record), Some(0));
    }

    #[test]
    fn test_hover_unknown_layer() {
        let config = ChartConfig::default();
        let chart = Chart::from_csv(TWO_ROWS, &config).unwrap();

        let result = hover(&chart, &config, "Mistral", Pointer { x: 0.0, y: 0.0 });
        match result {
            Err(error::Error::UnknownLayer { key, known }) => {
                assert_eq!(key, "Mistral");
                assert!(known.contains("GPT-4"));
            }
            other => panic!("expected unknown layer error, got {:?}", other),
        }
    }
}
