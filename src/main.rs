use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use glob::Pattern;
use std::fs::File;
use std::io::BufWriter;
use tablescan::pipeline;
use tablescan::pipeline::ExtractOptions;
use tablescan::reader::open_reader;
use tablescan::reader::SheetReader;
use tablescan::sink::sqlite::SqliteSink;
use tablescan::sink::ConsoleSink;
use tablescan::sink::JsonLinesSink;
use tablescan::sink::Sink;
use tablescan::Range;
use tracing_subscriber::EnvFilter;

/// Detect and extract tables from spreadsheet grids.
#[derive(Parser)]
#[command(name = "tablescan", version)]
struct Cli {
    /// Input files (.csv, .tsv)
    #[arg(required = true)]
    files: Vec<String>,

    /// Output target: console, jsonl:<path> or sqlite:<path>
    #[arg(short, long, default_value = "console")]
    output: String,

    /// Adjacency slack for region merging (0 = strictly contiguous)
    #[arg(long, default_value_t = 0)]
    gap_tolerance: usize,

    /// Ceiling for multi-row header detection
    #[arg(long, default_value_t = 2)]
    max_header_rows: usize,

    /// Minimum data rows for a table to be emitted
    #[arg(long, default_value_t = 1)]
    min_data_rows: usize,

    /// Minimum data columns for a table to be emitted
    #[arg(long, default_value_t = 1)]
    min_data_cols: usize,

    /// Sheet name glob pattern (repeatable)
    #[arg(long = "sheet")]
    sheets: Vec<String>,

    /// Maximum number of sheets to process per file
    #[arg(long)]
    sheet_limit: Option<usize>,

    /// Restrict scanning to an Excel-style range, e.g. A1:D10
    #[arg(long)]
    range: Option<String>,
}

fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = build_options(&cli)?;

    let mut readers: Vec<Box<dyn SheetReader>> = Vec::with_capacity(cli.files.len());
    for file in &cli.files {
        readers.push(open_reader(file).with_context(|| format!("open '{}'", file))?);
    }
    let mut sink = build_sink(&cli.output)?;

    let summary = pipeline::run(&readers, &options, sink.as_mut())?;
    for failure in &summary.failures {
        tracing::warn!(
            file = failure.file_name.as_str(),
            sheet = failure.sheet_name.as_str(),
            "sheet skipped: {}",
            failure.message
        );
    }
    tracing::info!(
        tables = summary.tables,
        failed_sheets = summary.failures.len(),
        "extraction finished"
    );
    if summary.tables == 0 && !summary.failures.is_empty() {
        bail!("no tables extracted and {} sheet(s) failed", summary.failures.len());
    }
    Ok(())
}

fn build_options(cli: &Cli) -> Result<ExtractOptions> {
    let sheet_name_patterns = if cli.sheets.is_empty() {
        None
    } else {
        Some(
            cli.sheets
                .iter()
                .map(|sheet| Pattern::new(sheet))
                .collect::<Result<Vec<Pattern>, _>>()
                .context("invalid sheet pattern")?,
        )
    };
    let range = cli
        .range
        .as_deref()
        .map(Range::try_from)
        .transpose()
        .context("invalid range")?;
    Ok(ExtractOptions {
        gap_tolerance: cli.gap_tolerance,
        max_header_rows: cli.max_header_rows.max(1),
        min_data_rows: cli.min_data_rows,
        min_data_cols: cli.min_data_cols,
        sheet_name_patterns,
        sheet_limit: cli.sheet_limit,
        range,
    })
}

fn build_sink(output: &str) -> Result<Box<dyn Sink>> {
    if output == "console" {
        return Ok(Box::new(ConsoleSink::stdout()));
    }
    if let Some(path) = output.strip_prefix("jsonl:") {
        let file = File::create(path).with_context(|| format!("create '{}'", path))?;
        return Ok(Box::new(JsonLinesSink::new(BufWriter::new(file))));
    }
    if let Some(path) = output.strip_prefix("sqlite:") {
        return Ok(Box::new(SqliteSink::open(path)?));
    }
    bail!("unsupported output target '{}'", output)
}
