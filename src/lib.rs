pub mod chart;
pub mod cli;
pub mod data;
pub mod error;
pub mod frame;
pub mod io_utils;
pub mod metrics;
pub mod pipeline;
pub mod schema;
pub mod table;
pub mod viewer;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{ChartArgs, Cli, Commands, ExploreArgs},
    frame::DataFrame,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_explore", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Explore(args) => handle_explore(&args),
        Commands::Chart(args) => handle_chart(&args),
    }
}

fn load_frame(
    input: &Path,
    delimiter: Option<u8>,
    encoding_label: Option<&str>,
) -> Result<DataFrame> {
    let delimiter = io_utils::resolve_input_delimiter(input, delimiter);
    let encoding = io_utils::resolve_encoding(encoding_label)?;
    info!(
        "Loading '{}' with delimiter '{}'",
        input.display(),
        printable_delimiter(delimiter)
    );
    DataFrame::load(input, delimiter, encoding)
        .with_context(|| format!("Loading frame from {input:?}"))
}

fn handle_explore(args: &ExploreArgs) -> Result<()> {
    let mut frame = load_frame(&args.input, args.delimiter, args.input_encoding.as_deref())?;
    println!(
        "Loaded {} row(s) across {} column(s)",
        frame.row_count(),
        frame.column_count()
    );
    print_dtype_table(&frame);

    pipeline::prepare(&mut frame, &args.date_column)?;

    println!("Processed preview:");
    table::print_table(&frame.headers(), &frame.head_rows(args.preview_rows));

    let report = metrics::compute(&frame);
    if args.json {
        let json = report.to_json().context("Serializing metrics to JSON")?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("Numeric column metrics:");
        let numeric_headers = vec![
            "column".to_string(),
            "mean".to_string(),
            "median".to_string(),
            "std_dev".to_string(),
            "range".to_string(),
            "missing".to_string(),
        ];
        table::print_table(&numeric_headers, &report.numeric_rows());
        println!("Categorical column metrics:");
        let categorical_headers = vec![
            "column".to_string(),
            "missing".to_string(),
            "distinct".to_string(),
            "top_value".to_string(),
        ];
        table::print_table(&categorical_headers, &report.categorical_rows());
    }
    info!(
        "Computed metrics for {} column(s) over {} row(s)",
        frame.column_count(),
        frame.row_count()
    );
    Ok(())
}

fn print_dtype_table(frame: &DataFrame) {
    let headers = vec!["column".to_string(), "type".to_string()];
    let rows = frame
        .columns()
        .iter()
        .map(|column| vec![column.name.clone(), column.datatype.label().to_string()])
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
}

fn handle_chart(args: &ChartArgs) -> Result<()> {
    let mut frame = load_frame(&args.input, args.delimiter, args.input_encoding.as_deref())?;
    pipeline::prepare(&mut frame, &args.date_column)?;

    let book = viewer::ChartBook {
        source: args.input.display().to_string(),
        joint: chart::joint(&frame, &args.x, &args.y)?,
        bar: chart::bar(&frame, &args.category, &args.x)?,
        kde: chart::kde(&frame, &args.x)?,
        bubble: chart::bubble(&frame, &args.x, &args.y, &args.size)?,
        pair: chart::pair(&frame)?,
    };
    info!(
        "Opening chart window for '{}' ({} row(s))",
        args.input.display(),
        frame.row_count()
    );
    viewer::show(book)
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
