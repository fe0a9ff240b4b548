use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Explore CSV datasets: clean, normalize, summarize, chart", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the preparation pipeline and print per-column metrics
    Explore(ExploreArgs),
    /// Run the preparation pipeline and open a window with the five charts
    Chart(ChartArgs),
}

#[derive(Debug, Args)]
pub struct ExploreArgs {
    /// Input CSV file to analyze
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Column to parse as calendar dates
    #[arg(long = "date-column", default_value = "Date")]
    pub date_column: String,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Number of processed rows to preview
    #[arg(long = "preview-rows", default_value_t = 5)]
    pub preview_rows: usize,
    /// Emit metrics as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    /// Input CSV file to analyze
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Column to parse as calendar dates
    #[arg(long = "date-column", default_value = "Date")]
    pub date_column: String,
    /// Numeric column for the joint/KDE/bubble x axis
    #[arg(short = 'x', long, default_value = "Fatalities")]
    pub x: String,
    /// Numeric column for the joint/bubble y axis
    #[arg(short = 'y', long, default_value = "Aboard")]
    pub y: String,
    /// Categorical column grouped by the bar chart
    #[arg(long, default_value = "Operator")]
    pub category: String,
    /// Numeric column driving bubble sizes
    #[arg(long, default_value = "Aboard")]
    pub size: String,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
