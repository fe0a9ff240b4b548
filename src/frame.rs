//! Column-major data frame owned by the analysis pipeline.
//!
//! A [`DataFrame`] is an ordered collection of named, typed columns of equal
//! length; `None` entries are the missing marker. Pipeline stages mutate the
//! frame in place; metrics and chart builders only read it.

use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;

use crate::{
    data::Value,
    error::ExploreError,
    io_utils,
    schema::{self, ColumnType},
};

/// Rows sampled for type inference before the full load, mirroring the
/// default sampling depth used when probing unfamiliar files.
pub const INFER_SAMPLE_ROWS: usize = 2000;

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub datatype: ColumnType,
    pub values: Vec<Option<Value>>,
}

impl Column {
    pub fn is_numeric(&self) -> bool {
        self.datatype.is_numeric()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Values as floats, positionally aligned; non-numeric cells are `None`.
    pub fn numeric_values(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|v| v.as_ref().and_then(Value::as_f64))
            .collect()
    }

    pub fn display_value(&self, row: usize) -> String {
        self.values
            .get(row)
            .and_then(|v| v.as_ref())
            .map(Value::as_display)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct DataFrame {
    columns: Vec<Column>,
}

impl DataFrame {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            for column in &columns {
                if column.values.len() != expected {
                    anyhow::bail!(
                        "Column '{}' has {} row(s) but '{}' has {}",
                        column.name,
                        column.values.len(),
                        first.name,
                        expected
                    );
                }
            }
        }
        Ok(Self { columns })
    }

    /// Loads a CSV file into a typed frame: infer column types from a sample,
    /// then parse every row against the inferred schema. Cells that fail to
    /// parse under their column type load as missing.
    pub fn load(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let inferred = schema::infer_schema(path, INFER_SAMPLE_ROWS, delimiter, encoding)
            .with_context(|| format!("Inferring column types from {path:?}"))?;

        let mut columns: Vec<Column> = inferred
            .columns
            .iter()
            .map(|meta| Column {
                name: meta.name.clone(),
                datatype: meta.datatype,
                values: Vec::new(),
            })
            .collect();

        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, true)?;
        io_utils::reader_headers(&mut reader, encoding)?;
        for (row_idx, record) in reader.byte_records().enumerate() {
            let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
            let decoded = io_utils::decode_record(&record, encoding)?;
            let typed = schema::parse_row_lossy(&inferred, &decoded);
            for (column, value) in columns.iter_mut().zip(typed) {
                column.values.push(value);
            }
        }
        Self::new(columns)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Result<&Column, ExploreError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ExploreError::ColumnNotFound(name.to_string()))
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column, ExploreError> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| ExploreError::ColumnNotFound(name.to_string()))
    }

    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Keeps only the rows whose mask entry is `true`, across every column.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        for column in &mut self.columns {
            let values = std::mem::take(&mut column.values);
            column.values = values
                .into_iter()
                .zip(keep.iter())
                .filter_map(|(value, keep)| keep.then_some(value))
                .collect();
        }
    }

    /// One row rendered as display strings, empty string for missing cells.
    pub fn row_display(&self, row: usize) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.display_value(row))
            .collect()
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn head_rows(&self, limit: usize) -> Vec<Vec<String>> {
        (0..self.row_count().min(limit))
            .map(|row| self.row_display(row))
            .collect()
    }
}
