//! The sequential preparation pipeline: clean, impute, normalize dates,
//! min-max scale. Every stage mutates the frame in place and reports what it
//! changed so the caller can log progress.

use anyhow::{Context, Result};
use log::info;

use crate::{
    data::{UNKNOWN_LABEL, Value, parse_naive_date},
    frame::DataFrame,
    schema::ColumnType,
};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PrepareSummary {
    pub incomplete_rows_removed: usize,
    pub duplicate_rows_removed: usize,
    pub values_imputed: usize,
    pub dates_coerced: usize,
    pub columns_scaled: usize,
}

/// Runs stages 2-5 over the frame in order.
pub fn prepare(frame: &mut DataFrame, date_column: &str) -> Result<PrepareSummary> {
    let mut summary = PrepareSummary::default();

    summary.incomplete_rows_removed = drop_missing_rows(frame);
    info!(
        "Removed {} row(s) with missing values",
        summary.incomplete_rows_removed
    );

    summary.duplicate_rows_removed = drop_duplicate_rows(frame);
    info!(
        "Removed {} duplicate row(s)",
        summary.duplicate_rows_removed
    );

    summary.values_imputed = impute_missing(frame);
    info!("Imputed {} missing value(s)", summary.values_imputed);

    summary.dates_coerced = normalize_dates(frame, date_column)
        .with_context(|| format!("Normalizing date column '{date_column}'"))?;
    info!(
        "Parsed '{date_column}' as dates ({} value(s) coerced to missing)",
        summary.dates_coerced
    );

    summary.columns_scaled = scale_numeric(frame);
    info!(
        "Min-max scaled {} numeric column(s)",
        summary.columns_scaled
    );

    Ok(summary)
}

/// Removes every row containing at least one missing value. Returns the
/// number of rows dropped.
pub fn drop_missing_rows(frame: &mut DataFrame) -> usize {
    let before = frame.row_count();
    let keep: Vec<bool> = (0..before)
        .map(|row| {
            frame
                .columns()
                .iter()
                .all(|column| column.values[row].is_some())
        })
        .collect();
    frame.retain_rows(&keep);
    before - frame.row_count()
}

/// Removes exact-duplicate rows (all columns equal), keeping the first
/// occurrence and preserving order. Returns the number of rows dropped.
pub fn drop_duplicate_rows(frame: &mut DataFrame) -> usize {
    let before = frame.row_count();
    let mut seen = std::collections::HashSet::new();
    let keep: Vec<bool> = (0..before)
        .map(|row| {
            let key: Vec<Option<String>> = frame
                .columns()
                .iter()
                .map(|column| column.values[row].as_ref().map(Value::as_display))
                .collect();
            seen.insert(key)
        })
        .collect();
    frame.retain_rows(&keep);
    before - frame.row_count()
}

/// Fills remaining gaps: numeric columns with the column mean computed over
/// the values present before imputation, everything else with the sentinel
/// label. Columns that are entirely missing are left untouched. Returns the
/// number of cells filled.
pub fn impute_missing(frame: &mut DataFrame) -> usize {
    let mut filled = 0usize;
    for column in frame.columns_mut() {
        if column.is_numeric() {
            let present: Vec<f64> = column
                .values
                .iter()
                .filter_map(|v| v.as_ref().and_then(Value::as_f64))
                .collect();
            if present.is_empty() {
                continue;
            }
            let mean = present.iter().sum::<f64>() / present.len() as f64;
            let mut promoted = false;
            for value in &mut column.values {
                if value.is_none() {
                    *value = Some(Value::Float(mean));
                    promoted = true;
                    filled += 1;
                }
            }
            if promoted {
                column.datatype = ColumnType::Float;
            }
        } else {
            for value in &mut column.values {
                if value.is_none() {
                    *value = Some(Value::String(UNKNOWN_LABEL.to_string()));
                    filled += 1;
                }
            }
        }
    }
    filled
}

/// Retypes the designated column as dates. Values that already are dates
/// pass through; anything else is re-parsed from its display form, and
/// unparseable values become missing. Never fails on bad data; only an
/// unknown column name is an error. Returns the number of values coerced
/// to missing.
pub fn normalize_dates(frame: &mut DataFrame, column_name: &str) -> Result<usize> {
    let column = frame.column_mut(column_name)?;
    let mut coerced = 0usize;
    for value in &mut column.values {
        let replacement = match value.take() {
            Some(Value::Date(date)) => Some(Value::Date(date)),
            Some(other) => match parse_naive_date(&other.as_display()) {
                Ok(date) => Some(Value::Date(date)),
                Err(_) => {
                    coerced += 1;
                    None
                }
            },
            None => None,
        };
        *value = replacement;
    }
    column.datatype = ColumnType::Date;
    Ok(coerced)
}

/// Min-max scales every numeric column into [0, 1] in place, retyping it as
/// float. A constant column (max == min) maps to all zeroes rather than
/// dividing by zero. Missing entries stay missing. Returns the number of
/// columns scaled.
pub fn scale_numeric(frame: &mut DataFrame) -> usize {
    let mut scaled = 0usize;
    for column in frame.columns_mut() {
        if !column.is_numeric() {
            continue;
        }
        let present: Vec<f64> = column
            .values
            .iter()
            .filter_map(|v| v.as_ref().and_then(Value::as_f64))
            .collect();
        let (Some(min), Some(max)) = (
            present.iter().copied().reduce(f64::min),
            present.iter().copied().reduce(f64::max),
        ) else {
            continue;
        };
        let span = max - min;
        for value in &mut column.values {
            if let Some(numeric) = value.as_ref().and_then(Value::as_f64) {
                let scaled_value = if span == 0.0 {
                    0.0
                } else {
                    (numeric - min) / span
                };
                *value = Some(Value::Float(scaled_value));
            }
        }
        column.datatype = ColumnType::Float;
        scaled += 1;
    }
    scaled
}
