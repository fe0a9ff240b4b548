//! Per-column summary statistics over a processed frame.
//!
//! Numeric columns report mean, median, sample standard deviation, range,
//! and missing count; every other column (text, boolean, date) reports
//! missing count, distinct count, and the most frequent value. The frame is
//! never mutated and the results are deterministic: the most frequent value
//! breaks ties by highest count, then lexicographically smallest value.

use itertools::Itertools;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::{data::Value, frame::DataFrame};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericMetrics {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub range: Option<f64>,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalMetrics {
    pub missing: usize,
    pub distinct: usize,
    pub top_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnMetrics {
    Numeric(NumericMetrics),
    Categorical(CategoricalMetrics),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsReport {
    pub entries: Vec<(String, ColumnMetrics)>,
}

pub fn compute(frame: &DataFrame) -> MetricsReport {
    let entries = frame
        .columns()
        .iter()
        .map(|column| {
            let metrics = if column.is_numeric() {
                ColumnMetrics::Numeric(numeric_metrics(
                    &column.numeric_values(),
                    column.missing_count(),
                ))
            } else {
                ColumnMetrics::Categorical(categorical_metrics(&column.values))
            };
            (column.name.clone(), metrics)
        })
        .collect();
    MetricsReport { entries }
}

fn numeric_metrics(values: &[Option<f64>], missing: usize) -> NumericMetrics {
    let mut present = Vec::new();
    let mut sum = 0.0;
    let mut sum_squares = 0.0;
    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;
    for value in values.iter().flatten() {
        sum += value;
        sum_squares += value * value;
        min = Some(min.map_or(*value, |m| m.min(*value)));
        max = Some(max.map_or(*value, |m| m.max(*value)));
        present.push(*value);
    }
    let count = present.len();
    let mean = (count > 0).then(|| sum / count as f64);
    let std_dev = (count > 1).then(|| {
        let mean = sum / count as f64;
        let variance = (sum_squares - count as f64 * mean * mean) / (count as f64 - 1.0);
        variance.max(0.0).sqrt()
    });
    let range = min.zip(max).map(|(lo, hi)| hi - lo);
    NumericMetrics {
        mean,
        median: median(&mut present),
        std_dev,
        range,
        missing,
    }
}

fn median(values: &mut Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

fn categorical_metrics(values: &[Option<Value>]) -> CategoricalMetrics {
    let missing = values.iter().filter(|v| v.is_none()).count();
    let counts = values
        .iter()
        .flatten()
        .map(Value::as_display)
        .counts();
    let distinct = counts.len();
    let top_value = counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .next()
        .map(|(value, _)| value);
    CategoricalMetrics {
        missing,
        distinct,
        top_value,
    }
}

impl MetricsReport {
    pub fn numeric_rows(&self) -> Vec<Vec<String>> {
        self.entries
            .iter()
            .filter_map(|(name, metrics)| match metrics {
                ColumnMetrics::Numeric(m) => Some(vec![
                    name.clone(),
                    format_metric(m.mean),
                    format_metric(m.median),
                    format_metric(m.std_dev),
                    format_metric(m.range),
                    m.missing.to_string(),
                ]),
                ColumnMetrics::Categorical(_) => None,
            })
            .collect()
    }

    pub fn categorical_rows(&self) -> Vec<Vec<String>> {
        self.entries
            .iter()
            .filter_map(|(name, metrics)| match metrics {
                ColumnMetrics::Categorical(m) => Some(vec![
                    name.clone(),
                    m.missing.to_string(),
                    m.distinct.to_string(),
                    m.top_value.clone().unwrap_or_default(),
                ]),
                ColumnMetrics::Numeric(_) => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<JsonValue> {
        let mut map = Map::new();
        for (name, metrics) in &self.entries {
            map.insert(name.clone(), serde_json::to_value(metrics)?);
        }
        Ok(JsonValue::Object(map))
    }
}

fn format_metric(metric: Option<f64>) -> String {
    metric.map(format_number).unwrap_or_default()
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}
