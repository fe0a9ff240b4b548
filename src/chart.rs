//! Chart data construction for the five supported chart kinds.
//!
//! Everything in this module is pure: it reads the processed frame and
//! produces plain point/bar series for the viewer to draw. Rows with a
//! missing coordinate are skipped, matching how the source values would
//! simply not appear on a scatter.

use anyhow::{Result, anyhow};
use itertools::Itertools;

use crate::{data::Value, error::ExploreError, frame::DataFrame};

/// Grid resolution for density curves.
const KDE_GRID_POINTS: usize = 200;
/// Bandwidth floor used when a column has no spread.
const KDE_MIN_BANDWIDTH: f64 = 0.01;
/// Categories drawn by the bar chart, highest mean first.
pub const BAR_TOP_CATEGORIES: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct KdeCurve {
    pub column: String,
    pub bandwidth: f64,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JointChart {
    pub x_name: String,
    pub y_name: String,
    pub points: Vec<[f64; 2]>,
    pub x_density: KdeCurve,
    pub y_density: KdeCurve,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub category_name: String,
    pub value_name: String,
    /// Category label and mean value, highest mean first.
    pub bars: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BubblePoint {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BubbleChart {
    pub x_name: String,
    pub y_name: String,
    pub size_name: String,
    pub points: Vec<BubblePoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PairPanel {
    Scatter(Vec<[f64; 2]>),
    Density(KdeCurve),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairGrid {
    pub columns: Vec<String>,
    /// Row-major panels: `panels[row * columns.len() + col]`.
    pub panels: Vec<PairPanel>,
}

fn numeric_series(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = frame.column(name)?;
    if !column.is_numeric() {
        return Err(ExploreError::ColumnNotNumeric(name.to_string()).into());
    }
    Ok(column.numeric_values())
}

fn paired_points(xs: &[Option<f64>], ys: &[Option<f64>]) -> Vec<[f64; 2]> {
    xs.iter()
        .zip(ys)
        .filter_map(|(x, y)| Some([(*x)?, (*y)?]))
        .collect()
}

pub fn joint(frame: &DataFrame, x: &str, y: &str) -> Result<JointChart> {
    let xs = numeric_series(frame, x)?;
    let ys = numeric_series(frame, y)?;
    Ok(JointChart {
        x_name: x.to_string(),
        y_name: y.to_string(),
        points: paired_points(&xs, &ys),
        x_density: kde(frame, x)?,
        y_density: kde(frame, y)?,
    })
}

/// Mean of a numeric column grouped by a categorical column, highest mean
/// first, capped to [`BAR_TOP_CATEGORIES`]. Ties order by category name so
/// the chart is deterministic.
pub fn bar(frame: &DataFrame, category: &str, value: &str) -> Result<BarChart> {
    let labels = frame.column(category)?;
    let values = numeric_series(frame, value)?;

    let mut sums: Vec<(String, f64, usize)> = Vec::new();
    for (label, value) in labels.values.iter().zip(&values) {
        let (Some(label), Some(value)) = (label, value) else {
            continue;
        };
        let key = match label {
            Value::String(s) => s.clone(),
            other => other.as_display(),
        };
        match sums.iter_mut().find(|(existing, _, _)| *existing == key) {
            Some((_, sum, count)) => {
                *sum += value;
                *count += 1;
            }
            None => sums.push((key, *value, 1)),
        }
    }

    let bars = sums
        .into_iter()
        .map(|(label, sum, count)| (label, sum / count as f64))
        .sorted_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(BAR_TOP_CATEGORIES)
        .collect();
    Ok(BarChart {
        category_name: category.to_string(),
        value_name: value.to_string(),
        bars,
    })
}

/// Gaussian kernel density over an evenly spaced grid spanning the data plus
/// three bandwidths of margin. Bandwidth follows Silverman's rule of thumb,
/// with a floor for constant columns.
pub fn kde(frame: &DataFrame, column: &str) -> Result<KdeCurve> {
    let samples: Vec<f64> = numeric_series(frame, column)?
        .into_iter()
        .flatten()
        .collect();
    if samples.is_empty() {
        return Err(anyhow!(
            "Column '{column}' has no values to estimate a density from"
        ));
    }

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let sigma = variance.sqrt();
    let bandwidth = if sigma > 0.0 {
        1.06 * sigma * n.powf(-0.2)
    } else {
        KDE_MIN_BANDWIDTH
    };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lo = min - 3.0 * bandwidth;
    let hi = max + 3.0 * bandwidth;
    let step = (hi - lo) / (KDE_GRID_POINTS - 1) as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    let points = (0..KDE_GRID_POINTS)
        .map(|i| {
            let x = lo + i as f64 * step;
            let density: f64 = samples
                .iter()
                .map(|sample| {
                    let z = (x - sample) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            [x, norm * density]
        })
        .collect();
    Ok(KdeCurve {
        column: column.to_string(),
        bandwidth,
        points,
    })
}

pub fn bubble(frame: &DataFrame, x: &str, y: &str, size: &str) -> Result<BubbleChart> {
    let xs = numeric_series(frame, x)?;
    let ys = numeric_series(frame, y)?;
    let sizes = numeric_series(frame, size)?;
    let points = xs
        .iter()
        .zip(&ys)
        .zip(&sizes)
        .filter_map(|((x, y), size)| {
            Some(BubblePoint {
                x: (*x)?,
                y: (*y)?,
                size: (*size)?,
            })
        })
        .collect();
    Ok(BubbleChart {
        x_name: x.to_string(),
        y_name: y.to_string(),
        size_name: size.to_string(),
        points,
    })
}

/// Pairwise grid over every numeric column: density on the diagonal,
/// scatter off it.
pub fn pair(frame: &DataFrame) -> Result<PairGrid> {
    let columns = frame.numeric_column_names();
    if columns.is_empty() {
        return Err(anyhow!("Frame has no numeric columns to pair"));
    }
    let series: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|name| numeric_series(frame, name))
        .collect::<Result<_>>()?;

    let mut panels = Vec::with_capacity(columns.len() * columns.len());
    for (row, row_name) in columns.iter().enumerate() {
        for col in 0..columns.len() {
            if row == col {
                panels.push(PairPanel::Density(kde(frame, row_name)?));
            } else {
                panels.push(PairPanel::Scatter(paired_points(
                    &series[col],
                    &series[row],
                )));
            }
        }
    }
    Ok(PairGrid { columns, panels })
}
