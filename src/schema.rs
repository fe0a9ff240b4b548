//! Column typing and sample-based schema inference.
//!
//! Inference reads up to `sample_rows` records and narrows a per-column
//! candidate set: a column starts out eligible for every type and loses a
//! candidate the first time a present value fails to parse as that type.
//! Empty cells and NA tokens are missing markers and never narrow a column.
//! Resolution picks the narrowest surviving candidate, preferring
//! `Integer` over `Float` over `Date` over `Boolean`, falling back to
//! `String`.

use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;

use crate::{
    data::{is_missing_token, parse_naive_date, parse_typed_value},
    io_utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColumnMeta {
    pub name: String,
    pub datatype: ColumnType,
}

#[derive(Debug, Clone)]
pub struct Schema {
    pub columns: Vec<ColumnMeta>,
}

#[derive(Debug, Clone)]
struct TypeCandidate {
    integer: bool,
    float: bool,
    boolean: bool,
    date: bool,
    observed: bool,
}

impl TypeCandidate {
    fn new() -> Self {
        Self {
            integer: true,
            float: true,
            boolean: true,
            date: true,
            observed: false,
        }
    }

    fn observe(&mut self, value: &str) {
        self.observed = true;
        if self.integer && value.parse::<i64>().is_err() {
            self.integer = false;
        }
        if self.float && value.parse::<f64>().is_err() {
            self.float = false;
        }
        if self.boolean {
            let lowered = value.to_ascii_lowercase();
            if !matches!(
                lowered.as_str(),
                "true" | "t" | "yes" | "y" | "1" | "false" | "f" | "no" | "n" | "0"
            ) {
                self.boolean = false;
            }
        }
        if self.date && parse_naive_date(value).is_err() {
            self.date = false;
        }
    }

    fn resolve(&self) -> ColumnType {
        if !self.observed {
            return ColumnType::String;
        }
        if self.integer {
            ColumnType::Integer
        } else if self.float {
            ColumnType::Float
        } else if self.date {
            ColumnType::Date
        } else if self.boolean {
            ColumnType::Boolean
        } else {
            ColumnType::String
        }
    }
}

pub fn infer_schema(
    path: &Path,
    sample_rows: usize,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Schema> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, true)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let mut candidates = vec![TypeCandidate::new(); headers.len()];

    let mut record = csv::ByteRecord::new();
    let mut processed = 0usize;
    while reader
        .read_byte_record(&mut record)
        .with_context(|| format!("Reading row {} while inferring types", processed + 2))?
    {
        if sample_rows > 0 && processed >= sample_rows {
            break;
        }
        for (idx, field) in record.iter().enumerate().take(headers.len()) {
            if field.is_empty() {
                continue;
            }
            let Ok(decoded) = io_utils::decode_bytes(field, encoding) else {
                continue;
            };
            let trimmed = decoded.trim();
            if is_missing_token(trimmed) {
                continue;
            }
            candidates[idx].observe(trimmed);
        }
        processed += 1;
    }

    let columns = headers
        .into_iter()
        .zip(candidates.iter())
        .map(|(name, candidate)| ColumnMeta {
            name,
            datatype: candidate.resolve(),
        })
        .collect();
    Ok(Schema { columns })
}

/// Parses one decoded record against the schema, coercing failures to missing.
///
/// Inference only samples a prefix of the file, so later rows can disagree
/// with the resolved type; a cell that no longer parses is treated as a
/// missing value rather than aborting the load.
pub fn parse_row_lossy(schema: &Schema, record: &[String]) -> Vec<Option<crate::data::Value>> {
    schema
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let raw = record.get(idx).map(|s| s.trim()).unwrap_or("");
            parse_typed_value(raw, &column.datatype).ok().flatten()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use encoding_rs::UTF_8;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn infers_narrowest_type_per_column() {
        let file = write_csv(
            "Date,Operator,Aboard,Fatalities,Survived\n\
             1972-06-14,KLM,101,53,yes\n\
             03/10/1985,Aeroflot,98,98.5,no\n",
        );
        let schema = infer_schema(file.path(), 0, b',', UTF_8).expect("infer");
        let types: Vec<ColumnType> = schema.columns.iter().map(|c| c.datatype).collect();
        assert_eq!(
            types,
            vec![
                ColumnType::Date,
                ColumnType::String,
                ColumnType::Integer,
                ColumnType::Float,
                ColumnType::Boolean,
            ]
        );
    }

    #[test]
    fn numeric_zero_one_columns_stay_integer() {
        let file = write_csv("Flag\n0\n1\n0\n");
        let schema = infer_schema(file.path(), 0, b',', UTF_8).expect("infer");
        assert_eq!(schema.columns[0].datatype, ColumnType::Integer);
    }

    #[test]
    fn na_tokens_do_not_demote_numeric_columns() {
        let file = write_csv("Aboard,Fatalities\n10,1.5\nNA,NaN\n20,n/a\n");
        let schema = infer_schema(file.path(), 0, b',', UTF_8).expect("infer");
        assert_eq!(schema.columns[0].datatype, ColumnType::Integer);
        assert_eq!(schema.columns[1].datatype, ColumnType::Float);
    }

    #[test]
    fn empty_columns_default_to_string() {
        let file = write_csv("A,B\n1,\n2,\n");
        let schema = infer_schema(file.path(), 0, b',', UTF_8).expect("infer");
        assert_eq!(schema.columns[1].datatype, ColumnType::String);
    }

    #[test]
    fn sample_limit_caps_rows_scanned() {
        // Second row would demote the column to String if it were scanned.
        let file = write_csv("A\n1\nnot-a-number\n");
        let schema = infer_schema(file.path(), 1, b',', UTF_8).expect("infer");
        assert_eq!(schema.columns[0].datatype, ColumnType::Integer);
    }

    #[test]
    fn lossy_row_parse_coerces_failures_to_missing() {
        let schema = Schema {
            columns: vec![
                ColumnMeta {
                    name: "Aboard".into(),
                    datatype: ColumnType::Integer,
                },
                ColumnMeta {
                    name: "Operator".into(),
                    datatype: ColumnType::String,
                },
            ],
        };
        let row = parse_row_lossy(&schema, &["x".to_string(), "KLM".to_string()]);
        assert_eq!(row[0], None);
        assert_eq!(row[1], Some(crate::data::Value::String("KLM".into())));
    }
}
