use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExploreError {
    #[error("Column '{0}' not found in frame")]
    ColumnNotFound(String),
    #[error("Column '{0}' is not numeric")]
    ColumnNotNumeric(String),
}
