use arrow_schema::{ArrowError, DataType};
use genenet_core::MatrixError;
use thiserror::Error;

/// Errors raised while loading a correlation store.
#[derive(Debug, Error)]
pub enum CorrelationStoreError {
    #[error("column `{column}` not found in Parquet schema")]
    ColumnNotFound { column: String },
    #[error("column `{column}` has unexpected type {actual:?}")]
    InvalidColumnType { column: String, actual: DataType },
    #[error("FixedSizeList child type must be Float32 but found {actual:?}")]
    InvalidListValueType { actual: DataType },
    #[error("invalid FixedSizeList width {actual}")]
    InvalidWidth { actual: i32 },
    #[error("column `{column}` must be non-nullable (child nullable: {nullable_child})")]
    NullableField {
        column: String,
        nullable_child: bool,
    },
    #[error("row {row} has a null `{column}` key")]
    NullKey { column: String, row: usize },
    #[error("row {row} is null")]
    NullRow { row: usize },
    #[error("row {row} contains null value at position {value_index}")]
    NullValue { row: usize, value_index: usize },
    #[error("row {row} has length {actual} but expected {expected}")]
    InvalidRowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("table `{table}` lists gene `{gene}` more than once")]
    DuplicateGene { table: String, gene: String },
    #[error("table `{table}` has {rows} rows but correlation rows are {width} wide")]
    NotSquare {
        table: String,
        rows: usize,
        width: usize,
    },
    #[error("table `{table}` not found in store")]
    TableNotFound { table: String },
    #[error("table `{table}` is not a valid correlation matrix: {source}")]
    Matrix {
        table: String,
        #[source]
        source: MatrixError,
    },
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
