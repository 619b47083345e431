//! Parquet-backed correlation store holding the TEC and RNA matrices.
//!
//! The store is a single Parquet file with one row per gene and table:
//! a `table` key, a `gene` label and a `correlations` row of type
//! `FixedSizeList<Float32, n>`. Rows of one table, in file order, form that
//! table's square correlation matrix.

mod errors;
mod ingest;
mod store;

pub use errors::CorrelationStoreError;
pub use store::{
    CORRELATIONS_COLUMN, CorrelationStore, GENE_COLUMN, RNA_TABLE, TABLE_COLUMN, TEC_TABLE,
};

#[cfg(test)]
mod tests;
