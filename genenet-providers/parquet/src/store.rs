//! Correlation store loading from Parquet files and Arrow batches.
use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    path::Path,
};

use arrow_array::{RecordBatch, RecordBatchReader};
use arrow_schema::Schema;
use genenet_core::CorrelationMatrix;
use parquet::{
    arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder},
    file::reader::ChunkReader,
};
use tracing::{debug, info, instrument};

use crate::{
    errors::CorrelationStoreError,
    ingest::{
        append_row_values, column_index, key_value, list_column, string_column,
        validate_fixed_size_list_field, validate_key_field,
    },
};

/// Column holding the table key of each row.
pub const TABLE_COLUMN: &str = "table";
/// Column holding the gene label of each row.
pub const GENE_COLUMN: &str = "gene";
/// Column holding the correlation row.
pub const CORRELATIONS_COLUMN: &str = "correlations";
/// Key of the TEC correlation table.
pub const TEC_TABLE: &str = "TEC";
/// Key of the RNA correlation table.
pub const RNA_TABLE: &str = "RNA";

/// Correlation matrices keyed by table name.
///
/// # Examples
/// ```no_run
/// use genenet_providers_parquet::CorrelationStore;
///
/// let store = CorrelationStore::try_from_parquet_path("data/gene_network_data.parquet")?;
/// let tec = store.tec()?;
/// println!("{} genes", tec.size());
/// # Ok::<(), genenet_providers_parquet::CorrelationStoreError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationStore {
    tables: BTreeMap<String, CorrelationMatrix>,
}

impl CorrelationStore {
    /// Loads every table from the Parquet file at `path`.
    ///
    /// # Errors
    /// Returns [`CorrelationStoreError::Io`] when the file cannot be opened
    /// and any schema or row validation error raised while reading it.
    #[instrument(
        name = "providers.store.load",
        err,
        skip(path),
        fields(path = %path.as_ref().display()),
    )]
    pub fn try_from_parquet_path(path: impl AsRef<Path>) -> Result<Self, CorrelationStoreError> {
        let file = File::open(path)?;
        Self::try_from_parquet_reader(file)
    }

    /// Loads every table from a Parquet reader.
    ///
    /// # Errors
    /// Returns schema errors when a required column is missing, has the
    /// wrong type or is nullable, and row errors for null keys, null values,
    /// duplicate genes or non-square tables.
    pub fn try_from_parquet_reader<R>(reader: R) -> Result<Self, CorrelationStoreError>
    where
        R: ChunkReader + Send + 'static,
    {
        let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
        let mask = ProjectionMask::columns(
            builder.parquet_schema(),
            [TABLE_COLUMN, GENE_COLUMN, CORRELATIONS_COLUMN],
        );
        let reader = builder.with_projection(mask).build()?;
        let schema = reader.schema();
        let mut accumulator = StoreAccumulator::default();
        for batch in reader {
            accumulator.push_batch(&batch?)?;
        }
        if accumulator.width.is_none() {
            // An empty file still has to carry a valid schema.
            validate_schema(&schema)?;
        }
        accumulator.finish()
    }

    /// Loads every table from in-memory Arrow batches.
    ///
    /// # Errors
    /// Returns the same validation errors as [`Self::try_from_parquet_reader`].
    pub fn try_from_record_batches(
        batches: impl IntoIterator<Item = RecordBatch>,
    ) -> Result<Self, CorrelationStoreError> {
        let mut accumulator = StoreAccumulator::default();
        for batch in batches {
            accumulator.push_batch(&batch)?;
        }
        accumulator.finish()
    }

    /// Returns the matrix stored under `table`.
    ///
    /// # Errors
    /// Returns [`CorrelationStoreError::TableNotFound`] when the store holds
    /// no rows for `table`.
    pub fn table(&self, table: &str) -> Result<&CorrelationMatrix, CorrelationStoreError> {
        self.tables
            .get(table)
            .ok_or_else(|| CorrelationStoreError::TableNotFound {
                table: table.to_owned(),
            })
    }

    /// Returns the TEC matrix.
    ///
    /// # Errors
    /// Returns [`CorrelationStoreError::TableNotFound`] when it is absent.
    pub fn tec(&self) -> Result<&CorrelationMatrix, CorrelationStoreError> {
        self.table(TEC_TABLE)
    }

    /// Returns the RNA matrix.
    ///
    /// # Errors
    /// Returns [`CorrelationStoreError::TableNotFound`] when it is absent.
    pub fn rna(&self) -> Result<&CorrelationMatrix, CorrelationStoreError> {
        self.table(RNA_TABLE)
    }

    /// Iterates over the stored table names in sorted order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

/// Resolves the three store columns, returning their indices and the row width.
fn validate_schema(schema: &Schema) -> Result<(usize, usize, usize, usize), CorrelationStoreError> {
    let table_index = column_index(schema, TABLE_COLUMN)?;
    validate_key_field(schema.field(table_index), TABLE_COLUMN)?;
    let gene_index = column_index(schema, GENE_COLUMN)?;
    validate_key_field(schema.field(gene_index), GENE_COLUMN)?;
    let list_index = column_index(schema, CORRELATIONS_COLUMN)?;
    let width = validate_fixed_size_list_field(schema.field(list_index), CORRELATIONS_COLUMN)?;
    Ok((table_index, gene_index, list_index, width))
}

#[derive(Default)]
struct TableBuffer {
    genes: Vec<String>,
    seen: BTreeSet<String>,
    values: Vec<f32>,
}

#[derive(Default)]
struct StoreAccumulator {
    tables: BTreeMap<String, TableBuffer>,
    width: Option<usize>,
    rows: usize,
}

impl StoreAccumulator {
    fn push_batch(&mut self, batch: &RecordBatch) -> Result<(), CorrelationStoreError> {
        let (table_index, gene_index, list_index, width) = validate_schema(&batch.schema())?;
        if let Some(expected) = self.width.filter(|&expected| expected != width) {
            return Err(CorrelationStoreError::InvalidRowLength {
                row: self.rows,
                expected,
                actual: width,
            });
        }
        self.width = Some(width);

        let tables = string_column(batch, table_index, TABLE_COLUMN)?;
        let genes = string_column(batch, gene_index, GENE_COLUMN)?;
        let lists = list_column(batch, list_index, CORRELATIONS_COLUMN)?;
        for row_index in 0..batch.num_rows() {
            let absolute_row = self.rows + row_index;
            let table = key_value(tables, row_index, absolute_row, TABLE_COLUMN)?;
            let gene = key_value(genes, row_index, absolute_row, GENE_COLUMN)?;
            let buffer = self.tables.entry(table.to_owned()).or_default();
            if !buffer.seen.insert(gene.to_owned()) {
                return Err(CorrelationStoreError::DuplicateGene {
                    table: table.to_owned(),
                    gene: gene.to_owned(),
                });
            }
            buffer.genes.push(gene.to_owned());
            append_row_values(lists, row_index, width, absolute_row, &mut buffer.values)?;
        }
        self.rows += batch.num_rows();
        debug!(rows = self.rows, "store batch ingested");
        Ok(())
    }

    fn finish(self) -> Result<CorrelationStore, CorrelationStoreError> {
        let width = self.width.unwrap_or(0);
        let mut tables = BTreeMap::new();
        for (name, buffer) in self.tables {
            if buffer.genes.len() != width {
                return Err(CorrelationStoreError::NotSquare {
                    table: name,
                    rows: buffer.genes.len(),
                    width,
                });
            }
            let matrix = CorrelationMatrix::try_new(name.clone(), buffer.genes, buffer.values)
                .map_err(|source| CorrelationStoreError::Matrix {
                    table: name.clone(),
                    source,
                })?;
            info!(table = %name, genes = matrix.size(), "correlation table loaded");
            tables.insert(name, matrix);
        }
        Ok(CorrelationStore { tables })
    }
}
