//! Correlation store fixtures written as Parquet.
//!
//! The column layout matches the store read by `genenet-providers-parquet`:
//! `table: Utf8`, `gene: Utf8` and `correlations: FixedSizeList<Float32, n>`.
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow_array::{ArrayRef, FixedSizeListArray, Float32Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::arrow_writer::ArrowWriter;

/// One named square correlation table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableFixture {
    /// Table key, e.g. `TEC`.
    pub name: String,
    /// Gene labels in row order.
    pub genes: Vec<String>,
    /// Row-major correlation values.
    pub values: Vec<f32>,
}

impl TableFixture {
    /// Builds a fixture; `values` must hold `genes.len()²` entries.
    #[must_use]
    pub fn new(name: &str, genes: &[&str], values: Vec<f32>) -> Self {
        assert_eq!(values.len(), genes.len() * genes.len(), "fixture must be square");
        Self {
            name: name.to_owned(),
            genes: genes.iter().map(|&gene| gene.to_owned()).collect(),
            values,
        }
    }

    /// Builds a symmetric table with unit diagonal from upper-triangle edges.
    #[must_use]
    pub fn from_pairs(name: &str, genes: &[&str], background: f32, pairs: &[(usize, usize, f32)]) -> Self {
        let size = genes.len();
        let mut values = vec![background; size * size];
        for index in 0..size {
            values[index * size + index] = 1.0;
        }
        for &(row, column, value) in pairs {
            values[row * size + column] = value;
            values[column * size + row] = value;
        }
        Self::new(name, genes, values)
    }
}

/// Genes of the four-gene fixture.
pub const FOUR_GENES: [&str; 4] = ["A", "B", "C", "D"];

/// TEC table with A-B at 0.9, C-D at -0.85 and every other pair at or
/// below 0.2: two edges and two components at threshold 0.75.
#[must_use]
pub fn four_gene_tec() -> TableFixture {
    TableFixture::new(
        "TEC",
        &FOUR_GENES,
        vec![
            1.0, 0.9, 0.1, 0.2, //
            0.9, 1.0, 0.15, 0.05, //
            0.1, 0.15, 1.0, -0.85, //
            0.2, 0.05, -0.85, 1.0,
        ],
    )
}

/// RNA table with the path A-B-C above 0.75 and D isolated.
#[must_use]
pub fn four_gene_rna() -> TableFixture {
    TableFixture::from_pairs("RNA", &FOUR_GENES, 0.1, &[(0, 1, 0.8), (1, 2, 0.78), (2, 3, 0.3)])
}

/// Both four-gene tables.
#[must_use]
pub fn four_gene_tables() -> Vec<TableFixture> {
    vec![four_gene_tec(), four_gene_rna()]
}

/// Genes of the block fixture.
pub const BLOCK_GENES: [&str; 12] = [
    "g00", "g01", "g02", "g03", "g04", "g05", "g06", "g07", "g08", "g09", "g10", "g11",
];

fn block_pairs(blocks: &[(usize, usize, f32)]) -> Vec<(usize, usize, f32)> {
    let mut pairs = Vec::new();
    for &(start, len, value) in blocks {
        for row in start..start + len {
            for column in row + 1..start + len {
                pairs.push((row, column, value));
            }
        }
    }
    pairs
}

/// Twelve genes in TEC cliques of 5, 4 and 2 plus one isolated gene.
///
/// At threshold 0.75 the TEC degrees are 4, 3 and 1, enough for a
/// power-law fit and a non-degenerate clustering baseline.
#[must_use]
pub fn block_tec() -> TableFixture {
    TableFixture::from_pairs(
        "TEC",
        &BLOCK_GENES,
        0.1,
        &block_pairs(&[(0, 5, 0.9), (5, 4, 0.85), (9, 2, 0.8)]),
    )
}

/// RNA counterpart of [`block_tec`] whose smallest clique falls below 0.75.
#[must_use]
pub fn block_rna() -> TableFixture {
    TableFixture::from_pairs(
        "RNA",
        &BLOCK_GENES,
        -0.1,
        &block_pairs(&[(0, 5, 0.88), (5, 4, 0.79), (9, 2, 0.7)]),
    )
}

/// Both block tables.
#[must_use]
pub fn block_tables() -> Vec<TableFixture> {
    vec![block_tec(), block_rna()]
}

/// Schema of a well-formed store with rows `width` wide.
#[must_use]
pub fn store_schema(width: usize) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("table", DataType::Utf8, false),
        Field::new("gene", DataType::Utf8, false),
        Field::new(
            "correlations",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, false)),
                i32::try_from(width).expect("width fits in i32"),
            ),
            false,
        ),
    ]))
}

/// Builds one record batch holding every table, rows in table order.
#[must_use]
pub fn store_batch(tables: &[TableFixture]) -> RecordBatch {
    let width = tables.first().map_or(0, |table| table.genes.len());
    let keys: Vec<&str> = tables
        .iter()
        .flat_map(|table| table.genes.iter().map(|_| table.name.as_str()))
        .collect();
    let genes: Vec<&str> = tables
        .iter()
        .flat_map(|table| table.genes.iter().map(String::as_str))
        .collect();
    let values = Float32Array::from_iter_values(
        tables.iter().flat_map(|table| table.values.iter().copied()),
    );
    let list = FixedSizeListArray::new(
        Arc::new(Field::new("item", DataType::Float32, false)),
        i32::try_from(width).expect("width fits in i32"),
        Arc::new(values) as ArrayRef,
        None,
    );
    RecordBatch::try_new(
        store_schema(width),
        vec![
            Arc::new(StringArray::from(keys)) as ArrayRef,
            Arc::new(StringArray::from(genes)) as ArrayRef,
            Arc::new(list) as ArrayRef,
        ],
    )
    .expect("fixture batch matches schema")
}

/// Serialises `batch` as an in-memory Parquet file.
#[must_use]
pub fn parquet_bytes(batch: &RecordBatch) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut writer =
            ArrowWriter::try_new(&mut buffer, batch.schema(), None).expect("parquet writer");
        writer.write(batch).expect("write batch");
        writer.close().expect("close writer");
    }
    buffer
}

/// Writes `batch` as a Parquet file at `path`.
pub fn write_parquet(path: &Path, batch: &RecordBatch) {
    let file = File::create(path).expect("create parquet file");
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).expect("parquet writer");
    writer.write(batch).expect("write batch");
    writer.close().expect("close writer");
}

/// Writes `tables` as a correlation store at `path`.
pub fn write_store(path: &Path, tables: &[TableFixture]) {
    write_parquet(path, &store_batch(tables));
}
