//! Tests covering correlation store ingestion from Arrow and Parquet.
use std::sync::Arc;

use arrow_array::{ArrayRef, FixedSizeListArray, Float32Array, Int32Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use bytes::Bytes;
use genenet_test_support::fixtures::{
    FOUR_GENES, TableFixture, four_gene_rna, four_gene_tables, four_gene_tec, parquet_bytes,
    store_batch, store_schema, write_store,
};
use rstest::rstest;

use crate::{CorrelationStore, CorrelationStoreError};

fn load(batch: &RecordBatch) -> Result<CorrelationStore, CorrelationStoreError> {
    CorrelationStore::try_from_parquet_reader(Bytes::from(parquet_bytes(batch)))
}

fn list_array(values: Vec<f32>, width: i32, child_nullable: bool) -> FixedSizeListArray {
    FixedSizeListArray::new(
        Arc::new(Field::new("item", DataType::Float32, child_nullable)),
        width,
        Arc::new(Float32Array::from(values)) as ArrayRef,
        None,
    )
}

#[rstest]
fn loads_both_tables_from_parquet_bytes() {
    let store = load(&store_batch(&four_gene_tables())).expect("well-formed store");
    let tec = store.tec().expect("TEC present");
    let rna = store.rna().expect("RNA present");
    assert_eq!(tec.size(), 4);
    assert_eq!(tec.genes(), FOUR_GENES.map(str::to_owned).as_slice());
    assert_eq!(tec.get(2, 3), Some(-0.85));
    assert_eq!(rna.get(1, 2), Some(0.78));
    assert!(tec.same_genes(rna));
    assert_eq!(store.table_names().collect::<Vec<_>>(), vec!["RNA", "TEC"]);
}

#[rstest]
fn loads_from_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("gene_network_data.parquet");
    write_store(&path, &four_gene_tables());
    let store = CorrelationStore::try_from_parquet_path(&path).expect("file store");
    assert_eq!(store.tec().expect("TEC present").name(), "TEC");
}

#[rstest]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = CorrelationStore::try_from_parquet_path(dir.path().join("absent.parquet"))
        .expect_err("missing file");
    assert!(matches!(err, CorrelationStoreError::Io(_)));
}

#[rstest]
fn interleaved_rows_keep_per_table_order() {
    let tec = store_batch(&[four_gene_tec()]);
    let rna = store_batch(&[four_gene_rna()]);
    let store = CorrelationStore::try_from_record_batches([rna, tec]).expect("two batches");
    assert_eq!(store.tec().expect("TEC").get(0, 1), Some(0.9));
    assert_eq!(store.rna().expect("RNA").get(0, 1), Some(0.8));
}

#[rstest]
fn absent_table_is_reported() {
    let store = load(&store_batch(&[four_gene_tec()])).expect("TEC only");
    let err = store.rna().expect_err("RNA missing");
    assert!(matches!(err, CorrelationStoreError::TableNotFound { table } if table == "RNA"));
}

#[rstest]
fn non_square_table_is_rejected() {
    let fixture = TableFixture::new("TEC", &["A", "B"], vec![1.0, 0.5, 0.5, 1.0]);
    let batch = store_batch(&[fixture]);
    let truncated = batch.slice(0, 1);
    let err = load(&truncated).expect_err("one row of width two");
    assert!(matches!(
        err,
        CorrelationStoreError::NotSquare { rows: 1, width: 2, .. }
    ));
}

#[rstest]
fn duplicate_gene_is_rejected() {
    let fixture = TableFixture::new("TEC", &["A", "A"], vec![1.0, 0.5, 0.5, 1.0]);
    let err = load(&store_batch(&[fixture])).expect_err("duplicate gene");
    assert!(matches!(
        err,
        CorrelationStoreError::DuplicateGene { table, gene } if table == "TEC" && gene == "A"
    ));
}

#[rstest]
fn missing_column_is_reported() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("table", DataType::Utf8, false),
        Field::new("gene", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec!["TEC"])) as ArrayRef,
            Arc::new(StringArray::from(vec!["A"])) as ArrayRef,
        ],
    )
    .expect("batch");
    let err = load(&batch).expect_err("correlations column missing");
    assert!(matches!(
        err,
        CorrelationStoreError::ColumnNotFound { column } if column == "correlations"
    ));
}

#[rstest]
fn wrong_key_type_is_reported() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("table", DataType::Int32, false),
        store_schema(1).field(1).clone(),
        store_schema(1).field(2).clone(),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(vec![1])) as ArrayRef,
            Arc::new(StringArray::from(vec!["A"])) as ArrayRef,
            Arc::new(list_array(vec![1.0], 1, false)) as ArrayRef,
        ],
    )
    .expect("batch");
    let err = load(&batch).expect_err("integer table key");
    assert!(matches!(
        err,
        CorrelationStoreError::InvalidColumnType { column, actual: DataType::Int32 } if column == "table"
    ));
}

#[rstest]
fn nullable_correlations_are_rejected() {
    let field = Field::new(
        "correlations",
        DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), 1),
        false,
    );
    let schema = Arc::new(Schema::new(vec![
        store_schema(1).field(0).clone(),
        store_schema(1).field(1).clone(),
        field,
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec!["TEC"])) as ArrayRef,
            Arc::new(StringArray::from(vec!["A"])) as ArrayRef,
            Arc::new(list_array(vec![1.0], 1, true)) as ArrayRef,
        ],
    )
    .expect("batch");
    let err = load(&batch).expect_err("nullable child");
    assert!(matches!(
        err,
        CorrelationStoreError::NullableField { nullable_child: true, .. }
    ));
}

#[rstest]
fn null_keys_are_rejected() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("table", DataType::Utf8, true),
        store_schema(1).field(1).clone(),
        store_schema(1).field(2).clone(),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec![None::<&str>])) as ArrayRef,
            Arc::new(StringArray::from(vec!["A"])) as ArrayRef,
            Arc::new(list_array(vec![1.0], 1, false)) as ArrayRef,
        ],
    )
    .expect("batch");
    let err = CorrelationStore::try_from_record_batches([batch]).expect_err("null table key");
    assert!(matches!(
        err,
        CorrelationStoreError::NullKey { column, row: 0 } if column == "table"
    ));
}

#[rstest]
fn empty_store_has_no_tables() {
    let batch = RecordBatch::new_empty(store_schema(3));
    let store = load(&batch).expect("empty but valid");
    assert_eq!(store.table_names().count(), 0);
}
