//! Column validation and row extraction for correlation store batches.
use arrow_array::{Array, FixedSizeListArray, Float32Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};

use crate::errors::CorrelationStoreError;

pub(crate) fn column_index(schema: &Schema, column: &str) -> Result<usize, CorrelationStoreError> {
    schema
        .index_of(column)
        .map_err(|_| CorrelationStoreError::ColumnNotFound {
            column: column.to_owned(),
        })
}

pub(crate) fn validate_key_field(field: &Field, column: &str) -> Result<(), CorrelationStoreError> {
    match field.data_type() {
        DataType::Utf8 => Ok(()),
        other => Err(CorrelationStoreError::InvalidColumnType {
            column: column.to_owned(),
            actual: other.clone(),
        }),
    }
}

pub(crate) fn validate_fixed_size_list_field(
    field: &Field,
    column: &str,
) -> Result<usize, CorrelationStoreError> {
    match field.data_type() {
        DataType::FixedSizeList(child, width) => {
            if field.is_nullable() || child.is_nullable() {
                return Err(CorrelationStoreError::NullableField {
                    column: column.to_owned(),
                    nullable_child: child.is_nullable(),
                });
            }
            if child.data_type() != &DataType::Float32 {
                return Err(CorrelationStoreError::InvalidListValueType {
                    actual: child.data_type().clone(),
                });
            }
            usize::try_from(*width)
                .ok()
                .filter(|&width| width > 0)
                .ok_or(CorrelationStoreError::InvalidWidth { actual: *width })
        }
        other => Err(CorrelationStoreError::InvalidColumnType {
            column: column.to_owned(),
            actual: other.clone(),
        }),
    }
}

pub(crate) fn string_column<'a>(
    batch: &'a RecordBatch,
    index: usize,
    column: &str,
) -> Result<&'a StringArray, CorrelationStoreError> {
    let array = batch.column(index);
    array
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| CorrelationStoreError::InvalidColumnType {
            column: column.to_owned(),
            actual: array.data_type().clone(),
        })
}

pub(crate) fn list_column<'a>(
    batch: &'a RecordBatch,
    index: usize,
    column: &str,
) -> Result<&'a FixedSizeListArray, CorrelationStoreError> {
    let array = batch.column(index);
    array
        .as_any()
        .downcast_ref::<FixedSizeListArray>()
        .ok_or_else(|| CorrelationStoreError::InvalidColumnType {
            column: column.to_owned(),
            actual: array.data_type().clone(),
        })
}

pub(crate) fn key_value<'a>(
    array: &'a StringArray,
    row_index: usize,
    absolute_row: usize,
    column: &str,
) -> Result<&'a str, CorrelationStoreError> {
    if array.is_null(row_index) {
        return Err(CorrelationStoreError::NullKey {
            column: column.to_owned(),
            row: absolute_row,
        });
    }
    Ok(array.value(row_index))
}

/// Appends one correlation row to `out`, rejecting nulls and short rows.
pub(crate) fn append_row_values(
    array: &FixedSizeListArray,
    row_index: usize,
    width: usize,
    absolute_row: usize,
    out: &mut Vec<f32>,
) -> Result<(), CorrelationStoreError> {
    if array.is_null(row_index) {
        return Err(CorrelationStoreError::NullRow { row: absolute_row });
    }
    let row = array.value(row_index);
    let floats = row.as_any().downcast_ref::<Float32Array>().ok_or_else(|| {
        CorrelationStoreError::InvalidListValueType {
            actual: row.data_type().clone(),
        }
    })?;
    if floats.len() != width {
        return Err(CorrelationStoreError::InvalidRowLength {
            row: absolute_row,
            expected: width,
            actual: floats.len(),
        });
    }
    if let Some(value_index) = (0..width).find(|&index| floats.is_null(index)) {
        return Err(CorrelationStoreError::NullValue {
            row: absolute_row,
            value_index,
        });
    }
    out.extend(floats.iter().flatten());
    Ok(())
}
