use crate::error::CartError;
use crate::value::{Row, Value};

/// Check that `rows` is a usable training set and return its feature count.
///
/// Rejects empty input, rows with no feature columns, ragged rows, and
/// non-finite numbers, before any tree is grown.
pub(crate) fn validate(rows: &[Row]) -> Result<usize, CartError> {
    let first = rows.first().ok_or(CartError::EmptyDataset)?;
    let width = first.len();
    if width < 2 {
        return Err(CartError::ZeroFeatures);
    }

    for (row_index, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(CartError::RowLengthMismatch {
                expected: width,
                got: row.len(),
                row_index,
            });
        }
        for (column, cell) in row.iter().enumerate() {
            if let Value::Number(x) = cell
                && !x.is_finite()
            {
                return Err(CartError::NonFiniteValue { row_index, column });
            }
        }
    }

    Ok(width - 1)
}

/// The class label of a row (its last value).
///
/// Callers only pass validated rows, which always have a label.
pub(crate) fn label(row: &[Value]) -> &Value {
    &row[row.len() - 1]
}
