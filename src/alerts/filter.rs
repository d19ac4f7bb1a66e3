//! Row filtering on the value column

use super::operator::{compare, Operator};
use super::AlertError;
use crate::data::{ColumnSelector, Table};

/// Regions in alert, with filtering counts
#[derive(Debug, Clone, PartialEq)]
pub struct AlertResult {
    /// Rows passing the threshold, in provider order
    pub table: Table,
    /// Name of the column the threshold was applied to
    pub value_column: String,
    pub rows_before: usize,
    pub rows_after: usize,
}

/// Keep the rows whose value column satisfies `value <operator> threshold`.
///
/// All columns and the relative order of surviving rows are preserved.
/// Fails with [`AlertError::Schema`] when no column matches the selector.
pub fn filter(
    mut table: Table,
    selector: &ColumnSelector,
    threshold: f64,
    operator: Operator,
) -> Result<AlertResult, AlertError> {
    let index = table
        .find_column(selector)
        .ok_or_else(|| AlertError::Schema {
            selector: selector.to_string(),
            columns: table.columns().to_vec(),
        })?;
    let value_column = table.columns()[index].clone();

    let mask = table
        .column_values(index)
        .enumerate()
        .map(|(row, value)| {
            compare(value, threshold, operator).map_err(|e| {
                tracing::warn!(column = %value_column, row, "Non-numeric value in alert column");
                e
            })
        })
        .collect::<Result<Vec<bool>, AlertError>>()?;

    let rows_before = table.len();
    table.retain_rows(&mask);
    let rows_after = table.len();

    tracing::info!(
        column = %value_column,
        threshold,
        operator = %operator,
        "Filter the table to keep only rows in alert: {} lines before filtering, {} lines after filtering",
        rows_before,
        rows_after
    );

    Ok(AlertResult {
        table,
        value_column,
        rows_before,
        rows_after,
    })
}
