//! Identifier Table Trait - tabular sources with named columns and nullable cells

use crate::error::{NodeGroupError, Result};
use polars::prelude::*;

/// A row/column data source the ingestion adapter can read identifiers from.
///
/// Implementations:
/// - `DataFrame`: polars frames (CSV files go through `load_csv`)
/// - `JsonRecords`: batches of JSON objects
pub trait IdentifierTable {
    /// Column names in table order
    fn column_names(&self) -> Vec<String>;

    /// Every row's cell in `column`, stringified; `None` for null/absent cells
    fn column_cells(&self, column: &str) -> Result<Vec<Option<String>>>;

    fn row_count(&self) -> usize;
}

impl IdentifierTable for DataFrame {
    fn column_names(&self) -> Vec<String> {
        self.get_column_names().iter().map(|s| s.to_string()).collect()
    }

    fn column_cells(&self, column: &str) -> Result<Vec<Option<String>>> {
        let series = self
            .column(column)
            .map_err(|_| NodeGroupError::ColumnNotFound(column.to_string()))?;

        // Numeric, boolean and temporal columns are rendered through polars'
        // own string cast; nested types fail the cast.
        let as_text = series.cast(&DataType::String)?;
        let cells = as_text
            .str()?
            .into_iter()
            .map(|cell| cell.map(str::to_string))
            .collect();
        Ok(cells)
    }

    fn row_count(&self) -> usize {
        self.height()
    }
}
