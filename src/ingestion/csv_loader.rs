//! CSV loading through polars

use crate::error::{NodeGroupError, Result};
use polars::prelude::*;
use std::path::Path;
use tracing::info;

/// Load a CSV file with a header row into a `DataFrame`.
///
/// Every column is read as text so identifier values keep their exact
/// spelling (`007` stays `007`). Empty fields are null.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(NodeGroupError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("CSV file not found: {}", path.display()),
        )));
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;

    info!("Loaded {} rows, {} columns from {}", df.height(), df.width(), path.display());
    Ok(df)
}
