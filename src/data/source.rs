use crate::constants::columns::{EVENT_ID, SUMMARY_ROWS};
use crate::error::{ReportError, Result};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// DataSource wraps a timing table indexed by its `event_id` labels
pub struct DataSource {
    /// Materialized DataFrame, including the summary rows
    frame: DataFrame,
    /// `event_id` label of every row, in row order
    index: Vec<String>,
    /// Original file path
    file_path: PathBuf,
}

impl DataSource {
    /// Load a timing CSV
    pub fn load(path: &Path) -> Result<Self> {
        // Full-file inference keeps `event_id` textual when the summary rows
        // sit after a long run of integer ids.
        let frame = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(None)
            .finish()?
            .collect()?;

        Self::from_dataframe(frame, path.to_path_buf())
    }

    /// Create a DataSource from an already-loaded DataFrame
    pub fn from_dataframe(frame: DataFrame, file_path: PathBuf) -> Result<Self> {
        let index = frame
            .column(EVENT_ID)
            .map_err(|_| ReportError::MissingRequiredColumn {
                column: EVENT_ID.to_string(),
                source_path: file_path.clone(),
            })?
            .as_materialized_series()
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|label| label.unwrap_or("").trim().to_string())
            .collect();

        Ok(Self {
            frame,
            index,
            file_path,
        })
    }

    /// Get the file path
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Columns other than `event_id` that hold numbers, in file order
    pub fn numeric_columns(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .filter(|c| c.name().as_str() != EVENT_ID && c.dtype() != &DataType::String)
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Get a column's values as Vec<f64>
    /// Non-numeric values are converted to NaN
    pub fn column_as_f64(&self, name: &str) -> Result<Vec<f64>> {
        let series = self
            .frame
            .column(name)
            .map_err(|_| ReportError::MissingRequiredColumn {
                column: name.to_string(),
                source_path: self.file_path.clone(),
            })?
            .as_materialized_series();

        match series.cast(&DataType::Float64) {
            Ok(s) => Ok(s
                .f64()?
                .into_iter()
                .map(|opt| opt.unwrap_or(f64::NAN))
                .collect()),
            Err(_) => {
                // String columns: parse what we can
                let str_series = series.str()?;
                Ok(str_series
                    .into_iter()
                    .map(|opt| opt.and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(f64::NAN))
                    .collect())
            }
        }
    }

    /// Position of the row labelled `label`
    pub fn row_position(&self, label: &str) -> Option<usize> {
        self.index.iter().position(|l| l == label)
    }

    /// `(column, value)` pairs of a summary row, over the numeric columns
    pub fn summary_row(&self, label: &str) -> Result<Vec<(String, f64)>> {
        let row = self
            .row_position(label)
            .ok_or_else(|| ReportError::MissingSummaryRow {
                label: label.to_string(),
                source_path: self.file_path.clone(),
            })?;

        self.numeric_columns()
            .into_iter()
            .map(|name| {
                let value = self.column_as_f64(&name)?[row];
                Ok((name, value))
            })
            .collect()
    }

    /// Column values of the per-run rows, summary rows dropped
    pub fn event_values(&self, name: &str) -> Result<Vec<f64>> {
        let values = self.column_as_f64(name)?;
        Ok(values
            .into_iter()
            .zip(&self.index)
            .filter(|(_, label)| !SUMMARY_ROWS.contains(&label.as_str()))
            .map(|(v, _)| v)
            .collect())
    }

    /// `[x, y]` pairs of the per-run rows; rows missing either value are skipped
    pub fn event_points(&self, x: &str, y: &str) -> Result<Vec<[f64; 2]>> {
        let xs = self.event_values(x)?;
        let ys = self.event_values(y)?;
        Ok(xs
            .into_iter()
            .zip(ys)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(x, y)| [x, y])
            .collect())
    }
}
