use super::source::DataSource;
use crate::constants::columns::{
    GPU_TIME_SUFFIX, MEAN_ROW, STD_ROW, TOTAL_EVENT, TOTAL_EVENT_GPU, WALL_TIME_SUFFIX,
};
use crate::constants::stages::*;
use crate::error::{ReportError, Result};
use polars::prelude::*;
use std::path::Path;

/// Per-stage timing summary: one row per pipeline stage plus the total
#[derive(Debug, Clone, PartialEq)]
pub struct StageSummary {
    pub labels: Vec<String>,
    /// `"{mean} ± {std}"` of the wall-time columns
    pub wall_time: Vec<String>,
    /// `"{mean} ± {std}"` of the GPU-time columns
    pub gpu_time: Vec<String>,
}

/// Which timing bucket a column contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingKind {
    Wall,
    Gpu,
}

/// Classify a column by name; `None` for non-timing columns
pub fn classify_column(name: &str) -> Option<TimingKind> {
    if name.ends_with(GPU_TIME_SUFFIX) || name == TOTAL_EVENT_GPU {
        Some(TimingKind::Gpu)
    } else if name.ends_with(WALL_TIME_SUFFIX) || name == TOTAL_EVENT {
        Some(TimingKind::Wall)
    } else {
        None
    }
}

/// Pick the stage label set from the marker in the source file name
pub fn stage_labels(path: &Path) -> Result<&'static [&'static str]> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    if name.contains(METRIC_LEARNING_MARKER) {
        Ok(&METRIC_LEARNING_LABELS)
    } else if name.contains(MODULE_MAP_MARKER) {
        Ok(&MODULE_MAP_LABELS)
    } else {
        Err(ReportError::MissingRequiredColumn {
            column: format!(
                "stage marker (file name must contain '{}' or '{}')",
                METRIC_LEARNING_MARKER, MODULE_MAP_MARKER
            ),
            source_path: path.to_path_buf(),
        })
    }
}

/// Format a mean/std pair the way every report shows it
pub fn format_mean_std(mean: f64, std: f64) -> String {
    format!("{:.4} \u{00B1} {:.4}", mean, std)
}

/// Build the stage summary of a timing table
pub fn stage_summary(source: &DataSource) -> Result<StageSummary> {
    let labels = stage_labels(source.file_path())?;
    let means = source.summary_row(MEAN_ROW)?;
    let stds = source.summary_row(STD_ROW)?;

    let mut wall_time = Vec::new();
    let mut gpu_time = Vec::new();
    for ((name, mean), (_, std)) in means.iter().zip(&stds) {
        match classify_column(name) {
            Some(TimingKind::Wall) => wall_time.push(format_mean_std(*mean, *std)),
            Some(TimingKind::Gpu) => gpu_time.push(format_mean_std(*mean, *std)),
            None => {}
        }
    }

    if wall_time.len() != labels.len() || gpu_time.len() != labels.len() {
        return Err(ReportError::StageCountMismatch {
            expected: labels.len(),
            wall: wall_time.len(),
            gpu: gpu_time.len(),
            source_path: source.file_path().to_path_buf(),
        });
    }

    Ok(StageSummary {
        labels: labels.iter().map(|l| l.to_string()).collect(),
        wall_time,
        gpu_time,
    })
}

impl StageSummary {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Rows as `[stage, wall, gpu]`
    pub fn rows(&self) -> impl Iterator<Item = [&str; 3]> {
        self.labels
            .iter()
            .zip(&self.wall_time)
            .zip(&self.gpu_time)
            .map(|((l, w), g)| [l.as_str(), w.as_str(), g.as_str()])
    }

    /// Convert into a polars frame for console display
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let frame = DataFrame::new(vec![
            Column::new("Stage".into(), self.labels.clone()),
            Column::new("Wall_Time".into(), self.wall_time.clone()),
            Column::new("GPU_Time".into(), self.gpu_time.clone()),
        ])?;
        Ok(frame)
    }
}
