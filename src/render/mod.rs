//! Output modes and their rendering paths
//!
//! Every path prints a one-line confirmation naming the source and the
//! destination before it writes.

pub mod chart;
pub mod excel;
pub mod table;

use crate::constants::output::{IMAGE_EXTENSION, MEMORY_MARKER, SPREADSHEET_EXTENSION};
use crate::data::DataSource;
use crate::error::Result;
use crate::state::AxisBounds;
use chart::PlotSpec;
use std::fmt;
use std::path::{Path, PathBuf};

/// A named rendering path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputMode {
    /// Stage table on the console
    Print,
    /// Stage table as a spreadsheet
    Excel,
    /// Time vs nodes/edges scatter plots (plus memory plots for memory files)
    Png,
    /// Edges vs nodes scatter plot
    PngNodesEdges,
    /// Memory vs nodes/edges scatter plots only
    PngMem,
}

impl OutputMode {
    /// Every recognized mode, in canonical order
    pub const ALL: [OutputMode; 5] = [
        OutputMode::Print,
        OutputMode::Excel,
        OutputMode::Png,
        OutputMode::PngNodesEdges,
        OutputMode::PngMem,
    ];

    /// Argument selecting every mode except the memory-only one
    pub const ALL_SENTINEL: &'static str = "all";

    pub fn name(self) -> &'static str {
        match self {
            OutputMode::Print => "print",
            OutputMode::Excel => "excel",
            OutputMode::Png => "png",
            OutputMode::PngNodesEdges => "png_nodes_edges",
            OutputMode::PngMem => "png_mem",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.name() == name)
    }

    /// The modes `all` stands for
    pub fn all_modes() -> Vec<OutputMode> {
        Self::ALL
            .into_iter()
            .filter(|mode| *mode != OutputMode::PngMem)
            .collect()
    }

    /// Mode names joined for error messages
    pub fn allowed_names() -> String {
        Self::ALL
            .iter()
            .map(|mode| mode.name())
            .chain(std::iter::once(Self::ALL_SENTINEL))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where and how artifacts of one file are written
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Prefix of every artifact path
    pub output_dir: String,
    pub bounds: AxisBounds,
}

impl RenderContext {
    /// `<output_dir><stem><suffix>.<extension>`
    pub fn artifact_path(&self, source: &Path, suffix: &str, extension: &str) -> PathBuf {
        PathBuf::from(format!(
            "{}{}{}.{}",
            self.output_dir,
            file_stem(source),
            suffix,
            extension
        ))
    }

    pub fn spreadsheet_path(&self, source: &Path) -> PathBuf {
        self.artifact_path(source, "", SPREADSHEET_EXTENSION)
    }

    pub fn image_path(&self, source: &Path, suffix: &str) -> PathBuf {
        self.artifact_path(source, suffix, IMAGE_EXTENSION)
    }
}

/// File name without its last extension
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Whether a file's name marks it as carrying memory measurements
pub fn is_memory_file(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().contains(MEMORY_MARKER))
}

/// Plots an image mode draws for `path`; empty for the table modes
pub fn plots_for(mode: OutputMode, path: &Path) -> Vec<&'static PlotSpec> {
    let groups: &[&'static [PlotSpec]] = match mode {
        OutputMode::Print | OutputMode::Excel => &[],
        OutputMode::Png if is_memory_file(path) => &[chart::TIME_PLOTS, chart::MEMORY_PLOTS],
        OutputMode::Png => &[chart::TIME_PLOTS],
        OutputMode::PngNodesEdges => &[chart::GRAPH_SIZE_PLOTS],
        OutputMode::PngMem => &[chart::MEMORY_PLOTS],
    };
    groups.iter().flat_map(|group| group.iter()).collect()
}

/// Render one file in one mode
pub fn render(source: &DataSource, mode: OutputMode, ctx: &RenderContext) -> Result<()> {
    tracing::debug!(path = %source.file_path().display(), %mode, "rendering");
    match mode {
        OutputMode::Print => table::print_table(source),
        OutputMode::Excel => excel::save_to_excel(source, ctx),
        OutputMode::Png | OutputMode::PngNodesEdges | OutputMode::PngMem => {
            chart::save_plots(source, &plots_for(mode, source.file_path()), ctx)
        }
    }
}
