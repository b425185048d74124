//! Application-wide constants and default values
//!
//! This module centralizes the column names, label sets, file suffixes and
//! numeric tolerances used throughout the report generator.

/// Input CSV layout
pub mod columns {
    /// Row index column
    pub const EVENT_ID: &str = "event_id";

    /// Summary row holding per-column means
    pub const MEAN_ROW: &str = "mean";

    /// Summary row holding per-column standard deviations
    pub const STD_ROW: &str = "std";

    /// Rows dropped before plotting or fitting
    pub const SUMMARY_ROWS: [&str; 2] = [MEAN_ROW, STD_ROW];

    pub const NUM_NODES: &str = "num_nodes";
    pub const NUM_EDGES: &str = "7_num_edges_bg";
    pub const TOTAL_EVENT: &str = "total_event";
    pub const TOTAL_EVENT_GPU: &str = "total_event_gpu";
    pub const PEAK_MEMORY: &str = "peak_memory";

    /// Column name suffixes classifying stage timings
    pub const GPU_TIME_SUFFIX: &str = "gpu_time";
    pub const WALL_TIME_SUFFIX: &str = "time";
}

/// Stage label sets, selected by a marker in the source path
pub mod stages {
    pub const METRIC_LEARNING_MARKER: &str = "ml";
    pub const MODULE_MAP_MARKER: &str = "mm";

    pub const METRIC_LEARNING_LABELS: [&str; 7] = [
        "Metric Learning",
        "Build Graph",
        "Filtering",
        "Preprocess",
        "InteractionGNN",
        "ccInfer",
        "Total",
    ];

    pub const MODULE_MAP_LABELS: [&str; 5] =
        ["Module Map", "Preprocess", "InteractionGNN", "ccInfer", "Total"];
}

/// Output artifact naming
pub mod output {
    /// File name marker that adds memory plots to the `png` mode
    pub const MEMORY_MARKER: &str = "mem";

    pub const SPREADSHEET_EXTENSION: &str = "xlsx";
    pub const IMAGE_EXTENSION: &str = "png";

    pub const POINTS_SUFFIX: &str = "_points";
    pub const EDGES_SUFFIX: &str = "_edges";
    pub const EDGES_VS_NODES_SUFFIX: &str = "_edges_vs_nodes";
    pub const MEM_VS_NODES_SUFFIX: &str = "_mem_vs_nodes";
    pub const MEM_VS_EDGES_SUFFIX: &str = "_mem_vs_edges";
}

/// Plotting defaults
pub mod plot {
    /// Rendered image size in pixels
    pub const IMAGE_SIZE: (u32, u32) = (600, 600);

    /// Fraction of the data span added on each side of an auto-fitted axis
    pub const AXIS_PADDING: f64 = 0.05;

    /// Number of samples used to draw a fitted curve
    pub const CURVE_SAMPLES: usize = 100;

    /// Maximum number of bound entries
    pub const MAX_BOUNDS: usize = 4;
}

/// Numeric precision constants
pub mod numeric {
    /// Matrix singularity check tolerance
    pub const SINGULARITY_TOLERANCE: f64 = 1e-10;

    /// Coefficients below this magnitude are left out of fit labels
    pub const EPSILON: f64 = 1e-12;
}

/// Command-line and configuration file handling
pub mod config {
    /// Prefix marking an option token
    pub const OPTION_PREFIX: &str = "--";

    /// Nesting limit for configuration files referencing each other
    pub const MAX_CONFIG_DEPTH: usize = 16;

    pub const HELP_TEXT: &str = "
    Arguments:
        <file_name>               run on a file
        --dir <dir_name>          run on all csv files in a directory
        --file <file_name>        run on a specific file
        --output <output_mode>    add an output mode: print, excel, png, png_nodes_edges,
                                  png_mem, or all (every mode except png_mem)
        --indir <dir>             sets the input directory for later files
        --outdir <dir>            sets the output directory
        --alldir <dir>            runs on a directory and writes output next to it
        --bounds <value>          adds an axis bound (1-2 values: y-axis, 4 values: x then y)
        --regex <rule>            per-file override, e.g. \"mem = output(png_mem)\"
        --yaml <file>             reads options from a yaml file
        --help                    see this page again
";
}
