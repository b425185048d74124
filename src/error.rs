//! Error types for stage-plotter
//!
//! Every failure is fail-fast: it is raised where it is detected and travels
//! unchanged to the CLI boundary, which prints it and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for report generation
#[derive(Error, Debug)]
pub enum ReportError {
    /// A bare positional path does not exist at parse time
    #[error("Path {} does not exist", path.display())]
    PathNotFound { path: PathBuf },

    /// A `dir`/`indir` argument does not exist
    #[error("The directory {} does not exist", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// A `file` argument does not exist
    #[error("File {} does not exist", path.display())]
    FileNotFound { path: PathBuf },

    /// Option token lacking its required argument
    #[error("Option --{option} must be followed by an argument")]
    MalformedOption { option: String },

    /// Unrecognized directive name
    #[error("Command --{name} is not defined")]
    UnknownDirective { name: String },

    /// Unrecognized `output` argument
    #[error("--output must be followed by one of the following: {allowed}")]
    UnknownOutputMode { mode: String, allowed: String },

    /// Bounds list holds an unusable number of entries
    #[error("{count} bounds supplied; use 1 or 2 for the y-axis, or 4 for both axes")]
    TooManyBounds { count: usize },

    /// Bounds argument is not a floating-point number
    #[error("Bound '{value}' is not a number")]
    InvalidBound { value: String },

    /// Regex rule does not follow `<substring> = <directive>(<parameter>)`
    #[error("Malformed rule '{rule}': expected '<substring> = <directive>(<parameter>)'")]
    MalformedRule { rule: String },

    /// Unsupported fit kind
    #[error("Curve type '{kind}' is not supported (expected linear or quadratic)")]
    InvalidCurveType { kind: String },

    /// Source table lacks an expected column or marker
    #[error("{} is missing required column {column}", source_path.display())]
    MissingRequiredColumn { column: String, source_path: PathBuf },

    /// Source table lacks a `mean`/`std` summary row
    #[error("{} has no '{label}' row in its event_id column", source_path.display())]
    MissingSummaryRow { label: String, source_path: PathBuf },

    /// Stage columns do not line up with the chosen label set
    #[error(
        "{} has {wall} wall-time and {gpu} GPU-time columns but {expected} stage labels",
        source_path.display()
    )]
    StageCountMismatch {
        expected: usize,
        wall: usize,
        gpu: usize,
        source_path: PathBuf,
    },

    /// Insufficient data for operation
    #[error("Insufficient data: {operation} requires at least {required} points, but got {actual}")]
    InsufficientData {
        operation: String,
        required: usize,
        actual: usize,
    },

    /// Configuration file is not a mapping of option names
    #[error("Invalid configuration file {}: {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },

    /// Configuration files reference each other too deeply
    #[error("Configuration file {} exceeds the nesting limit of {limit}", path.display())]
    ConfigDepthExceeded { path: PathBuf, limit: usize },

    /// File I/O error
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    /// Polars data processing error
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// YAML configuration parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Spreadsheet writer error
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// Chart drawing error
    #[error("Chart error: {0}")]
    Chart(String),
}

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    /// Wrap a plotters drawing error
    pub fn chart(err: impl std::fmt::Display) -> Self {
        ReportError::Chart(err.to_string())
    }

    /// Get a one-line message suitable for the terminal
    pub fn user_message(&self) -> String {
        match self {
            ReportError::Io(e) => format!("File error: {}", e),
            ReportError::Polars(e) => format!("Data error: {}", e),
            ReportError::Yaml(e) => format!("YAML error: {}", e),
            ReportError::Spreadsheet(e) => format!("Spreadsheet error: {}", e),
            ReportError::Chart(msg) => format!("Chart error: {}", msg),
            other => other.to_string(),
        }
    }

    /// Get a short title for the error
    pub fn title(&self) -> &'static str {
        match self {
            ReportError::PathNotFound { .. } => "Path Not Found",
            ReportError::DirectoryNotFound { .. } => "Directory Not Found",
            ReportError::FileNotFound { .. } => "File Not Found",
            ReportError::MalformedOption { .. } => "Malformed Option",
            ReportError::UnknownDirective { .. } => "Unknown Directive",
            ReportError::UnknownOutputMode { .. } => "Unknown Output Mode",
            ReportError::TooManyBounds { .. } => "Too Many Bounds",
            ReportError::InvalidBound { .. } => "Invalid Bound",
            ReportError::MalformedRule { .. } => "Malformed Rule",
            ReportError::InvalidCurveType { .. } => "Invalid Curve Type",
            ReportError::MissingRequiredColumn { .. } => "Missing Required Column",
            ReportError::MissingSummaryRow { .. } => "Missing Summary Row",
            ReportError::StageCountMismatch { .. } => "Stage Count Mismatch",
            ReportError::InsufficientData { .. } => "Insufficient Data",
            ReportError::InvalidConfig { .. } => "Configuration Error",
            ReportError::ConfigDepthExceeded { .. } => "Configuration Error",
            ReportError::Io(_) => "File Error",
            ReportError::Polars(_) => "Data Error",
            ReportError::Yaml(_) => "Configuration Error",
            ReportError::Spreadsheet(_) => "Spreadsheet Error",
            ReportError::Chart(_) => "Chart Error",
        }
    }
}
