pub mod fit;
pub mod source;
pub mod stats;

// Re-export key types for convenience
pub use fit::{CurveKind, FitResult, TrendFit};
pub use source::DataSource;
pub use stats::StageSummary;
