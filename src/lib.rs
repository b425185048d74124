//! Report generator for pipeline benchmark timings
//!
//! Reads timing CSVs produced by a profiling harness and renders them as
//! console tables, spreadsheets, or scatter plots with fitted trend curves.

pub mod command;
pub mod constants;
pub mod data;
pub mod error;
pub mod perf;
pub mod plotter;
pub mod processor;
pub mod render;
pub mod state;

pub use command::{Argument, CommandQueue, Directive, DirectiveKind};
pub use error::{ReportError, Result};
pub use plotter::Plotter;
pub use render::OutputMode;
pub use state::Session;
