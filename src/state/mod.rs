//! Session state management
//!
//! All configuration accumulated from directives lives in [`Session`]; every
//! mutation goes through [`Session::execute`].

mod bounds;
mod rules;

pub use bounds::AxisBounds;
pub use rules::{RegexRule, RuleSet};

use crate::command::{Argument, CommandQueue, Directive, DirectiveKind};
use crate::constants::config::HELP_TEXT;
use crate::error::{ReportError, Result};
use crate::render::{OutputMode, RenderContext};
use std::path::{Path, PathBuf};

/// Mutable configuration of one batch run
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Prefix prepended to every later file/directory argument
    pub input_dir: String,

    /// Prefix of every generated artifact
    pub output_dir: String,

    /// Active output modes, without duplicates; empty means `print`
    pub output_modes: Vec<OutputMode>,

    /// Accumulated axis bounds
    pub bounds: Vec<f64>,

    /// Per-file overrides
    pub regex_rules: RuleSet,

    /// Resolved CSV paths, without duplicates
    pub input_files: Vec<PathBuf>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new batch
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Run one directive against the session
    pub fn execute(&mut self, directive: &Directive) -> Result<()> {
        tracing::debug!(%directive, "executing directive");
        let (kind, argument) = match directive {
            Directive::Path(path) => return self.add_file(&path.to_string_lossy()),
            Directive::Option { kind, argument } => (*kind, argument.as_ref()),
        };

        if kind == DirectiveKind::Help {
            print_help();
            return Ok(());
        }
        let argument = argument.ok_or_else(|| ReportError::MalformedOption {
            option: kind.name().to_string(),
        })?;
        let text = argument.to_string();

        match kind {
            DirectiveKind::Dir => self.add_directory(&text),
            DirectiveKind::File => self.add_file(&text),
            DirectiveKind::Output => self.set_output_mode(&text),
            DirectiveKind::InDir => self.set_input_dir(&text),
            DirectiveKind::OutDir => self.set_output_dir(&text),
            DirectiveKind::AllDir => self.set_all_dir(&text),
            DirectiveKind::Bounds => self.add_bound(argument),
            DirectiveKind::Regex => self.add_regex_rule(&text),
            DirectiveKind::Yaml => self.run_config_file(&text),
            DirectiveKind::Help => Ok(()),
        }
    }

    /// Add every CSV file of a directory, sorted by name
    pub fn add_directory(&mut self, path: &str) -> Result<()> {
        let dir = PathBuf::from(format!("{}{}", self.input_dir, path));
        if !dir.is_dir() {
            return Err(ReportError::DirectoryNotFound { path: dir });
        }

        let mut csv_files: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        csv_files.sort();

        tracing::debug!(dir = %dir.display(), count = csv_files.len(), "adding directory");
        for file in csv_files {
            self.push_file(file);
        }
        Ok(())
    }

    /// Add one file; adding the same path twice keeps one entry
    pub fn add_file(&mut self, path: &str) -> Result<()> {
        let file = PathBuf::from(format!("{}{}", self.input_dir, path));
        if !file.exists() {
            return Err(ReportError::FileNotFound { path: file });
        }
        self.push_file(file);
        Ok(())
    }

    fn push_file(&mut self, file: PathBuf) {
        if !self.input_files.contains(&file) {
            self.input_files.push(file);
        }
    }

    /// Add an output mode, or every non-memory mode for `all`
    pub fn set_output_mode(&mut self, mode: &str) -> Result<()> {
        if mode == OutputMode::ALL_SENTINEL {
            self.output_modes = OutputMode::all_modes();
            return Ok(());
        }
        let mode = OutputMode::from_name(mode).ok_or_else(|| ReportError::UnknownOutputMode {
            mode: mode.to_string(),
            allowed: OutputMode::allowed_names(),
        })?;
        if !self.output_modes.contains(&mode) {
            self.output_modes.push(mode);
        }
        Ok(())
    }

    pub fn set_input_dir(&mut self, path: &str) -> Result<()> {
        if !Path::new(path).exists() {
            return Err(ReportError::DirectoryNotFound {
                path: PathBuf::from(path),
            });
        }
        self.input_dir = path.to_string();
        Ok(())
    }

    /// Set the output directory, creating it when absent
    pub fn set_output_dir(&mut self, path: &str) -> Result<()> {
        if !Path::new(path).exists() {
            println!("Creating {} because it does not exist.", path);
        }
        std::fs::create_dir_all(path)?;
        self.output_dir = path.to_string();
        Ok(())
    }

    /// Read a directory and write its artifacts into the same directory
    pub fn set_all_dir(&mut self, path: &str) -> Result<()> {
        self.add_directory(path)?;
        self.set_output_dir(path)
    }

    pub fn add_bound(&mut self, argument: &Argument) -> Result<()> {
        let value = argument.as_number()?;
        if !bounds::accepts_more(&self.bounds) {
            return Err(ReportError::TooManyBounds {
                count: self.bounds.len() + 1,
            });
        }
        self.bounds.push(value);
        Ok(())
    }

    pub fn add_regex_rule(&mut self, rule: &str) -> Result<()> {
        self.regex_rules.add(RegexRule::parse(rule)?);
        Ok(())
    }

    /// Execute a configuration file outside of the command queue
    fn run_config_file(&mut self, path: &str) -> Result<()> {
        let mut queue = CommandQueue::new();
        queue.push(Directive::option(DirectiveKind::Yaml, path));
        while let Some(directive) = queue.next_directive()? {
            self.execute(&directive)?;
        }
        Ok(())
    }

    /// Modes applied to files no rule matched
    pub fn effective_modes(&self) -> Vec<OutputMode> {
        if self.output_modes.is_empty() {
            vec![OutputMode::Print]
        } else {
            self.output_modes.clone()
        }
    }

    /// Output directory and axis limits for the next render
    pub fn render_context(&self) -> Result<RenderContext> {
        Ok(RenderContext {
            output_dir: self.output_dir.clone(),
            bounds: AxisBounds::resolve(&self.bounds)?,
        })
    }
}

/// Print the command line help page
pub fn print_help() {
    println!("{}", HELP_TEXT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_arguments;

    fn run(session: &mut Session, tokens: &[&str]) -> Result<()> {
        for directive in parse_arguments(tokens.iter().copied())? {
            session.execute(&directive)?;
        }
        Ok(())
    }

    #[test]
    fn output_modes_accumulate() {
        let mut session = Session::new();
        run(&mut session, &["--output", "print", "--output", "excel", "--output", "print"]).unwrap();
        assert_eq!(session.output_modes, vec![OutputMode::Print, OutputMode::Excel]);
    }

    #[test]
    fn output_all_excludes_memory_mode() {
        let mut session = Session::new();
        run(&mut session, &["--output", "png_mem", "--output", "all"]).unwrap();
        assert_eq!(session.output_modes, OutputMode::all_modes());
        assert!(!session.output_modes.contains(&OutputMode::PngMem));
    }

    #[test]
    fn unknown_output_mode_fails() {
        let mut session = Session::new();
        assert!(matches!(
            run(&mut session, &["--output", "svg"]),
            Err(ReportError::UnknownOutputMode { ref mode, .. }) if mode == "svg"
        ));
    }

    #[test]
    fn outdir_is_last_write_wins_and_created() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b").join("nested");
        let mut session = Session::new();
        run(
            &mut session,
            &["--outdir", a.to_str().unwrap(), "--outdir", b.to_str().unwrap()],
        )
        .unwrap();
        assert_eq!(session.output_dir, b.to_str().unwrap());
        assert!(a.is_dir() && b.is_dir());

        // creating an existing directory again is fine
        run(&mut session, &["--outdir", b.to_str().unwrap()]).unwrap();
    }

    #[test]
    fn add_file_is_idempotent_and_prefixed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("run_ml.csv"), "event_id\n").unwrap();
        let prefix = format!("{}/", dir.path().display());

        let mut session = Session::new();
        session.set_input_dir(&prefix).unwrap();
        session.add_file("run_ml.csv").unwrap();
        session.add_file("run_ml.csv").unwrap();
        assert_eq!(session.input_files, vec![PathBuf::from(format!("{prefix}run_ml.csv"))]);

        assert!(matches!(
            session.add_file("missing.csv"),
            Err(ReportError::FileNotFound { .. })
        ));
    }

    #[test]
    fn add_directory_collects_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b_ml.csv", "a_ml.csv", "notes.txt"] {
            std::fs::write(dir.path().join(name), "event_id\n").unwrap();
        }
        let path = dir.path().to_str().unwrap();

        let mut session = Session::new();
        session.add_file(&format!("{path}/a_ml.csv")).unwrap();
        session.add_directory(path).unwrap();
        assert_eq!(
            session.input_files,
            vec![dir.path().join("a_ml.csv"), dir.path().join("b_ml.csv")]
        );

        assert!(matches!(
            session.add_directory(&format!("{path}/nope")),
            Err(ReportError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn alldir_reads_and_writes_same_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x_mm.csv"), "event_id\n").unwrap();
        let path = format!("{}/", dir.path().display());

        let mut session = Session::new();
        run(&mut session, &["--alldir", path.as_str()]).unwrap();
        assert_eq!(session.output_dir, path);
        assert_eq!(session.input_files.len(), 1);
    }

    #[test]
    fn indir_must_exist() {
        let mut session = Session::new();
        assert!(matches!(
            session.set_input_dir("/definitely/not/here/"),
            Err(ReportError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn bounds_accumulate_up_to_four() {
        let mut session = Session::new();
        run(&mut session, &["--bounds", "0", "--bounds", "10", "--bounds", "1"]).unwrap();
        assert!(matches!(
            session.render_context(),
            Err(ReportError::TooManyBounds { count: 3 })
        ));
        run(&mut session, &["--bounds", "2"]).unwrap();
        let ctx = session.render_context().unwrap();
        assert_eq!(ctx.bounds.x, Some((0.0, 10.0)));
        assert_eq!(ctx.bounds.y, Some((1.0, 2.0)));

        assert!(matches!(
            run(&mut session, &["--bounds", "5"]),
            Err(ReportError::TooManyBounds { count: 5 })
        ));
        assert!(matches!(
            run(&mut Session::new(), &["--bounds", "high"]),
            Err(ReportError::InvalidBound { .. })
        ));
    }

    #[test]
    fn regex_rules_are_parsed_on_add() {
        let mut session = Session::new();
        run(&mut session, &["--regex", "mem = output(png_mem)"]).unwrap();
        assert_eq!(session.regex_rules.len(), 1);
        assert!(matches!(
            run(&mut session, &["--regex", "mem png_mem"]),
            Err(ReportError::MalformedRule { .. })
        ));
    }

    #[test]
    fn effective_modes_default_to_print() {
        let mut session = Session::new();
        assert_eq!(session.effective_modes(), vec![OutputMode::Print]);
        session.set_output_mode("excel").unwrap();
        assert_eq!(session.effective_modes(), vec![OutputMode::Excel]);
        session.clear();
        assert!(session.output_modes.is_empty());
    }
}
