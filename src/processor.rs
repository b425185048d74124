//! Per-file dispatch over the active output modes
//!
//! Files matched by a rule are handled first, each with the mode its rule
//! names; every other file then gets the session's active modes. A rule's
//! directive is executed against the session before its file renders, so
//! whatever it sets (an extra output mode, a bound) stays in effect for the
//! files processed after it.

use crate::data::DataSource;
use crate::error::{ReportError, Result};
use crate::render::{self, OutputMode, RenderContext};
use crate::state::{RegexRule, Session};
use std::path::{Path, PathBuf};

/// One artifact-producing step that completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub path: PathBuf,
    pub mode: OutputMode,
}

/// Render every queued file, draining the session's file list
pub fn process_files(session: &mut Session) -> Result<Vec<Rendered>> {
    let files = std::mem::take(&mut session.input_files);
    let mut rendered = Vec::new();
    let mut general = Vec::new();
    let mut matched = Vec::new();

    for file in files {
        match session.regex_rules.first_match(&file).cloned() {
            Some(rule) => {
                tracing::info!(path = %file.display(), rule = %rule.pattern, "rule override");
                rendered.extend(process_matched(session, &file, &rule)?);
                matched.push(file);
            }
            None => general.push(file),
        }
    }

    // Rule directives may have queued more files
    for file in std::mem::take(&mut session.input_files) {
        if !general.contains(&file) && !matched.contains(&file) {
            general.push(file);
        }
    }

    let modes = session.effective_modes();
    let ctx = session.render_context()?;
    for file in &general {
        rendered.extend(process_file(file, &modes, &ctx)?);
    }
    Ok(rendered)
}

fn process_matched(session: &mut Session, file: &Path, rule: &RegexRule) -> Result<Vec<Rendered>> {
    session.execute(&rule.directive)?;

    let modes = match rule.output_argument() {
        Some(arg) if arg == OutputMode::ALL_SENTINEL => OutputMode::all_modes(),
        Some(arg) => {
            let mode = OutputMode::from_name(&arg).ok_or_else(|| ReportError::UnknownOutputMode {
                mode: arg.clone(),
                allowed: OutputMode::allowed_names(),
            })?;
            vec![mode]
        }
        None => session.effective_modes(),
    };
    let ctx = session.render_context()?;
    process_file(file, &modes, &ctx)
}

/// Load one file and render it in each mode, in order
pub fn process_file(path: &Path, modes: &[OutputMode], ctx: &RenderContext) -> Result<Vec<Rendered>> {
    let source = crate::timed!("load_csv", DataSource::load(path))?;
    let mut rendered = Vec::with_capacity(modes.len());
    for &mode in modes {
        crate::timed!("render", render::render(&source, mode, ctx))?;
        rendered.push(Rendered {
            path: path.to_path_buf(),
            mode,
        });
    }
    Ok(rendered)
}
