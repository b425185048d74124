//! Directives and the command queue
//!
//! Command-line tokens and configuration files both become an ordered list of
//! [`Directive`]s. Order matters: scalar settings are last-write-wins, list
//! settings append. Configuration references are expanded lazily by
//! [`CommandQueue::next_directive`], in place, so the directives a file
//! declares run exactly where the reference stood.

use crate::constants::config::{MAX_CONFIG_DEPTH, OPTION_PREFIX};
use crate::error::{ReportError, Result};
use serde_yaml::Value;
use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};

/// Argument carried by a directive
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Text(String),
    Number(f64),
}

impl Argument {
    /// Numeric value, parsing text arguments
    pub fn as_number(&self) -> Result<f64> {
        match self {
            Argument::Number(n) => Ok(*n),
            Argument::Text(s) => s.trim().parse::<f64>().map_err(|_| ReportError::InvalidBound {
                value: s.clone(),
            }),
        }
    }

    /// Text coerced to a number when it looks like one
    pub fn coerce(text: &str) -> Self {
        match text.trim().parse::<f64>() {
            Ok(n) => Argument::Number(n),
            Err(_) => Argument::Text(text.to_string()),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Text(s) => write!(f, "{}", s),
            Argument::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Argument {
    fn from(s: &str) -> Self {
        Argument::Text(s.to_string())
    }
}

impl From<f64> for Argument {
    fn from(n: f64) -> Self {
        Argument::Number(n)
    }
}

/// The directive vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Dir,
    File,
    Output,
    InDir,
    OutDir,
    AllDir,
    Bounds,
    Regex,
    Yaml,
    Help,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 10] = [
        DirectiveKind::Dir,
        DirectiveKind::File,
        DirectiveKind::Output,
        DirectiveKind::InDir,
        DirectiveKind::OutDir,
        DirectiveKind::AllDir,
        DirectiveKind::Bounds,
        DirectiveKind::Regex,
        DirectiveKind::Yaml,
        DirectiveKind::Help,
    ];

    /// Option name, without the `--` prefix
    pub fn name(self) -> &'static str {
        match self {
            DirectiveKind::Dir => "dir",
            DirectiveKind::File => "file",
            DirectiveKind::Output => "output",
            DirectiveKind::InDir => "indir",
            DirectiveKind::OutDir => "outdir",
            DirectiveKind::AllDir => "alldir",
            DirectiveKind::Bounds => "bounds",
            DirectiveKind::Regex => "regex",
            DirectiveKind::Yaml => "yaml",
            DirectiveKind::Help => "help",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn takes_argument(self) -> bool {
        self != DirectiveKind::Help
    }
}

/// One parsed unit of configuration
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Bare positional path, executed like `file`
    Path(PathBuf),
    /// `--<kind> <argument>`
    Option {
        kind: DirectiveKind,
        argument: Option<Argument>,
    },
}

impl Directive {
    /// Build an option directive from its name
    pub fn new(name: &str, argument: Option<Argument>) -> Result<Self> {
        let kind = DirectiveKind::from_name(name).ok_or_else(|| ReportError::UnknownDirective {
            name: name.to_string(),
        })?;
        if kind.takes_argument() && argument.is_none() {
            return Err(ReportError::MalformedOption {
                option: name.to_string(),
            });
        }
        Ok(Directive::Option { kind, argument })
    }

    pub fn option(kind: DirectiveKind, argument: impl Into<Argument>) -> Self {
        Directive::Option {
            kind,
            argument: Some(argument.into()),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Path(path) => write!(f, "{}", path.display()),
            Directive::Option {
                kind,
                argument: Some(arg),
            } => write!(f, "{}{} {}", OPTION_PREFIX, kind.name(), arg),
            Directive::Option {
                kind,
                argument: None,
            } => write!(f, "{}{}", OPTION_PREFIX, kind.name()),
        }
    }
}

/// Turn command-line tokens into directives, preserving their order
pub fn parse_arguments<I, S>(args: I) -> Result<Vec<Directive>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = args.into_iter();
    let mut directives = Vec::new();

    while let Some(token) = tokens.next() {
        let token = token.as_ref();
        match token.strip_prefix(OPTION_PREFIX) {
            Some(name) => {
                let takes_argument =
                    DirectiveKind::from_name(name).is_none_or(|kind| kind.takes_argument());
                let argument = if takes_argument {
                    let value = tokens.next().ok_or_else(|| ReportError::MalformedOption {
                        option: name.to_string(),
                    })?;
                    Some(Argument::Text(value.as_ref().to_string()))
                } else {
                    None
                };
                directives.push(Directive::new(name, argument)?);
            }
            None => {
                let path = PathBuf::from(token);
                if !path.exists() {
                    return Err(ReportError::PathNotFound { path });
                }
                directives.push(Directive::Path(path));
            }
        }
    }

    Ok(directives)
}

/// Read the directives a configuration file declares
pub fn load_config_file(path: &Path) -> Result<Vec<Directive>> {
    let text = std::fs::read_to_string(path)?;
    parse_config(&text, path)
}

/// Parse configuration text: a mapping from option name to a value or a
/// sequence of values, each value becoming one directive
pub fn parse_config(text: &str, path: &Path) -> Result<Vec<Directive>> {
    let invalid = |reason: String| ReportError::InvalidConfig {
        path: path.to_path_buf(),
        reason,
    };

    let document: Value = serde_yaml::from_str(text)?;
    let mapping = match document {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(Vec::new()),
        _ => return Err(invalid("top level must be a mapping".to_string())),
    };

    let mut directives = Vec::new();
    for (key, value) in mapping {
        let name = key
            .as_str()
            .ok_or_else(|| invalid(format!("option names must be strings, got {:?}", key)))?
            .to_string();
        let values = match value {
            Value::Sequence(entries) => entries,
            scalar => vec![scalar],
        };
        let numeric = DirectiveKind::from_name(&name) == Some(DirectiveKind::Bounds);
        for entry in values {
            let argument = scalar_argument(entry, numeric)
                .map_err(|v| invalid(format!("'{}' has a non-scalar value {:?}", name, v)))?;
            directives.push(Directive::new(&name, argument)?);
        }
    }
    Ok(directives)
}

/// YAML numbers stay numbers only where a number is expected; elsewhere they
/// become their YAML rendering, so `outdir: 2024` names `2024`. The YAML
/// parser has already normalized unquoted floats (`2024.10` reads as
/// `2024.1`), so such paths must be quoted.
fn scalar_argument(value: Value, numeric: bool) -> std::result::Result<Option<Argument>, Value> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(Argument::Text(b.to_string()))),
        Value::Number(n) => match n.as_f64() {
            Some(f) if numeric => Ok(Some(Argument::Number(f))),
            _ => Ok(Some(Argument::Text(n.to_string()))),
        },
        Value::String(s) => Ok(Some(Argument::Text(s))),
        other => Err(other),
    }
}

/// Ordered worklist of pending directives
#[derive(Debug, Default)]
pub struct CommandQueue {
    /// Pending directives with the configuration nesting depth they came from
    pending: VecDeque<(Directive, usize)>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directive: Directive) {
        self.pending.push_back((directive, 0));
    }

    pub fn extend(&mut self, directives: impl IntoIterator<Item = Directive>) {
        self.pending
            .extend(directives.into_iter().map(|directive| (directive, 0)));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Pop the next executable directive, splicing configuration files in
    /// where they are referenced
    pub fn next_directive(&mut self) -> Result<Option<Directive>> {
        while let Some((directive, depth)) = self.pending.pop_front() {
            let path = match directive {
                Directive::Option {
                    kind: DirectiveKind::Yaml,
                    argument: Some(ref arg),
                } => PathBuf::from(arg.to_string()),
                other => return Ok(Some(other)),
            };

            if depth >= MAX_CONFIG_DEPTH {
                return Err(ReportError::ConfigDepthExceeded {
                    path,
                    limit: MAX_CONFIG_DEPTH,
                });
            }

            let expansion = load_config_file(&path)?;
            tracing::debug!(
                path = %path.display(),
                count = expansion.len(),
                "expanding configuration file"
            );
            for entry in expansion.into_iter().rev() {
                self.pending.push_front((entry, depth + 1));
            }
        }
        Ok(None)
    }
}
