//! Per-file override rules
//!
//! A rule reads `<substring> = <directive>(<parameter>)`, e.g.
//! `mem = output(png_mem)`: files whose name contains `mem` run the
//! `output png_mem` directive and are rendered with that mode alone.

use crate::command::{Argument, Directive, DirectiveKind};
use crate::error::{ReportError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static RULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<pattern>[^=]*?)\s*=\s*(?P<name>[A-Za-z_]+)\s*\(\s*(?P<param>[^()]*?)\s*\)\s*$")
        .expect("rule pattern is valid")
});

/// One `(substring, directive)` override
#[derive(Debug, Clone, PartialEq)]
pub struct RegexRule {
    /// Substring tested against the file name
    pub pattern: String,
    /// Directive run before a matching file is rendered
    pub directive: Directive,
}

impl RegexRule {
    /// Parse `<substring> = <directive>(<parameter>)`
    pub fn parse(rule: &str) -> Result<Self> {
        let malformed = || ReportError::MalformedRule {
            rule: rule.to_string(),
        };
        let caps = RULE_RE.captures(rule).ok_or_else(malformed)?;

        let pattern = caps["pattern"].to_string();
        if pattern.is_empty() {
            return Err(malformed());
        }

        let param = &caps["param"];
        let argument = (!param.is_empty()).then(|| Argument::coerce(param));
        let directive = Directive::new(&caps["name"], argument)?;
        if matches!(
            directive,
            Directive::Option {
                kind: DirectiveKind::Regex,
                ..
            }
        ) {
            return Err(malformed());
        }

        Ok(Self { pattern, directive })
    }

    /// Directory components never match, like the stage and memory markers
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name.to_string_lossy().contains(self.pattern.as_str()))
    }

    /// The output mode argument when this rule sets one
    pub fn output_argument(&self) -> Option<String> {
        match &self.directive {
            Directive::Option {
                kind: DirectiveKind::Output,
                argument: Some(arg),
            } => Some(arg.to_string()),
            _ => None,
        }
    }
}

/// Ordered rule list; the first matching rule wins
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<RegexRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rule: RegexRule) {
        self.rules.push(rule);
    }

    pub fn first_match(&self, path: &Path) -> Option<&RegexRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_output_rule() {
        let rule = RegexRule::parse("mem = output(png_mem)").unwrap();
        assert_eq!(rule.pattern, "mem");
        assert_eq!(rule.directive, Directive::option(DirectiveKind::Output, "png_mem"));
        assert_eq!(rule.output_argument().as_deref(), Some("png_mem"));
    }

    #[test]
    fn coerces_numeric_parameter() {
        let rule = RegexRule::parse("run_0 = bounds( 2.5 )").unwrap();
        assert_eq!(rule.directive, Directive::option(DirectiveKind::Bounds, 2.5));
        assert_eq!(rule.output_argument(), None);
    }

    #[test]
    fn parameterless_help_rule() {
        let rule = RegexRule::parse("x=help()").unwrap();
        assert_eq!(
            rule.directive,
            Directive::Option {
                kind: DirectiveKind::Help,
                argument: None
            }
        );
    }

    #[test]
    fn rejects_malformed_rules() {
        for rule in ["mem output(png)", "mem = output", " = output(png)", "a = regex(b)"] {
            assert!(
                matches!(RegexRule::parse(rule), Err(ReportError::MalformedRule { .. })),
                "{rule} should be rejected"
            );
        }
        assert!(matches!(
            RegexRule::parse("mem = colour(red)"),
            Err(ReportError::UnknownDirective { .. })
        ));
        assert!(matches!(
            RegexRule::parse("mem = output()"),
            Err(ReportError::MalformedOption { .. })
        ));
    }

    #[test]
    fn first_matching_rule_wins() {
        let mut rules = RuleSet::new();
        rules.add(RegexRule::parse("mem = output(png_mem)").unwrap());
        rules.add(RegexRule::parse("run = output(excel)").unwrap());

        let hit = rules.first_match(Path::new("data/run_mem_01.csv")).unwrap();
        assert_eq!(hit.output_argument().as_deref(), Some("png_mem"));
        let hit = rules.first_match(Path::new("data/run_02.csv")).unwrap();
        assert_eq!(hit.output_argument().as_deref(), Some("excel"));
        assert!(rules.first_match(Path::new("data/other.csv")).is_none());
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn rules_ignore_directory_names() {
        let rule = RegexRule::parse("mem = output(png_mem)").unwrap();
        assert!(!rule.matches(Path::new("/data/memtests/run_01_ml.csv")));
        assert!(rule.matches(Path::new("/data/memtests/run_mem_01_ml.csv")));
    }
}
