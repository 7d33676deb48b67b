use regex::Regex as Compiled;

use super::{bound_text, rule_builders, rule_meta};
use crate::error::{Result, RuleError};
use crate::record::Record;
use crate::validation::{Evaluation, RuleKind, RuleMeta, Validator};

/// Value must contain a match of a regular expression; null and empty values pass.
#[derive(Debug, Clone)]
pub struct Regex {
    meta: RuleMeta,
    pattern: Compiled,
}

impl Regex {
    /// Compile `pattern`; an invalid pattern is rejected here rather than at evaluation.
    pub fn new(pattern: &str) -> Result<Self> {
        let compiled = Compiled::new(pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            meta: RuleMeta::new("Unrecognized format."),
            pattern: compiled,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

rule_builders!(Regex);

impl Validator for Regex {
    rule_meta!();

    fn kind(&self) -> RuleKind {
        RuleKind::Regex
    }

    fn evaluate(&self, record: &dyn Record) -> Evaluation {
        let passed = bound_text(record, self.binding())
            .map_or(true, |value| value.is_empty() || self.pattern.is_match(&value));
        Evaluation::check(passed, self.description())
    }
}
