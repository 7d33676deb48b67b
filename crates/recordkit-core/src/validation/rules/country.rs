use super::{bound_text, rule_builders, rule_meta};
use crate::country;
use crate::record::Record;
use crate::validation::{Evaluation, RuleKind, RuleMeta, Validator};

/// Value must be an ISO 3166-1 alpha-2 code from the country table.
#[derive(Debug, Clone)]
pub struct Country {
    meta: RuleMeta,
}

impl Country {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta::new("Must be an ISO 3166-1 alpha-2 code (IT, GB, ...)."),
        }
    }
}

impl Default for Country {
    fn default() -> Self {
        Self::new()
    }
}

rule_builders!(Country);

impl Validator for Country {
    rule_meta!();

    fn kind(&self) -> RuleKind {
        RuleKind::Country
    }

    fn evaluate(&self, record: &dyn Record) -> Evaluation {
        let passed = bound_text(record, self.binding())
            .map_or(true, |code| code.is_empty() || country::is_two_letter_code(&code));
        Evaluation::check(passed, self.description())
    }
}
