use super::{bound_text, rule_builders, rule_meta};
use crate::record::Record;
use crate::validation::{Evaluation, RuleKind, RuleMeta, Validator};

/// Character length within `[min, max]`; null and empty values pass.
#[derive(Debug, Clone)]
pub struct Length {
    meta: RuleMeta,
    min: usize,
    max: usize,
}

impl Length {
    pub fn exactly(length: usize) -> Self {
        Self {
            meta: RuleMeta::new(format!("Length must be {length}.")),
            min: length,
            max: length,
        }
    }

    pub fn between(min: usize, max: usize) -> Self {
        Self {
            meta: RuleMeta::new(format!("Length must be between {min} and {max}.")),
            min,
            max,
        }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub(crate) fn accepts(&self, value: &str) -> bool {
        if value.is_empty() {
            return true;
        }
        let length = value.chars().count();
        (self.min..=self.max).contains(&length)
    }
}

rule_builders!(Length);

impl Validator for Length {
    rule_meta!();

    fn kind(&self) -> RuleKind {
        RuleKind::Length
    }

    fn evaluate(&self, record: &dyn Record) -> Evaluation {
        let passed = bound_text(record, self.binding()).map_or(true, |value| self.accepts(&value));
        Evaluation::check(passed, self.description())
    }
}
