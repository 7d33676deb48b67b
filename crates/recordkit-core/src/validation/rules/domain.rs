use super::{bound_text, rule_builders, rule_meta};
use crate::record::Record;
use crate::validation::{Evaluation, RuleKind, RuleMeta, Validator};

/// Value must exactly match one of an allowed set; null and empty values pass.
#[derive(Debug, Clone)]
pub struct Domain {
    meta: RuleMeta,
    allowed: Vec<String>,
}

impl Domain {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            meta: RuleMeta::new("Value is not allowed."),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub(crate) fn accepts(&self, value: &str) -> bool {
        value.is_empty() || self.allowed.iter().any(|allowed| allowed == value)
    }
}

rule_builders!(Domain);

impl Validator for Domain {
    rule_meta!();

    fn kind(&self) -> RuleKind {
        RuleKind::Domain
    }

    fn evaluate(&self, record: &dyn Record) -> Evaluation {
        let passed = bound_text(record, self.binding()).map_or(true, |value| self.accepts(&value));
        Evaluation::check(passed, self.description())
    }
}
