use super::{bound_value, rule_builders, rule_meta};
use crate::field::FieldRef;
use crate::record::Record;
use crate::validation::{Evaluation, RuleKind, RuleMeta, Validator};

use super::Length;

/// Applies a [`Length`] check to every item of a text list.
///
/// Stops at the first offending item and reports its zero-based index in
/// the failure message.
#[derive(Debug, Clone)]
pub struct ListLength {
    meta: RuleMeta,
    item: Length,
}

impl ListLength {
    pub fn exactly(length: usize) -> Self {
        Self {
            meta: RuleMeta::new(format!("Length must be {length}")),
            item: Length::exactly(length),
        }
    }

    pub fn between(min: usize, max: usize) -> Self {
        Self {
            meta: RuleMeta::new(format!("Length must be between {min} and {max}")),
            item: Length::between(min, max),
        }
    }

    /// Index of the first item outside the allowed length, if any.
    pub fn offending_index(&self, record: &dyn Record) -> Option<usize> {
        match bound_value(record, self.binding()) {
            Some(FieldRef::TextList(items)) => {
                items.iter().position(|item| !self.item.accepts(item))
            }
            _ => None,
        }
    }
}

rule_builders!(ListLength);

impl Validator for ListLength {
    rule_meta!();

    fn kind(&self) -> RuleKind {
        RuleKind::ListLength
    }

    fn evaluate(&self, record: &dyn Record) -> Evaluation {
        match self.offending_index(record) {
            Some(index) => Evaluation::fail(format!("{} (#{index}).", self.description())),
            None => Evaluation::pass(),
        }
    }
}
