use std::fmt;

use super::{rule_builders, rule_meta};
use crate::record::Record;
use crate::validation::{Evaluation, RuleKind, RuleMeta, Validator};

type Predicate = Box<dyn Fn(&dyn Record) -> bool>;

/// Rule backed by a caller-supplied predicate.
pub struct Delegate {
    meta: RuleMeta,
    predicate: Predicate,
}

impl Delegate {
    /// Predicate over external state; the record being validated is not consulted.
    pub fn new(description: impl Into<String>, predicate: impl Fn() -> bool + 'static) -> Self {
        Self {
            meta: RuleMeta::new(description),
            predicate: Box::new(move |_: &dyn Record| predicate()),
        }
    }

    /// Predicate over the validated record, seen as its concrete type `T`.
    ///
    /// Fails when the rule is evaluated against a record of another type.
    pub fn on_record<T: Record>(
        description: impl Into<String>,
        predicate: impl Fn(&T) -> bool + 'static,
    ) -> Self {
        Self {
            meta: RuleMeta::new(description),
            predicate: Box::new(move |record: &dyn Record| {
                record
                    .as_any()
                    .downcast_ref::<T>()
                    .is_some_and(|record| predicate(record))
            }),
        }
    }
}

rule_builders!(Delegate);

impl fmt::Debug for Delegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate").field("meta", &self.meta).finish_non_exhaustive()
    }
}

impl Validator for Delegate {
    rule_meta!();

    fn kind(&self) -> RuleKind {
        RuleKind::Delegate
    }

    fn evaluate(&self, record: &dyn Record) -> Evaluation {
        Evaluation::check((self.predicate)(record), self.description())
    }
}
