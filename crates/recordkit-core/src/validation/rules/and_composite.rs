use std::fmt;

use super::rule_meta;
use crate::record::Record;
use crate::validation::{Evaluation, PropertyBinding, RuleKind, RuleMeta, Validator};

/// Passes when every child passes.
///
/// Children are rebound to the composite's property. The failure message is
/// built fresh on each evaluation from the failing children's messages.
pub struct AndComposite {
    meta: RuleMeta,
    children: Vec<Box<dyn Validator>>,
}

impl AndComposite {
    pub fn new(property: impl Into<String>, mut children: Vec<Box<dyn Validator>>) -> Self {
        let property = property.into();
        for child in &mut children {
            child.rebind(&property);
        }
        Self {
            meta: RuleMeta {
                binding: PropertyBinding::Single(property),
                description: String::new(),
            },
            children,
        }
    }

    /// Append a child, bound to the composite's property.
    pub fn with(mut self, child: impl Validator + 'static) -> Self {
        let mut child: Box<dyn Validator> = Box::new(child);
        if let Some(property) = self.meta.binding.single() {
            child.rebind(property);
        }
        self.children.push(child);
        self
    }

    pub fn children(&self) -> &[Box<dyn Validator>] {
        &self.children
    }
}

impl fmt::Debug for AndComposite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AndComposite")
            .field("meta", &self.meta)
            .field("children", &self.children.len())
            .finish()
    }
}

impl Validator for AndComposite {
    rule_meta!();

    fn kind(&self) -> RuleKind {
        RuleKind::AndComposite
    }

    fn evaluate(&self, record: &dyn Record) -> Evaluation {
        let failures: Vec<String> = self
            .children
            .iter()
            .map(|child| child.evaluate(record))
            .filter(|evaluation| !evaluation.passed)
            .map(|evaluation| evaluation.message)
            .collect();

        if failures.is_empty() {
            Evaluation::pass()
        } else {
            Evaluation::fail(failures.join(" "))
        }
    }

    /// Rebinds the composite and all of its children.
    fn rebind(&mut self, property: &str) {
        self.meta.binding = PropertyBinding::Single(property.to_string());
        for child in &mut self.children {
            child.rebind(property);
        }
    }
}
