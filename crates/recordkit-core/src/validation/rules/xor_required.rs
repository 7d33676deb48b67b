use super::rule_meta;
use crate::record::Record;
use crate::validation::{Evaluation, PropertyBinding, RuleKind, RuleMeta, Validator};

/// Exactly one of the named properties must be set.
///
/// Fails both when none is set and when two or more are.
#[derive(Debug, Clone)]
pub struct XorRequired {
    meta: RuleMeta,
}

impl XorRequired {
    pub fn new<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            meta: RuleMeta {
                binding: PropertyBinding::Multiple(
                    properties.into_iter().map(Into::into).collect(),
                ),
                description: "Required.".to_string(),
            },
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = description.into();
        self
    }

    /// Number of bound properties holding a non-blank value.
    pub fn set_count(&self, record: &dyn Record) -> usize {
        self.binding()
            .properties()
            .into_iter()
            .filter(|name| record.field(name).is_some_and(|value| !value.is_blank()))
            .count()
    }
}

impl Validator for XorRequired {
    rule_meta!();

    fn kind(&self) -> RuleKind {
        RuleKind::XorRequired
    }

    fn evaluate(&self, record: &dyn Record) -> Evaluation {
        Evaluation::check(self.set_count(record) == 1, self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ComplexRecord;

    fn record(first: Option<&str>, second: Option<&str>) -> ComplexRecord {
        ComplexRecord {
            first: first.map(str::to_string),
            second: second.map(str::to_string),
            ..ComplexRecord::default()
        }
    }

    #[test]
    fn exactly_one_set() {
        let rule = XorRequired::new(["FirstProperty", "SecondProperty"]);
        assert!(rule.validate(&record(Some("a"), None)));
        assert!(rule.validate(&record(None, Some("b"))));
        assert!(rule.validate(&record(Some(""), Some("b"))));
        assert!(!rule.validate(&record(None, None)));
        assert!(!rule.validate(&record(Some("a"), Some("b"))));
    }

    #[test]
    fn multi_property_name() {
        let rule = XorRequired::new(["FirstProperty", "SecondProperty"]);
        assert_eq!(rule.property_name(), "[FirstProperty, SecondProperty]");
        assert_eq!(rule.description(), "Required.");
    }
}
