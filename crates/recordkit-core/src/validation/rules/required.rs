use super::{bound_value, rule_builders, rule_meta};
use crate::field::FieldRef;
use crate::record::Record;
use crate::validation::{Evaluation, RuleKind, RuleMeta, Validator};

/// Fails when the value is null, an empty string or an empty nested record.
///
/// Lists and text lists always pass. A binding that names no field fails.
#[derive(Debug, Clone)]
pub struct Required {
    meta: RuleMeta,
}

impl Required {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta::new("Required."),
        }
    }
}

impl Default for Required {
    fn default() -> Self {
        Self::new()
    }
}

rule_builders!(Required);

impl Validator for Required {
    rule_meta!();

    fn kind(&self) -> RuleKind {
        RuleKind::Required
    }

    fn evaluate(&self, record: &dyn Record) -> Evaluation {
        let present = match bound_value(record, self.binding()) {
            Some(FieldRef::TextList(_) | FieldRef::List(_)) => true,
            Some(value) => !value.is_blank(),
            None => false,
        };
        Evaluation::check(present, self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{ComplexRecord, SimpleRecord};

    #[test]
    fn null_and_empty_fail() {
        let rule = Required::new().on("SimpleProperty");
        let mut record = SimpleRecord::default();
        assert!(!rule.validate(&record));

        record.simple = Some(String::new());
        assert!(!rule.validate(&record));

        record.simple = Some("x".to_string());
        assert!(rule.validate(&record));
    }

    #[test]
    fn nullable_scalars() {
        let rule = Required::new().on("DecimalProperty");
        let mut record = SimpleRecord::default();
        let evaluation = rule.evaluate(&record);
        assert!(!evaluation.passed);
        assert_eq!(evaluation.message, "Required.");

        record.decimal = Some(rust_decimal::Decimal::ZERO);
        assert!(rule.validate(&record));
    }

    #[test]
    fn empty_nested_record_fails() {
        let rule = Required::new().on("SimpleObject");
        let mut record = ComplexRecord::blank();
        assert!(!rule.validate(&record));

        record.simple.decimal = Some(rust_decimal::Decimal::ONE);
        assert!(rule.validate(&record));
    }

    #[test]
    fn unknown_property_fails() {
        let record = SimpleRecord::default();
        assert!(!Required::new().on("Missing").validate(&record));
        assert!(!Required::new().validate(&record));
    }
}
