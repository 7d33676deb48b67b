use tracing::{debug, trace};

use crate::field::FieldRef;
use crate::record::{is_empty, Record};
use crate::validation::{BrokenRule, Validator};

/// Evaluates a record's validators and aggregates their failures.
///
/// Broken rules are recomputed on every query; only the validator list itself
/// is cached (in the record's [`RuleSet`](crate::RuleSet)).
pub struct ValidationEngine<'a> {
    record: &'a dyn Record,
}

impl<'a> ValidationEngine<'a> {
    pub fn new(record: &'a dyn Record) -> Self {
        Self { record }
    }

    /// Every broken rule of this record, in validator order.
    pub fn broken_rules(&self) -> Vec<BrokenRule> {
        self.collect(None)
    }

    /// Broken rules whose property name equals `property`.
    ///
    /// An empty query means all rules. Multi-property and composite rules
    /// surface only under their own name, never under the fields they read.
    pub fn broken_rules_for(&self, property: &str) -> Vec<BrokenRule> {
        match property.trim() {
            "" => self.collect(None),
            name => self.collect(Some(name)),
        }
    }

    /// One line per broken rule on `property`, or `None` when it is valid.
    pub fn property_error(&self, property: &str) -> Option<String> {
        join_lines(
            self.broken_rules_for(property)
                .iter()
                .map(ToString::to_string)
                .collect(),
        )
    }

    /// This record's broken rules followed by the errors of its non-empty
    /// children, each child line prefixed with the field path.
    pub fn error(&self) -> Option<String> {
        let mut lines: Vec<String> = self
            .broken_rules()
            .iter()
            .map(ToString::to_string)
            .collect();

        for descriptor in self.record.catalog() {
            match self.record.field(descriptor.name) {
                Some(FieldRef::Record(child)) => {
                    let prefix = format!("{}.", descriptor.name);
                    child_lines(child, &prefix, &mut lines);
                }
                Some(FieldRef::List(items)) => {
                    for index in 0..items.len() {
                        if let Some(child) = items.get(index) {
                            let prefix = format!("{}[{index}].", descriptor.name);
                            child_lines(child, &prefix, &mut lines);
                        }
                    }
                }
                _ => {}
            }
        }

        join_lines(lines)
    }

    pub fn is_valid(&self) -> bool {
        self.error().is_none()
    }

    pub fn is_empty(&self) -> bool {
        is_empty(self.record)
    }

    fn collect(&self, property: Option<&str>) -> Vec<BrokenRule> {
        let evaluate = |rules: &[Box<dyn Validator>]| -> Vec<BrokenRule> {
            rules
                .iter()
                .filter_map(|rule| {
                    let property_name = rule.property_name();
                    if property.is_some_and(|wanted| wanted != property_name) {
                        return None;
                    }
                    let evaluation = rule.evaluate(self.record);
                    if evaluation.passed {
                        return None;
                    }
                    trace!(
                        record = self.record.type_name(),
                        property = %property_name,
                        kind = %rule.kind(),
                        "broken rule"
                    );
                    Some(BrokenRule {
                        property_name,
                        description: evaluation.message,
                        kind: rule.kind(),
                    })
                })
                .collect()
        };

        match self.record.rule_set() {
            Some(cache) => evaluate(cache.get_or_create(self.record)),
            None => {
                let rules = self.record.create_rules();
                if !rules.is_empty() {
                    debug!(
                        record = self.record.type_name(),
                        rules = rules.len(),
                        "rebuilding validation rules; record keeps no rule set"
                    );
                }
                evaluate(rules.as_slice())
            }
        }
    }
}

fn child_lines(child: &dyn Record, prefix: &str, lines: &mut Vec<String>) {
    if is_empty(child) {
        return;
    }
    if let Some(error) = ValidationEngine::new(child).error() {
        lines.extend(error.lines().map(|line| format!("{prefix}{line}")));
    }
}

fn join_lines(lines: Vec<String>) -> Option<String> {
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{ComplexRecord, ListRecord};
    use crate::validation::RuleKind;

    fn valid_complex() -> ComplexRecord {
        ComplexRecord {
            required: Some("hello".to_string()),
            ..ComplexRecord::default()
        }
    }

    #[test]
    fn default_fixture_breaks_only_required() {
        let record = ComplexRecord::default();
        let broken = ValidationEngine::new(&record).broken_rules();
        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0].property_name, "RequiredProperty");
        assert_eq!(broken[0].kind, RuleKind::Required);
    }

    #[test]
    fn valid_record_has_no_error() {
        let record = valid_complex();
        let engine = ValidationEngine::new(&record);
        assert!(engine.broken_rules().is_empty());
        assert!(engine.error().is_none());
        assert!(engine.is_valid());
    }

    #[test]
    fn blank_record_is_empty() {
        let blank = ComplexRecord::blank();
        assert!(ValidationEngine::new(&blank).is_empty());
        assert!(!ValidationEngine::new(&valid_complex()).is_empty());
    }

    #[test]
    fn empty_children_contribute_no_errors() {
        let record = valid_complex();
        assert!(ValidationEngine::new(&record.simple).is_empty());
        assert!(ValidationEngine::new(&record).error().is_none());

        let mut list = ListRecord {
            items: vec![ComplexRecord::blank(), ComplexRecord::mock()],
        };
        assert!(ValidationEngine::new(&list.items[0]).error().is_some());
        assert!(ValidationEngine::new(&list).error().is_none());

        list.items[0].length = Some("x".to_string());
        let error = ValidationEngine::new(&list).error().unwrap();
        assert!(error.starts_with("ListOfObjects[0].RequiredProperty: Required."));
        assert!(error.lines().all(|line| line.starts_with("ListOfObjects[0].")));
    }

    #[test]
    fn filter_by_property() {
        let record = ComplexRecord {
            length: Some("much too long".to_string()),
            ..ComplexRecord::default()
        };
        let engine = ValidationEngine::new(&record);

        let length = engine.broken_rules_for("LengthProperty");
        assert_eq!(length.len(), 1);
        assert_eq!(length[0].kind, RuleKind::Length);

        assert_eq!(engine.broken_rules_for("").len(), 2);
        assert_eq!(engine.broken_rules_for("  ").len(), 2);
        assert!(engine.broken_rules_for("NoSuchProperty").is_empty());
    }

    #[test]
    fn multi_property_rule_surfaces_under_its_own_name() {
        let record = ComplexRecord {
            first: None,
            ..valid_complex()
        };
        let engine = ValidationEngine::new(&record);
        assert!(engine.broken_rules_for("FirstProperty").is_empty());

        let xor = engine.broken_rules_for("[FirstProperty, SecondProperty]");
        assert_eq!(xor.len(), 1);
        assert_eq!(xor[0].description, "This is a fail");
    }

    #[test]
    fn property_error_lines() {
        let record = ComplexRecord::default();
        let engine = ValidationEngine::new(&record);
        assert_eq!(
            engine.property_error("RequiredProperty").as_deref(),
            Some("RequiredProperty: Required.")
        );
        assert!(engine.property_error("LengthProperty").is_none());
    }

    #[test]
    fn composite_failure_under_composite_name() {
        let record = ComplexRecord {
            and: Some("Nope".to_string()),
            ..valid_complex()
        };
        let broken = ValidationEngine::new(&record).broken_rules_for("AndProperty");
        assert_eq!(broken.len(), 1);
        assert!(broken[0].description.contains("Length must be 3."));
        assert!(broken[0].description.contains("fail"));
    }

    #[test]
    fn error_includes_list_children_with_index() {
        let mut list = ListRecord::pair();
        list.items[1].required = None;
        let error = ValidationEngine::new(&list).error().unwrap();
        assert_eq!(error, "ListOfObjects[1].RequiredProperty: Required.");
    }

    #[test]
    fn broken_rules_track_mutation() {
        let mut record = ComplexRecord::default();
        assert!(!ValidationEngine::new(&record).is_valid());
        record.required = Some("now set".to_string());
        assert!(ValidationEngine::new(&record).is_valid());
    }
}
