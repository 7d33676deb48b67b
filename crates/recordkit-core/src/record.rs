use std::any::Any;

use crate::catalog::PropertyCatalog;
use crate::equality;
use crate::field::{FieldMut, FieldRef};
use crate::options::{SerializationOptions, DEFAULT_OPTIONS};
use crate::schema::Schema;
use crate::validation::{BrokenRule, RuleSet, ValidationEngine, Validator};

/// A validated, serializable domain entity.
///
/// Implementors declare their fields once in a [`Schema`] and fill the erased
/// accessors with [`record_accessors!`](crate::record_accessors):
///
/// ```ignore
/// impl Record for Customer {
///     fn schema() -> &'static Schema<Self> {
///         static SCHEMA: OnceLock<Schema<Customer>> = OnceLock::new();
///         SCHEMA.get_or_init(|| {
///             Schema::<Self>::builder("Customer")
///                 .text("Name", |c| &c.name, |c| &mut c.name)
///                 .order(0)
///                 .build()
///         })
///     }
///
///     record_accessors!();
/// }
/// ```
pub trait Record: Any {
    /// The per-type descriptor table.
    fn schema() -> &'static Schema<Self>
    where
        Self: Sized;

    /// Concrete type name, used for equality and list item element names.
    fn type_name(&self) -> &'static str;

    /// Participating fields in catalog order.
    fn catalog(&self) -> &'static PropertyCatalog;

    fn field(&self, name: &str) -> Option<FieldRef<'_>>;

    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>>;

    fn as_any(&self) -> &dyn Any;

    /// Instance-specific validator factory, invoked once on first validation.
    fn create_rules(&self) -> Vec<Box<dyn Validator>> {
        Vec::new()
    }

    /// Per-instance cache for the validators returned by [`Record::create_rules`].
    ///
    /// Records that declare rules must return their cache here; without one
    /// the factory runs on every query.
    fn rule_set(&self) -> Option<&RuleSet> {
        None
    }

    /// Serialization configuration of this record. Not inherited by children.
    fn options(&self) -> &SerializationOptions {
        &DEFAULT_OPTIONS
    }
}

/// True when every participating field is null, an empty string, an empty
/// nested record or an empty list.
pub fn is_empty(record: &dyn Record) -> bool {
    record.catalog().iter().all(|descriptor| {
        record
            .field(descriptor.name)
            .map_or(true, |value| value.is_blank())
    })
}

/// Validation, emptiness and equality helpers available on every record.
pub trait RecordExt {
    fn broken_rules(&self) -> Vec<BrokenRule>;

    fn broken_rules_for(&self, property: &str) -> Vec<BrokenRule>;

    fn property_error(&self, property: &str) -> Option<String>;

    fn error(&self) -> Option<String>;

    fn is_valid(&self) -> bool;

    fn is_empty(&self) -> bool;

    fn structural_eq(&self, other: &dyn Record) -> bool;

    fn structural_hash(&self) -> u64;
}

impl RecordExt for dyn Record {
    fn broken_rules(&self) -> Vec<BrokenRule> {
        ValidationEngine::new(self).broken_rules()
    }

    fn broken_rules_for(&self, property: &str) -> Vec<BrokenRule> {
        ValidationEngine::new(self).broken_rules_for(property)
    }

    fn property_error(&self, property: &str) -> Option<String> {
        ValidationEngine::new(self).property_error(property)
    }

    fn error(&self) -> Option<String> {
        ValidationEngine::new(self).error()
    }

    fn is_valid(&self) -> bool {
        ValidationEngine::new(self).is_valid()
    }

    fn is_empty(&self) -> bool {
        is_empty(self)
    }

    fn structural_eq(&self, other: &dyn Record) -> bool {
        equality::equals(self, other)
    }

    fn structural_hash(&self) -> u64 {
        equality::structural_hash(self)
    }
}

impl<R: Record> RecordExt for R {
    fn broken_rules(&self) -> Vec<BrokenRule> {
        (self as &dyn Record).broken_rules()
    }

    fn broken_rules_for(&self, property: &str) -> Vec<BrokenRule> {
        (self as &dyn Record).broken_rules_for(property)
    }

    fn property_error(&self, property: &str) -> Option<String> {
        (self as &dyn Record).property_error(property)
    }

    fn error(&self) -> Option<String> {
        (self as &dyn Record).error()
    }

    fn is_valid(&self) -> bool {
        (self as &dyn Record).is_valid()
    }

    fn is_empty(&self) -> bool {
        is_empty(self)
    }

    fn structural_eq(&self, other: &dyn Record) -> bool {
        equality::equals(self, other)
    }

    fn structural_hash(&self) -> u64 {
        equality::structural_hash(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{ComplexRecord, ListRecord, SimpleRecord};

    #[test]
    fn empty_until_a_field_is_set() {
        let mut simple = SimpleRecord::default();
        assert!(simple.is_empty());

        simple.simple = Some("hello".to_string());
        assert!(!simple.is_empty());
    }

    #[test]
    fn empty_string_counts_as_empty() {
        let simple = SimpleRecord {
            another: Some(String::new()),
            ..SimpleRecord::default()
        };
        assert!(simple.is_empty());
    }

    #[test]
    fn nested_record_content_makes_parent_non_empty() {
        let mut complex = ComplexRecord::blank();
        assert!(complex.is_empty());

        complex.simple.another = Some("x".to_string());
        assert!(!complex.is_empty());
    }

    #[test]
    fn list_items_make_parent_non_empty() {
        let mut list = ListRecord { items: Vec::new() };
        assert!(list.is_empty());

        list.items.push(ComplexRecord::default());
        assert!(!list.is_empty());
    }

    #[test]
    fn default_options_are_all_off() {
        let options = SimpleRecord::default().options().clone();
        assert!(!options.serialize_null_values);
        assert!(!options.serialize_empty_strings);
        assert!(!options.serialize_empty_nested);
        assert!(options.date_format.is_none());
        assert!(options.decimal_format.is_none());
    }
}
