//! Structural equality and hashing over the catalog field set.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::field::{FieldRef, RecordList};
use crate::record::Record;

const SEED_PRIME: u64 = 691;
const FIELD_PRIME: u64 = 397;

/// Structural equality: same concrete type name and every catalog field equal.
///
/// Nested records and list items compare recursively. A null on one side only
/// is a mismatch.
pub fn equals(a: &dyn Record, b: &dyn Record) -> bool {
    if a.type_name() != b.type_name() {
        return false;
    }

    a.catalog()
        .iter()
        .all(|descriptor| match (a.field(descriptor.name), b.field(descriptor.name)) {
            (Some(left), Some(right)) => field_equals(&left, &right),
            (None, None) => true,
            _ => false,
        })
}

fn field_equals(left: &FieldRef<'_>, right: &FieldRef<'_>) -> bool {
    match (left, right) {
        (FieldRef::Text(a), FieldRef::Text(b)) => a == b,
        (FieldRef::Integer(a), FieldRef::Integer(b)) => a == b,
        (FieldRef::Boolean(a), FieldRef::Boolean(b)) => a == b,
        (FieldRef::Decimal(a), FieldRef::Decimal(b)) => a == b,
        (FieldRef::DateTime(a), FieldRef::DateTime(b)) => a == b,
        (FieldRef::TextList(a), FieldRef::TextList(b)) => a == b,
        (FieldRef::Record(a), FieldRef::Record(b)) => equals(*a, *b),
        (FieldRef::List(a), FieldRef::List(b)) => lists_equal(*a, *b),
        _ => false,
    }
}

fn lists_equal(a: &dyn RecordList, b: &dyn RecordList) -> bool {
    a.len() == b.len()
        && (0..a.len()).all(|index| match (a.get(index), b.get(index)) {
            (Some(left), Some(right)) => equals(left, right),
            _ => false,
        })
}

/// Order-independent multiplicative fold of every non-null field hash.
///
/// Consistent with [`equals`]; not tuned for distribution quality.
pub fn structural_hash(record: &dyn Record) -> u64 {
    record
        .catalog()
        .iter()
        .filter_map(|descriptor| record.field(descriptor.name))
        .filter_map(|value| field_hash(&value))
        .fold(SEED_PRIME, |hash, field| {
            hash.wrapping_mul(FIELD_PRIME.wrapping_add(field))
        })
}

fn field_hash(value: &FieldRef<'_>) -> Option<u64> {
    match value {
        FieldRef::Text(v) => v.map(hash_of),
        FieldRef::Integer(v) => v.map(hash_of),
        FieldRef::Boolean(v) => v.map(hash_of),
        // Equal decimals may differ in scale.
        FieldRef::Decimal(v) => v.map(|d| hash_of(d.normalize())),
        FieldRef::DateTime(v) => v.map(hash_of),
        FieldRef::TextList(items) => Some(hash_of(items)),
        FieldRef::Record(child) => Some(structural_hash(*child)),
        FieldRef::List(list) => Some(
            (0..list.len())
                .filter_map(|index| list.get(index))
                .fold(SEED_PRIME, |hash, item| {
                    hash.wrapping_mul(FIELD_PRIME.wrapping_add(structural_hash(item)))
                }),
        ),
    }
}

fn hash_of<T: Hash>(value: T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::fixtures::{ComplexRecord, ListRecord, SimpleRecord};

    #[test]
    fn equal_records_hash_alike() {
        let a = ComplexRecord::mock();
        let b = ComplexRecord::mock();
        assert!(equals(&a, &b));
        assert_eq!(structural_hash(&a), structural_hash(&b));
    }

    #[test]
    fn nested_difference_breaks_equality() {
        let a = ComplexRecord::mock();
        let mut b = ComplexRecord::mock();
        b.simple.simple = Some("changed".to_string());
        assert!(!equals(&a, &b));
    }

    #[test]
    fn null_on_one_side_is_a_mismatch() {
        let a = SimpleRecord::default();
        let b = SimpleRecord {
            simple: Some(String::new()),
            ..SimpleRecord::default()
        };
        assert!(!equals(&a, &b));
    }

    #[test]
    fn different_types_are_never_equal() {
        let simple = SimpleRecord::default();
        let list = ListRecord { items: Vec::new() };
        assert!(!equals(&simple, &list));
    }

    #[test]
    fn decimals_with_different_scale() {
        let a = SimpleRecord {
            decimal: Some(Decimal::new(10, 1)),
            ..SimpleRecord::default()
        };
        let b = SimpleRecord {
            decimal: Some(Decimal::new(100, 2)),
            ..SimpleRecord::default()
        };
        assert!(equals(&a, &b));
        assert_eq!(structural_hash(&a), structural_hash(&b));
    }

    #[test]
    fn lists_compare_element_wise() {
        let a = ListRecord::pair();
        let mut b = ListRecord::pair();
        assert!(equals(&a, &b));

        b.items[1].required = Some("different".to_string());
        assert!(!equals(&a, &b));

        b.items.pop();
        assert!(!equals(&a, &b));
    }

    #[test]
    fn hash_is_independent_of_field_order() {
        let x = hash_of("x");
        let y = hash_of("y");
        let forward = SEED_PRIME
            .wrapping_mul(FIELD_PRIME.wrapping_add(x))
            .wrapping_mul(FIELD_PRIME.wrapping_add(y));
        let backward = SEED_PRIME
            .wrapping_mul(FIELD_PRIME.wrapping_add(y))
            .wrapping_mul(FIELD_PRIME.wrapping_add(x));
        assert_eq!(forward, backward);
    }
}
