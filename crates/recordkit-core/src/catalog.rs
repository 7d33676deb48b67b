use serde::Serialize;

use crate::field::FieldKind;

/// Identity, position and kind of one participating field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Explicit order, if one was declared.
    pub order: Option<u32>,
    pub kind: FieldKind,
    /// Suppresses the record's date format for this field.
    pub ignore_date_format: bool,
    /// Position in declaration sequence.
    pub declared_at: usize,
}

/// Ordered descriptor list of the fields that participate in validation,
/// serialization and equality for one record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyCatalog {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl PropertyCatalog {
    /// Resolve the catalog order from descriptors given in declaration sequence.
    ///
    /// Explicitly ordered fields claim the slot matching their order value;
    /// unordered fields fill the remaining slots in declaration sequence.
    pub fn resolve(type_name: &'static str, declared: Vec<FieldDescriptor>) -> Self {
        let total = declared.len();
        let (mut ordered, unordered): (Vec<_>, Vec<_>) =
            declared.into_iter().partition(|field| field.order.is_some());
        // Stable: equal orders keep declaration sequence.
        ordered.sort_by_key(|field| field.order);

        let mut ordered = ordered.into_iter().peekable();
        let mut unordered = unordered.into_iter();
        let mut fields = Vec::with_capacity(total);

        for slot in 0..total {
            let claims_slot = ordered
                .peek()
                .and_then(|field| field.order)
                .is_some_and(|order| order as usize <= slot);

            let next = if claims_slot {
                ordered.next()
            } else {
                unordered.next().or_else(|| ordered.next())
            };
            if let Some(field) = next {
                fields.push(field);
            }
        }

        Self { type_name, fields }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    /// Field names in catalog order.
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a PropertyCatalog {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
