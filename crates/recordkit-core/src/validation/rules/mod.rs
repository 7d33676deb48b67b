//! Built-in rules.
//!
//! Every rule is constructed unbound; chain `.on(property)` to bind it and
//! `.with_description(text)` to replace the default message.

mod and_composite;
mod country;
mod delegate;
mod domain;
mod length;
mod list_length;
mod pattern;
mod required;
mod xor_required;

use std::borrow::Cow;

pub use and_composite::AndComposite;
pub use country::Country;
pub use delegate::Delegate;
pub use domain::Domain;
pub use length::Length;
pub use list_length::ListLength;
pub use pattern::Regex;
pub use required::Required;
pub use xor_required::XorRequired;

use crate::field::FieldRef;
use crate::record::Record;
use crate::validation::PropertyBinding;

/// Inherent `on`/`with_description` builders plus the `meta` accessors of
/// [`Validator`](crate::Validator) for a rule struct with a `meta` field.
macro_rules! rule_builders {
    ($rule:ty) => {
        impl $rule {
            /// Bind the rule to `property`.
            pub fn on(mut self, property: impl Into<String>) -> Self {
                self.meta.binding = $crate::validation::PropertyBinding::Single(property.into());
                self
            }

            pub fn with_description(mut self, description: impl Into<String>) -> Self {
                self.meta.description = description.into();
                self
            }
        }
    };
}

macro_rules! rule_meta {
    () => {
        fn meta(&self) -> &$crate::validation::RuleMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut $crate::validation::RuleMeta {
            &mut self.meta
        }
    };
}

pub(crate) use rule_builders;
pub(crate) use rule_meta;

/// Value of the single bound property, if the record has it.
pub(crate) fn bound_value<'r>(
    record: &'r dyn Record,
    binding: &PropertyBinding,
) -> Option<FieldRef<'r>> {
    binding.single().and_then(|name| record.field(name))
}

/// Text form of the bound scalar; `None` for null, missing or non-scalar fields.
pub(crate) fn bound_text<'r>(
    record: &'r dyn Record,
    binding: &PropertyBinding,
) -> Option<Cow<'r, str>> {
    bound_value(record, binding).and_then(|value| value.as_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::SimpleRecord;
    use crate::Validator;

    #[test]
    fn builders_bind_and_describe() {
        let rule = Required::new().on("SimpleProperty").with_description("Needed.");
        assert_eq!(rule.property_name(), "SimpleProperty");
        assert_eq!(rule.description(), "Needed.");
    }

    #[test]
    fn bound_text_reads_scalars_only() {
        let record = SimpleRecord {
            simple: Some("x".to_string()),
            ..SimpleRecord::default()
        };
        let binding = PropertyBinding::Single("SimpleProperty".into());
        assert_eq!(bound_text(&record, &binding).as_deref(), Some("x"));
        assert!(bound_text(&record, &PropertyBinding::Unbound).is_none());
        assert!(bound_text(&record, &PropertyBinding::Single("Missing".into())).is_none());
    }
}
