//! Domain record base layer.
//!
//! Records declare their fields once in a static [`Schema`]; the resulting
//! [`PropertyCatalog`] drives validation, serialization and structural
//! equality in the same field order.
//!
//! # Example
//!
//! ```
//! use std::sync::OnceLock;
//!
//! use recordkit_core::rules::{Length, Required};
//! use recordkit_core::{record_accessors, Record, RecordExt, RuleSet, Schema, Validator};
//!
//! #[derive(Default)]
//! struct Customer {
//!     name: Option<String>,
//!     rules: RuleSet,
//! }
//!
//! impl Record for Customer {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: OnceLock<Schema<Customer>> = OnceLock::new();
//!         SCHEMA.get_or_init(|| {
//!             Schema::<Self>::builder("Customer")
//!                 .text("Name", |c| &c.name, |c| &mut c.name)
//!                 .build()
//!         })
//!     }
//!
//!     record_accessors!();
//!
//!     fn create_rules(&self) -> Vec<Box<dyn Validator>> {
//!         vec![
//!             Box::new(Required::new().on("Name")),
//!             Box::new(Length::between(2, 40).on("Name")),
//!         ]
//!     }
//!
//!     fn rule_set(&self) -> Option<&RuleSet> {
//!         Some(&self.rules)
//!     }
//! }
//!
//! let mut customer = Customer::default();
//! assert_eq!(customer.error().as_deref(), Some("Name: Required."));
//!
//! customer.name = Some("Ada".to_string());
//! assert!(customer.is_valid());
//! ```

pub mod catalog;
pub mod country;
pub mod equality;
pub mod error;
pub mod field;
pub mod notify;
pub mod options;
pub mod record;
pub mod schema;
pub mod validation;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use catalog::{FieldDescriptor, PropertyCatalog};
pub use equality::{equals, structural_hash};
pub use error::{Result, RuleError};
pub use field::{FieldKind, FieldMut, FieldRef, RecordList, DATETIME_FORMAT};
pub use notify::{ChangeNotifier, VALIDITY_PROPERTY};
pub use options::{SerializationOptions, DEFAULT_OPTIONS};
pub use record::{is_empty, Record, RecordExt};
pub use schema::{Access, Schema, SchemaBuilder};
pub use validation::rules;
pub use validation::{
    BrokenRule, Evaluation, PropertyBinding, RuleKind, RuleMeta, RuleSet, ValidationEngine,
    Validator,
};
