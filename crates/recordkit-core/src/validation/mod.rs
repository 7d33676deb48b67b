//! Declarative validation: composable rules bound to record properties and
//! the engine that evaluates them.

pub mod engine;
pub mod rules;

use std::cell::OnceCell;
use std::fmt;

use serde::Serialize;

use crate::record::Record;

pub use engine::ValidationEngine;

/// The property (or properties) a rule is bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PropertyBinding {
    /// Whole-object rule.
    #[default]
    Unbound,
    Single(String),
    /// Multi-property rule, rendered as `[a, b]`.
    Multiple(Vec<String>),
}

impl PropertyBinding {
    /// The single bound property, if any.
    pub fn single(&self) -> Option<&str> {
        match self {
            PropertyBinding::Single(name) => Some(name),
            _ => None,
        }
    }

    /// All physical properties the rule reads.
    pub fn properties(&self) -> Vec<&str> {
        match self {
            PropertyBinding::Unbound => Vec::new(),
            PropertyBinding::Single(name) => vec![name.as_str()],
            PropertyBinding::Multiple(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for PropertyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyBinding::Unbound => Ok(()),
            PropertyBinding::Single(name) => f.write_str(name),
            PropertyBinding::Multiple(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

/// Result of evaluating one rule against one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub passed: bool,
    /// Failure message; empty when the rule passed.
    pub message: String,
}

impl Evaluation {
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Pass when `passed`, otherwise fail with `message`.
    pub fn check(passed: bool, message: &str) -> Self {
        if passed {
            Self::pass()
        } else {
            Self::fail(message)
        }
    }
}

/// Concrete rule kinds, reported with every broken rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RuleKind {
    Required,
    Length,
    ListLength,
    Domain,
    Country,
    Regex,
    Delegate,
    XorRequired,
    AndComposite,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Binding and description shared by every rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleMeta {
    pub binding: PropertyBinding,
    pub description: String,
}

impl RuleMeta {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            binding: PropertyBinding::Unbound,
            description: description.into(),
        }
    }
}

/// A rule predicate evaluated against a record.
///
/// None of the built-in rules fail on a missing or null value unless the rule
/// explicitly targets emptiness.
pub trait Validator {
    fn kind(&self) -> RuleKind;

    fn meta(&self) -> &RuleMeta;

    fn meta_mut(&mut self) -> &mut RuleMeta;

    fn evaluate(&self, record: &dyn Record) -> Evaluation;

    fn validate(&self, record: &dyn Record) -> bool {
        self.evaluate(record).passed
    }

    fn binding(&self) -> &PropertyBinding {
        &self.meta().binding
    }

    /// Single name, `[a, b]` for multi-property rules, empty when unbound.
    fn property_name(&self) -> String {
        self.binding().to_string()
    }

    fn description(&self) -> &str {
        &self.meta().description
    }

    /// Bind the rule to a single property, replacing any previous binding.
    fn rebind(&mut self, property: &str) {
        self.meta_mut().binding = PropertyBinding::Single(property.to_string());
    }
}

/// A realized validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenRule {
    pub property_name: String,
    pub description: String,
    pub kind: RuleKind,
}

impl fmt::Display for BrokenRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.property_name.is_empty() {
            f.write_str(&self.description)
        } else {
            write!(f, "{}: {}", self.property_name, self.description)
        }
    }
}

/// Lazily built, then immutable, validator list owned by one record instance.
#[derive(Default)]
pub struct RuleSet {
    rules: OnceCell<Vec<Box<dyn Validator>>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The record's validators, created through `record.create_rules()` on first access.
    pub fn get_or_create(&self, record: &dyn Record) -> &[Box<dyn Validator>] {
        self.rules.get_or_init(|| {
            let rules = record.create_rules();
            tracing::debug!(
                record = record.type_name(),
                rules = rules.len(),
                "created validation rules"
            );
            rules
        })
    }

    pub fn is_created(&self) -> bool {
        self.rules.get().is_some()
    }
}

/// Clones start unbuilt: validators are bound to the instance that created them.
impl Clone for RuleSet {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.rules.get().map(Vec::len))
            .finish()
    }
}
