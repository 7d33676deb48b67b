//! Sample record family shared by the test suites of the workspace.
//!
//! Compiled for this crate's tests and, through the `fixtures` feature, for
//! the tests of dependent crates.

use std::sync::{LazyLock, OnceLock};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::options::SerializationOptions;
use crate::validation::rules::{
    AndComposite, Country, Delegate, Length, Regex, Required, XorRequired,
};
use crate::validation::{RuleSet, Validator};
use crate::{record_accessors, Record, Schema};

static DUMMY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("dummy").expect("fixture pattern compiles"));

/// Scalars of every nullable kind; `AnotherProperty` and `SimpleProperty`
/// carry explicit orders in reverse declaration sequence.
#[derive(Debug, Clone, Default)]
pub struct SimpleRecord {
    pub simple: Option<String>,
    pub another: Option<String>,
    pub decimal: Option<Decimal>,
    pub date_time: Option<NaiveDateTime>,
    pub date_time_ignored: Option<NaiveDateTime>,
    pub options: SerializationOptions,
}

impl Record for SimpleRecord {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<SimpleRecord>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("SimpleObject")
                .text("SimpleProperty", |r| &r.simple, |r| &mut r.simple)
                .order(1)
                .text("AnotherProperty", |r| &r.another, |r| &mut r.another)
                .order(0)
                .decimal("DecimalProperty", |r| &r.decimal, |r| &mut r.decimal)
                .datetime("DateTimeProperty", |r| &r.date_time, |r| &mut r.date_time)
                .datetime(
                    "DateTimeIgnoreXmlDateFormatProperty",
                    |r| &r.date_time_ignored,
                    |r| &mut r.date_time_ignored,
                )
                .ignore_date_format()
                .build()
        })
    }

    record_accessors!();

    fn options(&self) -> &SerializationOptions {
        &self.options
    }
}

/// One field per built-in rule, plus a nested [`SimpleRecord`].
#[derive(Debug, Clone)]
pub struct ComplexRecord {
    pub length: Option<String>,
    pub required: Option<String>,
    pub country: Option<String>,
    pub delegate: Option<String>,
    pub regex: Option<String>,
    pub first: Option<String>,
    pub second: Option<String>,
    pub and: Option<String>,
    pub simple: SimpleRecord,
    pub rules: RuleSet,
    pub options: SerializationOptions,
}

impl Default for ComplexRecord {
    fn default() -> Self {
        Self {
            delegate: Some("dummy".to_string()),
            first: Some("first".to_string()),
            and: Some("And".to_string()),
            ..Self::blank()
        }
    }
}

impl ComplexRecord {
    /// Every field null and the nested record empty.
    pub fn blank() -> Self {
        Self {
            length: None,
            required: None,
            country: None,
            delegate: None,
            regex: None,
            first: None,
            second: None,
            and: None,
            simple: SimpleRecord::default(),
            rules: RuleSet::new(),
            options: SerializationOptions::default(),
        }
    }

    /// A valid record with a populated nested record.
    pub fn mock() -> Self {
        let mut record = Self {
            required: Some("hello".to_string()),
            ..Self::default()
        };
        record.simple.another = Some("AnotherProperty".to_string());
        record.simple.simple = Some("SimpleProperty".to_string());
        record
    }
}

impl Record for ComplexRecord {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<ComplexRecord>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("ComplexObject")
                .text("LengthProperty", |r| &r.length, |r| &mut r.length)
                .text("RequiredProperty", |r| &r.required, |r| &mut r.required)
                .text("CountryProperty", |r| &r.country, |r| &mut r.country)
                .order(3)
                .text("DelegateProperty", |r| &r.delegate, |r| &mut r.delegate)
                .order(4)
                .text("RegexProperty", |r| &r.regex, |r| &mut r.regex)
                .text("FirstProperty", |r| &r.first, |r| &mut r.first)
                .order(0)
                .text("SecondProperty", |r| &r.second, |r| &mut r.second)
                .order(1)
                .text("AndProperty", |r| &r.and, |r| &mut r.and)
                .order(2)
                .record("SimpleObject", |r| &r.simple, |r| &mut r.simple)
                .order(5)
                .build()
        })
    }

    record_accessors!();

    fn create_rules(&self) -> Vec<Box<dyn Validator>> {
        let mut rules: Vec<Box<dyn Validator>> = Vec::new();
        rules.push(Box::new(Length::between(1, 5).on("LengthProperty")));
        rules.push(Box::new(Required::new().on("RequiredProperty")));
        rules.push(Box::new(Country::new().on("CountryProperty")));
        rules.push(Box::new(
            Delegate::on_record("This is a fail", |r: &ComplexRecord| {
                r.delegate.as_deref() == Some("dummy")
            })
            .on("DelegateProperty"),
        ));
        rules.push(Box::new(DUMMY_PATTERN.clone().on("RegexProperty")));
        rules.push(Box::new(
            XorRequired::new(["FirstProperty", "SecondProperty"])
                .with_description("This is a fail"),
        ));
        rules.push(Box::new(
            AndComposite::new("AndProperty", Vec::new())
                .with(Length::exactly(3))
                .with(Delegate::on_record("fail", |r: &ComplexRecord| {
                    r.and.as_deref() == Some("And")
                })),
        ));
        rules
    }

    fn rule_set(&self) -> Option<&RuleSet> {
        Some(&self.rules)
    }

    fn options(&self) -> &SerializationOptions {
        &self.options
    }
}

/// A record owning a list of [`ComplexRecord`] items.
#[derive(Debug, Clone, Default)]
pub struct ListRecord {
    pub items: Vec<ComplexRecord>,
}

impl ListRecord {
    /// Two valid items.
    pub fn pair() -> Self {
        Self {
            items: vec![ComplexRecord::mock(), ComplexRecord::mock()],
        }
    }
}

impl Record for ListRecord {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<ListRecord>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("ListOfBusinessObject")
                .list("ListOfObjects", |r| &r.items, |r| &mut r.items)
                .build()
        })
    }

    record_accessors!();
}

/// Integer, boolean and text-list fields.
#[derive(Debug, Clone, Default)]
pub struct TaggedRecord {
    pub name: Option<String>,
    pub tags: Vec<String>,
    pub count: Option<i64>,
    pub active: Option<bool>,
}

impl Record for TaggedRecord {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<TaggedRecord>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("TaggedObject")
                .text("Name", |r| &r.name, |r| &mut r.name)
                .text_list("Tags", |r| &r.tags, |r| &mut r.tags)
                .integer("Count", |r| &r.count, |r| &mut r.count)
                .boolean("Active", |r| &r.active, |r| &mut r.active)
                .build()
        })
    }

    record_accessors!();
}
