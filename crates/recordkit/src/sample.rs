//! Contact record family exercised by the CLI.

use std::sync::{LazyLock, OnceLock};

use chrono::NaiveDateTime;
use recordkit_core::rules::{Country, Delegate, Domain, Length, ListLength, Regex, Required};
use recordkit_core::{record_accessors, Record, RuleSet, Schema, SerializationOptions, Validator};
use rust_decimal::Decimal;

/// Element name wrapping a contact document.
pub const ROOT_ELEMENT: &str = "Contact";

const PHONE_KINDS: [&str; 3] = ["home", "work", "mobile"];

static POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Z][0-9A-Z -]{1,8}[0-9A-Z]$").expect("postal code pattern compiles")
});

static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9][0-9 ()-]{4,18}[0-9]$").expect("phone number pattern compiles")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
});

#[derive(Debug, Clone, Default)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    rules: RuleSet,
}

impl Record for Address {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Address>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Address")
                .text("Street", |a| &a.street, |a| &mut a.street)
                .text("City", |a| &a.city, |a| &mut a.city)
                .text("PostalCode", |a| &a.postal_code, |a| &mut a.postal_code)
                .text("Country", |a| &a.country, |a| &mut a.country)
                .build()
        })
    }

    record_accessors!();

    fn create_rules(&self) -> Vec<Box<dyn Validator>> {
        let mut rules: Vec<Box<dyn Validator>> = Vec::new();
        rules.push(Box::new(Required::new().on("City")));
        rules.push(Box::new(Length::between(1, 80).on("Street")));
        rules.push(Box::new(
            POSTAL_CODE
                .clone()
                .on("PostalCode")
                .with_description("Postal code has an unexpected shape."),
        ));
        rules.push(Box::new(Country::new().on("Country")));
        rules
    }

    fn rule_set(&self) -> Option<&RuleSet> {
        Some(&self.rules)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Phone {
    pub kind: Option<String>,
    pub number: Option<String>,
    pub primary: Option<bool>,
    rules: RuleSet,
}

impl Record for Phone {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Phone>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Phone")
                .text("Kind", |p| &p.kind, |p| &mut p.kind)
                .text("Number", |p| &p.number, |p| &mut p.number)
                .boolean("Primary", |p| &p.primary, |p| &mut p.primary)
                .build()
        })
    }

    record_accessors!();

    fn create_rules(&self) -> Vec<Box<dyn Validator>> {
        let mut rules: Vec<Box<dyn Validator>> = Vec::new();
        rules.push(Box::new(Required::new().on("Number")));
        rules.push(Box::new(PHONE_NUMBER.clone().on("Number")));
        rules.push(Box::new(Domain::new(PHONE_KINDS).on("Kind")));
        rules
    }

    fn rule_set(&self) -> Option<&RuleSet> {
        Some(&self.rules)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDateTime>,
    pub credit_limit: Option<Decimal>,
    pub tags: Vec<String>,
    pub address: Address,
    pub phones: Vec<Phone>,
    pub options: SerializationOptions,
    rules: RuleSet,
}

impl Contact {
    pub fn with_options(options: SerializationOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }
}

impl Record for Contact {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Contact>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Contact")
                .text("Name", |c| &c.name, |c| &mut c.name)
                .order(0)
                .text("Email", |c| &c.email, |c| &mut c.email)
                .order(1)
                .datetime("BirthDate", |c| &c.birth_date, |c| &mut c.birth_date)
                .decimal("CreditLimit", |c| &c.credit_limit, |c| &mut c.credit_limit)
                .text_list("Tags", |c| &c.tags, |c| &mut c.tags)
                .record("Address", |c| &c.address, |c| &mut c.address)
                .list("Phones", |c| &c.phones, |c| &mut c.phones)
                .build()
        })
    }

    record_accessors!();

    fn create_rules(&self) -> Vec<Box<dyn Validator>> {
        let mut rules: Vec<Box<dyn Validator>> = Vec::new();
        rules.push(Box::new(Required::new().on("Name")));
        rules.push(Box::new(Length::between(2, 60).on("Name")));
        rules.push(Box::new(
            EMAIL
                .clone()
                .on("Email")
                .with_description("Email address is malformed."),
        ));
        rules.push(Box::new(ListLength::between(2, 24).on("Tags")));
        rules.push(Box::new(
            Delegate::on_record::<Contact>("At most four phones.", |contact| {
                contact.phones.len() <= 4
            })
            .on("Phones"),
        ));
        rules.push(Box::new(
            Delegate::on_record::<Contact>("An email or a phone is required.", |contact| {
                contact.email.is_some() || !contact.phones.is_empty()
            })
            .on("Email"),
        ));
        rules.push(Box::new(
            Delegate::on_record::<Contact>("Credit limit cannot be negative.", |contact| {
                contact
                    .credit_limit
                    .map_or(true, |limit| !limit.is_sign_negative())
            })
            .on("CreditLimit"),
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

#[cfg(test)]
mod tests {
    use recordkit_core::RecordExt;

    use super::*;

    fn valid_contact() -> Contact {
        Contact {
            name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.org".to_string()),
            address: Address {
                city: Some("London".to_string()),
                country: Some("GB".to_string()),
                ..Address::default()
            },
            ..Contact::default()
        }
    }

    #[test]
    fn valid_contact_passes() {
        assert_eq!(valid_contact().error(), None);
    }

    #[test]
    fn needs_email_or_phone() {
        let mut contact = valid_contact();
        contact.email = None;
        assert_eq!(
            contact.property_error("Email").as_deref(),
            Some("Email: An email or a phone is required.")
        );

        contact.phones.push(Phone {
            number: Some("+31 20 123 4567".to_string()),
            kind: Some("work".to_string()),
            ..Phone::default()
        });
        assert!(contact.is_valid());
    }

    #[test]
    fn child_errors_carry_paths() {
        let mut contact = valid_contact();
        contact.address.country = Some("XX".to_string());
        contact.phones.push(Phone {
            kind: Some("pager".to_string()),
            ..Phone::default()
        });
        let error = contact.error().unwrap();
        let lines: Vec<&str> = error.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Address.Country: "));
        assert_eq!(lines[1], "Phones[0].Number: Required.");
        assert!(lines[2].starts_with("Phones[0].Kind: "));
    }

    #[test]
    fn empty_children_are_not_reported() {
        let mut contact = valid_contact();
        contact.address = Address::default();
        contact.phones.push(Phone::default());
        assert_eq!(Address::default().property_error("City").as_deref(), Some("City: Required."));
        assert_eq!(contact.error(), None);

        contact.phones.push(Phone {
            kind: Some("home".to_string()),
            ..Phone::default()
        });
        assert_eq!(contact.error().as_deref(), Some("Phones[1].Number: Required."));
    }

    #[test]
    fn pattern_rules_are_always_installed() {
        let mut contact = valid_contact();
        contact.email = Some("ada at example".to_string());
        contact.address.postal_code = Some("?".to_string());
        contact.phones.push(Phone {
            number: Some("call me".to_string()),
            ..Phone::default()
        });
        let error = contact.error().unwrap();
        let lines: Vec<&str> = error.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Email: Email address is malformed.",
                "Address.PostalCode: Postal code has an unexpected shape.",
                "Phones[0].Number: Unrecognized format.",
            ]
        );
    }

    #[test]
    fn rules_are_cached_per_instance() {
        let contact = valid_contact();
        assert!(contact.is_valid());
        for rules in [
            contact.rule_set(),
            contact.address.rule_set(),
            Phone::default().rule_set(),
        ] {
            assert!(rules.is_some());
        }
        assert!(contact.rules.is_created());
        assert!(contact.address.rules.is_created());
    }

    #[test]
    fn tags_are_checked_one_by_one() {
        let mut contact = valid_contact();
        contact.tags = vec!["ok".to_string(), "x".to_string()];
        assert_eq!(
            contact.property_error("Tags").as_deref(),
            Some("Tags: Length must be between 2 and 24 (#1).")
        );
    }

    #[test]
    fn catalog_puts_name_and_email_first() {
        assert_eq!(
            Contact::default().catalog().names(),
            vec!["Name", "Email", "BirthDate", "CreditLimit", "Tags", "Address", "Phones"]
        );
    }
}
