use serde::{Deserialize, Serialize};

/// Options used by records that don't carry their own.
pub static DEFAULT_OPTIONS: SerializationOptions = SerializationOptions {
    serialize_null_values: false,
    serialize_empty_strings: false,
    serialize_empty_nested: false,
    date_format: None,
    decimal_format: None,
};

/// Per-record configuration for null/empty emission and scalar formatting.
///
/// Each record carries its own options; nested records are encoded with
/// theirs, never with their parent's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializationOptions {
    /// Emit null fields as empty elements marked `nil="true"`.
    pub serialize_null_values: bool,
    /// Emit empty strings as empty elements.
    pub serialize_empty_strings: bool,
    /// Emit nested records that have no content.
    pub serialize_empty_nested: bool,
    /// `chrono` strftime pattern for datetime fields.
    pub date_format: Option<String>,
    /// Culture-invariant numeric pattern for decimal fields, e.g. `0.00`.
    pub decimal_format: Option<String>,
}

impl SerializationOptions {
    pub fn with_null_values(mut self, enabled: bool) -> Self {
        self.serialize_null_values = enabled;
        self
    }

    pub fn with_empty_strings(mut self, enabled: bool) -> Self {
        self.serialize_empty_strings = enabled;
        self
    }

    pub fn with_empty_nested(mut self, enabled: bool) -> Self {
        self.serialize_empty_nested = enabled;
        self
    }

    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = Some(pattern.into());
        self
    }

    pub fn with_decimal_format(mut self, pattern: impl Into<String>) -> Self {
        self.decimal_format = Some(pattern.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_static() {
        assert_eq!(SerializationOptions::default(), DEFAULT_OPTIONS);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let options: SerializationOptions =
            serde_json::from_str(r#"{"serialize_null_values":true,"decimal_format":"0.00"}"#)
                .unwrap();
        assert!(options.serialize_null_values);
        assert!(!options.serialize_empty_strings);
        assert_eq!(options.decimal_format.as_deref(), Some("0.00"));
    }

    #[test]
    fn builders_set_fields() {
        let options = SerializationOptions::default()
            .with_empty_strings(true)
            .with_empty_nested(true)
            .with_date_format("%d/%m/%Y");
        assert!(options.serialize_empty_strings);
        assert!(options.serialize_empty_nested);
        assert_eq!(options.date_format.as_deref(), Some("%d/%m/%Y"));
    }
}
