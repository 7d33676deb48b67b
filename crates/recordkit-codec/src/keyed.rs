//! Keyed rendering of a record's fields as a JSON object.
//!
//! Keys follow catalog order. Null scalars are left out, nested records
//! become objects and lists become arrays. This is a one-way view used for
//! display and interchange; the XML codec is the persisted form.

use std::str::FromStr;

use recordkit_core::{FieldRef, Record};
use serde_json::{Map, Number, Value};

use crate::error::Result;
use crate::format::format_datetime;

/// Layout of rendered JSON text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyedLayout {
    #[default]
    Compact,
    Indented,
}

/// Build the keyed value of `record`.
pub fn to_value(record: &dyn Record) -> Value {
    let mut map = Map::new();
    for descriptor in record.catalog() {
        let Some(value) = record.field(descriptor.name) else {
            continue;
        };
        if let Some(value) = field_value(value) {
            map.insert(descriptor.name.to_string(), value);
        }
    }
    Value::Object(map)
}

/// Render `record` as JSON text.
pub fn to_json(record: &dyn Record, layout: KeyedLayout) -> Result<String> {
    let value = to_value(record);
    let text = match layout {
        KeyedLayout::Compact => serde_json::to_string(&value)?,
        KeyedLayout::Indented => serde_json::to_string_pretty(&value)?,
    };
    Ok(text)
}

fn field_value(value: FieldRef<'_>) -> Option<Value> {
    let value = match value {
        FieldRef::Text(text) => Value::String(text?.to_string()),
        FieldRef::Integer(number) => Value::from(number?),
        FieldRef::Boolean(flag) => Value::Bool(flag?),
        FieldRef::Decimal(decimal) => {
            let text = decimal?.to_string();
            match Number::from_str(&text) {
                Ok(number) => Value::Number(number),
                Err(_) => Value::String(text),
            }
        }
        FieldRef::DateTime(datetime) => Value::String(format_datetime(&datetime?)),
        FieldRef::TextList(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        FieldRef::Record(child) => to_value(child),
        FieldRef::List(items) => Value::Array(
            (0..items.len())
                .filter_map(|index| items.get(index))
                .map(to_value)
                .collect(),
        ),
    };
    Some(value)
}
