use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::record::{is_empty, Record};

/// Default textual form for datetime values.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// The closed set of value kinds a participating field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
    Decimal,
    DateTime,
    /// Ordered list of strings.
    TextList,
    /// Nested record, always present.
    Record,
    /// Ordered list of records of one declared item type.
    RecordList,
}

impl FieldKind {
    /// Returns true for kinds that hold a nullable scalar.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            FieldKind::Text
                | FieldKind::Integer
                | FieldKind::Boolean
                | FieldKind::Decimal
                | FieldKind::DateTime
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Decimal => "decimal",
            FieldKind::DateTime => "datetime",
            FieldKind::TextList => "text list",
            FieldKind::Record => "record",
            FieldKind::RecordList => "record list",
        };
        f.write_str(name)
    }
}

/// Read access to one field value.
#[derive(Clone, Copy)]
pub enum FieldRef<'a> {
    Text(Option<&'a str>),
    Integer(Option<i64>),
    Boolean(Option<bool>),
    Decimal(Option<Decimal>),
    DateTime(Option<NaiveDateTime>),
    TextList(&'a [String]),
    Record(&'a dyn Record),
    List(&'a dyn RecordList),
}

impl<'a> FieldRef<'a> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldRef::Text(_) => FieldKind::Text,
            FieldRef::Integer(_) => FieldKind::Integer,
            FieldRef::Boolean(_) => FieldKind::Boolean,
            FieldRef::Decimal(_) => FieldKind::Decimal,
            FieldRef::DateTime(_) => FieldKind::DateTime,
            FieldRef::TextList(_) => FieldKind::TextList,
            FieldRef::Record(_) => FieldKind::Record,
            FieldRef::List(_) => FieldKind::RecordList,
        }
    }

    /// True when a scalar field holds no value. Lists and nested records are never null.
    pub fn is_null(&self) -> bool {
        match self {
            FieldRef::Text(v) => v.is_none(),
            FieldRef::Integer(v) => v.is_none(),
            FieldRef::Boolean(v) => v.is_none(),
            FieldRef::Decimal(v) => v.is_none(),
            FieldRef::DateTime(v) => v.is_none(),
            FieldRef::TextList(_) | FieldRef::Record(_) | FieldRef::List(_) => false,
        }
    }

    /// True when the value is null, an empty string, an empty nested record or an empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldRef::Text(v) => v.map_or(true, str::is_empty),
            FieldRef::TextList(items) => items.is_empty(),
            FieldRef::Record(record) => is_empty(*record),
            FieldRef::List(list) => list.is_empty(),
            other => other.is_null(),
        }
    }

    /// Textual form of a scalar value, `None` when null or not a scalar.
    pub fn as_text(&self) -> Option<Cow<'a, str>> {
        match *self {
            FieldRef::Text(v) => v.map(Cow::Borrowed),
            FieldRef::Integer(v) => v.map(|v| Cow::Owned(v.to_string())),
            FieldRef::Boolean(v) => v.map(|v| Cow::Owned(v.to_string())),
            FieldRef::Decimal(v) => v.map(|v| Cow::Owned(v.to_string())),
            FieldRef::DateTime(v) => v.map(|v| Cow::Owned(v.format(DATETIME_FORMAT).to_string())),
            FieldRef::TextList(_) | FieldRef::Record(_) | FieldRef::List(_) => None,
        }
    }
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Text(v) => f.debug_tuple("Text").field(v).finish(),
            FieldRef::Integer(v) => f.debug_tuple("Integer").field(v).finish(),
            FieldRef::Boolean(v) => f.debug_tuple("Boolean").field(v).finish(),
            FieldRef::Decimal(v) => f.debug_tuple("Decimal").field(v).finish(),
            FieldRef::DateTime(v) => f.debug_tuple("DateTime").field(v).finish(),
            FieldRef::TextList(v) => f.debug_tuple("TextList").field(v).finish(),
            FieldRef::Record(r) => f.debug_tuple("Record").field(&r.type_name()).finish(),
            FieldRef::List(l) => f
                .debug_struct("List")
                .field("item_type", &l.item_type_name())
                .field("len", &l.len())
                .finish(),
        }
    }
}

/// Write access to one field value.
pub enum FieldMut<'a> {
    Text(&'a mut Option<String>),
    Integer(&'a mut Option<i64>),
    Boolean(&'a mut Option<bool>),
    Decimal(&'a mut Option<Decimal>),
    DateTime(&'a mut Option<NaiveDateTime>),
    TextList(&'a mut Vec<String>),
    Record(&'a mut dyn Record),
    List(&'a mut dyn RecordList),
}

impl FieldMut<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldMut::Text(_) => FieldKind::Text,
            FieldMut::Integer(_) => FieldKind::Integer,
            FieldMut::Boolean(_) => FieldKind::Boolean,
            FieldMut::Decimal(_) => FieldKind::Decimal,
            FieldMut::DateTime(_) => FieldKind::DateTime,
            FieldMut::TextList(_) => FieldKind::TextList,
            FieldMut::Record(_) => FieldKind::Record,
            FieldMut::List(_) => FieldKind::RecordList,
        }
    }
}

/// An ordered, homogeneous list of records viewed through the erased record interface.
pub trait RecordList {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&dyn Record>;

    /// Type name of the declared item type.
    fn item_type_name(&self) -> &'static str;

    fn clear(&mut self);

    /// Appends a freshly constructed item and returns it for population.
    ///
    /// Returns `None` when the list cannot construct items of its declared type.
    fn push_new(&mut self) -> Option<&mut dyn Record>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Record + Default> RecordList for Vec<R> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Record> {
        self.as_slice().get(index).map(|item| item as &dyn Record)
    }

    fn item_type_name(&self) -> &'static str {
        R::schema().type_name()
    }

    fn clear(&mut self) {
        Vec::clear(self)
    }

    fn push_new(&mut self) -> Option<&mut dyn Record> {
        self.push(R::default());
        self.last_mut().map(|item| item as &mut dyn Record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::SimpleRecord;

    #[test]
    fn blank_covers_null_empty_and_empty_children() {
        assert!(FieldRef::Text(None).is_blank());
        assert!(FieldRef::Text(Some("")).is_blank());
        assert!(!FieldRef::Text(Some("x")).is_blank());
        assert!(FieldRef::TextList(&[]).is_blank());
        assert!(FieldRef::Decimal(None).is_blank());
        assert!(!FieldRef::Boolean(Some(false)).is_blank());

        let simple = SimpleRecord::default();
        assert!(FieldRef::Record(&simple).is_blank());
    }

    #[test]
    fn text_form_of_scalars() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(13, 5, 0)
            .unwrap();
        assert_eq!(
            FieldRef::DateTime(Some(date)).as_text().unwrap(),
            "2024-02-29T13:05:00"
        );
        assert_eq!(
            FieldRef::Decimal(Some(Decimal::new(1050, 2))).as_text().unwrap(),
            "10.50"
        );
        assert_eq!(FieldRef::Integer(Some(-3)).as_text().unwrap(), "-3");
        assert!(FieldRef::Text(None).as_text().is_none());
    }

    #[test]
    fn vec_list_constructs_items() {
        let mut list: Vec<SimpleRecord> = Vec::new();
        assert_eq!(RecordList::item_type_name(&list), "SimpleObject");
        assert!(RecordList::push_new(&mut list).is_some());
        assert_eq!(RecordList::len(&list), 1);
        RecordList::clear(&mut list);
        assert!(RecordList::is_empty(&list));
    }
}
