use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::catalog::{FieldDescriptor, PropertyCatalog};
use crate::field::{FieldKind, FieldMut, FieldRef, RecordList};
use crate::record::Record;

/// Typed accessor pair for one field, tagged by value kind.
pub enum Access<R> {
    Text(fn(&R) -> &Option<String>, fn(&mut R) -> &mut Option<String>),
    Integer(fn(&R) -> &Option<i64>, fn(&mut R) -> &mut Option<i64>),
    Boolean(fn(&R) -> &Option<bool>, fn(&mut R) -> &mut Option<bool>),
    Decimal(fn(&R) -> &Option<Decimal>, fn(&mut R) -> &mut Option<Decimal>),
    DateTime(
        fn(&R) -> &Option<NaiveDateTime>,
        fn(&mut R) -> &mut Option<NaiveDateTime>,
    ),
    TextList(fn(&R) -> &Vec<String>, fn(&mut R) -> &mut Vec<String>),
    Record(fn(&R) -> &dyn Record, fn(&mut R) -> &mut dyn Record),
    List(fn(&R) -> &dyn RecordList, fn(&mut R) -> &mut dyn RecordList),
}

impl<R> Access<R> {
    fn kind(&self) -> FieldKind {
        match self {
            Access::Text(..) => FieldKind::Text,
            Access::Integer(..) => FieldKind::Integer,
            Access::Boolean(..) => FieldKind::Boolean,
            Access::Decimal(..) => FieldKind::Decimal,
            Access::DateTime(..) => FieldKind::DateTime,
            Access::TextList(..) => FieldKind::TextList,
            Access::Record(..) => FieldKind::Record,
            Access::List(..) => FieldKind::RecordList,
        }
    }

    fn read<'r>(&self, record: &'r R) -> FieldRef<'r> {
        match self {
            Access::Text(get, _) => FieldRef::Text(get(record).as_deref()),
            Access::Integer(get, _) => FieldRef::Integer(*get(record)),
            Access::Boolean(get, _) => FieldRef::Boolean(*get(record)),
            Access::Decimal(get, _) => FieldRef::Decimal(*get(record)),
            Access::DateTime(get, _) => FieldRef::DateTime(*get(record)),
            Access::TextList(get, _) => FieldRef::TextList(get(record).as_slice()),
            Access::Record(get, _) => FieldRef::Record(get(record)),
            Access::List(get, _) => FieldRef::List(get(record)),
        }
    }

    fn write<'r>(&self, record: &'r mut R) -> FieldMut<'r> {
        match self {
            Access::Text(_, get_mut) => FieldMut::Text(get_mut(record)),
            Access::Integer(_, get_mut) => FieldMut::Integer(get_mut(record)),
            Access::Boolean(_, get_mut) => FieldMut::Boolean(get_mut(record)),
            Access::Decimal(_, get_mut) => FieldMut::Decimal(get_mut(record)),
            Access::DateTime(_, get_mut) => FieldMut::DateTime(get_mut(record)),
            Access::TextList(_, get_mut) => FieldMut::TextList(get_mut(record)),
            Access::Record(_, get_mut) => FieldMut::Record(get_mut(record)),
            Access::List(_, get_mut) => FieldMut::List(get_mut(record)),
        }
    }
}

struct Field<R> {
    name: &'static str,
    access: Access<R>,
}

/// Static descriptor table for one record type.
///
/// Built once per type (usually inside a `OnceLock`) and shared by every
/// instance. Holds the accessor pairs in declaration sequence and the resolved
/// [`PropertyCatalog`].
pub struct Schema<R> {
    type_name: &'static str,
    fields: Vec<Field<R>>,
    catalog: PropertyCatalog,
}

impl<R> Schema<R> {
    /// Start declaring the fields of a record type.
    pub fn builder(type_name: &'static str) -> SchemaBuilder<R> {
        SchemaBuilder {
            type_name,
            fields: Vec::new(),
            descriptors: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn catalog(&self) -> &PropertyCatalog {
        &self.catalog
    }

    /// Read a field by name.
    pub fn get<'r>(&self, record: &'r R, name: &str) -> Option<FieldRef<'r>> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.access.read(record))
    }

    /// Write access to a field by name.
    pub fn get_mut<'r>(&self, record: &'r mut R, name: &str) -> Option<FieldMut<'r>> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.access.write(record))
    }
}

/// Declares fields in declaration sequence.
///
/// `order` and `ignore_date_format` apply to the most recently declared field.
pub struct SchemaBuilder<R> {
    type_name: &'static str,
    fields: Vec<Field<R>>,
    descriptors: Vec<FieldDescriptor>,
}

impl<R> SchemaBuilder<R> {
    pub fn field(mut self, name: &'static str, access: Access<R>) -> Self {
        self.descriptors.push(FieldDescriptor {
            name,
            order: None,
            kind: access.kind(),
            ignore_date_format: false,
            declared_at: self.fields.len(),
        });
        self.fields.push(Field { name, access });
        self
    }

    pub fn text(
        self,
        name: &'static str,
        get: fn(&R) -> &Option<String>,
        get_mut: fn(&mut R) -> &mut Option<String>,
    ) -> Self {
        self.field(name, Access::Text(get, get_mut))
    }

    pub fn integer(
        self,
        name: &'static str,
        get: fn(&R) -> &Option<i64>,
        get_mut: fn(&mut R) -> &mut Option<i64>,
    ) -> Self {
        self.field(name, Access::Integer(get, get_mut))
    }

    pub fn boolean(
        self,
        name: &'static str,
        get: fn(&R) -> &Option<bool>,
        get_mut: fn(&mut R) -> &mut Option<bool>,
    ) -> Self {
        self.field(name, Access::Boolean(get, get_mut))
    }

    pub fn decimal(
        self,
        name: &'static str,
        get: fn(&R) -> &Option<Decimal>,
        get_mut: fn(&mut R) -> &mut Option<Decimal>,
    ) -> Self {
        self.field(name, Access::Decimal(get, get_mut))
    }

    pub fn datetime(
        self,
        name: &'static str,
        get: fn(&R) -> &Option<NaiveDateTime>,
        get_mut: fn(&mut R) -> &mut Option<NaiveDateTime>,
    ) -> Self {
        self.field(name, Access::DateTime(get, get_mut))
    }

    pub fn text_list(
        self,
        name: &'static str,
        get: fn(&R) -> &Vec<String>,
        get_mut: fn(&mut R) -> &mut Vec<String>,
    ) -> Self {
        self.field(name, Access::TextList(get, get_mut))
    }

    pub fn record(
        self,
        name: &'static str,
        get: fn(&R) -> &dyn Record,
        get_mut: fn(&mut R) -> &mut dyn Record,
    ) -> Self {
        self.field(name, Access::Record(get, get_mut))
    }

    pub fn list(
        self,
        name: &'static str,
        get: fn(&R) -> &dyn RecordList,
        get_mut: fn(&mut R) -> &mut dyn RecordList,
    ) -> Self {
        self.field(name, Access::List(get, get_mut))
    }

    /// Explicit catalog position of the last declared field.
    pub fn order(mut self, order: u32) -> Self {
        if let Some(descriptor) = self.descriptors.last_mut() {
            descriptor.order = Some(order);
        }
        self
    }

    /// Exempt the last declared field from the record's date format.
    pub fn ignore_date_format(mut self) -> Self {
        if let Some(descriptor) = self.descriptors.last_mut() {
            descriptor.ignore_date_format = true;
        }
        self
    }

    pub fn build(self) -> Schema<R> {
        Schema {
            type_name: self.type_name,
            fields: self.fields,
            catalog: PropertyCatalog::resolve(self.type_name, self.descriptors),
        }
    }
}

/// Implements the erased [`Record`] accessors from `Self::schema()`.
///
/// Use inside an `impl Record for T` block next to `fn schema()`.
#[macro_export]
macro_rules! record_accessors {
    () => {
        fn type_name(&self) -> &'static str {
            <Self as $crate::Record>::schema().type_name()
        }

        fn catalog(&self) -> &'static $crate::PropertyCatalog {
            <Self as $crate::Record>::schema().catalog()
        }

        fn field(&self, name: &str) -> ::std::option::Option<$crate::FieldRef<'_>> {
            <Self as $crate::Record>::schema().get(self, name)
        }

        fn field_mut(&mut self, name: &str) -> ::std::option::Option<$crate::FieldMut<'_>> {
            <Self as $crate::Record>::schema().get_mut(self, name)
        }

        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::fixtures::{ComplexRecord, SimpleRecord};
    use crate::{FieldKind, FieldMut, FieldRef, Record};

    #[test]
    fn accessors_read_and_write_by_name() {
        let mut simple = SimpleRecord::default();
        if let Some(FieldMut::Text(value)) = simple.field_mut("SimpleProperty") {
            *value = Some("hello".to_string());
        }
        assert_eq!(simple.simple.as_deref(), Some("hello"));
        assert!(matches!(
            simple.field("SimpleProperty"),
            Some(FieldRef::Text(Some("hello")))
        ));
        assert!(simple.field("Missing").is_none());
    }

    #[test]
    fn descriptor_flags_follow_builder() {
        let catalog = SimpleRecord::default().catalog();
        let ignored = catalog.get("DateTimeIgnoreXmlDateFormatProperty").unwrap();
        assert!(ignored.ignore_date_format);
        assert_eq!(ignored.kind, FieldKind::DateTime);
        assert!(!catalog.get("DateTimeProperty").unwrap().ignore_date_format);
    }

    #[test]
    fn nested_records_resolve_to_record_kind() {
        let complex = ComplexRecord::default();
        assert_eq!(complex.type_name(), "ComplexObject");
        assert!(matches!(
            complex.field("SimpleObject"),
            Some(FieldRef::Record(child)) if child.type_name() == "SimpleObject"
        ));
    }
}
