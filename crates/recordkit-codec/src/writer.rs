use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use recordkit_core::{is_empty, FieldDescriptor, FieldKind, FieldRef, Record, SerializationOptions};
use tracing::trace;

use crate::config::CodecConfig;
use crate::error::Result;
use crate::format::{format_datetime, DateFormat, DecimalPattern};

/// Attribute marking an element that stands for a null value.
pub const NIL_ATTRIBUTE: &str = "nil";

/// Writes records as XML element trees to any `Write` sink.
pub struct RecordWriter<W: Write> {
    writer: Writer<W>,
    config: CodecConfig,
}

/// Compiled scalar formats of one record.
struct Formats {
    date: Option<DateFormat>,
    decimal: Option<DecimalPattern>,
}

impl Formats {
    fn compile(options: &SerializationOptions) -> Result<Self> {
        Ok(Self {
            date: options
                .date_format
                .as_deref()
                .map(DateFormat::parse)
                .transpose()?,
            decimal: options
                .decimal_format
                .as_deref()
                .map(DecimalPattern::parse)
                .transpose()?,
        })
    }
}

impl<W: Write> RecordWriter<W> {
    /// Create a new record writer with default configuration.
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    /// Create a new record writer with explicit configuration.
    pub fn with_config(inner: W, config: CodecConfig) -> Self {
        let writer = match config.indent {
            Some(width) => Writer::new_with_indent(inner, b' ', width),
            None => Writer::new(inner),
        };
        Self { writer, config }
    }

    /// Write `record` wrapped in an element named `root`.
    pub fn write_record(&mut self, root: &str, record: &dyn Record) -> Result<()> {
        self.writer.write_event(Event::Start(BytesStart::new(root)))?;
        self.write_fields(record)?;
        self.writer.write_event(Event::End(BytesEnd::new(root)))?;
        trace!(record = record.type_name(), root, "encoded record");
        Ok(())
    }

    /// Write the fields of `record` in catalog order, without a wrapper.
    ///
    /// Formatting follows the record's own options; nested records use theirs.
    /// An empty string skipped under `serialize_empty_strings = false` reads
    /// back as null, the one value the skip flags do not preserve.
    pub fn write_fields(&mut self, record: &dyn Record) -> Result<()> {
        let options = record.options();
        let formats = Formats::compile(options)?;

        for descriptor in record.catalog() {
            let Some(value) = record.field(descriptor.name) else {
                continue;
            };
            let name = descriptor.name;

            if value.is_null() {
                if options.serialize_null_values {
                    self.write_nil(name)?;
                }
                continue;
            }

            match value {
                FieldRef::Record(child) => {
                    if is_empty(child) && !options.serialize_empty_nested {
                        continue;
                    }
                    self.writer.write_event(Event::Start(BytesStart::new(name)))?;
                    self.write_fields(child)?;
                    self.writer.write_event(Event::End(BytesEnd::new(name)))?;
                }
                FieldRef::List(items) => {
                    let shared = shares_item_type(record, name, items.item_type_name());
                    for index in 0..items.len() {
                        if let Some(item) = items.get(index) {
                            let tag = if shared { name } else { item.type_name() };
                            self.writer.write_event(Event::Start(BytesStart::new(tag)))?;
                            self.write_fields(item)?;
                            self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
                        }
                    }
                }
                FieldRef::TextList(items) => {
                    for item in items {
                        self.write_text(name, item)?;
                    }
                }
                FieldRef::Text(Some(text)) => {
                    if !text.is_empty() || options.serialize_empty_strings {
                        self.write_text(name, text)?;
                    }
                }
                scalar => {
                    let text = scalar_text(&scalar, descriptor, &formats)?;
                    self.write_text(name, &text)?;
                }
            }
        }
        Ok(())
    }

    fn write_text(&mut self, name: &str, text: &str) -> Result<()> {
        if text.is_empty() {
            self.writer.write_event(Event::Empty(BytesStart::new(name)))?;
        } else {
            self.writer.write_event(Event::Start(BytesStart::new(name)))?;
            self.writer.write_event(Event::Text(BytesText::new(text)))?;
            self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Ok(())
    }

    fn write_nil(&mut self, name: &str) -> Result<()> {
        let mut start = BytesStart::new(name);
        start.push_attribute((NIL_ATTRIBUTE, "true"));
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut W {
        self.writer.get_mut()
    }

    /// Consume the writer and return the inner sink.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Current writer configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

/// Whether another list field of `record` holds items of `item_type`. Items
/// of such lists are named by field so that adjacent lists stay apart.
fn shares_item_type(record: &dyn Record, field: &str, item_type: &str) -> bool {
    record.catalog().iter().any(|other| {
        other.name != field
            && other.kind == FieldKind::RecordList
            && matches!(
                record.field(other.name),
                Some(FieldRef::List(list)) if list.item_type_name() == item_type
            )
    })
}

fn scalar_text(
    value: &FieldRef<'_>,
    descriptor: &FieldDescriptor,
    formats: &Formats,
) -> Result<String> {
    let text = match value {
        FieldRef::DateTime(Some(value)) => match &formats.date {
            Some(format) if !descriptor.ignore_date_format => format.format(value)?,
            _ => format_datetime(value),
        },
        FieldRef::Decimal(Some(value)) => match &formats.decimal {
            Some(pattern) => pattern.format(*value),
            None => value.to_string(),
        },
        other => other.as_text().map(|text| text.into_owned()).unwrap_or_default(),
    };
    Ok(text)
}
