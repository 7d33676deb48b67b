use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use recordkit_core::{FieldDescriptor, FieldKind, FieldMut, FieldRef, Record};
use tracing::{debug, trace};

use crate::config::{CodecConfig, ElementPolicy};
use crate::error::{CodecError, Result};
use crate::format::{parse_datetime, parse_decimal, DateFormat};
use crate::writer::NIL_ATTRIBUTE;

/// An opening tag, or a self-closing element when `empty` is set.
#[derive(Debug, Clone)]
struct StartTag {
    name: String,
    nil: bool,
    empty: bool,
}

#[derive(Debug, Clone)]
enum Node {
    Start(StartTag),
    End(String),
    Text(String),
    Eof,
}

impl Node {
    fn describe(&self) -> String {
        match self {
            Node::Start(tag) => format!("<{}>", tag.name),
            Node::End(name) => format!("</{name}>"),
            Node::Text(text) => format!("text {text:?}"),
            Node::Eof => "end of input".to_string(),
        }
    }
}

/// Where the next sibling element stands relative to a repeated tag.
enum Lookahead {
    Whitespace,
    Repeat,
    Other,
}

/// Reads records from XML element trees on any `BufRead` source.
///
/// Elements are matched to fields by name. Whitespace between elements is
/// ignored; text inside a scalar element is kept verbatim.
pub struct RecordReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    peeked: Option<Node>,
    config: CodecConfig,
}

impl<R: BufRead> RecordReader<R> {
    /// Create a new record reader with default configuration.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    /// Create a new record reader with explicit configuration.
    pub fn with_config(inner: R, config: CodecConfig) -> Self {
        Self {
            reader: Reader::from_reader(inner),
            buf: Vec::new(),
            peeked: None,
            config,
        }
    }

    /// Read one element of any name and populate `record` from its children.
    pub fn read_record(&mut self, record: &mut dyn Record) -> Result<()> {
        let start = loop {
            match self.next_node()? {
                Node::Text(_) => continue,
                Node::Start(tag) => break tag,
                Node::Eof => return Err(CodecError::UnexpectedEof),
                other => {
                    return Err(CodecError::UnexpectedNode {
                        expected: "start of record element",
                        found: other.describe(),
                    })
                }
            }
        };

        if !start.empty {
            self.read_fields(record)?;
        }
        trace!(record = record.type_name(), root = %start.name, "decoded record");
        Ok(())
    }

    /// Populate `record` from child elements up to the closing tag of the
    /// current element.
    fn read_fields(&mut self, record: &mut dyn Record) -> Result<()> {
        let mut filled = Vec::new();
        loop {
            match self.next_node()? {
                Node::End(_) => return Ok(()),
                Node::Text(_) => continue,
                Node::Eof => return Err(CodecError::UnexpectedEof),
                Node::Start(tag) => self.read_field(record, tag, &mut filled)?,
            }
        }
    }

    fn read_field(
        &mut self,
        record: &mut dyn Record,
        tag: StartTag,
        filled: &mut Vec<&'static str>,
    ) -> Result<()> {
        let Some(descriptor) = field_for(record, &tag.name, filled) else {
            return match self.config.unknown_elements {
                ElementPolicy::Skip => {
                    debug!(
                        record = record.type_name(),
                        element = %tag.name,
                        "skipping unknown element"
                    );
                    self.skip_element(&tag)
                }
                ElementPolicy::Reject => Err(CodecError::UnknownElement {
                    record: record.type_name(),
                    element: tag.name,
                }),
            };
        };

        match descriptor.kind {
            FieldKind::Record => {
                if tag.empty {
                    return Ok(());
                }
                match record.field_mut(descriptor.name) {
                    Some(FieldMut::Record(child)) => self.read_fields(child),
                    _ => self.skip_element(&tag),
                }
            }
            FieldKind::RecordList => {
                filled.push(descriptor.name);
                self.read_list(record, &descriptor, tag)
            }
            FieldKind::TextList => self.read_text_list(record, &descriptor, tag),
            _ => self.read_scalar(record, &descriptor, tag),
        }
    }

    /// Clear the list, then read one item per consecutive element sharing
    /// the first item's tag.
    fn read_list(
        &mut self,
        record: &mut dyn Record,
        descriptor: &FieldDescriptor,
        first: StartTag,
    ) -> Result<()> {
        let record_type = record.type_name();
        let Some(FieldMut::List(list)) = record.field_mut(descriptor.name) else {
            return self.skip_element(&first);
        };
        list.clear();

        let mut current = Some(first);
        while let Some(tag) = current.take() {
            match list.push_new() {
                Some(item) => {
                    if !tag.empty {
                        self.read_fields(item)?;
                    }
                }
                None => match self.config.foreign_list_items {
                    ElementPolicy::Skip => {
                        debug!(
                            record = record_type,
                            field = descriptor.name,
                            "skipping list item of a foreign type"
                        );
                        self.skip_element(&tag)?;
                    }
                    ElementPolicy::Reject => {
                        return Err(CodecError::ForeignListItem {
                            field: descriptor.name.to_string(),
                        })
                    }
                },
            }
            current = self.next_repeat(&tag.name)?;
        }
        Ok(())
    }

    fn read_text_list(
        &mut self,
        record: &mut dyn Record,
        descriptor: &FieldDescriptor,
        first: StartTag,
    ) -> Result<()> {
        let mut values = Vec::new();
        let mut current = Some(first);
        while let Some(tag) = current.take() {
            let text = self.read_text(&tag)?;
            if !tag.nil {
                values.push(text);
            }
            current = self.next_repeat(&tag.name)?;
        }

        if let Some(FieldMut::TextList(items)) = record.field_mut(descriptor.name) {
            *items = values;
        }
        Ok(())
    }

    fn read_scalar(
        &mut self,
        record: &mut dyn Record,
        descriptor: &FieldDescriptor,
        tag: StartTag,
    ) -> Result<()> {
        let text = self.read_text(&tag)?;
        let date_format = match record.options().date_format.as_deref() {
            Some(pattern) if !descriptor.ignore_date_format => Some(DateFormat::parse(pattern)?),
            _ => None,
        };
        let invalid = |text: &str| CodecError::InvalidScalar {
            field: descriptor.name.to_string(),
            value: text.to_string(),
            kind: descriptor.kind,
        };

        // A nil marker is null for every kind; an empty element is null for
        // every kind except text.
        let null = tag.nil || (text.trim().is_empty() && descriptor.kind != FieldKind::Text);

        match record.field_mut(descriptor.name) {
            Some(FieldMut::Text(slot)) => *slot = (!tag.nil).then_some(text),
            Some(FieldMut::Integer(slot)) => {
                *slot = if null {
                    None
                } else {
                    Some(text.trim().parse().map_err(|_| invalid(&text))?)
                };
            }
            Some(FieldMut::Boolean(slot)) => {
                *slot = if null {
                    None
                } else {
                    Some(parse_bool(&text).ok_or_else(|| invalid(&text))?)
                };
            }
            Some(FieldMut::Decimal(slot)) => {
                *slot = if null {
                    None
                } else {
                    Some(parse_decimal(&text).ok_or_else(|| invalid(&text))?)
                };
            }
            Some(FieldMut::DateTime(slot)) => {
                *slot = if null {
                    None
                } else {
                    Some(parse_datetime(&text, date_format.as_ref()).ok_or_else(|| invalid(&text))?)
                };
            }
            _ => {}
        }
        Ok(())
    }

    /// Concatenated text content of a leaf element, consuming its end tag.
    fn read_text(&mut self, tag: &StartTag) -> Result<String> {
        let mut text = String::new();
        if tag.empty {
            return Ok(text);
        }
        loop {
            match self.next_node()? {
                Node::Text(chunk) => text.push_str(&chunk),
                Node::End(_) => return Ok(text),
                Node::Eof => return Err(CodecError::UnexpectedEof),
                Node::Start(child) => {
                    return Err(CodecError::UnexpectedNode {
                        expected: "text",
                        found: format!("<{}> inside <{}>", child.name, tag.name),
                    })
                }
            }
        }
    }

    /// Consume the rest of an element whose start tag was already read.
    fn skip_element(&mut self, tag: &StartTag) -> Result<()> {
        if tag.empty {
            return Ok(());
        }
        let mut depth = 1usize;
        while depth > 0 {
            match self.next_node()? {
                Node::Start(child) if !child.empty => depth += 1,
                Node::End(_) => depth -= 1,
                Node::Eof => return Err(CodecError::UnexpectedEof),
                _ => {}
            }
        }
        Ok(())
    }

    /// The next sibling start tag if it repeats `name`; whitespace before it is consumed.
    fn next_repeat(&mut self, name: &str) -> Result<Option<StartTag>> {
        loop {
            let lookahead = match self.peek_node()? {
                Node::Text(text) if text.trim().is_empty() => Lookahead::Whitespace,
                Node::Start(tag) if tag.name == name => Lookahead::Repeat,
                _ => Lookahead::Other,
            };
            match lookahead {
                Lookahead::Whitespace => {
                    self.next_node()?;
                }
                Lookahead::Repeat => {
                    return match self.next_node()? {
                        Node::Start(tag) => Ok(Some(tag)),
                        _ => Ok(None),
                    };
                }
                Lookahead::Other => return Ok(None),
            }
        }
    }

    fn next_node(&mut self) -> Result<Node> {
        match self.peeked.take() {
            Some(node) => Ok(node),
            None => self.read_node(),
        }
    }

    fn peek_node(&mut self) -> Result<&Node> {
        let node = match self.peeked.take() {
            Some(node) => node,
            None => self.read_node()?,
        };
        Ok(self.peeked.insert(node))
    }

    fn read_node(&mut self) -> Result<Node> {
        loop {
            self.buf.clear();
            let node = match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(start) => Node::Start(start_tag(&start, false)?),
                Event::Empty(start) => Node::Start(start_tag(&start, true)?),
                Event::End(end) => Node::End(String::from_utf8_lossy(end.name().as_ref()).into_owned()),
                Event::Text(text) => Node::Text(text.unescape()?.into_owned()),
                Event::CData(data) => Node::Text(String::from_utf8_lossy(&data.into_inner()).into_owned()),
                Event::Eof => Node::Eof,
                Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => continue,
            };
            return Ok(node);
        }
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &R {
        self.reader.get_ref()
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Current reader configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

fn start_tag(start: &BytesStart<'_>, empty: bool) -> Result<StartTag> {
    let mut nil = false;
    for attribute in start.attributes() {
        let attribute = attribute?;
        if attribute.key.local_name().as_ref() == NIL_ATTRIBUTE.as_bytes() {
            nil = attribute.value.as_ref() == b"true";
        }
    }
    Ok(StartTag {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        nil,
        empty,
    })
}

/// The descriptor an element maps to: a field of the same name, or a
/// record list whose item type has that name.
///
/// Items of lists sharing an item type are written under the field name, so
/// this fallback only meets such lists in documents tagged by item type.
/// There each run of item elements goes to the first such list not yet
/// `filled` in catalog order, and once all are filled a further run restarts
/// the last one. Adjacent runs read as one, and a run meant for a later list
/// lands in an earlier one when that list had no items.
fn field_for(
    record: &dyn Record,
    element: &str,
    filled: &[&'static str],
) -> Option<FieldDescriptor> {
    let catalog = record.catalog();
    if let Some(descriptor) = catalog.get(element) {
        return Some(descriptor.clone());
    }
    let candidates: Vec<&FieldDescriptor> = catalog
        .iter()
        .filter(|descriptor| descriptor.kind == FieldKind::RecordList)
        .filter(|descriptor| {
            matches!(
                record.field(descriptor.name),
                Some(FieldRef::List(list)) if list.item_type_name() == element
            )
        })
        .collect();
    let target = candidates
        .iter()
        .find(|descriptor| !filled.contains(&descriptor.name))
        .or_else(|| candidates.last())
        .map(|descriptor| (*descriptor).clone());
    target
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use chrono::NaiveDate;
    use recordkit_core::fixtures::{ComplexRecord, ListRecord, SimpleRecord, TaggedRecord};
    use recordkit_core::{equals, record_accessors, Schema, SerializationOptions};
    use rust_decimal::Decimal;

    use super::*;
    use crate::writer::RecordWriter;

    fn decode<T: Record>(xml: &str, record: &mut T) -> Result<()> {
        RecordReader::new(xml.as_bytes()).read_record(record)
    }

    #[test]
    fn reads_fields_in_any_order() {
        let mut record = SimpleRecord::default();
        decode(
            "<Root><SimpleProperty>b</SimpleProperty><AnotherProperty>a</AnotherProperty></Root>",
            &mut record,
        )
        .unwrap();
        assert_eq!(record.simple.as_deref(), Some("b"));
        assert_eq!(record.another.as_deref(), Some("a"));
    }

    #[test]
    fn unknown_elements_are_skipped_wholesale() {
        let mut record = SimpleRecord::default();
        decode(
            "<Root><Legacy><Deep>x</Deep><Empty/></Legacy><SimpleProperty>kept</SimpleProperty></Root>",
            &mut record,
        )
        .unwrap();
        assert_eq!(record.simple.as_deref(), Some("kept"));
    }

    #[test]
    fn unknown_elements_rejected_when_strict() {
        let mut record = SimpleRecord::default();
        let err = RecordReader::with_config("<Root><Legacy/></Root>".as_bytes(), CodecConfig::strict())
            .read_record(&mut record)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnknownElement { record: "SimpleObject", ref element } if element == "Legacy"
        ));
    }

    #[test]
    fn nil_and_empty_elements() {
        let mut record = SimpleRecord::default();
        decode(
            r#"<Root><SimpleProperty/><AnotherProperty nil="true"/><DecimalProperty></DecimalProperty></Root>"#,
            &mut record,
        )
        .unwrap();
        assert_eq!(record.simple.as_deref(), Some(""));
        assert_eq!(record.another, None);
        assert_eq!(record.decimal, None);
    }

    #[test]
    fn scalars_parse_by_kind() {
        let mut record = TaggedRecord::default();
        decode(
            "<Root>\n  <Name> padded </Name>\n  <Tags>a</Tags>\n  <Tags>b</Tags>\n  <Count> 42 </Count>\n  <Active>1</Active>\n</Root>",
            &mut record,
        )
        .unwrap();
        assert_eq!(record.name.as_deref(), Some(" padded "));
        assert_eq!(record.tags, vec!["a", "b"]);
        assert_eq!(record.count, Some(42));
        assert_eq!(record.active, Some(true));
    }

    #[test]
    fn unparsable_scalar_is_an_error() {
        let mut record = SimpleRecord::default();
        let err = decode("<Root><DecimalProperty>ten</DecimalProperty></Root>", &mut record)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidScalar { ref field, kind: FieldKind::Decimal, .. } if field == "DecimalProperty"
        ));
    }

    #[test]
    fn date_format_used_unless_ignored() {
        let mut record = SimpleRecord {
            options: SerializationOptions::default().with_date_format("%d/%m/%Y"),
            ..SimpleRecord::default()
        };
        decode(
            "<Root>\
             <DateTimeProperty>29/02/2024</DateTimeProperty>\
             <DateTimeIgnoreXmlDateFormatProperty>2024-02-29T08:30:00</DateTimeIgnoreXmlDateFormatProperty>\
             </Root>",
            &mut record,
        )
        .unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(record.date_time, day.and_hms_opt(0, 0, 0));
        assert_eq!(record.date_time_ignored, day.and_hms_opt(8, 30, 0));
    }

    #[test]
    fn list_items_replace_existing_contents() {
        let mut record = ListRecord::pair();
        decode(
            "<Root><ComplexObject><RequiredProperty>only</RequiredProperty></ComplexObject></Root>",
            &mut record,
        )
        .unwrap();
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].required.as_deref(), Some("only"));
    }

    #[test]
    fn list_recognised_by_field_name() {
        let mut record = ListRecord::default();
        decode(
            "<Root><ListOfObjects><FirstProperty>a</FirstProperty></ListOfObjects>\
             <ListOfObjects><FirstProperty>b</FirstProperty></ListOfObjects></Root>",
            &mut record,
        )
        .unwrap();
        assert_eq!(record.items.len(), 2);
        assert_eq!(record.items[1].first.as_deref(), Some("b"));
    }

    /// Two lists sharing an item type, split by a scalar field.
    #[derive(Debug, Clone, Default)]
    struct Contacts {
        home: Vec<SimpleRecord>,
        label: Option<String>,
        work: Vec<SimpleRecord>,
    }

    impl Record for Contacts {
        fn schema() -> &'static Schema<Self> {
            static SCHEMA: OnceLock<Schema<Contacts>> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                Schema::<Self>::builder("Contacts")
                    .list("Home", |r| &r.home, |r| &mut r.home)
                    .text("Label", |r| &r.label, |r| &mut r.label)
                    .list("Work", |r| &r.work, |r| &mut r.work)
                    .build()
            })
        }

        record_accessors!();
    }

    fn simple(value: &str) -> SimpleRecord {
        SimpleRecord {
            simple: Some(value.to_string()),
            ..SimpleRecord::default()
        }
    }

    fn encoded(record: &Contacts) -> String {
        let mut writer = RecordWriter::new(Vec::new());
        writer.write_record("Root", record).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn lists_sharing_an_item_type_round_trip() {
        let original = Contacts {
            home: vec![simple("h1"), simple("h2")],
            label: None,
            work: vec![simple("w1")],
        };
        let xml = encoded(&original);
        assert!(xml.starts_with("<Root><Home><SimpleProperty>h1</SimpleProperty></Home>"));
        assert!(!xml.contains("<SimpleObject>"));

        let mut decoded = Contacts::default();
        decode(&xml, &mut decoded).unwrap();
        assert_eq!(decoded.home.len(), 2);
        assert_eq!(decoded.work[0].simple.as_deref(), Some("w1"));
        assert!(equals(&original, &decoded));

        let only_work = Contacts {
            work: vec![simple("w2")],
            ..Contacts::default()
        };
        let mut decoded = Contacts::default();
        decode(&encoded(&only_work), &mut decoded).unwrap();
        assert!(decoded.home.is_empty());
        assert!(equals(&only_work, &decoded));
    }

    #[test]
    fn item_type_runs_fill_lists_in_order() {
        let item = |value: &str| format!("<SimpleObject><SimpleProperty>{value}</SimpleProperty></SimpleObject>");
        let xml = format!(
            "<Root>{}{}<Label>between</Label>{}</Root>",
            item("h1"),
            item("h2"),
            item("w1")
        );
        let mut decoded = Contacts::default();
        decode(&xml, &mut decoded).unwrap();
        assert_eq!(decoded.home.len(), 2);
        assert_eq!(decoded.work.len(), 1);
        assert_eq!(decoded.work[0].simple.as_deref(), Some("w1"));

        // A further run has no unfilled list left and restarts the last one.
        let xml = format!("<Root>{}<Label/>{}<Label/>{}</Root>", item("a"), item("b"), item("c"));
        let mut decoded = Contacts::default();
        decode(&xml, &mut decoded).unwrap();
        assert_eq!(decoded.home[0].simple.as_deref(), Some("a"));
        assert_eq!(decoded.work.len(), 1);
        assert_eq!(decoded.work[0].simple.as_deref(), Some("c"));
    }

    #[test]
    fn nested_record_fills_in_place() {
        let mut record = ComplexRecord::blank();
        decode(
            "<Root><SimpleObject><DecimalProperty>1.50</DecimalProperty></SimpleObject></Root>",
            &mut record,
        )
        .unwrap();
        assert_eq!(record.simple.decimal, Some(Decimal::new(150, 2)));
    }

    #[test]
    fn truncated_input() {
        let mut record = SimpleRecord::default();
        assert!(matches!(
            decode("<Root><SimpleProperty>x", &mut record),
            Err(CodecError::UnexpectedEof) | Err(CodecError::Xml(_))
        ));
        assert!(matches!(
            decode("", &mut record),
            Err(CodecError::UnexpectedEof)
        ));
    }

    #[test]
    fn consumes_exactly_one_record() {
        let source = "<A><SimpleProperty>1</SimpleProperty></A><B><SimpleProperty>2</SimpleProperty></B>";
        let mut reader = RecordReader::new(source.as_bytes());
        let mut first = SimpleRecord::default();
        let mut second = SimpleRecord::default();
        reader.read_record(&mut first).unwrap();
        reader.read_record(&mut second).unwrap();
        assert_eq!(first.simple.as_deref(), Some("1"));
        assert_eq!(second.simple.as_deref(), Some("2"));
        assert!(!equals(&first, &second));
    }
}
