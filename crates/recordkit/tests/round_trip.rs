use chrono::NaiveDate;
use recordkit::codec::{decode_with, encode_to_string_with, to_value, CodecConfig, ElementPolicy};
use recordkit::model::fixtures::{ComplexRecord, ListRecord, SimpleRecord, TaggedRecord};
use recordkit::model::is_empty;
use recordkit::{decode_str, encode_to_string, equals, structural_hash, RecordExt};
use recordkit::{CodecError, SerializationOptions};
use rust_decimal::Decimal;

fn populated_list() -> ListRecord {
    let mut list = ListRecord::pair();
    list.items[0].simple.decimal = Some(Decimal::new(99_999, 3));
    list.items[1].simple.date_time = NaiveDate::from_ymd_opt(1999, 12, 31)
        .and_then(|date| date.and_hms_opt(23, 59, 0));
    list.items[1].country = Some("BE".to_string());
    list
}

#[test]
fn list_of_records_survives_xml() {
    let original = populated_list();
    let xml = encode_to_string(&original, "Document").expect("encode should succeed");

    let mut decoded = ListRecord::default();
    decode_str(&mut decoded, &xml).expect("decode should succeed");

    assert!(equals(&original, &decoded));
    assert_eq!(structural_hash(&original), structural_hash(&decoded));
    assert_eq!(decoded.items[1].country.as_deref(), Some("BE"));
}

#[test]
fn decoded_records_validate_like_the_original() {
    let mut original = populated_list();
    original.items[0].required = None;
    original.items[1].length = Some("far too long".to_string());

    let xml = encode_to_string(&original, "Document").expect("encode should succeed");
    let mut decoded = ListRecord::default();
    decode_str(&mut decoded, &xml).expect("decode should succeed");

    assert_eq!(original.error(), decoded.error());
    let error = decoded.error().expect("items should be invalid");
    assert!(error.contains("ListOfObjects[0].RequiredProperty: Required."));
    assert!(error.contains("ListOfObjects[1].LengthProperty: "));
}

fn option_matrix() -> Vec<SerializationOptions> {
    let mut matrix = Vec::new();
    for nulls in [false, true] {
        for empty_strings in [false, true] {
            for empty_nested in [false, true] {
                matrix.push(
                    SerializationOptions::default()
                        .with_null_values(nulls)
                        .with_empty_strings(empty_strings)
                        .with_empty_nested(empty_nested),
                );
            }
        }
    }
    matrix
}

#[test]
fn every_option_combination_round_trips() {
    for options in option_matrix() {
        let mut populated = ComplexRecord::mock();
        populated.simple.decimal = Some(Decimal::new(1250, 2));
        populated.options = options.clone();
        let sparse = ComplexRecord {
            required: Some("sparse".to_string()),
            length: None,
            country: None,
            simple: SimpleRecord::default(),
            options: options.clone(),
            ..ComplexRecord::mock()
        };
        let original = ListRecord {
            items: vec![populated, sparse],
        };

        let xml = encode_to_string(&original, "Document").expect("encode should succeed");
        let mut decoded = ListRecord::default();
        decode_str(&mut decoded, &xml).expect("decode should succeed");

        assert!(equals(&original, &decoded), "{options:?}: {xml}");
        assert_eq!(decoded.items[1].country, None, "{options:?}");
        assert!(is_empty(&decoded.items[1].simple), "{options:?}");
    }
}

#[test]
fn skipped_empty_strings_read_back_as_null() {
    for options in option_matrix() {
        let original = SimpleRecord {
            simple: Some(String::new()),
            another: Some("x".to_string()),
            options: options.clone(),
            ..SimpleRecord::default()
        };
        let xml = encode_to_string(&original, "Root").expect("encode should succeed");
        let mut decoded = SimpleRecord::default();
        decode_str(&mut decoded, &xml).expect("decode should succeed");

        let kept = options.serialize_empty_strings;
        assert_eq!(decoded.simple, kept.then(String::new), "{options:?}");
        assert_eq!(equals(&original, &decoded), kept, "{options:?}");
    }
}

#[test]
fn nulls_survive_with_nil_markers() {
    let options = SerializationOptions::default().with_null_values(true);
    let original = SimpleRecord {
        simple: Some("kept".to_string()),
        options: options.clone(),
        ..SimpleRecord::default()
    };
    let xml = encode_to_string(&original, "Root").expect("encode should succeed");
    assert!(xml.contains(r#"<AnotherProperty nil="true"/>"#));

    let mut decoded = SimpleRecord {
        another: Some("stale".to_string()),
        options,
        ..SimpleRecord::default()
    };
    decode_str(&mut decoded, &xml).expect("decode should succeed");
    assert_eq!(decoded.another, None);
    assert!(equals(&original, &decoded));
}

#[test]
fn pretty_printed_documents_decode() {
    let original = TaggedRecord {
        name: Some("tagged".to_string()),
        tags: vec!["one".to_string(), "two".to_string(), "three".to_string()],
        count: Some(3),
        active: Some(true),
        ..TaggedRecord::default()
    };
    let xml = encode_to_string_with(&original, "Root", CodecConfig::indented(2))
        .expect("encode should succeed");

    let mut decoded = TaggedRecord::default();
    decode_str(&mut decoded, &xml).expect("decode should succeed");
    assert!(equals(&original, &decoded));
}

#[test]
fn unknown_elements_follow_policy() {
    let xml = "<Root><FirstProperty>f</FirstProperty><Legacy><Nested/></Legacy></Root>";

    let mut lenient = ComplexRecord::blank();
    decode_str(&mut lenient, xml).expect("lenient decode should skip");
    assert_eq!(lenient.first.as_deref(), Some("f"));

    let config = CodecConfig {
        unknown_elements: ElementPolicy::Reject,
        ..CodecConfig::default()
    };
    let mut strict = ComplexRecord::blank();
    let err = decode_with(&mut strict, xml.as_bytes(), config).expect_err("strict decode should fail");
    assert!(matches!(err, CodecError::UnknownElement { .. }));
}

#[test]
fn keyed_view_matches_xml_content() {
    let record = ComplexRecord::mock();
    let value = to_value(&record);
    assert_eq!(value["RequiredProperty"], "hello");
    assert_eq!(value["SimpleObject"]["SimpleProperty"], "SimpleProperty");
    assert!(value.get("LengthProperty").is_none());
}
