//! One-shot encode and decode helpers over [`RecordWriter`] and [`RecordReader`].

use std::io::{self, BufRead, Write};

use recordkit_core::Record;

use crate::config::CodecConfig;
use crate::error::Result;
use crate::reader::RecordReader;
use crate::writer::RecordWriter;

/// Encode `record` under an element named `root` into `sink`.
pub fn encode<W: Write>(record: &dyn Record, root: &str, sink: W) -> Result<W> {
    encode_with(record, root, sink, CodecConfig::default())
}

/// Encode with explicit codec configuration.
pub fn encode_with<W: Write>(
    record: &dyn Record,
    root: &str,
    sink: W,
    config: CodecConfig,
) -> Result<W> {
    let mut writer = RecordWriter::with_config(sink, config);
    writer.write_record(root, record)?;
    Ok(writer.into_inner())
}

/// Encode `record` into a string.
pub fn encode_to_string(record: &dyn Record, root: &str) -> Result<String> {
    encode_to_string_with(record, root, CodecConfig::default())
}

/// Encode into a string with explicit codec configuration.
pub fn encode_to_string_with(
    record: &dyn Record,
    root: &str,
    config: CodecConfig,
) -> Result<String> {
    let bytes = encode_with(record, root, Vec::new(), config)?;
    String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
}

/// Populate `record` from one element read off `source`.
///
/// Fields absent from the input keep their current values; record lists
/// present in the input replace their previous contents.
pub fn decode<R: BufRead>(record: &mut dyn Record, source: R) -> Result<()> {
    decode_with(record, source, CodecConfig::default())
}

/// Decode with explicit codec configuration.
pub fn decode_with<R: BufRead>(
    record: &mut dyn Record,
    source: R,
    config: CodecConfig,
) -> Result<()> {
    RecordReader::with_config(source, config).read_record(record)
}

/// Populate `record` from an XML string.
pub fn decode_str(record: &mut dyn Record, xml: &str) -> Result<()> {
    decode(record, xml.as_bytes())
}
