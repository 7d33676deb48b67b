//! Structural serialization for recordkit records.
//!
//! The XML codec writes each record's fields as child elements in catalog
//! order and reads them back by name:
//! - nested records become one element named by the field
//! - record lists become repeated elements named by the item type
//! - null fields are omitted, or written as `<Field nil="true"/>` when the
//!   record's options ask for nulls
//!
//! Unknown elements are skipped by default; [`CodecConfig`] can reject them.
//! The [`keyed`] module renders the same field set as a JSON object.

pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod keyed;
pub mod reader;
pub mod writer;

pub use codec::{
    decode, decode_str, decode_with, encode, encode_to_string, encode_to_string_with, encode_with,
};
pub use config::{CodecConfig, ElementPolicy};
pub use error::{CodecError, Result};
pub use format::{DateFormat, DecimalPattern};
pub use keyed::{to_json, to_value, KeyedLayout};
pub use reader::RecordReader;
pub use writer::RecordWriter;
