//! Domain records with declarative validation, XML and keyed serialization.
//!
//! # Crate Structure
//!
//! - [`model`]: record trait, property catalog, validators, equality, country table
//! - [`codec`]: XML element-tree codec and keyed JSON rendering
//!
//! The most used items are also re-exported at the crate root.

/// Re-export record model types.
pub mod model {
    pub use recordkit_core::*;
}

/// Re-export codec types.
pub mod codec {
    pub use recordkit_codec::*;
}

pub use recordkit_codec::{decode, decode_str, encode, encode_to_string, CodecConfig, CodecError};
pub use recordkit_core::{
    equals, record_accessors, rules, structural_hash, BrokenRule, Record, RecordExt, RuleSet,
    Schema, SerializationOptions, ValidationEngine, Validator,
};
