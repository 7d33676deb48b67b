use serde::{Deserialize, Serialize};

/// What the reader does with input it cannot map onto the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementPolicy {
    /// Skip the element and its subtree.
    #[default]
    Skip,
    /// Fail the decode.
    Reject,
}

/// Configuration for record readers and writers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Indent nested elements by this many spaces. Default: compact output.
    pub indent: Option<usize>,
    /// Elements matching no field of the record being read. Default: skip.
    pub unknown_elements: ElementPolicy,
    /// Items of a list field whose item type cannot be constructed. Default: skip.
    pub foreign_list_items: ElementPolicy,
}

impl CodecConfig {
    /// Indented output with the given width.
    pub fn indented(width: usize) -> Self {
        Self {
            indent: Some(width),
            ..Self::default()
        }
    }

    /// Reject both unknown elements and foreign list items.
    pub fn strict() -> Self {
        Self {
            unknown_elements: ElementPolicy::Reject,
            foreign_list_items: ElementPolicy::Reject,
            ..Self::default()
        }
    }
}
