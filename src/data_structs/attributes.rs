use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::names::NameRegistry;

/// Keys that the tokenizer already extracts into dedicated fields.
const RECOGNIZED_KEYS: [&str; 5] = ["ID", "Parent", "Name", "transcript_id", "gene_id"];

/// One `key=value` attribute; the key is interned in the session's
/// attribute table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GffAttr {
    pub attr_id: usize,
    pub value:   String,
}

impl GffAttr {
    pub fn new(
        attr_id: usize,
        value: impl Into<String>,
    ) -> Self {
        Self {
            attr_id,
            value: value.into(),
        }
    }
}

/// Splits a column-9 string into `key=value` attributes.
///
/// Segments without `=` are dropped, as are the keys already stored on the
/// record itself (`ID`, `Parent`, `Name`, `transcript_id`, `gene_id`).
/// GTF attribute strings must be normalized to `key=value` form first.
pub fn parse_attrs(
    names: &NameRegistry,
    info: &str,
) -> Vec<GffAttr> {
    info.split(';')
        .map(|segment| segment.trim_start_matches(' '))
        .filter_map(|segment| segment.split_once('='))
        .filter(|(key, _)| !key.is_empty() && !RECOGNIZED_KEYS.contains(key))
        .map(|(key, value)| {
            GffAttr::new(names.add_attr(key), value.trim_start_matches(' '))
        })
        .collect()
}
