use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::{
    Deserialize,
    Serialize,
};

use crate::with_field_fn;

/// Default guard against unrelated records sharing an id: a child further
/// than this from its parent's start is rejected in bulk loads.
pub const MAX_PARENT_DISTANCE: u32 = 1_000_000;

/// How the grouping engine walks the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// Children follow their parent (or a parent seen earlier); one feature
    /// is completed per call.
    Streaming,
    /// The whole input is consumed and grouped through the id index.
    #[default]
    Bulk,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GffReaderConfig {
    pub mode:                ReadMode,
    pub keep_attrs:          bool,
    pub no_exon_attrs:       bool,
    pub merge_close_exons:   bool,
    pub transcripts_only:    bool,
    pub max_parent_distance: u32,
}

impl Default for GffReaderConfig {
    fn default() -> Self {
        Self {
            mode:                ReadMode::Bulk,
            keep_attrs:          true,
            no_exon_attrs:       true,
            merge_close_exons:   false,
            transcripts_only:    false,
            max_parent_distance: MAX_PARENT_DISTANCE,
        }
    }
}

impl GffReaderConfig {
    with_field_fn!(mode, ReadMode);

    with_field_fn!(keep_attrs, bool);

    with_field_fn!(no_exon_attrs, bool);

    with_field_fn!(merge_close_exons, bool);

    with_field_fn!(transcripts_only, bool);

    with_field_fn!(max_parent_distance, u32);

    /// Whether per-exon attribute lists are kept.
    pub fn keep_exon_attrs(&self) -> bool { self.keep_attrs && !self.no_exon_attrs }

    /// Reads a JSON configuration; missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Could not open config {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Could not parse config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let config: GffReaderConfig =
            serde_json::from_str(r#"{"mode": "streaming", "merge_close_exons": true}"#).unwrap();
        assert_eq!(config.mode, ReadMode::Streaming);
        assert!(config.merge_close_exons);
        assert!(config.keep_attrs);
        assert_eq!(config.max_parent_distance, MAX_PARENT_DISTANCE);
    }

    #[test]
    fn builder_setters() {
        let config = GffReaderConfig::default()
            .with_keep_attrs(true)
            .with_no_exon_attrs(false)
            .with_max_parent_distance(10);
        assert!(config.keep_exon_attrs());
        assert_eq!(config.max_parent_distance, 10);
    }

    #[test]
    fn reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"{"transcripts_only": true}"#).unwrap();
        let config = GffReaderConfig::from_json_file(file.path()).unwrap();
        assert!(config.transcripts_only);
        assert_eq!(config.mode, ReadMode::Bulk);
    }
}
