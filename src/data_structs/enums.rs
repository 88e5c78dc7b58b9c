use std::fmt::Display;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord, Default)]
pub enum Strand {
    /// Forward strand.
    Forward,
    /// Reverse strand.
    Reverse,
    /// No strand.
    #[default]
    None,
}

impl Strand {
    /// Strict conversion from the strand column: only `+`, `-` and `.` are
    /// accepted.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Strand::Forward),
            '-' => Some(Strand::Reverse),
            '.' => Some(Strand::None),
            _ => None,
        }
    }

    pub fn is_reverse(&self) -> bool { matches!(self, Strand::Reverse) }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Strand::from_char(c).ok_or_else(|| s.to_string()),
            _ => Err(s.to_string()),
        }
    }
}

impl From<Strand> for char {
    fn from(value: Strand) -> Self {
        match value {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::None => '.',
        }
    }
}

impl Display for Strand {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

impl Serialize for Strand {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Strand {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        Strand::from_str(&s).map_err(|s| {
            serde::de::Error::custom(format!("invalid strand '{}'", s))
        })
    }
}

/// Output dialect for re-serialized features.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GxfFormat {
    #[default]
    Gff3,
    Gtf,
}

/// Which child segments are emitted when a feature is printed.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKinds {
    Exon,
    Cds,
    #[default]
    Both,
}

impl SegmentKinds {
    pub fn shows_exons(&self) -> bool {
        matches!(self, SegmentKinds::Exon | SegmentKinds::Both)
    }

    pub fn shows_cds(&self) -> bool {
        matches!(self, SegmentKinds::Cds | SegmentKinds::Both)
    }
}

/// Dialect and segment selection for [`crate::data_structs::GffObj::write_gxf`].
#[derive(Eq, PartialEq, Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct PrintMode {
    pub format: GxfFormat,
    pub kinds:  SegmentKinds,
}

impl PrintMode {
    pub fn new(
        format: GxfFormat,
        kinds: SegmentKinds,
    ) -> Self {
        Self { format, kinds }
    }
}
