use std::cmp::Ordering;

use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::attributes::GffAttr;

/// One exon (or surrogate CDS) interval of a feature. Ordering and equality
/// use only the `(start, end)` coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GffExon {
    pub start:  u32,
    pub end:    u32,
    pub score:  f64,
    pub phase:  char,
    pub qstart: u32,
    pub qend:   u32,
    pub attrs:  Vec<GffAttr>,
}

impl GffExon {
    pub fn new(
        start: u32,
        end: u32,
    ) -> Self {
        Self {
            start,
            end,
            score: 0.0,
            phase: '.',
            qstart: 0,
            qend: 0,
            attrs: Vec::new(),
        }
    }

    pub fn len(&self) -> u32 { self.end - self.start + 1 }

    pub fn coords(&self) -> (u32, u32) { (self.start, self.end) }
}

impl PartialEq for GffExon {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.coords() == other.coords()
    }
}

impl Eq for GffExon {}

impl PartialOrd for GffExon {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GffExon {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.coords().cmp(&other.coords())
    }
}

/// Input segment for [`crate::GffObj::add_exon`].
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start:  u32,
    pub end:    u32,
    pub score:  f64,
    pub phase:  char,
    pub qstart: u32,
    pub qend:   u32,
}

impl Segment {
    pub fn new(
        start: u32,
        end: u32,
    ) -> Self {
        Self {
            start,
            end,
            score: 0.0,
            phase: '.',
            qstart: 0,
            qend: 0,
        }
    }

    pub fn with_phase(
        mut self,
        phase: char,
    ) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_score(
        mut self,
        score: f64,
    ) -> Self {
        self.score = score;
        self
    }

    pub fn with_query(
        mut self,
        qstart: u32,
        qend: u32,
    ) -> Self {
        self.qstart = qstart;
        self.qend = qend;
        self
    }
}

/// Coding piece of one exon, as produced by [`crate::GffObj::cds_segments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdsSegment {
    pub start:    u32,
    pub end:      u32,
    /// `'0'`, `'1'` or `'2'`.
    pub phase:    char,
    pub exon_idx: usize,
}
