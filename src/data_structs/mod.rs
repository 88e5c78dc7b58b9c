//! Core data structures of the annotation model.
//!
//! - [`names`]: the shared [`NameRegistry`] interning contig, track,
//!   feature-type and attribute names, and the [`NamesRef`] handle every
//!   feature holds.
//! - [`gff_line`]: the transient [`GffLine`] produced for each record line.
//! - [`GffObj`]: a transcript (or any parent feature) with its sorted exon
//!   set, CDS extent and attributes.
//! - [`SeqStats`]: per-contig coordinate ranges collected while loading.
//! - Common enumerations such as [`Strand`] and the output [`PrintMode`].

mod attributes;
mod enums;
mod exon;
pub mod gff_line;
mod gff_obj;
pub mod names;
mod seq_stats;

pub use attributes::{
    parse_attrs,
    GffAttr,
};
pub use enums::{
    GxfFormat,
    PrintMode,
    SegmentKinds,
    Strand,
};
pub use exon::{
    CdsSegment,
    GffExon,
    Segment,
};
pub use gff_line::GffLine;
pub use gff_obj::{
    GffObj,
    MAX_SHORT_INTRON,
};
pub use names::{
    NameRegistry,
    NameTable,
    NamesRef,
};
pub use seq_stats::{
    ContigStat,
    SeqStats,
};
