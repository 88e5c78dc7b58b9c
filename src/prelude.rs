pub use crate::data_structs::{
    CdsSegment,
    ContigStat,
    GffAttr,
    GffExon,
    GffLine,
    GffObj,
    GxfFormat,
    NameRegistry,
    NamesRef,
    PrintMode,
    Segment,
    SegmentKinds,
    SeqStats,
    Strand,
};
pub use crate::error::{
    GffError,
    Result as GffResult,
};
pub use crate::io::fasta::{
    InMemoryProvider,
    IndexedFastaProvider,
    SeqProvider,
};
pub use crate::io::{
    GffReader,
    GffReaderConfig,
    ReadMode,
    SharedGffObj,
    Verdict,
};
pub use crate::splice::{
    translate,
    SplicedSeq,
};
