pub mod config;
pub mod fasta;
mod reader;

pub use config::{
    GffReaderConfig,
    ReadMode,
    MAX_PARENT_DISTANCE,
};
pub use reader::{
    GffReader,
    SharedGffObj,
    Verdict,
};
