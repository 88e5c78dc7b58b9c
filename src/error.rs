//! Fatal errors raised while loading or transforming annotation records.
//!
//! Every error that stems from a malformed input record carries the original
//! line text so the offending record can be located and inspected. Soft
//! problems (overlapping exons, short introns, duplicate exons) are never
//! reported here: they are logged and recorded on the feature's error flag.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GffError>;

#[derive(Error, Debug)]
pub enum GffError {
    #[error("Error parsing {field} coordinate at line {line_no}:\n{line}")]
    Coordinate {
        field:   &'static str,
        line_no: usize,
        line:    String,
    },

    #[error("Error parsing feature score at line {line_no}:\n{line}")]
    Score { line_no: usize, line: String },

    #[error("Error parsing strand ({strand}) at line {line_no}:\n{line}")]
    Strand {
        strand:  String,
        line_no: usize,
        line:    String,
    },

    #[error("Error parsing {key} ({what} double quotes expected) at GTF line {line_no}:\n{line}")]
    MissingQuote {
        key:     &'static str,
        what:    &'static str,
        line_no: usize,
        line:    String,
    },

    #[error("Error parsing Parent/ID at line {line_no}:\n{line}")]
    UnrecognizedAttributes { line_no: usize, line: String },

    #[error("Error parsing {what} coordinates at line {line_no}:\n{line}")]
    Target {
        what:    &'static str,
        line_no: usize,
        line:    String,
    },

    #[error("No ID found for GFF record start at line {line_no}:\n{line}")]
    MissingId { line_no: usize, line: String },

    #[error("Duplicate GFF ID '{id}' encountered at line {line_no}:\n{line}")]
    DuplicateId {
        id:      String,
        line_no: usize,
        line:    String,
    },

    #[error("Duplicate GFF ID '{id}' encountered (on different contigs/strands) at line {line_no}:\n{line}")]
    ParentMismatch {
        id:      String,
        line_no: usize,
        line:    String,
    },

    #[error("Duplicate GFF ID '{id}' (too far apart: {distance} bases) at line {line_no}:\n{line}")]
    ParentTooFar {
        id:       String,
        distance: u32,
        line_no:  usize,
        line:     String,
    },

    #[error("Invalid {table} name id: {id}")]
    InvalidNameId { table: &'static str, id: usize },

    #[error("Attempt to release an unreferenced name registry")]
    UnreferencedRegistry,

    #[error("Error getting subsequence for {id} ({contig}:{start}..{end}): {source}")]
    Subsequence {
        id:     String,
        contig: String,
        start:  u32,
        end:    u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GffError {
    /// Input line number the error refers to, if it stems from a record.
    pub fn line_no(&self) -> Option<usize> {
        match self {
            GffError::Coordinate { line_no, .. }
            | GffError::Score { line_no, .. }
            | GffError::Strand { line_no, .. }
            | GffError::MissingQuote { line_no, .. }
            | GffError::UnrecognizedAttributes { line_no, .. }
            | GffError::Target { line_no, .. }
            | GffError::MissingId { line_no, .. }
            | GffError::DuplicateId { line_no, .. }
            | GffError::ParentMismatch { line_no, .. }
            | GffError::ParentTooFar { line_no, .. } => Some(*line_no),
            _ => None,
        }
    }

    /// Original text of the offending record, if any.
    pub fn line(&self) -> Option<&str> {
        match self {
            GffError::Coordinate { line, .. }
            | GffError::Score { line, .. }
            | GffError::Strand { line, .. }
            | GffError::MissingQuote { line, .. }
            | GffError::UnrecognizedAttributes { line, .. }
            | GffError::Target { line, .. }
            | GffError::MissingId { line, .. }
            | GffError::DuplicateId { line, .. }
            | GffError::ParentMismatch { line, .. }
            | GffError::ParentTooFar { line, .. } => Some(line.as_str()),
            _ => None,
        }
    }
}
