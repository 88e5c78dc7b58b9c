//! # gffkit
//!
//! `gffkit` is a Rust library and command-line tool for loading gene
//! annotations written in the GFF3/GTF family of formats. It reconstructs the
//! two-level parent/child hierarchy (transcripts and their exon/CDS segments)
//! into in-memory gene models that can be re-serialized, spliced against a
//! genome and translated.
//!
//! If you do not want to use gffkit as crate, check out the `gffkit` binary
//! built by the `console` workspace member.
//!
//! ## Key Features
//!
//! * **Multi-dialect tokenizer**: GFF3 `ID`/`Parent`, GTF
//!   `transcript_id`/`gene_id`, and the legacy Jigsaw and single-token exon
//!   shapes ([`GffLine`]).
//! * **Two grouping policies**: streaming (one completed feature per call)
//!   and bulk (hash-indexed, with duplicate-id checks), both driven by
//!   [`GffReader`].
//! * **Gene model**: sorted, duplicate-free exon sets with overlap and
//!   short-intron detection, optional merging of close exons, CDS extent and
//!   phase bookkeeping ([`GffObj`]).
//! * **Splicing and translation**: spliced transcript/CDS sequences,
//!   CDS-relative coordinates and protein translation through any
//!   [`SeqProvider`] (in-memory or indexed FASTA).
//!
//! ## Structure
//!
//! * [`data_structs`]: name registry, tokenized records, gene models and
//!   per-contig statistics.
//! * [`io`]: the feature grouping engine, its configuration and the genomic
//!   sequence providers.
//! * [`splice`]: splicing and translation of gene models.
//! * [`error`]: the [`GffError`] type shared by every fallible operation.
//! * [`utils`]: small text helpers and builder macros.
//!
//! ## Usage
//!
//! ### Loading an annotation file
//!
//! ```no_run
//! use gffkit::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = NameRegistry::new();
//!     let config = GffReaderConfig::default().with_merge_close_exons(true);
//!     let mut reader = GffReader::from_path("path/to/annotation.gff3", &registry, config)?;
//!
//!     for feature in reader.load()? {
//!         println!(
//!             "{} {}:{}-{} ({} exons)",
//!             feature.id(),
//!             feature.seqname()?,
//!             feature.start(),
//!             feature.end(),
//!             feature.exon_count()
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Streaming features and splicing them
//!
//! ```no_run
//! use gffkit::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = NameRegistry::new();
//!     let config = GffReaderConfig::default().with_mode(ReadMode::Streaming);
//!     let reader = GffReader::from_path("path/to/annotation.gtf", &registry, config)?;
//!     let mut genome = IndexedFastaProvider::from_path("path/to/genome.fa", None)?;
//!
//!     for feature in reader {
//!         let feature = feature?;
//!         let feature = feature.borrow();
//!         if let Some(protein) = feature.spliced_translation(Some(&mut genome), true)? {
//!             println!(">{}\n{}", feature.id(), String::from_utf8_lossy(&protein));
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod data_structs;
pub mod error;
pub mod exports;
pub mod io;
pub mod prelude;
pub mod splice;
pub mod utils;

#[allow(unused_imports)]
use prelude::*;
