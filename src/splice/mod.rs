//! Transcript splicing and translation.
//!
//! Exons are walked in transcript order (descending coordinates on the
//! reverse strand), clipped to the transcript or CDS bounds, and their bases
//! concatenated; reverse-strand pieces are complemented. Positions in the
//! resulting sequence are "spliced coordinates", 1-based.

mod codon;

use anyhow::bail;
use bio::alphabets::dna;
use log::warn;

pub use codon::{
    translate,
    translate_codon,
    UNKNOWN_AA,
};

use crate::data_structs::{
    GffObj,
    Strand,
};
use crate::error::{
    GffError,
    Result,
};
use crate::io::fasta::SeqProvider;

/// Spliced transcript (or CDS) sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplicedSeq {
    pub seq:       Vec<u8>,
    /// Spliced coordinates of the CDS when the whole transcript was
    /// spliced; `(0, 0)` otherwise.
    pub cds_start: u32,
    pub cds_end:   u32,
    /// Spliced-coordinate range of every exon piece, in transcript order.
    pub segments:  Vec<(u32, u32)>,
}

impl GffObj {
    /// Exon pieces clipped to the transcript or (phase-adjusted) CDS bounds,
    /// in transcript order.
    fn splice_pieces(
        &self,
        cds_only: bool,
    ) -> Vec<(u32, u32)> {
        let (Some(first), Some(last)) = (self.exons().first(), self.exons().last()) else {
            return Vec::new();
        };
        let (seqstart, seqend) = if cds_only {
            self.cds_ends()
        }
        else {
            (first.start, last.end)
        };
        let pieces = self
            .exons()
            .iter()
            .filter(|exon| seqend >= exon.start && seqstart <= exon.end)
            .map(|exon| (exon.start.max(seqstart), exon.end.min(seqend)));
        if self.strand() == Strand::Reverse {
            pieces.rev().collect()
        }
        else {
            pieces.collect()
        }
    }

    /// Spliced coordinates of the CDS start and end given the transcript
    /// pieces.
    fn cds_spliced_coords(
        &self,
        pieces: &[(u32, u32)],
    ) -> (u32, u32) {
        let (cd_start, cd_end) = (self.cds_start() as i64, self.cds_end() as i64);
        let adj = self.phase_offset() as i64;
        let reverse = self.strand() == Strand::Reverse;
        let (mut mstart, mut mend) = (0, 0);
        let mut s: i64 = 0;
        for &(start, end) in pieces {
            let (start, end) = (start as i64, end as i64);
            s += end - start + 1;
            let holds = |pos: i64| pos >= start && pos <= end;
            if reverse {
                if holds(cd_start) {
                    mend = s - (cd_start - start);
                }
                if holds(cd_end) {
                    mstart = s - (cd_end - adj - start);
                }
            }
            else {
                if holds(cd_start) {
                    mstart = s - (end - cd_start - adj);
                }
                if holds(cd_end) {
                    mend = s - (end - cd_end);
                }
            }
        }
        (mstart.max(0) as u32, mend.max(0) as u32)
    }

    /// CDS start and end in spliced transcript coordinates, `(0, 0)`
    /// without a CDS.
    pub fn mrna_cds_coords(&self) -> (u32, u32) {
        if !self.has_cds() {
            return (0, 0);
        }
        self.cds_spliced_coords(&self.splice_pieces(false))
    }

    /// Splices the transcript, or only its CDS when `cds_only` is set.
    ///
    /// Returns `Ok(None)` without a provider, without exons, or when the CDS
    /// is requested but absent. Provider failures are errors.
    pub fn spliced(
        &self,
        provider: Option<&mut dyn SeqProvider>,
        cds_only: bool,
    ) -> Result<Option<SplicedSeq>> {
        if cds_only && !self.has_cds() {
            return Ok(None);
        }
        let Some(provider) = provider else {
            warn!("No sequence provider to splice {}", self.id());
            return Ok(None);
        };
        if self.exons().is_empty() {
            return Ok(None);
        }

        let (gstart, gend) = (self.start(), self.end());
        let contig = self.seqname()?;
        let window = provider
            .subseq(&contig, gstart, gend - gstart + 1)
            .and_then(|window| {
                let expected = (gend - gstart + 1) as usize;
                if window.len() != expected {
                    bail!("expected {} bases, got {}", expected, window.len());
                }
                Ok(window)
            })
            .map_err(|source| GffError::Subsequence {
                id: self.id().to_string(),
                contig: contig.to_string(),
                start: gstart,
                end: gend,
                source,
            })?;

        let reverse = self.strand() == Strand::Reverse;
        let pieces = self.splice_pieces(cds_only);
        let mut seq = Vec::with_capacity(self.covlen() as usize);
        let mut segments = Vec::with_capacity(pieces.len());
        for &(start, end) in &pieces {
            let from = seq.len() as u32 + 1;
            let bases = &window[(start - gstart) as usize..=(end - gstart) as usize];
            if reverse {
                seq.extend(bases.iter().rev().map(|&b| dna::complement(b)));
            }
            else {
                seq.extend_from_slice(bases);
            }
            segments.push((from, from + end - start));
        }

        let (cds_start, cds_end) = if !cds_only && self.has_cds() {
            self.cds_spliced_coords(&pieces)
        }
        else {
            (0, 0)
        };
        Ok(Some(SplicedSeq {
            seq,
            cds_start,
            cds_end,
            segments,
        }))
    }

    /// Translates the spliced transcript (or CDS); incomplete trailing codons
    /// are dropped.
    pub fn spliced_translation(
        &self,
        provider: Option<&mut dyn SeqProvider>,
        cds_only: bool,
    ) -> Result<Option<Vec<u8>>> {
        Ok(self
            .spliced(provider, cds_only)?
            .map(|spliced| translate(&spliced.seq)))
    }
}

#[cfg(test)]
mod tests;
